//! Tipo MIME estimado a partir de la ruta.

use std::path::Path;

/// Consulta la tabla estática de `mime_guess`; no lee el contenido del archivo.
pub fn mime_type(path: &Path) -> Option<String> {
    mime_guess::from_path(path)
        .first()
        .map(|mime| mime.essence_str().to_string())
}
