//! Guarda archivos subidos en un directorio de staging antes de analizarlos.

use crate::error::{ExtractError, Result};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

const ALLOWED_PUNCTUATION: &str = "-_.() ";
const DEFAULT_UPLOAD_NAME: &str = "uploaded_file";
const MAX_STAGE_ATTEMPTS: usize = 16;

/// Conserva sólo el nombre final y reemplaza los caracteres no permitidos por `_`.
pub fn secure_filename(name: &str) -> String {
    let base = name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || ALLOWED_PUNCTUATION.contains(c) {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.trim_matches(|c: char| c == '.' || c == ' ').is_empty() {
        DEFAULT_UPLOAD_NAME.to_string()
    } else {
        cleaned
    }
}

/// Primera ruta libre: `dir/name`, luego `dir/<stem>_1<.ext>`, `dir/<stem>_2<.ext>`...
pub fn staged_path(dir: &Path, name: &str) -> PathBuf {
    let candidate = dir.join(name);
    if !candidate.exists() {
        return candidate;
    }

    let file_name = Path::new(name);
    let stem = file_name.file_stem().unwrap_or_default().to_string_lossy();
    let suffix = file_name
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();

    (1_u64..)
        .map(|index| dir.join(format!("{stem}_{index}{suffix}")))
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}

/// Escribe `bytes` bajo `dir` con un nombre saneado y sin pisar archivos previos.
pub fn stage_upload(bytes: &[u8], original_name: &str, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(|error| ExtractError::io(dir, error))?;
    let safe_name = secure_filename(original_name);

    for _ in 0..MAX_STAGE_ATTEMPTS {
        let path = staged_path(dir, &safe_name);
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(error) if error.kind() == ErrorKind::AlreadyExists => continue,
            Err(error) => return Err(ExtractError::io(&path, error)),
        };
        file.write_all(bytes)
            .map_err(|error| ExtractError::io(&path, error))?;

        let absolute = fs::canonicalize(&path).map_err(|error| ExtractError::io(&path, error))?;
        debug!(path = %absolute.display(), bytes = bytes.len(), "archivo guardado en staging");
        return Ok(absolute);
    }

    Err(ExtractError::Upload(format!(
        "no free name for `{safe_name}` in {}",
        dir.display()
    )))
}
