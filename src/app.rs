use clap::Parser;
use metalens::metadata::export::{to_compact_json, to_pretty_json, write_json};
use metalens::upload::stage_upload;
use std::io::{self, Read};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "metalens")]
#[command(about = "Extrae metadata forense de imágenes, PDF y DOCX como JSON")]
pub struct Cli {
    /// Archivo a analizar
    #[arg(required_unless_present = "stdin_name")]
    pub file: Option<PathBuf>,

    /// Escribe también el JSON en este archivo
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Imprime JSON en una sola línea
    #[arg(long)]
    pub compact: bool,

    /// Lee el contenido desde stdin y lo guarda con este nombre antes de analizarlo
    #[arg(long, value_name = "NAME", conflicts_with = "file")]
    pub stdin_name: Option<String>,

    /// Directorio donde se guardan los archivos leídos desde stdin
    #[arg(long, env = "METALENS_UPLOAD_DIR", default_value = "uploads")]
    pub upload_dir: PathBuf,

    /// Muestra el detalle de cada paso en stderr
    #[arg(short, long)]
    pub verbose: bool,
}

pub fn run(cli: &Cli) -> Result<(), String> {
    let path = resolve_input(cli, io::stdin())?;

    let record = metalens::extract(&path);
    if let Some(error) = record.probe_error() {
        return Err(error.to_string());
    }

    let json = if cli.compact {
        to_compact_json(&record)
    } else {
        to_pretty_json(&record)
    }
    .map_err(|error| error.to_string())?;
    println!("{json}");

    if let Some(out) = &cli.out {
        write_json(&record, out).map_err(|error| error.to_string())?;
        eprintln!("Saved output to {}", out.display());
    }

    Ok(())
}

/// Ruta a analizar: el argumento posicional o el contenido de `input` guardado como subida.
fn resolve_input(cli: &Cli, mut input: impl Read) -> Result<PathBuf, String> {
    if let Some(name) = &cli.stdin_name {
        let mut bytes = Vec::new();
        input
            .read_to_end(&mut bytes)
            .map_err(|error| format!("cannot read stdin: {error}"))?;
        return stage_upload(&bytes, name, &cli.upload_dir).map_err(|error| error.to_string());
    }

    cli.file
        .clone()
        .ok_or_else(|| "a file path or --stdin-name is required".to_string())
}
