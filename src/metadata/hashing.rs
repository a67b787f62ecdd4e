//! Cálculo de hashes forenses en una sola pasada de lectura.

use crate::error::ExtractError;
use md5::Md5;
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use tracing::{debug, warn};

const CHUNK_SIZE: usize = 8 * 1024;

/// Digests hexadecimales en minúsculas; todos `None` cuando la lectura falla.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashDigests {
    pub md5: Option<String>,
    pub sha1: Option<String>,
    pub sha256: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HashDigests {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }
}

/// Devuelve los hashes del archivo; un fallo de E/S queda registrado en `error`.
pub fn file_hashes(path: &Path) -> HashDigests {
    let outcome = File::open(path)
        .and_then(hash_reader)
        .map_err(|error| ExtractError::io(path, error));

    match outcome {
        Ok(digests) => {
            debug!(path = %path.display(), "hashes calculados");
            digests
        }
        Err(error) => {
            warn!(path = %path.display(), %error, "no se pudieron calcular los hashes");
            HashDigests::failed(error.to_string())
        }
    }
}

/// Alimenta los tres acumuladores con los mismos bloques de `reader`.
pub fn hash_reader<R: Read>(mut reader: R) -> std::io::Result<HashDigests> {
    let mut md5 = Md5::new();
    let mut sha1 = Sha1::new();
    let mut sha256 = Sha256::new();
    let mut buffer = [0_u8; CHUNK_SIZE];
    loop {
        match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(bytes_read) => {
                let chunk = &buffer[..bytes_read];
                md5.update(chunk);
                sha1.update(chunk);
                sha256.update(chunk);
            }
            Err(error) if error.kind() == ErrorKind::Interrupted => continue,
            Err(error) => return Err(error),
        }
    }

    Ok(HashDigests {
        md5: Some(format!("{:x}", md5.finalize())),
        sha1: Some(format!("{:x}", sha1.finalize())),
        sha256: Some(format!("{:x}", sha256.finalize())),
        error: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor};
    use tempfile::tempdir;

    #[test]
    fn known_vectors_for_abc() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let digests = hash_reader(Cursor::new(b"abc"))?;
        assert_eq!(
            digests.md5.as_deref(),
            Some("900150983cd24fb0d6963f7d28e17f72")
        );
        assert_eq!(
            digests.sha1.as_deref(),
            Some("a9993e364706816aba3e25717850c26c9cd0d89d")
        );
        assert_eq!(
            digests.sha256.as_deref(),
            Some("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad")
        );
        assert!(digests.error.is_none());
        Ok(())
    }

    #[test]
    fn content_larger_than_one_chunk_matches_single_buffer() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let content: Vec<u8> = (0..(CHUNK_SIZE * 3 + 17)).map(|i| (i % 251) as u8).collect();
        let streamed = hash_reader(Cursor::new(&content))?;

        let expected = format!("{:x}", Sha256::digest(&content));
        assert_eq!(streamed.sha256, Some(expected));
        Ok(())
    }

    #[test]
    fn hashing_twice_is_deterministic() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("muestra.bin");
        std::fs::write(&path, vec![7_u8; 20_000])?;

        let first = file_hashes(&path);
        let second = file_hashes(&path);
        assert_eq!(first, second);
        assert!(first.md5.is_some() && first.sha1.is_some() && first.sha256.is_some());
        Ok(())
    }

    #[test]
    fn missing_file_records_error_instead_of_digests() {
        let digests = file_hashes(Path::new("/no/existe/archivo.bin"));
        assert!(digests.md5.is_none());
        assert!(digests.sha1.is_none());
        assert!(digests.sha256.is_none());
        assert!(digests.error.is_some_and(|message| !message.is_empty()));
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("disco desconectado"))
        }
    }

    #[test]
    fn read_failure_propagates_from_reader() {
        assert!(hash_reader(FailingReader).is_err());
    }
}
