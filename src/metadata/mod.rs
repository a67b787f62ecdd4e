//! Extracción del registro de metadata: sistema de archivos, hashes y tipo.

mod detect;
pub mod export;
mod extractor;
mod filesystem;
mod hashing;
mod mime;
mod report;

pub use detect::{DetectedType, detect_file_type, normalized_extension};
pub use extractor::extract;
pub use filesystem::{FileSystemInfo, FsProbe, probe};
pub use hashing::{HashDigests, file_hashes, hash_reader};
pub use mime::mime_type;
pub use report::{FileInfo, MetadataRecord};
