use std::io::Read;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;

use crate::CliError;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Read a Dia file, decompressing it when it is gzip encoded.
pub fn read_diagram(path: &Path) -> Result<Vec<u8>, CliError> {
    let raw = std::fs::read(path)?;
    decode_diagram(raw)
}

/// Gunzip `raw` if it starts with the gzip magic bytes.
pub fn decode_diagram(raw: Vec<u8>) -> Result<Vec<u8>, CliError> {
    if !raw.starts_with(&GZIP_MAGIC) {
        return Ok(raw);
    }

    let mut decoder = GzDecoder::new(raw.as_slice());
    let mut xml = Vec::new();
    decoder.read_to_end(&mut xml)?;
    Ok(xml)
}

/// Input path with its extension swapped, e.g. `shop.dia` -> `shop.sql`.
pub fn derived_path(input: &Path, extension: &str) -> PathBuf {
    input.with_extension(extension)
}
