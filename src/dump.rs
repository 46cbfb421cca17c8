//! Decompression of the fetched dump into a plain-text SQL script.

use std::io::Read as _;

use flate2::read::GzDecoder;

/// Decompress the gzip-compressed dump into the SQL script it carries.
///
/// The dump is treated as opaque beyond the gzip framing; whatever it
/// decompresses to is handed to the restore client as-is.
///
/// # Errors
///
/// Returns [`DecompressError`] if the bytes are not a valid gzip stream.
pub fn decompress(dump: &[u8]) -> Result<Vec<u8>, DecompressError> {
    let mut sql = Vec::new();
    GzDecoder::new(dump)
        .read_to_end(&mut sql)
        .map_err(DecompressError)?;
    Ok(sql)
}

/// The dump bytes were corrupt or not gzip-compressed.
#[derive(Debug, thiserror::Error)]
#[error("dump is not a valid gzip stream")]
pub struct DecompressError(#[source] std::io::Error);
