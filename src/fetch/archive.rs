//! Unpacks the dataset from whatever container it arrives in.

use std::io::{Cursor, Read};

use anyhow::{Context, Result, anyhow};
use flate2::read::GzDecoder;
use tracing::debug;
use zip::ZipArchive;

/// Name of the CSV inside the published archive.
pub const DEFAULT_ENTRY: &str = "activity.csv";

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const GZIP_MAGIC: &[u8] = &[0x1f, 0x8b];

/// Returns the CSV bytes held in `bytes`.
///
/// - zip: the entry called `entry_name`, falling back to the first `.csv`
///   entry in the archive
/// - gzip: the decompressed stream
/// - anything else: the input unchanged
pub fn extract_csv(bytes: &[u8], entry_name: &str) -> Result<Vec<u8>> {
    if bytes.starts_with(ZIP_MAGIC) {
        extract_from_zip(bytes, entry_name)
    } else if bytes.starts_with(GZIP_MAGIC) {
        let mut decoder = GzDecoder::new(bytes);
        let mut out = Vec::new();
        decoder
            .read_to_end(&mut out)
            .context("decompressing gzip input")?;
        debug!(compressed = bytes.len(), bytes = out.len(), "Gunzipped input");
        Ok(out)
    } else {
        Ok(bytes.to_vec())
    }
}

fn extract_from_zip(bytes: &[u8], entry_name: &str) -> Result<Vec<u8>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).context("opening zip archive")?;

    let names: Vec<String> = archive.file_names().map(str::to_string).collect();
    let name = if names.iter().any(|n| n == entry_name) {
        entry_name.to_string()
    } else {
        names
            .into_iter()
            .find(|n| n.ends_with(".csv"))
            .ok_or_else(|| anyhow!("zip archive has no '{entry_name}' or other .csv entry"))?
    };

    let mut file = archive
        .by_name(&name)
        .with_context(|| format!("reading '{name}' from zip archive"))?;

    let mut out = Vec::with_capacity(file.size() as usize);
    file.read_to_end(&mut out)?;

    debug!(entry = %name, bytes = out.len(), "Extracted zip entry");
    Ok(out)
}
