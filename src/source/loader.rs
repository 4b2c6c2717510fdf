use std::io::Read as _;
use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{ExportError, ExportResult};

/// Read a gzip-compressed text document (e.g. a `.tgs` sticker) into a UTF-8 string.
pub(crate) fn read_gzip_text(path: &Path) -> ExportResult<String> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("open compressed document '{}'", path.display()))
        .map_err(|e| ExportError::load(format!("{e:#}")))?;

    let mut raw = Vec::new();
    flate2::read::GzDecoder::new(file)
        .read_to_end(&mut raw)
        .map_err(|e| {
            ExportError::load(format!(
                "decompress document '{}': {e}",
                path.display()
            ))
        })?;

    String::from_utf8(raw).map_err(|e| {
        ExportError::load(format!(
            "decompressed document '{}' is not valid UTF-8: {e}",
            path.display()
        ))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/source/loader.rs"]
mod tests;
