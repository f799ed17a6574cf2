use xxhash_rust::xxh3::xxh3_128;

use crate::combine::product::Combination;
use crate::encode::jpeg::encode_jpeg;
use crate::foundation::core::Raster;
use crate::foundation::error::LayermixResult;

/// Extension of every output file.
pub const OUTPUT_EXTENSION: &str = "jpg";

/// Raw bytes of the layer paths in category order, joined by a single space.
///
/// These bytes are the only input to [`output_identifier`]. Paths are taken verbatim
/// (UTF-8 for UTF-8 paths), so file names that are not valid UTF-8 still hash apart.
pub fn naming_key(combo: &Combination) -> Vec<u8> {
    let mut key = Vec::new();
    for (i, path) in combo.paths().enumerate() {
        if i > 0 {
            key.push(b' ');
        }
        key.extend_from_slice(path.as_os_str().as_encoded_bytes());
    }
    key
}

/// Lowercase hex XXH3-128 digest of `key` (32 characters).
pub fn identifier_for_key(key: impl AsRef<[u8]>) -> String {
    format!("{:032x}", xxh3_128(key.as_ref()))
}

/// Content-addressed identifier of a combination; a pure function of its ordered paths.
pub fn output_identifier(combo: &Combination) -> String {
    identifier_for_key(&naming_key(combo))
}

/// `<identifier>.jpg`
pub fn output_file_name(combo: &Combination) -> String {
    format!("{}.{OUTPUT_EXTENSION}", output_identifier(combo))
}

/// Encoded output for one combination, ready for an [`ArtifactSink`](crate::ArtifactSink).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputArtifact {
    /// Content-addressed identifier (file stem).
    pub identifier: String,
    /// Encoded JPEG bytes.
    pub bytes: Vec<u8>,
}

impl OutputArtifact {
    /// Encode `raster` under the identifier derived from `combo`.
    pub fn encode(combo: &Combination, raster: &Raster, quality: u8) -> LayermixResult<Self> {
        Ok(Self {
            identifier: output_identifier(combo),
            bytes: encode_jpeg(raster, quality)?,
        })
    }

    /// `<identifier>.jpg`
    pub fn file_name(&self) -> String {
        format!("{}.{OUTPUT_EXTENSION}", self.identifier)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/naming.rs"]
mod tests;
