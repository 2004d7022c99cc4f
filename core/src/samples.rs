//! Built-in sample files for trying the editor without uploads

use crate::formats::ParsedFile;
use crate::upload::{from_contents, UploadBatch};

const SAMPLES: [(&str, &str); 3] = [
    ("en.properties", include_str!("../samples/en.properties")),
    ("de.properties", include_str!("../samples/de.properties")),
    ("fr.properties", include_str!("../samples/fr.properties")),
];

/// The sample files as an upload batch (en, de, fr).
pub fn sample_batch() -> UploadBatch {
    from_contents(
        SAMPLES
            .iter()
            .map(|(name, content)| (*name, content.as_bytes().to_vec())),
    )
}

pub fn sample_files() -> Vec<ParsedFile> {
    sample_batch().files
}
