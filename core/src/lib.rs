pub mod archive;
pub mod config;
pub mod encoding;
pub mod export;
pub mod formats;
pub mod quality;
pub mod samples;
pub mod session;
pub mod table;
pub mod upload;

#[cfg(test)]
mod integration_tests;

pub use archive::{
    build_bundle, read_bundle, write_bundle, ArchiveError, BundleEntry, Compression,
    BUNDLE_FILE_NAME,
};
pub use config::{ConfigError, EditorConfig, ExportOptions};
pub use encoding::{decode_text, Encoding};
pub use export::{file_name_for, write_language_file, ExportError, ExportOutcome};
pub use formats::properties::{parse, PropertiesHandler};
pub use formats::{language_label, FileFormat, FormatHandler, ParsedFile, PropertyMap};
pub use quality::{
    check_translation, review, suggest_translation, suggestion_sources, CellIssue, CheckOutcome,
    QualityLimits,
};
pub use samples::{sample_batch, sample_files};
pub use session::{EditorSession, SessionError};
pub use table::{
    validate_key, validate_value, CellRef, Row, Table, TableError, DEFAULT_NEW_KEY_PREFIX,
};
pub use upload::{
    from_contents, read_files, settle_all, ReadError, UploadBatch, UploadFailure,
};
