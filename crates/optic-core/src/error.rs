use thiserror::Error;

/// Errors raised while turning a prescription document into a lens system.
///
/// All variants are parse-time failures. Compilation and block filling operate
/// on an already-built system and never produce them.
#[derive(Debug, Error)]
pub enum PrescriptionError {
    #[error("Failed to parse prescription JSON: {0}")]
    ParseError(String),

    #[error("Record {index}: unknown element type '{tag}' (expected O, A or S)")]
    UnknownElementType { index: usize, tag: String },

    #[error("Record {index}: field '{field}' {reason}")]
    MalformedRecord {
        index: usize,
        field: &'static str,
        reason: String,
    },

    #[error("Failed to read prescription file: {0}")]
    Io(#[from] std::io::Error),
}
