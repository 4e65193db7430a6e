use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("Document has no pages")]
    EmptyDocument,

    #[error("Failed to encode page content: {0}")]
    ContentError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}
