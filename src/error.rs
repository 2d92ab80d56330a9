use thiserror::Error;

#[derive(Error, Debug)]
pub enum SdkError {
    #[error("JSON serialization failed: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("malformed JSON in {context}: {source}")]
    MalformedJson {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid UTF-8 in {context}")]
    MalformedUtf8 {
        context: &'static str,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("protobuf decode failed: {0}")]
    ProtoDecode(#[from] prost::DecodeError),

    #[error("invalid fee-per-byte amount: {0}")]
    InvalidFeeQuote(String),

    #[error("query failed: {0}")]
    Query(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, SdkError>;
