//! Error kinds reported by the decoder.

pub type Result<T> = std::result::Result<T, DecodeError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    /// The buffer is empty or every sample is zero.
    #[error("degenerate input: buffer is empty or silent")]
    DegenerateInput,

    #[error("analysis failure: {0}")]
    AnalysisFailure(String),

    #[error("invalid decoder configuration: {0}")]
    InvalidConfig(String),
}

impl DecodeError {
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        Self::AnalysisFailure(msg.into())
    }

    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

impl From<toml::de::Error> for DecodeError {
    fn from(err: toml::de::Error) -> Self {
        Self::InvalidConfig(err.to_string())
    }
}
