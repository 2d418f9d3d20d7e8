use thiserror::Error;

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("telemetry initialization failed: {0}")]
    Telemetry(String),
    #[error("catalog `{path}` is invalid: {message}")]
    Catalog { path: String, message: String },
    #[error("failed to load templates from `{dir}`: {message}")]
    Templates { dir: String, message: String },
}

impl InfraError {
    pub fn telemetry(message: impl Into<String>) -> Self {
        Self::Telemetry(message.into())
    }

    pub fn catalog(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Catalog {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn templates(dir: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Templates {
            dir: dir.into(),
            message: message.into(),
        }
    }
}
