use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("thread pool error: {0}")]
    ThreadPool(String),
    #[error("event queue emptied while stepping")]
    EmptyQueue,
    #[error("output error: {0}")]
    Io(#[from] std::io::Error),
}

impl SimError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}

#[cfg(feature = "python")]
impl From<SimError> for pyo3::PyErr {
    fn from(err: SimError) -> Self {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}
