use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    /// An error in the program being run.
    #[error("{msg}")]
    Generic { line: u32, msg: String },
    /// The host failed to write program output. Not the program's fault.
    #[error("failed to write program output")]
    Io(#[from] std::io::Error),
}

impl RuntimeError {
    pub fn error(line: u32, msg: impl Into<String>) -> Self {
        Self::Generic { line, msg: msg.into() }
    }
}
