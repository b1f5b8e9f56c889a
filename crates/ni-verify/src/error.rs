use std::io;

#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    /// The source failed after `bytes_read` octets had been hashed.
    #[error("content read failed after {bytes_read} bytes")]
    Read {
        bytes_read: u64,
        #[source]
        source:     io::Error,
    },
}

impl VerifyError {
    pub fn into_io(self) -> io::Error {
        match self {
            VerifyError::Read { source, .. } => source,
        }
    }
}

pub type Result<T> = std::result::Result<T, VerifyError>;
