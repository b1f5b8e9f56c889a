use std::io;

/// Failure statuses of name validation and digest operations.
///
/// Success is `Ok(..)`; every other outcome is one of these variants. The
/// display text of each variant is the status text shown to users.
#[derive(Debug, thiserror::Error)]
pub enum NiError {
    #[error("Name does not contain recognized hash algorithm selector")]
    BadAlg,

    #[error("Unable to open content file")]
    BadFile(#[source] io::Error),

    #[error("Hash code in name does not match hash code of content")]
    BadHash,

    #[error("Hash code in name is longer than it should be")]
    HashTooLong,

    #[error("Hash function output has unexpected length (expected {expected}, got {actual})")]
    HashFail { expected: usize, actual: usize },

    #[error("Scheme in URL is not ni: or nih:")]
    BadScheme,

    #[error("Params part of URL is wrong length or bad format")]
    BadParams,

    #[error("Name contains a fragment component - not allowed")]
    NoFrag,

    #[error("Names in nih scheme should not have authority")]
    NoAuthority,

    #[error("Names in nih scheme should not have query")]
    NoQuery,

    #[error("URL is not in expected form")]
    BadUrl,

    #[error("digester cannot accept this call: {0}")]
    DigesterState(&'static str),
}

impl NiError {
    /// Stable numeric code, usable as a process exit status (0 is success).
    pub fn code(&self) -> u8 {
        match self {
            NiError::BadAlg => 1,
            NiError::BadFile(_) => 2,
            NiError::BadHash => 3,
            NiError::HashTooLong => 4,
            NiError::HashFail { .. } => 5,
            NiError::BadScheme => 6,
            NiError::BadParams => 7,
            NiError::NoFrag => 8,
            NiError::NoAuthority => 9,
            NiError::NoQuery => 10,
            NiError::BadUrl => 11,
            NiError::DigesterState(_) => 12,
        }
    }
}

pub type Result<T> = std::result::Result<T, NiError>;

/// Failures converting a name between the `ni` and `nih` forms.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranslateError {
    #[error("cannot translate an unvalidated name")]
    Unvalidated,

    #[error("cannot translate a name with empty params")]
    EmptyParams,

    #[error("nih names cannot carry an authority or query")]
    AuthorityOrQuery,

    #[error("digest in params cannot be decoded")]
    Decode,
}
