//! Incremental hashing primitives for named-information digests.
//!
//! Provides hash contexts and a hash-while-reading adapter without choosing
//! which algorithms are adequate. Callers pick an algorithm, feed bytes as they
//! move, and take the digest at the end.
//!
//! # Example
//!
//! ```
//! use ni_verify::{HashReader, Sha256Hasher};
//!
//! let data = b"hello world";
//!
//! let mut reader = HashReader::new(&data[..], Sha256Hasher::new());
//! assert_eq!(reader.drain(1024).unwrap(), 11);
//!
//! assert_eq!(reader.into_digest(), Sha256Hasher::digest(b"hello world"));
//! ```

pub use self::error::{Result, VerifyError};
pub use self::hasher::Hasher;
pub use self::reader::{HashReader, MAX_CHUNK_SIZE};

#[cfg(feature = "sha256")]
pub use self::hasher::Sha256Hasher;

mod error;
mod hasher;
mod reader;
