//! Named-information (`ni:` / `nih:`) names for content digests.
//!
//! # Architecture
//!
//! - [`registry`] - Algorithm suites: truncation, encoded length, suite number
//! - [`name`] - Parsing, validation and rendering of names
//! - [`codec`] - base64url and hex-with-check-digit encodings
//! - [`engine`] - Binding digests of files and buffers to names
//! - [`digester`] - Incremental binding for content that arrives in pieces
//!
//! # Example
//!
//! ```
//! use ni_name::{AlgorithmRegistry, Name, NiEngine};
//!
//! let engine = NiEngine::new(AlgorithmRegistry::shared());
//!
//! let mut name: Name = "ni://example.com/sha-256-32".parse().unwrap();
//! engine.generate_buffer(&mut name, b"Hello World!").unwrap();
//! assert_eq!(name.url(), "ni://example.com/sha-256-32;f4OxZQ");
//!
//! engine.verify_buffer(&mut name, b"Hello World!").unwrap();
//! assert!(engine.verify_buffer(&mut name, b"tampered").is_err());
//! ```

pub mod codec;
pub mod digester;
pub mod engine;
mod error;
pub mod name;
mod options;
pub mod registry;

pub use digester::{DigesterState, NiDigester};
pub use engine::{BinaryTaggedDigest, ContentSource, NiEngine, SuiteSelector};
pub use error::{NiError, Result, TranslateError};
pub use name::{Name, NameMatch, Scheme};
pub use options::{DEFAULT_CHUNK_SIZE, EngineOptions, MAX_CHUNK_SIZE};
pub use registry::{AlgorithmRegistry, AlgorithmSuite, HashAlgorithm, STANDARD_SUITES};
