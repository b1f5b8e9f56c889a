//! Incremental name generation.
//!
//! [`NiDigester`] binds a template name, accepts content in pieces as it
//! arrives, and writes the digest into the name at the end. Content never has
//! to be held in full.

use std::fmt;
use std::io;
use std::sync::Arc;

use ni_verify::Hasher;
use tracing::{debug, trace};

use crate::codec;
use crate::engine;
use crate::error::{NiError, Result};
use crate::name::{Name, Scheme};
use crate::registry::{AlgorithmRegistry, AlgorithmSuite};

/// Lifecycle of a [`NiDigester`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigesterState {
    /// No template bound.
    Unbound,
    /// Template bound, accepting content.
    Open,
    /// Digest written into the name.
    Finalized,
}

struct Session {
    name:   Name,
    scheme: Scheme,
    suite:  AlgorithmSuite,
    hasher: Box<dyn Hasher>,
}

pub struct NiDigester {
    registry: Arc<AlgorithmRegistry>,
    session:  Option<Session>,
    result:   Option<(Name, Vec<u8>)>,
    bytes:    u64,
}

impl NiDigester {
    pub fn new(registry: Arc<AlgorithmRegistry>) -> Self {
        Self {
            registry,
            session: None,
            result: None,
            bytes: 0,
        }
    }

    pub fn state(&self) -> DigesterState {
        match (&self.session, &self.result) {
            (Some(_), _) => DigesterState::Open,
            (None, Some(_)) => DigesterState::Finalized,
            (None, None) => DigesterState::Unbound,
        }
    }

    /// Bind a template (a name without digest). Only allowed when unbound; a
    /// template that fails validation leaves the digester unbound.
    pub fn bind(&mut self, template: &str) -> Result<()> {
        if self.state() != DigesterState::Unbound {
            return Err(NiError::DigesterState("bind requires an unbound digester"));
        }
        let mut name = Name::from_uri(template)?;
        name.validate(&self.registry, false)?;
        let (Some(scheme), Some(suite)) = (name.scheme(), name.suite().copied()) else {
            return Err(NiError::BadAlg);
        };
        debug!(template, algorithm = suite.name, "digester bound");
        self.bytes = 0;
        self.session = Some(Session {
            name,
            scheme,
            suite,
            hasher: suite.algorithm.hasher(),
        });
        Ok(())
    }

    pub fn update(&mut self, data: &[u8]) -> Result<()> {
        let Some(session) = self.session.as_mut() else {
            return Err(NiError::DigesterState("update requires an open digester"));
        };
        session.hasher.update(data);
        self.bytes += data.len() as u64;
        trace!(len = data.len(), total = self.bytes, "digester update");
        Ok(())
    }

    /// Finish hashing and write the encoded digest into the bound name.
    ///
    /// On failure the session is discarded and the digester returns to
    /// [`DigesterState::Unbound`].
    pub fn finalize(&mut self) -> Result<&Name> {
        let Some(session) = self.session.take() else {
            return Err(NiError::DigesterState("finalize requires an open digester"));
        };
        let Session {
            mut name,
            scheme,
            suite,
            hasher,
        } = session;

        let digest = engine::truncate(&suite, hasher.finalize())?;
        name.set_params(codec::encode_for(scheme, &digest));
        name.validate(&self.registry, true)?;
        debug!(url = name.url(), bytes = self.bytes, "digester finalized");

        Ok(&self.result.insert((name, digest)).0)
    }

    /// Drop any session or result and return to [`DigesterState::Unbound`].
    pub fn reset(&mut self) {
        self.session = None;
        self.result = None;
        self.bytes = 0;
    }

    /// The truncated digest. Only available once finalized.
    pub fn digest(&self) -> Option<&[u8]> { self.result.as_ref().map(|(_, d)| d.as_slice()) }

    /// The completed URI. Only available once finalized.
    pub fn url(&self) -> Option<&str> { self.result.as_ref().map(|(n, _)| n.url()) }

    /// The bound or finalized name.
    pub fn name(&self) -> Option<&Name> {
        match (&self.session, &self.result) {
            (Some(s), _) => Some(&s.name),
            (None, Some((n, _))) => Some(n),
            (None, None) => None,
        }
    }

    /// Length of the encoded digest for the bound suite.
    pub fn encoded_len(&self) -> Option<usize> {
        let suite = match (&self.session, &self.result) {
            (Some(s), _) => Some(&s.suite),
            (None, Some((n, _))) => n.suite(),
            (None, None) => None,
        }?;
        Some(suite.encoded_len)
    }

    pub fn bytes_processed(&self) -> u64 { self.bytes }
}

impl fmt::Debug for NiDigester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NiDigester")
            .field("state", &self.state())
            .field("url", &self.name().map(Name::url))
            .field("bytes", &self.bytes)
            .field("digest", &self.digest().map(hex::encode))
            .finish_non_exhaustive()
    }
}

impl io::Write for NiDigester {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.update(buf).map_err(|e| io::Error::other(e.to_string()))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> { Ok(()) }
}
