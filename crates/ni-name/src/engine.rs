//! Binding content digests to names.
//!
//! [`NiEngine`] hashes a content source with the algorithm a name selects,
//! then either writes the encoded digest into a template (generate) or checks
//! it against the digest a name already carries (verify). It also produces the
//! URI-free binary tagged form.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use ni_verify::{HashReader, Hasher};
use tracing::{debug, trace};

use crate::codec;
use crate::error::{NiError, Result};
use crate::name::{Name, Scheme};
use crate::options::EngineOptions;
use crate::registry::{AlgorithmRegistry, AlgorithmSuite};

/// Where content to be hashed comes from.
#[derive(Debug, Clone, Copy)]
pub enum ContentSource<'a> {
    File(&'a Path),
    Buffer(&'a [u8]),
}

impl<'a> From<&'a Path> for ContentSource<'a> {
    fn from(path: &'a Path) -> Self { ContentSource::File(path) }
}

impl<'a> From<&'a [u8]> for ContentSource<'a> {
    fn from(buf: &'a [u8]) -> Self { ContentSource::Buffer(buf) }
}

/// Suite selection for the binary tagged form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuiteSelector<'a> {
    Number(u8),
    Token(&'a str),
}

/// One tag octet (suite number) followed by the truncated digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryTaggedDigest {
    pub suite:  u8,
    pub digest: Vec<u8>,
}

impl BinaryTaggedDigest {
    /// Wire form: tag octet then digest, no length prefix.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + self.digest.len());
        out.push(self.suite);
        out.extend_from_slice(&self.digest);
        out
    }

    /// The truncated digest without its tag.
    pub fn as_digest(&self) -> &[u8] { &self.digest }

    pub fn len(&self) -> usize { 1 + self.digest.len() }

    pub fn is_empty(&self) -> bool { false }
}

#[derive(Debug, Clone)]
pub struct NiEngine {
    registry: Arc<AlgorithmRegistry>,
    options:  EngineOptions,
}

impl NiEngine {
    pub fn new(registry: Arc<AlgorithmRegistry>) -> Self {
        Self {
            registry,
            options: EngineOptions::default(),
        }
    }

    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn registry(&self) -> &AlgorithmRegistry { &self.registry }

    pub fn options(&self) -> &EngineOptions { &self.options }

    /// Hash everything `reader` yields, in bounded chunks, and truncate.
    pub fn hash_reader<R: Read>(&self, suite: &AlgorithmSuite, reader: R) -> Result<Vec<u8>> {
        let mut reader = HashReader::new(reader, suite.algorithm.hasher());
        let total = reader.drain(self.options.effective_chunk_size()).map_err(|e| {
            debug!(error = %e, "content read failed");
            NiError::BadFile(e.into_io())
        })?;
        trace!(algorithm = suite.name, bytes = total, "hashed content");
        truncate(suite, reader.into_digest())
    }

    pub fn hash_file(&self, suite: &AlgorithmSuite, path: &Path) -> Result<Vec<u8>> {
        let file = File::open(path).map_err(|e| {
            debug!(path = %path.display(), error = %e, "cannot open content file");
            NiError::BadFile(e)
        })?;
        self.hash_reader(suite, file)
    }

    pub fn hash_buffer(&self, suite: &AlgorithmSuite, buf: &[u8]) -> Result<Vec<u8>> {
        let mut hasher = suite.algorithm.hasher();
        hasher.update(buf);
        trace!(algorithm = suite.name, bytes = buf.len(), "hashed buffer");
        truncate(suite, hasher.finalize())
    }

    pub fn hash(&self, suite: &AlgorithmSuite, source: ContentSource<'_>) -> Result<Vec<u8>> {
        match source {
            ContentSource::File(path) => self.hash_file(suite, path),
            ContentSource::Buffer(buf) => self.hash_buffer(suite, buf),
        }
    }

    /// Fill a template name's digest from `source`.
    pub fn generate(&self, name: &mut Name, source: ContentSource<'_>) -> Result<()> {
        if !name.is_validated() {
            name.validate(&self.registry, false)?;
        }
        let (scheme, suite) = resolved(name)?;
        let digest = self.hash(&suite, source)?;
        name.set_params(codec::encode_for(scheme, &digest));
        name.validate(&self.registry, true)?;
        debug!(url = name.url(), "generated name");
        Ok(())
    }

    /// Check that `source` hashes to the digest `name` carries.
    ///
    /// Comparison is on the encoded text. A `nih` name may omit its check
    /// digit.
    pub fn verify(&self, name: &mut Name, source: ContentSource<'_>) -> Result<()> {
        if !name.is_validated() {
            name.validate(&self.registry, true)?;
        }
        let (scheme, suite) = resolved(name)?;
        let computed = codec::encode_for(scheme, &self.hash(&suite, source)?);
        let supplied = name.params();

        if supplied.len() > computed.len() {
            debug!(
                supplied = supplied.len(),
                computed = computed.len(),
                "supplied digest too long"
            );
            return Err(NiError::HashTooLong);
        }
        if computed == supplied {
            return Ok(());
        }
        let without_check = computed.rsplit_once(';').map(|(hex, _)| hex);
        if scheme == Scheme::Nih && without_check == Some(supplied) {
            return Ok(());
        }
        debug!(url = name.url(), "digest mismatch");
        Err(NiError::BadHash)
    }

    pub fn generate_file(&self, name: &mut Name, path: impl AsRef<Path>) -> Result<()> {
        self.generate(name, ContentSource::File(path.as_ref()))
    }

    pub fn generate_buffer(&self, name: &mut Name, buf: &[u8]) -> Result<()> {
        self.generate(name, ContentSource::Buffer(buf))
    }

    pub fn verify_file(&self, name: &mut Name, path: impl AsRef<Path>) -> Result<()> {
        self.verify(name, ContentSource::File(path.as_ref()))
    }

    pub fn verify_buffer(&self, name: &mut Name, buf: &[u8]) -> Result<()> {
        self.verify(name, ContentSource::Buffer(buf))
    }

    /// Tag octet plus truncated digest of `source`. Only suites carrying a
    /// suite number can be tagged.
    pub fn binary_tagged(
        &self,
        selector: SuiteSelector<'_>,
        source: ContentSource<'_>,
    ) -> Result<BinaryTaggedDigest> {
        let suite = match selector {
            SuiteSelector::Number(n) => self.registry.by_suite_number(n),
            SuiteSelector::Token(token) => self.registry.resolve(token, true),
        };
        let Some((suite, number)) = suite.and_then(|s| Some((*s, s.suite?))) else {
            debug!(?selector, "no numbered suite for selector");
            return Err(NiError::BadAlg);
        };
        let digest = self.hash(&suite, source)?;
        Ok(BinaryTaggedDigest {
            suite: number,
            digest,
        })
    }

    pub fn binary_tagged_file(
        &self,
        selector: SuiteSelector<'_>,
        path: impl AsRef<Path>,
    ) -> Result<BinaryTaggedDigest> {
        self.binary_tagged(selector, ContentSource::File(path.as_ref()))
    }

    pub fn binary_tagged_buffer(
        &self,
        selector: SuiteSelector<'_>,
        buf: &[u8],
    ) -> Result<BinaryTaggedDigest> {
        self.binary_tagged(selector, ContentSource::Buffer(buf))
    }
}

fn resolved(name: &Name) -> Result<(Scheme, AlgorithmSuite)> {
    match (name.scheme(), name.suite()) {
        (Some(scheme), Some(suite)) => Ok((scheme, *suite)),
        _ => Err(NiError::BadAlg),
    }
}

/// Check the primitive's output length, then keep the suite's prefix.
pub(crate) fn truncate(suite: &AlgorithmSuite, mut digest: Vec<u8>) -> Result<Vec<u8>> {
    if digest.len() != suite.digest_len {
        debug!(
            expected = suite.digest_len,
            actual = digest.len(),
            "hash output has unexpected length"
        );
        return Err(NiError::HashFail {
            expected: suite.digest_len,
            actual:   digest.len(),
        });
    }
    digest.truncate(suite.truncated_len);
    Ok(digest)
}
