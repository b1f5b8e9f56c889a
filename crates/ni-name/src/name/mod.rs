//! Parsing and validation of `ni` and `nih` names.
//!
//! A [`Name`] is built from a URI string or from its components, mutated while
//! a digest is bound to it, and checked with [`Name::validate`]. Accessors that
//! depend on the algorithm suite only answer for a validated name, and every
//! mutation drops the validated flag again.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::error::{NiError, Result};
use crate::registry::{AlgorithmRegistry, AlgorithmSuite, HashAlgorithm};

mod translate;
pub(crate) mod uri;

use uri::UriParts;

/// The two named-information schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    /// Network form: optional authority, base64url digest.
    Ni,
    /// Human form: no authority or query, hex digest with check digit.
    Nih,
}

impl Scheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Ni => "ni",
            Scheme::Nih => "nih",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "ni" => Some(Scheme::Ni),
            "nih" => Some(Scheme::Nih),
            _ => None,
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Outcome of [`Name::compare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameMatch {
    Same,
    DifferentAlgorithm,
    DifferentDigest,
}

/// An `ni:` or `nih:` name.
#[derive(Debug, Clone)]
pub struct Name {
    url:       String,
    parts:     UriParts,
    suite:     Option<AlgorithmSuite>,
    validated: bool,
}

impl Name {
    /// Parse a URI string. Only the presence of a scheme is checked here; call
    /// [`Name::validate`] for everything else.
    pub fn from_uri(uri: &str) -> Result<Self> {
        let parts = uri::split(uri).ok_or_else(|| {
            debug!(uri, "not a URI");
            NiError::BadUrl
        })?;
        Ok(Self {
            url: uri.to_string(),
            parts,
            suite: None,
            validated: false,
        })
    }

    /// Build from `[scheme, authority, algorithm, digest?, query?]`.
    /// Fragments cannot be supplied this way.
    pub fn from_components(components: &[&str]) -> Result<Self> {
        let [scheme, authority, algorithm, rest @ ..] = components else {
            debug!(len = components.len(), "too few name components");
            return Err(NiError::BadUrl);
        };
        if rest.len() > 2 {
            debug!(len = components.len(), "too many name components");
            return Err(NiError::BadUrl);
        }
        let parts = UriParts {
            scheme:    scheme.to_ascii_lowercase(),
            authority: authority.to_string(),
            path:      algorithm.to_string(),
            params:    rest.first().map(|s| s.to_string()).unwrap_or_default(),
            query:     rest.get(1).map(|s| s.to_string()).unwrap_or_default(),
            fragment:  String::new(),
        };
        // re-split the rendered form so path and params land exactly where a
        // string parse would put them
        Self::from_uri(&uri::unsplit(&parts))
    }

    /// Check the name against the scheme rules, returning the first failure.
    ///
    /// `expect_params` selects between a template (no digest allowed) and a
    /// complete name (digest required and format checked).
    pub fn validate(&mut self, registry: &AlgorithmRegistry, expect_params: bool) -> Result<()> {
        self.validated = false;
        self.suite = None;

        let Some(scheme) = Scheme::parse(&self.parts.scheme) else {
            debug!(url = %self.url, "scheme is not ni or nih");
            return Err(NiError::BadScheme);
        };
        if scheme == Scheme::Nih && !self.parts.authority.is_empty() {
            debug!(url = %self.url, "nih name has authority");
            return Err(NiError::NoAuthority);
        }
        let (dir, file) = uri::split_path(&self.parts.path);
        if !dir.is_empty() {
            debug!(url = %self.url, dir, "non-empty directory in path");
            return Err(NiError::BadUrl);
        }
        let Some(suite) = registry.resolve(file, scheme == Scheme::Nih).copied() else {
            debug!(url = %self.url, algorithm = file, "unknown hash algorithm");
            return Err(NiError::BadAlg);
        };
        if expect_params == self.parts.params.is_empty() {
            debug!(url = %self.url, expect_params, "params presence mismatch");
            return Err(NiError::BadUrl);
        }
        if scheme == Scheme::Nih && !self.parts.query.is_empty() {
            debug!(url = %self.url, "nih name has query");
            return Err(NiError::NoQuery);
        }
        if !self.parts.fragment.is_empty() {
            debug!(url = %self.url, "name has fragment");
            return Err(NiError::NoFrag);
        }
        if expect_params {
            check_params(scheme, &suite, &self.parts.params)?;
        }

        self.suite = Some(suite);
        self.validated = true;
        Ok(())
    }

    /// Rebuild the URI from the components and clear the validated flag.
    pub fn regenerate(&mut self) {
        self.url = uri::unsplit(&self.parts);
        self.validated = false;
        self.suite = None;
    }

    pub fn is_validated(&self) -> bool { self.validated }

    /// Recognised scheme, if any.
    pub fn scheme(&self) -> Option<Scheme> { Scheme::parse(&self.parts.scheme) }

    /// Scheme text as written (lowercased).
    pub fn scheme_str(&self) -> &str { &self.parts.scheme }

    pub fn authority(&self) -> &str { &self.parts.authority }

    pub fn path(&self) -> &str { &self.parts.path }

    /// Algorithm token as written: the final path segment.
    pub fn algorithm_token(&self) -> &str { uri::split_path(&self.parts.path).1 }

    /// Digest parameter; empty for a template.
    pub fn params(&self) -> &str { &self.parts.params }

    pub fn query(&self) -> &str { &self.parts.query }

    pub fn fragment(&self) -> &str { &self.parts.fragment }

    pub fn url(&self) -> &str { &self.url }

    /// Resolved suite. `None` until validated.
    pub fn suite(&self) -> Option<&AlgorithmSuite> {
        self.suite.as_ref().filter(|_| self.validated)
    }

    /// Registry token of the resolved suite, even when written as a suite number.
    pub fn algorithm_name(&self) -> Option<&'static str> { self.suite().map(|s| s.name) }

    pub fn hash_algorithm(&self) -> Option<HashAlgorithm> { self.suite().map(|s| s.algorithm) }

    pub fn digest_len(&self) -> Option<usize> { self.suite().map(|s| s.digest_len) }

    pub fn truncated_len(&self) -> Option<usize> { self.suite().map(|s| s.truncated_len) }

    pub fn encoded_len(&self) -> Option<usize> { self.suite().map(|s| s.encoded_len) }

    pub fn set_params(&mut self, params: impl Into<String>) {
        self.parts.params = params.into();
        self.regenerate();
    }

    /// Replace the authority. `nih` names only accept an empty one.
    pub fn set_authority(&mut self, authority: impl Into<String>) -> Result<()> {
        let authority = authority.into();
        if self.scheme() == Some(Scheme::Nih) && !authority.is_empty() {
            return Err(NiError::NoAuthority);
        }
        self.parts.authority = authority;
        self.regenerate();
        Ok(())
    }

    /// Replace the query string. `nih` names only accept an empty one.
    pub fn set_query(&mut self, query: impl Into<String>) -> Result<()> {
        let query = query.into();
        if self.scheme() == Some(Scheme::Nih) && !query.is_empty() {
            return Err(NiError::NoQuery);
        }
        self.parts.query = query;
        self.regenerate();
        Ok(())
    }

    /// `http://{authority}/.well-known/ni/{algorithm}/{digest}` for a complete
    /// name. Validates first when needed; `None` if that fails or there is no
    /// digest.
    pub fn well_known_url(&mut self, registry: &AlgorithmRegistry) -> Option<String> {
        if !self.validated {
            self.validate(registry, true).ok()?;
        } else if self.parts.params.is_empty() {
            return None;
        }
        let parts = UriParts {
            scheme:    "http".to_string(),
            authority: self.parts.authority.clone(),
            path:      format!("/.well-known/ni/{}/{}", self.algorithm_token(), self.parts.params),
            params:    String::new(),
            query:     self.parts.query.clone(),
            fragment:  self.parts.fragment.clone(),
        };
        Some(uri::unsplit(&parts))
    }

    /// Compare algorithm and digest only. Algorithms are compared after
    /// resolving suite numbers, so `nih:6;…` and `nih:sha-256-32;…` agree.
    pub fn compare(&self, other: &Name, registry: &AlgorithmRegistry) -> NameMatch {
        let resolve = |n: &Name| {
            registry
                .resolve(n.algorithm_token(), n.scheme() == Some(Scheme::Nih))
                .map(|s| s.name)
        };
        if resolve(self) != resolve(other) {
            NameMatch::DifferentAlgorithm
        } else if self.parts.params != other.parts.params {
            NameMatch::DifferentDigest
        } else {
            NameMatch::Same
        }
    }
}

fn check_params(scheme: Scheme, suite: &AlgorithmSuite, params: &str) -> Result<()> {
    match scheme {
        Scheme::Ni => {
            if params.len() != suite.encoded_len {
                debug!(len = params.len(), expected = suite.encoded_len, "ni params wrong length");
                return Err(NiError::BadParams);
            }
            if !params.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_') {
                debug!(params, "ni params use characters outside base64url");
                return Err(NiError::BadParams);
            }
        }
        Scheme::Nih => {
            let hex_len = suite.hex_len();
            if params.len() != hex_len && params.len() != hex_len + 2 {
                debug!(len = params.len(), expected = hex_len, "nih params wrong length");
                return Err(NiError::BadParams);
            }
            let (hex, check) = match params.split_once(';') {
                Some((hex, check)) => (hex, Some(check)),
                None => (params, None),
            };
            let lower_hex = |s: &str| s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
            let bad_check = check.is_some_and(|c| c.len() != 1 || !lower_hex(c));
            if hex.len() != hex_len || !lower_hex(hex) || bad_check {
                debug!(params, "nih params not lowercase hex with optional check digit");
                return Err(NiError::BadParams);
            }
        }
    }
    Ok(())
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.url) }
}

impl FromStr for Name {
    type Err = NiError;

    fn from_str(s: &str) -> Result<Self> { Self::from_uri(s) }
}
