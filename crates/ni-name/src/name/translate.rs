//! Conversion of complete names between the `ni` and `nih` forms.
//!
//! These are the only places digests are decoded. Verification never decodes;
//! it re-encodes the computed digest and compares text.

use super::uri::{self, UriParts};
use super::{Name, Scheme};
use crate::codec;
use crate::error::TranslateError;
use crate::registry::AlgorithmSuite;

type Result<T> = std::result::Result<T, TranslateError>;

impl Name {
    fn translatable(&self) -> Result<(Scheme, AlgorithmSuite)> {
        let (Some(scheme), Some(suite)) = (self.scheme(), self.suite()) else {
            return Err(TranslateError::Unvalidated);
        };
        if self.parts.params.is_empty() {
            return Err(TranslateError::EmptyParams);
        }
        Ok((scheme, *suite))
    }

    /// Digest in `ni` form (unpadded base64url). A `nih` check digit is dropped.
    pub fn ni_digest(&self) -> Result<String> {
        let (scheme, _) = self.translatable()?;
        let params = &self.parts.params;
        match scheme {
            Scheme::Ni => Ok(params.clone()),
            Scheme::Nih => {
                let hex = params.split_once(';').map_or(params.as_str(), |(hex, _)| hex);
                let raw = codec::decode_hex(hex).ok_or(TranslateError::Decode)?;
                Ok(codec::encode_base64url(&raw))
            }
        }
    }

    /// Digest in `nih` form (hex with check digit).
    pub fn nih_digest(&self) -> Result<String> {
        let (scheme, _) = self.translatable()?;
        match scheme {
            Scheme::Nih => Ok(self.parts.params.clone()),
            Scheme::Ni => {
                if !self.parts.authority.is_empty() || !self.parts.query.is_empty() {
                    return Err(TranslateError::AuthorityOrQuery);
                }
                let raw =
                    codec::decode_base64url(&self.parts.params).ok_or(TranslateError::Decode)?;
                Ok(codec::encode_hex_with_check_digit(&raw))
            }
        }
    }

    /// The name in `ni` form, keeping authority and query.
    pub fn url_as_ni(&self) -> Result<String> {
        let (scheme, suite) = self.translatable()?;
        if scheme == Scheme::Ni {
            return Ok(self.url.clone());
        }
        Ok(uri::unsplit(&UriParts {
            scheme: Scheme::Ni.as_str().to_string(),
            authority: self.parts.authority.clone(),
            path: format!("/{}", suite.name),
            params: self.ni_digest()?,
            query: self.parts.query.clone(),
            fragment: self.parts.fragment.clone(),
        }))
    }

    /// The name in `nih` form. Fails for `ni` names carrying authority or query.
    pub fn url_as_nih(&self) -> Result<String> {
        let (scheme, suite) = self.translatable()?;
        if scheme == Scheme::Nih {
            return Ok(self.url.clone());
        }
        Ok(uri::unsplit(&UriParts {
            scheme: Scheme::Nih.as_str().to_string(),
            path: suite.name.to_string(),
            params: self.nih_digest()?,
            ..UriParts::default()
        }))
    }

    /// `ni:///{algorithm};{digest}` with no authority or query.
    pub fn canonical_ni_url(&self) -> Result<String> {
        let (_, suite) = self.translatable()?;
        Ok(uri::unsplit(&UriParts {
            scheme: Scheme::Ni.as_str().to_string(),
            path: format!("/{}", suite.name),
            params: self.ni_digest()?,
            ..UriParts::default()
        }))
    }

    /// Rewrite a `nih` name in place as `ni`. The result must be validated again.
    pub fn convert_to_ni(&mut self) -> Result<&str> {
        let (scheme, suite) = self.translatable()?;
        if scheme == Scheme::Nih {
            self.parts.params = self.ni_digest()?;
            self.parts.scheme = Scheme::Ni.as_str().to_string();
            self.parts.path = format!("/{}", suite.name);
            self.regenerate();
        }
        Ok(self.url.as_str())
    }
}
