/// Default read size when hashing content from a reader or file.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Upper bound on the read size; larger requests are clamped to it.
pub use ni_verify::MAX_CHUNK_SIZE;

/// Configuration for [`NiEngine`](crate::NiEngine).
///
/// # Examples
///
/// ```
/// use ni_name::EngineOptions;
///
/// let options = EngineOptions::default().chunk_size(64 * 1024);
/// assert_eq!(options.chunk_size, 64 * 1024);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Octets read per call while hashing. Bounds peak memory regardless of
    /// content size; zero is treated as one and anything above
    /// [`MAX_CHUNK_SIZE`] as that maximum.
    pub chunk_size: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl EngineOptions {
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    pub(crate) fn effective_chunk_size(&self) -> usize { self.chunk_size.clamp(1, MAX_CHUNK_SIZE) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_chunk_size() {
        assert_eq!(EngineOptions::default().chunk_size, 1024);
    }

    #[test]
    fn test_zero_chunk_size_is_clamped() {
        assert_eq!(EngineOptions::default().chunk_size(0).effective_chunk_size(), 1);
    }

    #[test]
    fn test_huge_chunk_size_is_clamped() {
        let options = EngineOptions::default().chunk_size(usize::MAX / 2);
        assert_eq!(options.effective_chunk_size(), MAX_CHUNK_SIZE);
        assert_eq!(options.chunk_size(MAX_CHUNK_SIZE).effective_chunk_size(), MAX_CHUNK_SIZE);
    }
}
