#[cfg(feature = "sha256")]
use sha2::Digest;

/// Incremental hash context.
///
/// `finalize_boxed` keeps the trait usable behind `Box<dyn Hasher>`, which is
/// how algorithm tables hand out contexts without knowing the concrete type.
pub trait Hasher: Send {
    fn update(&mut self, data: &[u8]);

    fn finalize_boxed(self: Box<Self>) -> Vec<u8>;

    fn finalize(self) -> Vec<u8>
    where
        Self: Sized,
    {
        Box::new(self).finalize_boxed()
    }
}

impl Hasher for Box<dyn Hasher> {
    fn update(&mut self, data: &[u8]) { (**self).update(data); }

    fn finalize_boxed(self: Box<Self>) -> Vec<u8> { <dyn Hasher as Hasher>::finalize_boxed(*self) }
}

#[cfg(feature = "sha256")]
#[derive(Clone)]
pub struct Sha256Hasher(sha2::Sha256);

#[cfg(feature = "sha256")]
impl Hasher for Sha256Hasher {
    fn update(&mut self, data: &[u8]) { Digest::update(&mut self.0, data); }

    fn finalize_boxed(self: Box<Self>) -> Vec<u8> { self.0.finalize().to_vec() }
}

#[cfg(feature = "sha256")]
impl Default for Sha256Hasher {
    fn default() -> Self { Self::new() }
}

#[cfg(feature = "sha256")]
impl Sha256Hasher {
    pub fn new() -> Self { Self(sha2::Sha256::new()) }

    pub fn digest(data: &[u8]) -> Vec<u8> { sha2::Sha256::digest(data).to_vec() }
}

#[cfg(all(test, feature = "sha256"))]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hasher() {
        let mut hasher = Sha256Hasher::new();
        hasher.update(b"hello world");
        let hash = hasher.finalize();

        let expected =
            hex::decode("b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9")
                .unwrap();
        assert_eq!(hash, expected);
    }

    #[test]
    fn test_boxed_hasher_matches_one_shot() {
        let mut hasher: Box<dyn Hasher> = Box::new(Sha256Hasher::new());
        hasher.update(b"hello ");
        hasher.update(b"world");

        assert_eq!(hasher.finalize(), Sha256Hasher::digest(b"hello world"));
    }
}
