//! Supported digest algorithms and their truncation/encoding parameters.
//!
//! The registry is an immutable table built once and shared behind an
//! [`Arc`]. The suite-number index used by `nih` names is derived from the
//! table on first use and published exactly once, even when several threads
//! race to build it.

use std::collections::BTreeMap;
use std::sync::Arc;

use ni_verify::{Hasher, Sha256Hasher};
use once_cell::sync::{Lazy, OnceCell};
use tracing::{trace, warn};

/// Underlying hash primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    Sha256,
}

impl HashAlgorithm {
    /// Full (untruncated) output length in octets.
    pub const fn digest_len(self) -> usize {
        match self {
            HashAlgorithm::Sha256 => 32,
        }
    }

    /// Open a fresh hash context.
    pub fn hasher(self) -> Box<dyn Hasher> {
        match self {
            HashAlgorithm::Sha256 => Box::new(Sha256Hasher::new()),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha-256",
        }
    }
}

/// Length of the unpadded base64 encoding of `n` octets.
pub const fn unpadded_base64_len(n: usize) -> usize { (n * 4).div_ceil(3) }

/// One registered (algorithm, truncation, encoding) combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlgorithmSuite {
    /// Token used in the path of a name, e.g. `sha-256-32`.
    pub name:          &'static str,
    pub algorithm:     HashAlgorithm,
    /// Octets produced by the hash primitive before truncation.
    pub digest_len:    usize,
    /// Octets kept after truncation.
    pub truncated_len: usize,
    /// Characters in the unpadded base64url form of the truncated digest.
    pub encoded_len:   usize,
    /// Numeric alias accepted by `nih` names and used as the binary tag.
    pub suite:         Option<u8>,
}

impl AlgorithmSuite {
    pub const fn new(
        name: &'static str,
        algorithm: HashAlgorithm,
        truncated_len: usize,
        suite: Option<u8>,
    ) -> Self {
        Self {
            name,
            algorithm,
            digest_len: algorithm.digest_len(),
            truncated_len,
            encoded_len: unpadded_base64_len(truncated_len),
            suite,
        }
    }

    /// Characters in the hex form of the truncated digest, without check digit.
    pub const fn hex_len(&self) -> usize { 2 * self.truncated_len }

    /// Truncation never exceeds the digest and the encoded length matches it.
    pub fn is_consistent(&self) -> bool {
        self.truncated_len <= self.digest_len
            && self.encoded_len == unpadded_base64_len(self.truncated_len)
    }
}

/// The interoperable suite table.
pub const STANDARD_SUITES: [AlgorithmSuite; 6] = [
    AlgorithmSuite::new("sha-256", HashAlgorithm::Sha256, 32, Some(1)),
    AlgorithmSuite::new("sha-256-128", HashAlgorithm::Sha256, 16, Some(2)),
    AlgorithmSuite::new("sha-256-120", HashAlgorithm::Sha256, 15, Some(3)),
    AlgorithmSuite::new("sha-256-96", HashAlgorithm::Sha256, 12, Some(4)),
    AlgorithmSuite::new("sha-256-64", HashAlgorithm::Sha256, 8, Some(5)),
    AlgorithmSuite::new("sha-256-32", HashAlgorithm::Sha256, 4, Some(6)),
];

static SHARED: Lazy<Arc<AlgorithmRegistry>> = Lazy::new(|| Arc::new(AlgorithmRegistry::standard()));

#[derive(Debug)]
pub struct AlgorithmRegistry {
    suites:      BTreeMap<&'static str, AlgorithmSuite>,
    suite_index: OnceCell<BTreeMap<u8, &'static str>>,
}

impl Default for AlgorithmRegistry {
    fn default() -> Self { Self::standard() }
}

impl AlgorithmRegistry {
    /// Registry holding [`STANDARD_SUITES`].
    pub fn standard() -> Self { Self::with_suites(STANDARD_SUITES) }

    /// Registry over a caller supplied table. A repeated token replaces the
    /// earlier entry.
    pub fn with_suites(suites: impl IntoIterator<Item = AlgorithmSuite>) -> Self {
        let suites = suites.into_iter().map(|s| (s.name, s)).collect();
        Self {
            suites,
            suite_index: OnceCell::new(),
        }
    }

    /// Process wide registry of the standard suites.
    pub fn shared() -> Arc<Self> { Arc::clone(&SHARED) }

    pub fn lookup(&self, token: &str) -> Option<&AlgorithmSuite> { self.suites.get(token) }

    pub fn by_suite_number(&self, suite: u8) -> Option<&AlgorithmSuite> {
        let name = self.suite_index().get(&suite)?;
        self.suites.get(name)
    }

    /// Resolve a path token. Numeric aliases are only honoured when
    /// `allow_suite_number` is set (the `nih` scheme).
    pub fn resolve(&self, token: &str, allow_suite_number: bool) -> Option<&AlgorithmSuite> {
        if let Some(suite) = self.lookup(token) {
            return Some(suite);
        }
        if !allow_suite_number {
            return None;
        }
        token.parse::<u8>().ok().and_then(|n| self.by_suite_number(n))
    }

    /// Suite number to token map, built on first call.
    pub fn suite_index(&self) -> &BTreeMap<u8, &'static str> {
        self.suite_index.get_or_init(|| {
            let mut index = BTreeMap::new();
            for suite in self.suites.values() {
                let Some(number) = suite.suite else { continue };
                if let Some(existing) = index.insert(number, suite.name) {
                    warn!(
                        suite = number,
                        existing,
                        replacement = suite.name,
                        "duplicate suite number"
                    );
                }
            }
            trace!(entries = index.len(), "built suite index");
            index
        })
    }

    /// Known tokens in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ { self.suites.keys().copied() }

    pub fn suites(&self) -> impl Iterator<Item = &AlgorithmSuite> { self.suites.values() }

    /// `"sha-256 (1), sha-256-128 (2), ..."` ordered by suite number.
    pub fn describe(&self) -> String {
        self.suite_index()
            .iter()
            .map(|(number, name)| format!("{name} ({number})"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_values() {
        let reg = AlgorithmRegistry::standard();
        let expect = [
            ("sha-256-32", 4, 6, 6),
            ("sha-256-64", 8, 11, 5),
            ("sha-256-96", 12, 16, 4),
            ("sha-256-120", 15, 20, 3),
            ("sha-256-128", 16, 22, 2),
            ("sha-256", 32, 43, 1),
        ];
        for (name, trunc, enc, suite) in expect {
            let s = reg.lookup(name).unwrap();
            assert_eq!(s.digest_len, 32);
            assert_eq!(s.truncated_len, trunc);
            assert_eq!(s.encoded_len, enc);
            assert_eq!(s.suite, Some(suite));
        }
    }

    #[test]
    fn test_every_suite_is_consistent() {
        for suite in AlgorithmRegistry::standard().suites() {
            assert!(suite.truncated_len <= suite.digest_len, "{}", suite.name);
            assert!(suite.is_consistent(), "{}", suite.name);
        }
    }

    #[test]
    fn test_suite_number_lookup() {
        let reg = AlgorithmRegistry::standard();
        assert_eq!(reg.by_suite_number(6).unwrap().name, "sha-256-32");
        assert_eq!(reg.by_suite_number(1).unwrap().name, "sha-256");
        assert!(reg.by_suite_number(11).is_none());
        assert!(reg.by_suite_number(0).is_none());
    }

    #[test]
    fn test_resolve_numeric_only_when_allowed() {
        let reg = AlgorithmRegistry::standard();
        assert!(reg.resolve("3", false).is_none());
        assert_eq!(reg.resolve("3", true).unwrap().name, "sha-256-120");
        assert!(reg.resolve("300", true).is_none());
        assert!(reg.resolve("sha-512", true).is_none());
    }

    #[test]
    fn test_names_sorted() {
        let names: Vec<_> = AlgorithmRegistry::standard().names().collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
        assert_eq!(names.len(), 6);
    }

    #[test]
    fn test_describe_orders_by_suite() {
        assert_eq!(
            AlgorithmRegistry::standard().describe(),
            concat!(
                "sha-256 (1), sha-256-128 (2), sha-256-120 (3), ",
                "sha-256-96 (4), sha-256-64 (5), sha-256-32 (6)"
            )
        );
    }

    #[test]
    fn test_suite_index_built_once_under_contention() {
        let reg = AlgorithmRegistry::standard();
        let addrs: Vec<usize> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| std::ptr::from_ref(reg.suite_index()) as usize))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(addrs.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(reg.suite_index().len(), 6);
    }

    #[test]
    fn test_custom_table_without_numbers() {
        let reg = AlgorithmRegistry::with_suites([AlgorithmSuite::new(
            "sha-256-40",
            HashAlgorithm::Sha256,
            5,
            None,
        )]);
        assert_eq!(reg.lookup("sha-256-40").unwrap().encoded_len, 7);
        assert!(reg.suite_index().is_empty());
        assert_eq!(reg.describe(), "");
    }

    #[test]
    fn test_shared_is_single_instance() {
        assert!(Arc::ptr_eq(&AlgorithmRegistry::shared(), &AlgorithmRegistry::shared()));
    }
}
