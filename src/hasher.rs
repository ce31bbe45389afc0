//! Pluggable hash functions and the named catalog that selects them.
//!
//! A `StrSet` holds one `Rc<dyn KeyHasher>` chosen at construction and
//! never changes it. Hash identity affects bucket distribution only,
//! never observable set semantics, so every hasher registered here must
//! pass the same test suite (and the suites are parametrized to check
//! exactly that).

use core::hash::{BuildHasher, Hasher};
use std::rc::Rc;

/// A pure byte-string hash function.
///
/// Implementations must be stateless per call: the same bytes always
/// produce the same value for the same instance.
pub trait KeyHasher {
    fn hash_key(&self, key: &[u8]) -> u64;
}

/// Adapter that lets any [`BuildHasher`] serve as a [`KeyHasher`].
///
/// Key bytes are fed through `Hasher::write` directly, so the result is
/// the underlying function's digest of the raw bytes.
pub struct HashedWith<S>(pub S);

impl<S: BuildHasher> KeyHasher for HashedWith<S> {
    fn hash_key(&self, key: &[u8]) -> u64 {
        let mut h = self.0.build_hasher();
        h.write(key);
        h.finish()
    }
}

/// The classic djb2 string hash (xor variant).
///
/// Deliberately weak on short keys; useful for forcing clustered probe
/// sequences in small tables.
pub struct Djb2;

impl KeyHasher for Djb2 {
    fn hash_key(&self, key: &[u8]) -> u64 {
        let mut h: u64 = 5381;
        for &b in key {
            h = h.wrapping_mul(33) ^ u64::from(b);
        }
        h
    }
}

/// An explicit, caller-owned catalog of named hash functions.
///
/// There is no process-global registration: callers build a registry
/// (usually [`HasherRegistry::with_builtins`]), resolve a hasher by name
/// and hand it to [`StrSet::with_hasher`](crate::StrSet::with_hasher).
/// Registering an already-present name replaces the entry, so repeated
/// initialization is idempotent. Registration order is preserved, which
/// keeps name iteration deterministic.
#[derive(Default)]
pub struct HasherRegistry {
    entries: Vec<(String, Rc<dyn KeyHasher>)>,
}

impl HasherRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// A registry preloaded with the built-in hashers:
    /// `"fnv1a"`, `"djb2"` and `"ahash"` (fixed seeds, so the function
    /// is deterministic for the lifetime of the catalog).
    pub fn with_builtins() -> Self {
        let mut reg = Self::new();
        reg.register("fnv1a", Rc::new(HashedWith(fnv::FnvBuildHasher::default())));
        reg.register("djb2", Rc::new(Djb2));
        reg.register(
            "ahash",
            Rc::new(HashedWith(ahash::RandomState::with_seeds(
                0x243f_6a88_85a3_08d3,
                0x1319_8a2e_0370_7344,
                0xa409_3822_299f_31d0,
                0x082e_fa98_ec4e_6c89,
            ))),
        );
        reg
    }

    /// Register `hasher` under `name`, replacing any previous entry with
    /// the same name.
    pub fn register(&mut self, name: &str, hasher: Rc<dyn KeyHasher>) {
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| n == name) {
            entry.1 = hasher;
        } else {
            self.entries.push((name.to_owned(), hasher));
        }
    }

    /// Resolve a hasher by name.
    pub fn get(&self, name: &str) -> Option<Rc<dyn KeyHasher>> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, h)| Rc::clone(h))
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Registered `(name, hasher)` pairs, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Rc<dyn KeyHasher>)> {
        self.entries.iter().map(|(n, h)| (n.as_str(), h))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The hasher used by `StrSet::new` when none is supplied.
pub(crate) fn default_hasher() -> Rc<dyn KeyHasher> {
    Rc::new(HashedWith(fnv::FnvBuildHasher::default()))
}
