//! Set algebra over `StrSet`, built purely on the lookup/insert/iterate
//! contracts so it never assumes the internal layout of either operand.

use crate::table::StrSet;
use std::rc::Rc;

impl StrSet {
    /// A fresh, independently owned set of the keys present in `self`
    /// and absent from `other`. The result inherits `self`'s hasher.
    pub fn difference(&self, other: &StrSet) -> StrSet {
        let mut result = StrSet::with_hasher(Rc::clone(self.hasher()));
        for key in self {
            if !other.contains(key) {
                result.add(key);
            }
        }
        result
    }

    /// Set equality against a literal key list.
    ///
    /// Duplicates in `keys` collapse to set semantics before the
    /// comparison: `["a", "a"]` compares equal to a set holding just
    /// `"a"`.
    pub fn eq_keys(&self, keys: &[&str]) -> bool {
        let mut literals = StrSet::with_hasher(Rc::clone(self.hasher()));
        for key in keys {
            literals.add(key);
        }
        *self == literals
    }
}

/// Set equality: same keys, regardless of insertion order, capacity
/// history or hash function. Cardinality is checked first as a fast
/// rejection; with equal cardinality a one-directional subset check is
/// sufficient.
impl PartialEq for StrSet {
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter().all(|key| other.contains(key))
    }
}

impl Eq for StrSet {}

impl<'a> Extend<&'a str> for StrSet {
    fn extend<I: IntoIterator<Item = &'a str>>(&mut self, iter: I) {
        for key in iter {
            self.add(key);
        }
    }
}

impl<'a> FromIterator<&'a str> for StrSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = StrSet::new();
        set.extend(iter);
        set
    }
}
