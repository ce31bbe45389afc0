//! StrSet: the open-addressing slot table, its visitor engine and cursor.
//!
//! Storage is a single `Vec<Slot>` with three-state slots. Deletion
//! tombstones the slot; tombstones stay probe-transparent for lookups
//! and count toward the growth threshold, so repeated add/remove cycles
//! still bound probe length via eventual rehash. Growth is the only
//! operation that moves keys between slots.

use crate::hasher::{default_hasher, KeyHasher};
use std::fmt;
use std::io;
use std::mem;
use std::rc::Rc;

/// Smallest non-zero capacity the table will grow to.
const MIN_CAPACITY: usize = 8;

/// One slot of the table.
///
/// `Occupied` exclusively owns a copy of its key's bytes; the table
/// exclusively owns all slots, so dropping the table releases every key.
enum Slot {
    Empty,
    Occupied(Box<str>),
    Tombstone,
}

impl Slot {
    fn key(&self) -> Option<&str> {
        match self {
            Slot::Occupied(key) => Some(key),
            _ => None,
        }
    }
}

/// Outcome of a full probe for one key.
enum Probe {
    /// The key lives at this index.
    Found(usize),
    /// The key is absent; this index is where an insert would place it
    /// (the first tombstone on the probe path, else the empty slot that
    /// proved absence).
    Vacant(usize),
    /// The key is absent and every slot is occupied by some other key.
    Full,
}

/// Per-key verdict returned by an [`each`](StrSet::each) visitor.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Visit {
    /// Keep the key, continue with the next occupied slot.
    Continue,
    /// Tombstone the just-visited key, then continue.
    RemoveCurrent,
    /// Terminate the traversal; no further slots are visited.
    Stop,
}

/// An open-addressing hash set of string keys.
///
/// Single-threaded by design: the shared hasher handle is an `Rc`, which
/// keeps the type `!Send`/`!Sync`. Duplicate adds and absent removes are
/// defined no-ops, not errors. Capacity 0 is a valid starting state; the
/// first `add` allocates lazily.
pub struct StrSet {
    slots: Vec<Slot>,
    live: usize,
    tombstones: usize,
    hasher: Rc<dyn KeyHasher>,
}

impl StrSet {
    /// An empty set with no backing storage and the default hasher.
    pub fn new() -> Self {
        Self::with_capacity_and_hasher(0, default_hasher())
    }

    /// An empty set with exactly `capacity` slots and the default hasher.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, default_hasher())
    }

    /// An empty set with no backing storage and the given hasher.
    pub fn with_hasher(hasher: Rc<dyn KeyHasher>) -> Self {
        Self::with_capacity_and_hasher(0, hasher)
    }

    /// An empty set with exactly `capacity` slots and the given hasher.
    ///
    /// The capacity is taken verbatim (no rounding); growth only happens
    /// once the load threshold demands it.
    pub fn with_capacity_and_hasher(capacity: usize, hasher: Rc<dyn KeyHasher>) -> Self {
        let mut slots = Vec::new();
        slots.resize_with(capacity, || Slot::Empty);
        Self {
            slots,
            live: 0,
            tombstones: 0,
            hasher,
        }
    }

    /// Number of live keys. O(1).
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Current slot-array length, counting empty and tombstoned slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// The hash function this set was constructed with.
    pub fn hasher(&self) -> &Rc<dyn KeyHasher> {
        &self.hasher
    }

    #[cfg(test)]
    pub(crate) fn tombstones(&self) -> usize {
        self.tombstones
    }

    fn home_index(&self, key: &str) -> usize {
        (self.hasher.hash_key(key.as_bytes()) % self.slots.len() as u64) as usize
    }

    /// Linear probe from the key's home index, wrapping, at most one
    /// full pass. The first tombstone on the path is remembered as the
    /// insertion target; an empty slot proves definite absence.
    fn probe(&self, key: &str) -> Probe {
        debug_assert!(!self.slots.is_empty());
        let capacity = self.slots.len();
        let mut index = self.home_index(key);
        let mut first_tombstone = None;
        for _ in 0..capacity {
            match &self.slots[index] {
                Slot::Empty => return Probe::Vacant(first_tombstone.unwrap_or(index)),
                Slot::Occupied(k) if k.as_ref() == key => return Probe::Found(index),
                Slot::Occupied(_) => {}
                Slot::Tombstone => {
                    first_tombstone.get_or_insert(index);
                }
            }
            index = (index + 1) % capacity;
        }
        match first_tombstone {
            Some(index) => Probe::Vacant(index),
            None => Probe::Full,
        }
    }

    /// True when inserting one more key would push the non-empty load
    /// (live + tombstones) past 3/4 of capacity, or there is no storage.
    fn needs_grow(&self) -> bool {
        let capacity = self.slots.len();
        capacity == 0 || (self.live + self.tombstones + 1) * 4 > capacity * 3
    }

    /// Rehash into a fresh array of at least `MIN_CAPACITY`, doubling.
    /// Tombstones are dropped, not migrated; `live` is unchanged.
    fn grow(&mut self) {
        let new_capacity = usize::max(MIN_CAPACITY, self.slots.len() * 2);
        let mut new_slots = Vec::new();
        new_slots.resize_with(new_capacity, || Slot::Empty);
        let old = mem::replace(&mut self.slots, new_slots);
        self.tombstones = 0;
        for slot in old {
            if let Slot::Occupied(key) = slot {
                // The fresh array has no tombstones, so the probe for an
                // absent key degenerates to first-empty.
                let mut index = self.home_index(&key);
                while !matches!(self.slots[index], Slot::Empty) {
                    index = (index + 1) % new_capacity;
                }
                self.slots[index] = Slot::Occupied(key);
            }
        }
    }

    /// Insert a copy of `key` if absent. Returns `true` if the key was
    /// newly added, `false` if it was already present (idempotent).
    pub fn add(&mut self, key: &str) -> bool {
        if self.needs_grow() {
            self.grow();
        }
        loop {
            match self.probe(key) {
                Probe::Found(_) => return false,
                Probe::Vacant(index) => {
                    if matches!(self.slots[index], Slot::Tombstone) {
                        self.tombstones -= 1;
                    }
                    self.slots[index] = Slot::Occupied(Box::from(key));
                    self.live += 1;
                    return true;
                }
                // The pre-insert growth check keeps at least one empty
                // slot in any non-zero capacity, so a saturated table is
                // not expected here; growing and retrying stays correct
                // either way.
                Probe::Full => self.grow(),
            }
        }
    }

    /// Tombstone `key`'s slot if present. Returns `true` if the key was
    /// present, `false` otherwise (idempotent).
    pub fn remove(&mut self, key: &str) -> bool {
        if self.slots.is_empty() {
            return false;
        }
        match self.probe(key) {
            Probe::Found(index) => {
                self.slots[index] = Slot::Tombstone;
                self.live -= 1;
                self.tombstones += 1;
                true
            }
            _ => false,
        }
    }

    /// True iff an occupied slot holding `key` is reachable by probing.
    pub fn contains(&self, key: &str) -> bool {
        if self.slots.is_empty() {
            return false;
        }
        matches!(self.probe(key), Probe::Found(_))
    }

    /// Reset every slot to empty in place. Keys are released; the slot
    /// array is retained at its current capacity (no implicit shrink).
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = Slot::Empty;
        }
        self.live = 0;
        self.tombstones = 0;
    }

    /// Visit every occupied slot in physical order, applying the
    /// verdict the visitor returns per key. `RemoveCurrent` tombstones
    /// in place, so the slot array identity and length stay fixed for
    /// the whole pass; no growth can occur mid-traversal.
    ///
    /// Caller state travels in the closure's captures.
    pub fn each<F>(&mut self, mut visit: F)
    where
        F: FnMut(&str) -> Visit,
    {
        for index in 0..self.slots.len() {
            let verdict = match &self.slots[index] {
                Slot::Occupied(key) => visit(key),
                _ => continue,
            };
            match verdict {
                Visit::Continue => {}
                Visit::RemoveCurrent => {
                    self.slots[index] = Slot::Tombstone;
                    self.live -= 1;
                    self.tombstones += 1;
                }
                Visit::Stop => break,
            }
        }
    }

    /// A cursor positioned at the first occupied slot (exhausted if the
    /// set is empty). The borrow it holds makes structural mutation a
    /// compile error while the cursor is live.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(&self.slots)
    }

    /// Write one key per line to `out`, in physical slot order. The
    /// order is not stable across growth; this is a diagnostics surface,
    /// not a serialization format.
    pub fn dump<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        for key in self.iter() {
            writeln!(out, "{key}")?;
        }
        Ok(())
    }
}

impl Default for StrSet {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StrSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Restartable pull-style cursor over a set's occupied slots.
///
/// State machine: created positioned at the first occupied slot (or
/// exhausted), `advance` steps to the next occupied slot, `current`
/// borrows the key under the cursor. Also an [`Iterator`], since that is
/// how Rust callers usually consume it; both views share the same state.
pub struct Iter<'a> {
    slots: &'a [Slot],
    index: usize,
}

impl<'a> Iter<'a> {
    fn new(slots: &'a [Slot]) -> Self {
        let mut it = Self { slots, index: 0 };
        it.seek();
        it
    }

    /// Skip forward to the next occupied slot at or after `index`.
    fn seek(&mut self) {
        while self
            .slots
            .get(self.index)
            .is_some_and(|slot| slot.key().is_none())
        {
            self.index += 1;
        }
    }

    /// True while the cursor references a live slot.
    pub fn valid(&self) -> bool {
        self.index < self.slots.len()
    }

    /// The key under the cursor, or `None` once exhausted.
    pub fn current(&self) -> Option<&'a str> {
        self.slots.get(self.index).and_then(Slot::key)
    }

    /// Step to the next occupied slot, or to the exhausted state.
    pub fn advance(&mut self) {
        if self.valid() {
            self.index += 1;
            self.seek();
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.current();
        if key.is_some() {
            self.advance();
        }
        key
    }
}

impl<'a> IntoIterator for &'a StrSet {
    type Item = &'a str;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::{Djb2, HashedWith};
    use std::collections::BTreeSet;

    /// Invariant: duplicate adds are idempotent no-ops and do not
    /// disturb the live count.
    #[test]
    fn add_is_idempotent() {
        let mut set = StrSet::new();
        assert!(set.add("k"));
        assert!(!set.add("k"));
        assert_eq!(set.len(), 1);
        assert!(set.contains("k"));
    }

    /// Invariant: removing an absent key is a no-op; removing a present
    /// key tombstones it and `contains` stops seeing it.
    #[test]
    fn remove_inverse_and_idempotent() {
        let mut set = StrSet::new();
        assert!(!set.remove("missing"));
        set.add("k");
        assert!(set.remove("k"));
        assert!(!set.contains("k"));
        assert!(!set.remove("k"));
        assert_eq!(set.len(), 0);
        assert_eq!(set.tombstones(), 1);
    }

    /// Invariant: a tombstone is reused as the insertion target once
    /// the probe establishes absence, and the counters rebalance.
    #[test]
    fn tombstone_reuse_on_readd() {
        let mut set = StrSet::new();
        set.add("k");
        set.remove("k");
        let capacity = set.capacity();
        assert!(set.add("k"));
        assert_eq!(set.tombstones(), 0);
        assert_eq!(set.len(), 1);
        assert_eq!(set.capacity(), capacity, "re-add must not force growth");
    }

    /// Invariant: lookups see through tombstones to keys displaced
    /// further down the probe chain (constant hasher forces the chain).
    #[test]
    fn lookup_is_tombstone_transparent() {
        struct Zero;
        impl crate::KeyHasher for Zero {
            fn hash_key(&self, _key: &[u8]) -> u64 {
                0
            }
        }
        let mut set = StrSet::with_hasher(Rc::new(Zero));
        set.add("a");
        set.add("b");
        set.add("c");
        // "b" and "c" sit behind "a" in one probe chain.
        set.remove("a");
        assert!(set.contains("b"));
        assert!(set.contains("c"));
    }

    /// Invariant: clear empties the table, zeroes both counters and
    /// keeps the slot array at its current capacity.
    #[test]
    fn clear_retains_capacity() {
        let mut set = StrSet::new();
        for i in 0..20 {
            set.add(&format!("k{i}"));
        }
        set.remove("k0");
        let capacity = set.capacity();
        set.clear();
        assert_eq!(set.len(), 0);
        assert_eq!(set.tombstones(), 0);
        assert_eq!(set.capacity(), capacity);
        assert!(!set.contains("k1"));
        // Still usable after clear.
        assert!(set.add("fresh"));
        assert!(set.contains("fresh"));
    }

    /// Invariant: growth preserves membership of every live key and
    /// drops tombstones instead of migrating them.
    #[test]
    fn growth_preserves_membership_and_drops_tombstones() {
        let mut set = StrSet::with_capacity_and_hasher(2, Rc::new(Djb2));
        set.add("gone");
        set.remove("gone");
        let keys = ["one", "two", "three", "four"];
        for key in keys {
            set.add(key);
        }
        assert!(set.capacity() > 2, "adds past the threshold must grow");
        assert_eq!(set.tombstones(), 0);
        for key in keys {
            assert!(set.contains(key), "lost {key} across growth");
        }
        assert!(!set.contains("gone"));
    }

    /// `each` with `Stop` visits nothing after the stopping element.
    #[test]
    fn each_stop_terminates() {
        let mut set = StrSet::new();
        for i in 0..10 {
            set.add(&format!("k{i}"));
        }
        let mut visited = 0;
        set.each(|_| {
            visited += 1;
            if visited == 3 {
                Visit::Stop
            } else {
                Visit::Continue
            }
        });
        assert_eq!(visited, 3);
        assert_eq!(set.len(), 10, "Stop must not remove anything");
    }

    /// `each` with `RemoveCurrent` tombstones exactly the keys the
    /// visitor selects, in place, with the rest untouched.
    #[test]
    fn each_selective_removal() {
        let mut set = StrSet::new();
        for i in 0..10 {
            set.add(&format!("k{i}"));
        }
        set.each(|key| {
            if key.trim_start_matches('k').parse::<u32>().unwrap() % 2 == 0 {
                Visit::RemoveCurrent
            } else {
                Visit::Continue
            }
        });
        assert_eq!(set.len(), 5);
        for i in 0..10 {
            assert_eq!(set.contains(&format!("k{i}")), i % 2 == 1);
        }
    }

    /// Cursor protocol: created at the first occupied slot, `advance`
    /// skips gaps, exhaustion is terminal and `current` turns `None`.
    #[test]
    fn cursor_protocol() {
        let mut set = StrSet::new();
        let keys = ["a", "b", "c"];
        for key in keys {
            set.add(key);
        }
        set.remove("b"); // leave a tombstone gap for the cursor to skip

        let mut cursor = set.iter();
        let mut seen = BTreeSet::new();
        while cursor.valid() {
            seen.insert(cursor.current().unwrap().to_owned());
            cursor.advance();
        }
        assert!(!cursor.valid());
        assert_eq!(cursor.current(), None);
        cursor.advance(); // advancing an exhausted cursor is a no-op
        assert!(!cursor.valid());

        let expected: BTreeSet<String> = ["a", "c"].iter().map(|s| s.to_string()).collect();
        assert_eq!(seen, expected);
    }

    /// The cursor on an empty set starts exhausted.
    #[test]
    fn cursor_on_empty_set() {
        let set = StrSet::new();
        let cursor = set.iter();
        assert!(!cursor.valid());
        assert_eq!(cursor.current(), None);
    }

    /// `dump` writes one key per line in physical slot order.
    #[test]
    fn dump_one_key_per_line() {
        let mut set = StrSet::with_hasher(Rc::new(HashedWith(fnv::FnvBuildHasher::default())));
        for key in ["alpha", "beta", "gamma"] {
            set.add(key);
        }
        let mut out = Vec::new();
        set.dump(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with('\n'));
        let mut lines: Vec<_> = text.lines().collect();
        lines.sort_unstable();
        assert_eq!(lines, ["alpha", "beta", "gamma"]);
    }
}
