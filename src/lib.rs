//! strset: a single-threaded, open-addressing hash set for string keys
//! with named, pluggable hash functions.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a small set engine whose behavior stays correct under
//!   adversarial configuration (capacity 0, 1, 2) and under interleaved
//!   add/remove/growth sequences, with each piece verifiable on its own.
//! - Layers:
//!   - hasher: `KeyHasher` trait for pure byte-string hash functions,
//!     adapters over ecosystem `BuildHasher`s, and `HasherRegistry`, an
//!     explicit caller-owned catalog of named hashers.
//!   - table: `StrSet`, the slot table itself: a `Vec` of three-state
//!     slots (empty / occupied / tombstone) with linear probing, lazy
//!     first allocation, threshold-driven growth, the `each` visitor
//!     engine and the `Iter` cursor.
//!   - ops: set algebra (`difference`, set equality, literal-list
//!     comparison) built purely on the lookup/insert/iterate contracts.
//!
//! Constraints
//! - Single-threaded: `!Send`/`!Sync` by design (the hasher handle is an
//!   `Rc`); external synchronization is the caller's problem.
//! - Deletion is tombstone-based; tombstones count toward the growth
//!   threshold so probe chains stay bounded across add/remove churn, and
//!   growth (full rehash) is what reclaims them.
//! - Duplicate add and absent remove are defined idempotent no-ops.
//! - Hash identity never affects observable set semantics, only bucket
//!   distribution; the test suites are parametrized per hasher to prove
//!   it.
//!
//! Mutation during traversal
//! - `each` visits occupied slots in physical order and lets the visitor
//!   answer `Continue`, `RemoveCurrent` or `Stop` per key. Removal
//!   tombstones in place, so the slot array never moves mid-pass.
//! - Any other structural mutation while a cursor or visitor borrow is
//!   live is a compile error, not a documented hazard: `Iter` borrows
//!   the set, `each` holds `&mut self` for the whole pass.
//!
//! Notes and non-goals
//! - No persistence, no concurrency, no iteration-order guarantee
//!   (order is insertion- and growth-dependent).
//! - Keys with embedded NUL bytes are outside the tested contract.
//! - `dump` is a diagnostics surface (one key per line, physical slot
//!   order), not a serialization format.

mod hasher;
mod ops;
mod table;
mod table_proptest;

// Public surface
pub use hasher::{Djb2, HashedWith, HasherRegistry, KeyHasher};
pub use table::{Iter, StrSet, Visit};
