//! Collection types used across Tessera.
//!
//! - AHash-backed `HashMap`/`HashSet` aliases
//! - [`SparseSet`], a generational arena handing out stable [`IndexSlot`] keys

pub mod sparse_set;

pub use ahash::{AHashMap as HashMap, AHashSet as HashSet, RandomState};
pub use sparse_set::{IndexSlot, SparseSet};
