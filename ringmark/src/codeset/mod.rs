//! Rotation-invariant code space for a ring width.
//!
//! Builds the ordered list of canonical codes for a bit width, either from
//! a standard table or by exhaustive enumeration, and caches it per width.

mod tables;

use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::error::ConfigError;
use crate::necklace::{canonical, is_degenerate};

pub use tables::standard_table;

pub const MIN_BITS: u32 = 4;
pub const MAX_BITS: u32 = 16;

const SLOTS: usize = (MAX_BITS - MIN_BITS + 1) as usize;

/// A validated ring width in [`MIN_BITS`, `MAX_BITS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BitWidth(u32);

impl BitWidth {
    pub fn new(bits: u32) -> Result<BitWidth, ConfigError> {
        if (MIN_BITS..=MAX_BITS).contains(&bits) {
            Ok(BitWidth(bits))
        } else {
            Err(ConfigError::BitWidthOutOfRange(bits))
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Every supported width, ascending.
    pub fn all() -> impl Iterator<Item = BitWidth> {
        (MIN_BITS..=MAX_BITS).map(BitWidth)
    }

    fn slot(self) -> usize {
        (self.0 - MIN_BITS) as usize
    }
}

impl fmt::Display for BitWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a code set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeSource {
    /// A fixed standard table.
    Standard,
    /// Exhaustive enumeration of canonical forms.
    Generated,
}

impl fmt::Display for CodeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodeSource::Standard => f.write_str("standard"),
            CodeSource::Generated => f.write_str("generated"),
        }
    }
}

/// Ordered, deduplicated canonical codes for one ring width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSet {
    pub bits: BitWidth,
    pub codes: Vec<u32>,
    pub source: CodeSource,
}

impl CodeSet {
    /// Build the code set for `bits`, preferring a standard table.
    pub fn build(bits: BitWidth) -> CodeSet {
        match standard_table(bits.get()) {
            Some(table) => CodeSet {
                bits,
                codes: finalize(bits.get(), table.iter().copied()),
                source: CodeSource::Standard,
            },
            None => CodeSet {
                bits,
                codes: generate(bits),
                source: CodeSource::Generated,
            },
        }
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn contains(&self, code: u32) -> bool {
        self.codes.binary_search(&code).is_ok()
    }
}

/// Enumerate every canonical form over `2^bits` raw patterns.
///
/// Degenerate forms (all-zero, all-one) are removed and the result is sorted
/// ascending.
pub fn generate(bits: BitWidth) -> Vec<u32> {
    let b = bits.get();
    finalize(b, (0..1u32 << b).map(|c| canonical(c, b)))
}

/// Collapse to canonical, drop degenerate codes, dedup and sort.
///
/// Applied to every source, so tables and enumeration share the same
/// invariants regardless of how the codes were produced.
fn finalize(bits: u32, codes: impl IntoIterator<Item = u32>) -> Vec<u32> {
    let set: BTreeSet<u32> = codes
        .into_iter()
        .map(|c| canonical(c, bits))
        .filter(|&c| !is_degenerate(c, bits))
        .collect();
    set.into_iter().collect()
}

/// Lazily populated per-width cache of code sets.
///
/// Each width is computed at most once; concurrent first callers race on a
/// `OnceLock` and all observe the same `Arc`.
pub struct CodeSpace {
    slots: [OnceLock<Arc<CodeSet>>; SLOTS],
}

impl CodeSpace {
    pub fn new() -> CodeSpace {
        CodeSpace {
            slots: std::array::from_fn(|_| OnceLock::new()),
        }
    }

    /// Get the code set for `bits`, computing it on first use.
    pub fn get(&self, bits: BitWidth) -> Arc<CodeSet> {
        self.slots[bits.slot()]
            .get_or_init(|| {
                let set = CodeSet::build(bits);
                log::debug!(
                    "computed {} code set for {} bits: {} codes",
                    set.source,
                    bits,
                    set.len()
                );
                Arc::new(set)
            })
            .clone()
    }

    /// Whether `bits` has already been computed.
    pub fn is_cached(&self, bits: BitWidth) -> bool {
        self.slots[bits.slot()].get().is_some()
    }
}

impl Default for CodeSpace {
    fn default() -> Self {
        CodeSpace::new()
    }
}

impl fmt::Debug for CodeSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cached: Vec<u32> = BitWidth::all()
            .filter(|&b| self.is_cached(b))
            .map(BitWidth::get)
            .collect();
        f.debug_struct("CodeSpace").field("cached", &cached).finish()
    }
}
