//! Deterministic mapping of marker numbers onto canonical codes.

use crate::codeset::CodeSet;
use crate::error::{CapacityError, ConfigError, Error};

/// A marker number bound to the ring code printed for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarkerAssignment {
    pub number: u32,
    pub code: u32,
}

/// Bind `count` consecutive marker numbers from `start` to the first
/// `count` codes of `set`, in ascending code order.
///
/// Capacity is checked before anything else is built.
pub fn assign(set: &CodeSet, count: usize, start: u32) -> Result<Vec<MarkerAssignment>, Error> {
    if count == 0 {
        return Err(ConfigError::NoMarkers.into());
    }
    if count > set.len() {
        return Err(CapacityError {
            bits: set.bits.get(),
            requested: count,
            available: set.len(),
        }
        .into());
    }
    let last = u32::try_from(count - 1)
        .ok()
        .and_then(|n| start.checked_add(n));
    if last.is_none() {
        return Err(ConfigError::NumberOverflow { start, count }.into());
    }

    Ok(set
        .codes
        .iter()
        .take(count)
        .enumerate()
        .map(|(i, &code)| MarkerAssignment {
            number: start + i as u32,
            code,
        })
        .collect())
}
