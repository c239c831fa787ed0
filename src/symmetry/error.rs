/* ************************************************************************ **
** This file is part of phonsym, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                      **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use phonsym_array_types::V3;

/// Every failure of symmetry discovery and enforcement.
///
/// None of these are recovered from internally; they indicate malformed
/// input or geometry that disagrees with the claimed symmetry.
#[derive(Debug, Fail)]
pub enum SymmetryError {
    #[fail(display = "the structure has no unit cell")]
    InvalidStructure,

    #[fail(display = "a q-point must have 3 components, got {}", len)]
    InvalidQPoint { len: usize },

    #[fail(display = "symmetry operations have not been discovered yet")]
    NotInitialized,

    #[fail(display = "operations were discovered for q = {:?}, but q = {:?} was requested", discovered, requested)]
    QPointMismatch { discovered: V3, requested: V3 },

    #[fail(display = "operation {} is not a symmetry of the lattice", index)]
    InvalidOperation { index: usize },

    #[fail(display = "operation {} does not map atom {} onto exactly one atom", op, atom)]
    AmbiguousAtomMapping { op: usize, atom: usize },

    #[fail(display = "operation {} has no inverse in the operation list", op)]
    MissingInverse { op: usize },

    #[fail(display = "star member {:?} is not present in the q-point list", q)]
    StarMemberNotFound { q: V3 },

    #[fail(display = "q-point {:?} appears more than once (up to reciprocal lattice vectors)", q)]
    DuplicateQPoint { q: V3 },

    #[fail(display = "the image {:?} does not match exactly one star member", q)]
    AmbiguousStarMatch { q: V3 },

    #[fail(display = "star of {:?} has {} members, but {} were supplied", q, expected, actual)]
    StarSizeMismatch { q: V3, expected: usize, actual: usize },

    #[fail(display = "dimension mismatch in {}: expected {}, got {}", what, expected, actual)]
    DimensionMismatch { what: &'static str, expected: usize, actual: usize },

    #[fail(display = "unknown acoustic sum rule '{}'", name)]
    InvalidAsrMode { name: String },

    #[fail(display = "unknown rotation axis '{}' (expected x, y or z)", name)]
    InvalidAxis { name: String },
}

pub type Result<T> = ::std::result::Result<T, SymmetryError>;
