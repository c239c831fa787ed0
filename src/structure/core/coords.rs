/* ************************************************************************ **
** This file is part of phonsym, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                      **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::Lattice;

use phonsym_array_types::V3;

/// Wrapper type for coordinates used as input to some APIs.
///
/// This allows a function to support either cartesian coordinates,
/// or fractional coordinates with respect to some lattice.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordsKind {
    Carts(Vec<V3>),
    Fracs(Vec<V3>),
}

impl CoordsKind {
    pub fn len(&self) -> usize
    { self.as_slice().len() }

    pub fn is_empty(&self) -> bool
    { self.len() == 0 }

    fn as_slice(&self) -> &[V3]
    { match self {
        CoordsKind::Carts(c) => c,
        CoordsKind::Fracs(c) => c,
    }}

    pub fn into_carts(self, lattice: &Lattice) -> Vec<V3>
    { match self {
        CoordsKind::Carts(c) => c,
        CoordsKind::Fracs(c) => c.iter().map(|v| v * lattice).collect(),
    }}

    pub fn into_fracs(self, lattice: &Lattice) -> Vec<V3>
    { match self {
        CoordsKind::Carts(c) => c.iter().map(|v| v / lattice).collect(),
        CoordsKind::Fracs(c) => c,
    }}

    pub fn to_carts(&self, lattice: &Lattice) -> Vec<V3>
    { self.clone().into_carts(lattice) }

    pub fn to_fracs(&self, lattice: &Lattice) -> Vec<V3>
    { self.clone().into_fracs(lattice) }
}
