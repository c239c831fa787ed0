/* ************************************************************************ **
** This file is part of phonsym, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                      **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use std::collections::BTreeMap;

use crate::{Lattice, CoordsKind};
use crate::algo::nearest_image::nearest_image_frac_diff;

use phonsym_array_types::V3;

#[derive(Debug, Fail)]
pub enum StructureError {
    #[fail(display = "the structure has no unit cell")]
    MissingUnitCell,
    #[fail(display = "no mass is defined for species '{}'", species)]
    MissingMass { species: String },
    #[fail(display = "expected {} atoms, got {}", expected, actual)]
    AtomCountMismatch { expected: usize, actual: usize },
}

/// Atomic positions with species labels, an optional unit cell, and a mass table.
///
/// Positions are stored in cartesian coordinates. A structure without a
/// unit cell is a molecule; most symmetry functionality refuses those.
#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    lattice: Option<Lattice>,
    carts: Vec<V3>,
    species: Vec<String>,
    masses: BTreeMap<String, f64>,
}

impl Structure {
    pub fn new<S>(lattice: Lattice, coords: CoordsKind, species: S) -> Self
    where S: IntoIterator, S::Item: Into<String>,
    {
        let carts = coords.into_carts(&lattice);
        Self::from_parts(Some(lattice), carts, species)
    }

    /// A structure with no unit cell.
    pub fn molecule<S>(carts: Vec<V3>, species: S) -> Self
    where S: IntoIterator, S::Item: Into<String>,
    { Self::from_parts(None, carts, species) }

    fn from_parts<S>(lattice: Option<Lattice>, carts: Vec<V3>, species: S) -> Self
    where S: IntoIterator, S::Item: Into<String>,
    {
        let species: Vec<String> = species.into_iter().map(Into::into).collect();
        assert_eq!(carts.len(), species.len(), "one species label per atom");
        Structure { lattice, carts, species, masses: BTreeMap::new() }
    }

    /// Builder-style form of `set_mass`.
    pub fn with_masses<K, I>(mut self, masses: I) -> Self
    where K: Into<String>, I: IntoIterator<Item=(K, f64)>,
    {
        for (species, mass) in masses {
            self.set_mass(species, mass);
        }
        self
    }

    pub fn set_mass(&mut self, species: impl Into<String>, mass: f64)
    { self.masses.insert(species.into(), mass); }

    pub fn num_atoms(&self) -> usize { self.carts.len() }
    pub fn lattice(&self) -> Option<&Lattice> { self.lattice.as_ref() }
    pub fn has_unit_cell(&self) -> bool { self.lattice.is_some() }

    /// The lattice, or `MissingUnitCell`.
    pub fn require_lattice(&self) -> Result<&Lattice, StructureError>
    { self.lattice.as_ref().ok_or(StructureError::MissingUnitCell) }

    pub fn reciprocal(&self) -> Result<Lattice, StructureError>
    { Ok(self.require_lattice()?.reciprocal()) }

    pub fn carts(&self) -> &[V3] { &self.carts }
    pub fn to_carts(&self) -> Vec<V3> { self.carts.clone() }

    pub fn to_fracs(&self) -> Result<Vec<V3>, StructureError>
    {
        let lattice = self.require_lattice()?;
        Ok(self.carts.iter().map(|v| v / lattice).collect())
    }

    pub fn cart_to_frac(&self, cart: &V3) -> Result<V3, StructureError>
    { Ok(cart / self.require_lattice()?) }

    pub fn frac_to_cart(&self, frac: &V3) -> Result<V3, StructureError>
    { Ok(frac * self.require_lattice()?) }

    pub fn set_carts(&mut self, carts: Vec<V3>)
    {
        assert_eq!(carts.len(), self.carts.len());
        self.carts = carts;
    }

    /// Per-atom species labels.
    pub fn species(&self) -> &[String] { &self.species }

    /// Distinct species labels in order of first appearance.
    pub fn species_labels(&self) -> Vec<String>
    {
        let mut labels: Vec<String> = vec![];
        for s in &self.species {
            if !labels.contains(s) {
                labels.push(s.clone());
            }
        }
        labels
    }

    /// Dense per-atom species ids, numbered as in `species_labels`.
    pub fn species_indices(&self) -> Vec<usize>
    {
        let labels = self.species_labels();
        self.species.iter()
            .map(|s| labels.iter().position(|l| l == s).expect("(BUG) label was collected above"))
            .collect()
    }

    pub fn mass_table(&self) -> &BTreeMap<String, f64> { &self.masses }

    /// Per-atom masses looked up from the mass table.
    pub fn masses(&self) -> Result<Vec<f64>, StructureError>
    {
        self.species.iter().map(|s| {
            self.masses.get(s).cloned()
                .ok_or_else(|| StructureError::MissingMass { species: s.clone() })
        }).collect()
    }

    /// Distance between two cartesian points, minimized over periodic images.
    ///
    /// Without a unit cell this is the plain euclidean distance.
    pub fn nearest_image_distance(&self, a: &V3, b: &V3) -> f64
    {
        match &self.lattice {
            None => (a - b).norm(),
            Some(lattice) => {
                let diff = nearest_image_frac_diff(lattice, &((a - b) / lattice));
                (diff * lattice).norm()
            },
        }
    }

    /// Per-atom cartesian displacement from `self` to `other`, using the
    /// nearest periodic image of each atom.
    pub fn displacement_to(&self, other: &Structure) -> Result<Vec<V3>, StructureError>
    {
        if other.num_atoms() != self.num_atoms() {
            return Err(StructureError::AtomCountMismatch {
                expected: self.num_atoms(),
                actual: other.num_atoms(),
            });
        }
        Ok(izip!(&self.carts, &other.carts).map(|(a, b)| match &self.lattice {
            None => b - a,
            Some(lattice) => nearest_image_frac_diff(lattice, &((b - a) / lattice)) * lattice,
        }).collect())
    }

    /// Replace the unit cell, keeping fractional coordinates fixed.
    pub fn with_lattice(&self, lattice: &Lattice) -> Result<Structure, StructureError>
    {
        let fracs = self.to_fracs()?;
        let mut out = self.clone();
        out.carts = CoordsKind::Fracs(fracs).into_carts(lattice);
        out.lattice = Some(lattice.clone());
        Ok(out)
    }

    /// Reduces all fractional coordinates into [0.0, 1.0).
    pub fn reduce_positions(&mut self) -> Result<(), StructureError>
    {
        let lattice = self.require_lattice()?.clone();
        for cart in &mut self.carts {
            *cart = (*cart / &lattice).wrap_positive() * &lattice;
        }
        Ok(())
    }
}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;

    fn rocksalt_pair() -> Structure {
        Structure::new(
            Lattice::cubic(2.0),
            CoordsKind::Fracs(vec![V3([0.0, 0.0, 0.0]), V3([0.5, 0.5, 0.5])]),
            vec!["Na", "Cl"],
        ).with_masses(vec![("Na", 22.99), ("Cl", 35.45)])
    }

    #[test]
    fn species_and_masses() {
        let s = rocksalt_pair();
        assert_eq!(s.species_labels(), vec!["Na".to_string(), "Cl".to_string()]);
        assert_eq!(s.species_indices(), vec![0, 1]);
        assert_eq!(s.masses().unwrap(), vec![22.99, 35.45]);

        let mut bare = s.clone();
        bare.masses.clear();
        match bare.masses() {
            Err(StructureError::MissingMass { species }) => assert_eq!(species, "Na"),
            r => panic!("unexpected: {:?}", r),
        }
    }

    #[test]
    fn periodic_distance() {
        let s = rocksalt_pair();
        let d = s.nearest_image_distance(&V3([0.1, 0.0, 0.0]), &V3([1.9, 0.0, 0.0]));
        assert_close!(abs=1e-12, d, 0.2);

        let molecule = Structure::molecule(s.to_carts(), s.species().to_vec());
        assert!(molecule.to_fracs().is_err());
        assert_close!(abs=1e-12, molecule.nearest_image_distance(&V3([0.1, 0.0, 0.0]), &V3([1.9, 0.0, 0.0])), 1.8);
    }

    #[test]
    fn displacement_uses_nearest_image() {
        let s = rocksalt_pair();
        let mut moved = s.clone();
        moved.set_carts(vec![V3([1.95, 0.0, 0.0]), V3([1.0, 1.0, 1.1])]);
        let disp = s.displacement_to(&moved).unwrap();
        assert_close!(abs=1e-12, disp[0], V3([-0.05, 0.0, 0.0]));
        assert_close!(abs=1e-12, disp[1], V3([0.0, 0.0, 0.1]));
    }

    #[test]
    fn strain_keeps_fracs() {
        let s = rocksalt_pair();
        let strained = s.with_lattice(&Lattice::cubic(3.0)).unwrap();
        assert_close!(abs=1e-12, strained.carts()[1], V3([1.5, 1.5, 1.5]));
        assert_close!(abs=1e-12, strained.to_fracs().unwrap(), s.to_fracs().unwrap());
    }
}
