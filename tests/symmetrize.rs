/* ************************************************************************ **
** This file is part of phonsym, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                      **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

#[macro_use]
extern crate phonsym_assert_close;

use phonsym::config::{Settings, ValidatedSettings};
use phonsym::dynmat_io::read_dynmat;
use phonsym::phonons::Phonons;
use phonsym::phonons::consts::AMU_TO_RY;
use phonsym::structure::{Structure, Lattice, CoordsKind};
use phonsym::symmetry::{SymmetryTable, Dynmat, AsrMode, qgrid, qstar};
use phonsym_array_types::V3;

use num_complex::Complex64;
use std::f64::consts::PI;
use tempdir::TempDir;

const SPRING: f64 = 0.01;

fn cscl(a: f64) -> Structure {
    Structure::new(
        Lattice::cubic(a),
        CoordsKind::Fracs(vec![V3([0.0, 0.0, 0.0]), V3([0.5, 0.5, 0.5])]),
        vec!["Cs", "Cl"],
    ).with_masses(vec![("Cs", 132.905 * AMU_TO_RY), ("Cl", 35.453 * AMU_TO_RY)])
}

/// Central springs between nearest neighbors.
fn spring_dynmat(structure: &Structure, q: &V3) -> Dynmat {
    let lattice = structure.lattice().unwrap();
    let carts = structure.carts();
    let cutoff = 1.01 * structure.nearest_image_distance(&carts[0], &carts[1]);
    let n = carts.len();
    let mut out = Dynmat::zeros(3 * n, 3 * n);
    for a in 0..n {
        for b in 0..n {
            for i in -1..=1 {
                for j in -1..=1 {
                    for k in -1..=1 {
                        let cell = V3([i as f64, j as f64, k as f64]) * lattice;
                        let d = carts[b] + cell - carts[a];
                        let r = d.norm();
                        if r < 1e-8 || r > cutoff {
                            continue;
                        }
                        let u = d / r;
                        let phase = Complex64::from_polar(1.0, 2.0 * PI * q.dot(&cell));
                        for row in 0..3 {
                            for col in 0..3 {
                                let c = SPRING * u[row] * u[col];
                                out[(3 * a + row, 3 * b + col)] -= phase * c;
                                out[(3 * a + row, 3 * a + col)] += Complex64::new(c, 0.0);
                            }
                        }
                    }
                }
            }
        }
    }
    out
}

fn noise(dim: usize, seed: usize) -> Dynmat {
    Dynmat::from_fn(dim, dim, |i, j| {
        let re = ((i * 7 + j * 3 + seed) % 5) as f64 - 2.0;
        let im = ((i + 2 * j + seed) % 3) as f64 - 1.0;
        Complex64::new(re, im) * 1e-5
    })
}

fn grid_phonons(structure: &Structure) -> Phonons {
    let qs = qgrid::q_grid(structure.lattice().unwrap(), [2, 2, 2]).unwrap();
    let mut table = SymmetryTable::new(structure, 1e-5).unwrap();
    let stars = qstar::partition(&mut table, &qs).unwrap().into_stars();
    let dynmats = stars.iter().flatten().map(|q| spring_dynmat(structure, q)).collect();
    Phonons::from_parts(structure.clone(), stars, dynmats).unwrap()
}

fn symmetrize_default(phonons: &mut Phonons) {
    phonsym::symmetrize_phonons(&Settings::default(), phonons).unwrap();
}

fn max_abs_diff(a: &Dynmat, b: &Dynmat) -> f64 {
    (a - b).iter().map(|x| x.norm()).fold(0.0, f64::max)
}

#[test]
fn noisy_gamma_file() {
    let mut phonons = read_dynmat("tests/resources/cscl-noisy/dyn", 1).unwrap();
    assert!(phonons.is_gamma_only());
    let before = phonons.diagonalize_at(0).unwrap();
    assert!(before.frequencies[..3].iter().any(|w| w.abs() > 1e-7));

    symmetrize_default(&mut phonons);
    let after = phonons.diagonalize_at(0).unwrap();
    assert_close!(abs=1e-7, after.frequencies[..3], [0.0; 3][..]);
    let optical = after.frequencies[3];
    assert!(optical > 0.0);
    assert_close!(rel=1e-8, after.frequencies[3..], [optical; 3][..]);
}

#[test]
fn spring_grid_is_a_fixed_point() {
    let exact = grid_phonons(&cscl(4.12));
    assert_eq!(exact.q_stars().iter().map(Vec::len).collect::<Vec<_>>(), vec![1, 3, 3, 1]);

    let mut phonons = exact.clone();
    symmetrize_default(&mut phonons);
    for (a, b) in exact.dynmats().iter().zip(phonons.dynmats()) {
        assert!(max_abs_diff(a, b) < 1e-10);
    }
}

#[test]
fn symmetrize_files() {
    let dir = TempDir::new("phonsym-integration").unwrap();
    let exact = grid_phonons(&cscl(4.12));

    let mut noisy = exact.clone();
    for iq in 0..noisy.num_q_points() {
        let dynmat = noisy.dynmat(iq).unwrap() + noise(6, iq);
        noisy.set_dynmat(iq, dynmat).unwrap();
    }
    phonsym::dynmat_io::write_dynmat(&noisy, dir.path().join("noisy")).unwrap();

    let settings = Settings { asr: AsrMode::Crystal, ..Settings::default() };
    let symmetrized = phonsym::symmetrize_dynmat_files(
        &settings, dir.path().join("noisy"), 4, dir.path().join("clean"),
    ).unwrap();
    assert!(symmetrized.check_compatibility(&exact));
    for (a, b) in symmetrized.dynmats().iter().zip(exact.dynmats()) {
        // the noise is only partly removed, but it cannot grow
        assert!(max_abs_diff(a, b) < 2e-4);
    }

    let mut reread = read_dynmat(dir.path().join("clean"), 4).unwrap();
    assert!(reread.check_compatibility(&symmetrized));
    for (a, b) in reread.dynmats().iter().zip(symmetrized.dynmats()) {
        assert!(max_abs_diff(a, b) < 1e-7);
    }

    let once = reread.clone();
    phonsym::symmetrize_phonons(&settings, &mut reread).unwrap();
    for (a, b) in reread.dynmats().iter().zip(once.dynmats()) {
        assert!(max_abs_diff(a, b) < 1e-7);
    }
}

#[test]
fn settings_file() {
    let settings = phonsym::read_settings("tests/resources/settings.yaml").unwrap();
    assert_eq!(settings.threshold, 1e-4);
    assert_eq!(settings.asr, AsrMode::Crystal);
    assert_eq!(settings.temperature, Some(300.0));
    assert_ne!(settings, ValidatedSettings::default());

    assert!(phonsym::read_settings("tests/resources/no-such-file.yaml").is_err());
}

#[test]
fn strain_at_zero_temperature() {
    let structure = cscl(4.12);
    let gamma = spring_dynmat(&structure, &V3::zero());
    let phonons = Phonons::from_parts(structure, vec![vec![V3::zero()]], vec![gamma]).unwrap();
    let w = phonons.diagonalize_at(0).unwrap().frequencies[3];

    let s = 1.02;
    let strained = phonsym::strain_phonons(&Settings::default(), &phonons, &Lattice::cubic(4.12 * s)).unwrap();
    let modes = strained.diagonalize_at(0).unwrap();
    assert_close!(rel=1e-6, modes.frequencies[3..], [w / (s * s); 3][..]);
    assert_close!(abs=1e-10, strained.structure().carts()[1], V3([2.06 * s; 3]));
}

#[test]
fn findsym_input_file() {
    let dir = TempDir::new("phonsym-integration").unwrap();
    let path = dir.path().join("findsym.in");
    phonsym::write_findsym_input(&Settings::default(), &cscl(4.12), &path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("!useKeyWords"));
    assert!(text.contains("Cs Cl"));
}
