/* ************************************************************************ **
** This file is part of phonsym, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                      **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Quantum ESPRESSO dynamical matrix files (`ibrav = 0` only).
//!
//! One file holds one star of q-points. In the file, lengths are in units
//! of `alat` (given in bohr) and q-points in units of `2π/alat`. In memory,
//! lengths are in Å and q-points are cartesian in Å⁻¹ with no factor of 2π,
//! so the two q-point conventions differ only by the factor `alat`.

use crate::FailResult;
use crate::fs;

use phonsym_array_types::V3;
use phonsym_structure::{Structure, Lattice, CoordsKind};
use phonsym_symmetry::Dynmat;
use phonsym_phonons::Phonons;
use phonsym_phonons::consts::{BOHR_TO_ANGSTROM, RY_TO_CM, RY_TO_THZ};

use failure::ResultExt;
use num_complex::Complex64;
use std::io::prelude::*;
use std::path::Path;

const TITLE: &str = "Dynamical matrix file";
const COMMENT: &str = "File generated by phonsym";
const MATRIX_HEADER: &str = "Dynamical  Matrix in cartesian axes";
const DIAGONALIZATION_HEADER: &str = "Diagonalizing the dynamical matrix";

//--------------------------------------------------------------------------------------
// public API

/// The contents of a single dynamical matrix file.
#[derive(Debug, Clone)]
pub struct DynmatFile {
    /// Positions in Å, with masses in Rydberg units.
    pub structure: Structure,
    /// The length unit of the file, in Å.
    pub alat: f64,
    /// The star, cartesian in Å⁻¹ without 2π.
    pub q_points: Vec<V3>,
    /// One matrix per q-point, in Ry/bohr².
    pub dynmats: Vec<Dynmat>,
}

impl DynmatFile {
    pub fn from_reader(r: impl BufRead) -> FailResult<DynmatFile>
    { load(&mut r.lines()) }

    /// Writes the file, including the frequencies and polarizations at
    /// the first q-point.
    pub fn to_writer(&self, mut w: impl Write) -> FailResult<()>
    { dump(&mut w, self) }
}

/// Read the files `prefix1` through `prefix{nqirr}`, one star each.
pub fn read_dynmat(prefix: impl AsRef<Path>, nqirr: usize) -> FailResult<Phonons>
{
    ensure!(nqirr > 0, "at least one dynamical matrix file is required");

    let mut structure: Option<Structure> = None;
    let mut q_stars = vec![];
    let mut dynmats = vec![];
    for iq in 1..=nqirr {
        let path = fs::numbered(prefix.as_ref(), iq);
        let file = DynmatFile::from_reader(fs::open_text(&path)?)
            .with_context(|e| format!("{}: {}", path.display(), e))?;
        debug!("read {} q-points from {}", file.q_points.len(), path.display());

        if let Some(first) = &structure {
            ensure!(
                first.num_atoms() == file.structure.num_atoms() && first.species() == file.structure.species(),
                "{}: the atoms differ from those of the first file", path.display(),
            );
        } else {
            structure = Some(file.structure);
        }
        q_stars.push(file.q_points);
        dynmats.extend(file.dynmats);
    }
    let structure = structure.expect("(BUG) nqirr > 0");
    Phonons::from_parts(structure, q_stars, dynmats)
}

/// Write one file per star, as `prefix1`, `prefix2`, ...
///
/// The length of the first lattice vector is used as `alat`.
pub fn write_dynmat(phonons: &Phonons, prefix: impl AsRef<Path>) -> FailResult<()>
{
    let lattice = phonons.structure().require_lattice()?;
    let alat = lattice.vectors()[0].norm();

    let mut offset = 0;
    for (istar, star) in phonons.q_stars().iter().enumerate() {
        let file = DynmatFile {
            structure: phonons.structure().clone(),
            alat,
            q_points: star.clone(),
            dynmats: phonons.dynmats()[offset..offset + star.len()].to_vec(),
        };
        offset += star.len();

        let path = fs::numbered(prefix.as_ref(), istar + 1);
        let mut w = fs::create_text(&path)?;
        file.to_writer(&mut w)?;
        w.flush()?;
    }
    Ok(())
}

//--------------------------------------------------------------------------------------
// reading

type Lines<'a> = dyn Iterator<Item=std::io::Result<String>> + 'a;

fn next_line(lines: &mut Lines<'_>, what: &str) -> FailResult<String>
{
    match lines.next() {
        Some(line) => Ok(line?),
        None => bail!("unexpected end of file while reading {}", what),
    }
}

fn parse_floats(s: &str, what: &str) -> FailResult<Vec<f64>>
{
    s.split_whitespace()
        .map(|word| word.parse::<f64>().map_err(|_| format_err!("bad number {:?} in {}", word, what)))
        .collect()
}

fn parse_v3(s: &str, what: &str) -> FailResult<V3>
{
    match parse_floats(s, what)?[..] {
        [x, y, z] => Ok(V3([x, y, z])),
        _ => bail!("expected 3 numbers in {}, got {:?}", what, s),
    }
}

fn load(lines: &mut Lines<'_>) -> FailResult<DynmatFile>
{
    let _title = next_line(lines, "title")?;
    let _comment = next_line(lines, "comment")?;

    let line = next_line(lines, "cell parameters")?;
    let words: Vec<&str> = line.split_whitespace().collect();
    ensure!(words.len() >= 4, "expected 'ntyp nat ibrav celldm(1)...', got {:?}", line);
    let ntyp: usize = words[0].parse()?;
    let nat: usize = words[1].parse()?;
    let ibrav: i32 = words[2].parse()?;
    ensure!(ibrav == 0, "only ibrav = 0 is supported (got {})", ibrav);
    let alat = words[3].parse::<f64>()? * BOHR_TO_ANGSTROM;

    let line = next_line(lines, "basis vectors")?;
    ensure!(line.contains("Basis vectors"), "expected 'Basis vectors', got {:?}", line);
    let mut vectors = [V3::zero(); 3];
    for v in &mut vectors {
        *v = parse_v3(&next_line(lines, "basis vectors")?, "basis vectors")? * alat;
    }

    let mut labels = vec![];
    let mut masses = vec![];
    for _ in 0..ntyp {
        let line = next_line(lines, "species")?;
        let parts: Vec<&str> = line.split('\'').collect();
        ensure!(parts.len() == 3, "expected \"i 'Label' mass\", got {:?}", line);
        labels.push(parts[1].trim().to_string());
        masses.push(parts[2].trim().parse::<f64>()?);
    }

    let mut carts = vec![];
    let mut species = vec![];
    for _ in 0..nat {
        let line = next_line(lines, "atoms")?;
        let words: Vec<&str> = line.split_whitespace().collect();
        ensure!(words.len() == 5, "expected 'i ityp x y z', got {:?}", line);
        let ityp: usize = words[1].parse()?;
        ensure!(1 <= ityp && ityp <= ntyp, "species index {} out of range", ityp);
        species.push(labels[ityp - 1].clone());
        carts.push(parse_v3(&words[2..].join(" "), "atoms")? * alat);
    }

    let structure = Structure::new(Lattice::from_vectors(&vectors), CoordsKind::Carts(carts), species)
        .with_masses(izip!(labels, masses));

    let (q_points, dynmats) = load_matrices(lines, nat, alat)?;
    ensure!(!q_points.is_empty(), "no dynamical matrices in file");
    Ok(DynmatFile { structure, alat, q_points, dynmats })
}

struct Partial {
    q: V3,
    matrix: Dynmat,
    pair: Option<(usize, usize)>,
    row: usize,
    rows_read: usize,
}

impl Partial {
    fn finish(self, nat: usize) -> FailResult<(V3, Dynmat)>
    {
        ensure!(
            self.rows_read == 3 * nat * nat,
            "incomplete dynamical matrix at q = {:?} ({} of {} rows)", self.q, self.rows_read, 3 * nat * nat,
        );
        Ok((self.q, self.matrix))
    }
}

fn load_matrices(lines: &mut Lines<'_>, nat: usize, alat: f64) -> FailResult<(Vec<V3>, Vec<Dynmat>)>
{
    let mut q_points = vec![];
    let mut dynmats = vec![];
    let mut current: Option<Partial> = None;
    let mut expecting_q = false;

    for line in lines {
        let line = line?;
        let line = line.trim();
        if line.contains(DIAGONALIZATION_HEADER) {
            break;
        }
        if line.contains("Matrix in cartesian axes") {
            if let Some(partial) = current.take() {
                let (q, matrix) = partial.finish(nat)?;
                q_points.push(q);
                dynmats.push(matrix);
            }
            expecting_q = true;
            continue;
        }
        if expecting_q && line.starts_with("q = (") {
            let inner = line.trim_start_matches("q = (").trim_end_matches(')');
            let q = parse_v3(inner, "q-point")? / alat;
            current = Some(Partial { q, matrix: Dynmat::zeros(3 * nat, 3 * nat), pair: None, row: 0, rows_read: 0 });
            expecting_q = false;
            continue;
        }

        // blank lines, dielectric data and effective charges outside of a matrix are skipped
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() || current.is_none() {
            continue;
        }
        let pair = match &words[..] {
            [a, b] => a.parse::<usize>().ok().zip(b.parse::<usize>().ok()),
            _ => None,
        };
        let is_row = words.len() == 6 && words.iter().all(|w| w.parse::<f64>().is_ok());
        if pair.is_none() && !is_row {
            // some other section begins; the matrix ends here
            let partial = current.take().expect("(BUG) checked above");
            let (q, matrix) = partial.finish(nat)?;
            q_points.push(q);
            dynmats.push(matrix);
            continue;
        }

        let partial = current.as_mut().expect("(BUG) checked above");
        if let Some((a, b)) = pair {
            ensure!(1 <= a && a <= nat && 1 <= b && b <= nat, "atom pair ({}, {}) out of range", a, b);
            partial.pair = Some((a - 1, b - 1));
            partial.row = 0;
        } else {
            let (a, b) = partial.pair.ok_or_else(|| format_err!("matrix row before atom pair: {:?}", line))?;
            ensure!(partial.row < 3, "too many rows for atom pair ({}, {})", a + 1, b + 1);
            let x = parse_floats(line, "dynamical matrix")?;
            for k in 0..3 {
                partial.matrix[(3 * a + partial.row, 3 * b + k)] = Complex64::new(x[2 * k], x[2 * k + 1]);
            }
            partial.row += 1;
            partial.rows_read += 1;
        }
    }
    if let Some(partial) = current.take() {
        let (q, matrix) = partial.finish(nat)?;
        q_points.push(q);
        dynmats.push(matrix);
    }
    Ok((q_points, dynmats))
}

//--------------------------------------------------------------------------------------
// writing

fn dump(w: &mut dyn Write, file: &DynmatFile) -> FailResult<()>
{
    let DynmatFile { structure, alat, q_points, dynmats } = file;
    let alat = *alat;
    ensure!(q_points.len() == dynmats.len(), "{} q-points but {} matrices", q_points.len(), dynmats.len());
    ensure!(!q_points.is_empty(), "a dynamical matrix file needs at least one q-point");

    let lattice = structure.require_lattice()?;
    let labels = structure.species_labels();
    let species = structure.species_indices();
    let mass_table = structure.mass_table();
    let nat = structure.num_atoms();

    writeln!(w, "{}", TITLE)?;
    writeln!(w, "{}", COMMENT)?;
    writeln!(
        w, "{} {} {} {:.8} {:.8} {:.8} {:.8} {:.8} {:.8}",
        labels.len(), nat, 0, alat / BOHR_TO_ANGSTROM, 0.0, 0.0, 0.0, 0.0, 0.0,
    )?;
    writeln!(w, "Basis vectors")?;
    for v in lattice.vectors() {
        let V3([x, y, z]) = *v / alat;
        writeln!(w, "{:14.10} {:14.10} {:14.10}", x, y, z)?;
    }
    for (i, label) in labels.iter().enumerate() {
        let mass = mass_table.get(label)
            .ok_or_else(|| format_err!("no mass is defined for species '{}'", label))?;
        writeln!(w, "\t{}  '{} '  {:.8}", i + 1, label, mass)?;
    }
    for (i, (cart, ityp)) in izip!(structure.carts(), &species).enumerate() {
        let V3([x, y, z]) = *cart / alat;
        writeln!(w, "{:5} {:5} {:15.10} {:15.10} {:15.10}", i + 1, ityp + 1, x, y, z)?;
    }

    for (q, dynmat) in izip!(q_points, dynmats) {
        ensure!(dynmat.shape() == (3 * nat, 3 * nat), "dynamical matrix has the wrong shape");
        writeln!(w)?;
        writeln!(w, "     {}", MATRIX_HEADER)?;
        writeln!(w)?;
        write_q(w, &(q * alat))?;
        writeln!(w)?;
        for a in 0..nat {
            for b in 0..nat {
                writeln!(w, "{:5}{:5}", a + 1, b + 1)?;
                for row in 0..3 {
                    let x = |k: usize| dynmat[(3 * a + row, 3 * b + k)];
                    writeln!(
                        w, "{:12.8} {:12.8}   {:12.8} {:12.8}   {:12.8} {:12.8}",
                        x(0).re, x(0).im, x(1).re, x(1).im, x(2).re, x(2).im,
                    )?;
                }
            }
        }
    }

    // frequencies at the first member of the star
    let phonons = Phonons::from_parts(structure.clone(), vec![q_points.clone()], dynmats.clone())?;
    let modes = phonons.diagonalize_at(0)?;
    writeln!(w)?;
    writeln!(w, "     {}", DIAGONALIZATION_HEADER)?;
    writeln!(w)?;
    write_q(w, &(q_points[0] * alat))?;
    writeln!(w)?;
    writeln!(w, "{}", "*".repeat(75))?;
    for (mu, &freq) in modes.frequencies.iter().enumerate() {
        writeln!(
            w, "     freq ({:5}) = {:14.8} [THz] = {:14.8} [cm-1]",
            mu + 1, freq * RY_TO_THZ, freq * RY_TO_CM,
        )?;
        for a in 0..nat {
            let e = |k: usize| modes.polarizations[(3 * a + k, mu)];
            writeln!(
                w, "( {:10.6}{:10.6} {:10.6}{:10.6} {:10.6}{:10.6} )",
                e(0).re, e(0).im, e(1).re, e(1).im, e(2).re, e(2).im,
            )?;
        }
    }
    writeln!(w, "{}", "*".repeat(75))?;
    Ok(())
}

fn write_q(w: &mut dyn Write, q: &V3) -> FailResult<()>
{
    writeln!(w, "     q = (    {:.9}   {:.9}   {:.9} )", q[0], q[1], q[2])?;
    Ok(())
}
