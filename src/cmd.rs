/* ************************************************************************ **
** This file is part of phonsym, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                      **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! High-level entry points that apply settings to phonons.

use crate::FailResult;

use phonsym_config::{Settings, ValidatedSettings, YamlRead};
use phonsym_dynmat_io::{read_dynmat, write_dynmat, findsym};
use phonsym_phonons::Phonons;
use phonsym_structure::{Structure, Lattice};

use failure::ResultExt;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

/// Read and validate a YAML settings file.
pub fn read_settings(path: impl AsRef<Path>) -> FailResult<ValidatedSettings>
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|e| format!("while opening file '{}': {}", path.display(), e))?;
    let settings = ValidatedSettings::from_reader(BufReader::new(file))
        .with_context(|e| format!("{}: {}", path.display(), e))?;
    Ok(settings)
}

/// Symmetrize in place using the threshold and acoustic sum rule from `settings`.
pub fn symmetrize_phonons(settings: &Settings, phonons: &mut Phonons) -> FailResult<()>
{
    phonons.symmetrize(settings.threshold, settings.asr, settings.asr_axis)
}

/// Read `nqirr` dynamical matrix files, symmetrize them, and write them back
/// out under `output_prefix`.
pub fn symmetrize_dynmat_files(
    settings: &Settings,
    input_prefix: impl AsRef<Path>,
    nqirr: usize,
    output_prefix: impl AsRef<Path>,
) -> FailResult<Phonons>
{
    let mut phonons = read_dynmat(input_prefix.as_ref(), nqirr)?;
    info!(
        "Read {} q-points in {} stars from {}*",
        phonons.num_q_points(), phonons.num_stars(), input_prefix.as_ref().display(),
    );
    symmetrize_phonons(settings, &mut phonons)?;
    write_dynmat(&phonons, output_prefix.as_ref())?;
    Ok(phonons)
}

/// Carry Γ-point phonons to a new cell at the configured temperature.
pub fn strain_phonons(settings: &Settings, phonons: &Phonons, new_cell: &Lattice) -> FailResult<Phonons>
{
    let temperature = settings.temperature.unwrap_or(0.0);
    debug!("Straining phonons at T = {} K", temperature);
    phonons.strained(new_cell, temperature)
}

/// Write an input file for ISOTROPY's `findsym`, using the symmetry
/// threshold as the position tolerance.
pub fn write_findsym_input(settings: &Settings, structure: &Structure, path: impl AsRef<Path>) -> FailResult<()>
{
    let path = path.as_ref();
    let text = findsym::input_string(structure, "phonsym", settings.threshold, settings.threshold)?;
    let mut file = File::create(path)
        .with_context(|e| format!("while creating file '{}': {}", path.display(), e))?;
    file.write_all(text.as_bytes())?;
    Ok(())
}
