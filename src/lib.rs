/* ************************************************************************ **
** This file is part of phonsym, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                      **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

#[macro_use]
extern crate log;

pub type FailResult<T> = Result<T, failure::Error>;

pub mod logging;
mod cmd;

pub use crate::cmd::{
    read_settings,
    symmetrize_phonons,
    symmetrize_dynmat_files,
    strain_phonons,
    write_findsym_input,
};
pub use crate::logging::GlobalLogger;

pub use phonsym_config as config;
pub use phonsym_dynmat_io as dynmat_io;
pub use phonsym_phonons as phonons;
pub use phonsym_structure as structure;
pub use phonsym_symmetry as symmetry;
