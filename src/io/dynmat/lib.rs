/* ************************************************************************ **
** This file is part of phonsym, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                      **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

#[macro_use] extern crate failure;
#[macro_use] extern crate log;
#[macro_use] extern crate itertools;
#[cfg(test)] #[macro_use] extern crate phonsym_assert_close;

pub type FailResult<T> = Result<T, failure::Error>;

mod fs;
pub mod qe;
pub mod findsym;

pub use crate::qe::{DynmatFile, read_dynmat, write_dynmat};
