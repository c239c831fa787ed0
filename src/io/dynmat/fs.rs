/* ************************************************************************ **
** This file is part of phonsym, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                      **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! fs helpers that tell us what file had a problem

use crate::FailResult;

use failure::ResultExt;
use std::ffi::OsString;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

pub(crate) fn open_text(path: &Path) -> FailResult<BufReader<File>>
{
    let file = File::open(path)
        .with_context(|e| format!("while opening file '{}': {}", path.display(), e))?;
    Ok(BufReader::new(file))
}

pub(crate) fn create_text(path: &Path) -> FailResult<BufWriter<File>>
{
    let file = File::create(path)
        .with_context(|e| format!("while creating file '{}': {}", path.display(), e))?;
    Ok(BufWriter::new(file))
}

/// `prefix` with a number appended to the file name (`dyn` -> `dyn3`).
pub(crate) fn numbered(prefix: &Path, index: usize) -> PathBuf
{
    let mut name = OsString::from(prefix.as_os_str());
    name.push(index.to_string());
    PathBuf::from(name)
}
