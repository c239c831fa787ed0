/* ************************************************************************ **
** This file is part of phonsym, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                      **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Checks performed after deserialization.

use crate::config::*;
use failure::Error;
use phonsym_symmetry::AsrMode;

impl Settings {
    pub fn validate(self) -> Result<ValidatedSettings, Error> {
        ensure!(
            self.threshold.is_finite() && self.threshold > 0.0,
            "threshold must be positive (got {})", self.threshold,
        );

        if let Some(temperature) = self.temperature {
            ensure!(
                temperature.is_finite() && temperature >= 0.0,
                "temperature must be non-negative (got {})", temperature,
            );
        }

        if self.asr != AsrMode::OneDim && self.asr_axis != Default::default() {
            warn!("asr-axis has no effect with asr: {}", self.asr);
        }

        Ok(ValidatedSettings(self))
    }
}
