/* ************************************************************************ **
** This file is part of phonsym, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                      **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use serde::de;
use phonsym_symmetry::{AsrMode, Axis};

/// Root settings object.
///
/// This is what you should deserialize.
#[derive(Serialize)]
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSettings(pub Settings);

/// Raw deserialized form of settings.
///
/// You shouldn't deserialize this type directly; deserialize `ValidatedSettings`
/// instead so that the values are checked.
#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Settings {
    /// Tolerance used both to match atoms under symmetry operations and to
    /// decide whether two q-points are equivalent.
    #[serde(default = "_settings__threshold")]
    pub threshold: f64,

    /// Acoustic sum rule applied to the Gamma dynamical matrix.
    ///
    /// One of `simple`, `crystal`, `one-dim`, `zero-dim`, `custom`, `no`.
    #[serde(default)]
    pub asr: AsrMode,

    /// Rotation axis for `asr: one-dim`. Ignored by other modes.
    #[serde(default)]
    pub asr_axis: Axis,

    /// Temperature in Kelvin for thermal quantities.
    ///
    /// `None` means the classical limit is never taken; operations that need a
    /// temperature will use zero.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    /// Log at debug level.
    #[serde(default)]
    pub verbose: bool,
}
fn _settings__threshold() -> f64 { 1e-5 }

impl Default for Settings {
    fn default() -> Self {
        Settings {
            threshold: _settings__threshold(),
            asr: Default::default(),
            asr_axis: Default::default(),
            temperature: None,
            verbose: false,
        }
    }
}

impl Default for ValidatedSettings {
    fn default() -> Self { ValidatedSettings(Settings::default()) }
}

impl<'de> de::Deserialize<'de> for ValidatedSettings {
    fn deserialize<D: de::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let cereal: Settings = de::Deserialize::deserialize(deserializer)?;

        cereal.validate().map_err(de::Error::custom)
    }
}

impl std::ops::Deref for ValidatedSettings {
    type Target = Settings;

    fn deref(&self) -> &Settings { &self.0 }
}
