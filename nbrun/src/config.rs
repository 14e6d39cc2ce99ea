//! Analysis-run settings derived from defaults, a sidecar file, and the
//! process environment.
//!
//! Precedence is fixed: in-code defaults are overlaid by the optional
//! sidecar YAML file (`mar_config.yaml`), which in turn is overlaid by
//! `MAR_*` environment variables. [`RunSettings::resolve`] is a pure
//! function over an explicit environment snapshot; [`RunSettings::load`]
//! is the thin filesystem/process wrapper around it.

use crate::errors::NbrunError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Name of the sidecar settings file looked up next to the notebook.
pub const SIDECAR_FILE: &str = "mar_config.yaml";

/// Prefix of the environment variables that override file settings.
pub const ENV_PREFIX: &str = "MAR_";

/// Settings for one analysis run.
///
/// Values are kept as strings: environment variables are strings, and
/// numeric YAML scalars are coerced on read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSettings {
    /// Beginning year of the analysis.
    pub startyr: Option<String>,
    /// Ending year of the analysis.
    pub endyr: Option<String>,
    /// Experiment id in the external database.
    pub dora_id: Option<String>,
}

/// Shape of the sidecar file. Unknown keys are ignored.
#[derive(Debug, Default, Deserialize)]
struct SidecarFile {
    #[serde(default)]
    experiment: Option<serde_yaml::Value>,
    #[serde(default)]
    start_year: Option<serde_yaml::Value>,
    #[serde(default)]
    end_year: Option<serde_yaml::Value>,
}

fn scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl RunSettings {
    /// Creates empty settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the start year.
    #[must_use]
    pub fn with_startyr(mut self, startyr: impl Into<String>) -> Self {
        self.startyr = Some(startyr.into());
        self
    }

    /// Sets the end year.
    #[must_use]
    pub fn with_endyr(mut self, endyr: impl Into<String>) -> Self {
        self.endyr = Some(endyr.into());
        self
    }

    /// Sets the experiment id.
    #[must_use]
    pub fn with_dora_id(mut self, dora_id: impl Into<String>) -> Self {
        self.dora_id = Some(dora_id.into());
        self
    }

    /// Resolves final settings from defaults, optional sidecar file
    /// contents, and an environment snapshot.
    ///
    /// File values replace defaults; environment values replace both.
    pub fn resolve(
        defaults: Self,
        sidecar_yaml: Option<&str>,
        env: &HashMap<String, String>,
    ) -> Result<Self, NbrunError> {
        let mut settings = defaults;

        if let Some(raw) = sidecar_yaml {
            let file: SidecarFile = serde_yaml::from_str(raw)?;
            if let Some(value) = file.experiment.as_ref().and_then(scalar_to_string) {
                settings.dora_id = Some(value);
            }
            if let Some(value) = file.start_year.as_ref().and_then(scalar_to_string) {
                settings.startyr = Some(value);
            }
            if let Some(value) = file.end_year.as_ref().and_then(scalar_to_string) {
                settings.endyr = Some(value);
            }
        }

        if let Some(value) = env.get(&format!("{ENV_PREFIX}STARTYR")) {
            settings.startyr = Some(value.clone());
        }
        if let Some(value) = env.get(&format!("{ENV_PREFIX}ENDYR")) {
            settings.endyr = Some(value.clone());
        }
        if let Some(value) = env.get(&format!("{ENV_PREFIX}DORA_ID")) {
            settings.dora_id = Some(value.clone());
        }

        Ok(settings)
    }

    /// Resolves settings for `dir`, reading [`SIDECAR_FILE`] from it if
    /// present and snapshotting the process environment.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, NbrunError> {
        let sidecar_path = dir.as_ref().join(SIDECAR_FILE);
        let raw = if sidecar_path.exists() {
            Some(fs::read_to_string(&sidecar_path)?)
        } else {
            None
        };
        let env: HashMap<String, String> = std::env::vars().collect();
        Self::resolve(Self::default(), raw.as_deref(), &env)
    }
}
