//! Environment-driven settings.
//!
//! Values are resolved from three layers, later layers winning: the shared
//! `.env` file, the environment-specific file (`.env.dev` / `.env.prod`),
//! and the process environment. Missing dotenv files are not errors; a
//! malformed file, an unknown `ENV` value, or a missing `TOKEN` is fatal at
//! startup.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid environment {0:?}: must be 'dev' or 'prod'")]
    InvalidEnv(String),
    #[error("missing required TOKEN variable")]
    MissingToken,
    #[error(
        "failed to parse env file {path}: {source}\n\
         hint: values with spaces must be quoted, e.g.:\n\
         TOKEN=\"abc def\""
    )]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },
}

/// Deployment environment tag, selected once from the `ENV` variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Env {
    Dev,
    Prod,
}

impl Env {
    /// Parse the `ENV` discriminator. Unset defaults to development; any
    /// value other than the four accepted spellings is fatal.
    pub fn from_discriminator(value: Option<&str>) -> Result<Self, SettingsError> {
        match value {
            None => Ok(Env::Dev),
            Some(v) => match v.to_ascii_lowercase().as_str() {
                "dev" | "development" => Ok(Env::Dev),
                "prod" | "production" => Ok(Env::Prod),
                _ => Err(SettingsError::InvalidEnv(v.to_string())),
            },
        }
    }

    /// Environment-specific dotenv file name.
    pub fn dotenv_file(self) -> &'static str {
        match self {
            Env::Dev => ".env.dev",
            Env::Prod => ".env.prod",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Env::Dev => "dev",
            Env::Prod => "prod",
        }
    }
}

/// A string whose value must not leak into logs or debug output. The raw
/// value is only reachable through [`Secret::expose`].
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("**********")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("**********")
    }
}

/// Immutable startup settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub env: Env,
    pub token: Secret,
}

impl Settings {
    /// Resolve settings from the real process environment, with dotenv files
    /// looked up in `dir`.
    pub fn load(dir: &Path) -> Result<Self, SettingsError> {
        let process: HashMap<String, String> = std::env::vars().collect();
        Self::resolve(dir, &process)
    }

    /// Pure resolution core: given a dotenv directory and a snapshot of the
    /// process environment, pick the environment variant, merge the layers,
    /// and validate required fields.
    pub fn resolve(
        dir: &Path,
        process: &HashMap<String, String>,
    ) -> Result<Self, SettingsError> {
        let env = Env::from_discriminator(process.get("ENV").map(String::as_str))?;

        let mut vars = load_env_from_path(&dir.join(".env"))?;
        vars.extend(load_env_from_path(&dir.join(env.dotenv_file()))?);
        vars.extend(process.iter().map(|(k, v)| (k.clone(), v.clone())));

        let token = vars.remove("TOKEN").ok_or(SettingsError::MissingToken)?;
        Ok(Settings {
            env,
            token: Secret::new(token),
        })
    }

    /// One-line startup report, token redacted.
    pub fn report(&self) -> String {
        format!("Project settings: ENV={} TOKEN={}", self.env.as_str(), self.token)
    }
}

/// Load key-value pairs from a dotenv file. A missing file yields an empty
/// map; a malformed file is an error.
fn load_env_from_path(path: &Path) -> Result<HashMap<String, String>, SettingsError> {
    if !path.exists() {
        return Ok(HashMap::new());
    }

    let iter = dotenvy::from_path_iter(path).map_err(|source| SettingsError::EnvFile {
        path: path.to_path_buf(),
        source,
    })?;
    let mut vars = HashMap::new();
    for item in iter {
        let (key, value) = item.map_err(|source| SettingsError::EnvFile {
            path: path.to_path_buf(),
            source,
        })?;
        vars.insert(key, value);
    }
    Ok(vars)
}
