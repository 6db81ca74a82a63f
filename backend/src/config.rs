//! Application configuration file support.
//!
//! Settings come from an optional `school.toml` and are then overridden by
//! environment variables:
//!
//! | Variable                | Setting               |
//! |-------------------------|-----------------------|
//! | `HOST`                  | `server.host`         |
//! | `PORT`                  | `server.port`         |
//! | `REPOSITORY_TYPE`       | `repository.type`     |
//! | `SCHOOL_ADMIN_PASSWORD` | `admin.password`      |
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//!
//! [repository]
//! type = "local"
//!
//! [grading]
//! midterm_weight = 0.4
//! final_weight = 0.6
//!
//! [admin]
//! password = "change-me-now"
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::db::factory::RepositoryType;

/// Errors raised while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub repository: RepositorySettings,
    #[serde(default)]
    pub grading: GradingConfig,
    #[serde(default)]
    pub admin: AdminSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type", default = "default_repo_type")]
    pub repo_type: String,
}

fn default_repo_type() -> String {
    "local".to_string()
}

impl Default for RepositorySettings {
    fn default() -> Self {
        Self {
            repo_type: default_repo_type(),
        }
    }
}

/// Exam weights used for a student's average.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradingConfig {
    #[serde(default = "default_midterm_weight")]
    pub midterm_weight: f64,
    #[serde(default = "default_final_weight")]
    pub final_weight: f64,
}

fn default_midterm_weight() -> f64 {
    0.4
}

fn default_final_weight() -> f64 {
    0.6
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            midterm_weight: default_midterm_weight(),
            final_weight: default_final_weight(),
        }
    }
}

impl GradingConfig {
    /// Weighted exam average.
    pub fn average(&self, midterm: f64, final_exam: f64) -> f64 {
        midterm * self.midterm_weight + final_exam * self.final_weight
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let weights = [self.midterm_weight, self.final_weight];
        if weights.iter().any(|w| !(0.0..=1.0).contains(w)) {
            return Err(ConfigError::Invalid(
                "grading weights must be between 0 and 1".to_string(),
            ));
        }
        if ((self.midterm_weight + self.final_weight) - 1.0).abs() > 1e-9 {
            return Err(ConfigError::Invalid(format!(
                "grading weights must sum to 1, got {} + {}",
                self.midterm_weight, self.final_weight
            )));
        }
        Ok(())
    }
}

/// Profile of the built-in administrator seeded on an empty store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminSettings {
    #[serde(default = "default_admin_password")]
    pub password: String,
    #[serde(default = "default_admin_name")]
    pub name: String,
    #[serde(default = "default_admin_name")]
    pub surname: String,
    #[serde(default = "default_admin_ssn")]
    pub ssn: String,
    #[serde(default = "default_admin_phone")]
    pub phone_number: String,
    #[serde(default = "default_admin_email")]
    pub email: String,
}

fn default_admin_password() -> String {
    "12345678".to_string()
}

fn default_admin_name() -> String {
    "Admin".to_string()
}

fn default_admin_ssn() -> String {
    "000-00-0000".to_string()
}

fn default_admin_phone() -> String {
    "000-000-0000".to_string()
}

fn default_admin_email() -> String {
    "admin@school.local".to_string()
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            password: default_admin_password(),
            name: default_admin_name(),
            surname: default_admin_name(),
            ssn: default_admin_ssn(),
            phone_number: default_admin_phone(),
            email: default_admin_email(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Search `school.toml` in the current directory, `backend/` and the
    /// parent directory. Defaults apply when no file exists.
    pub fn from_default_location() -> Result<Self, ConfigError> {
        let search_paths = [
            PathBuf::from("school.toml"),
            PathBuf::from("backend/school.toml"),
            PathBuf::from("../school.toml"),
        ];

        match search_paths.iter().find(|p| p.exists()) {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// File (if any), then process environment, then validation.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_default_location()?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `HOST`, `PORT`, `REPOSITORY_TYPE` and `SCHOOL_ADMIN_PASSWORD`
    /// as returned by `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("PORT is not a port number: {}", port)))?;
        }
        if let Some(repo_type) = lookup("REPOSITORY_TYPE") {
            self.repository.repo_type = repo_type;
        }
        if let Some(password) = lookup("SCHOOL_ADMIN_PASSWORD") {
            self.admin.password = password;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.repository_type()?;
        self.grading.validate()?;
        if self.admin.password.chars().count() < 8 {
            return Err(ConfigError::Invalid(
                "admin password must be at least 8 characters".to_string(),
            ));
        }
        Ok(())
    }

    pub fn repository_type(&self) -> Result<RepositoryType, ConfigError> {
        RepositoryType::from_str(&self.repository.repo_type).map_err(ConfigError::Invalid)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
