use crate::web::IntegrationMode;
use std::env;
use std::env::VarError;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Get the database URL from the environment variable.
pub fn get_database_url_from_env() -> Result<String, SetupError> {
    env::var("DATABASE_URL").map_err(|e| SetupError::from_env_error(e, "DATABASE_URL"))
}

/// Get the web server TCP listening port from the environment variable
pub fn get_listen_port_from_env() -> Result<u16, SetupError> {
    env::var("LISTEN_PORT")
        .map_err(|e| SetupError::from_env_error(e, "LISTEN_PORT"))
        .and_then(|v| {
            v.parse().map_err(|_| SetupError::EnvVariableInvalid {
                variable_name: "LISTEN_PORT",
                problem: "Not a valid uint16",
            })
        })
}

/// Get the web server TCP listening interface address from the environment variable
pub fn get_listen_address_from_env() -> Result<String, SetupError> {
    env::var("LISTEN_ADDRESS").map_err(|e| SetupError::from_env_error(e, "LISTEN_ADDRESS"))
}

/// Get the way the banner is put into pages from the environment variable
/// `BANNER_INTEGRATION_MODE` (`inline` or `async`). Defaults to `inline`.
pub fn get_integration_mode_from_env() -> Result<IntegrationMode, SetupError> {
    optional_env_var("BANNER_INTEGRATION_MODE")?
        .map(|v| {
            v.parse().map_err(|_| SetupError::EnvVariableInvalid {
                variable_name: "BANNER_INTEGRATION_MODE",
                problem: "Must be 'inline' or 'async'",
            })
        })
        .unwrap_or(Ok(IntegrationMode::Inline))
}

/// Get the directory of the built-in banner templates from the environment variable, if set.
pub fn get_template_dir_from_env() -> Result<Option<PathBuf>, SetupError> {
    Ok(optional_env_var("BANNER_TEMPLATE_DIR")?.map(PathBuf::from))
}

/// Get the path of the content override file from the environment variable, if set.
pub fn get_override_file_from_env() -> Result<Option<PathBuf>, SetupError> {
    Ok(optional_env_var("BANNER_OVERRIDE_FILE")?.map(PathBuf::from))
}

/// Get the locale for the admin user interface from the environment variable. Defaults to `en`.
pub fn get_locale_from_env() -> Result<String, SetupError> {
    Ok(optional_env_var("BANNER_LOCALE")?.unwrap_or_else(|| "en".to_owned()))
}

pub fn get_separate_guest_content_from_env() -> Result<bool, SetupError> {
    bool_env_var("BANNER_SEPARATE_GUEST_CONTENT", true)
}

pub fn get_recheck_after_override_from_env() -> Result<bool, SetupError> {
    bool_env_var("BANNER_RECHECK_AFTER_OVERRIDE", false)
}

fn optional_env_var(variable_name: &'static str) -> Result<Option<String>, SetupError> {
    match env::var(variable_name) {
        Ok(v) if v.is_empty() => Ok(None),
        Ok(v) => Ok(Some(v)),
        Err(VarError::NotPresent) => Ok(None),
        Err(e) => Err(SetupError::from_env_error(e, variable_name)),
    }
}

fn bool_env_var(variable_name: &'static str, default: bool) -> Result<bool, SetupError> {
    match optional_env_var(variable_name)? {
        None => Ok(default),
        Some(v) => match v.to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(SetupError::EnvVariableInvalid {
                variable_name,
                problem: "Not a boolean value",
            }),
        },
    }
}

#[derive(Debug)]
pub enum SetupError {
    EnvVariableMissing {
        variable_name: &'static str,
    },
    EnvVariableInvalid {
        variable_name: &'static str,
        problem: &'static str,
    },
}

impl SetupError {
    fn from_env_error(error: VarError, variable_name: &'static str) -> Self {
        match error {
            VarError::NotPresent => Self::EnvVariableMissing { variable_name },
            VarError::NotUnicode(_) => Self::EnvVariableInvalid {
                variable_name,
                problem: "no valid unicode",
            },
        }
    }
}

impl Display for SetupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SetupError::EnvVariableMissing { variable_name } => {
                write!(f, "Environment variable {} must be defined", variable_name)
            }
            SetupError::EnvVariableInvalid {
                variable_name,
                problem,
            } => write!(
                f,
                "Value of environment variable {} is invalid: {}",
                variable_name, problem
            ),
        }
    }
}
