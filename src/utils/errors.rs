#![forbid(unsafe_code)]

use poem_openapi::Object;
use thiserror::Error;

/// Error enumerates the errors returned by this application.
#[derive(Error, Debug)]
pub enum Errors {
    /// Input parameter logging.
    #[error("finacle_api input parameters:\n{}", .0)]
    InputParms(String),

    /// Inaccessible logger configuration file.
    #[error("Unable to access the Log4rs configuration file: {}", .0)]
    Log4rsInitialization(String),

    #[error("Reading application configuration file: {}", .0)]
    ReadingConfigFile(String),

    #[error("Unable to parse TOML file: {}", .0)]
    TOMLParseError(String),

    #[error("Invalid value for environment variable {}: {}", .0, .1)]
    InvalidEnvValue(String, String),

    #[error("Invalid route template '{}': {}", .0, .1)]
    InvalidRouteTemplate(String, String),

    #[error("Ambiguous routes for {}: '{}' and '{}'", .0, .1, .2)]
    AmbiguousRoutes(String, String, String),
}

// ---------------------------------------------------------------------------
// HttpError:
// ---------------------------------------------------------------------------
/// Body returned with every non-2xx status produced by our own handlers.
#[derive(Object, Debug)]
pub struct HttpError {
    pub error: String,
}

impl HttpError {
    pub fn new(error: &str) -> Self {
        Self { error: error.to_string() }
    }
}
