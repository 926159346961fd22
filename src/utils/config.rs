#![forbid(unsafe_code)]

use anyhow::{Result, anyhow};
use log::{info, error, LevelFilter};
use serde::Deserialize;
use std::{env, fmt, fs, path::Path};
use fs_mistrust::Mistrust;
use std::os::unix::fs::PermissionsExt;
use lazy_static::lazy_static;
use structopt::StructOpt;

use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config as LogConfig, Root};
use log4rs::encode::pattern::PatternEncoder;

// App Utilities
use crate::utils::{app_utils, errors::Errors};
use super::app_utils::get_absolute_path;

// ***************************************************************************
//                                Constants
// ***************************************************************************
// Directory and file locations. Unless otherwise noted, all files and directories
// are relative to the root directory.
const ENV_ROOT_DIR         : &str = "FINACLE_ROOT_DIR";
const DEFAULT_ROOT_DIR     : &str = "~/.finacle_api";
const CONFIG_DIR           : &str = "/config";
const LOGS_DIR             : &str = "/logs";
const LOG4RS_CONFIG_FILE   : &str = "/log4rs.yml";       // relative to config dir
const APP_CONFIG_FILE      : &str = "/finacle_api.toml"; // relative to config dir

// Used when no log4rs.yml has been installed.
const DEFAULT_LOG_PATTERN  : &str = "{d(%Y-%m-%dT%H:%M:%S%.3f)} {h({l})} {M} - {m}{n}";

// Networking.
const DEFAULT_HTTP_ADDR    : &str = "http://localhost";
const DEFAULT_HTTP_PORT    : u16  = 5000;

// Database defaults, matching a stock local MySQL install.
const DEFAULT_DB_HOST      : &str = "localhost";
const DEFAULT_DB_PORT      : u16  = 3306;
const DEFAULT_DB_USER      : &str = "root";
const DEFAULT_DB_NAME      : &str = "testdb";
const DEFAULT_DB_CONNECT_TIMEOUT_SECS: u64 = 5;

// Environment overrides applied after the configuration file is read.
pub const ENV_HTTP_PORT    : &str = "FINACLE_HTTP_PORT";
pub const ENV_DB_URL       : &str = "FINACLE_DB_URL";
pub const ENV_DB_HOST      : &str = "FINACLE_DB_HOST";
pub const ENV_DB_PORT      : &str = "FINACLE_DB_PORT";
pub const ENV_DB_USER      : &str = "FINACLE_DB_USER";
pub const ENV_DB_PASSWORD  : &str = "FINACLE_DB_PASSWORD";
pub const ENV_DB_NAME      : &str = "FINACLE_DB_NAME";

// ***************************************************************************
//                             Static Variables
// ***************************************************************************
// Assign the command line arguments BEFORE RUNTIME_CTX is initialized in main.
lazy_static! {
    pub static ref APP_ARGS: AppArgs = init_app_args();
}

// Calculate the data directories BEFORE RUNTIME_CTX is initialized in main.
lazy_static! {
    pub static ref APP_DIRS: AppDirs = init_app_dirs();
}

// ***************************************************************************
//                             Directory Structs
// ***************************************************************************
// ---------------------------------------------------------------------------
// AppDirs:
// ---------------------------------------------------------------------------
#[derive(Debug)]
#[allow(dead_code)]
pub struct AppDirs {
    pub root_dir: String,
    pub config_dir: String,
    pub logs_dir: String,
}

// ***************************************************************************
//                               Config Structs
// ***************************************************************************
// ---------------------------------------------------------------------------
// AppArgs:
// ---------------------------------------------------------------------------
#[derive(Debug, StructOpt)]
#[structopt(name = "finacle_api", about = "Command line arguments for the Finacle API server.")]
pub struct AppArgs {
    /// Specify the server's root data directory.
    ///
    /// This directory contains the config and logs subdirectories.
    #[structopt(short, long)]
    pub root_dir: Option<String>,

    /// Create the data directories and then exit.
    ///
    /// The data directories will be rooted at a root directory calculated
    /// using the following priority order:
    ///
    ///   1. If set, the value of the FINACLE_ROOT_DIR environment,
    ///
    ///   2. Otherwise, if set, the value of the --root-dir command line argument,
    ///
    ///   3. Otherwise, ~/.finacle_api
    ///
    #[structopt(short, long)]
    pub create_dirs_only: bool,
}

// ---------------------------------------------------------------------------
// Parms:
// ---------------------------------------------------------------------------
#[derive(Debug)]
#[allow(dead_code)]
pub struct Parms {
    pub config_file: String,
    pub config: Config,
}

// ---------------------------------------------------------------------------
// RuntimeCtx:
// ---------------------------------------------------------------------------
#[derive(Debug)]
#[allow(dead_code)]
pub struct RuntimeCtx {
    pub parms: Parms,
    pub app_args: &'static AppArgs,
    pub app_dirs: &'static AppDirs,
}

// ---------------------------------------------------------------------------
// Config:
// ---------------------------------------------------------------------------
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub title: String,
    pub http_addr: String,
    pub http_port: u16,
    pub db: DbConfig,
}

impl Config {
    pub fn new() -> Self {
        Config::default()
    }

    /** Overlay the environment on top of the file configuration.  The lookup
     * function is a parameter so that callers other than main can supply
     * their own environment.
     */
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), Errors>
    where F: Fn(&str) -> Option<String>
    {
        if let Some(port) = lookup(ENV_HTTP_PORT) {
            self.http_port = parse_env_number(ENV_HTTP_PORT, &port)?;
        }
        if let Some(url) = lookup(ENV_DB_URL) {
            self.db.url = Some(url);
        }
        if let Some(host) = lookup(ENV_DB_HOST) {
            self.db.host = host;
        }
        if let Some(port) = lookup(ENV_DB_PORT) {
            self.db.port = parse_env_number(ENV_DB_PORT, &port)?;
        }
        if let Some(user) = lookup(ENV_DB_USER) {
            self.db.user = user;
        }
        if let Some(password) = lookup(ENV_DB_PASSWORD) {
            self.db.password = password;
        }
        if let Some(database) = lookup(ENV_DB_NAME) {
            self.db.database = database;
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "Finacle API".to_string(),
            http_addr: DEFAULT_HTTP_ADDR.to_string(),
            http_port: DEFAULT_HTTP_PORT,
            db: DbConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// DbConfig:
// ---------------------------------------------------------------------------
/** Connection settings for the users database.  When url is set it is used
 * as is, otherwise a mysql url is assembled from the individual fields.
 */
#[derive(Deserialize, Clone)]
#[serde(default)]
pub struct DbConfig {
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub connect_timeout_secs: u64,
}

impl DbConfig {
    pub fn connection_url(&self) -> String {
        if let Some(url) = &self.url {
            return url.clone();
        }

        let credentials = if self.password.is_empty() {
            self.user.clone()
        } else {
            format!("{}:{}", self.user, self.password)
        };
        format!("mysql://{}@{}:{}/{}", credentials, self.host, self.port, self.database)
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: DEFAULT_DB_HOST.to_string(),
            port: DEFAULT_DB_PORT,
            user: DEFAULT_DB_USER.to_string(),
            password: String::new(),
            database: DEFAULT_DB_NAME.to_string(),
            connect_timeout_secs: DEFAULT_DB_CONNECT_TIMEOUT_SECS,
        }
    }
}

// The runtime context is logged at startup, so keep the password out of it.
impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let url = self.url.as_ref().map(|_| "<set>");
        let password = if self.password.is_empty() {""} else {"<redacted>"};
        f.debug_struct("DbConfig")
            .field("url", &url)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &password)
            .field("database", &self.database)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

// ***************************************************************************
//                            Directory Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// init_app_args:
// ---------------------------------------------------------------------------
/** Get the command line arguments. */
fn init_app_args() -> AppArgs {
    let args = AppArgs::from_args();
    println!("{:?}", args);
    args
}

// ---------------------------------------------------------------------------
// init_app_dirs:
// ---------------------------------------------------------------------------
/** Calculate the external data directories. */
fn init_app_dirs() -> AppDirs {
    let mistrust = get_mistrust();

    // Check that each path is absolute and is a directory with the
    // proper permission assigned if it exists.  If it doesn't exist,
    // create it.
    let root_dir = get_root_dir();
    check_app_dir(&root_dir, "root directory", &mistrust);

    let config_dir = root_dir.clone() + CONFIG_DIR;
    check_app_dir(&config_dir, "config directory", &mistrust);

    let logs_dir = root_dir.clone() + LOGS_DIR;
    check_app_dir(&logs_dir, "logs directory", &mistrust);

    AppDirs { root_dir, config_dir, logs_dir }
}

// ---------------------------------------------------------------------------
// check_app_dir:
// ---------------------------------------------------------------------------
/** Check that the path is absolute and, if it exists, that is has the proper
 * permissions assigned.  If it doesn't exist, create it.  The mistrust package
 * creates directories with 0o700 permissions.
 *
 * Any failure results in a panic.
 */
fn check_app_dir(dir: &str, msgname: &str, mistrust: &Mistrust) {
    let path = Path::new(dir);
    if !path.is_absolute() {
        panic!("The {} path must be absolute: {}", msgname, dir);
    }
    if path.exists() {
        if !path.is_dir() {
            panic!("The {} path must be a directory: {}", msgname, dir);
        }

        // Owner rwx only.
        let meta = path.metadata().unwrap_or_else(|_| panic!("Unable to read metadata for {}: {}", msgname, dir));
        let perm = meta.permissions().mode();
        if perm & 0o777 != 0o700 {
            panic!("The {} path must have 0o700 permissions: {}", msgname, dir);
        }
    } else if let Err(e) = mistrust.make_directory(path) {
        panic!("Make directory error for {:?}: {}", path, &e.to_string());
    }
}

// ---------------------------------------------------------------------------
// get_mistrust:
// ---------------------------------------------------------------------------
/** Configure a new mistrust object for initial directory processing. */
fn get_mistrust() -> Mistrust {
    match Mistrust::builder()
        .ignore_prefix(get_absolute_path("~"))
        .trust_group(0)
        .build() {
            Ok(m) => m,
            Err(e) => panic!("Mistrust configuration error: {}", &e.to_string()),
        }
}

// ---------------------------------------------------------------------------
// get_root_dir:
// ---------------------------------------------------------------------------
fn get_root_dir() -> String {
    // Order of precedence:
    //  1. Environment variable
    //  2. Command line --root-dir argument
    //  3. Default location
    //
    let root_dir = env::var(ENV_ROOT_DIR).unwrap_or_else(
        |_| {
            match APP_ARGS.root_dir.clone() {
                Some(r) => r,
                None => DEFAULT_ROOT_DIR.to_string(),
            }
        });

    get_absolute_path(&root_dir)
}

// ***************************************************************************
//                               Log Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// init_log:
// ---------------------------------------------------------------------------
/** Initialize log4rs from the config directory's log4rs.yml.  When that file
 * has not been installed, log to the console at info level.
 */
pub fn init_log() {
    let logconfig = init_log_config();
    if !Path::new(&logconfig).exists() {
        init_console_log();
        info!("No log configuration found at {}, logging to console.", logconfig);
        return;
    }

    match log4rs::init_file(logconfig.clone(), Default::default()) {
        Ok(_) => (),
        Err(e) => {
            println!("{}", e);
            let s = format!("{}", Errors::Log4rsInitialization(logconfig));
            panic!("{}", s);
        },
    }
    info!("Log4rs initialized using: {}", logconfig);
}

// ---------------------------------------------------------------------------
// init_log_config:
// ---------------------------------------------------------------------------
fn init_log_config() -> String {
    APP_DIRS.config_dir.clone() + LOG4RS_CONFIG_FILE
}

// ---------------------------------------------------------------------------
// init_console_log:
// ---------------------------------------------------------------------------
fn init_console_log() {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(DEFAULT_LOG_PATTERN)))
        .build();
    let config = LogConfig::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(LevelFilter::Info));

    let config = match config {
        Ok(c) => c,
        Err(e) => panic!("{}: {}", Errors::Log4rsInitialization("<console>".to_string()), e),
    };
    if let Err(e) = log4rs::init_config(config) {
        panic!("{}: {}", Errors::Log4rsInitialization("<console>".to_string()), e);
    }
}

// ***************************************************************************
//                             Parms Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// get_parms:
// ---------------------------------------------------------------------------
/** Retrieve the application parameters from the configuration file in the
 * config directory and then apply environment overrides.  If the file doesn't
 * exist the default values are used.
 */
fn get_parms() -> Result<Parms> {
    let config_file = APP_DIRS.config_dir.clone() + APP_CONFIG_FILE;

    // Read the configuration file.
    let config_file_abs = app_utils::get_absolute_path(&config_file);
    info!("{}", Errors::ReadingConfigFile(config_file_abs.clone()));
    let mut parms = match fs::read_to_string(&config_file_abs) {
        Ok(contents) => Parms { config: parse_config(&config_file_abs, &contents)?,
                                config_file: config_file_abs },
        Err(_) => {
            println!("Unable to read configuration at {}. Using default values.", config_file);
            Parms { config_file: Default::default(), config: Config::new() }
        }
    };

    // The environment has the last word.
    if let Err(e) = parms.config.apply_env_overrides(|key| env::var(key).ok()) {
        error!("{}", e);
        return Result::Err(anyhow!(e));
    }

    Ok(parms)
}

// ---------------------------------------------------------------------------
// parse_config:
// ---------------------------------------------------------------------------
fn parse_config(config_file_abs: &str, contents: &str) -> Result<Config> {
    match toml::from_str(contents) {
        Ok(c)  => Ok(c),
        Err(e) => {
            let msg = format!("{}\n   {}", Errors::TOMLParseError(config_file_abs.to_string()), e);
            error!("{}", msg);
            Result::Err(anyhow!(msg))
        }
    }
}

// ---------------------------------------------------------------------------
// parse_env_number:
// ---------------------------------------------------------------------------
fn parse_env_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, Errors> {
    value.trim().parse::<T>()
        .map_err(|_| Errors::InvalidEnvValue(key.to_string(), value.to_string()))
}

// ***************************************************************************
//                             Config Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// init_runtime_context:
// ---------------------------------------------------------------------------
pub fn init_runtime_context() -> RuntimeCtx {
    // If this fails the application aborts.
    let parms = get_parms().expect("FAILED to read configuration file.");
    RuntimeCtx {parms, app_args: &APP_ARGS, app_dirs: &APP_DIRS}
}
