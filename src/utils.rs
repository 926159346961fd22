pub mod app_utils;
pub mod config;
pub mod db;
pub mod db_statements;
pub mod db_types;
pub mod errors;
pub mod params;
pub mod route_table;
