//! Composer configuration: schema, parsing and validation.
//!
//! The defaults reproduce the landing page as it ships (six sections under
//! `secciones/`, two bare images, one video prefix). A config file only needs
//! to name what it overrides.

pub mod parser;
pub mod schema;
pub mod validator;

pub use parser::{load_config_file, parse_config, ConfigFormat};
pub use schema::*;
pub use validator::validate_config;
