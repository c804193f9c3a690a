//!
//! This module defines the rule file structures and their loading logic for acmefmt,
//! plus the few settings read from the process environment.

pub mod env;
pub use env::*;

pub mod types;
pub use types::*;

mod loading;
pub use loading::default_rules_path;
