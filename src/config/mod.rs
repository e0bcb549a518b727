//! Configuration modules for the Admitly API.
//!
//! Each submodule handles one aspect of configuration, loaded from
//! environment variables with development-friendly defaults.

pub mod cors;
pub mod database;
pub mod email;
pub mod jwt;
