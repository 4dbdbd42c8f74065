//! CLI Integration Test Modules

pub mod binary;
pub mod toml_config;
