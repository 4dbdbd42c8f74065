//! Pipeline Integration Test Modules

pub mod graceful_shutdown;
