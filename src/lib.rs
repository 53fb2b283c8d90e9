//! devboot: bootstrap a local Python dev environment and launch either the
//! Streamlit dashboard or a static file server.

pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod logging;
pub mod printer;
pub mod process;
pub mod session;
