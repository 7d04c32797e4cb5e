//! Core eventdesk library (config, API client, session store, logging).

pub mod api;
pub mod config;
pub mod logging;
pub mod session;
