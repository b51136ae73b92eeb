//! Configuration management for the gateway
//!
//! This module handles loading and managing configuration settings
//! for the server and the one-shot card renderer.

pub mod loader;
pub mod settings;

pub use loader::ConfigLoader;
pub use settings::Settings;
