// src/config/mod.rs

//! Configuration loading and validation for shipwright.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate basic invariants like project name uniqueness (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path};
pub use model::{
    ConfigFile, LayoutSection, ModelAsset, ProjectConfig, ProjectKind, RawConfigFile,
    RuntimeConfig,
};
