// src/layout.rs

//! Filesystem layout of the workspace, distribution tree and working tree.
//!
//! All paths are resolved to absolute at construction so that child tools
//! (which run with their own working directories) and `cmake --install
//! --prefix` see stable locations.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::config::model::{LayoutSection, ProjectConfig};
use crate::errors::Result;

#[derive(Debug, Clone)]
pub struct Layout {
    root: PathBuf,
    dist: PathBuf,
    var: PathBuf,
    scripts: PathBuf,
}

impl Layout {
    pub fn from_config(root: &Path, section: &LayoutSection) -> Result<Self> {
        let root = std::fs::canonicalize(root)
            .with_context(|| format!("resolving workspace root {:?}", root))?;
        Ok(Self {
            dist: root.join(&section.dist_dir),
            var: root.join(&section.var_dir),
            scripts: root.join(&section.scripts_dir),
            root,
        })
    }

    /// Workspace root (the directory containing the config file).
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Distribution root receiving installed artifacts.
    pub fn dist_dir(&self) -> &Path {
        &self.dist
    }

    /// A distribution-relative path such as `www/admin`.
    pub fn dist_path(&self, rel: &str) -> PathBuf {
        self.dist.join(rel)
    }

    /// Installed executables and operator scripts.
    pub fn bin_dir(&self) -> PathBuf {
        self.dist.join("bin")
    }

    /// Static front-end assets.
    pub fn www_dir(&self) -> PathBuf {
        self.dist.join("www")
    }

    /// Shared runtime library.
    pub fn lib_dir(&self) -> PathBuf {
        self.dist.join("lib")
    }

    /// ML model files.
    pub fn models_dir(&self) -> PathBuf {
        self.dist.join("models")
    }

    /// Download cache. A file present here is a complete prior fetch.
    pub fn downloads_dir(&self) -> PathBuf {
        self.var.join("downloads")
    }

    /// Per-run daemon logs.
    pub fn logs_dir(&self) -> PathBuf {
        self.var.join("logs")
    }

    /// Directory scanned for operator scripts.
    pub fn scripts_dir(&self) -> &Path {
        &self.scripts
    }

    /// A project's root directory.
    pub fn project_dir(&self, project: &ProjectConfig) -> PathBuf {
        self.root.join(&project.dir)
    }
}
