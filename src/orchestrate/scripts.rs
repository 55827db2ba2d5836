// src/orchestrate/scripts.rs

//! Operator script installation.
//!
//! The scripts directory is scanned for files whose name marks them as
//! operator tooling (start/stop wrappers, the daemon launcher, certificate
//! generation) in one of the recognized script extensions; matches are
//! copied verbatim into the distribution's `bin` directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use regex::Regex;
use tracing::info;

use crate::errors::Result;

/// Recognized operator script names: purpose prefix plus script extension.
pub fn operator_script_pattern() -> Result<Regex> {
    Regex::new(r"^(start_|stop_|run_daemon|gen_self_signed_cert).*\.(py|sh|cmd)$")
        .context("compiling operator script pattern")
        .map_err(Into::into)
}

/// Copy every recognized operator script from `scripts_dir` into `bin_dir`,
/// preserving names. Returns the installed paths.
pub fn install_operator_scripts(scripts_dir: &Path, bin_dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = operator_script_pattern()?;
    let mut installed = Vec::new();

    fs::create_dir_all(bin_dir).with_context(|| format!("creating {:?}", bin_dir))?;

    for entry in fs::read_dir(scripts_dir)
        .with_context(|| format!("reading scripts dir {:?}", scripts_dir))?
    {
        let entry = entry.with_context(|| format!("reading entry in {:?}", scripts_dir))?;
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };

        if !entry.path().is_file() || !pattern.is_match(name) {
            continue;
        }

        let dest = bin_dir.join(name);
        info!(script = %name, dest = %dest.display(), "installing operator script");
        fs::copy(entry.path(), &dest)
            .with_context(|| format!("copying script '{}' to {:?}", name, dest))?;
        installed.push(dest);
    }

    Ok(installed)
}
