// src/install/mod.rs

//! Distribution tree writer.
//!
//! Copies finished build artifacts into the canonical distribution layout:
//!
//! - [`install_executables`] — additive copy of executable files, ownership
//!   of the executable bit preserved.
//! - [`replace_dir`] — directory install that removes the stale destination
//!   first, so files dropped from a rebuild cannot linger.
//! - [`merge_dir`] — directory install layered over whatever is already
//!   there.
//! - [`copy_files_flat`] — plain per-file copy of a directory's contents.

use std::fs;
use std::path::Path;

use anyhow::Context;
use tracing::{debug, info};

use crate::errors::Result;

/// Copy every executable file in `build_dir` into `bin_dir`.
///
/// Non-executable files (build metadata, libraries-in-progress) are left
/// behind. Existing installed executables are overwritten; nothing else in
/// `bin_dir` is touched.
pub fn install_executables(build_dir: &Path, bin_dir: &Path) -> Result<()> {
    fs::create_dir_all(bin_dir).with_context(|| format!("creating {:?}", bin_dir))?;

    for entry in
        fs::read_dir(build_dir).with_context(|| format!("reading build dir {:?}", build_dir))?
    {
        let entry = entry.with_context(|| format!("reading entry in {:?}", build_dir))?;
        let path = entry.path();
        if !path.is_file() || !is_executable(&path) {
            continue;
        }

        let dest = bin_dir.join(entry.file_name());
        info!(file = %path.display(), dest = %dest.display(), "installing executable");
        fs::copy(&path, &dest)
            .with_context(|| format!("copying {:?} to {:?}", path, dest))?;
    }

    Ok(())
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path)
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(windows)]
fn is_executable(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("exe") | Some("cmd") | Some("bat")
    )
}

/// Install `src` at `dest`, removing any stale directory at `dest` first.
pub fn replace_dir(src: &Path, dest: &Path) -> Result<()> {
    if dest.is_dir() {
        debug!(dir = %dest.display(), "removing stale install directory");
        fs::remove_dir_all(dest).with_context(|| format!("removing stale {:?}", dest))?;
    }
    fs::create_dir_all(dest).with_context(|| format!("creating {:?}", dest))?;
    info!(src = %src.display(), dest = %dest.display(), "installing directory");
    copy_tree(src, dest)
}

/// Copy `src` into `dest`, creating it if needed and overlaying any
/// existing content. A missing `src` is not an error; there is simply
/// nothing to install.
pub fn merge_dir(src: &Path, dest: &Path) -> Result<()> {
    if !src.is_dir() {
        debug!(dir = %src.display(), "no static directory to install");
        return Ok(());
    }
    fs::create_dir_all(dest).with_context(|| format!("creating {:?}", dest))?;
    info!(src = %src.display(), dest = %dest.display(), "merging directory");
    copy_tree(src, dest)
}

/// Copy every plain file in `src_dir` (non-recursively) into `dest_dir`.
pub fn copy_files_flat(src_dir: &Path, dest_dir: &Path) -> Result<()> {
    fs::create_dir_all(dest_dir).with_context(|| format!("creating {:?}", dest_dir))?;

    for entry in
        fs::read_dir(src_dir).with_context(|| format!("reading dir {:?}", src_dir))?
    {
        let entry = entry.with_context(|| format!("reading entry in {:?}", src_dir))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let dest = dest_dir.join(entry.file_name());
        info!(file = %path.display(), dest = %dest.display(), "installing file");
        fs::copy(&path, &dest)
            .with_context(|| format!("copying {:?} to {:?}", path, dest))?;
    }

    Ok(())
}

fn copy_tree(src: &Path, dest: &Path) -> Result<()> {
    for entry in fs::read_dir(src).with_context(|| format!("reading dir {:?}", src))? {
        let entry = entry.with_context(|| format!("reading entry in {:?}", src))?;
        let path = entry.path();
        let target = dest.join(entry.file_name());
        if path.is_dir() {
            fs::create_dir_all(&target).with_context(|| format!("creating {:?}", target))?;
            copy_tree(&path, &target)?;
        } else {
            fs::copy(&path, &target)
                .with_context(|| format!("copying {:?} to {:?}", path, target))?;
        }
    }
    Ok(())
}
