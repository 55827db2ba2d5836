// src/provision.rs

//! Provisioning of declared external assets into the distribution tree.
//!
//! - Model files are fetched into the download cache and hard-linked into
//!   `dist/models`.
//! - The shared runtime library is fetched as a per-platform archive and
//!   the library member extracted into `dist/lib`.
//!
//! Every step is idempotent; re-running after a failure resumes from the
//! cache.

use anyhow::anyhow;
use tracing::info;

use crate::config::model::{ConfigFile, RuntimeConfig};
use crate::errors::{Result, ShipwrightError};
use crate::fetch;
use crate::layout::Layout;

/// Run all declared asset acquisitions.
pub async fn provision_assets(cfg: &ConfigFile, layout: &Layout) -> Result<()> {
    for model in &cfg.model {
        info!(url = %model.url, "provisioning model file");
        let cached = fetch::fetch_cached(&model.url, &layout.downloads_dir()).await?;
        let name = cached
            .file_name()
            .map(|n| n.to_os_string())
            .ok_or_else(|| anyhow!("cached file {:?} has no file name", cached))?;
        fetch::install_from_cache(&cached, &layout.models_dir().join(name))?;
    }

    if let Some(runtime) = &cfg.runtime {
        provision_runtime(runtime, layout).await?;
    }

    Ok(())
}

/// Platform key used to select a `[runtime.source]` entry, e.g.
/// `linux-x86_64`.
pub fn platform_key() -> String {
    format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH)
}

async fn provision_runtime(runtime: &RuntimeConfig, layout: &Layout) -> Result<()> {
    let key = platform_key();
    let url = runtime.source.get(&key).ok_or_else(|| {
        let declared: Vec<&str> = runtime.source.keys().map(String::as_str).collect();
        ShipwrightError::ConfigError(format!(
            "no [runtime.source] entry for platform '{}' (declared: {})",
            key,
            declared.join(", ")
        ))
    })?;

    info!(url = %url, platform = %key, "provisioning runtime library");
    let cached = fetch::fetch_cached(url, &layout.downloads_dir()).await?;
    let dest = layout.lib_dir().join(&runtime.install_name);
    fetch::extract_member(
        &cached,
        &runtime.member_prefix,
        |base| base.starts_with(runtime.member_prefix.as_str()),
        &dest,
    )
}
