// src/config/validate.rs

use std::collections::BTreeSet;

use crate::config::model::{ConfigFile, ProjectKind, RawConfigFile};
use crate::errors::{Result, ShipwrightError};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::ShipwrightError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_has_projects(cfg)?;
    validate_project_names(cfg)?;
    validate_project_kinds(cfg)?;
    validate_models(cfg)?;
    validate_runtime(cfg)?;
    Ok(())
}

fn ensure_has_projects(cfg: &RawConfigFile) -> Result<()> {
    if cfg.project.is_empty() {
        return Err(ShipwrightError::ConfigError(
            "config must contain at least one [[project]] entry".to_string(),
        ));
    }
    Ok(())
}

fn validate_project_names(cfg: &RawConfigFile) -> Result<()> {
    let mut seen = BTreeSet::new();
    for project in cfg.project.iter() {
        if project.name.is_empty() {
            return Err(ShipwrightError::ConfigError(
                "project name must not be empty".to_string(),
            ));
        }
        if project.dir.is_empty() {
            return Err(ShipwrightError::ConfigError(format!(
                "project '{}' has an empty `dir`",
                project.name
            )));
        }
        if !seen.insert(project.name.as_str()) {
            return Err(ShipwrightError::ConfigError(format!(
                "duplicate project name '{}'",
                project.name
            )));
        }
    }
    Ok(())
}

fn validate_project_kinds(cfg: &RawConfigFile) -> Result<()> {
    for project in cfg.project.iter() {
        match &project.kind {
            ProjectKind::Web { install_to, .. } => {
                ensure_non_empty(&project.name, "install_to", install_to)?;
            }
            ProjectKind::Assets {
                source_dir,
                install_to,
            } => {
                ensure_non_empty(&project.name, "source_dir", source_dir)?;
                ensure_non_empty(&project.name, "install_to", install_to)?;
            }
            ProjectKind::Cargo { .. } | ProjectKind::Cmake { .. } | ProjectKind::Desktop => {}
        }
    }
    Ok(())
}

fn ensure_non_empty(project: &str, field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(ShipwrightError::ConfigError(format!(
            "project '{}' has an empty `{}`",
            project, field
        )));
    }
    Ok(())
}

fn validate_models(cfg: &RawConfigFile) -> Result<()> {
    for model in cfg.model.iter() {
        if model.url.is_empty() {
            return Err(ShipwrightError::ConfigError(
                "[[model]] entry with an empty `url`".to_string(),
            ));
        }
    }
    Ok(())
}

fn validate_runtime(cfg: &RawConfigFile) -> Result<()> {
    let Some(runtime) = &cfg.runtime else {
        return Ok(());
    };

    if runtime.member_prefix.is_empty() {
        return Err(ShipwrightError::ConfigError(
            "[runtime].member_prefix must not be empty".to_string(),
        ));
    }
    if runtime.install_name.is_empty() {
        return Err(ShipwrightError::ConfigError(
            "[runtime].install_name must not be empty".to_string(),
        ));
    }
    if runtime.source.is_empty() {
        return Err(ShipwrightError::ConfigError(
            "[runtime] must declare at least one [runtime.source] platform".to_string(),
        ));
    }

    Ok(())
}
