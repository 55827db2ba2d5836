#![allow(dead_code)]

use std::collections::BTreeMap;

use shipwright::config::{
    ConfigFile, LayoutSection, ModelAsset, ProjectConfig, ProjectKind, RawConfigFile,
    RuntimeConfig,
};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                layout: LayoutSection::default(),
                project: Vec::new(),
                model: Vec::new(),
                runtime: None,
            },
        }
    }

    pub fn with_project(mut self, project: ProjectConfig) -> Self {
        self.config.project.push(project);
        self
    }

    pub fn with_model(mut self, url: &str) -> Self {
        self.config.model.push(ModelAsset {
            url: url.to_string(),
        });
        self
    }

    pub fn with_runtime(mut self, runtime: RuntimeConfig) -> Self {
        self.config.runtime = Some(runtime);
        self
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `ProjectConfig`.
pub struct ProjectConfigBuilder {
    project: ProjectConfig,
}

impl ProjectConfigBuilder {
    /// A cargo-kind project whose `dir` equals its name.
    pub fn cargo(name: &str) -> Self {
        Self::with_kind(
            name,
            ProjectKind::Cargo {
                features: vec![],
                static_assets: None,
            },
        )
    }

    pub fn with_kind(name: &str, kind: ProjectKind) -> Self {
        Self {
            project: ProjectConfig {
                name: name.to_string(),
                dir: name.to_string(),
                deploy: true,
                env: BTreeMap::new(),
                kind,
            },
        }
    }

    pub fn dir(mut self, dir: &str) -> Self {
        self.project.dir = dir.to_string();
        self
    }

    pub fn deploy(mut self, val: bool) -> Self {
        self.project.deploy = val;
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.project.env.insert(key.to_string(), value.to_string());
        self
    }

    pub fn build(self) -> ProjectConfig {
        self.project
    }
}
