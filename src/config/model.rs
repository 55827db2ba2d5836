// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

/// Top-level configuration as read from a TOML file, before validation.
///
/// ```toml
/// [layout]
/// dist_dir = "dist"
/// var_dir = "var"
///
/// [[project]]
/// name = "daemon"
/// dir = "daemon"
/// kind = "cargo"
/// features = ["libcamera"]
///
/// [[model]]
/// url = "https://example.com/files/model.onnx"
///
/// [runtime]
/// member_prefix = "libonnxruntime.so"
/// install_name = "libonnxruntime.so"
/// [runtime.source]
/// linux-x86_64 = "https://example.com/runtime-linux-x64.tgz/download"
/// ```
///
/// `[[project]]` order is significant: it is the global build sequence.
/// Earlier projects must be installed before later ones may assume their
/// outputs exist; there is no graph resolution on top of it.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    /// Directory layout overrides from `[layout]`.
    #[serde(default)]
    pub layout: LayoutSection,

    /// All projects from `[[project]]`, in declaration order.
    #[serde(default)]
    pub project: Vec<ProjectConfig>,

    /// External model files from `[[model]]`.
    #[serde(default)]
    pub model: Vec<ModelAsset>,

    /// Shared runtime library archive from `[runtime]`.
    #[serde(default)]
    pub runtime: Option<RuntimeConfig>,
}

/// Validated configuration. Constructed via `TryFrom<RawConfigFile>`
/// (see `validate.rs`); never mutated after loading.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub layout: LayoutSection,
    pub project: Vec<ProjectConfig>,
    pub model: Vec<ModelAsset>,
    pub runtime: Option<RuntimeConfig>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(raw: RawConfigFile) -> Self {
        Self {
            layout: raw.layout,
            project: raw.project,
            model: raw.model,
            runtime: raw.runtime,
        }
    }

    /// Look up a project by its configured name.
    pub fn find_project(&self, name: &str) -> Option<&ProjectConfig> {
        self.project.iter().find(|p| p.name == name)
    }

    /// Projects participating in the `install` orchestration, in declared
    /// order.
    pub fn deployable_projects(&self) -> impl Iterator<Item = &ProjectConfig> {
        self.project.iter().filter(|p| p.deploy)
    }
}

/// `[layout]` section. All paths are relative to the directory containing
/// the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutSection {
    /// Distribution root receiving installed artifacts.
    #[serde(default = "default_dist_dir")]
    pub dist_dir: String,

    /// Working directory holding the download cache and daemon logs.
    #[serde(default = "default_var_dir")]
    pub var_dir: String,

    /// Directory scanned for operator scripts during install.
    #[serde(default = "default_scripts_dir")]
    pub scripts_dir: String,
}

fn default_dist_dir() -> String {
    "dist".to_string()
}

fn default_var_dir() -> String {
    "var".to_string()
}

fn default_scripts_dir() -> String {
    "scripts".to_string()
}

impl Default for LayoutSection {
    fn default() -> Self {
        Self {
            dist_dir: default_dist_dir(),
            var_dir: default_var_dir(),
            scripts_dir: default_scripts_dir(),
        }
    }
}

/// One `[[project]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    /// Unique project name.
    pub name: String,

    /// Project root, relative to the config file's directory.
    pub dir: String,

    /// Whether the project participates in the `install` orchestration.
    ///
    /// Non-deployable projects are still cleaned by `clean` and reachable
    /// via `make`.
    #[serde(default = "default_deploy")]
    pub deploy: bool,

    /// Extra environment entries for every child tool invocation of this
    /// project. Materialized on the child at spawn time only; the
    /// orchestrator's own environment is never mutated.
    #[serde(default)]
    pub env: BTreeMap<String, String>,

    #[serde(flatten)]
    pub kind: ProjectKind,
}

fn default_deploy() -> bool {
    true
}

/// How a project is built and installed, selected by `kind = "..."`.
///
/// Each kind registers a fixed set of supported targets; requesting a
/// target outside that set is a resolution error, not a silent no-op.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProjectKind {
    /// Native Rust binaries built with cargo in release mode.
    Cargo {
        /// Feature list forwarded as a single `--features` argument.
        #[serde(default)]
        features: Vec<String>,

        /// Optional project-relative directory of static assets merged
        /// into `dist/www` on install.
        #[serde(default)]
        static_assets: Option<String>,
    },

    /// CMake preset-driven native build.
    Cmake {
        #[serde(default = "default_preset")]
        preset: String,
    },

    /// trunk-built WASM front end.
    Web {
        /// Public URL prefix the bundle is built for.
        public_url: String,

        /// Distribution-relative install directory. Replaced wholesale on
        /// each install so renamed/removed build outputs cannot linger.
        install_to: String,
    },

    /// tauri desktop shell. Packaging is the build; there is nothing to
    /// copy into the distribution tree.
    Desktop,

    /// Plain files copied into the distribution as-is.
    Assets {
        /// Project-relative directory holding the files.
        source_dir: String,

        /// Distribution-relative install directory.
        install_to: String,
    },
}

fn default_preset() -> String {
    "default".to_string()
}

impl ProjectKind {
    /// Short name for logs and plan output.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ProjectKind::Cargo { .. } => "cargo",
            ProjectKind::Cmake { .. } => "cmake",
            ProjectKind::Web { .. } => "web",
            ProjectKind::Desktop => "desktop",
            ProjectKind::Assets { .. } => "assets",
        }
    }
}

/// One `[[model]]` entry: an external model file fetched into the download
/// cache and hard-linked into `dist/models`.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelAsset {
    pub url: String,
}

/// `[runtime]` section: the shared runtime library, shipped as a (possibly
/// compressed) tar archive per platform.
#[derive(Debug, Clone, Deserialize)]
pub struct RuntimeConfig {
    /// Base-name prefix of the archive member to extract
    /// (e.g. `libonnxruntime.so` also matches `libonnxruntime.so.1.23.2`).
    pub member_prefix: String,

    /// File name the extracted library is installed under in `dist/lib`.
    pub install_name: String,

    /// Download URL per `<os>-<arch>` platform key
    /// (e.g. `linux-x86_64`, `linux-aarch64`).
    #[serde(default)]
    pub source: BTreeMap<String, String>,
}
