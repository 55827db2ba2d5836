// src/tasks/targets.rs

//! Target implementations per project kind.
//!
//! Each target either invokes a child build tool with a fixed,
//! project-specific argument vector, or performs local filesystem
//! operations against the distribution tree. The build logic itself lives
//! entirely in the delegated tools.

use std::path::PathBuf;

use tracing::debug;

use crate::errors::Result;
use crate::exec::Invocation;
use crate::install;
use crate::tasks::{TaskRunner, Target};

/// Environment variable overriding the proxy backend for `web` dev serving.
pub const PROXY_ENV: &str = "SHIPWRIGHT_PROXY";

const DEFAULT_PROXY: &str = "http://localhost:8080/api";

impl TaskRunner<'_> {
    fn project_dir(&self) -> PathBuf {
        self.layout.project_dir(self.project)
    }

    async fn tool(&self, program: &str, args: &[&str]) -> Result<()> {
        self.tool_owned(program, args.iter().map(|s| s.to_string()).collect())
            .await
    }

    async fn tool_owned(&self, program: &str, args: Vec<String>) -> Result<()> {
        let mut inv = Invocation::new(program, args, self.project_dir());
        for (key, value) in &self.project.env {
            inv = inv.env(key, value);
        }
        self.invoker.invoke(inv).await
    }

    pub(super) async fn run_cargo(
        &self,
        target: Target,
        features: &[String],
        static_assets: Option<&str>,
    ) -> Result<()> {
        match target {
            Target::Clean => self.tool("cargo", &["clean"]).await,
            Target::Build => self.cargo_build(features).await,
            Target::Test => {
                self.tool_owned("cargo", with_features(vec!["test", "--release"], features))
                    .await
            }
            Target::Run => self.tool("cargo", &["run", "--release"]).await,
            Target::Install => {
                self.cargo_build(features).await?;
                let build_dir = self.project_dir().join("target").join("release");
                install::install_executables(&build_dir, &self.layout.bin_dir())?;
                if let Some(assets) = static_assets {
                    install::merge_dir(&self.project_dir().join(assets), &self.layout.www_dir())?;
                }
                Ok(())
            }
            Target::InitDev => Err(self.unsupported(target)),
        }
    }

    async fn cargo_build(&self, features: &[String]) -> Result<()> {
        self.tool_owned("cargo", with_features(vec!["build", "--release"], features))
            .await
    }

    pub(super) async fn run_cmake(&self, target: Target, preset: &str) -> Result<()> {
        match target {
            Target::Clean => {
                self.tool("cmake", &["--build", "--preset", preset, "--target", "clean"])
                    .await
            }
            Target::Build => self.cmake_build(preset).await,
            Target::Test => {
                self.cmake_build(preset).await?;
                // No test steps defined for native captures yet.
                debug!(project = %self.project.name, "no test steps defined");
                Ok(())
            }
            Target::Install => {
                self.cmake_build(preset).await?;
                let build_dir = format!("build/{preset}");
                let prefix = self.layout.dist_dir().display().to_string();
                self.tool("cmake", &["--install", &build_dir, "--prefix", &prefix])
                    .await
            }
            Target::Run | Target::InitDev => Err(self.unsupported(target)),
        }
    }

    async fn cmake_build(&self, preset: &str) -> Result<()> {
        self.tool("cmake", &["--preset", preset]).await?;
        self.tool("cmake", &["--build", "--preset", preset]).await
    }

    pub(super) async fn run_web(
        &self,
        target: Target,
        public_url: &str,
        install_to: &str,
    ) -> Result<()> {
        match target {
            Target::Clean => self.tool("cargo", &["clean"]).await,
            Target::InitDev => self.web_init_dev().await,
            Target::Build => {
                self.web_init_dev().await?;
                self.tool("trunk", &["build", "--release", "--public-url", public_url])
                    .await
            }
            Target::Test => {
                self.web_init_dev().await?;
                self.tool("trunk", &["build", "--release", "--public-url", public_url])
                    .await?;
                self.tool("cargo", &["test", "--release"]).await?;
                self.tool("wasm-pack", &["test", "--headless", "--firefox"])
                    .await
            }
            Target::Run => {
                self.web_init_dev().await?;
                let proxy =
                    std::env::var(PROXY_ENV).unwrap_or_else(|_| DEFAULT_PROXY.to_string());
                let proxy_arg = format!("--proxy-backend={proxy}");
                self.tool(
                    "trunk",
                    &["serve", "--port", "8081", "--public-url", public_url, &proxy_arg],
                )
                .await
            }
            Target::Install => {
                // trunk writes its bundle to the project-local `dist`.
                let build_output = self.project_dir().join("dist");
                install::replace_dir(&build_output, &self.layout.dist_path(install_to))
            }
        }
    }

    /// Install the wasm toolchain. Safe to repeat; the tools short-circuit
    /// when already present.
    async fn web_init_dev(&self) -> Result<()> {
        self.tool("cargo", &["install", "trunk"]).await?;
        self.tool("cargo", &["install", "wasm-pack"]).await?;
        self.tool("rustup", &["target", "add", "wasm32-unknown-unknown"])
            .await
    }

    pub(super) async fn run_desktop(&self, target: Target) -> Result<()> {
        match target {
            Target::Clean => self.tool("cargo", &["clean"]).await,
            Target::Test => self.tool("cargo", &["test"]).await,
            Target::Build | Target::Install => self.desktop_build().await,
            Target::Run => {
                self.tool("cargo", &["install", "tauri-cli", "--locked"])
                    .await?;
                self.tool("cargo", &["tauri", "dev"]).await
            }
            Target::InitDev => Err(self.unsupported(target)),
        }
    }

    async fn desktop_build(&self) -> Result<()> {
        self.tool("cargo", &["install", "tauri-cli", "--locked"])
            .await?;
        self.tool("cargo", &["tauri", "build"]).await
    }

    pub(super) fn run_assets(
        &self,
        target: Target,
        source_dir: &str,
        install_to: &str,
    ) -> Result<()> {
        match target {
            Target::Build => {
                // Advertised but inapplicable; the files ship as-is.
                debug!(project = %self.project.name, "nothing to build");
                Ok(())
            }
            Target::Install => install::copy_files_flat(
                &self.project_dir().join(source_dir),
                &self.layout.dist_path(install_to),
            ),
            Target::Clean => {
                let var_dir = self.project_dir().join("var");
                if var_dir.is_dir() {
                    std::fs::remove_dir_all(&var_dir)?;
                }
                Ok(())
            }
            Target::Test | Target::Run | Target::InitDev => Err(self.unsupported(target)),
        }
    }
}

fn with_features(base: Vec<&str>, features: &[String]) -> Vec<String> {
    let mut args: Vec<String> = base.into_iter().map(|s| s.to_string()).collect();
    if !features.is_empty() {
        args.push("--features".to_string());
        args.push(features.join(","));
    }
    args
}
