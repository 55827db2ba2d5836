// src/supervise/mod.rs

//! Singleton daemon supervision.
//!
//! Launches a long-running process detached from the supervisor, with both
//! output streams captured to a timestamped log file, after a best-effort
//! check that no instance is already running.
//!
//! The check scans the process table; a concurrent supervisor launching
//! the same daemon between the scan and the spawn can still slip through
//! (time-of-check-to-time-of-use gap). This is an accepted limitation of
//! the heuristic, not a lock.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, anyhow};
use chrono::{DateTime, Local};
use sysinfo::{ProcessesToUpdate, System};
use tracing::{debug, info};

use crate::errors::Result;

/// Environment variable overriding the installed tree root.
pub const HOME_ENV: &str = "SHIPWRIGHT_HOME";
/// Environment variable overriding the writable data directory.
pub const DATA_ENV: &str = "SHIPWRIGHT_DATA";
/// Environment variable the runtime consumes to locate its shared library.
pub const RUNTIME_LIB_ENV: &str = "ORT_DYLIB_PATH";

/// Shared runtime library file names probed under `<home>/lib`.
const RUNTIME_LIB_NAMES: &[&str] = &["libonnxruntime.so", "onnxruntime.dll"];

/// Processes whose command line contains this marker are supervisor
/// invocations, not daemon instances.
const SUPERVISOR_MARKER: &str = "shipwright";

/// Home and data directories the supervisor operates against.
#[derive(Debug, Clone)]
pub struct SupervisorEnv {
    pub home_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl SupervisorEnv {
    /// Resolve home/data directories: environment overrides first, else
    /// derived from the supervisor executable's own location
    /// (`<home>/bin/<exe>`). Data defaults to `<home>/var`.
    pub fn discover() -> Result<Self> {
        let home_dir = match std::env::var_os(HOME_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => default_home_dir()?,
        };
        let data_dir = match std::env::var_os(DATA_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => home_dir.join("var"),
        };
        Ok(Self { home_dir, data_dir })
    }
}

fn default_home_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("locating supervisor executable")?;
    exe.parent()
        .and_then(|bin| bin.parent())
        .map(Path::to_path_buf)
        .ok_or_else(|| {
            anyhow!("cannot derive home directory from {}", exe.display()).into()
        })
}

/// What `launch` did.
#[derive(Debug)]
pub enum LaunchOutcome {
    /// An instance was already running; nothing was started.
    AlreadyRunning { pid: u32, command_line: String },
    /// A new detached instance was started.
    Launched { pid: u32, log_file: PathBuf },
}

/// Launch `program` with `args` as a detached singleton daemon.
///
/// The program is resolved to an absolute path (bare names under
/// `<home>/bin`), the runtime library path is discovered if not already
/// set, the process table is checked for a running instance, and on a
/// clear check the daemon is spawned in its own session with output
/// appended to a per-run log file. Returns immediately without waiting
/// for the child.
pub fn launch(program: &str, args: &[String], env: &SupervisorEnv) -> Result<LaunchOutcome> {
    let program_path = resolve_program(program, &env.home_dir)?;
    let daemon_name = program_path
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_owned)
        .ok_or_else(|| anyhow!("daemon path {:?} has no file name", program_path))?;

    let mut child_envs: Vec<(String, String)> = vec![
        (HOME_ENV.to_string(), env.home_dir.display().to_string()),
        (DATA_ENV.to_string(), env.data_dir.display().to_string()),
    ];
    if std::env::var_os(RUNTIME_LIB_ENV).is_none() {
        if let Some(lib) = find_runtime_lib(&env.home_dir.join("lib")) {
            debug!(lib = %lib.display(), "discovered runtime library");
            child_envs.push((RUNTIME_LIB_ENV.to_string(), lib.display().to_string()));
        }
    }

    if let Some((pid, command_line)) = find_running(&daemon_name)? {
        info!(
            daemon = %daemon_name,
            pid,
            "daemon already running, not starting a second instance"
        );
        return Ok(LaunchOutcome::AlreadyRunning { pid, command_line });
    }

    let log_file = log_file_path(&env.data_dir, &daemon_name, &Local::now());
    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("creating {:?}", parent))?;
    }
    let log = OpenOptions::new()
        .append(true)
        .create(true)
        .open(&log_file)
        .with_context(|| format!("opening log file {:?}", log_file))?;
    let log_err = log
        .try_clone()
        .with_context(|| format!("cloning log handle for {:?}", log_file))?;

    let mut cmd = Command::new(&program_path);
    cmd.args(args)
        .current_dir(&env.home_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::from(log))
        .stderr(Stdio::from(log_err));
    for (key, value) in &child_envs {
        cmd.env(key, value);
    }
    detach(&mut cmd);

    let child = cmd
        .spawn()
        .with_context(|| format!("launching daemon '{}'", program_path.display()))?;

    info!(
        daemon = %daemon_name,
        pid = child.id(),
        log = %log_file.display(),
        "daemon started"
    );

    Ok(LaunchOutcome::Launched {
        pid: child.id(),
        log_file,
    })
}

/// Resolve a daemon program to a path: absolute paths pass through,
/// relative paths are taken from the working directory when present,
/// bare names fall back to `<home>/bin`.
fn resolve_program(program: &str, home_dir: &Path) -> Result<PathBuf> {
    let direct = PathBuf::from(program);
    if direct.is_absolute() {
        return Ok(direct);
    }
    if direct.is_file() {
        return std::fs::canonicalize(&direct)
            .with_context(|| format!("resolving {:?}", direct))
            .map_err(Into::into);
    }

    let installed = home_dir.join("bin").join(program);
    if installed.is_file() {
        return Ok(installed);
    }

    Err(anyhow!(
        "daemon executable '{}' not found in '{}'",
        program,
        home_dir.join("bin").display()
    )
    .into())
}

fn find_runtime_lib(lib_dir: &Path) -> Option<PathBuf> {
    RUNTIME_LIB_NAMES
        .iter()
        .map(|name| lib_dir.join(name))
        .find(|path| path.is_file())
}

/// Scan the process table for a running daemon instance, excluding the
/// current process and other supervisor invocations.
fn find_running(daemon_name: &str) -> Result<Option<(u32, String)>> {
    let mut sys = System::new_all();
    sys.refresh_processes(ProcessesToUpdate::All, true);
    let own_pid = sysinfo::get_current_pid().ok();

    for (pid, process) in sys.processes() {
        if Some(*pid) == own_pid {
            continue;
        }
        let command_line = process
            .cmd()
            .iter()
            .map(|part| part.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ");
        if is_daemon_process(&command_line, daemon_name) {
            return Ok(Some((pid.as_u32(), command_line)));
        }
    }

    Ok(None)
}

/// True when a process command line belongs to a running daemon instance
/// rather than to a supervisor invocation naming the same daemon.
fn is_daemon_process(command_line: &str, daemon_name: &str) -> bool {
    command_line.contains(daemon_name) && !command_line.contains(SUPERVISOR_MARKER)
}

fn log_file_path(data_dir: &Path, daemon_name: &str, now: &DateTime<Local>) -> PathBuf {
    data_dir
        .join("logs")
        .join(format!("{daemon_name}_{}.log", now.format("%Y%m%d_%H%M%S")))
}

/// Put the child in its own session so it survives the supervisor's exit
/// and is not signaled along with the supervisor's process group.
#[cfg(unix)]
fn detach(cmd: &mut Command) {
    use std::os::unix::process::CommandExt;
    unsafe {
        cmd.pre_exec(|| {
            libc::setsid();
            Ok(())
        });
    }
}

#[cfg(windows)]
fn detach(cmd: &mut Command) {
    use std::os::windows::process::CommandExt;
    const DETACHED_PROCESS: u32 = 0x0000_0008;
    const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;
    cmd.creation_flags(DETACHED_PROCESS | CREATE_NEW_PROCESS_GROUP);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daemon_match_requires_name_and_excludes_supervisor() {
        assert!(is_daemon_process("/opt/app/bin/watch_daemon --port 9", "watch_daemon"));
        assert!(!is_daemon_process("/usr/bin/python3 server.py", "watch_daemon"));
        // A supervisor invocation mentions the daemon name but must not
        // count as a running instance.
        assert!(!is_daemon_process(
            "shipwright daemon watch_daemon --port 9",
            "watch_daemon"
        ));
    }

    #[test]
    fn log_file_name_carries_daemon_and_timestamp() {
        use chrono::TimeZone;

        let now = Local.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        let path = log_file_path(Path::new("/data"), "watch_daemon", &now);
        assert_eq!(
            path,
            PathBuf::from("/data/logs/watch_daemon_20250102_030405.log")
        );
    }

    #[test]
    fn bare_program_resolves_under_home_bin() {
        let home = tempfile::tempdir().unwrap();
        let bin = home.path().join("bin");
        std::fs::create_dir_all(&bin).unwrap();
        std::fs::write(bin.join("watch_daemon"), b"#!/bin/sh\n").unwrap();

        let resolved = resolve_program("watch_daemon", home.path()).unwrap();
        assert_eq!(resolved, bin.join("watch_daemon"));

        let missing = resolve_program("no_such_daemon", home.path());
        assert!(missing.is_err());
    }

    #[test]
    fn runtime_lib_probe_prefers_known_names() {
        let lib = tempfile::tempdir().unwrap();
        assert!(find_runtime_lib(lib.path()).is_none());

        std::fs::write(lib.path().join("libonnxruntime.so"), b"").unwrap();
        let found = find_runtime_lib(lib.path()).unwrap();
        assert_eq!(found, lib.path().join("libonnxruntime.so"));
    }
}
