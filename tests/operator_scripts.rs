// tests/operator_scripts.rs

use std::error::Error;
use std::fs;

use shipwright::orchestrate::scripts::install_operator_scripts;

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn recognized_scripts_are_copied_verbatim() -> TestResult {
    let dir = tempfile::tempdir()?;
    let scripts = dir.path().join("scripts");
    fs::create_dir_all(&scripts)?;

    let recognized = [
        "start_watch.sh",
        "stop_watch.cmd",
        "run_daemon.py",
        "gen_self_signed_cert.py",
    ];
    let ignored = [
        "README.md",
        "start_notes.txt",   // wrong extension
        "helper.sh",         // no purpose prefix
        "prune_old_data.py", // one-off maintenance, not operator tooling
    ];
    for name in recognized.iter().chain(ignored.iter()) {
        fs::write(scripts.join(name), b"#!/bin/sh\n")?;
    }

    let bin = dir.path().join("dist").join("bin");
    let mut installed = install_operator_scripts(&scripts, &bin)?;
    installed.sort();

    let mut expected: Vec<_> = recognized.iter().map(|n| bin.join(n)).collect();
    expected.sort();
    assert_eq!(installed, expected);

    for name in ignored {
        assert!(!bin.join(name).exists(), "{name} should not be installed");
    }

    Ok(())
}

#[test]
fn missing_scripts_directory_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = install_operator_scripts(&dir.path().join("absent"), &dir.path().join("bin"));
    assert!(result.is_err());
}

#[test]
fn subdirectories_are_not_installed() -> TestResult {
    let dir = tempfile::tempdir()?;
    let scripts = dir.path().join("scripts");
    // A directory whose name matches the pattern must still be skipped.
    fs::create_dir_all(scripts.join("start_watch.sh"))?;

    let bin = dir.path().join("bin");
    let installed = install_operator_scripts(&scripts, &bin)?;

    assert!(installed.is_empty());
    assert!(!bin.join("start_watch.sh").exists());

    Ok(())
}
