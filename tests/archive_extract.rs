// tests/archive_extract.rs

use std::error::Error;
use std::io::Write;
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;
use shipwright::errors::ShipwrightError;
use shipwright::fetch::extract_member;

type TestResult = Result<(), Box<dyn Error>>;

fn tar_with_members(members: &[(&str, &[u8])]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (path, data) in members {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, path, *data).unwrap();
    }
    builder.into_inner().unwrap()
}

fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

fn write_archive(dir: &Path, name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

#[test]
fn matching_member_is_extracted() -> TestResult {
    let dir = tempfile::tempdir()?;
    let archive = write_archive(
        dir.path(),
        "runtime.tar",
        &tar_with_members(&[
            ("pkg/README", b"docs"),
            ("pkg/lib/libexample.so.1", b"library bytes"),
        ]),
    );

    let dest = dir.path().join("lib").join("libexample.so");
    extract_member(
        &archive,
        "libexample.so",
        |base| base.starts_with("libexample.so"),
        &dest,
    )?;

    assert_eq!(std::fs::read(&dest)?, b"library bytes");

    Ok(())
}

#[test]
fn gzip_archives_are_detected_by_magic_bytes() -> TestResult {
    let dir = tempfile::tempdir()?;
    let tar_bytes = tar_with_members(&[("pkg/lib/libexample.so.1", b"compressed library")]);
    let archive = write_archive(dir.path(), "runtime.tgz", &gzip(&tar_bytes));

    let dest = dir.path().join("libexample.so");
    extract_member(
        &archive,
        "libexample.so",
        |base| base.starts_with("libexample.so"),
        &dest,
    )?;

    assert_eq!(std::fs::read(&dest)?, b"compressed library");

    Ok(())
}

#[test]
fn first_matching_member_in_archive_order_wins() -> TestResult {
    let dir = tempfile::tempdir()?;
    let archive = write_archive(
        dir.path(),
        "runtime.tar",
        &tar_with_members(&[
            ("pkg/lib/libexample.so.1", b"first"),
            ("pkg/lib/libexample.so.2", b"second"),
        ]),
    );

    let dest = dir.path().join("libexample.so");
    extract_member(
        &archive,
        "libexample.so",
        |base| base.starts_with("libexample.so"),
        &dest,
    )?;

    assert_eq!(std::fs::read(&dest)?, b"first");

    Ok(())
}

#[test]
fn missing_member_is_a_structured_error() -> TestResult {
    let dir = tempfile::tempdir()?;
    let archive = write_archive(
        dir.path(),
        "runtime.tar",
        &tar_with_members(&[("pkg/README", b"docs only")]),
    );

    let dest = dir.path().join("libexample.so");
    let result = extract_member(
        &archive,
        "libexample.so",
        |base| base.starts_with("libexample.so"),
        &dest,
    );

    match result {
        Err(ShipwrightError::ArchiveMemberMissing { wanted, .. }) => {
            assert_eq!(wanted, "libexample.so");
        }
        other => panic!("Expected ArchiveMemberMissing, got: {:?}", other.err()),
    }
    assert!(!dest.exists());

    Ok(())
}
