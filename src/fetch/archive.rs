// src/fetch/archive.rs

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use anyhow::Context;
use flate2::read::GzDecoder;
use tracing::info;

use crate::errors::{Result, ShipwrightError};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Copy the first archive member whose base name satisfies `matches` to
/// `dest`, then stop reading.
///
/// The archive is scanned as a stream (gzip compression detected by magic
/// bytes), so only the bytes up to and including the matching member are
/// ever decompressed. When several members match, the first in archive
/// order wins — deterministic for a given archive file. No match is an
/// error: the archive is assumed malformed or built for another platform.
///
/// `wanted` is a human-readable description of the expected member, used
/// in the error.
pub fn extract_member(
    archive: &Path,
    wanted: &str,
    matches: impl Fn(&str) -> bool,
    dest: &Path,
) -> Result<()> {
    let mut file =
        File::open(archive).with_context(|| format!("opening archive {:?}", archive))?;

    let mut magic = [0u8; 2];
    let read = file
        .read(&mut magic)
        .with_context(|| format!("reading archive header of {:?}", archive))?;
    file.seek(SeekFrom::Start(0))
        .with_context(|| format!("rewinding archive {:?}", archive))?;

    let reader: Box<dyn Read> = if read == magic.len() && magic == GZIP_MAGIC {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };

    let mut tar = tar::Archive::new(reader);
    let entries = tar
        .entries()
        .with_context(|| format!("reading archive {:?}", archive))?;

    for entry in entries {
        let mut entry = entry.with_context(|| format!("reading member of {:?}", archive))?;
        if !entry.header().entry_type().is_file() {
            continue;
        }

        let base_name = {
            let path = entry
                .path()
                .with_context(|| format!("reading member path in {:?}", archive))?;
            match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name.to_string(),
                None => continue,
            }
        };

        if matches(&base_name) {
            if let Some(parent) = dest.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {:?}", parent))?;
            }
            let mut out =
                File::create(dest).with_context(|| format!("creating {:?}", dest))?;
            io::copy(&mut entry, &mut out)
                .with_context(|| format!("extracting '{}' to {:?}", base_name, dest))?;
            info!(member = %base_name, dest = %dest.display(), "extracted archive member");
            return Ok(());
        }
    }

    Err(ShipwrightError::ArchiveMemberMissing {
        wanted: wanted.to_string(),
        archive: archive.to_path_buf(),
    })
}
