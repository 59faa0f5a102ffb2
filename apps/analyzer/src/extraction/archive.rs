//! Archive Unpacker: expands an uploaded zip into a scoped temporary directory.
//!
//! The returned `UnpackedArchive` owns the `TempDir`; dropping it removes the upload
//! and every extracted member, whichever way the batch exits.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, warn};
use zip::ZipArchive;

use crate::errors::AppError;

const UPLOAD_FILE_NAME: &str = "upload.zip";
const MEMBERS_DIR: &str = "members";

/// A regular file found at the top level of the expanded archive.
#[derive(Debug, Clone)]
pub struct ArchiveMember {
    pub name: String,
    pub path: PathBuf,
}

/// Extracted archive contents, alive for as long as this value is.
#[derive(Debug)]
pub struct UnpackedArchive {
    dir: TempDir,
    members: Vec<ArchiveMember>,
}

impl UnpackedArchive {
    /// Top-level members in directory listing order. The order is fixed for this value.
    pub fn members(&self) -> &[ArchiveMember] {
        &self.members
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }
}

/// Writes `archive` to a temporary location and expands all entries.
///
/// Blocking: callers on the async runtime must go through `spawn_blocking`.
pub fn unpack(archive: &[u8]) -> Result<UnpackedArchive, AppError> {
    if archive.is_empty() {
        return Err(AppError::CorruptArchive("uploaded archive is empty".to_string()));
    }

    let dir = tempfile::Builder::new()
        .prefix("resume-batch-")
        .tempdir()
        .map_err(io_error)?;

    let upload_path = dir.path().join(UPLOAD_FILE_NAME);
    fs::write(&upload_path, archive).map_err(io_error)?;

    let members_dir = dir.path().join(MEMBERS_DIR);
    fs::create_dir(&members_dir).map_err(io_error)?;

    let file = fs::File::open(&upload_path).map_err(io_error)?;
    let mut zip = ZipArchive::new(file).map_err(|e| AppError::CorruptArchive(e.to_string()))?;
    expand(&mut zip, &members_dir)?;

    let members = list_top_level(&members_dir).map_err(io_error)?;
    debug!("Unpacked {} top-level members", members.len());

    Ok(UnpackedArchive { dir, members })
}

fn expand(zip: &mut ZipArchive<fs::File>, target: &Path) -> Result<(), AppError> {
    for i in 0..zip.len() {
        let mut entry = zip
            .by_index(i)
            .map_err(|e| AppError::CorruptArchive(e.to_string()))?;

        // Reject names that would land outside the target directory.
        let relative = match entry.enclosed_name() {
            Some(path) => path.to_path_buf(),
            None => {
                warn!("Skipping archive entry with unsafe path: {}", entry.name());
                continue;
            }
        };
        let out_path = target.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path).map_err(io_error)?;
            continue;
        }
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        let mut out = fs::File::create(&out_path).map_err(io_error)?;
        io::copy(&mut entry, &mut out)
            .map_err(|e| AppError::CorruptArchive(format!("{}: {e}", entry.name())))?;
    }
    Ok(())
}

fn list_top_level(dir: &Path) -> io::Result<Vec<ArchiveMember>> {
    let mut members = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        members.push(ArchiveMember {
            name: entry.file_name().to_string_lossy().into_owned(),
            path: entry.path(),
        });
    }
    Ok(members)
}

fn io_error(e: io::Error) -> AppError {
    AppError::Internal(anyhow::Error::new(e).context("temporary storage failure"))
}
