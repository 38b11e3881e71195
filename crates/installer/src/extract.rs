//! Archive extraction.
//!
//! Archives unpack to a single top-level directory named after the archive
//! file stem. Entries are written under the staging root (overwriting
//! silently), the root directory is then relocated to its final
//! destination, and the archive file is deleted only after the move
//! succeeds.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use tracing::debug;
use zip::ZipArchive;

use crate::error::{FileOperation, InstallError, Result};

/// Unpack `archive` under `staging_root` and relocate its root directory
/// to `destination`.
///
/// `on_entry` receives `(index, total)` once per entry, indices 1-based
/// and gapless. Returns the entry count.
pub fn extract_archive(
    archive: &Path,
    staging_root: &Path,
    destination: &Path,
    mut on_entry: impl FnMut(usize, usize),
) -> Result<usize> {
    let file = File::open(archive).map_err(|e| fs_error(archive, FileOperation::Read, e))?;
    let mut zip = ZipArchive::new(file).map_err(|e| zip_error(archive, e))?;

    let total = zip.len();
    debug!(archive = %archive.display(), entries = total, "extracting archive");

    for index in 0..total {
        let mut entry = zip.by_index(index).map_err(|e| zip_error(archive, e))?;
        if let Some(relative) = entry.enclosed_name() {
            let out_path = staging_root.join(&relative);
            if entry.is_dir() {
                fs::create_dir_all(&out_path)
                    .map_err(|e| fs_error(&out_path, FileOperation::CreateDir, e))?;
            } else {
                if let Some(parent) = out_path.parent() {
                    fs::create_dir_all(parent)
                        .map_err(|e| fs_error(parent, FileOperation::CreateDir, e))?;
                }
                let mut out = File::create(&out_path)
                    .map_err(|e| fs_error(&out_path, FileOperation::Create, e))?;
                io::copy(&mut entry, &mut out)
                    .map_err(|e| fs_error(&out_path, FileOperation::Write, e))?;

                #[cfg(unix)]
                if let Some(mode) = entry.unix_mode() {
                    use std::os::unix::fs::PermissionsExt;
                    fs::set_permissions(&out_path, fs::Permissions::from_mode(mode))
                        .map_err(|e| fs_error(&out_path, FileOperation::Write, e))?;
                }
            }
        }
        on_entry(index + 1, total);
    }
    drop(zip);

    relocate_unpacked_root(archive, staging_root, destination)?;

    fs::remove_file(archive).map_err(|e| fs_error(archive, FileOperation::Delete, e))?;
    debug!(dest = %destination.display(), "archive extracted and relocated");
    Ok(total)
}

fn relocate_unpacked_root(archive: &Path, staging_root: &Path, destination: &Path) -> Result<()> {
    let stem = archive
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| InstallError::Extraction {
            archive: archive.to_path_buf(),
            reason: "archive has no usable file name".to_string(),
        })?;

    let unpacked_root = staging_root.join(stem);
    if !unpacked_root.is_dir() {
        return Err(InstallError::Extraction {
            archive: archive.to_path_buf(),
            reason: format!(
                "expected top-level directory '{}' was not produced",
                unpacked_root.display()
            ),
        });
    }

    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).map_err(|e| fs_error(parent, FileOperation::CreateDir, e))?;
    }
    if destination.exists() {
        fs::remove_dir_all(destination).map_err(|e| InstallError::Extraction {
            archive: archive.to_path_buf(),
            reason: format!(
                "destination '{}' exists and could not be replaced: {e}",
                destination.display()
            ),
        })?;
    }
    fs::rename(&unpacked_root, destination).map_err(|e| InstallError::Extraction {
        archive: archive.to_path_buf(),
        reason: format!(
            "could not move '{}' to '{}': {e}",
            unpacked_root.display(),
            destination.display()
        ),
    })
}

fn fs_error(path: &Path, operation: FileOperation, source: std::io::Error) -> InstallError {
    InstallError::FileSystem {
        path: path.to_path_buf(),
        operation,
        source,
    }
}

fn zip_error(archive: &Path, source: zip::result::ZipError) -> InstallError {
    InstallError::Zip {
        archive: archive.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;
    use zip::write::SimpleFileOptions;

    fn write_fixture_archive(path: &Path, root_dir: &str, files: &[(&str, &str)]) {
        let mut writer = zip::ZipWriter::new(File::create(path).unwrap());
        let options = SimpleFileOptions::default();
        writer
            .add_directory(format!("{root_dir}/"), options)
            .unwrap();
        for (name, contents) in files {
            writer
                .start_file(format!("{root_dir}/{name}"), options)
                .unwrap();
            writer.write_all(contents.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn extracts_relocates_and_deletes_archive() {
        let root = tempdir().unwrap();
        let archive = root.path().join("mobile-sdk-3.5.zip");
        write_fixture_archive(
            &archive,
            "mobile-sdk-3.5",
            &[("readme.txt", "sdk"), ("src/main.js", "code")],
        );

        let destination = root.path().join("mobile-sdk");
        let mut seen = Vec::new();
        let total =
            extract_archive(&archive, root.path(), &destination, |current, total| {
                seen.push((current, total));
            })
            .unwrap();

        // 1 directory entry + 2 files
        assert_eq!(total, 3);
        let indices: Vec<usize> = seen.iter().map(|(current, _)| *current).collect();
        assert_eq!(indices, [1, 2, 3]);
        assert!(seen.iter().all(|(_, t)| *t == 3));

        assert_eq!(
            fs::read_to_string(destination.join("readme.txt")).unwrap(),
            "sdk"
        );
        assert_eq!(
            fs::read_to_string(destination.join("src/main.js")).unwrap(),
            "code"
        );
        assert!(!archive.exists());
        assert!(!root.path().join("mobile-sdk-3.5").exists());
    }

    #[test]
    fn creates_destination_parent_directories() {
        let root = tempdir().unwrap();
        let archive = root.path().join("mobile-crm-3.5-gold.zip");
        write_fixture_archive(&archive, "mobile-crm-3.5-gold", &[("index.html", "<html>")]);

        let destination = root.path().join("products").join("mobile-crm");
        extract_archive(&archive, root.path(), &destination, |_, _| {}).unwrap();

        assert!(destination.join("index.html").exists());
    }

    #[test]
    fn replaces_existing_destination() {
        let root = tempdir().unwrap();
        let destination = root.path().join("mobile-sdk");
        fs::create_dir_all(&destination).unwrap();
        fs::write(destination.join("stale.txt"), "old").unwrap();

        let archive = root.path().join("mobile-sdk-3.5.zip");
        write_fixture_archive(&archive, "mobile-sdk-3.5", &[("readme.txt", "new")]);

        extract_archive(&archive, root.path(), &destination, |_, _| {}).unwrap();

        assert!(!destination.join("stale.txt").exists());
        assert!(destination.join("readme.txt").exists());
    }

    #[test]
    fn missing_top_level_directory_is_an_extraction_error() {
        let root = tempdir().unwrap();
        let archive = root.path().join("mobile-sdk-3.5.zip");
        write_fixture_archive(&archive, "unexpected-root", &[("readme.txt", "sdk")]);

        let err = extract_archive(
            &archive,
            root.path(),
            &root.path().join("mobile-sdk"),
            |_, _| {},
        )
        .unwrap_err();

        assert!(matches!(err, InstallError::Extraction { .. }));
        // the archive is only deleted after a successful relocation
        assert!(archive.exists());
    }
}
