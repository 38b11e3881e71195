//! Post-install artifact generators.
//!
//! Invoked once by the pipeline after the last package completes: a
//! readme describing the installed layout, a launcher script for serving
//! the site locally, and a JSON index of the installed packages.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use crate::error::{InstallError, Result};
use crate::package::PackageRecord;
use crate::version::ProductVersion;

pub const INDEX_FILE_NAME: &str = "install-index.json";

pub async fn write_readme(root: &Path, version: ProductVersion) -> Result<PathBuf> {
    let tag = version.tag();
    let path = root.join(format!("Mobile Development Environment {tag}.txt"));

    let text = format!(
        "Mobile Development Environment {tag}\n\
         ------------------------------------------------\n\
         \n\
         Use the 'start-mobile-site' script in this directory to serve the\n\
         website locally, or point your own web server at this directory.\n\
         \n\
         To access the production configuration visit:\n\
         http://<site-root>/products/mobile-crm/index.html\n\
         \n\
         To access the development configuration visit:\n\
         http://<site-root>/products/mobile-crm/index-dev.html\n\
         \n\
         ------------------------------------------------\n\
         Generated by mobilekit\n"
    );

    write_artifact(&path, text.as_bytes()).await?;
    debug!(path = %path.display(), "readme written");
    Ok(path)
}

pub async fn write_launcher_shortcut(root: &Path) -> Result<PathBuf> {
    let (name, contents) = if cfg!(windows) {
        (
            "start-mobile-site.cmd",
            format!("@echo off\r\nnpx serve \"{}\"\r\n", root.display()),
        )
    } else {
        (
            "start-mobile-site.sh",
            format!("#!/bin/sh\nexec npx serve \"{}\"\n", root.display()),
        )
    };

    let path = root.join(name);
    write_artifact(&path, contents.as_bytes()).await?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .await
            .map_err(|e| InstallError::Artifact {
                path: path.clone(),
                source: e,
            })?;
    }

    debug!(path = %path.display(), "launcher shortcut written");
    Ok(path)
}

pub async fn write_index(root: &Path, records: &[PackageRecord]) -> Result<PathBuf> {
    let path = root.join(INDEX_FILE_NAME);
    let json = serde_json::to_vec_pretty(records).map_err(|e| InstallError::Artifact {
        path: path.clone(),
        source: std::io::Error::other(e),
    })?;

    write_artifact(&path, &json).await?;
    debug!(path = %path.display(), packages = records.len(), "index written");
    Ok(path)
}

async fn write_artifact(path: &Path, contents: &[u8]) -> Result<()> {
    fs::write(path, contents)
        .await
        .map_err(|e| InstallError::Artifact {
            path: path.to_path_buf(),
            source: e,
        })
}
