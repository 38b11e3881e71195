//! Package descriptors and the install queue builder.
//!
//! The queue is fixed at install start: SDK first, then the product, then
//! the optional sample and legacy-compatibility packages. Descriptors are
//! immutable once built.

use std::collections::VecDeque;
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::config::InstallConfig;

/// Account on the archive host that owns every package repository.
pub const SOURCE_ACCOUNT: &str = "mobileworks";

/// One package to install.
#[derive(Debug, Clone)]
pub struct PackageDescriptor {
    /// Display label, includes the version tag
    pub name: String,
    /// File name the downloaded archive is saved as under the install root
    pub archive_file_name: String,
    /// Final directory the unpacked content is moved to
    pub destination: PathBuf,
    pub account: String,
    pub repository: String,
    /// Release tag identifying the remote archive
    pub tag: String,
    /// Action to run after extraction
    pub post_action: PostAction,
}

impl PackageDescriptor {
    /// Serializable projection for the generated index artifact.
    pub fn record(&self) -> PackageRecord {
        PackageRecord {
            name: self.name.clone(),
            repository: self.repository.clone(),
            tag: self.tag.clone(),
            destination: self.destination.display().to_string(),
        }
    }
}

/// Completed-package entry written to the index artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageRecord {
    pub name: String,
    pub repository: String,
    pub tag: String,
    pub destination: String,
}

/// Post-extraction action, a closed set resolved at queue-build time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostAction {
    None,
    /// Run commands sequentially in `dir`, waiting for each to exit
    RunCommands {
        dir: PathBuf,
        commands: Vec<CommandSpec>,
    },
    /// Move a file produced by this package into another package's tree
    MoveFile { from: PathBuf, to: PathBuf },
}

/// An external command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Build the ordered install queue for a configuration.
pub fn build_queue(config: &InstallConfig) -> VecDeque<PackageDescriptor> {
    let version = config.version;
    let tag = version.tag();
    let bare = version.bare();
    let root = &config.root;
    let products = root.join("products");

    let build_action = |dir: PathBuf| {
        let commands: Vec<CommandSpec> = version
            .build_commands()
            .iter()
            .map(|(program, args)| CommandSpec {
                program: (*program).to_string(),
                args: args.iter().map(|arg| (*arg).to_string()).collect(),
            })
            .collect();
        if commands.is_empty() {
            PostAction::None
        } else {
            PostAction::RunCommands { dir, commands }
        }
    };

    let mut queue = VecDeque::new();

    let sdk_dir = root.join("mobile-sdk");
    queue.push_back(PackageDescriptor {
        name: format!("mobile-sdk {tag}"),
        archive_file_name: format!("mobile-sdk-{bare}.zip"),
        destination: sdk_dir.clone(),
        account: SOURCE_ACCOUNT.to_string(),
        repository: "mobile-sdk".to_string(),
        tag: tag.to_string(),
        post_action: build_action(sdk_dir),
    });

    // The product line publishes "gold" tag variants of each release.
    let crm_dir = products.join("mobile-crm");
    queue.push_back(PackageDescriptor {
        name: format!("mobile-crm {tag}"),
        archive_file_name: format!("mobile-crm-{bare}-gold.zip"),
        destination: crm_dir.clone(),
        account: SOURCE_ACCOUNT.to_string(),
        repository: "mobile-crm".to_string(),
        tag: format!("{tag}-gold"),
        post_action: build_action(crm_dir.clone()),
    });

    if config.include_sample {
        let sample_dir = products.join("mobile-sample");
        queue.push_back(PackageDescriptor {
            name: format!("mobile-sample {tag}"),
            archive_file_name: format!("mobile-sample-{bare}.zip"),
            destination: sample_dir.clone(),
            account: SOURCE_ACCOUNT.to_string(),
            repository: "mobile-sample".to_string(),
            tag: tag.to_string(),
            post_action: PostAction::MoveFile {
                from: sample_dir.join("index-dev-sample.html"),
                to: crm_dir.join("index-dev-sample.html"),
            },
        });
    }

    if config.include_legacy_compat {
        let legacy_dir = products.join("mobile-crm-legacy");
        queue.push_back(PackageDescriptor {
            name: format!("mobile-crm-legacy {tag}"),
            archive_file_name: format!("mobile-crm-legacy-{bare}.zip"),
            destination: legacy_dir.clone(),
            account: SOURCE_ACCOUNT.to_string(),
            repository: "mobile-crm-legacy".to_string(),
            tag: tag.to_string(),
            post_action: PostAction::MoveFile {
                from: legacy_dir.join("index-dev-legacy.html"),
                to: crm_dir.join("index-dev-legacy.html"),
            },
        });
    }

    queue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::ProductVersion;
    use std::path::Path;

    fn config(sample: bool, legacy: bool) -> InstallConfig {
        InstallConfig::new("/opt/mobile", ProductVersion::V3_5)
            .with_sample(sample)
            .with_legacy_compat(legacy)
    }

    #[test]
    fn queue_length_follows_inclusion_flags() {
        assert_eq!(build_queue(&config(false, false)).len(), 2);
        assert_eq!(build_queue(&config(true, false)).len(), 3);
        assert_eq!(build_queue(&config(false, true)).len(), 3);
        assert_eq!(build_queue(&config(true, true)).len(), 4);
    }

    #[test]
    fn queue_order_is_sdk_product_sample_legacy() {
        let queue = build_queue(&config(true, true));
        let repos: Vec<&str> = queue.iter().map(|p| p.repository.as_str()).collect();
        assert_eq!(
            repos,
            ["mobile-sdk", "mobile-crm", "mobile-sample", "mobile-crm-legacy"]
        );
    }

    #[test]
    fn tags_use_version_table_and_filenames_use_bare_form() {
        let queue = build_queue(&config(false, false));
        let sdk = &queue[0];
        assert_eq!(sdk.tag, "v3.5");
        assert_eq!(sdk.archive_file_name, "mobile-sdk-3.5.zip");

        let queue = build_queue(&InstallConfig::new("/opt/mobile", ProductVersion::V2_0));
        let sdk = &queue[0];
        assert_eq!(sdk.tag, "v2.0.1");
        assert_eq!(sdk.archive_file_name, "mobile-sdk-2.0.1.zip");
    }

    #[test]
    fn product_package_uses_gold_tag_variant() {
        let queue = build_queue(&config(false, false));
        let product = &queue[1];
        assert_eq!(product.tag, "v3.5-gold");
        assert_eq!(product.archive_file_name, "mobile-crm-3.5-gold.zip");
        assert_eq!(
            product.destination,
            Path::new("/opt/mobile/products/mobile-crm")
        );
    }

    #[test]
    fn sample_post_action_moves_dev_index_into_product() {
        let queue = build_queue(&config(true, false));
        let sample = &queue[2];
        match &sample.post_action {
            PostAction::MoveFile { from, to } => {
                assert_eq!(
                    from,
                    Path::new("/opt/mobile/products/mobile-sample/index-dev-sample.html")
                );
                assert_eq!(
                    to,
                    Path::new("/opt/mobile/products/mobile-crm/index-dev-sample.html")
                );
            }
            other => panic!("expected MoveFile, got {other:?}"),
        }
    }

    #[test]
    fn build_post_action_resolved_from_version_table() {
        let queue = build_queue(&InstallConfig::new("/opt/mobile", ProductVersion::V3_4));
        match &queue[0].post_action {
            PostAction::RunCommands { dir, commands } => {
                assert_eq!(dir, Path::new("/opt/mobile/mobile-sdk"));
                assert_eq!(commands.len(), 2);
                assert_eq!(commands[0].to_string(), "npm install");
                assert_eq!(commands[1].to_string(), "grunt babel less");
            }
            other => panic!("expected RunCommands, got {other:?}"),
        }

        let queue = build_queue(&InstallConfig::new("/opt/mobile", ProductVersion::V3_0));
        assert_eq!(queue[0].post_action, PostAction::None);
        assert_eq!(queue[1].post_action, PostAction::None);
    }
}
