//! The sequential install pipeline.
//!
//! Drives the package queue end to end, one package at a time:
//! download, extract, post-process. Two steps are counted per package
//! (download and extract), so the step total is twice the initial queue
//! length. A package is recorded in the completed list when it is
//! dequeued, before its download finishes; a failing package therefore
//! still appears there.

use std::collections::VecDeque;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::artifacts;
use crate::config::{FetchConfig, InstallConfig};
use crate::error::Result;
use crate::events::{InstallCallback, InstallEvent, ProgressUpdate};
use crate::extract::extract_archive;
use crate::fetch::ArchiveClient;
use crate::package::{build_queue, PackageDescriptor, PackageRecord};
use crate::postaction::run_post_action;

/// Pipeline phases, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallPhase {
    Idle,
    Initializing,
    Downloading,
    Extracting,
    PostProcessing,
    Finalizing,
    Complete,
}

#[derive(Default)]
struct InstallSession {
    pending: VecDeque<PackageDescriptor>,
    completed: Vec<PackageDescriptor>,
    current_step: usize,
    total_steps: usize,
}

/// Summary of a successful run.
#[derive(Debug, Clone)]
pub struct InstallSummary {
    /// Installed packages, in install order
    pub installed: Vec<PackageRecord>,
    pub readme: PathBuf,
    pub shortcut: PathBuf,
    pub index: PathBuf,
}

pub struct InstallPipeline {
    config: InstallConfig,
    fetch_config: FetchConfig,
    callback: Option<InstallCallback>,
    phase: InstallPhase,
    session: InstallSession,
}

impl InstallPipeline {
    pub fn new(config: InstallConfig) -> Self {
        Self {
            config,
            fetch_config: FetchConfig::default(),
            callback: None,
            phase: InstallPhase::Idle,
            session: InstallSession::default(),
        }
    }

    pub fn with_fetch_config(mut self, fetch_config: FetchConfig) -> Self {
        self.fetch_config = fetch_config;
        self
    }

    pub fn with_callback(mut self, callback: InstallCallback) -> Self {
        self.callback = Some(callback);
        self
    }

    pub fn phase(&self) -> InstallPhase {
        self.phase
    }

    /// Packages dequeued so far, recorded before their work finishes.
    pub fn completed_packages(&self) -> &[PackageDescriptor] {
        &self.session.completed
    }

    /// Run the whole pipeline. Session state is rebuilt from scratch on
    /// every invocation.
    pub async fn run(&mut self) -> Result<InstallSummary> {
        self.phase = InstallPhase::Initializing;
        let queue = build_queue(&self.config);
        self.session = InstallSession {
            total_steps: queue.len() * 2,
            pending: queue,
            completed: Vec::new(),
            current_step: 1,
        };
        info!(
            packages = self.session.pending.len(),
            root = %self.config.root.display(),
            version = %self.config.version,
            "starting install"
        );

        self.emit(InstallEvent::Initializing {
            action: "initializing downloads".to_string(),
            step: self.session.current_step,
            step_total: self.session.total_steps,
        });

        let client = ArchiveClient::new(&self.fetch_config)?;

        while let Some(package) = self.session.pending.pop_front() {
            self.install_package(&client, package).await?;
        }

        self.phase = InstallPhase::Finalizing;
        let records: Vec<PackageRecord> = self
            .session
            .completed
            .iter()
            .map(PackageDescriptor::record)
            .collect();
        let readme = artifacts::write_readme(&self.config.root, self.config.version).await?;
        let shortcut = artifacts::write_launcher_shortcut(&self.config.root).await?;
        let index = artifacts::write_index(&self.config.root, &records).await?;

        self.phase = InstallPhase::Complete;
        self.emit(InstallEvent::Complete);
        info!(packages = records.len(), "install complete");

        Ok(InstallSummary {
            installed: records,
            readme,
            shortcut,
            index,
        })
    }

    async fn install_package(
        &mut self,
        client: &ArchiveClient,
        package: PackageDescriptor,
    ) -> Result<()> {
        // Dequeue-time registration: the package counts from here on,
        // even if a later phase fails.
        self.session.completed.push(package.clone());
        info!(package = %package.name, "installing package");

        self.phase = InstallPhase::Downloading;
        self.emit_step();

        let archive_path = self.config.root.join(&package.archive_file_name);
        let callback = self.callback.clone();
        let name = package.name.clone();
        let mut last_percent = None;
        client
            .download(
                &package.account,
                &package.repository,
                &package.tag,
                &archive_path,
                |downloaded, total| {
                    let percent = match total {
                        Some(total) if total > 0 => ((downloaded * 100) / total).min(100) as u8,
                        _ => 0,
                    };
                    if last_percent != Some(percent) {
                        last_percent = Some(percent);
                        if let Some(callback) = &callback {
                            callback(InstallEvent::Progress(ProgressUpdate::Downloading {
                                package: name.clone(),
                                percent,
                            }));
                        }
                    }
                },
            )
            .await?;

        self.emit_step();
        self.phase = InstallPhase::Extracting;
        self.emit(InstallEvent::Progress(ProgressUpdate::Extracting {
            package: package.name.clone(),
            current_entry: 0,
            total_entries: 0,
        }));

        let callback = self.callback.clone();
        let name = package.name.clone();
        extract_archive(
            &archive_path,
            &self.config.root,
            &package.destination,
            |current_entry, total_entries| {
                if let Some(callback) = &callback {
                    callback(InstallEvent::Progress(ProgressUpdate::Extracting {
                        package: name.clone(),
                        current_entry,
                        total_entries,
                    }));
                }
            },
        )?;

        self.phase = InstallPhase::PostProcessing;
        debug!(package = %package.name, "running post-install action");
        run_post_action(&package.post_action, &package.name).await?;

        Ok(())
    }

    fn emit_step(&mut self) {
        let step = self.session.current_step;
        self.session.current_step += 1;
        self.emit(InstallEvent::StepUpdate { step });
    }

    fn emit(&self, event: InstallEvent) {
        if let Some(callback) = &self.callback {
            callback(event);
        }
    }
}
