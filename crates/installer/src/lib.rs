//! Mobile development environment installer.
//!
//! Provisions a local development environment by downloading a fixed,
//! ordered set of versioned release archives, extracting each into the
//! install tree, running version-specific build steps, and generating a
//! readme, a launcher shortcut, and a package index.
//!
//! The pipeline is strictly sequential: one package at a time, two
//! counted steps per package (download, extract), progress published
//! through an optional callback.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use installer::{InstallConfig, InstallEvent, InstallPipeline, ProductVersion};
//! use std::sync::Arc;
//!
//! # async fn example() -> installer::Result<()> {
//! let config = InstallConfig::new("./mobile", ProductVersion::V3_5).with_sample(true);
//!
//! let mut pipeline = InstallPipeline::new(config).with_callback(Arc::new(|event| {
//!     match event {
//!         InstallEvent::StepUpdate { step } => println!("step {step}"),
//!         InstallEvent::Complete => println!("done"),
//!         _ => {}
//!     }
//! }));
//!
//! let summary = pipeline.run().await?;
//! println!("installed {} packages", summary.installed.len());
//! # Ok(())
//! # }
//! ```

pub mod artifacts;
pub mod config;
pub mod error;
pub mod events;
pub mod extract;
pub mod fetch;
pub mod package;
pub mod pipeline;
pub mod postaction;
pub mod version;


// Re-export commonly used types for convenience
pub use config::{FetchConfig, InstallConfig};
pub use error::{InstallError, Result};
pub use events::{
    CompositeReporter, ConsoleReporter, InstallCallback, InstallEvent, InstallReporter,
    IntoInstallCallback, NullReporter, ProgressUpdate,
};
pub use fetch::ArchiveClient;
pub use package::{
    build_queue, CommandSpec, PackageDescriptor, PackageRecord, PostAction, SOURCE_ACCOUNT,
};
pub use pipeline::{InstallPhase, InstallPipeline, InstallSummary};
pub use version::ProductVersion;
