//! Minimal end-to-end install driven from code.
//!
//! Usage: cargo run --example install_example -- <root-dir>

use installer::{
    ConsoleReporter, InstallConfig, InstallPipeline, IntoInstallCallback, ProductVersion,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let root = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "./mobile".to_string());

    let config = InstallConfig::new(&root, ProductVersion::V3_5).with_sample(true);
    let reporter = ConsoleReporter::new(true);

    let mut pipeline = InstallPipeline::new(config).with_callback(reporter.into_callback());
    let summary = pipeline.run().await?;

    println!("readme:   {}", summary.readme.display());
    println!("shortcut: {}", summary.shortcut.display());
    println!("index:    {}", summary.index.display());
    Ok(())
}
