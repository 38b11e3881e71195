use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use installer::{
    ConsoleReporter, FetchConfig, InstallConfig, InstallPipeline, IntoInstallCallback,
    ProductVersion,
};

/// Provision a local mobile development environment.
#[derive(Debug, Parser)]
#[command(name = "mobilekit", version, about)]
struct Args {
    /// Directory the environment is installed into
    root: PathBuf,

    /// Product version to install; unknown values use the newest release
    #[arg(long = "product-version", default_value = "3.5")]
    product_version: ProductVersion,

    /// Also install the sample application package
    #[arg(long)]
    include_sample: bool,

    /// Also install the legacy-compatibility package
    #[arg(long)]
    include_legacy_compat: bool,

    /// Override the archive host base URL
    #[arg(long)]
    source_url: Option<String>,

    /// Only report errors and the final result
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let config = InstallConfig::new(&args.root, args.product_version)
        .with_sample(args.include_sample)
        .with_legacy_compat(args.include_legacy_compat);

    let mut fetch_config = FetchConfig::default();
    if let Some(source_url) = &args.source_url {
        fetch_config = fetch_config.with_base_url(source_url.clone());
    }

    let reporter = ConsoleReporter::new(!args.quiet);
    let mut pipeline = InstallPipeline::new(config)
        .with_fetch_config(fetch_config)
        .with_callback(reporter.into_callback());

    let summary = pipeline
        .run()
        .await
        .with_context(|| format!("install into '{}' failed", args.root.display()))?;

    println!(
        "installed {} packages under {}",
        summary.installed.len(),
        args.root.display()
    );
    Ok(())
}
