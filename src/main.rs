use chart_sync::commands;
use chart_sync::config::{DEFAULT_SOURCE_URL, DEFAULT_VERSIONS_URL, RunContext};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "chart-sync")]
#[command(version, about = "Release automation for the Contour Helm chart")]
struct Cli {
    /// Chart root directory containing Chart.yaml and values.yaml
    #[arg(long, default_value = "./charts/contour")]
    chart_dir: PathBuf,

    /// URL of the upstream release catalog
    #[arg(long, default_value = DEFAULT_VERSIONS_URL)]
    versions_url: String,

    /// Source tarball URL template; `{version}` is replaced with the release version
    #[arg(long, default_value = DEFAULT_SOURCE_URL)]
    source_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Bump chart version and image tags to the latest supported release
    BumpVersions,
    /// Refresh bundled CRDs from the release the chart currently declares
    SyncCrds,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ctx = RunContext::new(&cli.chart_dir, cli.versions_url, cli.source_url)?;

    // Both flows are sequential; a current-thread runtime is enough.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match cli.command {
        Command::BumpVersions => runtime.block_on(commands::bump_versions::run(&ctx)),
        Command::SyncCrds => runtime.block_on(commands::sync_crds::run(&ctx)),
    }
}
