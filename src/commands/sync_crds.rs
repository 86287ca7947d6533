//! CRD synchronization flow
//!
//! Downloads the source tarball for the release the chart currently declares
//! and regenerates the bundled CRD templates, each wrapped in its Helm
//! conditional guard.

use crate::archive::{self, TarGzView};
use crate::chart::ChartVersions;
use crate::config::{self, RunContext};
use anyhow::Context;
use tracing::info;

pub async fn run(ctx: &RunContext) -> anyhow::Result<()> {
    let current =
        ChartVersions::load(&ctx.chart_path).context("failed to get current chart appVersion")?;
    info!("Current chart appVersion: {}", current.app_version);

    // Removed on every exit path when dropped.
    let tmp_dir = tempfile::tempdir().context("failed to create temp dir")?;
    let tarball_path = tmp_dir.path().join("contour.tar.gz");

    let url = ctx.source_url_for(&current.app_version);
    info!(
        "Downloading Contour source tarball for version {} to {:?}",
        current.app_version, tarball_path
    );
    archive::download(&ctx.client, &url, &tarball_path)
        .await
        .context("failed to download release")?;

    let view = TarGzView::new(&tarball_path);
    let member_root = format!("contour-{}", current.app_version);

    let contour_dest = ctx.crds_dir.join("contour-crds.yaml");
    archive::sync_member(
        &view,
        &format!("{member_root}/{}", config::CONTOUR_CRD_MEMBER),
        &contour_dest,
        config::CONTOUR_CRD_GUARD,
    )
    .context("failed to copy Contour CRDs")?;
    info!("Wrote Contour CRDs to {:?}", contour_dest);

    let gateway_dest = ctx.crds_dir.join("gateway-api-crds.yaml");
    archive::sync_member(
        &view,
        &format!("{member_root}/{}", config::GATEWAY_CRD_MEMBER),
        &gateway_dest,
        config::GATEWAY_CRD_GUARD,
    )
    .context("failed to copy Gateway API CRDs")?;
    info!("Wrote Gateway API CRDs to {:?}", gateway_dest);

    info!("Successfully synchronized CRDs.");
    Ok(())
}
