//! Version-bump flow
//!
//! Resolves the latest supported upstream release and, if the chart is
//! behind, bumps the chart version to the next minor and points the
//! appVersion and image tags at the new release.

use crate::chart::ChartVersions;
use crate::config::RunContext;
use crate::document::Document;
use crate::version::{catalog, semver};
use anyhow::Context;
use tracing::info;

pub async fn run(ctx: &RunContext) -> anyhow::Result<()> {
    let current =
        ChartVersions::load(&ctx.chart_path).context("failed to get current chart versions")?;
    info!(
        "Current chart version: {}, appVersion: {}",
        current.version, current.app_version
    );

    let latest = catalog::latest_supported(&ctx.client, &ctx.versions_url)
        .await
        .context("failed to get latest supported versions")?;
    info!(
        "Latest supported Contour: {}, Envoy: {}",
        latest.version, latest.envoy_version
    );

    if latest.version == current.app_version {
        info!("Contour version {} is already up to date", latest.version);
        return Ok(());
    }

    let next_chart_version =
        semver::next_minor(&current.version).context("failed to get next minor version")?;

    // Stage every edit in memory; nothing is written until all four succeed.
    let mut chart = Document::load(&ctx.chart_path)
        .with_context(|| format!("failed to load {:?}", ctx.chart_path))?;
    let mut values = Document::load(&ctx.values_path)
        .with_context(|| format!("failed to load {:?}", ctx.values_path))?;

    chart
        .set("version", &next_chart_version)
        .with_context(|| format!("failed to update version in {:?}", ctx.chart_path))?;
    chart
        .set("appVersion", &latest.version)
        .with_context(|| format!("failed to update appVersion in {:?}", ctx.chart_path))?;

    let contour_tag = format!("v{}", latest.version);
    values
        .set("contour.image.tag", &contour_tag)
        .with_context(|| format!("failed to update contour.image.tag in {:?}", ctx.values_path))?;

    let envoy_tag = format!("v{}", latest.envoy_version);
    values
        .set("envoy.image.tag", &envoy_tag)
        .with_context(|| format!("failed to update envoy.image.tag in {:?}", ctx.values_path))?;

    chart.save(&ctx.chart_path)?;
    info!(
        "Updated chart version to {} in {:?}",
        next_chart_version, ctx.chart_path
    );
    info!(
        "Updated chart appVersion to {} in {:?}",
        latest.version, ctx.chart_path
    );

    values.save(&ctx.values_path)?;
    info!(
        "Updated Contour image tag to {} in {:?}",
        contour_tag, ctx.values_path
    );
    info!(
        "Updated Envoy image tag to {} in {:?}",
        envoy_tag, ctx.values_path
    );

    info!("Successfully bumped versions.");
    Ok(())
}
