use chart_sync::commands::sync_crds;
use chart_sync::config::RunContext;
use flate2::Compression;
use flate2::write::GzEncoder;
use mockito::Server;
use std::path::Path;
use tar::{Builder, Header};
use tempfile::TempDir;

const CONTOUR_CRDS: &str = "apiVersion: apiextensions.k8s.io/v1\nkind: CustomResourceDefinition\nmetadata:\n  name: httpproxies.projectcontour.io\n";
const GATEWAY_CRDS: &str = "apiVersion: apiextensions.k8s.io/v1\nkind: CustomResourceDefinition\nmetadata:\n  name: gateways.gateway.networking.k8s.io\n";

/// Builds a gzipped source tarball with the version-qualified root directory
/// the upstream release archives use.
fn build_source_tarball(version: &str, members: &[(&str, &str)]) -> Vec<u8> {
    let mut bytes = Vec::new();
    {
        let encoder = GzEncoder::new(&mut bytes, Compression::default());
        let mut builder = Builder::new(encoder);
        for (path, content) in members {
            let mut header = Header::new_gnu();
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(
                    &mut header,
                    format!("contour-{version}/{path}"),
                    content.as_bytes(),
                )
                .unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap();
    }
    bytes
}

fn write_chart(dir: &Path, app_version: &str) {
    std::fs::write(
        dir.join("Chart.yaml"),
        format!("apiVersion: v2\nname: contour\nversion: 1.2.3\nappVersion: {app_version}\n"),
    )
    .unwrap();
    std::fs::create_dir_all(dir.join("templates").join("crds")).unwrap();
}

#[tokio::test]
async fn sync_writes_both_guarded_crd_files() {
    let chart_dir = TempDir::new().unwrap();
    write_chart(chart_dir.path(), "1.30.0");

    let tarball = build_source_tarball(
        "1.30.0",
        &[
            ("examples/contour/01-crds.yaml", CONTOUR_CRDS),
            ("examples/gateway/00-crds.yaml", GATEWAY_CRDS),
        ],
    );

    let mut server = Server::new_async().await;
    server
        .mock("GET", "/archive/v1.30.0.tar.gz")
        .with_status(200)
        .with_body(tarball)
        .create_async()
        .await;

    let ctx = RunContext::new(
        chart_dir.path(),
        "http://unused.invalid/versions.yaml".to_string(),
        format!("{}/archive/v{{version}}.tar.gz", server.url()),
    )
    .unwrap();

    sync_crds::run(&ctx).await.unwrap();

    let contour = std::fs::read_to_string(ctx.crds_dir.join("contour-crds.yaml")).unwrap();
    assert_eq!(
        contour,
        format!(
            "# Conditional: .Values.contour.manageCRDs\n{{{{- if .Values.contour.manageCRDs }}}}\n{CONTOUR_CRDS}{{{{- end }}}}\n"
        )
    );

    let gateway = std::fs::read_to_string(ctx.crds_dir.join("gateway-api-crds.yaml")).unwrap();
    assert_eq!(
        gateway,
        format!(
            "# Conditional: .Values.gatewayAPI.manageCRDs\n{{{{- if .Values.gatewayAPI.manageCRDs }}}}\n{GATEWAY_CRDS}{{{{- end }}}}\n"
        )
    );
}

#[tokio::test]
async fn sync_fails_when_a_crd_member_is_missing() {
    let chart_dir = TempDir::new().unwrap();
    write_chart(chart_dir.path(), "1.30.0");

    // Gateway API CRDs are absent from this tarball.
    let tarball = build_source_tarball(
        "1.30.0",
        &[("examples/contour/01-crds.yaml", CONTOUR_CRDS)],
    );

    let mut server = Server::new_async().await;
    server
        .mock("GET", "/archive/v1.30.0.tar.gz")
        .with_status(200)
        .with_body(tarball)
        .create_async()
        .await;

    let ctx = RunContext::new(
        chart_dir.path(),
        "http://unused.invalid/versions.yaml".to_string(),
        format!("{}/archive/v{{version}}.tar.gz", server.url()),
    )
    .unwrap();

    let result = sync_crds::run(&ctx).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn sync_fails_when_the_release_tarball_does_not_exist() {
    let chart_dir = TempDir::new().unwrap();
    write_chart(chart_dir.path(), "9.9.9");

    let mut server = Server::new_async().await;
    server
        .mock("GET", "/archive/v9.9.9.tar.gz")
        .with_status(404)
        .create_async()
        .await;

    let ctx = RunContext::new(
        chart_dir.path(),
        "http://unused.invalid/versions.yaml".to_string(),
        format!("{}/archive/v{{version}}.tar.gz", server.url()),
    )
    .unwrap();

    let result = sync_crds::run(&ctx).await;
    assert!(result.is_err());
    assert!(!ctx.crds_dir.join("contour-crds.yaml").exists());
}

#[tokio::test]
async fn sync_replaces_previously_generated_content() {
    let chart_dir = TempDir::new().unwrap();
    write_chart(chart_dir.path(), "1.30.0");
    std::fs::write(
        chart_dir.path().join("templates/crds/contour-crds.yaml"),
        "stale content\n",
    )
    .unwrap();

    let tarball = build_source_tarball(
        "1.30.0",
        &[
            ("examples/contour/01-crds.yaml", CONTOUR_CRDS),
            ("examples/gateway/00-crds.yaml", GATEWAY_CRDS),
        ],
    );

    let mut server = Server::new_async().await;
    server
        .mock("GET", "/archive/v1.30.0.tar.gz")
        .with_status(200)
        .with_body(tarball)
        .create_async()
        .await;

    let ctx = RunContext::new(
        chart_dir.path(),
        "http://unused.invalid/versions.yaml".to_string(),
        format!("{}/archive/v{{version}}.tar.gz", server.url()),
    )
    .unwrap();

    sync_crds::run(&ctx).await.unwrap();

    let contour = std::fs::read_to_string(ctx.crds_dir.join("contour-crds.yaml")).unwrap();
    assert!(!contour.contains("stale content"));
    assert!(contour.contains("httpproxies.projectcontour.io"));
}
