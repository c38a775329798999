use std::fs;
use std::path::Path;

use supplygraph_core::runtime::ingest_path;
use supplygraph_core::{IngestConfig, IngestError, ScopeId};
use supplygraph_parser::TableMode;

fn fixture_path(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../supplygraph-parser/tests/data")
        .join(name)
}

#[tokio::test]
async fn ingest_path_runs_on_the_blocking_pool() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = IngestConfig::default().with_output_root(dir.path());
    let scope = ScopeId::new("tenant-7").expect("scope");

    let result = ingest_path(fixture_path("wide_matrix.csv"), scope, config)
        .await
        .expect("ingest failed");

    assert_eq!(result.graph.mode, TableMode::WideMatrix);
    assert!(result.artifacts.nodes.starts_with(dir.path().join("tenant-7")));
    let demand = fs::read_to_string(&result.artifacts.demand).expect("demand");
    assert!(demand.starts_with("node_id,type,date,demand\n"));
}

#[tokio::test]
async fn concurrent_jobs_do_not_share_state() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = IngestConfig::default().with_output_root(dir.path());

    let first = tokio::spawn(ingest_path(
        fixture_path("wide_matrix.csv"),
        ScopeId::new("alpha").expect("scope"),
        config.clone(),
    ));
    let second = tokio::spawn(ingest_path(
        fixture_path("mixed_routes.csv"),
        ScopeId::new("beta").expect("scope"),
        config,
    ));

    let first = first.await.expect("join").expect("alpha ingest");
    let second = second.await.expect("join").expect("beta ingest");

    assert_eq!(first.summary.node_count, 3);
    assert_eq!(second.summary.node_count, 4);
    assert!(first.graph.nodes.iter().all(|node| node.scope_id.as_str() == "alpha"));
    assert!(second.graph.nodes.iter().all(|node| node.scope_id.as_str() == "beta"));
}

#[tokio::test]
async fn missing_input_surfaces_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = IngestConfig::default().with_output_root(dir.path());
    let scope = ScopeId::new("acme").expect("scope");

    match ingest_path(dir.path().join("absent.csv"), scope, config).await {
        Err(IngestError::Io(_)) => {}
        other => panic!("expected Io error, got {other:?}"),
    }
}
