mod common;

use std::sync::Arc;

use common::{CountingStatus, FakeGlue};
use gluetty_engine::{ExplorerChild, ExplorerError, JobsNode, ReconcileError, explorer::NO_JOBS_FOUND};

fn node_with(glue: &Arc<FakeGlue>) -> JobsNode {
    JobsNode::new(glue.clone(), CountingStatus::new())
}

#[tokio::test]
async fn refresh_keeps_identity_of_surviving_jobs() {
    let glue = Arc::new(FakeGlue::in_region("eu-west-1"));
    glue.set_jobs(vec![vec!["ingest", "transform"], vec!["publish"]]);
    let node = node_with(&glue);

    node.update_children().await.expect("first refresh");
    let ingest = node.child("ingest").await.expect("ingest");
    let publish = node.child("publish").await.expect("publish");

    glue.set_jobs(vec![vec!["publish", "ingest", "archive"]]);
    let report = node.update_children().await.expect("second refresh");

    assert_eq!(node.child("ingest").await.expect("ingest").id(), ingest.id());
    assert_eq!(node.child("publish").await.expect("publish").id(), publish.id());
    assert_eq!(report.created, vec!["archive".to_string()]);
    assert_eq!(report.removed, vec!["transform".to_string()]);

    let names: Vec<_> = node.snapshot().await.iter().map(|job| job.label().to_string()).collect();
    assert_eq!(names, vec!["publish", "ingest", "archive"]);
    assert!(node.snapshot().await.iter().all(|job| job.region() == "eu-west-1"));
}

#[tokio::test]
async fn refreshing_an_unchanged_listing_creates_and_removes_nothing() {
    let glue = Arc::new(FakeGlue::in_region("us-east-1"));
    glue.set_jobs(vec![vec!["a", "b"]]);
    let node = node_with(&glue);

    let first = node.update_children().await.expect("first refresh");
    let second = node.update_children().await.expect("second refresh");

    assert_eq!(first.created.len(), 2);
    assert!(second.is_structurally_unchanged());
    assert_eq!(second.updated, vec!["a".to_string(), "b".to_string()]);
}

#[tokio::test]
async fn duplicate_job_names_leave_children_untouched() {
    let glue = Arc::new(FakeGlue::in_region("us-east-1"));
    glue.set_jobs(vec![vec!["a"]]);
    let node = node_with(&glue);
    node.update_children().await.expect("first refresh");
    let before = node.snapshot().await;

    glue.set_jobs(vec![vec!["a", "b"], vec!["b"]]);
    let error = node.update_children().await.unwrap_err();

    assert!(matches!(
        error,
        ExplorerError::Reconcile(ReconcileError::DuplicateKey { ref key }) if key == "b"
    ));
    assert_eq!(node.snapshot().await, before);
}

#[tokio::test]
async fn empty_listing_shows_placeholder() {
    let glue = Arc::new(FakeGlue::in_region("us-east-1"));
    let node = node_with(&glue);

    let children = node.children().await;

    assert_eq!(
        children,
        vec![ExplorerChild::Placeholder {
            label: NO_JOBS_FOUND.to_string()
        }]
    );
}

#[tokio::test]
async fn failed_listing_shows_error_child() {
    let glue = Arc::new(FakeGlue {
        fail_jobs: true,
        ..FakeGlue::in_region("us-east-1")
    });
    let status = CountingStatus::new();
    let node = JobsNode::new(glue.clone(), status.clone());

    let children = node.children().await;

    match children.as_slice() {
        [ExplorerChild::Error { message }] => assert!(message.contains("AccessDeniedException"), "{message}"),
        other => panic!("unexpected children: {other:?}"),
    }
    assert_eq!((status.shown(), status.cleared()), (1, 1));
}
