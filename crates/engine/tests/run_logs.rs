mod common;

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use common::{Answer, CountingStatus, FakeGlue, ScriptedPresenter};
use gluetty_engine::{AuxAction, GlueService, GlueServiceFactory, RunLogStreamSelection, RunLogsContext, RunLogsWizard, WizardError};
use gluetty_types::{CandidateIcon, JobRun, JobRunState, LogStream};

fn run(id: &str, state: JobRunState) -> JobRun {
    JobRun {
        id: Some(id.to_string()),
        job_name: Some("nightly".to_string()),
        job_run_state: Some(state),
        started_on: Some(1_700_000_000.0),
        ..JobRun::default()
    }
}

fn stream(name: &str, last_event: Option<i64>) -> LogStream {
    LogStream {
        log_stream_name: Some(name.to_string()),
        last_event_timestamp: last_event,
        ..LogStream::default()
    }
}

fn fake_glue() -> Arc<FakeGlue> {
    let mut glue = FakeGlue::in_region("eu-west-1");
    glue.job_runs.insert(
        "nightly".into(),
        vec![run("jr_2", JobRunState::Failed), run("jr_1", JobRunState::Succeeded), run("jr_0", JobRunState::Timeout)],
    );
    glue.log_streams.insert(
        "/aws-glue/jobs/output".into(),
        vec![
            stream("jr_1", Some(1_700_000_100_000)),
            stream("jr_1_driver", Some(1_700_000_900_000)),
            stream("jr_1_empty", None),
            stream("jr_2", Some(1_700_000_500_000)),
        ],
    );
    Arc::new(glue)
}

struct Harness {
    glue: Arc<FakeGlue>,
    presenter: Arc<ScriptedPresenter>,
    status: Arc<CountingStatus>,
    regions_requested: Arc<std::sync::Mutex<Vec<String>>>,
    wizard: RunLogsWizard,
}

fn harness(answers: Vec<Answer>, actions: Vec<AuxAction>) -> Harness {
    let glue = fake_glue();
    let presenter = ScriptedPresenter::new(answers);
    let status = CountingStatus::new();
    let regions_requested = Arc::new(std::sync::Mutex::new(Vec::new()));

    let services: Arc<dyn GlueServiceFactory> = {
        let glue = glue.clone();
        let regions_requested = regions_requested.clone();
        Arc::new(move |region: &str| -> anyhow::Result<Arc<dyn GlueService>> {
            regions_requested.lock().expect("regions lock").push(region.to_string());
            Ok(glue.clone())
        })
    };
    let context = RunLogsContext {
        services,
        presenter: presenter.clone(),
        status: status.clone(),
        actions,
    };
    let wizard = RunLogsWizard::new("nightly", context).expect("wizard");

    Harness {
        glue,
        presenter,
        status,
        regions_requested,
        wizard,
    }
}

#[tokio::test]
async fn selects_a_log_stream_for_a_seeded_region() {
    let harness = harness(
        vec![Answer::Pick("jr_1"), Answer::Pick("Output logs"), Answer::Pick("jr_1_driver")],
        Vec::new(),
    );

    let selection = harness.wizard.run(Some("eu-west-1")).await.expect("run").expect("selection");

    assert_eq!(
        selection,
        RunLogStreamSelection {
            region: "eu-west-1".into(),
            job_name: "nightly".into(),
            job_run_id: "jr_1".into(),
            log_group_name: "/aws-glue/jobs/output".into(),
            log_stream_name: "jr_1_driver".into(),
        }
    );
    assert_eq!(
        harness.presenter.titles(),
        vec!["nightly: Select a Job Run", "nightly: Select Log Group", "nightly: Select Log Stream"]
    );
    assert_eq!(
        harness.glue.calls(),
        vec!["GetJobRuns(nightly)", "DescribeLogStreams(/aws-glue/jobs/output, jr_1)"]
    );
    assert_eq!(*harness.regions_requested.lock().expect("regions lock"), vec!["eu-west-1", "eu-west-1"]);
    assert_eq!((harness.status.shown(), harness.status.cleared()), (2, 2));
}

#[tokio::test]
async fn job_runs_carry_state_icons_and_streams_sort_by_latest_event() {
    let harness = harness(
        vec![Answer::Pick("jr_1"), Answer::Pick("Output logs"), Answer::Pick("jr_1")],
        Vec::new(),
    );

    harness.wizard.run(Some("eu-west-1")).await.expect("run").expect("selection");

    let requests = harness.presenter.requests();
    let run_icons: Vec<_> = requests[0].items.iter().map(|item| (item.label.as_str(), item.icon)).collect();
    assert_eq!(
        run_icons,
        vec![
            ("jr_2", Some(CandidateIcon::Error)),
            ("jr_1", Some(CandidateIcon::Pass)),
            ("jr_0", Some(CandidateIcon::Folder)),
        ]
    );
    assert!(requests[0].items.iter().all(|item| item.detail.is_some()));

    let groups: Vec<_> = requests[1].items.iter().map(|item| item.label.as_str()).collect();
    assert_eq!(groups, vec!["All logs", "Output logs", "Error logs"]);

    let streams: Vec<_> = requests[2].items.iter().map(|item| item.label.as_str()).collect();
    assert_eq!(streams, vec!["jr_1_driver", "jr_1", "jr_1_empty"]);
    assert_eq!(requests[2].items[2].detail.as_deref(), Some("[No Log Events found]"));
}

#[tokio::test]
async fn prompts_for_region_when_not_seeded() {
    let harness = harness(
        vec![
            Answer::Pick("Europe (Ireland)"),
            Answer::Pick("jr_2"),
            Answer::Pick("Output logs"),
            Answer::Pick("jr_2"),
        ],
        Vec::new(),
    );

    let selection = harness.wizard.run(None).await.expect("run").expect("selection");

    assert_eq!(selection.region, "eu-west-1");
    assert_eq!(harness.presenter.titles()[0], "Select a region");
    assert!(!harness.presenter.requests()[0].can_go_back);
}

#[tokio::test]
async fn dismissing_any_step_returns_no_selection() {
    let harness = harness(vec![Answer::Pick("jr_1"), Answer::Dismiss], Vec::new());

    let selection = harness.wizard.run(Some("eu-west-1")).await.expect("run");

    assert!(selection.is_none());
    assert_eq!(harness.glue.calls(), vec!["GetJobRuns(nightly)"]);
}

#[tokio::test]
async fn back_from_log_stream_relists_for_the_new_run() {
    let harness = harness(
        vec![
            Answer::Pick("jr_1"),
            Answer::Pick("Output logs"),
            Answer::Back,
            Answer::Back,
            Answer::Pick("jr_2"),
            Answer::Pick("Output logs"),
            Answer::Pick("jr_2"),
        ],
        Vec::new(),
    );

    let selection = harness.wizard.run(Some("eu-west-1")).await.expect("run").expect("selection");

    assert_eq!(selection.job_run_id, "jr_2");
    assert_eq!(selection.log_stream_name, "jr_2");
    assert_eq!(
        harness.glue.calls(),
        vec![
            "GetJobRuns(nightly)",
            "DescribeLogStreams(/aws-glue/jobs/output, jr_1)",
            "GetJobRuns(nightly)",
            "DescribeLogStreams(/aws-glue/jobs/output, jr_2)",
        ]
    );
}

#[tokio::test]
async fn auxiliary_actions_are_offered_on_every_step() {
    let invoked = Arc::new(AtomicUsize::new(0));
    let counter = invoked.clone();
    let copy = AuxAction::new("Copy job name", move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });
    let harness = harness(
        vec![
            Answer::Action(0),
            Answer::Pick("jr_1"),
            Answer::Pick("All logs"),
            Answer::Dismiss,
        ],
        vec![copy],
    );

    let selection = harness.wizard.run(Some("eu-west-1")).await.expect("run");

    assert!(selection.is_none());
    assert_eq!(invoked.load(Ordering::SeqCst), 1);
    assert!(harness.presenter.requests().iter().all(|request| request.actions == vec!["Copy job name".to_string()]));
}

#[tokio::test]
async fn presenter_failure_is_an_error_not_a_cancellation() {
    let harness = harness(vec![Answer::Fail], Vec::new());

    let error = harness.wizard.run(Some("eu-west-1")).await.unwrap_err();

    assert!(matches!(error, WizardError::Prompt { ref field, .. } if field == "job_run_id"));
}
