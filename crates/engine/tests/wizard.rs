mod common;

use std::sync::{Arc, Mutex};

use common::{Answer, ScriptedPresenter};
use gluetty_engine::{
    CandidateSource, FieldBinding, FieldDeclaration, PickPresenter, SelectionStep, StateView, Wizard, WizardError, WizardOutcome,
    WizardPhase, WizardState,
};
use gluetty_types::Candidate;
use serde_json::json;

/// Step offering `options`, each labelled and valued by its own text.
fn choose(title: &str, options: Vec<String>, presenter: &Arc<ScriptedPresenter>) -> FieldBinding {
    let candidates = options.into_iter().map(|option| Candidate::new(option.clone(), option)).collect();
    let presenter: Arc<dyn PickPresenter> = presenter.clone();
    FieldBinding::prompt(SelectionStep::new(title, CandidateSource::from_items(candidates), presenter))
}

/// Fields A, B, C(, D) where each field's options are derived from the previous answer.
fn chained(presenter: &Arc<ScriptedPresenter>, names: &[&'static str], seen: Arc<Mutex<Vec<String>>>) -> Wizard {
    let mut builder = Wizard::builder();
    for (index, name) in names.iter().copied().enumerate() {
        let presenter = presenter.clone();
        let seen = seen.clone();
        let previous = index.checked_sub(1).map(|previous| names[previous]);
        let declaration = FieldDeclaration::new(name, move |view: &StateView<'_>| {
            let options = match previous {
                None => vec![format!("{name}1"), format!("{name}2")],
                Some(dependency) => {
                    let upstream: String = view.require(dependency)?;
                    seen.lock().expect("seen lock").push(format!("{name}<-{upstream}"));
                    vec![format!("{upstream}/{name}1"), format!("{upstream}/{name}2")]
                }
            };
            Ok(choose(name, options, &presenter))
        });
        builder = builder.field(match previous {
            Some(dependency) => declaration.depends_on([dependency]),
            None => declaration,
        });
    }
    builder.build().expect("valid declarations")
}

#[tokio::test]
async fn resolves_dependent_fields_in_order() {
    let presenter = ScriptedPresenter::new([Answer::Pick("a1"), Answer::Pick("a1/b2"), Answer::Pick("a1/b2/c1")]);
    let wizard = chained(&presenter, &["a", "b", "c"], Arc::default());

    let outcome = wizard.run(WizardState::new()).await.expect("run");

    let state = outcome.into_state().expect("complete");
    assert_eq!(state.get("a"), Some(&json!("a1")));
    assert_eq!(state.get("b"), Some(&json!("a1/b2")));
    assert_eq!(state.get("c"), Some(&json!("a1/b2/c1")));
    assert_eq!(presenter.titles(), vec!["a", "b", "c"]);
}

#[tokio::test]
async fn cancelling_a_middle_step_cancels_the_wizard() {
    let presenter = ScriptedPresenter::new([Answer::Pick("a1"), Answer::Dismiss]);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let wizard = chained(&presenter, &["a", "b", "c"], seen.clone());

    let outcome = wizard.run(WizardState::new()).await.expect("run");

    assert_eq!(outcome, WizardOutcome::Cancelled);
    assert_eq!(*seen.lock().expect("seen lock"), vec!["b<-a1"]);
    assert_eq!(presenter.titles(), vec!["a", "b"]);
}

#[tokio::test]
async fn going_back_clears_every_later_answer_before_rebinding() {
    let presenter = ScriptedPresenter::new([
        Answer::Pick("a1"),
        Answer::Pick("a1/b1"),
        Answer::Pick("a1/b1/c1"),
        Answer::Back,
        Answer::Back,
        Answer::Pick("a1/b2"),
        Answer::Pick("a1/b2/c2"),
        Answer::Pick("a1/b2/c2/d1"),
    ]);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let wizard = chained(&presenter, &["a", "b", "c", "d"], seen.clone());

    let mut awaiting = Vec::new();
    let outcome = wizard
        .run_observed(WizardState::new(), |phase, state| {
            if let WizardPhase::AwaitingInput(index) = phase {
                awaiting.push((index, state.fields().map(str::to_string).collect::<Vec<_>>()));
            }
        })
        .await
        .expect("run");

    let state = outcome.into_state().expect("complete");
    assert_eq!(state.get("b"), Some(&json!("a1/b2")));
    assert_eq!(state.get("c"), Some(&json!("a1/b2/c2")));
    assert_eq!(state.get("d"), Some(&json!("a1/b2/c2/d1")));

    // Back from d re-enters c with c and d cleared; back again re-enters b with only a left.
    assert_eq!(awaiting[4], (2, vec!["a".to_string(), "b".to_string()]));
    assert_eq!(awaiting[5], (1, vec!["a".to_string()]));
    assert_eq!(
        *seen.lock().expect("seen lock"),
        vec!["b<-a1", "c<-a1/b1", "d<-a1/b1/c1", "c<-a1/b1", "b<-a1", "c<-a1/b2", "d<-a1/b2/c2"]
    );
}

#[tokio::test]
async fn going_back_rebinds_a_field_that_was_skipped() {
    let presenter = ScriptedPresenter::new([
        Answer::Pick("a1"),
        Answer::Back,
        Answer::Pick("a2"),
        Answer::Pick("b1"),
        Answer::Pick("c1"),
    ]);
    let wizard = {
        let (for_a, for_b, for_c) = (presenter.clone(), presenter.clone(), presenter.clone());
        Wizard::builder()
            .field(FieldDeclaration::new("a", move |_| Ok(choose("a", vec!["a1".into(), "a2".into()], &for_a))))
            .field(
                FieldDeclaration::new("b", move |view: &StateView<'_>| {
                    let a: String = view.require("a")?;
                    Ok(if a == "a2" {
                        choose("b", vec!["b1".into(), "b2".into()], &for_b)
                    } else {
                        FieldBinding::Skip
                    })
                })
                .depends_on(["a"]),
            )
            .field(
                FieldDeclaration::new("c", move |view: &StateView<'_>| {
                    let b: Option<String> = view.get("b")?;
                    let detail = b.unwrap_or_else(|| "none".into());
                    Ok(choose("c", vec!["c1".into(), format!("c2 ({detail})")], &for_c))
                })
                .depends_on(["b"]),
            )
            .build()
            .expect("valid declarations")
    };

    let outcome = wizard.run(WizardState::new()).await.expect("run");

    let state = outcome.into_state().expect("complete");
    assert_eq!(presenter.titles(), vec!["a", "c", "a", "b", "c"]);
    assert_eq!(state.get("a"), Some(&json!("a2")));
    assert_eq!(state.get("b"), Some(&json!("b1")));
    assert_eq!(state.get("c"), Some(&json!("c1")));
    // Back from c skips over the unprompted b and lands on a.
    assert!(!presenter.requests()[2].can_go_back);
}

#[tokio::test]
async fn back_context_is_only_offered_after_a_prompted_field() {
    let presenter = ScriptedPresenter::new([Answer::Pick("a1"), Answer::Pick("a1/b1")]);
    let wizard = chained(&presenter, &["a", "b"], Arc::default());

    wizard.run(WizardState::new()).await.expect("run");

    let requests = presenter.requests();
    assert!(!requests[0].can_go_back);
    assert!(requests[1].can_go_back);
    assert_eq!((requests[1].step, requests[1].total_steps), (2, 2));
}

#[tokio::test]
async fn reading_a_skipped_dependency_fails_fast() {
    let presenter = ScriptedPresenter::new(Vec::new());
    let wizard = Wizard::builder()
        .field(FieldDeclaration::new("a", |_| Ok(FieldBinding::Skip)))
        .field(FieldDeclaration::new("b", |view| {
            let _: String = view.require("a")?;
            Ok(FieldBinding::Skip)
        })
        .depends_on(["a"]))
        .build()
        .expect("valid declarations");

    let error = wizard.run(WizardState::new()).await.unwrap_err();

    assert!(matches!(
        error,
        WizardError::DependencyViolation { ref field, ref dependency } if field == "b" && dependency == "a"
    ));
    assert!(error.is_declaration_bug());
    assert!(presenter.requests().is_empty());
}

#[tokio::test]
async fn out_of_order_declarations_are_rejected_at_build_time() {
    let error = Wizard::builder()
        .field(FieldDeclaration::new("b", |_| Ok(FieldBinding::Skip)).depends_on(["a"]))
        .field(FieldDeclaration::new("a", |_| Ok(FieldBinding::Skip)))
        .build()
        .unwrap_err();

    assert!(matches!(error, WizardError::DependencyOrder { ref field, .. } if field == "b"));
}

#[tokio::test]
async fn presenter_failures_surface_as_prompt_errors() {
    let presenter = ScriptedPresenter::new([Answer::Pick("a1"), Answer::Fail]);
    let wizard = chained(&presenter, &["a", "b"], Arc::default());

    let error = wizard.run(WizardState::new()).await.unwrap_err();

    assert!(matches!(error, WizardError::Prompt { ref field, .. } if field == "b"));
    assert!(!error.is_declaration_bug());
}
