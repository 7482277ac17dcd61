//! # Gluetty Engine
//!
//! Interaction patterns shared by every gluetty front end:
//!
//! - **`pagination`**: [`PagedSequence`] turns cursor-paginated listing calls into lazy streams
//!   that hold a loading message while pages are outstanding.
//! - **`reconcile`**: [`reconcile`] refreshes a keyed collection in place without recreating
//!   items whose key survived.
//! - **`wizard`**: [`Wizard`] resolves an ordered list of dependent fields, with skip, back
//!   navigation, and cancellation.
//! - **`selection`**: [`SelectionStep`] adapts a candidate listing and a [`PickPresenter`] into a
//!   wizard step.
//!
//! On top of those sit the [`service`] seam to the remote API, the [`explorer`] job nodes, and the
//! [`run_logs`] wizard.
//!
//! ## Usage
//!
//! ```rust
//! use gluetty_engine::{FieldBinding, FieldDeclaration, Wizard, WizardOutcome, WizardState};
//!
//! let wizard = Wizard::builder()
//!     .field(FieldDeclaration::new("region", |_| Ok(FieldBinding::Skip)))
//!     .field(FieldDeclaration::new("job", |view| {
//!         let region: Option<String> = view.get("region")?;
//!         assert!(region.is_some());
//!         Ok(FieldBinding::Skip)
//!     }).depends_on(["region"]))
//!     .build()?;
//!
//! let runtime = tokio::runtime::Runtime::new()?;
//! let initial = WizardState::new().with("region", "eu-west-1")?;
//! let outcome = runtime.block_on(wizard.run(initial))?;
//! assert!(matches!(outcome, WizardOutcome::Complete(_)));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod explorer;
pub mod pagination;
pub mod reconcile;
pub mod run_logs;
pub mod selection;
pub mod service;
pub mod status;
pub mod wizard;

pub use error::{ExplorerError, FetchError, ReconcileError, WizardError};
pub use explorer::{ExplorerChild, JobNode, JobsNode, NodeId};
pub use pagination::PagedSequence;
pub use reconcile::{ReconcileReport, index_by_key, reconcile};
pub use run_logs::{RunLogStreamSelection, RunLogsContext, RunLogsWizard};
pub use selection::{AuxAction, CandidateSource, PickItem, PickPresenter, PickRequest, PickResponse, SelectionStep, SortOrder};
pub use service::{ClientFactory, GlueService, GlueServiceFactory, Listing, list_job_runs, list_jobs, list_log_streams};
pub use status::{StatusBar, StatusGuard, StatusIndicator, StatusToken, TracingStatus};
pub use wizard::{
    FieldBinding, FieldDeclaration, PromptContext, PromptResult, Prompter, StateView, Wizard, WizardBuilder, WizardOutcome, WizardPhase,
    WizardState,
};
