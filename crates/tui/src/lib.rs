//! Terminal front end for gluetty's selection steps.
//!
//! [`TerminalPresenter`] draws each [`PickRequest`](gluetty_engine::PickRequest)
//! as a full-screen, filterable list and reports the user's choice back to the
//! engine.

pub mod clipboard;
pub mod picker;
pub mod presenter;
pub mod theme;
pub mod view;

pub use clipboard::clipboard_action;
pub use picker::{KeyOutcome, PickerState};
pub use presenter::TerminalPresenter;
pub use theme::{DraculaTheme, Theme};
