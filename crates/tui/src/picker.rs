//! Interaction state of one quick-pick screen.
//!
//! [`PickerState`] owns the request being shown, the filter text, and the
//! cursor. It turns key presses into either more state or a final
//! [`PickResponse`], and knows nothing about drawing.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use gluetty_engine::{PickItem, PickRequest, PickResponse};
use gluetty_util::fuzzy_score;

/// Only F1..F9 are bound to auxiliary actions.
pub const MAX_ACTION_KEYS: usize = 9;

/// Detail matches rank below label matches.
const DETAIL_MATCH_PENALTY: i64 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Respond(PickResponse),
}

#[derive(Debug)]
pub struct PickerState {
    request: PickRequest,
    filter: String,
    /// Indices into `request.items`, best match first.
    visible: Vec<usize>,
    cursor: usize,
}

impl PickerState {
    pub fn new(request: PickRequest) -> Self {
        let visible = (0..request.items.len()).collect();
        Self {
            request,
            filter: String::new(),
            visible,
            cursor: 0,
        }
    }

    pub fn request(&self) -> &PickRequest {
        &self.request
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Row of the cursor among the visible items.
    pub fn cursor(&self) -> Option<usize> {
        (!self.visible.is_empty()).then_some(self.cursor)
    }

    /// Visible items in display order, paired with their index in the request.
    pub fn visible(&self) -> impl Iterator<Item = (usize, &PickItem)> + '_ {
        self.visible.iter().map(|&index| (index, &self.request.items[index]))
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    /// Index in the request of the item under the cursor.
    pub fn selected_index(&self) -> Option<usize> {
        self.visible.get(self.cursor).copied()
    }

    /// Actions reachable from the keyboard, with their key number.
    pub fn bound_actions(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.request
            .actions
            .iter()
            .take(MAX_ACTION_KEYS)
            .enumerate()
            .map(|(index, label)| (index + 1, label.as_str()))
    }

    pub fn select_next(&mut self) {
        if !self.visible.is_empty() {
            self.cursor = (self.cursor + 1) % self.visible.len();
        }
    }

    pub fn select_previous(&mut self) {
        if !self.visible.is_empty() {
            self.cursor = self.cursor.checked_sub(1).unwrap_or(self.visible.len() - 1);
        }
    }

    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
        self.refilter();
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if key.kind != KeyEventKind::Press {
            return KeyOutcome::Continue;
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyOutcome::Respond(PickResponse::Dismissed),
            KeyCode::Esc => KeyOutcome::Respond(PickResponse::Dismissed),
            KeyCode::Enter => match self.selected_index() {
                Some(index) => KeyOutcome::Respond(PickResponse::Selected(index)),
                None => KeyOutcome::Continue,
            },
            KeyCode::Up => {
                self.select_previous();
                KeyOutcome::Continue
            }
            KeyCode::Down => {
                self.select_next();
                KeyOutcome::Continue
            }
            KeyCode::Left if self.filter.is_empty() => self.back(),
            KeyCode::Backspace => {
                if self.filter.pop().is_none() {
                    return self.back();
                }
                self.refilter();
                KeyOutcome::Continue
            }
            KeyCode::F(number) => {
                let number = usize::from(number);
                if (1..=self.request.actions.len().min(MAX_ACTION_KEYS)).contains(&number) {
                    KeyOutcome::Respond(PickResponse::Action(number - 1))
                } else {
                    KeyOutcome::Continue
                }
            }
            KeyCode::Char(ch) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
                self.filter.push(ch);
                self.refilter();
                KeyOutcome::Continue
            }
            _ => KeyOutcome::Continue,
        }
    }

    fn back(&self) -> KeyOutcome {
        if self.request.can_go_back {
            KeyOutcome::Respond(PickResponse::Back)
        } else {
            KeyOutcome::Continue
        }
    }

    fn refilter(&mut self) {
        let mut scored: Vec<(usize, i64)> = self
            .request
            .items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| score_item(item, &self.filter).map(|score| (index, score)))
            .collect();
        // Stable, so equal scores keep request order.
        scored.sort_by_key(|&(_, score)| std::cmp::Reverse(score));
        self.visible = scored.into_iter().map(|(index, _)| index).collect();
        self.cursor = 0;
    }
}

fn score_item(item: &PickItem, filter: &str) -> Option<i64> {
    fuzzy_score(&item.label, filter).or_else(|| {
        item.detail
            .as_deref()
            .and_then(|detail| fuzzy_score(detail, filter))
            .map(|score| score - DETAIL_MATCH_PENALTY)
    })
}
