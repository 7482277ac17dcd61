//! Drawing for the quick-pick screen.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::picker::PickerState;
use crate::theme::{Theme, icon_glyph};

const FILTER_PROMPT: &str = "› ";
const DEFAULT_PLACEHOLDER: &str = "[type to filter]";

/// Draw the whole picker into `area`.
pub fn render(frame: &mut Frame, area: Rect, state: &PickerState, theme: &dyn Theme) {
    let request = state.request();
    let mut title = request.title.clone();
    if request.total_steps > 1 {
        title.push_str(&format!(" ({}/{})", request.step, request.total_steps));
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.border_style(true))
        .style(theme.panel_style())
        .title(Span::styled(title, theme.title_style()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let error_height = if request.error.is_some() { 1 } else { 0 };
    let [filter_area, error_area, list_area, hint_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(error_height),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    render_filter(frame, filter_area, state, theme);
    if let Some(error) = &request.error {
        let banner = Line::from(vec![
            Span::styled("⚠ ", theme.status_error()),
            Span::styled(error.clone(), theme.status_error()),
        ]);
        frame.render_widget(Paragraph::new(banner), error_area);
    }
    render_items(frame, list_area, state, theme);
    frame.render_widget(Paragraph::new(hint_line(state, theme)), hint_area);
}

fn render_filter(frame: &mut Frame, area: Rect, state: &PickerState, theme: &dyn Theme) {
    let mut spans = vec![Span::styled(FILTER_PROMPT, theme.accent_primary_style())];
    if state.filter().is_empty() {
        let placeholder = state.request().placeholder.as_deref().unwrap_or(DEFAULT_PLACEHOLDER);
        spans.push(Span::styled(placeholder.to_string(), theme.text_muted_style()));
    } else {
        spans.push(Span::styled(state.filter().to_string(), theme.text_primary_style()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);

    if let Some(position) = filter_cursor(area, state.filter()) {
        frame.set_cursor_position(position);
    }
}

/// Cursor cell after the filter text, or `None` when it falls outside `area`.
fn filter_cursor(area: Rect, filter: &str) -> Option<(u16, u16)> {
    let offset = u16::try_from(FILTER_PROMPT.width().saturating_add(filter.width())).unwrap_or(u16::MAX);
    let x = area.x.saturating_add(offset);
    (x < area.right()).then_some((x, area.y))
}

fn render_items(frame: &mut Frame, area: Rect, state: &PickerState, theme: &dyn Theme) {
    if state.visible_len() == 0 {
        let message = if state.filter().is_empty() {
            "Nothing to choose from."
        } else {
            "No items match the current filter."
        };
        let paragraph = Paragraph::new(message).style(theme.text_muted_style()).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = state
        .visible()
        .map(|(_, item)| {
            let mut spans = Vec::with_capacity(4);
            if let Some(icon) = item.icon {
                spans.push(Span::styled(format!("{} ", icon_glyph(icon)), theme.icon_style(icon)));
            }
            spans.push(Span::styled(item.label.clone(), theme.text_primary_style()));
            if let Some(detail) = &item.detail {
                spans.push(Span::raw("  "));
                spans.push(Span::styled(detail.clone(), theme.text_muted_style()));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .highlight_style(theme.selection_style())
        .highlight_symbol("▌");
    let mut list_state = ListState::default().with_selected(state.cursor());
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn hint_line(state: &PickerState, theme: &dyn Theme) -> Line<'static> {
    let mut hints: Vec<(String, String)> = vec![
        ("↑/↓".into(), " move  ".into()),
        ("Enter".into(), " select  ".into()),
        ("Esc".into(), " cancel  ".into()),
    ];
    if state.request().can_go_back {
        hints.push(("←".into(), " back  ".into()));
    }
    for (number, label) in state.bound_actions() {
        hints.push((format!("F{number}"), format!(" {label}  ")));
    }

    let spans = hints
        .into_iter()
        .flat_map(|(key, description)| {
            [
                Span::styled(key, theme.keybinding_style()),
                Span::styled(description, theme.text_muted_style().add_modifier(Modifier::ITALIC)),
            ]
        })
        .collect::<Vec<_>>();
    Line::from(spans)
}
