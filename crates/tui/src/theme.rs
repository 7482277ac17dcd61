//! Semantic color roles for the picker.
//!
//! Widgets ask the [`Theme`] for a style by meaning ("muted text", "error
//! status") and never hard-code colors.

use std::fmt::Debug;

use gluetty_types::CandidateIcon;
use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone)]
pub struct ThemeRoles {
    pub surface: Color,
    pub border: Color,
    pub focus: Color,

    pub text: Color,
    pub text_secondary: Color,
    pub text_muted: Color,

    pub accent_primary: Color,
    pub accent_secondary: Color,

    pub info: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,

    pub selection_bg: Color,
    pub selection_fg: Color,
}

pub trait Theme: Send + Sync + Debug {
    fn roles(&self) -> &ThemeRoles;

    fn text_primary_style(&self) -> Style {
        Style::default().fg(self.roles().text)
    }
    fn text_secondary_style(&self) -> Style {
        Style::default().fg(self.roles().text_secondary)
    }
    fn text_muted_style(&self) -> Style {
        Style::default().fg(self.roles().text_muted)
    }
    fn title_style(&self) -> Style {
        self.text_secondary_style().add_modifier(Modifier::BOLD)
    }

    fn border_style(&self, focused: bool) -> Style {
        let color = if focused { self.roles().focus } else { self.roles().border };
        Style::default().fg(color)
    }
    fn panel_style(&self) -> Style {
        Style::default().bg(self.roles().surface).fg(self.roles().text)
    }

    fn selection_style(&self) -> Style {
        Style::default()
            .fg(self.roles().selection_fg)
            .bg(self.roles().selection_bg)
            .add_modifier(Modifier::BOLD)
    }

    fn status_info(&self) -> Style {
        Style::default().fg(self.roles().info)
    }
    fn status_success(&self) -> Style {
        Style::default().fg(self.roles().success)
    }
    fn status_warning(&self) -> Style {
        Style::default().fg(self.roles().warning)
    }
    fn status_error(&self) -> Style {
        Style::default().fg(self.roles().error)
    }

    fn accent_primary_style(&self) -> Style {
        Style::default().fg(self.roles().accent_primary)
    }
    fn keybinding_style(&self) -> Style {
        Style::default().fg(self.roles().accent_secondary).add_modifier(Modifier::BOLD)
    }

    /// Style for a candidate icon glyph.
    fn icon_style(&self, icon: CandidateIcon) -> Style {
        match icon {
            CandidateIcon::Pass => self.status_success(),
            CandidateIcon::Error => self.status_error(),
            CandidateIcon::Running => self.status_info(),
            CandidateIcon::Stopped => self.status_warning(),
            CandidateIcon::Folder | CandidateIcon::Region => self.accent_primary_style(),
        }
    }
}

// Dracula palette (https://draculatheme.com/contribute)
const BG: Color = Color::Rgb(0x28, 0x2A, 0x36);
const CURRENT_LINE: Color = Color::Rgb(0x44, 0x47, 0x5A);
const FOREGROUND: Color = Color::Rgb(0xF8, 0xF8, 0xF2);
const COMMENT: Color = Color::Rgb(0x62, 0x72, 0xA4);
const CYAN: Color = Color::Rgb(0x8B, 0xE9, 0xFD);
const GREEN: Color = Color::Rgb(0x50, 0xFA, 0x7B);
const ORANGE: Color = Color::Rgb(0xFF, 0xB8, 0x6C);
const PINK: Color = Color::Rgb(0xFF, 0x79, 0xC6);
const RED: Color = Color::Rgb(0xFF, 0x55, 0x55);

/// Default theme tuned for dark terminals.
#[derive(Debug, Clone)]
pub struct DraculaTheme {
    roles: ThemeRoles,
}

impl DraculaTheme {
    pub fn new() -> Self {
        Self {
            roles: ThemeRoles {
                surface: BG,
                border: CURRENT_LINE,
                focus: CYAN,

                text: FOREGROUND,
                text_secondary: COMMENT,
                text_muted: COMMENT,

                accent_primary: PINK,
                accent_secondary: CYAN,

                info: CYAN,
                success: GREEN,
                warning: ORANGE,
                error: RED,

                selection_bg: CURRENT_LINE,
                selection_fg: FOREGROUND,
            },
        }
    }
}

impl Default for DraculaTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl Theme for DraculaTheme {
    fn roles(&self) -> &ThemeRoles {
        &self.roles
    }
}

/// Glyph drawn in front of a candidate's label.
pub fn icon_glyph(icon: CandidateIcon) -> &'static str {
    match icon {
        CandidateIcon::Pass => "✔",
        CandidateIcon::Error => "✖",
        CandidateIcon::Running => "▶",
        CandidateIcon::Stopped => "■",
        CandidateIcon::Folder => "▸",
        CandidateIcon::Region => "◆",
    }
}
