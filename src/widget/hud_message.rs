use std::time::{Duration, Instant};

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use crate::theme::Base16Palette;

const DEFAULT_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HudMode {
    Normal,
    Error,
}

/// Short-lived status line shown over the bottom of the screen
#[derive(Debug, Clone)]
pub struct HudMessage {
    pub message: String,
    pub expires_at: Instant,
    pub mode: HudMode,
}

impl HudMessage {
    pub fn new(message: impl Into<String>, duration: Duration, mode: HudMode) -> Self {
        Self {
            message: message.into(),
            expires_at: Instant::now() + duration,
            mode,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, DEFAULT_TTL, HudMode::Normal)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, DEFAULT_TTL * 2, HudMode::Error)
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    pub fn styled_line(&self, palette: &Base16Palette) -> Line<'static> {
        let style = match self.mode {
            HudMode::Normal => Style::default()
                .fg(palette.base_06)
                .bg(palette.base_02)
                .add_modifier(Modifier::BOLD),
            HudMode::Error => Style::default()
                .fg(palette.base_07)
                .bg(palette.destructive())
                .add_modifier(Modifier::BOLD),
        };

        Line::from(vec![Span::styled(format!(" {} ", self.message), style)]).centered()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::current_theme;

    #[test]
    fn expires_after_duration() {
        let hud = HudMessage::new("Page 5", Duration::from_millis(0), HudMode::Normal);
        assert!(hud.is_expired());
        assert!(!HudMessage::info("Page 5").is_expired());
    }

    #[test]
    fn error_line_uses_destructive_background() {
        let theme = current_theme();
        let line = HudMessage::error("Failed to load PDF").styled_line(theme);
        assert_eq!(line.spans[0].content, " Failed to load PDF ");
        assert_eq!(line.spans[0].style.bg, Some(theme.destructive()));
    }
}
