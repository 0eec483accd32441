use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let status_text = match (&app.status_message, app.movement) {
            (Some(msg), _) => format!(" {}", msg),
            (None, Some(movement)) => format!(
                " Page {}/{} | Mounted: {} | Moving {} -> {}",
                app.current_page + 1,
                app.page_count(),
                app.mounted,
                movement.from + 1,
                movement.to + 1
            ),
            (None, None) => format!(
                " Page {}/{} | Mounted: {}",
                app.current_page + 1,
                app.page_count(),
                app.mounted
            ),
        };

        let help_hint = " q:quit up/down:move 1-9:page g/G:first/last r:reload ";
        let padding_len = area
            .width
            .saturating_sub(status_text.len() as u16 + help_hint.len() as u16)
            as usize;

        let line = Line::from(vec![
            Span::styled(status_text, theme.status_style()),
            Span::styled(" ".repeat(padding_len), theme.status_style()),
            Span::styled(
                help_hint,
                Style::default().fg(theme.muted).bg(theme.status_bg),
            ),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}
