use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use snapdeck_core::PositionTable;
use tracing::warn;

use crate::app::App;
use crate::scroll::timing::percent_to_rows;

/// Where a mounted page sits relative to the container, in rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSlot {
    pub index: usize,
    /// Row of the page's top edge; negative when scrolled past
    pub top: i32,
    pub height: i32,
}

impl PageSlot {
    pub fn bottom(&self) -> i32 {
        self.top + self.height
    }
}

/// Mounted pages that intersect a container of `rows` rows when the stack is
/// shifted by `offset` percent
pub fn visible_slots(
    positions: &PositionTable,
    mounted: usize,
    offset: f64,
    rows: u16,
) -> Vec<PageSlot> {
    let mounted = mounted.min(positions.page_count());
    (0..mounted)
        .filter_map(|index| {
            let start = positions.offset(index)?;
            let height = positions.height_of(index)?;
            let top = percent_to_rows(offset - start as f64, rows);
            let height = percent_to_rows(height as f64, rows);
            Some(PageSlot { index, top, height })
        })
        .filter(|slot| slot.bottom() > 0 && slot.top < i32::from(rows))
        .collect()
}

/// The page stack, drawn inside the configured container
pub struct DeckWidget;

impl DeckWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let container = container_rect(area, app);
        let theme = &app.theme;

        frame.render_widget(
            Block::default().style(Style::default().bg(theme.bg)),
            container,
        );

        let offset = app.animator.current_offset();
        for slot in visible_slots(&app.positions, app.mounted, offset, container.height) {
            let Some(page) = app.pages.get(slot.index) else {
                continue;
            };

            let visible_top = slot.top.max(0);
            let visible_bottom = slot.bottom().min(i32::from(container.height));
            let rect = Rect {
                x: container.x,
                y: container.y + visible_top as u16,
                width: container.width,
                height: (visible_bottom - visible_top) as u16,
            };

            let mut borders = Borders::LEFT | Borders::RIGHT;
            if slot.top >= 0 {
                borders |= Borders::TOP;
            }
            if slot.bottom() <= i32::from(container.height) {
                borders |= Borders::BOTTOM;
            }

            let mut block = Block::default()
                .borders(borders)
                .border_style(Style::default().fg(theme.border))
                .style(Style::default().bg(theme.panel(slot.index)));
            if borders.contains(Borders::TOP) {
                block = block.title(Span::styled(
                    format!(" {} / {} ", slot.index + 1, app.page_count()),
                    Style::default().fg(theme.muted),
                ));
            }

            // Rows hidden above the container, not counting the hidden top border
            let skip = if slot.top < 0 {
                (-slot.top - 1).max(0) as u16
            } else {
                0
            };

            let mut lines = vec![Line::from(Span::styled(
                page.title.clone(),
                theme.title_style(),
            ))];
            lines.push(Line::default());
            lines.extend(
                page.body
                    .lines()
                    .map(|line| Line::from(Span::styled(line.to_string(), Style::default().fg(theme.fg)))),
            );

            let paragraph = Paragraph::new(lines)
                .block(block)
                .wrap(Wrap { trim: false })
                .scroll((skip, 0));
            frame.render_widget(paragraph, rect);
        }
    }
}

fn container_rect(area: Rect, app: &App) -> Rect {
    let container = &app.config.container;
    let (height, width) = match (container.height(), container.width()) {
        (Ok(h), Ok(w)) => (
            h.resolve(area.height, area.width, area.height),
            w.resolve(area.width, area.width, area.height),
        ),
        _ => {
            warn!("Invalid container size, using the full terminal");
            (area.height, area.width)
        }
    };
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
