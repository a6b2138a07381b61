//! Account dialog: who is signed in, with a logout action.

use crate::tui::app::App;
use crate::tui::theme::Theme;
use crate::tui::ui::{centered_rect, truncate_str};
use portal_core::SidebarFooter;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const WIDTH: u16 = 44;
const HEIGHT: u16 = 12;

/// Render the account dialog overlay.
pub fn render(frame: &mut Frame, app: &App) {
    if !app.show_account_dialog {
        return;
    }

    let theme = &app.theme;
    let area = centered_rect(WIDTH, HEIGHT, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Account ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_active))
        .style(Style::default().bg(theme.bg_panel));
    frame.render_widget(block, area);

    let inner = Rect {
        x: area.x + 2,
        y: area.y + 1,
        width: area.width.saturating_sub(4),
        height: area.height.saturating_sub(2),
    };

    let lines = build_dialog_content(&app.footer(), inner.width as usize, theme);
    frame.render_widget(Paragraph::new(lines), inner);
}

fn build_dialog_content(footer: &SidebarFooter, width: usize, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            "Signed in as:",
            Style::default().fg(theme.text_secondary),
        )),
        Line::from(Span::styled(
            truncate_str(&footer.display, width),
            Style::default().fg(theme.accent),
        )),
    ];

    if let Some(company) = &footer.company {
        lines.push(Line::from(vec![
            Span::styled("Company: ", Style::default().fg(theme.text_secondary)),
            Span::styled(
                truncate_str(company, width.saturating_sub(9)),
                Style::default().fg(theme.text_muted),
            ),
        ]));
    }
    if let Some(number) = &footer.customer_number {
        lines.push(Line::from(vec![
            Span::styled("Customer #: ", Style::default().fg(theme.text_secondary)),
            Span::styled(number.clone(), Style::default().fg(theme.text_muted)),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "> Logout",
        Style::default()
            .fg(theme.error)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("[Esc]", Style::default().fg(theme.text_muted)),
        Span::styled(" Close  ", Style::default().fg(theme.text_secondary)),
        Span::styled("[Enter]", Style::default().fg(theme.text_muted)),
        Span::styled(" Logout", Style::default().fg(theme.text_secondary)),
    ]));

    lines
}
