//! Main render function and layout for the dashboard.

use super::app::{App, InputMode, Panel, Screen};
use super::components::{account_dialog, reset_panel, settings_panel, sidebar};
use super::theme::Theme;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const SIDEBAR_WIDTH: u16 = 30;
pub const SIDEBAR_COLLAPSED_WIDTH: u16 = 7;
/// Below this width the sidebar becomes an overlay toggled with `m`.
pub const NARROW_WIDTH: u16 = 80;

/// Render the entire application.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let theme = &app.theme;

    Clear.render(area, frame.buffer_mut());
    Block::default()
        .style(Style::default().bg(theme.bg))
        .render(area, frame.buffer_mut());

    // Status bar at the bottom, content above
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    if app.is_public() {
        reset_panel::render(frame, app, main_chunks[0]);
    } else if area.width < NARROW_WIDTH {
        render_main(frame, app, main_chunks[0]);
        if app.sidebar.open {
            let overlay = Rect {
                width: SIDEBAR_WIDTH.min(area.width),
                ..main_chunks[0]
            };
            frame.render_widget(Clear, overlay);
            sidebar::render(frame, app, overlay);
        }
    } else {
        let width = if app.sidebar.collapsed {
            SIDEBAR_COLLAPSED_WIDTH
        } else {
            SIDEBAR_WIDTH
        };
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(width), Constraint::Min(1)])
            .split(main_chunks[0]);

        sidebar::render(frame, app, chunks[0]);
        render_main(frame, app, chunks[1]);
    }

    render_status_bar(frame, app, main_chunks[1]);

    account_dialog::render(frame, app);
}

fn render_main(frame: &mut Frame, app: &App, area: Rect) {
    match &app.screen {
        Screen::Settings(screen) => settings_panel::render(frame, app, screen, area),
        Screen::ForgotPassword(_) | Screen::ResetPassword(_) => reset_panel::render(frame, app, area),
        Screen::Placeholder(title) => render_placeholder(frame, app, title, area),
    }
}

/// Pages that only exist in the web dashboard.
fn render_placeholder(frame: &mut Frame, app: &App, title: &str, area: Rect) {
    let theme = &app.theme;
    let block = panel_block(title, app.active_panel == Panel::Main, theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(2),
            Constraint::Percentage(45),
        ])
        .split(inner);

    let message = Paragraph::new(vec![
        Line::from(Span::styled(
            "This page is available in the web dashboard.",
            Style::default().fg(theme.text_secondary),
        )),
        Line::from(Span::styled(
            app.route.path().to_string(),
            Style::default().fg(theme.text_muted),
        )),
    ])
    .alignment(Alignment::Center);

    frame.render_widget(message, vertical[1]);
}

/// Latest toast, or key hints for the current context.
fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let width = area.width.saturating_sub(2) as usize;

    let line = match app.toasts.back() {
        Some(toast) => {
            let stamp = format!("[{}] ", toast.raised_at.format("%H:%M:%S"));
            let text_width = width.saturating_sub(stamp.width());
            Line::from(vec![
                Span::raw(" "),
                Span::styled(stamp, Style::default().fg(theme.text_muted)),
                Span::styled(
                    truncate_str(&toast.notice.text, text_width),
                    Style::default()
                        .fg(theme.notice(toast.notice.level))
                        .add_modifier(Modifier::BOLD),
                ),
            ])
        }
        None => Line::from(vec![
            Span::raw(" "),
            Span::styled(
                truncate_str(key_hints(app), width),
                Style::default().fg(theme.text_muted),
            ),
        ]),
    };

    let status = Paragraph::new(line).style(Style::default().bg(theme.bg_panel));
    frame.render_widget(status, area);
}

fn key_hints(app: &App) -> &'static str {
    if app.show_account_dialog {
        return "Enter: logout | Esc: close";
    }
    if app.input_mode == InputMode::Editing {
        return "Enter: apply | Esc: cancel | Ctrl+U: clear";
    }
    if app.is_public() {
        return "j/k: move | Enter: select | L: login | q: quit";
    }
    match (app.active_panel, &app.screen) {
        (Panel::Sidebar, _) => {
            "Tab: page | j/k: move | Enter: open | c: collapse | m: menu | u: account | x: logout | q: quit"
        }
        (Panel::Main, Screen::Settings(_)) => {
            "Tab: sidebar | j/k: move | Enter: edit | v: show key | space: toggle | s: save | r: reload | q: quit"
        }
        (Panel::Main, _) => "Tab: sidebar | m: menu | u: account | x: logout | q: quit",
    }
}

/// Styled block for panels.
pub fn panel_block<'a>(title: &str, is_active: bool, theme: &Theme) -> Block<'a> {
    let border_color = if is_active {
        theme.border_active
    } else {
        theme.border
    };

    let title_color = if is_active {
        theme.accent
    } else {
        theme.text_secondary
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .style(Style::default().bg(theme.bg_panel));

    if title.is_empty() {
        block
    } else {
        block
            .title(format!(" {} ", title))
            .title_style(Style::default().fg(title_color))
    }
}

/// Truncate to a display width, appending `...` when there is room.
pub fn truncate_str(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let (budget, suffix) = if max_width > 3 {
        (max_width - 3, "...")
    } else {
        (max_width, "")
    };

    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str(suffix);
    out
}

/// Pad with spaces to a display width.
pub fn pad_to(s: &str, width: usize) -> String {
    let mut out = s.to_string();
    for _ in s.width()..width {
        out.push(' ');
    }
    out
}

/// Centered rect of the given size within `area`.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_strings() {
        assert_eq!(truncate_str("Settings", 10), "Settings");
        assert_eq!(truncate_str("", 0), "");
    }

    #[test]
    fn truncate_adds_ellipsis() {
        assert_eq!(truncate_str("Blog Automation", 8), "Blog ...");
        assert_eq!(truncate_str("abcdef", 3), "abc");
    }

    #[test]
    fn truncate_respects_multibyte_and_wide_chars() {
        // would panic with byte slicing
        assert_eq!(truncate_str("•••••••••", 5), "••...");
        assert_eq!(truncate_str("Customer #— • Acme", 13), "Customer #...");
        // wide characters take two columns
        assert_eq!(truncate_str("日本語テキスト", 7), "日本...");
    }

    #[test]
    fn pad_to_uses_display_width() {
        assert_eq!(pad_to("ab", 4), "ab  ");
        assert_eq!(pad_to("—", 3), "—  ");
        assert_eq!(pad_to("toolong", 3), "toolong");
    }

    #[test]
    fn centered_rect_clamps_to_area() {
        let area = Rect::new(0, 0, 20, 10);
        assert_eq!(centered_rect(10, 4, area), Rect::new(5, 3, 10, 4));
        assert_eq!(centered_rect(40, 40, area), Rect::new(0, 0, 20, 10));
    }
}
