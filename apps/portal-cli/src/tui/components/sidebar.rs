//! Navigation sidebar with the account footer.

use crate::tui::app::{App, Panel};
use crate::tui::theme::Theme;
use crate::tui::ui::{panel_block, truncate_str};
use portal_core::nav::EntryKind;
use portal_core::{SidebarEntry, SidebarFooter};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

/// Render the sidebar panel.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let is_active = app.active_panel == Panel::Sidebar;
    let theme = &app.theme;
    let collapsed = app.sidebar.collapsed && !app.sidebar.open;
    let block = panel_block(if collapsed { "" } else { "Toma" }, is_active, theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let footer_height = if collapsed { 2 } else { 4 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(footer_height)])
        .split(inner);

    let max_width = chunks[0].width as usize;
    let items: Vec<ListItem> = app
        .sidebar
        .visible_entries()
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let selected = is_active && idx == app.sidebar.selected();
            entry_item(entry, app.sidebar.settings_open(), selected, max_width, theme)
        })
        .collect();

    frame.render_widget(List::new(items), chunks[0]);

    render_footer(frame, app, &app.footer(), collapsed, chunks[1]);
}

fn entry_item(
    entry: &SidebarEntry,
    settings_open: bool,
    selected: bool,
    max_width: usize,
    theme: &Theme,
) -> ListItem<'static> {
    let mut style = if entry.active {
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text_secondary)
    };
    if selected {
        style = style.bg(theme.bg_selection);
    }

    let text = match (entry.kind, entry.label) {
        // collapsed: one initial per link
        (EntryKind::Link(item), None) => format!(" {} ", initial(item.label)),
        (EntryKind::SettingsToggle, None) => " * ".to_string(),
        (EntryKind::Link(_), Some(label)) => format!(" {}", label),
        (EntryKind::SettingsToggle, Some(label)) => {
            let arrow = if settings_open { "v" } else { ">" };
            format!(" {} {}", arrow, label)
        }
        (EntryKind::SettingsLink(_), label) => format!("    {}", label.unwrap_or_default()),
    };

    let marker = if entry.active { "|" } else { " " };
    ListItem::new(Line::from(vec![
        Span::styled(marker, Style::default().fg(theme.accent)),
        Span::styled(truncate_str(&text, max_width.saturating_sub(1)), style),
    ]))
}

fn initial(label: &str) -> char {
    label.chars().next().unwrap_or('?')
}

fn render_footer(
    frame: &mut Frame,
    app: &App,
    footer: &SidebarFooter,
    collapsed: bool,
    area: Rect,
) {
    let theme = &app.theme;
    let width = area.width as usize;
    let avatar = Span::styled(
        format!("({})", footer.initial),
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD),
    );

    let mut lines = Vec::new();
    if collapsed {
        lines.push(Line::from(vec![Span::raw(" "), avatar]));
    } else {
        lines.push(Line::from(vec![
            avatar,
            Span::raw(" "),
            Span::styled(
                truncate_str(&footer.display, width.saturating_sub(4)),
                Style::default().fg(theme.text),
            ),
        ]));
        if let Some(company) = &footer.company {
            lines.push(Line::from(Span::styled(
                truncate_str(company, width),
                Style::default().fg(theme.text_secondary),
            )));
        }
        if let Some(number) = &footer.customer_number {
            lines.push(Line::from(Span::styled(
                truncate_str(&format!("Customer #{}", number), width),
                Style::default().fg(theme.text_muted),
            )));
        }
    }

    let logout = if app.sidebar.logging_out() {
        Span::styled(
            format!("{} Logging out...", app.spinner_char()),
            Style::default().fg(theme.spinner),
        )
    } else if collapsed {
        Span::styled(" [x]", Style::default().fg(theme.text_muted))
    } else {
        Span::styled("[x] Logout", Style::default().fg(theme.text_muted))
    };
    lines.push(Line::from(logout));

    frame.render_widget(Paragraph::new(lines), area);
}
