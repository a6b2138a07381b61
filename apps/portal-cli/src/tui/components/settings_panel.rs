//! Integration settings page.

use crate::tui::app::{settings_rows, App, InputMode, Panel, SettingsRow};
use crate::tui::theme::Theme;
use crate::tui::ui::{pad_to, panel_block, truncate_str};
use portal_api::SettingsField;
use portal_core::settings::MASK_CHAR;
use portal_core::{ScreenView, SettingsForm, SettingsScreen};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

const LABEL_WIDTH: usize = 22;

pub fn render(frame: &mut Frame, app: &App, screen: &SettingsScreen, area: Rect) {
    let theme = &app.theme;
    let block = panel_block("API Settings", app.active_panel == Panel::Main, theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![
        Line::from(Span::styled(
            "Integration Settings",
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            truncate_str(
                &format!(
                    "Customer #{} • {}",
                    screen.display_number(),
                    screen.display_name()
                ),
                inner.width as usize,
            ),
            Style::default().fg(theme.text_muted),
        )),
        Line::from(""),
    ];

    match screen.view() {
        ScreenView::Loading => {
            lines.push(Line::from(Span::styled(
                format!("{} Loading settings...", app.spinner_char()),
                Style::default().fg(theme.spinner),
            )));
            frame.render_widget(Paragraph::new(lines), inner);
        }
        ScreenView::AuthIssue(issue) => {
            lines.push(Line::from(Span::styled(
                issue.code.to_string(),
                Style::default()
                    .fg(theme.error)
                    .add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(Span::styled(
                issue.text.clone(),
                Style::default().fg(theme.text),
            )));
            lines.push(Line::from(""));
            let hint = if issue.code == 403 {
                "Ask your account owner for access."
            } else {
                "Press Enter to sign in again."
            };
            lines.push(Line::from(Span::styled(
                hint,
                Style::default().fg(theme.text_muted),
            )));
            let paragraph = Paragraph::new(lines)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
            frame.render_widget(paragraph, inner);
        }
        ScreenView::Form => {
            if let Some(error) = screen.error() {
                lines.push(Line::from(Span::styled(
                    truncate_str(error, inner.width as usize),
                    Style::default().fg(theme.error),
                )));
                lines.push(Line::from(""));
            }

            let mut selected_line = 0;
            let width = inner.width as usize;
            for (idx, row) in settings_rows().into_iter().enumerate() {
                if let Some(heading) = section_heading(row) {
                    if idx > 0 {
                        lines.push(Line::from(""));
                    }
                    if !heading.is_empty() {
                        lines.push(Line::from(Span::styled(
                            heading,
                            Style::default()
                                .fg(theme.text_secondary)
                                .add_modifier(Modifier::BOLD),
                        )));
                    }
                }
                let selected = app.active_panel == Panel::Main && idx == app.main_selected;
                if selected {
                    selected_line = lines.len();
                }
                let editing = selected && app.input_mode == InputMode::Editing;
                lines.push(row_line(app, screen, row, selected, editing, width, theme));
            }

            // keep the selected row on screen
            let height = inner.height as usize;
            let scroll = (selected_line + 1).saturating_sub(height);
            let paragraph = Paragraph::new(lines).scroll((scroll as u16, 0));
            frame.render_widget(paragraph, inner);
        }
    }
}

fn section_heading(row: SettingsRow) -> Option<&'static str> {
    match row {
        SettingsRow::Field(SettingsField::OpenaiApiKey) => Some("API Keys"),
        SettingsRow::Field(SettingsField::TwitterId) => Some("Blotato Accounts"),
        SettingsRow::Pages(portal_core::PageList::Facebook) => Some("Page IDs"),
        SettingsRow::Save => Some(""),
        _ => None,
    }
}

fn row_line(
    app: &App,
    screen: &SettingsScreen,
    row: SettingsRow,
    selected: bool,
    editing: bool,
    width: usize,
    theme: &Theme,
) -> Line<'static> {
    let form = screen.form();
    let row_style = if selected {
        Style::default().bg(theme.bg_selection)
    } else {
        Style::default()
    };
    let label_style = row_style.fg(theme.text_secondary);
    let value_width = width.saturating_sub(LABEL_WIDTH + 1);

    let (label, value, value_style) = match row {
        SettingsRow::Field(field) => {
            let label = field.label();
            if editing {
                let shown = if form.is_revealed(field) {
                    app.edit_buffer.clone()
                } else {
                    mask(&app.edit_buffer)
                };
                (label, format!("{}_", shown), edit_style(theme))
            } else {
                let (value, style) = field_value(form, field, row_style, theme);
                (label, value, style)
            }
        }
        SettingsRow::LinkedinActive => {
            let (mark, style) = if form.linkedin_active() {
                ("[x] On", row_style.fg(theme.success))
            } else {
                ("[ ] Off", row_style.fg(theme.text_muted))
            };
            ("LinkedIn Active", mark.to_string(), style)
        }
        SettingsRow::Pages(list) => {
            if editing {
                (list.label(), format!("{}_", app.edit_buffer), edit_style(theme))
            } else {
                let text = form.pages_text(list);
                if text.is_empty() {
                    (
                        list.label(),
                        list.placeholder().to_string(),
                        row_style.fg(theme.text_muted),
                    )
                } else {
                    (list.label(), text.to_string(), row_style.fg(theme.text))
                }
            }
        }
        SettingsRow::Save => {
            let (text, style) = if screen.is_saving() {
                (
                    format!("{} Saving...", app.spinner_char()),
                    row_style.fg(theme.spinner),
                )
            } else {
                (
                    "[ Save Settings ]".to_string(),
                    row_style.fg(theme.accent).add_modifier(Modifier::BOLD),
                )
            };
            return Line::from(Span::styled(text, style));
        }
    };

    Line::from(vec![
        Span::styled(pad_to(label, LABEL_WIDTH), label_style),
        Span::styled(" ", row_style),
        Span::styled(truncate_str(&value, value_width), value_style),
    ])
}

fn field_value(
    form: &SettingsForm,
    field: SettingsField,
    row_style: Style,
    theme: &Theme,
) -> (String, Style) {
    if form.field(field).is_empty() {
        return ("Not set".to_string(), row_style.fg(theme.text_muted));
    }
    let mut value = form.display_value(field);
    if field.is_secret() {
        let hint = if form.is_revealed(field) {
            "  [v] hide"
        } else {
            "  [v] show"
        };
        value.push_str(hint);
    }
    (value, row_style.fg(theme.text))
}

fn edit_style(theme: &Theme) -> Style {
    Style::default().fg(theme.text).bg(theme.bg_input)
}

fn mask(text: &str) -> String {
    text.chars().map(|_| MASK_CHAR).collect()
}
