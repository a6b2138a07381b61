//! Forgot-password and reset-password pages.

use crate::tui::app::{App, FormRow, InputMode, Screen, FORGOT_ROWS, RESET_ROWS};
use crate::tui::theme::Theme;
use crate::tui::ui::{centered_rect, pad_to, truncate_str};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const CARD_WIDTH: u16 = 64;
const CARD_HEIGHT: u16 = 16;
const LABEL_WIDTH: usize = 18;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let (title, lines) = match &app.screen {
        Screen::ForgotPassword(form) => {
            let mut lines = vec![
                muted("Enter your account email and we will send you a reset link.", theme),
                Line::from(""),
            ];
            for (idx, row) in FORGOT_ROWS.iter().enumerate() {
                let value = match row {
                    FormRow::Email => form.email.clone(),
                    _ => String::new(),
                };
                lines.push(row_line(app, idx, *row, &value, form.loading, theme));
            }
            push_outcome(&mut lines, form.message.as_deref(), form.error.as_deref(), theme);
            ("Forgot Password", lines)
        }
        Screen::ResetPassword(form) => {
            let mut lines = Vec::new();
            if form.link.is_complete() {
                lines.push(Line::from(vec![
                    Span::styled("Account: ", Style::default().fg(theme.text_secondary)),
                    Span::styled(form.link.email.clone(), Style::default().fg(theme.text)),
                ]));
            } else {
                lines.push(Line::from(Span::styled(
                    "This reset link is missing its token or email.",
                    Style::default().fg(theme.warning),
                )));
            }
            lines.push(Line::from(""));
            for (idx, row) in RESET_ROWS.iter().enumerate() {
                let value = match row {
                    FormRow::Password => mask_len(&form.password),
                    FormRow::Confirm => mask_len(&form.confirm),
                    _ => String::new(),
                };
                lines.push(row_line(app, idx, *row, &value, form.loading, theme));
            }
            push_outcome(&mut lines, form.ok.as_deref(), form.error.as_deref(), theme);
            ("Reset Password", lines)
        }
        _ => return,
    };

    let card = centered_rect(CARD_WIDTH, CARD_HEIGHT, area);
    frame.render_widget(Clear, card);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_active))
        .title(format!(" {} ", title))
        .title_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .style(Style::default().bg(theme.bg_panel));
    let inner = Rect {
        x: card.x + 2,
        y: card.y + 1,
        width: card.width.saturating_sub(4),
        height: card.height.saturating_sub(2),
    };
    frame.render_widget(block, card);
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn row_line(
    app: &App,
    idx: usize,
    row: FormRow,
    value: &str,
    loading: bool,
    theme: &Theme,
) -> Line<'static> {
    let selected = idx == app.main_selected;
    let editing = selected && app.input_mode == InputMode::Editing;
    let style = if selected {
        Style::default().bg(theme.bg_selection)
    } else {
        Style::default()
    };

    let (label, is_secret) = match row {
        FormRow::Email => ("Email", false),
        FormRow::Password => ("New password", true),
        FormRow::Confirm => ("Confirm password", true),
        FormRow::Submit => {
            let text = match (&app.screen, loading) {
                (_, true) => format!("{} Please wait...", app.spinner_char()),
                (Screen::ForgotPassword(_), false) => "[ Send Reset Link ]".to_string(),
                _ => "[ Reset Password ]".to_string(),
            };
            let color = if loading { theme.spinner } else { theme.accent };
            return Line::from(Span::styled(
                text,
                style.fg(color).add_modifier(Modifier::BOLD),
            ));
        }
        FormRow::BackToLogin => {
            return Line::from(Span::styled(
                "Back to login",
                style.fg(theme.info).add_modifier(Modifier::UNDERLINED),
            ));
        }
    };

    let shown = if editing {
        let buffer = if is_secret {
            mask_len(&app.edit_buffer)
        } else {
            app.edit_buffer.clone()
        };
        format!("{}_", buffer)
    } else {
        value.to_string()
    };
    let value_style = if editing {
        Style::default().fg(theme.text).bg(theme.bg_input)
    } else {
        style.fg(theme.text)
    };

    let width = (CARD_WIDTH as usize).saturating_sub(4 + LABEL_WIDTH + 1);
    Line::from(vec![
        Span::styled(pad_to(label, LABEL_WIDTH), style.fg(theme.text_secondary)),
        Span::styled(" ", style),
        Span::styled(truncate_str(&shown, width), value_style),
    ])
}

fn push_outcome(lines: &mut Vec<Line<'static>>, ok: Option<&str>, error: Option<&str>, theme: &Theme) {
    lines.push(Line::from(""));
    if let Some(ok) = ok {
        lines.push(Line::from(Span::styled(
            ok.to_string(),
            Style::default().fg(theme.success),
        )));
    }
    if let Some(error) = error {
        lines.push(Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(theme.error),
        )));
    }
}

fn muted(text: &'static str, theme: &Theme) -> Line<'static> {
    Line::from(Span::styled(text, Style::default().fg(theme.text_muted)))
}

fn mask_len(text: &str) -> String {
    "*".repeat(text.chars().count())
}
