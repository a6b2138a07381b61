//! Integration settings commands.

use super::Context;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use portal_api::SettingsField;
use portal_core::{NoticeLevel, PageList, SettingsScreen};
use serde_json::{json, Map, Value};

/// Turn the screen's auth issue or error banner into a command failure.
fn ensure_ok(screen: &SettingsScreen) -> Result<()> {
    if let Some(issue) = screen.auth_issue() {
        if issue.code == 403 {
            anyhow::bail!(issue.text.clone());
        }
        anyhow::bail!("{} Run 'toma login'.", issue.text);
    }
    if let Some(error) = screen.error() {
        anyhow::bail!(error.to_string());
    }
    Ok(())
}

async fn load_screen(ctx: &Context) -> Result<SettingsScreen> {
    let mut screen = SettingsScreen::new(ctx.session.clone());
    screen.load(ctx.client.as_ref()).await;
    // failures are reported through ensure_ok
    screen.drain_notices();
    ensure_ok(&screen)?;
    Ok(screen)
}

async fn save_screen(ctx: &Context, screen: &mut SettingsScreen, format: &OutputFormat) -> Result<()> {
    screen.save(ctx.client.as_ref()).await;
    let saved = screen
        .drain_notices()
        .into_iter()
        .find(|n| n.level == NoticeLevel::Success);
    ensure_ok(screen)?;
    if let Some(notice) = saved {
        output::print_success(&notice.text, format);
    }
    Ok(())
}

fn on_off(active: bool) -> &'static str {
    if active {
        "On"
    } else {
        "Off"
    }
}

/// Print the current settings. Secret fields stay masked unless `reveal`.
pub async fn settings_show(ctx: &Context, reveal: bool, format: &OutputFormat) -> Result<()> {
    let mut screen = load_screen(ctx).await?;
    if reveal {
        for field in SettingsField::ALL.into_iter().filter(|f| f.is_secret()) {
            screen.form_mut().toggle_mask(field);
        }
    }
    let form = screen.form();

    match format {
        OutputFormat::Text => {
            output::print_heading("Integration Settings");
            println!(
                "Customer #{} • {}",
                screen.display_number(),
                screen.display_name()
            );

            output::print_heading("API Keys");
            for field in SettingsField::ALL.into_iter().filter(|f| f.is_secret()) {
                output::print_row(field.label(), &form.display_value(field));
            }

            output::print_heading("Blotato Accounts");
            for field in SettingsField::ALL.into_iter().filter(|f| !f.is_secret()) {
                output::print_row(field.label(), &form.display_value(field));
                if field == SettingsField::LinkedinId {
                    output::print_row("LinkedIn Active", on_off(form.linkedin_active()));
                }
            }

            output::print_heading("Page IDs");
            for list in [PageList::Facebook, PageList::Linkedin] {
                output::print_row(list.label(), form.pages_text(list));
            }
        }
        OutputFormat::Json => {
            let mut fields = Map::new();
            for field in SettingsField::ALL {
                fields.insert(field.key().to_string(), json!(form.display_value(field)));
            }
            let payload = form.payload();
            fields.insert(
                "blotato_facebook_page_ids".into(),
                json!(payload.blotato_facebook_page_ids),
            );
            fields.insert(
                "blotato_linkeidin_page_ids".into(),
                json!(payload.blotato_linkeidin_page_ids),
            );
            fields.insert(
                "blotato_linkeidin_active".into(),
                json!(form.linkedin_active()),
            );

            output::print_json(&json!({
                "customer_id": screen.customer_id(),
                "customer_number": screen.display_number(),
                "display_name": screen.display_name(),
                "settings": Value::Object(fields),
            }));
        }
    }
    Ok(())
}

/// Set one free-text field and save.
pub async fn settings_set(
    ctx: &Context,
    field: &str,
    value: &str,
    format: &OutputFormat,
) -> Result<()> {
    let Some(field) = SettingsField::parse(field) else {
        let known: Vec<&str> = SettingsField::ALL.iter().map(|f| f.key()).collect();
        anyhow::bail!("Unknown field '{}'. Known fields: {}", field, known.join(", "));
    };

    let mut screen = load_screen(ctx).await?;
    screen.form_mut().set_field(field, value);
    save_screen(ctx, &mut screen, format).await
}

/// Switch LinkedIn posting on or off and save.
pub async fn settings_linkedin(ctx: &Context, active: bool, format: &OutputFormat) -> Result<()> {
    let mut screen = load_screen(ctx).await?;
    screen.form_mut().set_linkedin_active(active);
    save_screen(ctx, &mut screen, format).await
}

/// Replace a page id list from comma-separated text and save.
pub async fn settings_pages(
    ctx: &Context,
    list: &str,
    ids: &str,
    format: &OutputFormat,
) -> Result<()> {
    let Some(list) = PageList::parse(list) else {
        anyhow::bail!("Unknown page list '{}'. Use 'facebook' or 'linkedin'.", list);
    };

    let mut screen = load_screen(ctx).await?;
    screen.form_mut().set_pages_text(list, ids);
    save_screen(ctx, &mut screen, format).await
}
