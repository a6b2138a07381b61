//! Authentication commands.

use super::{prompt_line, Context};
use crate::output::{self, OutputFormat};
use anyhow::Result;
use portal_api::PortalApi;
use portal_core::end_session;

fn display_user(ctx: &Context) -> String {
    ctx.session
        .user()
        .and_then(|u| u.email.or(u.name))
        .unwrap_or_else(|| "user".to_string())
}

/// Prompt for credentials, call `POST /login` and persist the session.
async fn sign_in(ctx: &Context, email: Option<String>) -> Result<()> {
    let email = match email {
        Some(email) => email,
        None => prompt_line("Email: ")?,
    };
    if email.is_empty() {
        anyhow::bail!("Email is required");
    }

    // Read password without echo
    let password = rpassword::prompt_password("Password: ")?;
    if password.is_empty() {
        anyhow::bail!("Password is required");
    }

    let login = ctx
        .client
        .login(&email, &password)
        .await
        .map_err(|e| anyhow::anyhow!("Login failed: {}", e.server_message()))?;

    ctx.session.set_token(&login.token)?;
    if let Some(user) = &login.user {
        ctx.session.set_user(user)?;
    }
    tracing::info!("signed in");
    Ok(())
}

/// Login with email and password.
pub async fn login(ctx: &Context, email: Option<String>, format: &OutputFormat) -> Result<()> {
    if ctx.session.has_token() {
        output::print_success(&format!("Already logged in as {}", display_user(ctx)), format);
        return Ok(());
    }

    sign_in(ctx, email).await?;
    output::print_success(&format!("Logged in as {}", display_user(ctx)), format);
    Ok(())
}

/// Logout and clear the stored session, even if the server call fails.
pub async fn logout(ctx: &Context, format: &OutputFormat) -> Result<()> {
    if !ctx.session.has_token() {
        output::print_success("Not logged in", format);
        return Ok(());
    }
    end_session(ctx.client.as_ref(), &ctx.session).await;
    output::print_success("Logged out successfully", format);
    Ok(())
}

/// Show the stored session.
pub async fn status(ctx: &Context, format: &OutputFormat) -> Result<()> {
    let logged_in = ctx.session.has_token();
    let user = ctx.session.user();
    let business = ctx.session.business_name();

    match format {
        OutputFormat::Text => {
            println!("API:       {}", ctx.config.api_root());
            if logged_in {
                println!("Auth:      logged in");
                if let Some(user) = &user {
                    if let Some(name) = &user.name {
                        println!("Name:      {}", name);
                    }
                    if let Some(email) = &user.email {
                        println!("Email:     {}", email);
                    }
                }
                if let Some(business) = &business {
                    println!("Business:  {}", business);
                }
            } else {
                println!("Auth:      not logged in");
            }
        }
        OutputFormat::Json => {
            output::print_json(&serde_json::json!({
                "api": ctx.config.api_root(),
                "logged_in": logged_in,
                "user": user,
                "business_name": business,
            }));
        }
    }
    Ok(())
}

/// Make sure a token is stored before the dashboard starts.
/// Prompts for email/password when there is none.
pub async fn ensure_authenticated(ctx: &Context) -> Result<()> {
    if ctx.session.has_token() {
        return Ok(());
    }

    println!();
    println!("Authentication required.");
    println!();

    sign_in(ctx, None).await?;

    println!("Logged in as {}", display_user(ctx));
    println!();
    Ok(())
}
