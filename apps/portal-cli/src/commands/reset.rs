//! Password reset commands.

use super::{prompt_line, Context};
use crate::output::{self, OutputFormat};
use anyhow::Result;
use portal_core::{ForgotPasswordForm, ResetLink, ResetPasswordForm};

/// Request a password reset link.
pub async fn forgot_password(
    ctx: &Context,
    email: Option<String>,
    format: &OutputFormat,
) -> Result<()> {
    let email = match email {
        Some(email) => email,
        None => prompt_line("Email: ")?,
    };

    let mut form = ForgotPasswordForm::new(email);
    if form.submit(ctx.client.as_ref()).await {
        output::print_success(form.message.as_deref().unwrap_or_default(), format);
        Ok(())
    } else {
        anyhow::bail!(form.error.unwrap_or_default())
    }
}

/// Complete a reset using the token and email from a reset link.
pub async fn reset_password(
    ctx: &Context,
    link: Option<String>,
    token: Option<String>,
    email: Option<String>,
    format: &OutputFormat,
) -> Result<()> {
    let mut reset_link = link.as_deref().map(ResetLink::from_url).unwrap_or_default();
    if let Some(token) = token {
        reset_link.token = token;
    }
    if let Some(email) = email {
        reset_link.email = email;
    }

    let mut form = ResetPasswordForm::new(reset_link);
    if form.link.is_complete() {
        form.password = rpassword::prompt_password("New password: ")?;
        form.confirm = rpassword::prompt_password("Confirm password: ")?;
    }

    if form.submit(ctx.client.as_ref()).await {
        output::print_success(form.ok.as_deref().unwrap_or_default(), format);
        if form.redirect().is_some() && *format == OutputFormat::Text {
            println!("Run 'toma login' to sign in with your new password.");
        }
        Ok(())
    } else {
        anyhow::bail!(form.error.unwrap_or_default())
    }
}
