//! Toma CLI - terminal dashboard for the Toma customer portal.

mod commands;
mod output;
mod tui;

use clap::{Parser, Subcommand, ValueEnum};
use portal_config::{Config, Paths};
use portal_core::{ResetLink, Route};
use tracing::debug;

/// Toma CLI - manage your integration settings from the terminal.
#[derive(Parser)]
#[command(name = "toma")]
#[command(about = "Toma CLI for account access and integration settings")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Launch the interactive terminal dashboard
    #[arg(long)]
    ui: bool,

    /// Page to open in the dashboard, e.g. "/customer/Settings" or a reset link
    #[arg(long, requires = "ui")]
    open: Option<String>,

    /// Use terminal-adaptive colors instead of the Toma theme (only with --ui)
    #[arg(long)]
    terminal_colors: bool,

    /// Output format (text or json)
    #[arg(short, long, default_value = "text", global = true)]
    format: output::OutputFormat,

    /// Log level (trace, debug, info, warn, error). Defaults to the config file value.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Backend origin for this run, e.g. https://app.toma.io (`/api` is appended)
    #[arg(long, global = true, env = "TOMA_API_BASE")]
    api_base: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Login with email and password
    Login {
        /// Account email (prompted when omitted)
        #[arg(short, long)]
        email: Option<String>,
    },

    /// Logout and clear the stored session
    Logout,

    /// Show the stored session
    Status,

    /// Email a password reset link
    ForgotPassword {
        /// Account email (prompted when omitted)
        #[arg(short, long)]
        email: Option<String>,
    },

    /// Choose a new password using a reset link
    ResetPassword {
        /// Full reset link as received by email
        #[arg(long, conflicts_with_all = ["token", "email"])]
        link: Option<String>,
        /// Reset token
        #[arg(long)]
        token: Option<String>,
        /// Account email
        #[arg(long)]
        email: Option<String>,
    },

    /// Manage integration settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
}

#[derive(Subcommand)]
enum SettingsCommands {
    /// Show the current settings
    Show {
        /// Print API keys in clear text
        #[arg(long)]
        reveal: bool,
    },
    /// Set a field, e.g. `toma settings set twitter 12345`
    Set {
        /// Field key or short name (openai, blotato, twitter, linkedin, facebook, ...)
        field: String,
        /// New value
        value: String,
    },
    /// Switch LinkedIn posting on or off
    Linkedin {
        #[arg(value_enum)]
        state: Switch,
    },
    /// Replace a page id list
    Pages {
        /// facebook or linkedin
        list: String,
        /// Comma-separated ids, e.g. "123, 456"
        ids: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Switch {
    On,
    Off,
}

/// Config file and environment, then the `--api-base` flag on top.
fn load_config(paths: &Paths, api_base: Option<String>) -> portal_config::CoreResult<Config> {
    let mut config = Config::load(paths)?;
    if let Some(base) = api_base.filter(|b| !b.trim().is_empty()) {
        config.api_base = base;
        config.validate()?;
    }
    Ok(config)
}

/// Route and reset link for `--open`.
fn start_route(open: Option<&str>) -> (Route, Option<ResetLink>) {
    let Some(target) = open else {
        return (Route::settings(), None);
    };
    let path = target
        .split(['?', '#'])
        .next()
        .unwrap_or_default();
    // full URLs: keep only the path
    let path = match path.find("://") {
        Some(idx) => {
            let rest = &path[idx + 3..];
            rest.find('/').map(|i| &rest[i..]).unwrap_or("/")
        }
        None => path,
    };

    let route = Route::from_path(path);
    let link = (route == Route::ResetPassword).then(|| ResetLink::from_url(target));
    (route, link)
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let paths = match Paths::new() {
        Ok(paths) => paths,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let config = match load_config(&paths, cli.api_base.clone()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    // The dashboard owns the terminal, so it only logs to the file.
    let level = cli.log_level.clone().unwrap_or_else(|| config.log_level.clone());
    if cli.ui {
        portal_config::init_logging_for_service(&paths, "tui", &level, false);
    } else {
        portal_config::init_logging(&paths, &level, false);
    }

    let ctx = commands::Context::new(paths, config);
    debug!(api = %ctx.config.api_root(), "starting");

    let result = if cli.ui && cli.command.is_none() {
        let (route, link) = start_route(cli.open.as_deref());
        let public = matches!(route, Route::ForgotPassword | Route::ResetPassword);
        if !public {
            if let Err(e) = commands::ensure_authenticated(&ctx).await {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        let theme_mode = if cli.terminal_colors {
            tui::ThemeMode::Terminal
        } else {
            tui::ThemeMode::Toma
        };
        match tui::run(ctx.clone(), route, link, theme_mode).await {
            Ok(Some(message)) => {
                println!("{}", message);
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(e) => Err(e),
        }
    } else if let Some(command) = cli.command {
        let format = &cli.format;
        match command {
            Commands::Login { email } => commands::login(&ctx, email, format).await,
            Commands::Logout => commands::logout(&ctx, format).await,
            Commands::Status => commands::status(&ctx, format).await,
            Commands::ForgotPassword { email } => {
                commands::forgot_password(&ctx, email, format).await
            }
            Commands::ResetPassword { link, token, email } => {
                commands::reset_password(&ctx, link, token, email, format).await
            }
            Commands::Settings { command } => match command {
                SettingsCommands::Show { reveal } => {
                    commands::settings_show(&ctx, reveal, format).await
                }
                SettingsCommands::Set { field, value } => {
                    commands::settings_set(&ctx, &field, &value, format).await
                }
                SettingsCommands::Linkedin { state } => {
                    commands::settings_linkedin(&ctx, matches!(state, Switch::On), format).await
                }
                SettingsCommands::Pages { list, ids } => {
                    commands::settings_pages(&ctx, &list, &ids, format).await
                }
            },
        }
    } else {
        if ctx.session.has_token() {
            println!("Signed in. Use 'toma --ui' to open the dashboard.");
        } else {
            println!("Not signed in. Run 'toma login' to get started.");
        }
        Ok(())
    };

    if let Err(e) = result {
        output::print_error(&e.to_string(), &cli.format);
        std::process::exit(1);
    }
}
