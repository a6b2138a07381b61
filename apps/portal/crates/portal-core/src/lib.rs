//! Screen state and controllers for the Toma customer portal.
//!
//! Everything here is UI-agnostic: the terminal dashboard and the one-shot
//! CLI commands drive the same controllers.
//!
//! | Module | Screen |
//! |--------|--------|
//! | [`reset`] | Forgot password, reset completion |
//! | [`settings`] | Integration settings form |
//! | [`nav`] | Sidebar, routes, logout |
//!
//! Controllers take a [`portal_api::PortalApi`] so tests can run them
//! against a scripted fake.

pub mod nav;
pub mod notice;
pub mod reset;
pub mod settings;

#[cfg(test)]
mod testing;

pub use nav::{end_session, Route, Sidebar, SidebarEntry, SidebarFooter};
pub use notice::{Notice, NoticeLevel};
pub use reset::{ForgotPasswordForm, ResetLink, ResetPasswordForm, REDIRECT_DELAY};
pub use settings::{
    parse_id_list, AuthIssue, PageList, ScreenView, SettingsForm, SettingsScreen,
};
