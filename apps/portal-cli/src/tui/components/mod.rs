//! Dashboard panels and overlays.

pub mod account_dialog;
pub mod reset_panel;
pub mod settings_panel;
pub mod sidebar;
