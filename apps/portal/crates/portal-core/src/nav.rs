//! Routes and the customer sidebar.

use portal_api::PortalApi;
use portal_storage::{SessionContext, SessionUser};

pub const SETTINGS_PATH: &str = "/customer/Settings";
const SETTINGS_PREFIX: &str = "/customer/settings";

/// Where the UI should go next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    ForgotPassword,
    ResetPassword,
    Page(String),
}

impl Route {
    pub fn settings() -> Self {
        Route::Page(SETTINGS_PATH.to_string())
    }

    pub fn path(&self) -> &str {
        match self {
            Route::Login => "/",
            Route::ForgotPassword => "/forgot-password",
            Route::ResetPassword => "/reset-password",
            Route::Page(path) => path,
        }
    }

    pub fn from_path(path: &str) -> Self {
        match path {
            "/" | "/login" => Route::Login,
            "/forgot-password" => Route::ForgotPassword,
            "/reset-password" => Route::ResetPassword,
            other => Route::Page(other.to_string()),
        }
    }

    pub fn is_settings(&self) -> bool {
        is_on_settings(self.path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub path: &'static str,
    pub label: &'static str,
}

pub const PRIMARY_LINKS: [NavItem; 6] = [
    NavItem {
        path: "/customer/blog/list",
        label: "Blog Automation",
    },
    NavItem {
        path: "/customer/youtube/list",
        label: "YouTube Automation",
    },
    NavItem {
        path: "/customer/topic/list",
        label: "Topic Automation",
    },
    NavItem {
        path: "/customer/launch/list",
        label: "Launch Automation",
    },
    NavItem {
        path: "/customer/tips",
        label: "Tips & Tricks",
    },
    NavItem {
        path: "/customer/training",
        label: "Training Videos",
    },
];

pub const SETTINGS_LINKS: [NavItem; 1] = [NavItem {
    path: SETTINGS_PATH,
    label: "API Settings",
}];

/// Case-insensitive check for the settings section.
pub fn is_on_settings(path: &str) -> bool {
    path.to_lowercase().starts_with(SETTINGS_PREFIX)
}

fn link_is_active(current: &str, target: &str) -> bool {
    let current = current.to_lowercase();
    let target = target.to_lowercase();
    current == target || current.starts_with(&format!("{}/", target))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Link(NavItem),
    SettingsToggle,
    SettingsLink(NavItem),
}

/// One row of the rendered sidebar. `label` is `None` while collapsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarEntry {
    pub kind: EntryKind,
    pub label: Option<&'static str>,
    pub active: bool,
}

/// Footer identity block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarFooter {
    pub display: String,
    pub initial: String,
    /// Customer accounts only.
    pub company: Option<String>,
    /// Customer accounts only; `—` when unknown.
    pub customer_number: Option<String>,
}

impl SidebarFooter {
    pub fn new(
        user: Option<&SessionUser>,
        business_name: Option<String>,
        customer_number: Option<&str>,
    ) -> Self {
        let display = user
            .and_then(|u| u.name.as_deref().filter(|n| !n.is_empty()))
            .or_else(|| user.and_then(|u| u.email.as_deref().filter(|e| !e.is_empty())))
            .unwrap_or("Guest")
            .to_string();

        let initial = display
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect::<String>())
            .unwrap_or_else(|| "?".to_string());

        let is_customer = user.map(SessionUser::is_customer).unwrap_or(false);
        let (company, customer_number) = if is_customer {
            (
                business_name.filter(|b| !b.is_empty()),
                Some(customer_number.unwrap_or("—").to_string()),
            )
        } else {
            (None, None)
        };

        Self {
            display,
            initial,
            company,
            customer_number,
        }
    }
}

/// Sidebar state: collapse, mobile overlay, settings sub-menu and the
/// keyboard cursor.
#[derive(Debug, Clone)]
pub struct Sidebar {
    pub collapsed: bool,
    pub open: bool,
    settings_open: bool,
    logging_out: bool,
    current_path: String,
    selected: usize,
}

impl Sidebar {
    pub fn new(path: &str) -> Self {
        Self {
            collapsed: false,
            open: false,
            settings_open: is_on_settings(path),
            logging_out: false,
            current_path: path.to_string(),
            selected: 0,
        }
    }

    pub fn current_path(&self) -> &str {
        &self.current_path
    }

    pub fn settings_open(&self) -> bool {
        self.settings_open
    }

    pub fn logging_out(&self) -> bool {
        self.logging_out
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Track a route change. Entering settings forces the sub-menu open;
    /// leaving it keeps whatever the user chose.
    pub fn on_navigate(&mut self, path: &str) {
        self.current_path = path.to_string();
        if is_on_settings(path) {
            self.settings_open = true;
        }
        self.clamp_selection();
    }

    pub fn toggle_collapsed(&mut self) {
        self.collapsed = !self.collapsed;
        self.clamp_selection();
    }

    /// Settings header. Collapsed: jump straight to the settings page.
    /// Expanded: toggle the sub-menu.
    pub fn activate_settings(&mut self) -> Option<Route> {
        if self.collapsed {
            self.open = false;
            return Some(Route::settings());
        }
        self.settings_open = !self.settings_open;
        self.clamp_selection();
        None
    }

    pub fn visible_entries(&self) -> Vec<SidebarEntry> {
        let label = |text: &'static str| (!self.collapsed).then_some(text);
        let on_settings = is_on_settings(&self.current_path);

        let mut entries: Vec<SidebarEntry> = PRIMARY_LINKS
            .iter()
            .map(|item| SidebarEntry {
                kind: EntryKind::Link(*item),
                label: label(item.label),
                active: link_is_active(&self.current_path, item.path),
            })
            .collect();

        entries.push(SidebarEntry {
            kind: EntryKind::SettingsToggle,
            label: label("Settings"),
            active: on_settings,
        });

        if !self.collapsed && self.settings_open {
            entries.extend(SETTINGS_LINKS.iter().map(|item| SidebarEntry {
                kind: EntryKind::SettingsLink(*item),
                label: Some(item.label),
                active: on_settings || link_is_active(&self.current_path, item.path),
            }));
        }

        entries
    }

    pub fn select_next(&mut self) {
        let len = self.visible_entries().len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    pub fn select_prev(&mut self) {
        let len = self.visible_entries().len();
        if len > 0 {
            self.selected = (self.selected + len - 1) % len;
        }
    }

    /// Activate the entry under the cursor.
    pub fn activate_selected(&mut self) -> Option<Route> {
        let entry = self.visible_entries().into_iter().nth(self.selected)?;
        match entry.kind {
            EntryKind::Link(item) | EntryKind::SettingsLink(item) => {
                self.open = false;
                Some(Route::Page(item.path.to_string()))
            }
            EntryKind::SettingsToggle => self.activate_settings(),
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_entries().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    /// Mark a logout in progress. Returns false if one is already running.
    pub fn begin_logout(&mut self) -> bool {
        if self.logging_out {
            return false;
        }
        self.logging_out = true;
        true
    }

    pub fn finish_logout(&mut self) -> Route {
        self.logging_out = false;
        Route::Login
    }

    /// End the session and route to login, whatever the server says.
    pub async fn logout(&mut self, api: &dyn PortalApi, session: &SessionContext) -> Route {
        if !self.begin_logout() {
            return Route::Login;
        }
        end_session(api, session).await;
        self.finish_logout()
    }
}

/// `POST /logout`, then drop local credentials even if the call failed.
pub async fn end_session(api: &dyn PortalApi, session: &SessionContext) {
    if let Err(e) = api.logout().await {
        tracing::warn!(error = %e, "logout request failed, clearing local session anyway");
    }
    if let Err(e) = session.clear() {
        tracing::warn!(error = %e, "failed to clear stored session");
    }
}
