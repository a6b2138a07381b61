//! Application state for the dashboard.

use super::theme::{Theme, ThemeMode};
use chrono::{DateTime, Local};
use portal_api::{PortalApi, SettingsField};
use portal_core::nav::{PRIMARY_LINKS, SETTINGS_LINKS};
use portal_core::settings::{LoadResult, SaveResult};
use portal_core::{
    end_session, ForgotPasswordForm, Notice, PageList, ResetLink, ResetPasswordForm, Route,
    ScreenView, SettingsScreen, Sidebar, SidebarFooter,
};
use portal_storage::SessionContext;
use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

const LOGIN_HINT: &str = "Run 'toma login' to sign in.";
const LOGGED_OUT: &str = "Logged out. Run 'toma login' to sign in again.";
const PASSWORD_UPDATED: &str = "Password updated. Run 'toma login' to sign in with your new password.";

/// How long a toast stays in the status bar.
pub const TOAST_TTL: Duration = Duration::from_secs(4);
const MAX_TOASTS: usize = 5;

/// Active panel in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Sidebar,
    Main,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Rows of the settings form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsRow {
    Field(SettingsField),
    LinkedinActive,
    Pages(PageList),
    Save,
}

pub fn settings_rows() -> Vec<SettingsRow> {
    let mut rows: Vec<SettingsRow> = SettingsField::ALL
        .into_iter()
        .filter(|f| f.is_secret())
        .map(SettingsRow::Field)
        .collect();
    for field in SettingsField::ALL.into_iter().filter(|f| !f.is_secret()) {
        rows.push(SettingsRow::Field(field));
        if field == SettingsField::LinkedinId {
            rows.push(SettingsRow::LinkedinActive);
        }
    }
    rows.push(SettingsRow::Pages(PageList::Facebook));
    rows.push(SettingsRow::Pages(PageList::Linkedin));
    rows.push(SettingsRow::Save);
    rows
}

/// Rows of the password reset forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormRow {
    Email,
    Password,
    Confirm,
    Submit,
    BackToLogin,
}

pub const FORGOT_ROWS: [FormRow; 3] = [FormRow::Email, FormRow::Submit, FormRow::BackToLogin];
pub const RESET_ROWS: [FormRow; 4] = [
    FormRow::Password,
    FormRow::Confirm,
    FormRow::Submit,
    FormRow::BackToLogin,
];

/// What the main panel shows.
pub enum Screen {
    Settings(SettingsScreen),
    ForgotPassword(ForgotPasswordForm),
    ResetPassword(ResetPasswordForm),
    /// Pages that only exist in the web dashboard.
    Placeholder(String),
}

/// A notice with the time it was raised.
#[derive(Debug, Clone)]
pub struct Toast {
    pub notice: Notice,
    pub raised_at: DateTime<Local>,
    shown: Instant,
}

/// Result of a background request, tagged with the navigation it belongs to.
#[derive(Debug)]
pub struct TaskResult {
    nav: u64,
    kind: TaskKind,
}

#[derive(Debug)]
enum TaskKind {
    SettingsLoaded(LoadResult),
    SettingsSaved(SaveResult),
    ForgotDone(ForgotPasswordForm),
    ResetDone(ResetPasswordForm),
    LoggedOut,
}

/// Main application state.
pub struct App {
    pub theme: Theme,
    pub active_panel: Panel,
    pub input_mode: InputMode,

    pub route: Route,
    pub sidebar: Sidebar,
    pub screen: Screen,
    pub main_selected: usize,
    pub edit_buffer: String,

    pub toasts: VecDeque<Toast>,
    pub show_account_dialog: bool,
    pub spinner_frame: usize,

    pub should_quit: bool,
    /// Printed after the terminal is restored.
    pub exit_message: Option<String>,

    customer_number: Option<String>,
    nav: u64,
    redirect: Option<(Route, Instant)>,
    api: Arc<dyn PortalApi>,
    session: SessionContext,
    task_tx: mpsc::Sender<TaskResult>,
    pub task_rx: mpsc::Receiver<TaskResult>,
}

impl App {
    pub fn new(
        api: Arc<dyn PortalApi>,
        session: SessionContext,
        theme_mode: ThemeMode,
        route: Route,
        link: Option<ResetLink>,
    ) -> Self {
        let (task_tx, task_rx) = mpsc::channel(16);
        let mut app = Self {
            theme: Theme::from_mode(theme_mode),
            active_panel: Panel::Main,
            input_mode: InputMode::Normal,
            route: route.clone(),
            sidebar: Sidebar::new(route.path()),
            screen: Screen::Placeholder(String::new()),
            main_selected: 0,
            edit_buffer: String::new(),
            toasts: VecDeque::new(),
            show_account_dialog: false,
            spinner_frame: 0,
            should_quit: false,
            exit_message: None,
            customer_number: None,
            nav: 0,
            redirect: None,
            api,
            session,
            task_tx,
            task_rx,
        };
        app.open(route, link);
        app
    }

    /// Forgot/reset pages render without the dashboard chrome.
    pub fn is_public(&self) -> bool {
        matches!(self.route, Route::ForgotPassword | Route::ResetPassword)
    }

    pub fn navigate(&mut self, route: Route) {
        self.open(route, None);
    }

    fn open(&mut self, route: Route, link: Option<ResetLink>) {
        if let Screen::Settings(screen) = &mut self.screen {
            screen.detach();
        }
        self.nav += 1;
        self.redirect = None;
        self.main_selected = 0;
        self.input_mode = InputMode::Normal;
        self.edit_buffer.clear();
        tracing::debug!(path = route.path(), "navigate");

        self.screen = match &route {
            Route::Login => {
                self.should_quit = true;
                if self.exit_message.is_none() {
                    self.exit_message = Some(LOGIN_HINT.to_string());
                }
                Screen::Placeholder(String::new())
            }
            Route::ForgotPassword => {
                let email = link.map(|l| l.email).unwrap_or_default();
                Screen::ForgotPassword(ForgotPasswordForm::new(email))
            }
            Route::ResetPassword => {
                Screen::ResetPassword(ResetPasswordForm::new(link.unwrap_or_default()))
            }
            page if page.is_settings() => Screen::Settings(SettingsScreen::new(self.session.clone())),
            Route::Page(path) => Screen::Placeholder(page_title(path)),
        };

        self.sidebar.on_navigate(route.path());
        self.route = route;
        if self.is_public() {
            self.active_panel = Panel::Main;
        }
        self.start_settings_load();
    }

    fn spawn<F>(&self, task: F)
    where
        F: Future<Output = TaskKind> + Send + 'static,
    {
        let tx = self.task_tx.clone();
        let nav = self.nav;
        tokio::spawn(async move {
            let kind = task.await;
            if tx.send(TaskResult { nav, kind }).await.is_err() {
                tracing::debug!("dashboard closed before task finished");
            }
        });
    }

    /// (Re)load the settings screen. No-op elsewhere or while saving.
    pub fn start_settings_load(&mut self) {
        let Screen::Settings(screen) = &mut self.screen else {
            return;
        };
        if screen.is_saving() {
            return;
        }
        let ticket = screen.begin_load();
        let api = Arc::clone(&self.api);
        self.spawn(async move {
            TaskKind::SettingsLoaded(SettingsScreen::fetch(api.as_ref(), ticket).await)
        });
    }

    pub fn start_settings_save(&mut self) {
        let Screen::Settings(screen) = &mut self.screen else {
            return;
        };
        if screen.is_saving() || screen.is_loading() {
            return;
        }
        let Some(ticket) = screen.begin_save() else {
            self.push_notice(Notice::warn("Customer not loaded yet. Press r to retry."));
            return;
        };
        let api = Arc::clone(&self.api);
        self.spawn(async move {
            TaskKind::SettingsSaved(SettingsScreen::submit(api.as_ref(), ticket).await)
        });
    }

    pub fn submit_forgot(&mut self) {
        let Screen::ForgotPassword(form) = &mut self.screen else {
            return;
        };
        if form.loading {
            return;
        }
        let mut pending = form.clone();
        form.loading = true;
        let api = Arc::clone(&self.api);
        self.spawn(async move {
            pending.submit(api.as_ref()).await;
            TaskKind::ForgotDone(pending)
        });
    }

    pub fn submit_reset(&mut self) {
        let Screen::ResetPassword(form) = &mut self.screen else {
            return;
        };
        if form.loading {
            return;
        }
        let mut pending = form.clone();
        form.loading = true;
        let api = Arc::clone(&self.api);
        self.spawn(async move {
            pending.submit(api.as_ref()).await;
            TaskKind::ResetDone(pending)
        });
    }

    pub fn start_logout(&mut self) {
        if !self.sidebar.begin_logout() {
            return;
        }
        let api = Arc::clone(&self.api);
        let session = self.session.clone();
        self.spawn(async move {
            end_session(api.as_ref(), &session).await;
            TaskKind::LoggedOut
        });
    }

    /// Fold a finished background request into the state.
    pub fn handle_task(&mut self, result: TaskResult) {
        if let TaskKind::LoggedOut = result.kind {
            let route = self.sidebar.finish_logout();
            self.exit_message = Some(LOGGED_OUT.to_string());
            self.navigate(route);
            return;
        }
        if result.nav != self.nav {
            tracing::debug!(nav = result.nav, current = self.nav, "dropping result from a previous page");
            return;
        }

        match (result.kind, &mut self.screen) {
            (TaskKind::SettingsLoaded(loaded), Screen::Settings(screen)) => {
                screen.apply_load(loaded);
                if let Some(number) = screen.customer().and_then(|c| c.customer_number.clone()) {
                    self.customer_number = Some(number);
                }
            }
            (TaskKind::SettingsSaved(saved), Screen::Settings(screen)) => {
                screen.apply_save(saved);
            }
            (TaskKind::ForgotDone(done), Screen::ForgotPassword(form)) => *form = done,
            (TaskKind::ResetDone(done), Screen::ResetPassword(form)) => {
                if let Some((route, delay)) = done.redirect() {
                    self.exit_message = Some(PASSWORD_UPDATED.to_string());
                    self.redirect = Some((route, Instant::now() + delay));
                }
                *form = done;
            }
            _ => {}
        }

        if let Screen::Settings(screen) = &mut self.screen {
            for notice in screen.drain_notices() {
                self.push_notice(notice);
            }
        }
    }

    /// Housekeeping on every loop iteration.
    pub fn tick(&mut self, now: Instant) {
        if self.is_busy() {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }
        while self
            .toasts
            .front()
            .is_some_and(|t| now.duration_since(t.shown) >= TOAST_TTL)
        {
            self.toasts.pop_front();
        }
        if let Some((_, at)) = &self.redirect {
            if now >= *at {
                if let Some((route, _)) = self.redirect.take() {
                    self.navigate(route);
                }
            }
        }
    }

    pub fn push_notice(&mut self, notice: Notice) {
        if self.toasts.len() == MAX_TOASTS {
            self.toasts.pop_front();
        }
        self.toasts.push_back(Toast {
            notice,
            raised_at: Local::now(),
            shown: Instant::now(),
        });
    }

    pub fn is_busy(&self) -> bool {
        let screen_busy = match &self.screen {
            Screen::Settings(screen) => screen.is_loading() || screen.is_saving(),
            Screen::ForgotPassword(form) => form.loading,
            Screen::ResetPassword(form) => form.loading,
            Screen::Placeholder(_) => false,
        };
        screen_busy || self.sidebar.logging_out()
    }

    pub fn spinner_char(&self) -> char {
        const SPINNER_FRAMES: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
        SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()]
    }

    pub fn footer(&self) -> SidebarFooter {
        SidebarFooter::new(
            self.session.user().as_ref(),
            self.session.business_name(),
            self.customer_number.as_deref(),
        )
    }

    pub fn next_panel(&mut self) {
        if self.is_public() {
            return;
        }
        self.active_panel = match self.active_panel {
            Panel::Sidebar => Panel::Main,
            Panel::Main => Panel::Sidebar,
        };
    }

    /// Sidebar entry activated: follow the route it yields, if any.
    pub fn activate_sidebar(&mut self) {
        if let Some(route) = self.sidebar.activate_selected() {
            self.navigate(route);
            self.active_panel = Panel::Main;
        }
    }

    pub fn toggle_account_dialog(&mut self) {
        self.show_account_dialog = !self.show_account_dialog;
    }

    // Main panel rows

    fn main_row_count(&self) -> usize {
        match &self.screen {
            Screen::Settings(screen) if screen.view() == ScreenView::Form => settings_rows().len(),
            Screen::ForgotPassword(_) => FORGOT_ROWS.len(),
            Screen::ResetPassword(_) => RESET_ROWS.len(),
            _ => 0,
        }
    }

    pub fn main_down(&mut self) {
        let len = self.main_row_count();
        if len > 0 {
            self.main_selected = (self.main_selected + 1) % len;
        }
    }

    pub fn main_up(&mut self) {
        let len = self.main_row_count();
        if len > 0 {
            self.main_selected = (self.main_selected + len - 1) % len;
        }
    }

    pub fn selected_settings_row(&self) -> Option<SettingsRow> {
        match &self.screen {
            Screen::Settings(screen) if screen.view() == ScreenView::Form => {
                settings_rows().get(self.main_selected).copied()
            }
            _ => None,
        }
    }

    pub fn selected_form_row(&self) -> Option<FormRow> {
        match &self.screen {
            Screen::ForgotPassword(_) => FORGOT_ROWS.get(self.main_selected).copied(),
            Screen::ResetPassword(_) => RESET_ROWS.get(self.main_selected).copied(),
            _ => None,
        }
    }

    /// Enter on the main panel.
    pub fn activate_main(&mut self) {
        if let Some(row) = self.selected_settings_row() {
            match row {
                SettingsRow::Field(_) | SettingsRow::Pages(_) => self.begin_edit(),
                SettingsRow::LinkedinActive => self.toggle_linkedin(),
                SettingsRow::Save => self.start_settings_save(),
            }
            return;
        }

        if let Screen::Settings(screen) = &self.screen {
            if let ScreenView::AuthIssue(issue) = screen.view() {
                if issue.code != 403 {
                    self.navigate(Route::Login);
                }
            }
            return;
        }

        match self.selected_form_row() {
            Some(FormRow::Email | FormRow::Password | FormRow::Confirm) => self.begin_edit(),
            Some(FormRow::Submit) => {
                if matches!(self.screen, Screen::ForgotPassword(_)) {
                    self.submit_forgot();
                } else {
                    self.submit_reset();
                }
            }
            Some(FormRow::BackToLogin) => self.navigate(Route::Login),
            None => {}
        }
    }

    pub fn toggle_linkedin(&mut self) {
        if let Screen::Settings(screen) = &mut self.screen {
            if screen.view() == ScreenView::Form && !screen.is_saving() {
                screen.form_mut().toggle_linkedin_active();
            }
        }
    }

    /// Show or hide the selected API key.
    pub fn toggle_mask_selected(&mut self) {
        let Some(SettingsRow::Field(field)) = self.selected_settings_row() else {
            return;
        };
        if !field.is_secret() {
            return;
        }
        if let Screen::Settings(screen) = &mut self.screen {
            screen.form_mut().toggle_mask(field);
        }
    }

    fn editable_value(&self) -> Option<String> {
        match &self.screen {
            Screen::Settings(screen) => {
                if screen.is_saving() {
                    return None;
                }
                match self.selected_settings_row()? {
                    SettingsRow::Field(field) => Some(screen.form().field(field).to_string()),
                    SettingsRow::Pages(list) => Some(screen.form().pages_text(list).to_string()),
                    _ => None,
                }
            }
            Screen::ForgotPassword(form) if !form.loading => match self.selected_form_row()? {
                FormRow::Email => Some(form.email.clone()),
                _ => None,
            },
            Screen::ResetPassword(form) if !form.loading => match self.selected_form_row()? {
                FormRow::Password => Some(form.password.clone()),
                FormRow::Confirm => Some(form.confirm.clone()),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn begin_edit(&mut self) {
        if let Some(value) = self.editable_value() {
            self.edit_buffer = value;
            self.input_mode = InputMode::Editing;
        }
    }

    pub fn cancel_edit(&mut self) {
        self.edit_buffer.clear();
        self.input_mode = InputMode::Normal;
    }

    /// Write the edit buffer back into the selected row.
    pub fn commit_edit(&mut self) {
        let value = std::mem::take(&mut self.edit_buffer);
        self.input_mode = InputMode::Normal;
        let settings_row = self.selected_settings_row();
        let form_row = self.selected_form_row();

        match &mut self.screen {
            Screen::Settings(screen) => match settings_row {
                Some(SettingsRow::Field(field)) => screen.form_mut().set_field(field, value),
                Some(SettingsRow::Pages(list)) => screen.form_mut().set_pages_text(list, value),
                _ => {}
            },
            Screen::ForgotPassword(form) => {
                if form_row == Some(FormRow::Email) {
                    form.email = value;
                }
            }
            Screen::ResetPassword(form) => match form_row {
                Some(FormRow::Password) => form.password = value,
                Some(FormRow::Confirm) => form.confirm = value,
                _ => {}
            },
            Screen::Placeholder(_) => {}
        }
    }
}

fn page_title(path: &str) -> String {
    PRIMARY_LINKS
        .iter()
        .chain(SETTINGS_LINKS.iter())
        .find(|item| item.path.eq_ignore_ascii_case(path))
        .map(|item| item.label.to_string())
        .unwrap_or_else(|| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use portal_api::{
        ApiError, ApiResult, CustomerMeta, LoginResponse, MessageResponse, ResetPasswordRequest,
        Settings,
    };
    use portal_core::NoticeLevel;
    use portal_storage::MemoryStorage;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct StubApi {
        calls: Mutex<Vec<&'static str>>,
        fail_settings: Option<u16>,
    }

    impl StubApi {
        fn record(&self, op: &'static str) {
            self.calls.lock().unwrap().push(op);
        }
    }

    #[async_trait]
    impl PortalApi for StubApi {
        async fn forgot_password(&self, _email: &str) -> ApiResult<MessageResponse> {
            self.record("forgot_password");
            Ok(MessageResponse {
                message: Some("Check your inbox.".into()),
            })
        }

        async fn reset_password(&self, _request: &ResetPasswordRequest) -> ApiResult<MessageResponse> {
            self.record("reset_password");
            Ok(MessageResponse::default())
        }

        async fn current_customer_id(&self) -> ApiResult<u64> {
            self.record("current_customer_id");
            Ok(42)
        }

        async fn get_settings(&self, _customer_id: u64) -> ApiResult<Settings> {
            self.record("get_settings");
            if let Some(status) = self.fail_settings {
                return Err(ApiError::Http {
                    status,
                    message: "nope".into(),
                });
            }
            Ok(Settings::from_value(json!({
                "openai_api_key": "sk-123",
                "blotato_twitter_id": "tw",
                "blotato_linkeidin_active": "1",
                "blotato_facebook_page_ids": ["1", "2"],
            }))
            .unwrap())
        }

        async fn get_customer(&self, customer_id: u64) -> ApiResult<Option<CustomerMeta>> {
            self.record("get_customer");
            Ok(Some(CustomerMeta {
                id: Some(customer_id),
                customer_number: Some("C-0042".into()),
                business_name: Some("Acme".into()),
                ..Default::default()
            }))
        }

        async fn update_settings(&self, _customer_id: u64, _settings: &Settings) -> ApiResult<()> {
            self.record("update_settings");
            Ok(())
        }

        async fn login(&self, _email: &str, _password: &str) -> ApiResult<LoginResponse> {
            unreachable!("the dashboard never logs in")
        }

        async fn logout(&self) -> ApiResult<()> {
            self.record("logout");
            Err(ApiError::Network("offline".into()))
        }
    }

    fn session() -> SessionContext {
        let session = SessionContext::new(Arc::new(MemoryStorage::new()));
        session.set_token("tok").unwrap();
        session
    }

    fn app_with(api: StubApi, route: Route, link: Option<ResetLink>) -> App {
        App::new(Arc::new(api), session(), ThemeMode::Terminal, route, link)
    }

    async fn settle(app: &mut App) {
        let result = app.task_rx.recv().await.unwrap();
        app.handle_task(result);
    }

    #[test]
    fn settings_rows_group_keys_first_and_end_with_save() {
        let rows = settings_rows();
        assert_eq!(rows[0], SettingsRow::Field(SettingsField::OpenaiApiKey));
        assert_eq!(rows[1], SettingsRow::Field(SettingsField::BlotatoApiKey));
        let linkedin = rows
            .iter()
            .position(|r| *r == SettingsRow::Field(SettingsField::LinkedinId))
            .unwrap();
        assert_eq!(rows[linkedin + 1], SettingsRow::LinkedinActive);
        assert_eq!(rows.last(), Some(&SettingsRow::Save));
        assert_eq!(rows.len(), 11 + 1 + 2 + 1);
    }

    #[test]
    fn page_title_uses_nav_labels() {
        assert_eq!(page_title("/customer/tips"), "Tips & Tricks");
        assert_eq!(page_title("/customer/unknown"), "/customer/unknown");
    }

    #[tokio::test]
    async fn settings_page_loads_in_background() {
        let mut app = app_with(StubApi::default(), Route::settings(), None);
        assert!(app.is_busy());

        settle(&mut app).await;

        let Screen::Settings(screen) = &app.screen else {
            panic!("expected settings screen");
        };
        assert!(!screen.is_loading());
        assert_eq!(screen.customer_id(), Some(42));
        assert_eq!(screen.form().field(SettingsField::TwitterId), "tw");
        assert!(screen.form().linkedin_active());
        assert_eq!(screen.form().pages_text(PageList::Facebook), "1, 2");
        assert_eq!(app.footer().customer_number, None);
    }

    #[tokio::test]
    async fn results_from_a_previous_page_are_dropped() {
        let mut app = app_with(
            StubApi {
                fail_settings: Some(500),
                ..Default::default()
            },
            Route::settings(),
            None,
        );
        app.navigate(Route::Page("/customer/tips".into()));

        settle(&mut app).await;

        assert!(matches!(&app.screen, Screen::Placeholder(title) if title == "Tips & Tricks"));
        assert!(app.toasts.is_empty());
    }

    #[tokio::test]
    async fn forbidden_load_shows_issue_and_toast() {
        let mut app = app_with(
            StubApi {
                fail_settings: Some(403),
                ..Default::default()
            },
            Route::settings(),
            None,
        );
        settle(&mut app).await;

        let Screen::Settings(screen) = &app.screen else {
            panic!("expected settings screen");
        };
        assert!(matches!(screen.view(), ScreenView::AuthIssue(issue) if issue.code == 403));
        assert_eq!(app.toasts.len(), 1);
        assert_eq!(app.toasts[0].notice.level, NoticeLevel::Error);
        assert_eq!(app.main_row_count(), 0);
    }

    #[tokio::test]
    async fn editing_a_field_and_saving() {
        let mut app = app_with(StubApi::default(), Route::settings(), None);
        settle(&mut app).await;

        // third row is the first Blotato id
        app.main_down();
        app.main_down();
        assert_eq!(
            app.selected_settings_row(),
            Some(SettingsRow::Field(SettingsField::TwitterId))
        );
        app.activate_main();
        assert_eq!(app.input_mode, InputMode::Editing);
        assert_eq!(app.edit_buffer, "tw");
        app.edit_buffer = "tw-2".into();
        app.commit_edit();
        assert_eq!(app.input_mode, InputMode::Normal);

        app.start_settings_save();
        settle(&mut app).await;

        let Screen::Settings(screen) = &app.screen else {
            panic!("expected settings screen");
        };
        assert_eq!(screen.form().field(SettingsField::TwitterId), "tw-2");
        assert!(!screen.is_saving());
        assert_eq!(app.toasts.back().unwrap().notice.level, NoticeLevel::Success);
    }

    #[tokio::test]
    async fn reload_is_ignored_while_saving() {
        let mut app = app_with(StubApi::default(), Route::settings(), None);
        settle(&mut app).await;

        app.start_settings_save();
        app.start_settings_load();
        settle(&mut app).await;

        let Screen::Settings(screen) = &app.screen else {
            panic!("expected settings screen");
        };
        assert!(!screen.is_saving());
        assert!(!screen.is_loading());
        assert!(app.task_rx.try_recv().is_err());
        assert_eq!(app.toasts.back().unwrap().notice.level, NoticeLevel::Success);
        assert_eq!(app.main_row_count(), settings_rows().len());
    }

    #[tokio::test]
    async fn secret_rows_toggle_mask() {
        let mut app = app_with(StubApi::default(), Route::settings(), None);
        settle(&mut app).await;

        app.toggle_mask_selected();
        let Screen::Settings(screen) = &app.screen else {
            panic!("expected settings screen");
        };
        assert!(screen.form().is_revealed(SettingsField::OpenaiApiKey));
        assert_eq!(screen.form().display_value(SettingsField::OpenaiApiKey), "sk-123");
    }

    #[tokio::test]
    async fn logout_quits_even_when_server_fails() {
        let mut app = app_with(StubApi::default(), Route::Page("/customer/tips".into()), None);
        app.start_logout();
        assert!(app.sidebar.logging_out());

        settle(&mut app).await;

        assert!(app.should_quit);
        assert_eq!(app.exit_message.as_deref(), Some(LOGGED_OUT));
        assert_eq!(app.route, Route::Login);
        assert_eq!(app.footer().display, "Guest");
    }

    #[tokio::test]
    async fn forgot_password_shows_server_message() {
        let mut app = app_with(StubApi::default(), Route::ForgotPassword, None);
        assert!(app.is_public());

        app.activate_main();
        app.edit_buffer = "a@b.co".into();
        app.commit_edit();
        app.main_down();
        app.activate_main();
        assert!(app.is_busy());

        settle(&mut app).await;

        let Screen::ForgotPassword(form) = &app.screen else {
            panic!("expected forgot password screen");
        };
        assert!(!form.loading);
        assert_eq!(form.message.as_deref(), Some("Check your inbox."));
    }

    #[tokio::test]
    async fn empty_email_is_rejected_without_request() {
        let mut app = app_with(StubApi::default(), Route::ForgotPassword, None);
        app.main_down();
        app.activate_main();
        settle(&mut app).await;

        let Screen::ForgotPassword(form) = &app.screen else {
            panic!("expected forgot password screen");
        };
        assert!(!form.loading);
        assert_eq!(form.error.as_deref(), Some("Email is required."));
    }

    #[tokio::test]
    async fn reset_success_redirects_to_login_after_delay() {
        let link = ResetLink::new("t1", "a@b.co");
        let mut app = app_with(StubApi::default(), Route::ResetPassword, Some(link));

        for value in ["secret1", "secret1"] {
            app.activate_main();
            app.edit_buffer = value.into();
            app.commit_edit();
            app.main_down();
        }
        assert_eq!(app.selected_form_row(), Some(FormRow::Submit));
        app.activate_main();
        settle(&mut app).await;

        app.tick(Instant::now());
        assert!(!app.should_quit);

        app.tick(Instant::now() + Duration::from_secs(2));
        assert!(app.should_quit);
        assert_eq!(app.exit_message.as_deref(), Some(PASSWORD_UPDATED));
    }

    #[tokio::test]
    async fn collapsed_settings_header_jumps_to_settings() {
        let mut app = app_with(StubApi::default(), Route::Page("/customer/tips".into()), None);
        app.sidebar.toggle_collapsed();
        app.active_panel = Panel::Sidebar;

        // six links, then the settings header
        for _ in 0..6 {
            app.sidebar.select_next();
        }
        app.activate_sidebar();

        assert!(app.route.is_settings());
        assert!(matches!(app.screen, Screen::Settings(_)));
        assert_eq!(app.active_panel, Panel::Main);
    }

    #[test]
    fn toasts_expire() {
        let mut app = app_with(StubApi::default(), Route::Page("/customer/tips".into()), None);
        app.push_notice(Notice::success("ok"));
        app.tick(Instant::now());
        assert_eq!(app.toasts.len(), 1);
        app.tick(Instant::now() + TOAST_TTL);
        assert!(app.toasts.is_empty());
    }
}
