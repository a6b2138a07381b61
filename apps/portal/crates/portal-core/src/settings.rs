//! Integration settings: the editable form and the screen controller that
//! loads and saves it.
//!
//! Loading resolves the customer id from the session, then fetches the
//! settings record and the customer record concurrently. Each outcome is
//! handled on its own: a failed customer lookup never hides the form, and a
//! failed settings fetch is classified into an auth issue or an error banner.
//!
//! Network work runs through tickets so the UI can spawn it:
//!
//! ```ignore
//! let ticket = screen.begin_load();
//! let result = SettingsScreen::fetch(api.as_ref(), ticket).await;
//! screen.apply_load(result); // dropped if the screen moved on meanwhile
//! ```

use crate::notice::Notice;
use portal_api::{ApiError, ApiResult, CustomerMeta, ErrorKind, PortalApi, Settings, SettingsField};
use portal_storage::SessionContext;
use std::collections::HashSet;

pub const MASK_CHAR: char = '•';

const IDENTITY_FALLBACK: &str = "Failed to fetch customer id";
const UNAUTHENTICATED: &str = "Unauthenticated. Please sign in again.";
const SESSION_EXPIRED: &str = "Session expired. Please sign in again.";
const SAVED: &str = "Settings saved.";

/// Split a comma-separated id list, trimming and dropping empty parts.
pub fn parse_id_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

fn join_id_list(ids: Option<&Vec<String>>) -> String {
    ids.map(|ids| ids.join(", ")).unwrap_or_default()
}

/// The two free-text page id lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageList {
    Facebook,
    Linkedin,
}

impl PageList {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "facebook" | "fb" => Some(PageList::Facebook),
            "linkedin" | "li" => Some(PageList::Linkedin),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PageList::Facebook => "Facebook Page IDs",
            PageList::Linkedin => "LinkedIn Page IDs",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            PageList::Facebook => "123, 456, 789",
            PageList::Linkedin => "urn:li:organization:123, urn:li:organization:456",
        }
    }
}

/// Editable copy of a settings record.
///
/// Page id lists are edited as text and only parsed when building the save
/// payload. Secret fields are masked on screen until revealed; masking never
/// changes the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsForm {
    settings: Settings,
    facebook_pages_text: String,
    linkedin_pages_text: String,
    revealed: HashSet<SettingsField>,
}

impl SettingsForm {
    pub fn from_settings(settings: Settings) -> Self {
        Self {
            facebook_pages_text: join_id_list(settings.blotato_facebook_page_ids.as_ref()),
            linkedin_pages_text: join_id_list(settings.blotato_linkeidin_page_ids.as_ref()),
            settings,
            revealed: HashSet::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Current value, empty when unset.
    pub fn field(&self, field: SettingsField) -> &str {
        self.settings.get(field).unwrap_or_default()
    }

    pub fn set_field(&mut self, field: SettingsField, value: impl Into<String>) {
        self.settings.set(field, Some(value.into()));
    }

    pub fn linkedin_active(&self) -> bool {
        self.settings.blotato_linkeidin_active
    }

    pub fn set_linkedin_active(&mut self, active: bool) {
        self.settings.blotato_linkeidin_active = active;
    }

    pub fn toggle_linkedin_active(&mut self) {
        self.settings.blotato_linkeidin_active = !self.settings.blotato_linkeidin_active;
    }

    pub fn pages_text(&self, list: PageList) -> &str {
        match list {
            PageList::Facebook => &self.facebook_pages_text,
            PageList::Linkedin => &self.linkedin_pages_text,
        }
    }

    pub fn set_pages_text(&mut self, list: PageList, text: impl Into<String>) {
        match list {
            PageList::Facebook => self.facebook_pages_text = text.into(),
            PageList::Linkedin => self.linkedin_pages_text = text.into(),
        }
    }

    pub fn is_revealed(&self, field: SettingsField) -> bool {
        !field.is_secret() || self.revealed.contains(&field)
    }

    /// Flip the mask of a secret field. Other fields are always visible.
    pub fn toggle_mask(&mut self, field: SettingsField) {
        if !field.is_secret() {
            return;
        }
        if !self.revealed.remove(&field) {
            self.revealed.insert(field);
        }
    }

    /// Value as it should be rendered.
    pub fn display_value(&self, field: SettingsField) -> String {
        let value = self.field(field);
        if self.is_revealed(field) {
            value.to_string()
        } else {
            value.chars().map(|_| MASK_CHAR).collect()
        }
    }

    /// Record to submit: the form with both page lists parsed from text.
    pub fn payload(&self) -> Settings {
        let mut payload = self.settings.clone();
        payload.blotato_facebook_page_ids = Some(parse_id_list(&self.facebook_pages_text));
        payload.blotato_linkeidin_page_ids = Some(parse_id_list(&self.linkedin_pages_text));
        payload
    }
}

/// A blocking authentication or permission problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthIssue {
    pub code: u16,
    pub text: String,
}

/// What the settings screen should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenView<'a> {
    Loading,
    AuthIssue(&'a AuthIssue),
    Form,
}

#[derive(Debug, Clone, Copy)]
enum Action {
    View,
    Modify,
}

impl Action {
    fn forbidden_issue(self) -> &'static str {
        match self {
            Action::View => "Forbidden. You lack permission to view settings.",
            Action::Modify => "Forbidden. You lack permission to modify settings.",
        }
    }

    fn forbidden_notice(self) -> &'static str {
        match self {
            Action::View => "You don’t have permission to view these settings.",
            Action::Modify => "You don’t have permission to modify these settings.",
        }
    }

    fn fallback(self) -> &'static str {
        match self {
            Action::View => "Failed to load settings.",
            Action::Modify => "Save failed",
        }
    }
}

/// Handle for an in-flight load.
#[derive(Debug, Clone, Copy)]
pub struct LoadTicket {
    generation: u64,
    customer_id: Option<u64>,
}

/// Outcome of [`SettingsScreen::fetch`].
#[derive(Debug)]
pub struct LoadResult {
    generation: u64,
    outcome: LoadOutcome,
}

#[derive(Debug)]
enum LoadOutcome {
    IdentityFailed(ApiError),
    Fetched {
        customer_id: u64,
        settings: ApiResult<Settings>,
        customer: ApiResult<Option<CustomerMeta>>,
    },
}

/// Handle for an in-flight save.
#[derive(Debug, Clone)]
pub struct SaveTicket {
    generation: u64,
    customer_id: u64,
    payload: Settings,
}

#[derive(Debug)]
pub struct SaveResult {
    generation: u64,
    result: ApiResult<()>,
}

/// Settings screen controller.
pub struct SettingsScreen {
    session: SessionContext,
    customer_id: Option<u64>,
    form: SettingsForm,
    customer: Option<CustomerMeta>,
    loading: bool,
    saving: bool,
    error: Option<String>,
    auth_issue: Option<AuthIssue>,
    notices: Vec<Notice>,
    generation: u64,
    save_generation: u64,
}

impl SettingsScreen {
    pub fn new(session: SessionContext) -> Self {
        Self {
            session,
            customer_id: None,
            form: SettingsForm::default(),
            customer: None,
            loading: true,
            saving: false,
            error: None,
            auth_issue: None,
            notices: Vec::new(),
            generation: 0,
            save_generation: 0,
        }
    }

    pub fn form(&self) -> &SettingsForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut SettingsForm {
        &mut self.form
    }

    pub fn customer_id(&self) -> Option<u64> {
        self.customer_id
    }

    pub fn customer(&self) -> Option<&CustomerMeta> {
        self.customer.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn auth_issue(&self) -> Option<&AuthIssue> {
        self.auth_issue.as_ref()
    }

    pub fn view(&self) -> ScreenView<'_> {
        if let Some(issue) = &self.auth_issue {
            ScreenView::AuthIssue(issue)
        } else if self.loading {
            ScreenView::Loading
        } else {
            ScreenView::Form
        }
    }

    /// Take the notices raised since the last call.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// `Customer #` header value.
    pub fn display_number(&self) -> String {
        self.customer
            .as_ref()
            .and_then(|c| c.customer_number.clone())
            .or_else(|| self.customer_id.map(|id| id.to_string()))
            .unwrap_or_else(|| "—".to_string())
    }

    /// Business name, else the account holder's name.
    pub fn display_name(&self) -> String {
        let customer = self.customer.as_ref();
        customer
            .and_then(|c| c.business_name.clone().filter(|n| !n.is_empty()))
            .or_else(|| {
                customer
                    .and_then(|c| c.user.as_ref())
                    .and_then(|u| u.name.clone())
                    .filter(|n| !n.is_empty())
            })
            .unwrap_or_else(|| "—".to_string())
    }

    /// Invalidate in-flight work, e.g. when the screen is left.
    pub fn detach(&mut self) {
        self.generation += 1;
        self.save_generation += 1;
    }

    fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// Start a load. Any earlier load result will be ignored; a save in
    /// flight still lands.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.loading = true;
        self.error = None;
        self.auth_issue = None;
        LoadTicket {
            generation: self.generation,
            customer_id: self.customer_id,
        }
    }

    /// Resolve the customer id if needed, then fetch settings and customer
    /// concurrently, letting both settle.
    pub async fn fetch(api: &dyn PortalApi, ticket: LoadTicket) -> LoadResult {
        let customer_id = match ticket.customer_id {
            Some(id) => id,
            None => match api.current_customer_id().await {
                Ok(id) => id,
                Err(e) => {
                    return LoadResult {
                        generation: ticket.generation,
                        outcome: LoadOutcome::IdentityFailed(e),
                    }
                }
            },
        };

        let (settings, customer) = tokio::join!(
            api.get_settings(customer_id),
            api.get_customer(customer_id)
        );

        LoadResult {
            generation: ticket.generation,
            outcome: LoadOutcome::Fetched {
                customer_id,
                settings,
                customer,
            },
        }
    }

    /// Fold a load result into the screen. Returns false if it was stale.
    pub fn apply_load(&mut self, result: LoadResult) -> bool {
        if !self.is_current(result.generation) {
            tracing::debug!(generation = result.generation, "dropping stale settings load");
            return false;
        }

        match result.outcome {
            LoadOutcome::IdentityFailed(e) => {
                tracing::warn!(error = %e, "could not resolve customer id");
                let message = non_empty(e.to_string()).unwrap_or_else(|| IDENTITY_FALLBACK.to_string());
                self.notices.push(Notice::error(message.clone()));
                self.error = Some(message);
            }
            LoadOutcome::Fetched {
                customer_id,
                settings,
                customer,
            } => {
                self.customer_id = Some(customer_id);

                match settings {
                    Ok(settings) => {
                        tracing::debug!(customer_id, "settings loaded");
                        self.form = SettingsForm::from_settings(settings);
                    }
                    Err(e) => self.report_failure(e, Action::View),
                }

                match customer {
                    Ok(Some(meta)) => self.set_customer(meta),
                    Ok(None) => {}
                    Err(e) => {
                        tracing::debug!(error = %e, customer_id, "customer lookup failed, ignoring");
                    }
                }
            }
        }

        self.loading = false;
        true
    }

    fn set_customer(&mut self, meta: CustomerMeta) {
        if let Some(name) = meta.business_name.as_deref().filter(|n| !n.is_empty()) {
            if let Err(e) = self.session.set_business_name(name) {
                tracing::warn!(error = %e, "failed to cache business name");
            }
        }
        self.customer = Some(meta);
    }

    fn report_failure(&mut self, e: ApiError, action: Action) {
        match e.kind() {
            ErrorKind::Unauthenticated => {
                tracing::warn!(error = %e, "settings request unauthenticated");
                self.auth_issue = Some(AuthIssue {
                    code: e.status().unwrap_or(401),
                    text: UNAUTHENTICATED.to_string(),
                });
                self.notices.push(Notice::warn(SESSION_EXPIRED));
            }
            ErrorKind::Forbidden => {
                tracing::warn!(error = %e, "settings request forbidden");
                self.auth_issue = Some(AuthIssue {
                    code: 403,
                    text: action.forbidden_issue().to_string(),
                });
                self.notices.push(Notice::error(action.forbidden_notice()));
            }
            ErrorKind::Other => {
                tracing::error!(error = %e, "settings request failed");
                let message = non_empty(e.to_string()).unwrap_or_else(|| action.fallback().to_string());
                self.notices.push(Notice::error(message.clone()));
                self.error = Some(message);
            }
        }
    }

    /// Convenience: begin, fetch and apply in one go.
    pub async fn load(&mut self, api: &dyn PortalApi) {
        let ticket = self.begin_load();
        let result = Self::fetch(api, ticket).await;
        self.apply_load(result);
    }

    /// Start a save. `None` when there is no customer id yet.
    pub fn begin_save(&mut self) -> Option<SaveTicket> {
        let customer_id = self.customer_id?;
        self.saving = true;
        self.error = None;
        self.auth_issue = None;
        self.save_generation += 1;
        Some(SaveTicket {
            generation: self.save_generation,
            customer_id,
            payload: self.form.payload(),
        })
    }

    pub async fn submit(api: &dyn PortalApi, ticket: SaveTicket) -> SaveResult {
        let result = api
            .update_settings(ticket.customer_id, &ticket.payload)
            .await;
        SaveResult {
            generation: ticket.generation,
            result,
        }
    }

    /// Fold a save result into the screen. Returns false if it was stale.
    ///
    /// `saving` is cleared either way.
    pub fn apply_save(&mut self, result: SaveResult) -> bool {
        self.saving = false;
        if result.generation != self.save_generation {
            tracing::debug!(generation = result.generation, "dropping stale settings save");
            return false;
        }
        match result.result {
            Ok(()) => self.notices.push(Notice::success(SAVED)),
            Err(e) => self.report_failure(e, Action::Modify),
        }
        true
    }

    /// Convenience: begin, submit and apply in one go. No-op without a
    /// customer id.
    pub async fn save(&mut self, api: &dyn PortalApi) {
        let Some(ticket) = self.begin_save() else {
            return;
        };
        let result = Self::submit(api, ticket).await;
        self.apply_save(result);
    }
}

fn non_empty(text: String) -> Option<String> {
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notice::NoticeLevel;
    use crate::testing::{http, FakeApi};
    use portal_api::CustomerUser;
    use portal_storage::MemoryStorage;
    use serde_json::json;
    use std::sync::Arc;

    fn session() -> SessionContext {
        SessionContext::new(Arc::new(MemoryStorage::new()))
    }

    fn screen() -> SettingsScreen {
        SettingsScreen::new(session())
    }

    #[test]
    fn parse_id_list_trims_and_drops_empty() {
        assert_eq!(parse_id_list("123, 456, 789"), vec!["123", "456", "789"]);
        assert_eq!(parse_id_list("123,,456"), vec!["123", "456"]);
        assert_eq!(parse_id_list(" , ,"), Vec::<String>::new());
        assert_eq!(parse_id_list(""), Vec::<String>::new());
    }

    #[test]
    fn form_mirrors_lists_as_text() {
        let form = SettingsForm::from_settings(Settings {
            blotato_facebook_page_ids: Some(vec!["1".into(), "2".into()]),
            ..Default::default()
        });
        assert_eq!(form.pages_text(PageList::Facebook), "1, 2");
        assert_eq!(form.pages_text(PageList::Linkedin), "");
    }

    #[test]
    fn payload_parses_lists_and_keeps_fields() {
        let mut form = SettingsForm::from_settings(Settings::default());
        form.set_field(SettingsField::TwitterId, "tw-1");
        form.set_pages_text(PageList::Facebook, "123, 456,");
        form.set_pages_text(PageList::Linkedin, "urn:li:organization:1");
        form.toggle_linkedin_active();

        let payload = form.payload();
        assert_eq!(payload.blotato_twitter_id.as_deref(), Some("tw-1"));
        assert_eq!(
            payload.blotato_facebook_page_ids,
            Some(vec!["123".to_string(), "456".to_string()])
        );
        assert_eq!(
            payload.blotato_linkeidin_page_ids,
            Some(vec!["urn:li:organization:1".to_string()])
        );
        assert!(payload.blotato_linkeidin_active);
        assert_eq!(form.pages_text(PageList::Facebook), "123, 456,");
    }

    #[test]
    fn secrets_are_masked_until_revealed() {
        let mut form = SettingsForm::default();
        form.set_field(SettingsField::OpenaiApiKey, "sk-abc");
        form.set_field(SettingsField::TwitterId, "tw");

        assert!(!form.is_revealed(SettingsField::OpenaiApiKey));
        assert_eq!(form.display_value(SettingsField::OpenaiApiKey), "••••••");
        assert_eq!(form.display_value(SettingsField::TwitterId), "tw");

        form.toggle_mask(SettingsField::OpenaiApiKey);
        assert_eq!(form.display_value(SettingsField::OpenaiApiKey), "sk-abc");
        assert!(!form.is_revealed(SettingsField::BlotatoApiKey));

        form.toggle_mask(SettingsField::OpenaiApiKey);
        assert_eq!(form.field(SettingsField::OpenaiApiKey), "sk-abc");
        assert!(!form.is_revealed(SettingsField::OpenaiApiKey));

        form.toggle_mask(SettingsField::TwitterId);
        assert!(form.is_revealed(SettingsField::TwitterId));
    }

    #[tokio::test]
    async fn mount_scenario_shows_active_toggle_and_masked_key() {
        let api = FakeApi::new();
        *api.settings.lock() = json!({"openai_api_key": "sk-x", "blotato_linkeidin_active": "true"});

        let mut screen = screen();
        assert_eq!(screen.view(), ScreenView::Loading);
        screen.load(&api).await;

        assert_eq!(screen.customer_id(), Some(42));
        assert_eq!(screen.view(), ScreenView::Form);
        assert!(screen.form().linkedin_active());
        assert!(!screen.form().is_revealed(SettingsField::OpenaiApiKey));
        assert_eq!(screen.form().display_value(SettingsField::OpenaiApiKey), "••••");
        assert_eq!(
            api.calls(),
            vec!["current_customer_id", "get_settings:42", "get_customer:42"]
        );
    }

    #[tokio::test]
    async fn string_flags_are_normalized() {
        let api = FakeApi::new();
        let mut screen = screen();

        *api.settings.lock() = json!({"blotato_linkeidin_active": "1"});
        screen.load(&api).await;
        assert!(screen.form().linkedin_active());

        *api.settings.lock() = json!({"blotato_linkeidin_active": "0"});
        screen.load(&api).await;
        assert!(!screen.form().linkedin_active());
    }

    #[tokio::test]
    async fn unauthenticated_load_reaches_auth_issue_only() {
        for status in [401, 419] {
            let api = FakeApi::new();
            api.fail("get_settings", http(status, "Unauthenticated."));
            let mut screen = screen();
            screen.load(&api).await;

            assert_eq!(
                screen.auth_issue(),
                Some(&AuthIssue {
                    code: status,
                    text: "Unauthenticated. Please sign in again.".into()
                })
            );
            assert_eq!(screen.error(), None);
            assert!(!screen.is_loading());
            assert!(matches!(screen.view(), ScreenView::AuthIssue(_)));
            assert_eq!(
                screen.drain_notices(),
                vec![Notice::warn("Session expired. Please sign in again.")]
            );
        }
    }

    #[tokio::test]
    async fn forbidden_load_uses_view_wording() {
        let api = FakeApi::new();
        api.fail("get_settings", http(403, "Forbidden"));
        let mut screen = screen();
        screen.load(&api).await;

        let issue = screen.auth_issue().unwrap();
        assert_eq!(issue.code, 403);
        assert_eq!(issue.text, "Forbidden. You lack permission to view settings.");
        assert_eq!(
            screen.drain_notices(),
            vec![Notice::error("You don’t have permission to view these settings.")]
        );
    }

    #[tokio::test]
    async fn generic_load_failure_sets_banner() {
        let api = FakeApi::new();
        api.fail("get_settings", http(500, "Server Error"));
        let mut screen = screen();
        screen.load(&api).await;

        assert_eq!(screen.auth_issue(), None);
        assert_eq!(screen.error(), Some("HTTP 500: Server Error"));
        assert_eq!(screen.view(), ScreenView::Form);
        let notices = screen.drain_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert!(screen.drain_notices().is_empty());
    }

    #[tokio::test]
    async fn identity_failure_is_visible() {
        let api = FakeApi::new();
        api.fail(
            "current_customer_id",
            ApiError::Identity("Failed to resolve customer_id from /customers/me".into()),
        );
        let mut screen = screen();
        screen.load(&api).await;

        assert_eq!(screen.customer_id(), None);
        assert_eq!(
            screen.error(),
            Some("Failed to resolve customer_id from /customers/me")
        );
        assert!(!screen.is_loading());
        assert_eq!(api.calls(), vec!["current_customer_id"]);

        screen.save(&api).await;
        assert!(!screen.is_saving());
        assert_eq!(api.calls().len(), 1);
    }

    #[tokio::test]
    async fn identity_failure_with_empty_message_uses_fallback() {
        let api = FakeApi::new();
        api.fail("current_customer_id", ApiError::Identity(String::new()));
        let mut screen = screen();
        screen.load(&api).await;
        assert_eq!(screen.error(), Some("Failed to fetch customer id"));
    }

    #[tokio::test]
    async fn customer_failure_is_ignored() {
        let api = FakeApi::new();
        *api.settings.lock() = json!({"blotato_twitter_id": "tw"});
        api.fail("get_customer", http(500, "boom"));
        let mut screen = screen();
        screen.load(&api).await;

        assert_eq!(screen.error(), None);
        assert!(screen.drain_notices().is_empty());
        assert_eq!(screen.form().field(SettingsField::TwitterId), "tw");
        assert_eq!(screen.display_number(), "42");
        assert_eq!(screen.display_name(), "—");
    }

    #[tokio::test]
    async fn customer_metadata_drives_header_and_cache() {
        let api = FakeApi::new();
        *api.customer.lock() = Some(CustomerMeta {
            id: Some(42),
            customer_number: Some("C-0042".into()),
            business_name: Some("Acme".into()),
            ..Default::default()
        });
        let session = session();
        let mut screen = SettingsScreen::new(session.clone());
        screen.load(&api).await;

        assert_eq!(screen.display_number(), "C-0042");
        assert_eq!(screen.display_name(), "Acme");
        assert_eq!(session.business_name().as_deref(), Some("Acme"));
    }

    #[tokio::test]
    async fn display_name_falls_back_to_user() {
        let api = FakeApi::new();
        *api.customer.lock() = Some(CustomerMeta {
            business_name: Some(String::new()),
            user: Some(CustomerUser {
                name: Some("Ana".into()),
            }),
            ..Default::default()
        });
        let mut screen = screen();
        screen.load(&api).await;
        assert_eq!(screen.display_name(), "Ana");

        let empty = SettingsScreen::new(session());
        assert_eq!(empty.display_number(), "—");
        assert_eq!(empty.display_name(), "—");
    }

    #[tokio::test]
    async fn save_submits_payload_and_notifies() {
        let api = FakeApi::new();
        *api.settings.lock() = json!({"blotato_linkeidin_page_ids": ["a"], "timezone": "UTC"});
        let mut screen = screen();
        screen.load(&api).await;

        screen.form_mut().set_pages_text(PageList::Linkedin, "a, b,,c");
        screen.form_mut().set_linkedin_active(true);
        screen.save(&api).await;

        assert!(!screen.is_saving());
        assert_eq!(screen.drain_notices(), vec![Notice::success("Settings saved.")]);
        let saved = api.saved.lock().clone();
        assert_eq!(saved.len(), 1);
        let (id, payload) = &saved[0];
        assert_eq!(*id, 42);
        assert_eq!(
            payload.blotato_linkeidin_page_ids,
            Some(vec!["a".to_string(), "b".to_string(), "c".to_string()])
        );
        assert_eq!(payload.blotato_facebook_page_ids, Some(Vec::new()));
        assert!(payload.blotato_linkeidin_active);
        assert_eq!(payload.extra.get("timezone"), Some(&json!("UTC")));
        // no re-fetch after saving
        assert_eq!(
            api.calls().iter().filter(|c| c.starts_with("get_settings")).count(),
            1
        );
    }

    #[tokio::test]
    async fn save_failures_use_modify_wording() {
        let api = FakeApi::new();
        let mut screen = screen();
        screen.load(&api).await;

        api.fail("update_settings", http(403, "Forbidden"));
        screen.save(&api).await;
        assert_eq!(
            screen.auth_issue().map(|i| i.text.as_str()),
            Some("Forbidden. You lack permission to modify settings.")
        );
        assert_eq!(
            screen.drain_notices(),
            vec![Notice::error("You don’t have permission to modify these settings.")]
        );

        api.fail("update_settings", http(419, "Page Expired"));
        screen.save(&api).await;
        assert_eq!(screen.auth_issue().map(|i| i.code), Some(419));

        api.fail("update_settings", http(422, "Invalid key"));
        screen.save(&api).await;
        assert_eq!(screen.auth_issue(), None);
        assert_eq!(screen.error(), Some("HTTP 422: Invalid key"));
        assert!(!screen.is_saving());
    }

    #[tokio::test]
    async fn retry_reuses_resolved_id() {
        let api = FakeApi::new();
        api.fail("get_settings", http(401, "Unauthenticated."));
        let mut screen = screen();
        screen.load(&api).await;
        assert!(screen.auth_issue().is_some());

        screen.load(&api).await;
        assert_eq!(screen.auth_issue(), None);
        assert_eq!(
            api.calls()
                .iter()
                .filter(|c| c.as_str() == "current_customer_id")
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn stale_results_are_dropped() {
        let api = FakeApi::new();
        *api.settings.lock() = json!({"blotato_twitter_id": "first"});
        let mut screen = screen();

        let first = screen.begin_load();
        let first_result = SettingsScreen::fetch(&api, first).await;

        *api.settings.lock() = json!({"blotato_twitter_id": "second"});
        let second = screen.begin_load();
        let second_result = SettingsScreen::fetch(&api, second).await;

        assert!(screen.apply_load(second_result));
        assert!(!screen.apply_load(first_result));
        assert_eq!(screen.form().field(SettingsField::TwitterId), "second");

        let ticket = screen.begin_save().unwrap();
        let result = SettingsScreen::submit(&api, ticket).await;
        screen.detach();
        assert!(!screen.apply_save(result));
        assert!(!screen.is_saving());
        assert!(screen.drain_notices().is_empty());
    }

    #[tokio::test]
    async fn reload_during_save_still_settles_the_save() {
        let api = FakeApi::new();
        let mut screen = screen();
        screen.load(&api).await;

        let save = screen.begin_save().unwrap();
        let reload = screen.begin_load();
        let saved = SettingsScreen::submit(&api, save).await;
        let loaded = SettingsScreen::fetch(&api, reload).await;

        assert!(screen.apply_save(saved));
        assert!(screen.apply_load(loaded));
        assert!(!screen.is_saving());
        assert!(!screen.is_loading());
        assert_eq!(screen.drain_notices(), vec![Notice::success("Settings saved.")]);
    }

    #[tokio::test]
    async fn settings_failure_keeps_customer_metadata() {
        let api = FakeApi::new();
        *api.customer.lock() = Some(CustomerMeta {
            customer_number: Some("C-0042".into()),
            business_name: Some("Acme".into()),
            ..Default::default()
        });
        api.fail("get_settings", http(401, "Unauthenticated."));
        let session = session();
        let mut screen = SettingsScreen::new(session.clone());
        screen.load(&api).await;

        assert_eq!(screen.auth_issue().map(|i| i.code), Some(401));
        assert_eq!(
            screen.customer().and_then(|c| c.customer_number.as_deref()),
            Some("C-0042")
        );
        assert_eq!(screen.display_name(), "Acme");
        assert_eq!(session.business_name().as_deref(), Some("Acme"));

        api.fail("get_settings", http(500, "Server Error"));
        let other = self::session();
        let mut screen = SettingsScreen::new(other.clone());
        screen.load(&api).await;

        assert_eq!(screen.error(), Some("HTTP 500: Server Error"));
        assert_eq!(screen.display_number(), "C-0042");
        assert_eq!(screen.display_name(), "Acme");
        assert_eq!(other.business_name().as_deref(), Some("Acme"));
    }
}
