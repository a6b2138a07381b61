//! Wire models for the portal API.

use portal_storage::SessionUser;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Lenient boolean rule shared by every flag the backend returns.
///
/// True for JSON `true`, any non-zero number, and the strings `1`, `true`,
/// `yes`, `on` (case-insensitive). Everything else is false.
pub fn coerce_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => matches!(
            s.to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        _ => false,
    }
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_bool(&value))
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Opaque string fields: ids sometimes arrive as numbers.
fn deserialize_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_to_string(&value))
}

/// Page id lists: an array of scalars, or a comma-joined string.
fn deserialize_opt_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => Some(items.iter().filter_map(scalar_to_string).collect()),
        Value::String(s) => Some(
            s.split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        _ => None,
    })
}

/// Integration settings for one customer.
///
/// Keys the backend returns that are not modeled here are kept in `extra` and
/// written back unchanged on save.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, deserialize_with = "deserialize_opt_string")]
    pub openai_api_key: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_string")]
    pub blotato_api_key: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_string")]
    pub blotato_twitter_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_string")]
    pub blotato_linkeidin_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_string")]
    pub blotato_facebook_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_string")]
    pub blotato_tiktok_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_string")]
    pub blotato_instagram_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_string")]
    pub blotato_threads_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_string")]
    pub blotato_pinterest_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_string")]
    pub blotato_bluesky_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_string")]
    pub blotato_youtube_id: Option<String>,

    #[serde(default, deserialize_with = "deserialize_opt_list")]
    pub blotato_facebook_page_ids: Option<Vec<String>>,
    #[serde(default, deserialize_with = "deserialize_opt_list")]
    pub blotato_linkeidin_page_ids: Option<Vec<String>>,

    #[serde(default, deserialize_with = "deserialize_flag")]
    pub blotato_linkeidin_active: bool,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The free-text settings fields, addressable by their backend key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingsField {
    OpenaiApiKey,
    BlotatoApiKey,
    TwitterId,
    LinkedinId,
    FacebookId,
    TiktokId,
    InstagramId,
    ThreadsId,
    PinterestId,
    BlueskyId,
    YoutubeId,
}

impl SettingsField {
    pub const ALL: [SettingsField; 11] = [
        SettingsField::OpenaiApiKey,
        SettingsField::BlotatoApiKey,
        SettingsField::TwitterId,
        SettingsField::LinkedinId,
        SettingsField::FacebookId,
        SettingsField::TiktokId,
        SettingsField::InstagramId,
        SettingsField::ThreadsId,
        SettingsField::PinterestId,
        SettingsField::BlueskyId,
        SettingsField::YoutubeId,
    ];

    /// Backend key.
    pub fn key(self) -> &'static str {
        match self {
            SettingsField::OpenaiApiKey => "openai_api_key",
            SettingsField::BlotatoApiKey => "blotato_api_key",
            SettingsField::TwitterId => "blotato_twitter_id",
            SettingsField::LinkedinId => "blotato_linkeidin_id",
            SettingsField::FacebookId => "blotato_facebook_id",
            SettingsField::TiktokId => "blotato_tiktok_id",
            SettingsField::InstagramId => "blotato_instagram_id",
            SettingsField::ThreadsId => "blotato_threads_id",
            SettingsField::PinterestId => "blotato_pinterest_id",
            SettingsField::BlueskyId => "blotato_bluesky_id",
            SettingsField::YoutubeId => "blotato_youtube_id",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SettingsField::OpenaiApiKey => "OpenAI API Key",
            SettingsField::BlotatoApiKey => "Blotato API Key",
            SettingsField::TwitterId => "Twitter ID",
            SettingsField::LinkedinId => "LinkedIn ID",
            SettingsField::FacebookId => "Facebook ID",
            SettingsField::TiktokId => "TikTok ID",
            SettingsField::InstagramId => "Instagram ID",
            SettingsField::ThreadsId => "Threads ID",
            SettingsField::PinterestId => "Pinterest ID",
            SettingsField::BlueskyId => "Bluesky ID",
            SettingsField::YoutubeId => "YouTube ID",
        }
    }

    /// API keys are masked on screen until revealed.
    pub fn is_secret(self) -> bool {
        matches!(
            self,
            SettingsField::OpenaiApiKey | SettingsField::BlotatoApiKey
        )
    }

    /// Accepts the backend key or a short alias (`twitter`, `openai`, ...).
    pub fn parse(name: &str) -> Option<Self> {
        let needle = name.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|field| {
            let key = field.key();
            key == needle
                || key.trim_start_matches("blotato_").trim_end_matches("_id") == needle
                || (needle == "openai" && *field == SettingsField::OpenaiApiKey)
                || (needle == "blotato" && *field == SettingsField::BlotatoApiKey)
                || (needle == "linkedin" && *field == SettingsField::LinkedinId)
        })
    }
}

impl Settings {
    pub fn get(&self, field: SettingsField) -> Option<&str> {
        self.slot(field).as_deref()
    }

    pub fn set(&mut self, field: SettingsField, value: Option<String>) {
        *self.slot_mut(field) = value;
    }

    fn slot(&self, field: SettingsField) -> &Option<String> {
        match field {
            SettingsField::OpenaiApiKey => &self.openai_api_key,
            SettingsField::BlotatoApiKey => &self.blotato_api_key,
            SettingsField::TwitterId => &self.blotato_twitter_id,
            SettingsField::LinkedinId => &self.blotato_linkeidin_id,
            SettingsField::FacebookId => &self.blotato_facebook_id,
            SettingsField::TiktokId => &self.blotato_tiktok_id,
            SettingsField::InstagramId => &self.blotato_instagram_id,
            SettingsField::ThreadsId => &self.blotato_threads_id,
            SettingsField::PinterestId => &self.blotato_pinterest_id,
            SettingsField::BlueskyId => &self.blotato_bluesky_id,
            SettingsField::YoutubeId => &self.blotato_youtube_id,
        }
    }

    fn slot_mut(&mut self, field: SettingsField) -> &mut Option<String> {
        match field {
            SettingsField::OpenaiApiKey => &mut self.openai_api_key,
            SettingsField::BlotatoApiKey => &mut self.blotato_api_key,
            SettingsField::TwitterId => &mut self.blotato_twitter_id,
            SettingsField::LinkedinId => &mut self.blotato_linkeidin_id,
            SettingsField::FacebookId => &mut self.blotato_facebook_id,
            SettingsField::TiktokId => &mut self.blotato_tiktok_id,
            SettingsField::InstagramId => &mut self.blotato_instagram_id,
            SettingsField::ThreadsId => &mut self.blotato_threads_id,
            SettingsField::PinterestId => &mut self.blotato_pinterest_id,
            SettingsField::BlueskyId => &mut self.blotato_bluesky_id,
            SettingsField::YoutubeId => &mut self.blotato_youtube_id,
        }
    }

    /// Decode a settings payload, treating `null` as an empty record.
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerUser {
    #[serde(default, deserialize_with = "deserialize_opt_string")]
    pub name: Option<String>,
}

/// Customer record as returned by `/customers/<id>`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerMeta {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub customer_id: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_opt_string")]
    pub customer_number: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_string")]
    pub business_name: Option<String>,
    #[serde(default)]
    pub user: Option<CustomerUser>,
}

/// Body of `POST /reset-password`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub token: String,
    pub password: String,
    pub password_confirmation: String,
}

/// Optional `message` a mutation endpoint may return.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageResponse {
    pub message: Option<String>,
}

impl MessageResponse {
    pub fn from_value(value: Option<&Value>) -> Self {
        let message = value
            .and_then(|v| v.get("message"))
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .map(str::to_string);
        Self { message }
    }
}

/// Result of `POST /login`.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginResponse {
    pub token: String,
    pub user: Option<SessionUser>,
}

impl LoginResponse {
    /// Accepts `token` or `access_token`, bare or inside a `data` envelope.
    pub fn from_value(value: &Value) -> Option<Self> {
        let body = unwrap_data(value);
        let token = body
            .get("token")
            .or_else(|| body.get("access_token"))
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())?
            .to_string();
        let user = body
            .get("user")
            .and_then(|u| serde_json::from_value::<SessionUser>(u.clone()).ok());
        Some(Self { token, user })
    }
}

/// Returns the `data` member when present and non-null, else the value itself.
pub fn unwrap_data(value: &Value) -> &Value {
    match value.get("data") {
        Some(inner) if !inner.is_null() => inner,
        _ => value,
    }
}

fn positive_id(value: &Value) -> Option<u64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok()?
        }
        _ => return None,
    };
    if number.is_finite() && number >= 1.0 && number.fract() == 0.0 && number <= u64::MAX as f64 {
        Some(number as u64)
    } else {
        None
    }
}

/// Extract the current customer's id from a `/customers/me` payload.
///
/// Prefers a non-zero `customer_id`, then `id`; numeric strings are accepted.
pub fn resolve_customer_id(payload: &Value) -> Option<u64> {
    let data = unwrap_data(payload);
    data.get("customer_id")
        .and_then(positive_id)
        .or_else(|| data.get("id").and_then(positive_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn coerce_bool_truthy_values() {
        for value in [
            json!(true),
            json!(1),
            json!(-2),
            json!(0.5),
            json!("1"),
            json!("true"),
            json!("TRUE"),
            json!("Yes"),
            json!("on"),
        ] {
            assert!(coerce_bool(&value), "{value} should be true");
        }
    }

    #[test]
    fn coerce_bool_falsy_values() {
        for value in [
            json!(false),
            json!(0),
            json!(null),
            json!(""),
            json!("0"),
            json!("no"),
            json!(" true"),
            json!({}),
            json!([1]),
        ] {
            assert!(!coerce_bool(&value), "{value} should be false");
        }
    }

    #[test]
    fn settings_decode_is_lenient() {
        let settings: Settings = serde_json::from_value(json!({
            "openai_api_key": "sk-1",
            "blotato_twitter_id": 123,
            "blotato_facebook_page_ids": ["a", 2],
            "blotato_linkeidin_page_ids": "x, y,,z",
            "blotato_linkeidin_active": "yes",
            "timezone": "UTC"
        }))
        .unwrap();

        assert_eq!(settings.openai_api_key.as_deref(), Some("sk-1"));
        assert_eq!(settings.blotato_twitter_id.as_deref(), Some("123"));
        assert_eq!(
            settings.blotato_facebook_page_ids,
            Some(vec!["a".to_string(), "2".to_string()])
        );
        assert_eq!(
            settings.blotato_linkeidin_page_ids,
            Some(vec!["x".to_string(), "y".to_string(), "z".to_string()])
        );
        assert!(settings.blotato_linkeidin_active);
        assert_eq!(settings.extra.get("timezone"), Some(&json!("UTC")));
    }

    #[test]
    fn settings_missing_flag_is_false() {
        let settings = Settings::from_value(json!({})).unwrap();
        assert!(!settings.blotato_linkeidin_active);
        assert_eq!(Settings::from_value(Value::Null).unwrap(), Settings::default());
    }

    #[test]
    fn settings_serialize_keeps_unknown_keys() {
        let mut settings = Settings::default();
        settings.extra.insert("timezone".into(), json!("UTC"));
        settings.set(SettingsField::TwitterId, Some("tw".into()));

        let value = serde_json::to_value(&settings).unwrap();
        assert_eq!(value["timezone"], json!("UTC"));
        assert_eq!(value["blotato_twitter_id"], json!("tw"));
        assert_eq!(value["blotato_linkeidin_active"], json!(false));
        assert_eq!(value["openai_api_key"], Value::Null);
    }

    #[test]
    fn field_lookup_by_key_and_alias() {
        assert_eq!(SettingsField::parse("blotato_twitter_id"), Some(SettingsField::TwitterId));
        assert_eq!(SettingsField::parse("twitter"), Some(SettingsField::TwitterId));
        assert_eq!(SettingsField::parse("linkedin"), Some(SettingsField::LinkedinId));
        assert_eq!(SettingsField::parse("openai"), Some(SettingsField::OpenaiApiKey));
        assert_eq!(SettingsField::parse("nope"), None);
        assert!(SettingsField::BlotatoApiKey.is_secret());
        assert!(!SettingsField::YoutubeId.is_secret());
    }

    #[test]
    fn resolves_customer_id_variants() {
        assert_eq!(resolve_customer_id(&json!({"data": {"customer_id": 42}})), Some(42));
        assert_eq!(resolve_customer_id(&json!({"customer_id": "17"})), Some(17));
        assert_eq!(resolve_customer_id(&json!({"id": 9})), Some(9));
        assert_eq!(resolve_customer_id(&json!({"customer_id": 0, "id": 5})), Some(5));
        assert_eq!(resolve_customer_id(&json!({"customer_id": "abc"})), None);
        assert_eq!(resolve_customer_id(&json!({"data": {}})), None);
        assert_eq!(resolve_customer_id(&json!({"id": 0})), None);
        assert_eq!(resolve_customer_id(&json!({"id": 1.5})), None);
    }

    #[test]
    fn login_response_accepts_both_token_keys() {
        let a = LoginResponse::from_value(&json!({"token": "t1"})).unwrap();
        assert_eq!(a.token, "t1");
        assert!(a.user.is_none());

        let b = LoginResponse::from_value(&json!({
            "data": {"access_token": "t2", "user": {"name": "Ana", "email": "a@x.io", "role": "customer"}}
        }))
        .unwrap();
        assert_eq!(b.token, "t2");
        assert!(b.user.unwrap().is_customer());

        assert!(LoginResponse::from_value(&json!({"token": ""})).is_none());
    }

    #[test]
    fn message_response_reads_message() {
        assert_eq!(
            MessageResponse::from_value(Some(&json!({"message": "ok"}))).message.as_deref(),
            Some("ok")
        );
        assert_eq!(MessageResponse::from_value(None), MessageResponse::default());
    }
}
