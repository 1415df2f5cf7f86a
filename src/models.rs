use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Merged client settings. `server_url` comes from local storage, the keys
/// come from the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub together_api_key: String,
    #[serde(default)]
    pub groq_api_key: String,
    #[serde(default)]
    pub server_url: String,
}

impl Settings {
    pub fn fallback(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            ..Self::default()
        }
    }
}

/// Partial settings update. `server_url` is handled locally and never sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub together_api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groq_api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_url: Option<String>,
}

impl SettingsUpdate {
    /// The body posted to the backend: key fields only.
    pub fn backend_body(&self) -> SettingsUpdate {
        SettingsUpdate {
            server_url: None,
            ..self.clone()
        }
    }
}

/// Key fields as the backend reports them. Any `serverUrl` it sends is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RemoteSettings {
    #[serde(default)]
    pub together_api_key: Option<String>,
    #[serde(default)]
    pub groq_api_key: Option<String>,
}

impl RemoteSettings {
    pub fn merge_with(self, server_url: &str) -> Settings {
        Settings {
            together_api_key: self.together_api_key.unwrap_or_default(),
            groq_api_key: self.groq_api_key.unwrap_or_default(),
            server_url: server_url.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SaveSettingsResponse {
    #[serde(default)]
    pub settings: RemoteSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_minutes: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusTask {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPlan {
    #[serde(default)]
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub focus_tasks: Vec<FocusTask>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DailyPlan {
    /// (completed, total) across regular tasks.
    pub fn progress(&self) -> (usize, usize) {
        let done = self.tasks.iter().filter(|t| t.completed).count();
        (done, self.tasks.len())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyPlanLookup {
    pub exists: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<DailyPlan>,
}

/// `{ok, plan}` envelope used by the generate and toggle endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct PlanEnvelope {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub plan: Option<DailyPlan>,
}

impl PlanEnvelope {
    pub fn into_plan(self) -> Option<DailyPlan> {
        if self.ok {
            self.plan
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureResult {
    #[serde(default)]
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignored: Option<bool>,
}

impl CaptureResult {
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(error.into()),
            ignored: None,
        }
    }
}
