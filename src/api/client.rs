use super::http::send_json;
use crate::error::ApiError;
use crate::models::{CaptureResult, DailyPlan, DailyPlanLookup, PlanEnvelope};
use crate::settings::SettingsResolver;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;

/// Request helpers against the planner backend.
///
/// Each call resolves the base URL first, sends exactly one request, and
/// reports failure as `None` (or a failed [`CaptureResult`]) after logging it.
#[derive(Clone)]
pub struct ApiClient {
    settings: Arc<SettingsResolver>,
}

impl ApiClient {
    pub fn new(settings: Arc<SettingsResolver>) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &SettingsResolver {
        &self.settings
    }

    pub async fn capture_context(&self, content: &str) -> CaptureResult {
        let base = self.settings.resolve_server_url();
        let request = self
            .settings
            .backend()
            .post(&base, "/api/context")
            .json(&json!({ "content": content }));

        match send_json::<CaptureResult>(request).await {
            Ok(result) => result,
            Err(ApiError::Status { status, body }) => {
                log::error!("capture_context failed: HTTP {} {}", status, body);
                CaptureResult::failed(format!("HTTP {}", status))
            }
            Err(e) => {
                log::error!("capture_context failed: {}", e);
                CaptureResult::failed("Network error")
            }
        }
    }

    pub async fn get_daily_plan(&self, date: &str) -> Option<DailyPlanLookup> {
        let base = self.settings.resolve_server_url();
        let request = self
            .settings
            .backend()
            .get(&base, "/api/daily-plan")
            .query(&[("date", date)]);

        fetch("get_daily_plan", request).await
    }

    /// Plan lookup for today's local calendar date.
    pub async fn get_today_plan(&self) -> Option<DailyPlanLookup> {
        self.get_daily_plan(&today_local()).await
    }

    pub async fn generate_daily_plan(&self, date: &str) -> Option<DailyPlan> {
        let base = self.settings.resolve_server_url();
        let request = self
            .settings
            .backend()
            .post(&base, "/api/daily-plan/generate")
            .query(&[("date", date)]);

        fetch::<PlanEnvelope>("generate_daily_plan", request)
            .await
            .and_then(PlanEnvelope::into_plan)
    }

    pub async fn get_available_dates(&self) -> Option<Value> {
        let base = self.settings.resolve_server_url();
        let request = self
            .settings
            .backend()
            .get(&base, "/api/daily-plan/available-dates");

        fetch("get_available_dates", request).await
    }

    pub async fn generate_missing_plans(&self) -> Option<Value> {
        let base = self.settings.resolve_server_url();
        let request = self
            .settings
            .backend()
            .post(&base, "/api/daily-plan/generate-missing");

        fetch("generate_missing_plans", request).await
    }

    pub async fn toggle_task_completion(
        &self,
        task_id: &str,
        completed: bool,
        date: &str,
    ) -> Option<DailyPlan> {
        let base = self.settings.resolve_server_url();
        let request = self
            .settings
            .backend()
            .patch(&base, &format!("/api/tasks/{}", task_id))
            .json(&json!({ "completed": completed, "date": date }));

        fetch::<PlanEnvelope>("toggle_task_completion", request)
            .await
            .and_then(PlanEnvelope::into_plan)
    }
}

async fn fetch<T: DeserializeOwned>(op: &str, request: RequestBuilder) -> Option<T> {
    log::debug!("{}: sending request", op);
    match send_json(request).await {
        Ok(value) => Some(value),
        Err(ApiError::Status { status, body }) => {
            log::error!("{} failed: HTTP {} {}", op, status, body);
            None
        }
        Err(e) => {
            log::error!("{} failed: {}", op, e);
            None
        }
    }
}

/// Today's local date as `YYYY-MM-DD`.
pub fn today_local() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}
