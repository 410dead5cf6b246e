#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use secrecy::SecretString;
use tokio::sync::RwLock;

use promptform_server::{
    config::Config,
    errors::{AppError, AppResult},
    models::domain::{Form, FormResponse},
    models::dto::FormDto,
    repositories::{FormRepository, ResponseRepository},
};

pub struct InMemoryFormRepository {
    forms: Arc<RwLock<HashMap<String, Form>>>,
}

impl InMemoryFormRepository {
    pub fn new() -> Self {
        Self {
            forms: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl FormRepository for InMemoryFormRepository {
    async fn create(&self, form: Form) -> AppResult<Form> {
        let mut forms = self.forms.write().await;
        forms.insert(form.id.clone(), form.clone());
        Ok(form)
    }

    async fn update(&self, form: Form) -> AppResult<Form> {
        let mut forms = self.forms.write().await;
        if !forms.contains_key(&form.id) {
            return Err(AppError::NotFound(format!(
                "Form with id '{}' not found",
                form.id
            )));
        }
        forms.insert(form.id.clone(), form.clone());
        Ok(form)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Form>> {
        let forms = self.forms.read().await;
        Ok(forms.get(id).cloned())
    }

    async fn list_by_owner(&self, owner_id: &str) -> AppResult<Vec<Form>> {
        let forms = self.forms.read().await;
        let mut items: Vec<_> = forms
            .values()
            .filter(|f| f.owner_id == owner_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        let mut forms = self.forms.write().await;
        Ok(forms.remove(id).is_some())
    }

    async fn update_ai_summary(&self, id: &str, summary: &str) -> AppResult<()> {
        let mut forms = self.forms.write().await;
        if let Some(form) = forms.get_mut(id) {
            form.ai_summary = Some(summary.to_string());
        }
        Ok(())
    }
}

/// Responses live in their own store keyed only by their own id, so deleting
/// a form leaves them behind exactly as the document store would.
pub struct InMemoryResponseRepository {
    responses: Arc<RwLock<Vec<FormResponse>>>,
}

impl InMemoryResponseRepository {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

#[async_trait]
impl ResponseRepository for InMemoryResponseRepository {
    async fn add(&self, response: FormResponse) -> AppResult<FormResponse> {
        let mut responses = self.responses.write().await;
        responses.push(response.clone());
        Ok(response)
    }

    async fn list_by_form(&self, form_id: &str) -> AppResult<Vec<FormResponse>> {
        let responses = self.responses.read().await;
        let mut items: Vec<_> = responses
            .iter()
            .filter(|r| r.form_id == form_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn count_by_form(&self, form_id: &str) -> AppResult<u64> {
        let responses = self.responses.read().await;
        Ok(responses.iter().filter(|r| r.form_id == form_id).count() as u64)
    }
}

pub fn test_config() -> Config {
    Config {
        mongo_conn_string: "mongodb://localhost:27017".to_string(),
        mongo_db_name: "promptform-test".to_string(),
        model_api_key: SecretString::from("test_api_key".to_string()),
        model_name: "gpt-4o-mini".to_string(),
        model_api_base: None,
        model_timeout_secs: 5,
        web_server_host: "127.0.0.1".to_string(),
        web_server_port: 8080,
        document_char_budget: 60_000,
        context_json_char_budget: 20_000,
        max_upload_bytes: 10 * 1024 * 1024,
        upload_temp_dir: std::env::temp_dir(),
    }
}

/// A plain feedback form: one radio, one textarea.
pub fn feedback_form_dto() -> FormDto {
    serde_json::from_value(serde_json::json!({
        "title": "Coffee cart feedback",
        "fields": [
            {"label": "How was your drink?", "name": "rating_choice", "type": "radio",
             "options": ["Great", "Okay", "Poor"]},
            {"label": "Anything else?", "name": "comments", "type": "textarea"}
        ]
    }))
    .expect("feedback dto should parse")
}

/// An outcome quiz worth 0..=4 points split across two outcomes.
pub fn chronotype_quiz_dto() -> FormDto {
    serde_json::from_value(serde_json::json!({
        "title": "Morning person quiz",
        "isQuiz": true,
        "quizType": "OUTCOME",
        "fields": [
            {"label": "Up before 7am?", "name": "q1", "type": "radio",
             "options": ["Early", "Late"],
             "scoring": [
                 {"option": "Early", "points": 2, "outcomeId": "lark"},
                 {"option": "Late", "points": 0, "outcomeId": "owl"}
             ]},
            {"label": "Skip the snooze button?", "name": "q2", "type": "radio",
             "options": ["Yes", "No"],
             "scoring": [
                 {"option": "Yes", "points": 2, "outcomeId": "lark"},
                 {"option": "No", "points": 0, "outcomeId": "owl"}
             ]}
        ],
        "resultPages": [
            {"outcomeId": "owl", "title": "Night owl", "description": "You bloom after dark.",
             "scoreRange": {"from": 0, "to": 1}},
            {"outcomeId": "lark", "title": "Morning lark", "description": "You own the sunrise.",
             "scoreRange": {"from": 2, "to": 4}}
        ]
    }))
    .expect("quiz dto should parse")
}

/// A form with one rating grid, for exercising the three payload encodings.
pub fn grid_form_dto() -> FormDto {
    serde_json::from_value(serde_json::json!({
        "title": "Service review",
        "fields": [
            {"label": "Rate each area", "name": "service", "type": "radioGrid",
             "rows": ["Speed", "Quality"],
             "columns": [{"label": "Poor", "points": 0}, {"label": "Good", "points": 1}]}
        ]
    }))
    .expect("grid dto should parse")
}
