use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One public submission against a form. Immutable once written.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormResponse {
    pub id: String,
    pub form_id: String,
    pub payload: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_score: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
}

impl FormResponse {
    pub fn new(
        form_id: &str,
        payload: Map<String, Value>,
        score: Option<i64>,
        max_score: Option<i64>,
        user_agent: Option<String>,
        ip: Option<String>,
    ) -> Self {
        FormResponse {
            id: uuid::Uuid::new_v4().to_string(),
            form_id: form_id.to_string(),
            payload,
            score,
            max_score,
            created_at: Some(Utc::now()),
            user_agent,
            ip,
        }
    }
}
