use serde::Deserialize;
use serde_json::{Map, Value};
use validator::Validate;

use crate::models::dto::form_dto::FormDto;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GenerateFormRequest {
    #[validate(length(min = 1, max = 10000, message = "prompt must be 1 to 10000 characters"))]
    pub prompt: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AssistQuestionRequest {
    #[validate(length(min = 1, max = 10000, message = "prompt must be 1 to 10000 characters"))]
    pub prompt: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SuggestQuestionRequest {
    pub form: FormDto,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateFormFromImageRequest {
    #[validate(length(min = 1, message = "image payload is empty"))]
    pub image: String,

    #[validate(length(min = 1, message = "mimeType is required"))]
    pub mime_type: String,

    #[validate(length(max = 10000))]
    pub context: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefactorFormRequest {
    pub form_json: Value,

    #[validate(length(min = 1, max = 2000, message = "command must be 1 to 2000 characters"))]
    pub command: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponsesRequest {
    pub form: Value,

    pub responses: Vec<Value>,

    // When present, the generated report is also cached on this form.
    pub form_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFormRequest {
    #[validate(length(min = 1, message = "ownerId is required"))]
    pub owner_id: String,

    pub form: FormDto,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateFormRequest {
    pub form: FormDto,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerQuery {
    pub owner_id: String,
}

/// The submit body comes in two shapes: `{payload: {...}, score?, maxScore?}`
/// from the current frontend, or the bare field map from older embeds. Both
/// deserialize here; `into_parts` tells them apart.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponseBody(pub Map<String, Value>);

impl SubmitResponseBody {
    pub fn into_parts(mut self) -> (Map<String, Value>, Option<i64>, Option<i64>) {
        let score = take_integer(&mut self.0, "score");
        let max_score = take_integer(&mut self.0, "maxScore");
        let payload = match self.0.remove("payload") {
            Some(Value::Object(payload)) => payload,
            Some(other) => {
                // "payload" happened to be a real field name
                self.0.insert("payload".to_string(), other);
                self.0
            }
            None => self.0,
        };
        (payload, score, max_score)
    }
}

fn take_integer(map: &mut Map<String, Value>, key: &str) -> Option<i64> {
    let extracted = match map.get(key) {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        _ => None,
    };
    if extracted.is_some() {
        map.remove(key);
    }
    extracted
}
