use std::sync::Arc;

use serde_json::{Map, Value};

use crate::{
    errors::{AppError, AppResult},
    models::domain::{Form, FormResponse},
    models::dto::request::SubmitResponseBody,
    models::dto::response::FormSummaryResponse,
    repositories::{FormRepository, ResponseRepository},
    services::{aggregation, payload, scoring},
};

/// Everything that happens after a form is published: accepting submissions,
/// listing them back for the owner, and aggregating them into a summary.
pub struct ResponseService {
    forms: Arc<dyn FormRepository>,
    responses: Arc<dyn ResponseRepository>,
}

impl ResponseService {
    pub fn new(forms: Arc<dyn FormRepository>, responses: Arc<dyn ResponseRepository>) -> Self {
        Self { forms, responses }
    }

    /// Stores one submission. The payload is canonicalized against the form
    /// definition before it is written, so every stored response carries grid
    /// answers in the nested shape regardless of which frontend sent them.
    pub async fn submit(
        &self,
        form_id: &str,
        body: SubmitResponseBody,
        user_agent: Option<String>,
        ip: Option<String>,
    ) -> AppResult<FormResponse> {
        let form = self.forms.find_by_id(form_id).await?.ok_or_else(|| {
            AppError::ValidationError(format!("No form with id '{}' exists", form_id))
        })?;

        let (raw_payload, submitted_score, submitted_max) = body.into_parts();
        if raw_payload.is_empty() {
            return Err(AppError::ValidationError(
                "the submission is empty".to_string(),
            ));
        }

        let canonical = payload::canonicalize(&form.fields, raw_payload);
        let (score, max_score) = resolve_score(&form, &canonical, submitted_score, submitted_max);

        let response = FormResponse::new(form_id, canonical, score, max_score, user_agent, ip);
        self.responses.add(response).await
    }

    pub async fn list_for_form(&self, form_id: &str) -> AppResult<Vec<FormResponse>> {
        let form = self.require_form(form_id).await?;
        self.canonical_responses(&form).await
    }

    pub async fn summary(&self, form_id: &str) -> AppResult<FormSummaryResponse> {
        let form = self.require_form(form_id).await?;
        let responses = self.canonical_responses(&form).await?;
        Ok(aggregation::summarize(&form, &responses))
    }

    async fn require_form(&self, form_id: &str) -> AppResult<Form> {
        self.forms
            .find_by_id(form_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Form with id '{}' not found", form_id)))
    }

    /// Responses written before the nested grid shape became canonical still
    /// carry dotted or bracketed keys, so the shim runs on the way out too.
    async fn canonical_responses(&self, form: &Form) -> AppResult<Vec<FormResponse>> {
        let mut responses = self.responses.list_by_form(&form.id).await?;
        for response in &mut responses {
            let raw = std::mem::take(&mut response.payload);
            response.payload = payload::canonicalize(&form.fields, raw);
        }
        Ok(responses)
    }
}

/// A quiz submission that arrives without a score is graded here; one that
/// arrives with a score is trusted, only the ceiling is filled in. Plain
/// forms store whatever the client sent, usually nothing.
fn resolve_score(
    form: &Form,
    payload: &Map<String, Value>,
    score: Option<i64>,
    max_score: Option<i64>,
) -> (Option<i64>, Option<i64>) {
    if !form.is_quiz {
        return (score, max_score);
    }
    if let Some(score) = score {
        return (Some(score), max_score.or_else(|| Some(form.max_possible_score())));
    }
    let scored = scoring::score_submission(form, payload);
    (Some(scored.score), Some(scored.max_score))
}
