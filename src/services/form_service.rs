use std::sync::Arc;

use serde_json::Value;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{Field, Form, QuizType},
    models::dto::form_dto::{normalize_standalone_field, FormDto},
    models::dto::request::{
        AnalyzeResponsesRequest, AssistQuestionRequest, CreateFormRequest, GenerateFormFromImageRequest,
        GenerateFormRequest, RefactorFormRequest, SuggestQuestionRequest, UpdateFormRequest,
    },
    repositories::FormRepository,
    services::document_text,
    services::json_extract::extract_json,
    services::model_service::{image_data_url, ModelService},
    services::prompt_builder::PromptBuilder,
};

/// Owns every flow that produces or edits a form: the generation tasks that
/// go through the model, and the plain CRUD that does not.
pub struct FormService {
    forms: Arc<dyn FormRepository>,
    model: Arc<ModelService>,
    prompts: PromptBuilder,
}

impl FormService {
    pub fn new(
        forms: Arc<dyn FormRepository>,
        model: Arc<ModelService>,
        prompts: PromptBuilder,
    ) -> Self {
        Self {
            forms,
            model,
            prompts,
        }
    }

    pub async fn generate_form(&self, request: GenerateFormRequest) -> AppResult<FormDto> {
        request.validate()?;

        let prompt = self.prompts.generate_form(&request.prompt);
        let raw = self.model.complete_json(&prompt.system, &prompt.user).await?;
        parse_form_output(&raw)
    }

    pub async fn generate_form_from_image(
        &self,
        request: GenerateFormFromImageRequest,
    ) -> AppResult<FormDto> {
        request.validate()?;

        let data_url = image_data_url(&request.image, &request.mime_type)?;
        let prompt = self.prompts.generate_form_from_image(request.context.as_deref());
        let raw = self
            .model
            .complete_json_with_image(&prompt.system, &prompt.user, &data_url)
            .await?;
        parse_form_output(&raw)
    }

    /// Builds a form from an uploaded document. Text extraction failures are
    /// the uploader's problem and come back as 400s. Parsing a PDF can chew
    /// CPU for a while, so it runs on the blocking pool.
    pub async fn generate_form_from_document(
        &self,
        bytes: Vec<u8>,
        content_type: Option<String>,
        filename: Option<String>,
        brief: Option<String>,
        context: Option<String>,
    ) -> AppResult<FormDto> {
        let text = tokio::task::spawn_blocking(move || {
            document_text::extract_text(&bytes, content_type.as_deref(), filename.as_deref())
        })
        .await
        .map_err(|err| AppError::InternalError(format!("document parsing task failed: {err}")))??;

        let prompt = self
            .prompts
            .generate_form_from_document(&text, brief.as_deref(), context.as_deref());
        let raw = self.model.complete_json(&prompt.system, &prompt.user).await?;
        parse_form_output(&raw)
    }

    pub async fn assist_field(&self, request: AssistQuestionRequest) -> AppResult<Field> {
        request.validate()?;

        let prompt = self.prompts.assist_field(&request.prompt);
        let raw = self.model.complete_json(&prompt.system, &prompt.user).await?;
        parse_field_output(&raw)
    }

    pub async fn suggest_field(&self, request: SuggestQuestionRequest) -> AppResult<Field> {
        let form = &request.form;
        if form.title.trim().is_empty() {
            return Err(AppError::ValidationError(
                "the form needs a title before a question can be suggested".to_string(),
            ));
        }
        if form.quiz_type == Some(QuizType::Outcome)
            && form.result_pages.as_deref().unwrap_or(&[]).is_empty()
        {
            return Err(AppError::ValidationError(
                "an OUTCOME quiz needs result pages before a question can be suggested".to_string(),
            ));
        }

        let prompt = self.prompts.suggest_field(form);
        let raw = self.model.complete_json(&prompt.system, &prompt.user).await?;
        parse_field_output(&raw)
    }

    pub async fn refactor_form(&self, request: RefactorFormRequest) -> AppResult<FormDto> {
        request.validate()?;
        if !request.form_json.is_object() {
            return Err(AppError::ValidationError(
                "formJson must be a JSON object".to_string(),
            ));
        }

        let prompt = self.prompts.refactor_form(&request.form_json, &request.command);
        let raw = self.model.complete_json(&prompt.system, &prompt.user).await?;
        parse_form_output(&raw)
    }

    /// Produces a markdown report over the collected responses. When the
    /// caller names a form, the report is also cached on it; a failure there
    /// is logged and swallowed because the report itself already succeeded.
    pub async fn analyze_responses(&self, request: AnalyzeResponsesRequest) -> AppResult<String> {
        request.validate()?;
        if !request.form.is_object() {
            return Err(AppError::ValidationError(
                "form must be a JSON object".to_string(),
            ));
        }
        if request.responses.is_empty() {
            return Err(AppError::ValidationError(
                "there are no responses to analyze".to_string(),
            ));
        }

        let responses = Value::Array(request.responses);
        let prompt = self.prompts.analyze_responses(&request.form, &responses);
        let report = self.model.complete_text(&prompt.system, &prompt.user).await?;

        if let Some(form_id) = &request.form_id {
            if let Err(err) = self.forms.update_ai_summary(form_id, &report).await {
                log::warn!("Could not cache the AI summary for form '{}': {}", form_id, err);
            }
        }

        Ok(report)
    }

    pub async fn create_form(&self, request: CreateFormRequest) -> AppResult<Form> {
        request.validate()?;

        let form = request
            .form
            .into_form(&request.owner_id)
            .map_err(AppError::ValidationError)?;
        self.forms.create(form).await
    }

    pub async fn update_form(&self, id: &str, request: UpdateFormRequest) -> AppResult<Form> {
        request.validate()?;

        let existing = self.get_form(id).await?;
        let updated = request
            .form
            .apply_to(&existing)
            .map_err(AppError::ValidationError)?;
        self.forms.update(updated).await
    }

    pub async fn get_form(&self, id: &str) -> AppResult<Form> {
        self.forms
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Form with id '{}' not found", id)))
    }

    pub async fn list_forms(&self, owner_id: &str) -> AppResult<Vec<Form>> {
        self.forms.list_by_owner(owner_id).await
    }

    pub async fn delete_form(&self, id: &str) -> AppResult<()> {
        let deleted = self.forms.delete(id).await?;
        if !deleted {
            return Err(AppError::ValidationError(format!(
                "No form with id '{}' exists",
                id
            )));
        }
        Ok(())
    }
}

/// Model output for the form tasks: extract JSON, deserialize, normalize.
/// Every failure is the upstream's fault, so everything maps to
/// UpstreamMalformed and the raw text is logged for diagnosis.
fn parse_form_output(raw: &str) -> AppResult<FormDto> {
    let value = extract_json(raw).map_err(|err| {
        log::error!("Model output was not JSON: {}", err.raw_text());
        AppError::UpstreamMalformed(err.to_string())
    })?;
    let dto: FormDto = serde_json::from_value(value).map_err(|err| {
        log::error!("Model output did not match the form shape: {}", raw);
        AppError::UpstreamMalformed(format!("model output is not a form: {err}"))
    })?;
    dto.normalized().map_err(AppError::UpstreamMalformed)
}

fn parse_field_output(raw: &str) -> AppResult<Field> {
    let value = extract_json(raw).map_err(|err| {
        log::error!("Model output was not JSON: {}", err.raw_text());
        AppError::UpstreamMalformed(err.to_string())
    })?;
    let field: Field = serde_json::from_value(value).map_err(|err| {
        log::error!("Model output did not match the field shape: {}", raw);
        AppError::UpstreamMalformed(format!("model output is not a field: {err}"))
    })?;
    normalize_standalone_field(field).map_err(AppError::UpstreamMalformed)
}
