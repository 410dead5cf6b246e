use actix_multipart::form::{tempfile::TempFile, text::Text, MultipartForm};
use actix_web::{get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::request::{
        AssistQuestionRequest, CreateFormRequest, GenerateFormFromImageRequest, GenerateFormRequest,
        OwnerQuery, RefactorFormRequest, SuggestQuestionRequest, UpdateFormRequest,
    },
    models::dto::response::AckResponse,
};

#[post("/generate-form")]
async fn generate_form(
    state: web::Data<AppState>,
    request: web::Json<GenerateFormRequest>,
) -> Result<HttpResponse, AppError> {
    let form = state.form_service.generate_form(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(form))
}

#[post("/assist-question")]
async fn assist_question(
    state: web::Data<AppState>,
    request: web::Json<AssistQuestionRequest>,
) -> Result<HttpResponse, AppError> {
    let field = state.form_service.assist_field(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(field))
}

#[post("/suggest-question")]
async fn suggest_question(
    state: web::Data<AppState>,
    request: web::Json<SuggestQuestionRequest>,
) -> Result<HttpResponse, AppError> {
    let field = state.form_service.suggest_field(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(field))
}

#[post("/generate-form-from-image")]
async fn generate_form_from_image(
    state: web::Data<AppState>,
    request: web::Json<GenerateFormFromImageRequest>,
) -> Result<HttpResponse, AppError> {
    let form = state
        .form_service
        .generate_form_from_image(request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(form))
}

#[derive(Debug, MultipartForm)]
pub struct DocumentUpload {
    pub file: TempFile,
    pub prompt: Option<Text<String>>,
    pub context: Option<Text<String>>,
}

#[post("/generate-form-from-document")]
async fn generate_form_from_document(
    state: web::Data<AppState>,
    MultipartForm(upload): MultipartForm<DocumentUpload>,
) -> Result<HttpResponse, AppError> {
    let DocumentUpload {
        file,
        prompt,
        context,
    } = upload;
    let content_type = file.content_type.as_ref().map(|m| m.essence_str().to_string());
    let filename = file.file_name.clone();
    let bytes = read_upload(file).await?;

    let form = state
        .form_service
        .generate_form_from_document(
            bytes,
            content_type,
            filename,
            prompt.map(|t| t.0),
            context.map(|t| t.0),
        )
        .await?;
    Ok(HttpResponse::Ok().json(form))
}

/// Rejects empty uploads, then reads the buffered file back off the async
/// thread. The temp file drops and unlinks itself once the read completes.
async fn read_upload(file: TempFile) -> Result<Vec<u8>, AppError> {
    if file.size == 0 {
        return Err(AppError::ValidationError(
            "the uploaded file is empty".to_string(),
        ));
    }

    let temp = file.file;
    web::block(move || std::fs::read(temp.path()))
        .await
        .map_err(|err| AppError::InternalError(format!("upload read task failed: {err}")))?
        .map_err(|err| {
            AppError::InternalError(format!("could not read the buffered upload: {err}"))
        })
}

#[post("/refactor-form")]
async fn refactor_form(
    state: web::Data<AppState>,
    request: web::Json<RefactorFormRequest>,
) -> Result<HttpResponse, AppError> {
    let form = state.form_service.refactor_form(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(form))
}

#[post("/forms")]
async fn create_form(
    state: web::Data<AppState>,
    request: web::Json<CreateFormRequest>,
) -> Result<HttpResponse, AppError> {
    let form = state.form_service.create_form(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(form))
}

#[actix_web::put("/forms/{form_id}")]
async fn update_form(
    state: web::Data<AppState>,
    form_id: web::Path<String>,
    request: web::Json<UpdateFormRequest>,
) -> Result<HttpResponse, AppError> {
    let form = state
        .form_service
        .update_form(&form_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(form))
}

#[get("/forms/{form_id}")]
async fn get_form(
    state: web::Data<AppState>,
    form_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let form = state.form_service.get_form(&form_id).await?;
    Ok(HttpResponse::Ok().json(form))
}

#[get("/forms")]
async fn list_forms(
    state: web::Data<AppState>,
    query: web::Query<OwnerQuery>,
) -> Result<HttpResponse, AppError> {
    let forms = state.form_service.list_forms(&query.owner_id).await?;
    Ok(HttpResponse::Ok().json(forms))
}

#[actix_web::delete("/forms/{form_id}")]
async fn delete_form(
    state: web::Data<AppState>,
    form_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.form_service.delete_form(&form_id).await?;
    Ok(HttpResponse::Ok().json(AckResponse { ok: true }))
}
