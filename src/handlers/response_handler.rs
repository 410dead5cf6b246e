use actix_web::{get, http::header, post, web, HttpRequest, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::request::{AnalyzeResponsesRequest, SubmitResponseBody},
    models::dto::response::SubmitAckResponse,
};

#[post("/submit-response/{form_id}")]
async fn submit_response(
    state: web::Data<AppState>,
    form_id: web::Path<String>,
    body: web::Json<SubmitResponseBody>,
    request: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let user_agent = request
        .headers()
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let ip = request
        .connection_info()
        .realip_remote_addr()
        .map(str::to_string);

    let stored = state
        .response_service
        .submit(&form_id, body.into_inner(), user_agent, ip)
        .await?;
    Ok(HttpResponse::Created().json(SubmitAckResponse {
        ok: true,
        id: stored.id,
    }))
}

#[get("/forms/{form_id}/responses")]
async fn list_responses(
    state: web::Data<AppState>,
    form_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let responses = state.response_service.list_for_form(&form_id).await?;
    Ok(HttpResponse::Ok().json(responses))
}

#[get("/forms/{form_id}/summary")]
async fn form_summary(
    state: web::Data<AppState>,
    form_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let summary = state.response_service.summary(&form_id).await?;
    Ok(HttpResponse::Ok().json(summary))
}

/// The report goes back as markdown, not JSON: it is pasted straight into
/// the dashboard's report pane.
#[post("/analyze-responses")]
async fn analyze_responses(
    state: web::Data<AppState>,
    request: web::Json<AnalyzeResponsesRequest>,
) -> Result<HttpResponse, AppError> {
    let report = state
        .form_service
        .analyze_responses(request.into_inner())
        .await?;
    Ok(HttpResponse::Ok()
        .content_type("text/markdown; charset=utf-8")
        .body(report))
}
