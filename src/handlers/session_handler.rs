use actix_web::{get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::request::{CreateSessionRequest, JoinSessionRequest, SubmitAnswerRequest},
    models::dto::response::{HealthDto, JoinSessionDto, SubmissionDto},
};

#[post("/api/sessions")]
async fn create_session(
    state: web::Data<AppState>,
    request: web::Json<CreateSessionRequest>,
) -> Result<HttpResponse, AppError> {
    let session = state
        .session_service
        .create_session(request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(session))
}

#[get("/api/sessions/{id}")]
async fn get_session(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let session = state.session_service.get_session(&id).await?;
    Ok(HttpResponse::Ok().json(session))
}

#[post("/api/sessions/join")]
async fn join_session(
    state: web::Data<AppState>,
    request: web::Json<JoinSessionRequest>,
) -> Result<HttpResponse, AppError> {
    let (session, participant) = state
        .session_service
        .join_session(request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(JoinSessionDto::new(&session, participant)))
}

#[post("/api/sessions/{id}/start")]
async fn start_session(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let session = state.session_service.start_session(&id).await?;
    Ok(HttpResponse::Ok().json(session))
}

#[post("/api/sessions/{id}/advance")]
async fn advance_session(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let session = state.session_service.advance_session(&id).await?;
    Ok(HttpResponse::Ok().json(session))
}

#[post("/api/sessions/{id}/finish")]
async fn finish_session(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let session = state.session_service.finish_session(&id).await?;
    Ok(HttpResponse::Ok().json(session))
}

#[post("/api/sessions/{session_id}/activities/{activity_id}/submissions")]
async fn submit_answer(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    request: web::Json<SubmitAnswerRequest>,
) -> Result<HttpResponse, AppError> {
    let (session_id, activity_id) = path.into_inner();
    let submission = state
        .session_service
        .submit_answer(&session_id, &activity_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(SubmissionDto::from(submission)))
}

#[get("/api/sessions/{id}/leaderboard")]
async fn leaderboard(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let entries = state.session_service.leaderboard(&id).await?;
    Ok(HttpResponse::Ok().json(entries))
}

#[get("/api/health")]
async fn health_check(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    state.db.health_check().await?;
    Ok(HttpResponse::Ok().json(HealthDto {
        status: "ok".to_string(),
    }))
}
