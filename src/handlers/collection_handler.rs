use actix_web::{delete, get, patch, post, put, web, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::request::{
        AnswerSetPayload, ChangeActivityTypeRequest, CreateActivityRequest,
        CreateCollectionRequest, PaginationParams, UpdateActivityRequest, UpdateCollectionRequest,
    },
    models::dto::response::{ActivityConversionDto, CollectionSummaryDto, PagedResponse},
};

#[post("/api/collections")]
async fn create_collection(
    state: web::Data<AppState>,
    request: web::Json<CreateCollectionRequest>,
) -> Result<HttpResponse, AppError> {
    let collection = state
        .collection_service
        .create_collection(request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(collection))
}

#[get("/api/collections")]
async fn list_collections(
    state: web::Data<AppState>,
    params: web::Query<PaginationParams>,
) -> Result<HttpResponse, AppError> {
    let params = params.into_inner();
    let (collections, total) = state
        .collection_service
        .list_collections(params.offset(), params.limit())
        .await?;

    let items: Vec<CollectionSummaryDto> = collections
        .into_iter()
        .map(CollectionSummaryDto::from)
        .collect();
    Ok(HttpResponse::Ok().json(PagedResponse { items, total }))
}

#[get("/api/collections/{id}")]
async fn get_collection(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let collection = state.collection_service.get_collection(&id).await?;
    Ok(HttpResponse::Ok().json(collection))
}

#[patch("/api/collections/{id}")]
async fn update_collection(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateCollectionRequest>,
) -> Result<HttpResponse, AppError> {
    let collection = state
        .collection_service
        .update_collection(&id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(collection))
}

#[delete("/api/collections/{id}")]
async fn delete_collection(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.collection_service.delete_collection(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[post("/api/collections/{id}/activities")]
async fn add_activity(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<CreateActivityRequest>,
) -> Result<HttpResponse, AppError> {
    let activity = state
        .collection_service
        .add_activity(&id, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(activity))
}

#[patch("/api/collections/{collection_id}/activities/{activity_id}")]
async fn update_activity(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    request: web::Json<UpdateActivityRequest>,
) -> Result<HttpResponse, AppError> {
    let (collection_id, activity_id) = path.into_inner();
    let activity = state
        .collection_service
        .update_activity(&collection_id, &activity_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(activity))
}

#[delete("/api/collections/{collection_id}/activities/{activity_id}")]
async fn remove_activity(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (collection_id, activity_id) = path.into_inner();
    let collection = state
        .collection_service
        .remove_activity(&collection_id, &activity_id)
        .await?;
    Ok(HttpResponse::Ok().json(collection))
}

#[put("/api/collections/{collection_id}/activities/{activity_id}/answers")]
async fn set_answers(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    payload: web::Json<AnswerSetPayload>,
) -> Result<HttpResponse, AppError> {
    let (collection_id, activity_id) = path.into_inner();
    let activity = state
        .collection_service
        .set_answers(&collection_id, &activity_id, payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(activity))
}

#[put("/api/collections/{collection_id}/activities/{activity_id}/type")]
async fn change_activity_type(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    request: web::Json<ChangeActivityTypeRequest>,
) -> Result<HttpResponse, AppError> {
    let (collection_id, activity_id) = path.into_inner();
    let (activity, warnings) = state
        .collection_service
        .change_activity_type(&collection_id, &activity_id, request.new_type)
        .await?;
    Ok(HttpResponse::Ok().json(ActivityConversionDto { activity, warnings }))
}
