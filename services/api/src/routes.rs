use crate::infra::AppState;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use prestabanco::lending::{
    ApplicationDraft, ApplicationId, ApplicationPatch, ApplicationService,
    ApplicationServiceError, ApplicationStore, DocumentError, DocumentId,
    DocumentLifecycleManager, DocumentPatch, DocumentStatus, DocumentStore, DocumentType,
    StoreError, UserId,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::error;

#[derive(Debug, Deserialize)]
pub(crate) struct CreateDocumentRequest {
    pub(crate) application_id: ApplicationId,
    pub(crate) document_type: String,
    pub(crate) file_name: String,
    pub(crate) file_url: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct UpdateDocumentRequest {
    #[serde(default)]
    pub(crate) status: Option<String>,
    #[serde(default)]
    pub(crate) file_name: Option<String>,
    #[serde(default)]
    pub(crate) file_url: Option<String>,
    #[serde(default)]
    pub(crate) expected_version: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusChangeRequest {
    pub(crate) status: String,
}

/// Failure of a lending operation, rendered as a JSON error body.
#[derive(Debug)]
pub(crate) enum ApiError {
    Document(DocumentError),
    Application(ApplicationServiceError),
}

impl From<DocumentError> for ApiError {
    fn from(value: DocumentError) -> Self {
        Self::Document(value)
    }
}

impl From<ApplicationServiceError> for ApiError {
    fn from(value: ApplicationServiceError) -> Self {
        Self::Application(value)
    }
}

fn store_status(err: &StoreError) -> StatusCode {
    match err {
        StoreError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        StoreError::NotFound => StatusCode::NOT_FOUND,
        StoreError::StaleVersion { .. } => StatusCode::CONFLICT,
        StoreError::MissingApplication(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Document(err) => {
                let status = match err {
                    DocumentError::NotFound(_) => StatusCode::NOT_FOUND,
                    DocumentError::InvalidStatus(_)
                    | DocumentError::InvalidTransition { .. }
                    | DocumentError::EmptyField(_) => StatusCode::BAD_REQUEST,
                    DocumentError::UnknownApplication(_) => StatusCode::UNPROCESSABLE_ENTITY,
                    DocumentError::DuplicateActive { .. }
                    | DocumentError::VersionConflict { .. } => StatusCode::CONFLICT,
                    DocumentError::Store(store) => store_status(store),
                };
                (status, json!({ "error": err.to_string() }))
            }
            ApiError::Application(err) => match err {
                ApplicationServiceError::IncompleteDocumentation { missing, .. } => (
                    StatusCode::CONFLICT,
                    json!({ "error": err.to_string(), "missing_types": missing }),
                ),
                ApplicationServiceError::NotFound(_) => {
                    (StatusCode::NOT_FOUND, json!({ "error": err.to_string() }))
                }
                ApplicationServiceError::InvalidStatus(_) => {
                    (StatusCode::BAD_REQUEST, json!({ "error": err.to_string() }))
                }
                ApplicationServiceError::Store(store) => {
                    (store_status(store), json!({ "error": err.to_string() }))
                }
            },
        };

        if status.is_server_error() {
            error!(%status, error = ?self, "lending operation failed");
        }
        (status, Json(body)).into_response()
    }
}

/// Document endpoints, mirroring the reviewer console's `/api/documents` resource.
pub(crate) fn document_router<D, A>(manager: Arc<DocumentLifecycleManager<D, A>>) -> Router
where
    D: DocumentStore + 'static,
    A: ApplicationStore + 'static,
{
    Router::new()
        .route(
            "/api/documents",
            axum::routing::post(create_document::<D, A>),
        )
        .route(
            "/api/documents/:id",
            get(get_document::<D, A>)
                .put(update_document::<D, A>)
                .delete(delete_document::<D, A>),
        )
        .route(
            "/api/documents/application/:application_id",
            get(list_documents::<D, A>),
        )
        .with_state(manager)
}

/// Application endpoints including the completeness check.
pub(crate) fn application_router<A, D>(service: Arc<ApplicationService<A, D>>) -> Router
where
    A: ApplicationStore + 'static,
    D: DocumentStore + 'static,
{
    Router::new()
        .route(
            "/api/applications",
            get(list_applications::<A, D>).post(create_application::<A, D>),
        )
        .route(
            "/api/applications/:id",
            get(get_application::<A, D>)
                .put(update_application::<A, D>)
                .delete(delete_application::<A, D>),
        )
        .route(
            "/api/applications/:id/status",
            axum::routing::put(update_application_status::<A, D>),
        )
        .route(
            "/api/applications/:id/completeness",
            get(application_completeness::<A, D>),
        )
        .route(
            "/api/applications/user/:user_id",
            get(list_user_applications::<A, D>),
        )
        .with_state(service)
}

pub(crate) fn with_lending_routes<D, A>(
    documents: Arc<DocumentLifecycleManager<D, A>>,
    applications: Arc<ApplicationService<A, D>>,
) -> Router
where
    D: DocumentStore + 'static,
    A: ApplicationStore + 'static,
{
    document_router(documents)
        .merge(application_router(applications))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

async fn create_document<D, A>(
    State(manager): State<Arc<DocumentLifecycleManager<D, A>>>,
    Json(request): Json<CreateDocumentRequest>,
) -> Result<Response, ApiError>
where
    D: DocumentStore + 'static,
    A: ApplicationStore + 'static,
{
    let document_type: DocumentType = request
        .document_type
        .parse()
        .map_err(DocumentError::InvalidStatus)?;
    let record = manager.create(
        request.application_id,
        document_type,
        request.file_name,
        request.file_url,
    )?;
    Ok((StatusCode::CREATED, Json(record)).into_response())
}

async fn get_document<D, A>(
    State(manager): State<Arc<DocumentLifecycleManager<D, A>>>,
    Path(id): Path<u64>,
) -> Result<Response, ApiError>
where
    D: DocumentStore + 'static,
    A: ApplicationStore + 'static,
{
    let record = manager.get(DocumentId(id))?;
    Ok(Json(record).into_response())
}

async fn list_documents<D, A>(
    State(manager): State<Arc<DocumentLifecycleManager<D, A>>>,
    Path(application_id): Path<u64>,
) -> Result<Response, ApiError>
where
    D: DocumentStore + 'static,
    A: ApplicationStore + 'static,
{
    let records = manager.list_for_application(ApplicationId(application_id))?;
    Ok(Json(records).into_response())
}

async fn update_document<D, A>(
    State(manager): State<Arc<DocumentLifecycleManager<D, A>>>,
    Path(id): Path<u64>,
    Json(request): Json<UpdateDocumentRequest>,
) -> Result<Response, ApiError>
where
    D: DocumentStore + 'static,
    A: ApplicationStore + 'static,
{
    let status = request
        .status
        .as_deref()
        .map(str::parse::<DocumentStatus>)
        .transpose()
        .map_err(DocumentError::InvalidStatus)?;
    let patch = DocumentPatch {
        status,
        file_name: request.file_name,
        file_url: request.file_url,
        expected_version: request.expected_version,
    };
    let record = manager.update(DocumentId(id), patch)?;
    Ok(Json(record).into_response())
}

async fn delete_document<D, A>(
    State(manager): State<Arc<DocumentLifecycleManager<D, A>>>,
    Path(id): Path<u64>,
) -> Result<Response, ApiError>
where
    D: DocumentStore + 'static,
    A: ApplicationStore + 'static,
{
    manager.delete(DocumentId(id))?;
    Ok(StatusCode::OK.into_response())
}

async fn create_application<A, D>(
    State(service): State<Arc<ApplicationService<A, D>>>,
    Json(draft): Json<ApplicationDraft>,
) -> Result<Response, ApiError>
where
    A: ApplicationStore + 'static,
    D: DocumentStore + 'static,
{
    let record = service.create(draft)?;
    Ok((StatusCode::CREATED, Json(record)).into_response())
}

async fn list_applications<A, D>(
    State(service): State<Arc<ApplicationService<A, D>>>,
) -> Result<Response, ApiError>
where
    A: ApplicationStore + 'static,
    D: DocumentStore + 'static,
{
    Ok(Json(service.list_all()?).into_response())
}

async fn list_user_applications<A, D>(
    State(service): State<Arc<ApplicationService<A, D>>>,
    Path(user_id): Path<u64>,
) -> Result<Response, ApiError>
where
    A: ApplicationStore + 'static,
    D: DocumentStore + 'static,
{
    Ok(Json(service.list_for_user(UserId(user_id))?).into_response())
}

async fn get_application<A, D>(
    State(service): State<Arc<ApplicationService<A, D>>>,
    Path(id): Path<u64>,
) -> Result<Response, ApiError>
where
    A: ApplicationStore + 'static,
    D: DocumentStore + 'static,
{
    Ok(Json(service.get(ApplicationId(id))?).into_response())
}

async fn update_application<A, D>(
    State(service): State<Arc<ApplicationService<A, D>>>,
    Path(id): Path<u64>,
    Json(patch): Json<ApplicationPatch>,
) -> Result<Response, ApiError>
where
    A: ApplicationStore + 'static,
    D: DocumentStore + 'static,
{
    Ok(Json(service.update(ApplicationId(id), patch)?).into_response())
}

async fn update_application_status<A, D>(
    State(service): State<Arc<ApplicationService<A, D>>>,
    Path(id): Path<u64>,
    Json(request): Json<StatusChangeRequest>,
) -> Result<Response, ApiError>
where
    A: ApplicationStore + 'static,
    D: DocumentStore + 'static,
{
    let record = service.update_status(ApplicationId(id), &request.status)?;
    Ok(Json(record).into_response())
}

async fn application_completeness<A, D>(
    State(service): State<Arc<ApplicationService<A, D>>>,
    Path(id): Path<u64>,
) -> Result<Response, ApiError>
where
    A: ApplicationStore + 'static,
    D: DocumentStore + 'static,
{
    Ok(Json(service.evaluate_completeness(ApplicationId(id))?).into_response())
}

async fn delete_application<A, D>(
    State(service): State<Arc<ApplicationService<A, D>>>,
    Path(id): Path<u64>,
) -> Result<Response, ApiError>
where
    A: ApplicationStore + 'static,
    D: DocumentStore + 'static,
{
    Ok(Json(service.delete(ApplicationId(id))?).into_response())
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
