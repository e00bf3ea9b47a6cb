use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    AuditEvent, AuditOutcome, UuidPath, ValidatedBody,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, ForbiddenResponse,
        InternalServerErrorResponse, NotFoundResponse,
    },
    extract_ip_from_headers, extract_user_agent,
};
use serde_json::json;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::entity;
use crate::error::{CategoryError, CategoryResult};
use crate::models::{Category, CategoryNode, CreateCategory, UpdateCategory};
use crate::repository::CategoryRepository;
use crate::service::CategoryService;

/// OpenAPI documentation for the categories API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_categories,
        create_category,
        get_category,
        update_category,
        delete_category,
    ),
    components(
        schemas(Category, CategoryNode, CreateCategory, UpdateCategory),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            ForbiddenResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = entity::Model::TAG, description = "Category tree endpoints")
    )
)]
pub struct ApiDoc;

/// Category routes, to be nested under `/categories`
pub fn router<R: CategoryRepository + 'static>(service: CategoryService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route(
            "/{id}",
            get(get_category)
                .patch(update_category)
                .delete(delete_category),
        )
        .with_state(shared_service)
}

/// List root categories as a nested tree
#[utoipa::path(
    get,
    path = "",
    tag = entity::Model::TAG,
    responses(
        (status = 200, description = "Root categories with their subtrees", body = Vec<CategoryNode>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_categories<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
) -> CategoryResult<Json<Vec<CategoryNode>>> {
    let tree = service.list_tree().await?;
    Ok(Json(tree))
}

/// Create a root category, or a child of `parent_name`
#[utoipa::path(
    post,
    path = "",
    tag = entity::Model::TAG,
    request_body(
        content(
            (CreateCategory = "application/json"),
            (CreateCategory = "application/x-www-form-urlencoded")
        )
    ),
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_category<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
    headers: HeaderMap,
    ValidatedBody(input): ValidatedBody<CreateCategory>,
) -> CategoryResult<impl IntoResponse> {
    let category = service.create_category(input).await?;

    AuditEvent::new(
        "category.create",
        Some(format!("category:{}", category.id)),
        AuditOutcome::Success,
    )
    .with_ip(extract_ip_from_headers(&headers))
    .with_user_agent(extract_user_agent(&headers))
    .with_details(json!({
        "name": category.name,
        "parent_id": category.parent_id,
        "nesting_level": category.nesting_level,
    }))
    .log();

    Ok((StatusCode::CREATED, Json(category)))
}

/// Get a category by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = entity::Model::TAG,
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category found", body = Category),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_category<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
    UuidPath(id): UuidPath,
) -> CategoryResult<Json<Category>> {
    let category = service.get_category(id).await?;
    Ok(Json(category))
}

/// Rename a category
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = entity::Model::TAG,
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    request_body(
        content(
            (UpdateCategory = "application/json"),
            (UpdateCategory = "application/x-www-form-urlencoded")
        )
    ),
    responses(
        (status = 200, description = "Category updated", body = Category),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_category<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
    UuidPath(id): UuidPath,
    ValidatedBody(input): ValidatedBody<UpdateCategory>,
) -> CategoryResult<Json<Category>> {
    let category = service.update_category(id, input).await?;
    Ok(Json(category))
}

/// Delete a category that has no children
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = entity::Model::TAG,
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_category<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
    headers: HeaderMap,
    UuidPath(id): UuidPath,
) -> CategoryResult<StatusCode> {
    let result = service.delete_category(id).await;

    let outcome = match &result {
        Ok(()) => Some(AuditOutcome::Success),
        Err(CategoryError::HasChildren(_)) => Some(AuditOutcome::Denied),
        Err(_) => None,
    };

    if let Some(outcome) = outcome {
        AuditEvent::new("category.delete", Some(format!("category:{}", id)), outcome)
            .with_ip(extract_ip_from_headers(&headers))
            .with_user_agent(extract_user_agent(&headers))
            .log();
    }

    result?;
    Ok(StatusCode::NO_CONTENT)
}
