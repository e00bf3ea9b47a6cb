//! HTTP handlers for the products API

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    AuditEvent, AuditOutcome, ValidatedJson,
    errors::responses::{BadRequestValidationResponse, InternalServerErrorResponse, NotFoundResponse},
    extract_ip_from_headers, extract_user_agent,
};
use domain_categories::CategoryRepository;
use serde_json::json;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::entity::product;
use crate::error::ProductResult;
use crate::models::{
    CreateProduct, ProductDetail, ProductListQuery, ProductPage, ProductSummary, UpdateProduct,
};
use crate::repository::ProductRepository;
use crate::service::ProductService;

/// OpenAPI documentation for the products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        get_product,
        update_product,
        delete_product,
    ),
    components(
        schemas(CreateProduct, UpdateProduct, ProductDetail, ProductSummary, ProductPage),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = product::Model::TAG, description = "Product endpoints")
    )
)]
pub struct ApiDoc;

type SharedService<P, C> = Arc<ProductService<P, C>>;

/// Product routes, to be nested under `/products`
pub fn router<P, C>(service: ProductService<P, C>) -> Router
where
    P: ProductRepository + 'static,
    C: CategoryRepository + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{code}",
            get(get_product)
                .patch(update_product)
                .delete(delete_product),
        )
        .with_state(shared_service)
}

fn audit(action: &str, code: &str, headers: &HeaderMap) -> AuditEvent {
    AuditEvent::new(action, Some(format!("product:{}", code)), AuditOutcome::Success)
        .with_ip(extract_ip_from_headers(headers))
        .with_user_agent(extract_user_agent(headers))
}

/// List the products of one category, paginated and ordered by code
#[utoipa::path(
    get,
    path = "",
    tag = product::Model::TAG,
    params(ProductListQuery),
    responses(
        (status = 200, description = "One page of products", body = ProductPage),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<P: ProductRepository, C: CategoryRepository>(
    State(service): State<SharedService<P, C>>,
    Query(query): Query<ProductListQuery>,
) -> ProductResult<Json<ProductPage>> {
    let page = service.list_products(query).await?;
    Ok(Json(page))
}

/// Create a product and link it to existing categories by name
#[utoipa::path(
    post,
    path = "",
    tag = product::Model::TAG,
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created", body = ProductDetail),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<P: ProductRepository, C: CategoryRepository>(
    State(service): State<SharedService<P, C>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<CreateProduct>,
) -> ProductResult<impl IntoResponse> {
    let requested = input.categories.len();
    let product = service.create_product(input).await?;

    audit("product.create", &product.code, &headers)
        .with_details(json!({
            "categories": product.categories,
            "requested_categories": requested,
        }))
        .log();

    Ok((StatusCode::CREATED, Json(product)))
}

/// Get a product by code
#[utoipa::path(
    get,
    path = "/{code}",
    tag = product::Model::TAG,
    params(
        ("code" = String, Path, description = "Product code")
    ),
    responses(
        (status = 200, description = "Product found", body = ProductDetail),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<P: ProductRepository, C: CategoryRepository>(
    State(service): State<SharedService<P, C>>,
    Path(code): Path<String>,
) -> ProductResult<Json<ProductDetail>> {
    let product = service.get_product(&code).await?;
    Ok(Json(product))
}

/// Update a product's code, name, price or quantity
#[utoipa::path(
    patch,
    path = "/{code}",
    tag = product::Model::TAG,
    params(
        ("code" = String, Path, description = "Product code")
    ),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Product updated", body = ProductDetail),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<P: ProductRepository, C: CategoryRepository>(
    State(service): State<SharedService<P, C>>,
    headers: HeaderMap,
    Path(code): Path<String>,
    ValidatedJson(input): ValidatedJson<UpdateProduct>,
) -> ProductResult<Json<ProductDetail>> {
    let product = service.update_product(&code, input).await?;

    audit("product.update", &code, &headers)
        .with_details(json!({ "code": product.code }))
        .log();

    Ok(Json(product))
}

/// Delete a product and its category links
#[utoipa::path(
    delete,
    path = "/{code}",
    tag = product::Model::TAG,
    params(
        ("code" = String, Path, description = "Product code")
    ),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<P: ProductRepository, C: CategoryRepository>(
    State(service): State<SharedService<P, C>>,
    headers: HeaderMap,
    Path(code): Path<String>,
) -> ProductResult<StatusCode> {
    service.delete_product(&code).await?;

    audit("product.delete", &code, &headers).log();

    Ok(StatusCode::NO_CONTENT)
}
