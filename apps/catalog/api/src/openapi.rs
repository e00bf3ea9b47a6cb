use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Catalog API",
        version = "0.1.0",
        description = "Category tree and product catalog"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = "/categories", api = domain_categories::ApiDoc),
        (path = "/products", api = domain_products::ApiDoc)
    )
)]
pub struct ApiDoc;
