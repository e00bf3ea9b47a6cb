use domain_categories::{Category, CategoryRepository};
use observability::CatalogMetrics;
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{
    CreateProduct, DEFAULT_PAGE_SIZE, NewProduct, ProductDetail, ProductListQuery, ProductPage,
    UpdateProduct,
};
use crate::repository::ProductRepository;

/// Product rules on top of the product and category repositories
pub struct ProductService<P: ProductRepository, C: CategoryRepository> {
    products: Arc<P>,
    categories: Arc<C>,
}

impl<P: ProductRepository, C: CategoryRepository> Clone for ProductService<P, C> {
    fn clone(&self) -> Self {
        Self {
            products: Arc::clone(&self.products),
            categories: Arc::clone(&self.categories),
        }
    }
}

/// Page size from the query string; anything unusable falls back to the default.
fn page_size(raw: Option<&str>) -> u64 {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|size| *size >= 1)
        .map(|size| size as u64)
        .unwrap_or(DEFAULT_PAGE_SIZE)
}

/// 1-based page number from the query string.
fn page_number(raw: Option<&str>) -> ProductResult<u64> {
    match raw {
        None => Ok(1),
        Some(value) => value
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|page| *page >= 1)
            .ok_or(ProductError::InvalidPage),
    }
}

impl<P: ProductRepository, C: CategoryRepository> ProductService<P, C> {
    pub fn new(products: P, categories: C) -> Self {
        Self {
            products: Arc::new(products),
            categories: Arc::new(categories),
        }
    }

    /// Validates, resolves category names and stores the product.
    ///
    /// Names that match no category are dropped; the product is still created.
    #[instrument(skip(self, input), fields(code = %input.code))]
    pub async fn create_product(&self, input: CreateProduct) -> ProductResult<ProductDetail> {
        input.validate()?;

        if self.products.code_exists(&input.code).await? {
            return Err(ProductError::DuplicateCode(input.code));
        }

        let categories = self.resolve_categories(&input.categories).await?;

        let price = input.price.ok_or_else(|| {
            ProductError::Internal("price missing after validation".to_string())
        })?;
        let new_product = NewProduct::new(input.code, input.name, price, input.quantity);

        let product = self.products.create(new_product, categories).await?;
        CatalogMetrics::record_product_created(product.categories.len());

        Ok(product.into())
    }

    /// Distinct names to categories, oldest category first.
    async fn resolve_categories(&self, names: &[String]) -> ProductResult<Vec<Category>> {
        let mut distinct: Vec<String> = Vec::with_capacity(names.len());
        for name in names {
            if !distinct.contains(name) {
                distinct.push(name.clone());
            }
        }

        let mut categories = self.categories.find_by_names(&distinct).await?;

        let unresolved = distinct.len() - categories.len();
        if unresolved > 0 {
            let missing: Vec<&str> = distinct
                .iter()
                .filter(|name| !categories.iter().any(|c| &c.name == *name))
                .map(String::as_str)
                .collect();
            tracing::warn!(?missing, "Dropping unknown category names");
            CatalogMetrics::record_unresolved_category_names(unresolved);
        }

        categories.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(categories)
    }

    /// Products linked to the named category, one page at a time.
    #[instrument(skip(self))]
    pub async fn list_products(&self, query: ProductListQuery) -> ProductResult<ProductPage> {
        let name = query
            .category
            .filter(|name| !name.is_empty())
            .ok_or(ProductError::MissingCategory)?;

        let category = self
            .categories
            .find_by_name(&name)
            .await?
            .ok_or(ProductError::CategoryNotFound(name))?;

        let page_size = page_size(query.page_size.as_deref());
        let page = page_number(query.page.as_deref())?;

        let count = self.products.count_by_category(category.id).await?;
        let total_pages = count.div_ceil(page_size).max(1);
        if page > total_pages {
            return Err(ProductError::InvalidPage);
        }

        let results = self
            .products
            .list_by_category(category.id, page - 1, page_size)
            .await?;

        CatalogMetrics::record_product_page(results.len());

        Ok(ProductPage {
            count,
            page,
            page_size,
            total_pages,
            results,
        })
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, code: &str) -> ProductResult<ProductDetail> {
        self.products
            .get_by_code(code)
            .await?
            .map(Into::into)
            .ok_or_else(|| ProductError::NotFound(code.to_string()))
    }

    #[instrument(skip(self, input))]
    pub async fn update_product(
        &self,
        code: &str,
        input: UpdateProduct,
    ) -> ProductResult<ProductDetail> {
        input.validate()?;

        if let Some(new_code) = &input.code {
            if new_code != code && self.products.code_exists(new_code).await? {
                return Err(ProductError::DuplicateCode(new_code.clone()));
            }
        }

        let product = self.products.update(code, input).await?;
        Ok(product.into())
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, code: &str) -> ProductResult<()> {
        if !self.products.delete(code).await? {
            return Err(ProductError::NotFound(code.to_string()));
        }

        CatalogMetrics::record_product_deleted();
        Ok(())
    }
}
