use async_trait::async_trait;
use domain_categories::Category;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::models::{NewProduct, PRICE_DECIMAL_PLACES, Product, ProductSummary, UpdateProduct};

/// Persistence operations for products, keyed by their code.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Stores the product and links it to `categories` atomically.
    ///
    /// Fails with [`ProductError::DuplicateCode`] if the code is taken.
    async fn create(&self, input: NewProduct, categories: Vec<Category>) -> ProductResult<Product>;

    async fn get_by_code(&self, code: &str) -> ProductResult<Option<Product>>;

    async fn code_exists(&self, code: &str) -> ProductResult<bool>;

    /// Number of products linked directly to `category_id`.
    async fn count_by_category(&self, category_id: Uuid) -> ProductResult<u64>;

    /// One page of the products linked to `category_id`, ordered by code.
    ///
    /// Callers keep `page_index` within the pages reported by
    /// [`count_by_category`](Self::count_by_category).
    async fn list_by_category(
        &self,
        category_id: Uuid,
        page_index: u64,
        page_size: u64,
    ) -> ProductResult<Vec<ProductSummary>>;

    async fn update(&self, code: &str, input: UpdateProduct) -> ProductResult<Product>;

    /// Removes the product and its category links. Returns `false` when
    /// nothing was deleted.
    async fn delete(&self, code: &str) -> ProductResult<bool>;
}

#[derive(Clone)]
struct StoredProduct {
    product: Product,
    category_ids: Vec<Uuid>,
}

/// In-memory implementation for tests and local runs
#[derive(Clone, Default)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<HashMap<String, StoredProduct>>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, input: NewProduct, categories: Vec<Category>) -> ProductResult<Product> {
        let mut products = self.products.write().await;

        if products.contains_key(&input.code) {
            return Err(ProductError::DuplicateCode(input.code));
        }

        let now = chrono::Utc::now();
        let product = Product {
            id: Uuid::now_v7(),
            code: input.code,
            name: input.name,
            price: input.price,
            quantity: input.quantity,
            categories: categories.iter().map(|c| c.name.clone()).collect(),
            created_at: now,
            updated_at: now,
        };

        products.insert(
            product.code.clone(),
            StoredProduct {
                product: product.clone(),
                category_ids: categories.iter().map(|c| c.id).collect(),
            },
        );

        tracing::info!(product_id = %product.id, code = %product.code, "Created product");
        Ok(product)
    }

    async fn get_by_code(&self, code: &str) -> ProductResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.get(code).map(|stored| stored.product.clone()))
    }

    async fn code_exists(&self, code: &str) -> ProductResult<bool> {
        let products = self.products.read().await;
        Ok(products.contains_key(code))
    }

    async fn count_by_category(&self, category_id: Uuid) -> ProductResult<u64> {
        let products = self.products.read().await;
        let count = products
            .values()
            .filter(|stored| stored.category_ids.contains(&category_id))
            .count();
        Ok(count as u64)
    }

    async fn list_by_category(
        &self,
        category_id: Uuid,
        page_index: u64,
        page_size: u64,
    ) -> ProductResult<Vec<ProductSummary>> {
        let products = self.products.read().await;

        let mut linked: Vec<&Product> = products
            .values()
            .filter(|stored| stored.category_ids.contains(&category_id))
            .map(|stored| &stored.product)
            .collect();
        linked.sort_by(|a, b| a.code.cmp(&b.code));

        let offset = usize::try_from(page_index.saturating_mul(page_size)).unwrap_or(usize::MAX);
        let limit = usize::try_from(page_size).unwrap_or(usize::MAX);

        Ok(linked
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|product| ProductSummary {
                code: product.code.clone(),
                name: product.name.clone(),
                price: product.price,
            })
            .collect())
    }

    async fn update(&self, code: &str, input: UpdateProduct) -> ProductResult<Product> {
        let mut products = self.products.write().await;

        if let Some(new_code) = &input.code {
            if new_code != code && products.contains_key(new_code) {
                return Err(ProductError::DuplicateCode(new_code.clone()));
            }
        }

        let mut stored = products
            .remove(code)
            .ok_or_else(|| ProductError::NotFound(code.to_string()))?;

        let product = &mut stored.product;
        if let Some(new_code) = input.code {
            product.code = new_code;
        }
        if let Some(name) = input.name {
            product.name = name;
        }
        if let Some(mut price) = input.price {
            price.rescale(PRICE_DECIMAL_PLACES);
            product.price = price;
        }
        if let Some(quantity) = input.quantity {
            product.quantity = quantity;
        }
        product.updated_at = chrono::Utc::now();

        let updated = product.clone();
        products.insert(updated.code.clone(), stored);

        tracing::info!(product_id = %updated.id, code = %updated.code, "Updated product");
        Ok(updated)
    }

    async fn delete(&self, code: &str) -> ProductResult<bool> {
        let mut products = self.products.write().await;

        let removed = products.remove(code);
        if let Some(stored) = &removed {
            tracing::info!(product_id = %stored.product.id, code, "Deleted product");
        }
        Ok(removed.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn category(name: &str) -> Category {
        let now = chrono::Utc::now();
        Category {
            id: Uuid::now_v7(),
            name: name.to_string(),
            parent_id: None,
            nesting_level: 0,
            created_at: now,
            updated_at: now,
        }
    }

    fn new_product(code: &str) -> NewProduct {
        NewProduct::new(code, format!("Product {}", code), Decimal::from(10), 1)
    }

    #[tokio::test]
    async fn test_create_and_get_by_code() {
        let repo = InMemoryProductRepository::new();
        let sport = category("Sport");

        let created = repo.create(new_product("20"), vec![sport]).await.unwrap();
        assert_eq!(created.categories, ["Sport"]);

        let found = repo.get_by_code("20").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert!(repo.code_exists("20").await.unwrap());
        assert!(repo.get_by_code("21").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_duplicate_code() {
        let repo = InMemoryProductRepository::new();
        repo.create(new_product("20"), vec![]).await.unwrap();

        let result = repo.create(new_product("20"), vec![]).await;
        assert!(matches!(result, Err(ProductError::DuplicateCode(code)) if code == "20"));
    }

    #[tokio::test]
    async fn test_list_by_category_pages_in_code_order() {
        let repo = InMemoryProductRepository::new();
        let sport = category("Sport");
        let books = category("Books");

        for code in ["30", "10", "20"] {
            repo.create(new_product(code), vec![sport.clone()]).await.unwrap();
        }
        repo.create(new_product("40"), vec![books]).await.unwrap();

        assert_eq!(repo.count_by_category(sport.id).await.unwrap(), 3);

        let first = repo.list_by_category(sport.id, 0, 2).await.unwrap();
        let codes: Vec<_> = first.iter().map(|p| p.code.as_str()).collect();
        assert_eq!(codes, ["10", "20"]);

        let second = repo.list_by_category(sport.id, 1, 2).await.unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].code, "30");
    }

    #[tokio::test]
    async fn test_list_by_category_with_offset_past_the_end() {
        let repo = InMemoryProductRepository::new();
        let sport = category("Sport");
        repo.create(new_product("10"), vec![sport.clone()]).await.unwrap();

        let page = repo.list_by_category(sport.id, u64::MAX, u64::MAX).await.unwrap();
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn test_update_renames_code() {
        let repo = InMemoryProductRepository::new();
        repo.create(new_product("20"), vec![]).await.unwrap();
        repo.create(new_product("21"), vec![]).await.unwrap();

        let clash = UpdateProduct {
            code: Some("21".into()),
            ..Default::default()
        };
        assert!(matches!(
            repo.update("20", clash).await,
            Err(ProductError::DuplicateCode(_))
        ));

        let rename = UpdateProduct {
            code: Some("22".into()),
            price: Some(Decimal::new(455, 1)),
            ..Default::default()
        };
        let updated = repo.update("20", rename).await.unwrap();
        assert_eq!(updated.code, "22");
        assert_eq!(updated.price.to_string(), "45.50");
        assert!(!repo.code_exists("20").await.unwrap());

        assert!(matches!(
            repo.update("20", UpdateProduct::default()).await,
            Err(ProductError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = InMemoryProductRepository::new();
        repo.create(new_product("20"), vec![]).await.unwrap();

        assert!(repo.delete("20").await.unwrap());
        assert!(!repo.delete("20").await.unwrap());
    }
}
