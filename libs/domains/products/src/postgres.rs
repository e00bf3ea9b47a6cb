use async_trait::async_trait;
use domain_categories::Category;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, SqlErr,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{
    entity::{product, product_category},
    error::{ProductError, ProductResult},
    models::{NewProduct, PRICE_DECIMAL_PLACES, Product, ProductSummary, UpdateProduct},
    repository::ProductRepository,
};

pub struct PgProductRepository {
    db: DatabaseConnection,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn db_error(e: DbErr) -> ProductError {
    ProductError::Internal(format!("Database error: {}", e))
}

/// Like [`db_error`], but reports a unique violation as a taken `code`.
fn write_error(code: &str) -> impl Fn(DbErr) -> ProductError + '_ {
    move |e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => ProductError::DuplicateCode(code.to_string()),
        _ => db_error(e),
    }
}

fn is_missing_reference(e: &DbErr) -> bool {
    matches!(e.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_)))
}

/// Products linked directly to `category_id`.
fn in_category(category_id: Uuid) -> Select<product::Entity> {
    product::Entity::find()
        .inner_join(product_category::Entity)
        .filter(product_category::Column::CategoryId.eq(category_id))
}

/// Links `product_id` to `category` inside a savepoint.
///
/// Returns `false` when the category no longer exists; the outer transaction
/// stays usable in that case.
async fn link_category(
    txn: &DatabaseTransaction,
    product_id: Uuid,
    category: &Category,
) -> ProductResult<bool> {
    let savepoint = txn.begin().await.map_err(db_error)?;

    let inserted = product_category::ActiveModel {
        product_id: Set(product_id),
        category_id: Set(category.id),
    }
    .insert(&savepoint)
    .await;

    match inserted {
        Ok(_) => {
            savepoint.commit().await.map_err(db_error)?;
            Ok(true)
        }
        Err(e) if is_missing_reference(&e) => {
            savepoint.rollback().await.map_err(db_error)?;
            tracing::warn!(
                category = %category.name,
                "Category disappeared before it could be linked, dropping it"
            );
            Ok(false)
        }
        Err(e) => Err(db_error(e)),
    }
}

/// Names of the categories linked to `model`, oldest category first.
async fn category_names<C: ConnectionTrait>(
    conn: &C,
    model: &product::Model,
) -> ProductResult<Vec<String>> {
    let categories = model
        .find_related(domain_categories::entity::Entity)
        .order_by_asc(domain_categories::entity::Column::CreatedAt)
        .order_by_asc(domain_categories::entity::Column::Id)
        .all(conn)
        .await
        .map_err(db_error)?;

    Ok(categories.into_iter().map(|c| c.name).collect())
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn create(&self, input: NewProduct, categories: Vec<Category>) -> ProductResult<Product> {
        let code = input.code.clone();
        let active_model: product::ActiveModel = input.into();

        let txn = self.db.begin().await.map_err(db_error)?;

        let model = active_model.insert(&txn).await.map_err(write_error(&code))?;

        let mut linked = Vec::with_capacity(categories.len());
        for category in categories {
            if link_category(&txn, model.id, &category).await? {
                linked.push(category.name);
            }
        }

        txn.commit().await.map_err(db_error)?;

        tracing::info!(
            product_id = %model.id,
            code = %model.code,
            categories = linked.len(),
            "Created product"
        );

        Ok(model.into_product(linked))
    }

    async fn get_by_code(&self, code: &str) -> ProductResult<Option<Product>> {
        let Some(model) = product::Entity::find()
            .filter(product::Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(db_error)?
        else {
            return Ok(None);
        };

        let names = category_names(&self.db, &model).await?;
        Ok(Some(model.into_product(names)))
    }

    async fn code_exists(&self, code: &str) -> ProductResult<bool> {
        let count = product::Entity::find()
            .filter(product::Column::Code.eq(code))
            .count(&self.db)
            .await
            .map_err(db_error)?;

        Ok(count > 0)
    }

    async fn count_by_category(&self, category_id: Uuid) -> ProductResult<u64> {
        in_category(category_id)
            .count(&self.db)
            .await
            .map_err(db_error)
    }

    async fn list_by_category(
        &self,
        category_id: Uuid,
        page_index: u64,
        page_size: u64,
    ) -> ProductResult<Vec<ProductSummary>> {
        let Some(offset) = page_index.checked_mul(page_size) else {
            return Ok(Vec::new());
        };

        let models = in_category(category_id)
            .order_by_asc(product::Column::Code)
            .offset(offset)
            .limit(page_size)
            .all(&self.db)
            .await
            .map_err(db_error)?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn update(&self, code: &str, input: UpdateProduct) -> ProductResult<Product> {
        let model = product::Entity::find()
            .filter(product::Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(db_error)?
            .ok_or_else(|| ProductError::NotFound(code.to_string()))?;

        let target_code = input.code.clone().unwrap_or_else(|| code.to_string());

        let mut active_model: product::ActiveModel = model.into();
        if let Some(new_code) = input.code {
            active_model.code = Set(new_code);
        }
        if let Some(name) = input.name {
            active_model.name = Set(name);
        }
        if let Some(mut price) = input.price {
            price.rescale(PRICE_DECIMAL_PLACES);
            active_model.price = Set(price);
        }
        if let Some(quantity) = input.quantity {
            active_model.quantity = Set(quantity);
        }
        active_model.updated_at = Set(chrono::Utc::now().into());

        let updated = active_model
            .update(&self.db)
            .await
            .map_err(write_error(&target_code))?;

        tracing::info!(product_id = %updated.id, code = %updated.code, "Updated product");

        let names = category_names(&self.db, &updated).await?;
        Ok(updated.into_product(names))
    }

    async fn delete(&self, code: &str) -> ProductResult<bool> {
        // Links go with the row through ON DELETE CASCADE
        let result = product::Entity::delete_many()
            .filter(product::Column::Code.eq(code))
            .exec(&self.db)
            .await
            .map_err(db_error)?;

        let deleted = result.rows_affected > 0;
        if deleted {
            tracing::info!(code, "Deleted product");
        }
        Ok(deleted)
    }
}
