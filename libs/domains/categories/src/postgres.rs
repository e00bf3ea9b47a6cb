use async_trait::async_trait;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, SqlErr,
};
use uuid::Uuid;

use crate::{
    entity,
    error::{CategoryError, CategoryResult},
    models::{Category, NewCategory, UpdateCategory},
    repository::{CategoryRepository, first_per_name},
};

pub struct PgCategoryRepository {
    db: DatabaseConnection,
}

impl PgCategoryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn db_error(e: DbErr) -> CategoryError {
    CategoryError::Internal(format!("Database error: {}", e))
}

/// Creation order, with the id as tie breaker.
fn ordered() -> sea_orm::Select<entity::Entity> {
    entity::Entity::find()
        .order_by_asc(entity::Column::CreatedAt)
        .order_by_asc(entity::Column::Id)
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn create(&self, input: NewCategory) -> CategoryResult<Category> {
        let active_model: entity::ActiveModel = input.into();

        let model = active_model.insert(&self.db).await.map_err(db_error)?;

        tracing::info!(category_id = %model.id, nesting_level = model.nesting_level, "Created category");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: Uuid) -> CategoryResult<Option<Category>> {
        let model = entity::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error)?;

        Ok(model.map(Into::into))
    }

    async fn find_by_name(&self, name: &str) -> CategoryResult<Option<Category>> {
        let model = ordered()
            .filter(entity::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(db_error)?;

        Ok(model.map(Into::into))
    }

    async fn find_by_names(&self, names: &[String]) -> CategoryResult<Vec<Category>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let candidates = ordered()
            .filter(entity::Column::Name.is_in(names.iter().cloned()))
            .all(&self.db)
            .await
            .map_err(db_error)?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok(first_per_name(names, candidates))
    }

    async fn list_all(&self) -> CategoryResult<Vec<Category>> {
        let models = ordered().all(&self.db).await.map_err(db_error)?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn count_children(&self, id: Uuid) -> CategoryResult<u64> {
        entity::Entity::find()
            .filter(entity::Column::ParentId.eq(id))
            .count(&self.db)
            .await
            .map_err(db_error)
    }

    async fn update(&self, id: Uuid, input: UpdateCategory) -> CategoryResult<Category> {
        let model = entity::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error)?
            .ok_or(CategoryError::NotFound(id))?;

        let mut active_model: entity::ActiveModel = model.into();
        if let Some(name) = input.name {
            active_model.name = Set(name);
        }
        active_model.updated_at = Set(chrono::Utc::now().into());

        let updated = active_model.update(&self.db).await.map_err(db_error)?;

        tracing::info!(category_id = %id, "Updated category");
        Ok(updated.into())
    }

    async fn delete(&self, id: Uuid) -> CategoryResult<bool> {
        let result = entity::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| match e.sql_err() {
                // A child was inserted between the count and the delete
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => CategoryError::HasChildren(id),
                _ => db_error(e),
            })?;

        let deleted = result.rows_affected > 0;
        if deleted {
            tracing::info!(category_id = %id, "Deleted category");
        }
        Ok(deleted)
    }
}
