use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{CategoryError, CategoryResult};
use crate::models::{Category, NewCategory, UpdateCategory};

/// Persistence operations for categories.
///
/// Name lookups resolve duplicates to the earliest-created category.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn create(&self, input: NewCategory) -> CategoryResult<Category>;

    async fn get_by_id(&self, id: Uuid) -> CategoryResult<Option<Category>>;

    async fn find_by_name(&self, name: &str) -> CategoryResult<Option<Category>>;

    /// One category per distinct name that exists, in the order the names were given.
    async fn find_by_names(&self, names: &[String]) -> CategoryResult<Vec<Category>>;

    /// Every category, ordered by creation time.
    async fn list_all(&self) -> CategoryResult<Vec<Category>>;

    async fn count_children(&self, id: Uuid) -> CategoryResult<u64>;

    async fn update(&self, id: Uuid, input: UpdateCategory) -> CategoryResult<Category>;

    /// Returns `false` when nothing was deleted. Fails with
    /// [`CategoryError::HasChildren`] if a child still references the row.
    async fn delete(&self, id: Uuid) -> CategoryResult<bool>;
}

/// Picks the earliest category for each requested name, keeping request order.
pub(crate) fn first_per_name(names: &[String], mut candidates: Vec<Category>) -> Vec<Category> {
    candidates.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

    let mut earliest: HashMap<&str, &Category> = HashMap::new();
    for category in &candidates {
        earliest.entry(category.name.as_str()).or_insert(category);
    }

    let mut seen = Vec::<Uuid>::new();
    names
        .iter()
        .filter_map(|name| earliest.get(name.as_str()).copied())
        .filter(|category| {
            if seen.contains(&category.id) {
                false
            } else {
                seen.push(category.id);
                true
            }
        })
        .cloned()
        .collect()
}

/// In-memory implementation for tests and local runs
#[derive(Clone, Default)]
pub struct InMemoryCategoryRepository {
    categories: Arc<RwLock<HashMap<Uuid, Category>>>,
}

impl InMemoryCategoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn sorted(&self) -> Vec<Category> {
        let categories = self.categories.read().await;
        let mut all: Vec<Category> = categories.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        all
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn create(&self, input: NewCategory) -> CategoryResult<Category> {
        let mut categories = self.categories.write().await;

        if let Some(parent_id) = input.parent_id {
            if !categories.contains_key(&parent_id) {
                return Err(CategoryError::Internal(format!(
                    "Parent category {} does not exist",
                    parent_id
                )));
            }
        }

        let now = chrono::Utc::now();
        let category = Category {
            id: Uuid::now_v7(),
            name: input.name,
            parent_id: input.parent_id,
            nesting_level: input.nesting_level,
            created_at: now,
            updated_at: now,
        };

        categories.insert(category.id, category.clone());
        tracing::info!(category_id = %category.id, nesting_level = category.nesting_level, "Created category");
        Ok(category)
    }

    async fn get_by_id(&self, id: Uuid) -> CategoryResult<Option<Category>> {
        let categories = self.categories.read().await;
        Ok(categories.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> CategoryResult<Option<Category>> {
        Ok(self.sorted().await.into_iter().find(|c| c.name == name))
    }

    async fn find_by_names(&self, names: &[String]) -> CategoryResult<Vec<Category>> {
        let candidates = self
            .sorted()
            .await
            .into_iter()
            .filter(|c| names.contains(&c.name))
            .collect();
        Ok(first_per_name(names, candidates))
    }

    async fn list_all(&self) -> CategoryResult<Vec<Category>> {
        Ok(self.sorted().await)
    }

    async fn count_children(&self, id: Uuid) -> CategoryResult<u64> {
        let categories = self.categories.read().await;
        Ok(categories
            .values()
            .filter(|c| c.parent_id == Some(id))
            .count() as u64)
    }

    async fn update(&self, id: Uuid, input: UpdateCategory) -> CategoryResult<Category> {
        let mut categories = self.categories.write().await;

        let category = categories
            .get_mut(&id)
            .ok_or(CategoryError::NotFound(id))?;

        if let Some(name) = input.name {
            category.name = name;
        }
        category.updated_at = chrono::Utc::now();

        tracing::info!(category_id = %id, "Updated category");
        Ok(category.clone())
    }

    async fn delete(&self, id: Uuid) -> CategoryResult<bool> {
        let mut categories = self.categories.write().await;

        // Same restriction the foreign key gives us in Postgres
        if categories.values().any(|c| c.parent_id == Some(id)) {
            return Err(CategoryError::HasChildren(id));
        }

        let removed = categories.remove(&id).is_some();
        if removed {
            tracing::info!(category_id = %id, "Deleted category");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = InMemoryCategoryRepository::new();
        let sport = repo.create(NewCategory::root("Sport")).await.unwrap();

        let found = repo.get_by_id(sport.id).await.unwrap().unwrap();
        assert_eq!(found, sport);
        assert!(repo.get_by_id(Uuid::now_v7()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_with_unknown_parent_fails() {
        let repo = InMemoryCategoryRepository::new();
        let result = repo
            .create(NewCategory {
                name: "Orphan".into(),
                parent_id: Some(Uuid::now_v7()),
                nesting_level: 1,
            })
            .await;

        assert!(matches!(result, Err(CategoryError::Internal(_))));
    }

    #[tokio::test]
    async fn test_find_by_name_returns_earliest() {
        let repo = InMemoryCategoryRepository::new();
        let first = repo.create(NewCategory::root("Sport")).await.unwrap();
        repo.create(NewCategory::root("Sport")).await.unwrap();

        let found = repo.find_by_name("Sport").await.unwrap().unwrap();
        assert_eq!(found.id, first.id);
        assert!(repo.find_by_name("sport").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_names_skips_unknown_and_duplicates() {
        let repo = InMemoryCategoryRepository::new();
        let sport = repo.create(NewCategory::root("Sport")).await.unwrap();
        let books = repo.create(NewCategory::root("Books")).await.unwrap();

        let names = vec![
            "Books".to_string(),
            "Missing".to_string(),
            "Sport".to_string(),
            "Books".to_string(),
        ];
        let found = repo.find_by_names(&names).await.unwrap();

        let ids: Vec<Uuid> = found.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![books.id, sport.id]);
    }

    #[tokio::test]
    async fn test_delete_respects_children() {
        let repo = InMemoryCategoryRepository::new();
        let sport = repo.create(NewCategory::root("Sport")).await.unwrap();
        let football = repo
            .create(NewCategory::child_of(&sport, "Football"))
            .await
            .unwrap();

        assert_eq!(repo.count_children(sport.id).await.unwrap(), 1);
        assert!(matches!(
            repo.delete(sport.id).await,
            Err(CategoryError::HasChildren(_))
        ));

        assert!(repo.delete(football.id).await.unwrap());
        assert!(repo.delete(sport.id).await.unwrap());
        assert!(!repo.delete(sport.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_missing_category() {
        let repo = InMemoryCategoryRepository::new();
        let result = repo
            .update(
                Uuid::now_v7(),
                UpdateCategory {
                    name: Some("Renamed".into()),
                },
            )
            .await;

        assert!(matches!(result, Err(CategoryError::NotFound(_))));
    }
}
