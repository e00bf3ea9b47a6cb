use observability::CatalogMetrics;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{CategoryError, CategoryResult};
use crate::models::{Category, CategoryNode, CreateCategory, NewCategory, UpdateCategory};
use crate::repository::CategoryRepository;
use crate::tree::build_tree;

/// Business rules for the category tree
pub struct CategoryService<R: CategoryRepository> {
    repository: Arc<R>,
}

impl<R: CategoryRepository> Clone for CategoryService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: CategoryRepository> CategoryService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Creates a root, or a child of the category named `parent_name`.
    ///
    /// Input is validated before the parent is looked up.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_category(&self, input: CreateCategory) -> CategoryResult<Category> {
        input.validate()?;

        let new_category = match input.parent_name {
            None => NewCategory::root(input.name),
            Some(parent_name) => {
                let parent = self
                    .repository
                    .find_by_name(&parent_name)
                    .await?
                    .ok_or(CategoryError::ParentNotFound(parent_name))?;
                NewCategory::child_of(&parent, input.name)
            }
        };

        let category = self.repository.create(new_category).await?;
        CatalogMetrics::record_category_created(category.nesting_level);

        Ok(category)
    }

    /// Root categories, each with its full subtree.
    #[instrument(skip(self))]
    pub async fn list_tree(&self) -> CategoryResult<Vec<CategoryNode>> {
        let categories = self.repository.list_all().await?;
        Ok(build_tree(categories))
    }

    #[instrument(skip(self))]
    pub async fn get_category(&self, id: Uuid) -> CategoryResult<Category> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(CategoryError::NotFound(id))
    }

    #[instrument(skip(self, input))]
    pub async fn update_category(
        &self,
        id: Uuid,
        input: UpdateCategory,
    ) -> CategoryResult<Category> {
        input.validate()?;

        self.repository.update(id, input).await
    }

    /// Deletes a leaf category.
    ///
    /// The child count is read at call time; the repository still reports
    /// [`CategoryError::HasChildren`] if a child appears before the delete runs.
    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: Uuid) -> CategoryResult<()> {
        self.get_category(id).await?;

        let children = self.repository.count_children(id).await?;
        if children > 0 {
            tracing::info!(category_id = %id, children, "Refusing to delete category with children");
            CatalogMetrics::record_category_delete_blocked();
            return Err(CategoryError::HasChildren(id));
        }

        match self.repository.delete(id).await {
            Ok(true) => {
                CatalogMetrics::record_category_deleted();
                Ok(())
            }
            Ok(false) => Err(CategoryError::NotFound(id)),
            Err(CategoryError::HasChildren(id)) => {
                CatalogMetrics::record_category_delete_blocked();
                Err(CategoryError::HasChildren(id))
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryCategoryRepository, MockCategoryRepository};
    use chrono::Utc;

    fn service() -> CategoryService<InMemoryCategoryRepository> {
        CategoryService::new(InMemoryCategoryRepository::new())
    }

    fn create(name: &str, parent_name: Option<&str>) -> CreateCategory {
        CreateCategory {
            name: name.to_string(),
            parent_name: parent_name.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_nesting_levels_follow_parents() {
        let service = service();

        let sport = service.create_category(create("Sport", None)).await.unwrap();
        let football = service
            .create_category(create("Football", Some("Sport")))
            .await
            .unwrap();
        let balls = service
            .create_category(create("Balls", Some("Football")))
            .await
            .unwrap();

        assert_eq!(sport.nesting_level, 0);
        assert_eq!(football.nesting_level, 1);
        assert_eq!(football.parent_id, Some(sport.id));
        assert_eq!(balls.nesting_level, 2);
        assert_eq!(balls.parent_id, Some(football.id));
    }

    #[tokio::test]
    async fn test_blank_name_fails_for_root_and_child() {
        let service = service();
        service.create_category(create("Sport", None)).await.unwrap();

        for input in [create("", None), create("  ", Some("Sport"))] {
            let result = service.create_category(input).await;
            assert!(matches!(result, Err(CategoryError::Validation(_))));
        }
    }

    #[tokio::test]
    async fn test_validation_runs_before_parent_lookup() {
        let result = service().create_category(create("", Some("Missing"))).await;
        assert!(matches!(result, Err(CategoryError::Validation(_))));
    }

    #[tokio::test]
    async fn test_unknown_or_empty_parent_is_not_found() {
        let service = service();

        let result = service.create_category(create("Football", Some("Sport"))).await;
        assert!(matches!(result, Err(CategoryError::ParentNotFound(name)) if name == "Sport"));

        let result = service.create_category(create("Football", Some(""))).await;
        assert!(matches!(result, Err(CategoryError::ParentNotFound(name)) if name.is_empty()));
    }

    #[tokio::test]
    async fn test_delete_guard_scenario() {
        let service = service();
        let sport = service.create_category(create("Sport", None)).await.unwrap();
        let football = service
            .create_category(create("Football", Some("Sport")))
            .await
            .unwrap();

        assert!(matches!(
            service.delete_category(sport.id).await,
            Err(CategoryError::HasChildren(_))
        ));
        service.delete_category(football.id).await.unwrap();
        service.delete_category(sport.id).await.unwrap();

        assert!(matches!(
            service.delete_category(sport.id).await,
            Err(CategoryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_tree_returns_roots_with_subtrees() {
        let service = service();
        service.create_category(create("Sport", None)).await.unwrap();
        service
            .create_category(create("Football", Some("Sport")))
            .await
            .unwrap();
        service.create_category(create("Books", None)).await.unwrap();

        let tree = service.list_tree().await.unwrap();

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].name, "Sport");
        assert_eq!(tree[0].children[0].name, "Football");
        assert_eq!(tree[1].name, "Books");
    }

    #[tokio::test]
    async fn test_update_only_changes_name() {
        let service = service();
        service.create_category(create("Sport", None)).await.unwrap();
        let football = service
            .create_category(create("Football", Some("Sport")))
            .await
            .unwrap();

        let updated = service
            .update_category(
                football.id,
                UpdateCategory {
                    name: Some("Soccer".into()),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Soccer");
        assert_eq!(updated.parent_id, football.parent_id);
        assert_eq!(updated.nesting_level, 1);
    }

    #[tokio::test]
    async fn test_delete_race_with_new_child_is_forbidden() {
        let id = Uuid::now_v7();
        let now = Utc::now();
        let category = Category {
            id,
            name: "Sport".into(),
            parent_id: None,
            nesting_level: 0,
            created_at: now,
            updated_at: now,
        };

        let mut mock = MockCategoryRepository::new();
        mock.expect_get_by_id()
            .returning(move |_| Ok(Some(category.clone())));
        mock.expect_count_children().returning(|_| Ok(0));
        mock.expect_delete()
            .times(1)
            .returning(|id| Err(CategoryError::HasChildren(id)));

        let service = CategoryService::new(mock);
        assert!(matches!(
            service.delete_category(id).await,
            Err(CategoryError::HasChildren(_))
        ));
    }

    #[tokio::test]
    async fn test_repository_errors_propagate() {
        let mut mock = MockCategoryRepository::new();
        mock.expect_list_all()
            .returning(|| Err(CategoryError::Internal("connection lost".into())));

        let service = CategoryService::new(mock);
        assert!(matches!(
            service.list_tree().await,
            Err(CategoryError::Internal(_))
        ));
    }
}
