use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

pub const NAME_MAX_LENGTH: usize = 100;

/// A stored category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    /// Absent for root categories
    pub parent_id: Option<Uuid>,
    /// Depth in the tree; roots are 0
    pub nesting_level: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// One node of the nested tree view.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CategoryNode {
    pub name: String,
    #[schema(no_recursion)]
    pub children: Vec<CategoryNode>,
}

/// Request body for creating a category.
///
/// Without `parent_name` the category becomes a root. An empty
/// `parent_name` is still a lookup and fails with 404.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreateCategory {
    #[serde(default)]
    #[validate(custom(function = "validate_name"))]
    #[schema(example = "Football", max_length = 100)]
    pub name: String,

    #[serde(default)]
    #[schema(example = "Sport")]
    pub parent_name: Option<String>,
}

/// Request body for a partial update. Only the name is mutable.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCategory {
    #[validate(custom(function = "validate_name"))]
    #[schema(example = "Soccer", max_length = 100)]
    pub name: Option<String>,
}

/// Validated input handed to the repository, with the level already computed.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub nesting_level: i32,
}

impl NewCategory {
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent_id: None,
            nesting_level: 0,
        }
    }

    pub fn child_of(parent: &Category, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent_id: Some(parent.id),
            nesting_level: parent.nesting_level + 1,
        }
    }
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(
            ValidationError::new("blank").with_message(Cow::Borrowed("This field may not be blank."))
        );
    }

    if name.chars().count() > NAME_MAX_LENGTH {
        return Err(ValidationError::new("max_length").with_message(Cow::Owned(format!(
            "Ensure this field has no more than {} characters.",
            NAME_MAX_LENGTH
        ))));
    }

    Ok(())
}
