//! Rebuilds the nested category view from flat rows.
//!
//! Rows are grouped into a `parent_id -> children` index once, then each
//! root pulls its subtree out of the index. Siblings keep creation order.

use std::collections::HashMap;
use uuid::Uuid;

use crate::models::{Category, CategoryNode};

/// Builds one node per root category, each carrying its full subtree.
///
/// Rows whose parent is not in `categories` are left out.
pub fn build_tree(mut categories: Vec<Category>) -> Vec<CategoryNode> {
    categories.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

    let mut children_by_parent: HashMap<Option<Uuid>, Vec<Category>> = HashMap::new();
    for category in categories {
        children_by_parent
            .entry(category.parent_id)
            .or_default()
            .push(category);
    }

    let roots = children_by_parent.remove(&None).unwrap_or_default();

    roots
        .into_iter()
        .map(|root| attach_children(root, &mut children_by_parent))
        .collect()
}

fn attach_children(
    category: Category,
    children_by_parent: &mut HashMap<Option<Uuid>, Vec<Category>>,
) -> CategoryNode {
    // Removing the entry means every row is visited at most once
    let children = children_by_parent
        .remove(&Some(category.id))
        .unwrap_or_default()
        .into_iter()
        .map(|child| attach_children(child, children_by_parent))
        .collect();

    CategoryNode {
        name: category.name,
        children,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn category(name: &str, parent: Option<&Category>, offset_secs: i64) -> Category {
        let at = Utc::now() + Duration::seconds(offset_secs);
        Category {
            id: Uuid::now_v7(),
            name: name.to_string(),
            parent_id: parent.map(|p| p.id),
            nesting_level: parent.map_or(0, |p| p.nesting_level + 1),
            created_at: at,
            updated_at: at,
        }
    }

    fn names(nodes: &[CategoryNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.name.as_str()).collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(build_tree(Vec::new()).is_empty());
    }

    #[test]
    fn test_only_roots_at_top_level() {
        let sport = category("Sport", None, 0);
        let football = category("Football", Some(&sport), 1);
        let balls = category("Balls", Some(&football), 2);
        let books = category("Books", None, 3);

        let tree = build_tree(vec![balls, books, football, sport]);

        assert_eq!(names(&tree), vec!["Sport", "Books"]);
        assert_eq!(names(&tree[0].children), vec!["Football"]);
        assert_eq!(names(&tree[0].children[0].children), vec!["Balls"]);
        assert!(tree[1].children.is_empty());
    }

    #[test]
    fn test_siblings_keep_creation_order() {
        let sport = category("Sport", None, 0);
        let tennis = category("Tennis", Some(&sport), 20);
        let football = category("Football", Some(&sport), 10);
        let hockey = category("Hockey", Some(&sport), 30);

        let tree = build_tree(vec![hockey, sport, tennis, football]);

        assert_eq!(
            names(&tree[0].children),
            vec!["Football", "Tennis", "Hockey"]
        );
    }

    #[test]
    fn test_orphans_are_dropped() {
        let ghost = category("Ghost", None, 0);
        let orphan = category("Orphan", Some(&ghost), 1);
        let root = category("Root", None, 2);

        let tree = build_tree(vec![orphan, root]);

        assert_eq!(names(&tree), vec!["Root"]);
    }

    #[test]
    fn test_serializes_as_name_and_children() {
        let sport = category("Sport", None, 0);
        let football = category("Football", Some(&sport), 1);

        let json = serde_json::to_value(build_tree(vec![sport, football])).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"name": "Sport", "children": [{"name": "Football", "children": []}]}
            ])
        );
    }
}
