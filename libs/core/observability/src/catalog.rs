//! Catalog domain counters.

use metrics::{counter, histogram};

pub const CATEGORIES_CREATED: &str = "catalog_categories_created_total";
pub const CATEGORIES_DELETED: &str = "catalog_categories_deleted_total";
pub const CATEGORY_DELETE_BLOCKED: &str = "catalog_category_delete_blocked_total";
pub const PRODUCTS_CREATED: &str = "catalog_products_created_total";
pub const PRODUCTS_DELETED: &str = "catalog_products_deleted_total";
pub const UNRESOLVED_CATEGORY_NAMES: &str = "catalog_unresolved_category_names_total";
pub const PRODUCT_LIST_PAGE_SIZE: &str = "catalog_product_list_page_size";

pub struct CatalogMetrics;

impl CatalogMetrics {
    pub fn record_category_created(nesting_level: i32) {
        let kind = if nesting_level == 0 { "root" } else { "child" };
        counter!(CATEGORIES_CREATED, "kind" => kind).increment(1);
    }

    pub fn record_category_deleted() {
        counter!(CATEGORIES_DELETED).increment(1);
    }

    pub fn record_category_delete_blocked() {
        counter!(CATEGORY_DELETE_BLOCKED).increment(1);
    }

    pub fn record_product_created(category_count: usize) {
        counter!(PRODUCTS_CREATED).increment(1);
        tracing::debug!(category_count, "Recorded product creation");
    }

    pub fn record_product_deleted() {
        counter!(PRODUCTS_DELETED).increment(1);
    }

    pub fn record_unresolved_category_names(count: usize) {
        if count > 0 {
            counter!(UNRESOLVED_CATEGORY_NAMES).increment(count as u64);
        }
    }

    pub fn record_product_page(returned: usize) {
        histogram!(PRODUCT_LIST_PAGE_SIZE).record(returned as f64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Without an installed recorder these are no-ops; they must not panic.
    #[test]
    fn test_recording_without_recorder() {
        CatalogMetrics::record_category_created(0);
        CatalogMetrics::record_category_created(2);
        CatalogMetrics::record_category_delete_blocked();
        CatalogMetrics::record_product_created(3);
        CatalogMetrics::record_unresolved_category_names(0);
        CatalogMetrics::record_unresolved_category_names(2);
        CatalogMetrics::record_product_page(10);
    }
}
