use async_trait::async_trait;

use crate::error::CategoryResult;
use crate::models::{MainCategory, SubCategory};

/// Repository trait for category persistence
///
/// Name lookups are case-insensitive exact matches, since listings
/// reference categories by user-typed name strings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Insert a main category
    async fn create_main(&self, category: MainCategory) -> CategoryResult<MainCategory>;

    /// Insert a sub category
    async fn create_sub(&self, category: SubCategory) -> CategoryResult<SubCategory>;

    /// List all main categories, sorted by name
    async fn list_main(&self) -> CategoryResult<Vec<MainCategory>>;

    /// List sub categories, optionally restricted to one parent
    async fn list_sub<'a>(
        &self,
        main_category: Option<&'a str>,
    ) -> CategoryResult<Vec<SubCategory>>;

    /// Find a main category by name (case-insensitive)
    async fn find_main_by_name(&self, name: &str) -> CategoryResult<Option<MainCategory>>;

    /// Find a sub category by parent and name (case-insensitive)
    async fn find_sub_by_name(
        &self,
        main_category: &str,
        name: &str,
    ) -> CategoryResult<Option<SubCategory>>;
}
