//! Category Service - Business logic layer

use async_trait::async_trait;
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{CategoryError, CategoryResult};
use crate::models::{CreateMainCategory, CreateSubCategory, MainCategory, SubCategory};
use crate::repository::CategoryRepository;

/// Lookup interface for other domains that validate category pairs
/// (e.g. listings check their main/sub pair before persisting).
#[async_trait]
pub trait CategoryLookup: Send + Sync {
    /// Does a main category with this name exist (case-insensitive)?
    async fn main_exists(&self, main_category: &str) -> CategoryResult<bool>;

    /// Does the given main/sub category pair exist (case-insensitive)?
    async fn pair_exists(&self, main_category: &str, sub_category: &str) -> CategoryResult<bool>;
}

/// Category service providing business logic operations
pub struct CategoryService<R: CategoryRepository> {
    repository: Arc<R>,
}

impl<R: CategoryRepository> CategoryService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a main category, rejecting case-insensitive duplicates
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_main_category(
        &self,
        input: CreateMainCategory,
    ) -> CategoryResult<MainCategory> {
        input
            .validate()
            .map_err(|e| CategoryError::Validation(e.to_string()))?;

        if let Some(existing) = self.repository.find_main_by_name(&input.name).await? {
            return Err(CategoryError::Duplicate(existing.name));
        }

        self.repository.create_main(MainCategory::new(input)).await
    }

    /// Create a sub category under an existing main category
    ///
    /// The parent is stored under its canonical name so listings filtered
    /// by `main_category` match regardless of the casing the admin typed.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_sub_category(
        &self,
        input: CreateSubCategory,
    ) -> CategoryResult<SubCategory> {
        input
            .validate()
            .map_err(|e| CategoryError::Validation(e.to_string()))?;

        let parent = self
            .repository
            .find_main_by_name(&input.main_category)
            .await?
            .ok_or_else(|| CategoryError::MainNotFound(input.main_category.clone()))?;

        if let Some(existing) = self
            .repository
            .find_sub_by_name(&parent.name, &input.name)
            .await?
        {
            return Err(CategoryError::Duplicate(existing.name));
        }

        self.repository
            .create_sub(SubCategory::new(input.name, parent.name))
            .await
    }

    /// List all main categories
    #[instrument(skip(self))]
    pub async fn list_main_categories(&self) -> CategoryResult<Vec<MainCategory>> {
        self.repository.list_main().await
    }

    /// List sub categories, optionally restricted to one parent
    #[instrument(skip(self))]
    pub async fn list_sub_categories(
        &self,
        main_category: Option<&str>,
    ) -> CategoryResult<Vec<SubCategory>> {
        self.repository.list_sub(main_category).await
    }
}

#[async_trait]
impl<R: CategoryRepository> CategoryLookup for CategoryService<R> {
    async fn main_exists(&self, main_category: &str) -> CategoryResult<bool> {
        Ok(self
            .repository
            .find_main_by_name(main_category)
            .await?
            .is_some())
    }

    async fn pair_exists(&self, main_category: &str, sub_category: &str) -> CategoryResult<bool> {
        Ok(self
            .repository
            .find_sub_by_name(main_category, sub_category)
            .await?
            .is_some())
    }
}

impl<R: CategoryRepository> Clone for CategoryService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockCategoryRepository;

    fn main_category(name: &str) -> MainCategory {
        MainCategory::new(CreateMainCategory {
            name: name.to_string(),
        })
    }

    #[tokio::test]
    async fn test_create_main_category_rejects_duplicate() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_find_main_by_name()
            .returning(|name| Ok(Some(main_category(name))));

        let service = CategoryService::new(repo);
        let result = service
            .create_main_category(CreateMainCategory {
                name: "estate".to_string(),
            })
            .await;

        assert!(matches!(result, Err(CategoryError::Duplicate(_))));
    }

    #[tokio::test]
    async fn test_create_sub_category_requires_parent() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_find_main_by_name().returning(|_| Ok(None));

        let service = CategoryService::new(repo);
        let result = service
            .create_sub_category(CreateSubCategory {
                name: "apartments".to_string(),
                main_category: "estate".to_string(),
            })
            .await;

        assert!(matches!(result, Err(CategoryError::MainNotFound(_))));
    }

    #[tokio::test]
    async fn test_create_sub_category_uses_canonical_parent_name() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_find_main_by_name()
            .returning(|_| Ok(Some(main_category("Estate"))));
        repo.expect_find_sub_by_name().returning(|_, _| Ok(None));
        repo.expect_create_sub().returning(Ok);

        let service = CategoryService::new(repo);
        let created = service
            .create_sub_category(CreateSubCategory {
                name: "apartments".to_string(),
                main_category: "eSTATE".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(created.main_category, "Estate");
    }

    #[tokio::test]
    async fn test_pair_exists() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_find_sub_by_name()
            .returning(|main, name| {
                Ok(Some(SubCategory::new(name.to_string(), main.to_string())))
            });

        let service = CategoryService::new(repo);
        assert!(service.pair_exists("estate", "apartments").await.unwrap());
    }
}
