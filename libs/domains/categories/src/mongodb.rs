//! MongoDB implementation of CategoryRepository

use async_trait::async_trait;
use mongodb::{
    Collection, Database,
    bson::{Document, doc},
};
use tracing::instrument;

use crate::error::CategoryResult;
use crate::models::{MainCategory, SubCategory};
use crate::repository::CategoryRepository;

/// MongoDB implementation of the CategoryRepository
pub struct MongoCategoryRepository {
    main: Collection<MainCategory>,
    sub: Collection<SubCategory>,
}

impl MongoCategoryRepository {
    /// Create a new MongoCategoryRepository
    pub fn new(db: Database) -> Self {
        Self {
            main: db.collection::<MainCategory>("main_categories"),
            sub: db.collection::<SubCategory>("sub_categories"),
        }
    }

    /// Escape regex metacharacters so user input matches literally
    fn escape_regex(input: &str) -> String {
        let mut escaped = String::with_capacity(input.len());
        for c in input.chars() {
            if matches!(
                c,
                '.' | '^' | '$' | '*' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '|' | '\\'
            ) {
                escaped.push('\\');
            }
            escaped.push(c);
        }
        escaped
    }

    /// Anchored case-insensitive exact-match filter on a field
    fn name_filter(field: &str, value: &str) -> Document {
        doc! {
            field: {
                "$regex": format!("^{}$", Self::escape_regex(value)),
                "$options": "i",
            }
        }
    }
}

#[async_trait]
impl CategoryRepository for MongoCategoryRepository {
    #[instrument(skip(self, category), fields(name = %category.name))]
    async fn create_main(&self, category: MainCategory) -> CategoryResult<MainCategory> {
        self.main.insert_one(&category).await?;
        tracing::info!(category_id = %category.id, "Main category created");
        Ok(category)
    }

    #[instrument(skip(self, category), fields(name = %category.name))]
    async fn create_sub(&self, category: SubCategory) -> CategoryResult<SubCategory> {
        self.sub.insert_one(&category).await?;
        tracing::info!(category_id = %category.id, "Sub category created");
        Ok(category)
    }

    #[instrument(skip(self))]
    async fn list_main(&self) -> CategoryResult<Vec<MainCategory>> {
        use futures_util::TryStreamExt;

        let cursor = self
            .main
            .find(doc! {})
            .with_options(
                mongodb::options::FindOptions::builder()
                    .sort(doc! { "name": 1 })
                    .build(),
            )
            .await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self))]
    async fn list_sub<'a>(
        &self,
        main_category: Option<&'a str>,
    ) -> CategoryResult<Vec<SubCategory>> {
        use futures_util::TryStreamExt;

        let filter = match main_category {
            Some(main) => Self::name_filter("main_category", main),
            None => doc! {},
        };

        let cursor = self
            .sub
            .find(filter)
            .with_options(
                mongodb::options::FindOptions::builder()
                    .sort(doc! { "name": 1 })
                    .build(),
            )
            .await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self))]
    async fn find_main_by_name(&self, name: &str) -> CategoryResult<Option<MainCategory>> {
        let category = self.main.find_one(Self::name_filter("name", name)).await?;
        Ok(category)
    }

    #[instrument(skip(self))]
    async fn find_sub_by_name(
        &self,
        main_category: &str,
        name: &str,
    ) -> CategoryResult<Option<SubCategory>> {
        let mut filter = Self::name_filter("name", name);
        filter.extend(Self::name_filter("main_category", main_category));
        let category = self.sub.find_one(filter).await?;
        Ok(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_regex_plain() {
        assert_eq!(MongoCategoryRepository::escape_regex("estate"), "estate");
    }

    #[test]
    fn test_escape_regex_metacharacters() {
        assert_eq!(
            MongoCategoryRepository::escape_regex("c++ (used)"),
            r"c\+\+ \(used\)"
        );
    }

    #[test]
    fn test_name_filter_is_anchored() {
        let filter = MongoCategoryRepository::name_filter("name", "Estate");
        let inner = filter.get_document("name").unwrap();
        assert_eq!(inner.get_str("$regex").unwrap(), "^Estate$");
        assert_eq!(inner.get_str("$options").unwrap(), "i");
    }
}
