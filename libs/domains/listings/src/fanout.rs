//! Cross-collection merge, sort and pagination.
//!
//! Category-agnostic read paths (owner's listings, moderation queues,
//! favorites) query the three collections independently and treat the
//! results as one logical set. Pagination happens after the full merge,
//! so totals are exact at the cost of materializing every match.

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::Listing;

/// Default page size for moderation queues.
pub const QUEUE_PAGE_SIZE: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// One page over a merged cross-collection result set.
#[derive(Debug, Serialize, ToSchema)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total_items: u64,
    pub total_pages: u64,
    pub current_page: u64,
}

/// Merge per-collection batches and sort by creation time.
pub fn merge_by_created_at(batches: Vec<Vec<Listing>>, order: SortOrder) -> Vec<Listing> {
    let mut merged: Vec<Listing> = batches.into_iter().flatten().collect();
    merged.sort_by_key(|listing| listing.created_at());
    if order == SortOrder::Descending {
        merged.reverse();
    }
    merged
}

/// Slice one page out of an already-sorted merged set. Pages are 1-based;
/// a page past the end yields an empty item list with correct totals.
pub fn paginate<T>(items: Vec<T>, page: u64, per_page: u64) -> Paginated<T> {
    let per_page = per_page.max(1);
    let page = page.max(1);
    let total_items = items.len() as u64;
    let total_pages = total_items.div_ceil(per_page);

    let start = (page - 1).saturating_mul(per_page) as usize;
    let items: Vec<T> = items
        .into_iter()
        .skip(start)
        .take(per_page as usize)
        .collect();

    Paginated {
        items,
        total_items,
        total_pages,
        current_page: page,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateEstate, EstateListing, TransactionType};
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn estate(name: &str, age_minutes: i64) -> Listing {
        let mut listing = EstateListing::new(
            Uuid::now_v7(),
            CreateEstate {
                name: name.into(),
                description: "A place".into(),
                address: "Somewhere".into(),
                regular_price: 100.0,
                discount_price: None,
                offer: false,
                image_urls: vec![],
                bedrooms: 1,
                bath: 1,
                furnished: false,
                parking: false,
                transaction_type: TransactionType::Sell,
            },
        );
        listing.created_at = Utc::now() - Duration::minutes(age_minutes);
        Listing::Estate(listing)
    }

    #[test]
    fn test_merge_sorts_across_batches() {
        let merged = merge_by_created_at(
            vec![
                vec![estate("a", 30), estate("b", 10)],
                vec![estate("c", 20)],
                vec![],
            ],
            SortOrder::Descending,
        );
        let names: Vec<&str> = merged.iter().map(|l| l.name()).collect();
        assert_eq!(names, vec!["b", "c", "a"]);

        let merged = merge_by_created_at(
            vec![vec![estate("a", 30), estate("b", 10)], vec![estate("c", 20)]],
            SortOrder::Ascending,
        );
        let names: Vec<&str> = merged.iter().map(|l| l.name()).collect();
        assert_eq!(names, vec!["a", "c", "b"]);
    }

    #[test]
    fn test_pagination_covers_merged_set_exactly() {
        let items: Vec<i32> = (0..11).collect();

        let mut seen = Vec::new();
        for page in 1..=4 {
            let result = paginate(items.clone(), page, 3);
            assert_eq!(result.total_items, 11);
            assert_eq!(result.total_pages, 4);
            assert_eq!(result.current_page, page);
            seen.extend(result.items);
        }
        assert_eq!(seen, items);
    }

    #[test]
    fn test_page_past_end_is_empty_with_totals() {
        let result = paginate(vec![1, 2, 3], 5, 5);
        assert!(result.items.is_empty());
        assert_eq!(result.total_items, 3);
        assert_eq!(result.total_pages, 1);
    }

    #[test]
    fn test_empty_set() {
        let result = paginate(Vec::<i32>::new(), 1, 5);
        assert!(result.items.is_empty());
        assert_eq!(result.total_items, 0);
        assert_eq!(result.total_pages, 0);
    }
}
