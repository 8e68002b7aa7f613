use serde::Serialize;
use utoipa::ToSchema;

/// Moderation breakdown for one listing collection.
#[derive(Debug, Clone, Copy, Default, Serialize, ToSchema)]
pub struct CollectionTotals {
    pub total: u64,
    pub approved: u64,
    pub rejected: u64,
    pub pending: u64,
}

impl CollectionTotals {
    pub fn add(&self, other: &CollectionTotals) -> CollectionTotals {
        CollectionTotals {
            total: self.total + other.total,
            approved: self.approved + other.approved,
            rejected: self.rejected + other.rejected,
            pending: self.pending + other.pending,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, ToSchema)]
pub struct RoleCounts {
    pub admins: u64,
    pub users: u64,
}

/// Listing creations within one calendar month, summed across collections.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MonthlyCount {
    /// Month label in `YYYY-MM` form.
    pub month: String,
    pub count: u64,
}

/// Listings created since local midnight, split by top-level category.
#[derive(Debug, Clone, Copy, Default, Serialize, ToSchema)]
pub struct TodayCounts {
    pub home: u64,
    pub digital: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ReasonCount {
    pub reason: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DashboardSummary {
    pub estates: CollectionTotals,
    pub cell_phones: CollectionTotals,
    pub computers: CollectionTotals,
    pub combined: CollectionTotals,
    pub monthly: Vec<MonthlyCount>,
    /// Growth of the current month over the previous one, in percent.
    pub growth_percent: f64,
    pub today: TodayCounts,
    pub deletion_reasons: Vec<ReasonCount>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListingStats {
    pub approved: u64,
    pub rejected: u64,
    pub pending: u64,
    pub roles: RoleCounts,
}
