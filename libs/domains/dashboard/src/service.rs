use std::sync::Arc;

use chrono::Utc;
use domain_listings::ListingKind;
use domain_users::models::Role;
use tracing::instrument;

use crate::error::DashboardResult;
use crate::models::{
    CollectionTotals, DashboardSummary, ListingStats, MonthlyCount, RoleCounts, TodayCounts,
};
use crate::repository::{DashboardStore, ModerationFilter};
use crate::stats::{day_start, growth_percent, month_label, month_start, order_reasons};

/// How many calendar months the creation chart covers, current included.
const CHART_MONTHS: u32 = 6;

pub struct DashboardService<S: DashboardStore> {
    store: Arc<S>,
}

impl<S: DashboardStore> DashboardService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    async fn collection_totals(&self, kind: ListingKind) -> DashboardResult<CollectionTotals> {
        Ok(CollectionTotals {
            total: self.store.count_listings(kind, ModerationFilter::All).await?,
            approved: self
                .store
                .count_listings(kind, ModerationFilter::Approved)
                .await?,
            rejected: self
                .store
                .count_listings(kind, ModerationFilter::Rejected)
                .await?,
            pending: self
                .store
                .count_listings(kind, ModerationFilter::Pending)
                .await?,
        })
    }

    #[instrument(skip(self))]
    pub async fn summary(&self) -> DashboardResult<DashboardSummary> {
        let now = Utc::now();

        let estates = self.collection_totals(ListingKind::Estate).await?;
        let cell_phones = self.collection_totals(ListingKind::CellPhone).await?;
        let computers = self.collection_totals(ListingKind::Computer).await?;
        let combined = estates.add(&cell_phones).add(&computers);

        let mut monthly = Vec::with_capacity(CHART_MONTHS as usize);
        for back in (0..CHART_MONTHS).rev() {
            let from = month_start(now, back);
            let to = if back == 0 {
                now
            } else {
                month_start(now, back - 1)
            };
            let mut count = 0;
            for kind in ListingKind::ALL {
                count += self.store.count_created_between(kind, from, to).await?;
            }
            monthly.push(MonthlyCount {
                month: month_label(from),
                count,
            });
        }

        let current = monthly.last().map(|m| m.count).unwrap_or(0);
        let prior = monthly
            .len()
            .checked_sub(2)
            .and_then(|i| monthly.get(i))
            .map(|m| m.count)
            .unwrap_or(0);

        let today_from = day_start(now);
        let home = self
            .store
            .count_created_between(ListingKind::Estate, today_from, now)
            .await?;
        let digital = self
            .store
            .count_created_between(ListingKind::CellPhone, today_from, now)
            .await?
            + self
                .store
                .count_created_between(ListingKind::Computer, today_from, now)
                .await?;

        let deletion_reasons = order_reasons(self.store.deletion_reason_counts().await?);

        Ok(DashboardSummary {
            estates,
            cell_phones,
            computers,
            combined,
            monthly,
            growth_percent: growth_percent(prior, current),
            today: TodayCounts { home, digital },
            deletion_reasons,
        })
    }

    #[instrument(skip(self))]
    pub async fn listing_stats(&self) -> DashboardResult<ListingStats> {
        let mut approved = 0;
        let mut rejected = 0;
        let mut pending = 0;
        for kind in ListingKind::ALL {
            approved += self
                .store
                .count_listings(kind, ModerationFilter::Approved)
                .await?;
            rejected += self
                .store
                .count_listings(kind, ModerationFilter::Rejected)
                .await?;
            pending += self
                .store
                .count_listings(kind, ModerationFilter::Pending)
                .await?;
        }

        let roles = RoleCounts {
            admins: self.store.count_users_with_role(Role::Admin).await?,
            users: self.store.count_users_with_role(Role::User).await?,
        };

        Ok(ListingStats {
            approved,
            rejected,
            pending,
            roles,
        })
    }
}

impl<S: DashboardStore> Clone for DashboardService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReasonCount;
    use crate::repository::MockDashboardStore;

    #[tokio::test]
    async fn test_listing_stats_sums_collections() {
        let mut store = MockDashboardStore::new();
        store
            .expect_count_listings()
            .returning(|_, filter| match filter {
                ModerationFilter::Approved => Ok(5),
                ModerationFilter::Rejected => Ok(1),
                ModerationFilter::Pending => Ok(2),
                ModerationFilter::All => Ok(8),
            });
        store
            .expect_count_users_with_role()
            .returning(|role| match role {
                Role::Admin => Ok(2),
                Role::User => Ok(40),
            });

        let service = DashboardService::new(Arc::new(store));
        let stats = service.listing_stats().await.unwrap();
        assert_eq!(stats.approved, 15);
        assert_eq!(stats.rejected, 3);
        assert_eq!(stats.pending, 6);
        assert_eq!(stats.roles.admins, 2);
        assert_eq!(stats.roles.users, 40);
    }

    #[tokio::test]
    async fn test_summary_growth_and_reason_order() {
        let now = Utc::now();
        let current_month = month_label(month_start(now, 0));
        let prior_month = month_label(month_start(now, 1));

        let mut store = MockDashboardStore::new();
        store.expect_count_listings().returning(|_, _| Ok(0));
        store
            .expect_count_created_between()
            .returning(move |_, from, _| {
                let label = month_label(from);
                if label == current_month {
                    Ok(4)
                } else if label == prior_month {
                    Ok(2)
                } else {
                    Ok(1)
                }
            });
        store.expect_deletion_reason_counts().returning(|| {
            Ok(vec![
                ReasonCount {
                    reason: "duplicate".into(),
                    count: 2,
                },
                ReasonCount {
                    reason: "sold".into(),
                    count: 5,
                },
            ])
        });

        let service = DashboardService::new(Arc::new(store));
        let summary = service.summary().await.unwrap();

        assert_eq!(summary.monthly.len(), 6);
        // current month: 4 per collection; prior: 2 per collection
        assert_eq!(summary.monthly[5].count, 12);
        assert_eq!(summary.monthly[4].count, 6);
        assert_eq!(summary.growth_percent, 100.0);
        assert_eq!(summary.deletion_reasons[0].reason, "sold");
    }
}
