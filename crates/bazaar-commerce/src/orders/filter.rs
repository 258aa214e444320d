//! Order listing filters, sorting, and pagination.

use crate::checkout::{Order, OrderStatus};
use crate::ids::UserId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Total-amount bucket filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TotalBucket {
    /// Total under R2000.
    Under2000,
    /// Total from R2000 to R5000 inclusive.
    From2000To5000,
    /// Total over R5000.
    Over5000,
}

impl TotalBucket {
    /// Whether the amount falls in this bucket.
    pub fn contains(&self, amount: &Money) -> bool {
        let cents = amount.amount_cents;
        match self {
            TotalBucket::Under2000 => cents < 200_000,
            TotalBucket::From2000To5000 => (200_000..=500_000).contains(&cents),
            TotalBucket::Over5000 => cents > 500_000,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TotalBucket::Under2000 => "<2000",
            TotalBucket::From2000To5000 => "2000-5000",
            TotalBucket::Over5000 => ">5000",
        }
    }
}

/// Sort options for order listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderSort {
    /// Most recently placed first.
    #[default]
    Newest,
    /// Oldest first.
    Oldest,
    /// Total, low to high.
    AmountAsc,
    /// Total, high to low.
    AmountDesc,
    /// Grouped by status.
    Status,
}

impl OrderSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSort::Newest => "newest",
            OrderSort::Oldest => "oldest",
            OrderSort::AmountAsc => "amount_asc",
            OrderSort::AmountDesc => "amount_desc",
            OrderSort::Status => "status",
        }
    }
}

/// An order-listing query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct OrderQuery {
    /// Filter by status.
    pub status: Option<OrderStatus>,
    /// Placed at or after this Unix timestamp.
    pub placed_after: Option<i64>,
    /// Placed at or before this Unix timestamp.
    pub placed_before: Option<i64>,
    /// Filter by total-amount bucket.
    pub bucket: Option<TotalBucket>,
    /// Free-text search over recipient name, company, reference, and id.
    pub search: Option<String>,
    /// Restrict to one customer's orders (subject to visibility checks).
    pub customer_id: Option<UserId>,
    /// Sort option.
    pub sort: OrderSort,
    /// Current page (1-indexed).
    pub page: i64,
    /// Items per page (0 = service default).
    pub per_page: i64,
}

impl OrderQuery {
    /// Whether the order passes every filter in this query.
    pub fn matches(&self, order: &Order) -> bool {
        if let Some(status) = self.status {
            if order.status != status {
                return false;
            }
        }
        if let Some(after) = self.placed_after {
            if order.placed_at < after {
                return false;
            }
        }
        if let Some(before) = self.placed_before {
            if order.placed_at > before {
                return false;
            }
        }
        if let Some(bucket) = self.bucket {
            if !bucket.contains(&order.total_amount) {
                return false;
            }
        }
        if let Some(customer_id) = &self.customer_id {
            if &order.user_id != customer_id {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.trim().to_lowercase();
            if !needle.is_empty() && !self.search_haystack(order).contains(&needle) {
                return false;
            }
        }
        true
    }

    fn search_haystack(&self, order: &Order) -> String {
        let mut haystack = format!(
            "{} {} {}",
            order.shipping_address.full_name(),
            order.reference,
            order.id
        );
        if let Some(company) = &order.shipping_address.company {
            haystack.push(' ');
            haystack.push_str(company);
        }
        haystack.to_lowercase()
    }

    /// Stable-sort orders according to the query's sort option.
    pub fn sort_orders(&self, orders: &mut [Order]) {
        match self.sort {
            OrderSort::Newest => orders.sort_by(|a, b| b.placed_at.cmp(&a.placed_at)),
            OrderSort::Oldest => orders.sort_by(|a, b| a.placed_at.cmp(&b.placed_at)),
            OrderSort::AmountAsc => orders.sort_by(|a, b| {
                a.total_amount.amount_cents.cmp(&b.total_amount.amount_cents)
            }),
            OrderSort::AmountDesc => orders.sort_by(|a, b| {
                b.total_amount.amount_cents.cmp(&a.total_amount.amount_cents)
            }),
            OrderSort::Status => orders.sort_by(|a, b| a.status.as_str().cmp(b.status.as_str())),
        }
    }

    /// Cache fingerprint covering every filter field.
    pub fn fingerprint(&self) -> String {
        format!(
            "status={};after={};before={};bucket={};q={};customer={};sort={};page={};per={}",
            self.status.map(|s| s.as_str()).unwrap_or("*"),
            self.placed_after.unwrap_or(0),
            self.placed_before.unwrap_or(0),
            self.bucket.map(|b| b.as_str()).unwrap_or("*"),
            self.search.as_deref().unwrap_or(""),
            self.customer_id
                .as_ref()
                .map(|c| c.as_str())
                .unwrap_or("*"),
            self.sort.as_str(),
            self.page,
            self.per_page,
        )
    }
}

/// Pagination info.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Current page (1-indexed).
    pub page: i64,
    /// Items per page.
    pub per_page: i64,
    /// Total number of items.
    pub total: i64,
    /// Total number of pages.
    pub total_pages: i64,
    /// Whether there's a next page.
    pub has_next: bool,
    /// Whether there's a previous page.
    pub has_prev: bool,
}

impl Pagination {
    /// Create pagination info.
    pub fn new(page: i64, per_page: i64, total: i64) -> Self {
        let total_pages = if total == 0 {
            1
        } else {
            (total + per_page - 1) / per_page
        };
        Self {
            page,
            per_page,
            total,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }

    /// Offset of the first item on the current page.
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }
}

/// A page of listing results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Pagination info.
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    fn zar(cents: i64) -> Money {
        Money::new(cents, Currency::ZAR)
    }

    #[test]
    fn test_bucket_boundaries() {
        assert!(TotalBucket::Under2000.contains(&zar(199_999)));
        assert!(!TotalBucket::Under2000.contains(&zar(200_000)));
        assert!(TotalBucket::From2000To5000.contains(&zar(200_000)));
        assert!(TotalBucket::From2000To5000.contains(&zar(500_000)));
        assert!(!TotalBucket::From2000To5000.contains(&zar(500_001)));
        assert!(TotalBucket::Over5000.contains(&zar(500_001)));
    }

    #[test]
    fn test_pagination_math() {
        let p = Pagination::new(2, 10, 25);
        assert_eq!(p.total_pages, 3);
        assert_eq!(p.offset(), 10);
        assert!(p.has_next);
        assert!(p.has_prev);

        let empty = Pagination::new(1, 10, 0);
        assert_eq!(empty.total_pages, 1);
        assert!(!empty.has_next);
    }

    #[test]
    fn test_fingerprint_distinguishes_queries() {
        let a = OrderQuery {
            page: 1,
            ..OrderQuery::default()
        };
        let b = OrderQuery {
            page: 2,
            ..OrderQuery::default()
        };
        assert_ne!(a.fingerprint(), b.fingerprint());
    }
}
