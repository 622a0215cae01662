//! Whitelisted column sorting shared by every sortable table.
//!
//! Sort parameters arrive as raw query-string text. They are only ever turned
//! into one of the enumerated column types below, so a column name reaching
//! SQL `ORDER BY` is always one of a fixed set of identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Ascending or descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Accepts `asc`/`desc` in any case.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }

    /// Applies this order to an ascending comparison.
    pub fn apply(&self, ordering: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A closed set of sortable columns for one table.
pub trait SortColumn: Copy + Eq + Sized + 'static {
    /// Every accepted column, in display order.
    const ALL: &'static [Self];
    const DEFAULT: Self;

    /// The exact query-string value (and SQL identifier) of the column.
    fn as_str(&self) -> &'static str;

    /// Exact, case-sensitive whitelist lookup.
    fn parse(raw: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == raw)
    }
}

/// A validated column/order pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec<C> {
    pub column: C,
    pub order: SortOrder,
}

impl<C: SortColumn> Default for SortSpec<C> {
    fn default() -> Self {
        Self {
            column: C::DEFAULT,
            order: SortOrder::Asc,
        }
    }
}

impl<C: SortColumn> SortSpec<C> {
    /// Builds a spec from raw parameters. Anything outside the whitelist falls
    /// back to the default column or ascending order, independently.
    pub fn from_params(sort: Option<&str>, order: Option<&str>) -> Self {
        Self {
            column: sort.and_then(C::parse).unwrap_or(C::DEFAULT),
            order: order.and_then(SortOrder::parse).unwrap_or_default(),
        }
    }

    pub fn is_active(&self, column: C, order: SortOrder) -> bool {
        self.column == column && self.order == order
    }

    /// `ORDER BY` body for SQL built from whitelisted identifiers only.
    pub fn order_by_clause(&self) -> String {
        format!("{} {}", self.column.as_str(), self.order.as_sql())
    }
}

/// Columns of the portfolio list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortfolioSortColumn {
    PortfolioName,
    TotalInvested,
    TotalCurrent,
    PlAmount,
    PlPercent,
}

impl SortColumn for PortfolioSortColumn {
    const ALL: &'static [Self] = &[
        Self::PortfolioName,
        Self::TotalInvested,
        Self::TotalCurrent,
        Self::PlAmount,
        Self::PlPercent,
    ];
    const DEFAULT: Self = Self::PortfolioName;

    fn as_str(&self) -> &'static str {
        match self {
            Self::PortfolioName => "portfolio_name",
            Self::TotalInvested => "total_invested",
            Self::TotalCurrent => "total_current",
            Self::PlAmount => "pl_amount",
            Self::PlPercent => "pl_percent",
        }
    }
}

/// Columns of the holdings table on the portfolio detail page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldingSortColumn {
    Symbol,
    CompanyName,
    DateOfPurchase,
    BuyPrice,
    CurrentPrice,
    Quantity,
    InvestedAmount,
    CurrentValue,
    PlAmount,
    PlPercent,
}

impl SortColumn for HoldingSortColumn {
    const ALL: &'static [Self] = &[
        Self::Symbol,
        Self::CompanyName,
        Self::DateOfPurchase,
        Self::BuyPrice,
        Self::CurrentPrice,
        Self::Quantity,
        Self::InvestedAmount,
        Self::CurrentValue,
        Self::PlAmount,
        Self::PlPercent,
    ];
    const DEFAULT: Self = Self::Symbol;

    fn as_str(&self) -> &'static str {
        match self {
            Self::Symbol => "symbol",
            Self::CompanyName => "company_name",
            Self::DateOfPurchase => "date_of_purchase",
            Self::BuyPrice => "buy_price",
            Self::CurrentPrice => "current_price",
            Self::Quantity => "quantity",
            Self::InvestedAmount => "invested_amount",
            Self::CurrentValue => "current_value",
            Self::PlAmount => "pl_amount",
            Self::PlPercent => "pl_percent",
        }
    }
}

/// Columns of a freshly constructed (unsaved) portfolio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructedSortColumn {
    Symbol,
    Ltp,
    Quantity,
    InvestedAmount,
    OneYearReturnPct,
}

impl SortColumn for ConstructedSortColumn {
    const ALL: &'static [Self] = &[
        Self::Symbol,
        Self::Ltp,
        Self::Quantity,
        Self::InvestedAmount,
        Self::OneYearReturnPct,
    ];
    const DEFAULT: Self = Self::Symbol;

    fn as_str(&self) -> &'static str {
        match self {
            Self::Symbol => "SYMBOL",
            Self::Ltp => "LTP",
            Self::Quantity => "QUANTITY",
            Self::InvestedAmount => "INVESTED_AMOUNT",
            Self::OneYearReturnPct => "ONE_YEAR_RETURN_PCT",
        }
    }
}
