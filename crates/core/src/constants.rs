/// Smallest capital accepted when starting a new portfolio.
pub const MIN_INVESTMENT_AMOUNT: f64 = 100_000.0;

/// Share of an index's constituents suggested as the portfolio size.
pub const SUGGESTED_STOCK_RATIO: f64 = 0.40;

/// Stock count requested when a rebalance is started from the portfolio list.
pub const DEFAULT_REBALANCE_STOCK_COUNT: i32 = 20;

/// Upper bound on a single collaborator call (construction or rebalance).
pub const DEFAULT_COLLABORATOR_TIMEOUT_SECS: u64 = 180;

/// Upper bound on downloading an index constituent CSV.
pub const DEFAULT_CSV_FETCH_TIMEOUT_SECS: u64 = 30;

/// Header names looked up (case-insensitively) in a constituent CSV.
pub const COMPANY_NAME_HEADER: &str = "Company Name";
pub const SYMBOL_HEADER: &str = "Symbol";

/// HTTP statuses the rebalance collaborator uses for business-rule rejections.
pub const REBALANCE_REJECTION_STATUSES: [u16; 3] = [400, 502, 503];
