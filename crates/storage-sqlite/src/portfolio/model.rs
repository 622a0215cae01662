//! Database models for portfolios, ownership links and holdings.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use diesel::sql_types::{Double, Integer, Nullable, Text};

use stockfolio_core::portfolio::{Holding, NewHolding, PortfolioInfo, PortfolioSummary};

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::portfolios)]
#[diesel(primary_key(portfolio_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PortfolioDB {
    pub portfolio_id: i32,
    pub portfolio_name: String,
    pub description: Option<String>,
    pub index_symbol: Option<String>,
    pub created_by: i32,
    pub created_at: NaiveDateTime,
}

impl From<PortfolioDB> for PortfolioInfo {
    fn from(db: PortfolioDB) -> Self {
        Self {
            portfolio_id: db.portfolio_id,
            portfolio_name: db.portfolio_name,
            description: db.description,
            index_symbol: db.index_symbol,
            created_by: db.created_by,
            created_at: db.created_at,
        }
    }
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::portfolios)]
pub struct NewPortfolioDB {
    pub portfolio_name: String,
    pub description: Option<String>,
    pub index_symbol: Option<String>,
    pub created_by: i32,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::user_portfolios)]
pub struct NewUserPortfolioDB {
    pub user_id: i32,
    pub portfolio_id: i32,
    pub total_invested: f64,
}

#[derive(Queryable, QueryableByName, Selectable, Identifiable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::portfolio_holdings)]
#[diesel(primary_key(holding_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct HoldingDB {
    pub holding_id: i32,
    pub portfolio_id: i32,
    pub symbol: String,
    pub company_name: Option<String>,
    pub date_of_purchase: NaiveDate,
    pub buy_price: f64,
    pub current_price: f64,
    pub quantity: i64,
    pub invested_amount: f64,
    pub current_value: f64,
    pub pl_amount: f64,
    pub pl_percent: f64,
}

impl From<HoldingDB> for Holding {
    fn from(db: HoldingDB) -> Self {
        Self {
            holding_id: db.holding_id,
            portfolio_id: db.portfolio_id,
            symbol: db.symbol,
            company_name: db.company_name,
            date_of_purchase: db.date_of_purchase,
            buy_price: db.buy_price,
            current_price: db.current_price,
            quantity: db.quantity,
            invested_amount: db.invested_amount,
            current_value: db.current_value,
            pl_amount: db.pl_amount,
            pl_percent: db.pl_percent,
        }
    }
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::portfolio_holdings)]
pub struct NewHoldingDB {
    pub portfolio_id: i32,
    pub symbol: String,
    pub company_name: Option<String>,
    pub date_of_purchase: NaiveDate,
    pub buy_price: f64,
    pub current_price: f64,
    pub quantity: i64,
    pub invested_amount: f64,
    pub current_value: f64,
    pub pl_amount: f64,
    pub pl_percent: f64,
}

impl NewHoldingDB {
    pub fn from_domain(portfolio_id: i32, holding: NewHolding) -> Self {
        Self {
            portfolio_id,
            symbol: holding.symbol,
            company_name: holding.company_name,
            date_of_purchase: holding.date_of_purchase,
            buy_price: holding.buy_price,
            current_price: holding.current_price,
            quantity: holding.quantity,
            invested_amount: holding.invested_amount,
            current_value: holding.current_value,
            pl_amount: holding.pl_amount,
            pl_percent: holding.pl_percent,
        }
    }
}

/// One aggregated row of the portfolio list query.
#[derive(QueryableByName, Debug)]
pub(crate) struct PortfolioSummaryRow {
    #[diesel(sql_type = Integer)]
    pub portfolio_id: i32,
    #[diesel(sql_type = Text)]
    pub portfolio_name: String,
    #[diesel(sql_type = Nullable<Text>)]
    pub description: Option<String>,
    #[diesel(sql_type = Double)]
    pub total_invested: f64,
    #[diesel(sql_type = Double)]
    pub total_current: f64,
    #[diesel(sql_type = Double)]
    pub pl_amount: f64,
    #[diesel(sql_type = Double)]
    pub pl_percent: f64,
}

impl From<PortfolioSummaryRow> for PortfolioSummary {
    fn from(row: PortfolioSummaryRow) -> Self {
        Self {
            portfolio_id: row.portfolio_id,
            portfolio_name: row.portfolio_name,
            description: row.description,
            total_invested: row.total_invested,
            total_current: row.total_current,
            pl_amount: row.pl_amount,
            pl_percent: row.pl_percent,
        }
    }
}
