//! Database models for indices and bhavcopy prices.

use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::sql_types::{Double, Text};

use stockfolio_core::indices::{ClosePrice, Index};

#[derive(Queryable, Selectable, Insertable, AsChangeset, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::indices)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct IndexDB {
    pub symbol: String,
    pub url: String,
}

impl From<IndexDB> for Index {
    fn from(db: IndexDB) -> Self {
        Self {
            symbol: db.symbol,
            url: db.url,
        }
    }
}

impl From<Index> for IndexDB {
    fn from(domain: Index) -> Self {
        Self {
            symbol: domain.symbol,
            url: domain.url,
        }
    }
}

#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::bhavcopy_data)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ClosePriceDB {
    pub symbol: String,
    pub trade_date: NaiveDate,
    pub close_price: f64,
}

impl From<ClosePrice> for ClosePriceDB {
    fn from(domain: ClosePrice) -> Self {
        Self {
            symbol: domain.symbol,
            trade_date: domain.trade_date,
            close_price: domain.close_price,
        }
    }
}

/// Latest close per symbol, read through raw SQL.
#[derive(QueryableByName, Debug)]
pub(crate) struct LatestCloseRow {
    #[diesel(sql_type = Text)]
    pub symbol: String,
    #[diesel(sql_type = Double)]
    pub close_price: f64,
}
