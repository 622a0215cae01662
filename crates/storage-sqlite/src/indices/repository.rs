use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::Text;
use diesel::upsert::excluded;
use diesel::sqlite::Sqlite;
use diesel::SqliteConnection;
use log::debug;

use stockfolio_core::indices::{ClosePrice, Index, IndexRepositoryTrait, PriceRepositoryTrait};
use stockfolio_core::Result;

use super::model::{ClosePriceDB, IndexDB, LatestCloseRow};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::{bhavcopy_data, indices};
use crate::utils::{chunk_for_sqlite, placeholders};

pub struct IndexRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl IndexRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        IndexRepository { pool, writer }
    }
}

#[async_trait]
impl IndexRepositoryTrait for IndexRepository {
    fn list_indices(&self) -> Result<Vec<Index>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = indices::table
            .order(indices::symbol.asc())
            .select(IndexDB::as_select())
            .load::<IndexDB>(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(Index::from).collect())
    }

    fn get_index(&self, symbol: &str) -> Result<Option<Index>> {
        let mut conn = get_connection(&self.pool)?;
        let row = indices::table
            .find(symbol)
            .select(IndexDB::as_select())
            .first::<IndexDB>(&mut conn)
            .optional()
            .into_core()?;
        Ok(row.map(Index::from))
    }

    async fn upsert_index(&self, index: Index) -> Result<Index> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Index> {
                let row: IndexDB = index.into();
                let saved = diesel::insert_into(indices::table)
                    .values(&row)
                    .on_conflict(indices::symbol)
                    .do_update()
                    .set(indices::url.eq(excluded(indices::url)))
                    .returning(IndexDB::as_returning())
                    .get_result(conn)
                    .into_core()?;
                Ok(Index::from(saved))
            })
            .await
    }
}

pub struct PriceRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl PriceRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        PriceRepository { pool, writer }
    }
}

#[async_trait]
impl PriceRepositoryTrait for PriceRepository {
    fn latest_close_prices(&self, symbols: &[String]) -> Result<HashMap<String, f64>> {
        let mut conn = get_connection(&self.pool)?;
        let mut latest = HashMap::with_capacity(symbols.len());

        for chunk in chunk_for_sqlite(symbols) {
            // SQLite takes bare columns from the row that produced MAX().
            let sql = format!(
                "SELECT symbol, close_price, MAX(trade_date) AS trade_date \
                 FROM bhavcopy_data WHERE symbol IN ({}) GROUP BY symbol",
                placeholders(chunk.len())
            );
            let mut query = diesel::sql_query(sql).into_boxed::<Sqlite>();
            for symbol in chunk {
                query = query.bind::<Text, _>(symbol.clone());
            }
            let rows = query.load::<LatestCloseRow>(&mut conn).into_core()?;
            latest.extend(rows.into_iter().map(|r| (r.symbol, r.close_price)));
        }

        debug!(
            "Found latest close for {}/{} symbols",
            latest.len(),
            symbols.len()
        );
        Ok(latest)
    }

    async fn upsert_close_prices(&self, prices: Vec<ClosePrice>) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let mut affected_rows = 0;
                for price in prices {
                    let row: ClosePriceDB = price.into();
                    affected_rows += diesel::insert_into(bhavcopy_data::table)
                        .values(&row)
                        .on_conflict((bhavcopy_data::symbol, bhavcopy_data::trade_date))
                        .do_update()
                        .set(bhavcopy_data::close_price.eq(excluded(bhavcopy_data::close_price)))
                        .execute(conn)
                        .into_core()?;
                }
                Ok(affected_rows)
            })
            .await
    }
}
