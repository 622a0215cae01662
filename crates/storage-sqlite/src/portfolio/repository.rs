use std::sync::Arc;

use async_trait::async_trait;
use diesel::dsl::{count_star, sum};
use diesel::prelude::*;
use diesel::sql_types::Integer;
use diesel::SqliteConnection;
use log::debug;

use stockfolio_core::portfolio::{
    DashboardTotals, Holding, NewPortfolio, PortfolioInfo, PortfolioRemoval,
    PortfolioRepositoryTrait, PortfolioSummary,
};
use stockfolio_core::sorting::{HoldingSortColumn, PortfolioSortColumn, SortSpec};
use stockfolio_core::Result;

use super::model::{
    HoldingDB, NewHoldingDB, NewPortfolioDB, NewUserPortfolioDB, PortfolioDB, PortfolioSummaryRow,
};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::{portfolio_holdings, portfolios, user_portfolios};

const PORTFOLIO_LIST_SQL: &str = "
    SELECT
        p.portfolio_id,
        p.portfolio_name,
        p.description,
        COALESCE(SUM(ph.invested_amount), 0.0) AS total_invested,
        COALESCE(SUM(ph.current_value), 0.0) AS total_current,
        COALESCE(SUM(ph.current_value) - SUM(ph.invested_amount), 0.0) AS pl_amount,
        CASE
            WHEN SUM(ph.invested_amount) > 0
            THEN (SUM(ph.current_value) - SUM(ph.invested_amount)) / SUM(ph.invested_amount) * 100.0
            ELSE 0.0
        END AS pl_percent
    FROM user_portfolios up
    JOIN portfolios p ON up.portfolio_id = p.portfolio_id
    LEFT JOIN portfolio_holdings ph ON p.portfolio_id = ph.portfolio_id
    WHERE up.user_id = ?
    GROUP BY p.portfolio_id, p.portfolio_name, p.description";

const HOLDINGS_SQL: &str = "
    SELECT holding_id, portfolio_id, symbol, company_name, date_of_purchase,
           buy_price, current_price, quantity, invested_amount, current_value,
           pl_amount, pl_percent
    FROM portfolio_holdings
    WHERE portfolio_id = ?";

pub struct PortfolioRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl PortfolioRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        PortfolioRepository { pool, writer }
    }
}

#[async_trait]
impl PortfolioRepositoryTrait for PortfolioRepository {
    fn dashboard_totals(&self, user_id: i32) -> Result<DashboardTotals> {
        let mut conn = get_connection(&self.pool)?;

        let portfolio_count = user_portfolios::table
            .filter(user_portfolios::user_id.eq(user_id))
            .select(count_star())
            .first::<i64>(&mut conn)
            .into_core()?;

        let (invested, current) = user_portfolios::table
            .inner_join(
                portfolio_holdings::table
                    .on(portfolio_holdings::portfolio_id.eq(user_portfolios::portfolio_id)),
            )
            .filter(user_portfolios::user_id.eq(user_id))
            .select((
                sum(portfolio_holdings::invested_amount),
                sum(portfolio_holdings::current_value),
            ))
            .first::<(Option<f64>, Option<f64>)>(&mut conn)
            .into_core()?;

        Ok(DashboardTotals {
            portfolio_count,
            total_invested: invested.unwrap_or(0.0),
            total_current: current.unwrap_or(0.0),
        })
    }

    fn list_for_user(
        &self,
        user_id: i32,
        sort: SortSpec<PortfolioSortColumn>,
    ) -> Result<Vec<PortfolioSummary>> {
        let mut conn = get_connection(&self.pool)?;
        // The ORDER BY body comes only from the column whitelist.
        let sql = format!(
            "{} ORDER BY {}, p.portfolio_id ASC",
            PORTFOLIO_LIST_SQL,
            sort.order_by_clause()
        );
        let rows = diesel::sql_query(sql)
            .bind::<Integer, _>(user_id)
            .load::<PortfolioSummaryRow>(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(PortfolioSummary::from).collect())
    }

    fn find_owned(&self, user_id: i32, portfolio_id: i32) -> Result<Option<PortfolioInfo>> {
        let mut conn = get_connection(&self.pool)?;
        let row = portfolios::table
            .inner_join(user_portfolios::table)
            .filter(user_portfolios::user_id.eq(user_id))
            .filter(portfolios::portfolio_id.eq(portfolio_id))
            .select(PortfolioDB::as_select())
            .first::<PortfolioDB>(&mut conn)
            .optional()
            .into_core()?;
        Ok(row.map(PortfolioInfo::from))
    }

    fn list_holdings(
        &self,
        portfolio_id: i32,
        sort: SortSpec<HoldingSortColumn>,
    ) -> Result<Vec<Holding>> {
        let mut conn = get_connection(&self.pool)?;
        let sql = format!(
            "{} ORDER BY {}, holding_id ASC",
            HOLDINGS_SQL,
            sort.order_by_clause()
        );
        let rows = diesel::sql_query(sql)
            .bind::<Integer, _>(portfolio_id)
            .load::<HoldingDB>(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(Holding::from).collect())
    }

    async fn create(&self, new_portfolio: NewPortfolio) -> Result<PortfolioInfo> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<PortfolioInfo> {
                let NewPortfolio {
                    portfolio_name,
                    description,
                    index_symbol,
                    created_by,
                    total_invested,
                    holdings,
                } = new_portfolio;

                let created = diesel::insert_into(portfolios::table)
                    .values(&NewPortfolioDB {
                        portfolio_name,
                        description,
                        index_symbol,
                        created_by,
                    })
                    .returning(PortfolioDB::as_returning())
                    .get_result(conn)
                    .into_core()?;

                diesel::insert_into(user_portfolios::table)
                    .values(&NewUserPortfolioDB {
                        user_id: created_by,
                        portfolio_id: created.portfolio_id,
                        total_invested,
                    })
                    .execute(conn)
                    .into_core()?;

                let rows: Vec<NewHoldingDB> = holdings
                    .into_iter()
                    .map(|h| NewHoldingDB::from_domain(created.portfolio_id, h))
                    .collect();
                for row in &rows {
                    diesel::insert_into(portfolio_holdings::table)
                        .values(row)
                        .execute(conn)
                        .into_core()?;
                }

                debug!(
                    "Inserted portfolio {} with {} holdings",
                    created.portfolio_id,
                    rows.len()
                );
                Ok(PortfolioInfo::from(created))
            })
            .await
    }

    async fn remove_for_user(
        &self,
        user_id: i32,
        portfolio_id: i32,
    ) -> Result<Option<PortfolioRemoval>> {
        self.writer
            .exec(
                move |conn: &mut SqliteConnection| -> Result<Option<PortfolioRemoval>> {
                    let unlinked = diesel::delete(
                        user_portfolios::table
                            .filter(user_portfolios::user_id.eq(user_id))
                            .filter(user_portfolios::portfolio_id.eq(portfolio_id)),
                    )
                    .execute(conn)
                    .into_core()?;
                    if unlinked == 0 {
                        return Ok(None);
                    }

                    let remaining = user_portfolios::table
                        .filter(user_portfolios::portfolio_id.eq(portfolio_id))
                        .select(count_star())
                        .first::<i64>(conn)
                        .into_core()?;
                    if remaining > 0 {
                        return Ok(Some(PortfolioRemoval::Unlinked));
                    }

                    diesel::delete(
                        portfolio_holdings::table
                            .filter(portfolio_holdings::portfolio_id.eq(portfolio_id)),
                    )
                    .execute(conn)
                    .into_core()?;
                    diesel::delete(portfolios::table.find(portfolio_id))
                        .execute(conn)
                        .into_core()?;
                    Ok(Some(PortfolioRemoval::Deleted))
                },
            )
            .await
    }
}
