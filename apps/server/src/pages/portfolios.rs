use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::{Html, Response},
    routing::get,
    Extension, Form, Router,
};
use serde::Deserialize;
use stockfolio_core::constants::DEFAULT_REBALANCE_STOCK_COUNT;
use stockfolio_core::errors::Error as CoreError;
use stockfolio_core::portfolio::{PerformanceSummary, PortfolioServiceTrait};
use stockfolio_core::sorting::{PortfolioSortColumn, SortSpec};

use super::{parse_int, SortParams};
use crate::{
    auth::CurrentUser,
    error::PageResult,
    main_lib::AppState,
    views::{as_of_date, escape_html, format_amount, layout, redirect, sort_arrows, Nav},
};

const LIST_PATH: &str = "/view-portfolio";

#[derive(Deserialize)]
struct PortfolioAction {
    action: Option<String>,
    portfolio_id: Option<String>,
}

async fn list(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<SortParams>,
) -> PageResult<Html<String>> {
    let sort: SortSpec<PortfolioSortColumn> = params.spec();
    let portfolios = state.portfolio_service.list_portfolios(user.user_id, sort)?;
    let arrows = |column: PortfolioSortColumn| sort_arrows(LIST_PATH, &[], column, sort);

    let content = if portfolios.is_empty() {
        r#"<p class="empty-note">You have no portfolios to show.</p>"#.to_string()
    } else {
        let mut rows = String::new();
        for (position, row) in portfolios.iter().enumerate() {
            let performance = PerformanceSummary::from_totals(row.total_invested, row.total_current);
            let name = escape_html(&row.portfolio_name);
            rows.push_str(&format!(
                r#"<tr>
<td>{sr}</td>
<td>{name}</td>
<td>{description}</td>
<td>{invested}</td>
<td class="{cv_class}">{current}</td>
<td class="{pl_class}">{pl}</td>
<td class="{plp_class}">{plp}</td>
<td><div class="action-btn-group">
<a href="/view-portfolio-details?portfolio_id={id}" class="btn-action btn-primary">View Details</a>
<form method="post" action="/rebalance" data-name="{name}" onsubmit="return confirm('Rebalance portfolio ' + this.dataset.name + ' based on latest 30-day returns?');">
<input type="hidden" name="portfolio_id" value="{id}" />
<input type="hidden" name="no_of_stocks" value="{rebalance_count}" />
<button type="submit" class="btn-action btn-update-available">Update Portfolio</button>
</form>
<form method="post" action="{LIST_PATH}" data-name="{name}" onsubmit="return confirm('Delete portfolio ' + this.dataset.name + ' and all its holdings?');">
<input type="hidden" name="action" value="delete_portfolio" />
<input type="hidden" name="portfolio_id" value="{id}" />
<button type="submit" class="btn-action btn-danger">Delete Portfolio</button>
</form>
</div></td>
</tr>
"#,
                sr = position + 1,
                description = escape_html(row.description.as_deref().unwrap_or_default()),
                invested = format_amount(row.total_invested),
                current = format_amount(row.total_current),
                pl = format_amount(row.pl_amount),
                plp = format_amount(row.pl_percent),
                cv_class = performance.current_value_tone().css_class(),
                pl_class = performance.net_pl_tone().css_class(),
                plp_class = performance.net_pl_percent_tone().css_class(),
                id = row.portfolio_id,
                rebalance_count = DEFAULT_REBALANCE_STOCK_COUNT,
            ));
        }
        format!(
            r#"<table class="portfolio-table">
<thead><tr>
<th>Sr No.</th>
<th>Portfolio{a_name}</th>
<th>Description</th>
<th>Total Invested (₹){a_invested}</th>
<th>Current Value (₹)<div class="as-of">as of {as_of}</div>{a_current}</th>
<th>Net P/L (₹){a_pl}</th>
<th>Net P/L (%){a_plp}</th>
<th>Action</th>
</tr></thead>
<tbody>
{rows}</tbody>
</table>"#,
            a_name = arrows(PortfolioSortColumn::PortfolioName),
            a_invested = arrows(PortfolioSortColumn::TotalInvested),
            a_current = arrows(PortfolioSortColumn::TotalCurrent),
            a_pl = arrows(PortfolioSortColumn::PlAmount),
            a_plp = arrows(PortfolioSortColumn::PlPercent),
            as_of = as_of_date(state.display_tz),
        )
    };

    let body = format!(
        r#"<div class="page-header">
<h1>Your Portfolios</h1>
<div class="welcome-msg">Welcome, <strong>{}</strong>!</div>
</div>
{}"#,
        escape_html(&user.username),
        content
    );
    Ok(layout("Your Portfolios", Nav::ViewPortfolio, Some(&user.username), &body))
}

/// Handles the list's delete form. Anything that isn't a delete of an owned
/// portfolio just returns to the list.
async fn act(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<PortfolioAction>,
) -> PageResult<Response> {
    if form.action.as_deref() == Some("delete_portfolio") {
        let portfolio_id = parse_int(form.portfolio_id.as_deref());
        if portfolio_id > 0 {
            match state
                .portfolio_service
                .delete_portfolio(user.user_id, portfolio_id)
                .await
            {
                Ok(_) => {}
                Err(CoreError::NotFound(_)) => {
                    tracing::warn!(
                        "User {} tried to delete portfolio {} they do not own",
                        user.user_id,
                        portfolio_id
                    );
                }
                Err(other) => return Err(other.into()),
            }
        }
    }
    Ok(redirect(LIST_PATH))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(LIST_PATH, get(list).post(act))
}
