use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Html,
    routing::get,
    Extension, Router,
};
use serde::Deserialize;
use stockfolio_core::portfolio::{PerformanceSummary, PortfolioServiceTrait};
use stockfolio_core::sorting::{HoldingSortColumn, SortSpec};

use super::parse_int;
use crate::{
    auth::CurrentUser,
    error::PageResult,
    main_lib::AppState,
    views::{as_of_date, escape_html, format_amount, layout, sort_arrows, summary_card, Nav},
};

const DETAILS_PATH: &str = "/view-portfolio-details";

#[derive(Deserialize)]
struct DetailsQuery {
    portfolio_id: Option<String>,
    sort: Option<String>,
    order: Option<String>,
}

const COLUMNS: [(HoldingSortColumn, &str); 10] = [
    (HoldingSortColumn::Symbol, "Symbol"),
    (HoldingSortColumn::CompanyName, "Company"),
    (HoldingSortColumn::DateOfPurchase, "Date of Purchase"),
    (HoldingSortColumn::BuyPrice, "Buy Price (₹)"),
    (HoldingSortColumn::CurrentPrice, "Current Price (₹)"),
    (HoldingSortColumn::Quantity, "Quantity"),
    (HoldingSortColumn::InvestedAmount, "Invested Amount (₹)"),
    (HoldingSortColumn::CurrentValue, "Current Value (₹)"),
    (HoldingSortColumn::PlAmount, "P/L (₹)"),
    (HoldingSortColumn::PlPercent, "P/L (%)"),
];

async fn details(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<DetailsQuery>,
) -> PageResult<Html<String>> {
    let portfolio_id = parse_int(query.portfolio_id.as_deref());
    let sort: SortSpec<HoldingSortColumn> =
        SortSpec::from_params(query.sort.as_deref(), query.order.as_deref());
    let details = state
        .portfolio_service
        .get_portfolio_details(user.user_id, portfolio_id, sort)?;
    let performance = details.performance;
    let info = &details.portfolio;
    let name = escape_html(&info.portfolio_name);

    let cards = format!(
        r#"<div class="summary-row">{}{}</div>
<div class="summary-row">{}{}</div>"#,
        summary_card(
            "Total Invested",
            &format!("₹{}", format_amount(performance.total_invested)),
            None
        ),
        summary_card(
            "Current Value",
            &format!("₹{}", format_amount(performance.total_current)),
            Some(performance.current_value_tone().css_class())
        ),
        summary_card(
            "Net P/L",
            &format!("₹{}", format_amount(performance.net_pl)),
            Some(performance.net_pl_tone().css_class())
        ),
        summary_card(
            "Net P/L (%)",
            &format!("{}%", format_amount(performance.net_pl_percent)),
            Some(performance.net_pl_percent_tone().css_class())
        ),
    );

    let table = if details.holdings.is_empty() {
        r#"<p class="empty-note">No holdings in this portfolio.</p>"#.to_string()
    } else {
        let common = [("portfolio_id", portfolio_id.to_string())];
        let mut header = String::from("<th>Sr No.</th>");
        for (column, label) in COLUMNS {
            header.push_str(&format!(
                "<th>{}{}</th>",
                label,
                sort_arrows(DETAILS_PATH, &common, column, sort)
            ));
        }

        let mut rows = String::new();
        for (position, h) in details.holdings.iter().enumerate() {
            let tones = PerformanceSummary::from_totals(h.invested_amount, h.current_value);
            rows.push_str(&format!(
                r#"<tr>
<td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>
<td class="{}">{}</td><td class="{}">{}</td><td class="{}">{}</td>
</tr>
"#,
                position + 1,
                escape_html(&h.symbol),
                escape_html(h.company_name.as_deref().unwrap_or_default()),
                h.date_of_purchase.format("%Y-%m-%d"),
                format_amount(h.buy_price),
                format_amount(h.current_price),
                h.quantity,
                format_amount(h.invested_amount),
                tones.current_value_tone().css_class(),
                format_amount(h.current_value),
                tones.net_pl_tone().css_class(),
                format_amount(h.pl_amount),
                tones.net_pl_percent_tone().css_class(),
                format_amount(h.pl_percent),
            ));
        }
        format!(
            r#"<div class="as-of">Current prices as of {}</div>
<table class="portfolio-table">
<thead><tr>{}</tr></thead>
<tbody>
{}</tbody>
</table>"#,
            as_of_date(state.display_tz),
            header,
            rows
        )
    };

    let body = format!(
        r#"<div class="page-header">
<h2>{name}</h2>
<form method="post" action="/rebalance" data-name="{name}" onsubmit="return confirm('Rebalance portfolio ' + this.dataset.name + ' based on latest 30-day returns?');">
<input type="hidden" name="portfolio_id" value="{id}" />
<input type="hidden" name="no_of_stocks" value="{count}" />
<button type="submit" class="btn-update-pf btn-update-available">Update Portfolio</button>
</form>
</div>
<p class="portfolio-desc">{description}</p>
<div class="summary-section">{cards}</div>
{table}"#,
        id = info.portfolio_id,
        count = details.holding_count(),
        description = escape_html(info.description.as_deref().unwrap_or_default()),
    );
    Ok(layout(
        &info.portfolio_name,
        Nav::ViewPortfolio,
        Some(&user.username),
        &body,
    ))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(DETAILS_PATH, get(details))
}
