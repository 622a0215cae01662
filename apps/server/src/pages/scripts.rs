use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Html,
    routing::get,
    Extension, Router,
};
use serde::Deserialize;
use stockfolio_core::indices::IndexServiceTrait;

use crate::{
    auth::CurrentUser,
    error::{PageError, PageResult},
    main_lib::AppState,
    views::{escape_html, format_amount, layout, Nav},
};

#[derive(Deserialize)]
struct ScriptsQuery {
    symbol: Option<String>,
}

/// Constituents of one index with their latest closes, plus the form that
/// starts a construction.
async fn view_scripts(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<ScriptsQuery>,
) -> PageResult<Html<String>> {
    let symbol = query.symbol.as_deref().map(str::trim).unwrap_or_default();
    if symbol.is_empty() {
        return Err(PageError::BadRequest("No index specified.".to_string()));
    }

    let listing = state.index_service.get_index_stocks(symbol).await?;
    let total = listing.total_count();
    let index = escape_html(&listing.index_symbol);

    let mut rows = String::new();
    for (position, stock) in listing.stocks.iter().enumerate() {
        let close = stock
            .close_price
            .map(format_amount)
            .unwrap_or_else(|| "N/A".to_string());
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            position + 1,
            escape_html(&stock.company_name),
            escape_html(&stock.symbol),
            close
        ));
    }

    let body = format!(
        r#"<div class="index-layout">
<div class="stock-selection-card">
<h4>Select Number of Stocks</h4>
<div class="info-badge"><span class="label">Total Stocks in</span> <span class="value">{index}: {total}</span></div>
<form method="post" action="/view-selected-stocks" id="stockSelectionForm">
<input type="hidden" name="symbol" value="{index}" />
<label for="num_stocks">Number of Stocks to Invest In</label>
<input type="number" id="num_stocks" name="num_stocks" min="1" max="{total}" placeholder="Suggested: {suggested}" required />
<button type="submit" class="btn-proceed">Proceed</button>
</form>
</div>
<div class="index-stocks">
<h5>Available Stocks in {index}</h5>
<table class="scripts-table">
<thead><tr><th>Sr No.</th><th>Company Name</th><th>Symbol</th><th>Close Price (₹)</th></tr></thead>
<tbody>
{rows}</tbody>
</table>
</div>
</div>"#,
        suggested = listing.suggested_count,
    );
    Ok(layout(
        &format!("{} - Select Stocks", listing.index_symbol),
        Nav::AddPortfolio,
        Some(&user.username),
        &body,
    ))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/view-scripts", get(view_scripts))
}
