use std::sync::Arc;

use axum::{extract::State, response::Html, routing::get, Extension, Router};

use crate::{
    auth::CurrentUser,
    error::PageResult,
    main_lib::AppState,
    views::{escape_html, format_amount, layout, redirect, summary_card, Nav},
};
use stockfolio_core::portfolio::PortfolioServiceTrait;

async fn dashboard(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> PageResult<Html<String>> {
    let summary = state.portfolio_service.get_dashboard(user.user_id)?;
    let performance = summary.performance;

    let first_row = [
        summary_card("Total Portfolio", &summary.portfolio_count.to_string(), None),
        summary_card(
            "Total Investment",
            &format!("₹{}", format_amount(performance.total_invested)),
            None,
        ),
        summary_card(
            "Current Value",
            &format!("₹{}", format_amount(performance.total_current)),
            Some(performance.current_value_tone().css_class()),
        ),
    ]
    .concat();
    let second_row = [
        summary_card(
            "Net Profit/Loss",
            &format!("₹{}", format_amount(performance.net_pl)),
            Some(performance.net_pl_tone().css_class()),
        ),
        summary_card(
            "Net Returns (%)",
            &format!("{}%", format_amount(performance.net_pl_percent)),
            Some(performance.net_pl_percent_tone().css_class()),
        ),
    ]
    .concat();

    let body = format!(
        r#"<div class="page-header">
<h1>Dashboard</h1>
<div class="welcome-msg">Welcome, <strong>{username}</strong>!</div>
</div>
<div class="summary-section">
<div class="summary-row">{first_row}</div>
<div class="summary-row">{second_row}</div>
</div>
<div class="action-row">
<a class="btn-custom" href="/add-portfolio">Add Portfolio</a>
<a class="btn-custom" href="/view-portfolio">View Portfolio</a>
</div>"#,
        username = escape_html(&user.username),
    );
    Ok(layout("Dashboard", Nav::Dashboard, Some(&user.username), &body))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(|| async { redirect("/dashboard") }))
        .route("/dashboard", get(dashboard))
}
