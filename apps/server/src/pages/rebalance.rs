use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::post,
    Extension, Form, Router,
};
use serde::Deserialize;
use stockfolio_core::construction::{PortfolioBuilderTrait, RebalanceOutcome, RebalanceRequest};

use super::parse_int;
use crate::{
    auth::CurrentUser,
    error::{PageError, PageResult},
    main_lib::AppState,
    views::{escape_html, layout, redirect, Nav},
};

#[derive(Deserialize)]
struct RebalanceForm {
    portfolio_id: Option<String>,
    no_of_stocks: Option<String>,
}

fn rejection_page(user: &CurrentUser, portfolio_id: i32, detail: &str) -> Response {
    let body = format!(
        r#"<div class="notice-card">
<h4>Unable to Update Portfolio</h4>
<p>{}</p>
<div class="notice-links">
<a href="/view-portfolio-details?portfolio_id={}" class="btn-primary">Back to Portfolio</a>
<a href="/view-portfolio" class="btn-outline">All Portfolios</a>
</div>
</div>"#,
        escape_html(detail),
        portfolio_id
    );
    layout(
        "Unable to Update Portfolio",
        Nav::None,
        Some(&user.username),
        &body,
    )
    .into_response()
}

/// Asks the rebalance service to rebuild a portfolio. Holdings are only
/// changed on the service side.
async fn rebalance(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<RebalanceForm>,
) -> PageResult<Response> {
    let portfolio_id = parse_int(form.portfolio_id.as_deref());
    let no_of_stocks = parse_int(form.no_of_stocks.as_deref());
    if portfolio_id <= 0 || no_of_stocks <= 0 {
        return Err(PageError::BadRequest(
            "Invalid rebalance request.".to_string(),
        ));
    }

    let request = RebalanceRequest {
        portfolio_id,
        user_id: user.user_id,
        no_of_stocks,
    };
    let outcome = state
        .portfolio_builder
        .rebalance(&request)
        .await
        .map_err(|e| PageError::upstream("Rebalance failed", e))?;

    match outcome {
        RebalanceOutcome::Completed => {
            tracing::info!(
                "Portfolio {} rebalanced for user {}",
                portfolio_id,
                user.user_id
            );
            Ok(redirect(&format!(
                "/view-portfolio-details?portfolio_id={}",
                portfolio_id
            )))
        }
        RebalanceOutcome::Rejected { status, detail } => {
            tracing::info!(
                "Rebalance of portfolio {} refused ({}): {}",
                portfolio_id,
                status,
                detail
            );
            Ok(rejection_page(&user, portfolio_id, &detail))
        }
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/rebalance", post(rebalance))
}
