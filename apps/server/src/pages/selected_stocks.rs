use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Extension, Form, Router,
};
use chrono::Utc;
use serde::Deserialize;
use stockfolio_core::construction::{
    ConstructedPortfolio, ConstructionRequest, PortfolioBuilderTrait,
};
use stockfolio_core::errors::Error as CoreError;
use stockfolio_core::indices::{IndexError, IndexServiceTrait};
use stockfolio_core::portfolio::PortfolioServiceTrait;
use stockfolio_core::sorting::{ConstructedSortColumn, SortSpec};

use super::{parse_amount, parse_int, SortParams};
use crate::{
    auth::CurrentUser,
    error::{PageError, PageResult},
    main_lib::AppState,
    session::CachedConstruction,
    views::{escape_html, format_amount, layout, redirect, sort_arrows, summary_card, Nav},
};

const SELECTION_PATH: &str = "/view-selected-stocks";
const SAVE_ACTION: &str = "save_portfolio";

const COLUMNS: [(ConstructedSortColumn, &str); 5] = [
    (ConstructedSortColumn::Symbol, "Symbol"),
    (ConstructedSortColumn::Ltp, "LTP (₹)"),
    (ConstructedSortColumn::Quantity, "Quantity"),
    (ConstructedSortColumn::InvestedAmount, "Invested Amount (₹)"),
    (ConstructedSortColumn::OneYearReturnPct, "1Y Return (%)"),
];

#[derive(Deserialize)]
struct SelectionParams {
    symbol: Option<String>,
    num_stocks: Option<String>,
    total_capital: Option<String>,
    action: Option<String>,
    sort: Option<String>,
    order: Option<String>,
}

async fn show_get(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<SelectionParams>,
) -> PageResult<Response> {
    let sort = SortSpec::from_params(params.sort.as_deref(), params.order.as_deref());
    handle(&state, &user, params, sort).await
}

async fn show_post(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(sort): Query<SortParams>,
    Form(params): Form<SelectionParams>,
) -> PageResult<Response> {
    handle(&state, &user, params, sort.spec()).await
}

/// The constructed portfolio for `request`, from the session cache when the
/// same request was built last, otherwise from the construction service.
async fn constructed_for(
    state: &AppState,
    user: &CurrentUser,
    cached: Option<ConstructedPortfolio>,
    request: &ConstructionRequest,
) -> PageResult<ConstructedPortfolio> {
    if let Some(hit) = cached {
        tracing::info!(
            "Reusing construction of {} ({} stocks, capital {}) for user {}",
            request.index_symbol,
            request.no_of_stocks,
            request.total_capital,
            user.user_id
        );
        return Ok(hit);
    }

    let built = state
        .portfolio_builder
        .construct(request)
        .await
        .map_err(|e| PageError::upstream("Portfolio generation failed", e))?;
    let entry = CachedConstruction {
        key: request.key(),
        result: built.clone(),
    };
    state
        .sessions
        .update(&user.token, |session| session.last_construction = Some(entry))
        .await;
    Ok(built)
}

async fn handle(
    state: &AppState,
    user: &CurrentUser,
    params: SelectionParams,
    sort: SortSpec<ConstructedSortColumn>,
) -> PageResult<Response> {
    let Some(session) = state.sessions.get(&user.token).await else {
        return Ok(redirect("/login"));
    };

    let index_symbol = params.symbol.as_deref().map(str::trim).unwrap_or_default();
    let no_of_stocks = parse_int(params.num_stocks.as_deref());
    let mut total_capital = parse_amount(params.total_capital.as_deref());
    if total_capital <= 0.0 {
        total_capital = session.investment_amount.unwrap_or(0.0);
    }
    if index_symbol.is_empty() || no_of_stocks < 1 || total_capital <= 0.0 {
        return Err(PageError::BadRequest("Invalid input.".to_string()));
    }

    let saving = params.action.as_deref() == Some(SAVE_ACTION);
    if saving
        && !state
            .index_service
            .list_indices()?
            .iter()
            .any(|index| index.symbol == index_symbol)
    {
        return Err(CoreError::from(IndexError::UnknownIndex(index_symbol.to_string())).into());
    }

    let request = ConstructionRequest {
        index_symbol: index_symbol.to_string(),
        no_of_stocks,
        total_capital,
    };
    let cached = session.cached_construction(&request.key()).cloned();
    let mut constructed = constructed_for(state, user, cached, &request).await?;

    if saving {
        let saved_at = Utc::now().with_timezone(&state.display_tz).naive_local();
        let saved = state
            .portfolio_service
            .save_constructed(user.user_id, index_symbol, &constructed, saved_at)
            .await?;
        tracing::info!(
            "User {} saved portfolio {} ({} holdings)",
            user.user_id,
            saved.portfolio_id,
            constructed.portfolio.len()
        );
        return Ok(redirect("/dashboard"));
    }

    constructed.sort_by(sort);
    Ok(render(user, &request, &constructed, sort).into_response())
}

fn render(
    user: &CurrentUser,
    request: &ConstructionRequest,
    constructed: &ConstructedPortfolio,
    sort: SortSpec<ConstructedSortColumn>,
) -> axum::response::Html<String> {
    let index = escape_html(&request.index_symbol);
    let capital = request.total_capital.to_string();
    let common = [
        ("symbol", request.index_symbol.clone()),
        ("num_stocks", request.no_of_stocks.to_string()),
        ("total_capital", capital.clone()),
    ];

    let cards = [
        summary_card(
            "Investment amount",
            &format!("₹{}", format_amount(request.total_capital)),
            None,
        ),
        summary_card(
            "Number of stocks selected",
            &constructed.no_of_stocks.to_string(),
            None,
        ),
        summary_card(
            "Total invested",
            &format!("₹{}", format_amount(constructed.total_invested)),
            None,
        ),
        summary_card(
            "Uninvested cash",
            &format!("₹{}", format_amount(constructed.free_cash)),
            None,
        ),
    ]
    .concat();

    let mut header = String::from("<th>Sr No.</th>");
    for (column, label) in COLUMNS {
        header.push_str(&format!(
            "<th>{}{}</th>",
            label,
            sort_arrows(SELECTION_PATH, &common, column, sort)
        ));
    }
    header.push_str("<th>Date of Purchase</th>");

    let mut rows = String::new();
    for (position, holding) in constructed.portfolio.iter().enumerate() {
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            position + 1,
            escape_html(&holding.symbol),
            format_amount(holding.ltp),
            holding.quantity,
            format_amount(holding.invested_amount),
            format_amount(holding.one_year_return_pct),
            escape_html(&holding.date_of_purchase),
        ));
    }

    let body = format!(
        r#"<h3>Generated Portfolio for {index}</h3>
<div class="portfolio-cards">{cards}</div>
<form method="post" action="{SELECTION_PATH}" class="save-form" onsubmit="return confirm('Save this portfolio?');">
<input type="hidden" name="symbol" value="{index}" />
<input type="hidden" name="num_stocks" value="{count}" />
<input type="hidden" name="total_capital" value="{capital}" />
<input type="hidden" name="action" value="{SAVE_ACTION}" />
<button type="submit" class="btn-proceed">Save Portfolio</button>
</form>
<table class="scripts-table">
<thead><tr>{header}</tr></thead>
<tbody>
{rows}</tbody>
</table>"#,
        count = request.no_of_stocks,
        capital = escape_html(&capital),
    );
    layout(
        &format!("Generated Portfolio - {}", request.index_symbol),
        Nav::AddPortfolio,
        Some(&user.username),
        &body,
    )
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(SELECTION_PATH, get(show_get).post(show_post))
}
