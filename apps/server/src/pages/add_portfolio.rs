use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Extension, Form, Router,
};
use serde::Deserialize;
use stockfolio_core::constants::MIN_INVESTMENT_AMOUNT;
use stockfolio_core::indices::IndexServiceTrait;

use super::parse_amount;
use crate::{
    auth::CurrentUser,
    error::PageResult,
    main_lib::AppState,
    views::{escape_html, layout, redirect, Nav},
};

const AMOUNT_TOO_LOW: &str = "Investment amount should be at least ₹1,00,000";
const INDEX_REQUIRED: &str = "Please select an index.";

#[derive(Deserialize)]
struct AddPortfolioForm {
    investment_amount: Option<String>,
    index: Option<String>,
}

fn render(
    state: &AppState,
    user: &CurrentUser,
    message: Option<&str>,
    selected: Option<&str>,
) -> PageResult<Response> {
    let indices = state.index_service.list_indices()?;

    let mut options = String::from(r#"<option value="">Choose...</option>"#);
    for index in &indices {
        let symbol = escape_html(&index.symbol);
        let marker = if selected == Some(index.symbol.as_str()) {
            " selected"
        } else {
            ""
        };
        options.push_str(&format!(
            r#"<option value="{symbol}"{marker}>{symbol}</option>"#
        ));
    }
    let alert = message
        .map(|m| format!(r#"<div class="alert alert-danger">{}</div>"#, escape_html(m)))
        .unwrap_or_default();

    let body = format!(
        r#"<div class="form-card">
<h2>Add Portfolio</h2>
{alert}
<form method="post" action="/add-portfolio">
<label for="investment_amount">Investment Amount (₹, minimum 1,00,000)</label>
<input type="number" id="investment_amount" name="investment_amount" min="{min}" step="0.01" required />
<label for="index">Select Index</label>
<select name="index" id="index" required>{options}</select>
<button type="submit" class="btn-proceed">Proceed</button>
</form>
</div>"#,
        min = MIN_INVESTMENT_AMOUNT,
    );
    Ok(layout("Add Portfolio", Nav::AddPortfolio, Some(&user.username), &body).into_response())
}

async fn show_form(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> PageResult<Response> {
    render(&state, &user, None, None)
}

async fn submit(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<AddPortfolioForm>,
) -> PageResult<Response> {
    let amount = parse_amount(form.investment_amount.as_deref());
    let index = form.index.as_deref().map(str::trim).unwrap_or_default();

    if amount < MIN_INVESTMENT_AMOUNT {
        return render(&state, &user, Some(AMOUNT_TOO_LOW), Some(index));
    }
    if index.is_empty() {
        return render(&state, &user, Some(INDEX_REQUIRED), None);
    }

    state
        .sessions
        .update(&user.token, |session| {
            session.investment_amount = Some(amount)
        })
        .await;
    Ok(redirect(&format!(
        "/view-scripts?symbol={}",
        urlencoding::encode(index)
    )))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/add-portfolio", get(show_form).post(submit))
}
