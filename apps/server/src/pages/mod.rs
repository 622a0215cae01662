use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use serde::Deserialize;
use stockfolio_core::sorting::{SortColumn, SortSpec};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{auth, config::Config, main_lib::AppState};

mod add_portfolio;
mod dashboard;
mod portfolio_details;
mod portfolios;
mod rebalance;
mod scripts;
mod selected_stocks;

/// Raw `sort`/`order` query parameters.
#[derive(Deserialize, Default)]
pub(crate) struct SortParams {
    sort: Option<String>,
    order: Option<String>,
}

impl SortParams {
    pub(crate) fn spec<C: SortColumn>(&self) -> SortSpec<C> {
        SortSpec::from_params(self.sort.as_deref(), self.order.as_deref())
    }
}

/// Lenient integer field: surrounding whitespace is ignored, a decimal is
/// truncated, anything unparseable is 0.
pub(crate) fn parse_int(raw: Option<&str>) -> i32 {
    let Some(raw) = raw.map(str::trim) else {
        return 0;
    };
    raw.parse::<i32>()
        .ok()
        .or_else(|| {
            raw.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(|v| v.trunc().clamp(i32::MIN as f64, i32::MAX as f64) as i32)
        })
        .unwrap_or(0)
}

/// Lenient amount field; anything unparseable or non-finite is 0.
pub(crate) fn parse_amount(raw: Option<&str>) -> f64 {
    raw.map(str::trim)
        .and_then(|raw| raw.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

pub async fn healthz() -> &'static str {
    "ok"
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let protected = Router::new()
        .merge(dashboard::router())
        .merge(add_portfolio::router())
        .merge(portfolios::router())
        .merge(portfolio_details::router())
        .merge(scripts::router())
        .merge(selected_stocks::router())
        .merge(rebalance::router())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_session,
        ));

    let public = Router::new()
        .route("/healthz", get(healthz))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout));

    Router::new()
        .merge(public)
        .merge(protected)
        .nest_service("/static", ServeDir::new(&config.static_dir))
        .with_state(state)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_are_read_leniently() {
        assert_eq!(parse_int(Some(" 12 ")), 12);
        assert_eq!(parse_int(Some("20.9")), 20);
        assert_eq!(parse_int(Some("abc")), 0);
        assert_eq!(parse_int(Some("")), 0);
        assert_eq!(parse_int(None), 0);
        assert_eq!(parse_int(Some("-3")), -3);
    }

    #[test]
    fn amounts_are_read_leniently() {
        assert_eq!(parse_amount(Some("200000")), 200_000.0);
        assert_eq!(parse_amount(Some("150000.50")), 150_000.5);
        assert_eq!(parse_amount(Some("lots")), 0.0);
        assert_eq!(parse_amount(Some("inf")), 0.0);
        assert_eq!(parse_amount(None), 0.0);
    }
}
