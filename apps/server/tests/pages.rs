use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    extract::State,
    http::{header, Method, Request, Response, StatusCode},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde_json::{json, Value};
use stockfolio_core::indices::{ClosePrice, Index, IndexRepositoryTrait, PriceRepositoryTrait};
use stockfolio_core::portfolio::{NewHolding, NewPortfolio, PortfolioRepositoryTrait};
use stockfolio_core::users::{NewUser, UserRepositoryTrait};
use stockfolio_server::{app_router, auth::hash_password, build_state, config::Config};
use stockfolio_storage_sqlite::{
    create_pool, spawn_writer, DbPool, IndexRepository, PortfolioRepository, PriceRepository,
    UserRepository, WriteHandle,
};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

const PASSWORD: &str = "correct horse battery";

const NIFTY_CSV: &str = "COMPANY NAME,Industry,SYMBOL,Series,ISIN Code\n\
    Infosys Ltd.,Information Technology,INFY,EQ,INE009A01021\n\
    Reliance Industries Ltd.,Oil Gas & Consumable Fuels,RELIANCE,EQ,INE002A01018\n\
    Tata Consultancy Services Ltd.,Information Technology,TCS,EQ,INE467B01029\n";

/// Stand-in for the construction and rebalance services and the CSV host.
struct FakeUpstream {
    base_url: String,
    construct_calls: Arc<AtomicUsize>,
}

async fn construct(State(calls): State<Arc<AtomicUsize>>, Json(_body): Json<Value>) -> Json<Value> {
    calls.fetch_add(1, Ordering::SeqCst);
    Json(json!({
        "success": true,
        "portfolio": [
            {"SYMBOL": "TCS", "LTP": 4100.5, "QUANTITY": 24, "INVESTED_AMOUNT": 98412.0,
             "ONE_YEAR_RETURN_PCT": 12.5, "DATE_OF_PURCHASE": "2025-01-06"},
            {"SYMBOL": "INFY", "LTP": 1890.0, "QUANTITY": 53, "INVESTED_AMOUNT": 100170.0,
             "ONE_YEAR_RETURN_PCT": 18.25, "DATE_OF_PURCHASE": "2025-01-06"}
        ],
        "total_invested": 198582.0,
        "free_cash": 1418.0,
        "no_of_stocks": 2
    }))
}

async fn rebalance_too_soon() -> (StatusCode, Json<Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"detail": "Rebalance allowed only every 30 days"})),
    )
}

async fn spawn_upstream() -> FakeUpstream {
    let construct_calls = Arc::new(AtomicUsize::new(0));
    let app = Router::new()
        .route("/scrape_index_csv", post(construct))
        .route("/rebalance_portfolio", post(rebalance_too_soon))
        .route("/ind_nifty50list.csv", get(|| async { NIFTY_CSV }))
        .route(
            "/no_symbol.csv",
            get(|| async { "Company Name,Ticker\nInfosys Ltd.,INFY\n" }),
        )
        .with_state(construct_calls.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    FakeUpstream {
        base_url: format!("http://{}", addr),
        construct_calls,
    }
}

struct TestApp {
    _dir: TempDir,
    router: Router,
    pool: Arc<DbPool>,
    writer: WriteHandle,
    upstream: FakeUpstream,
}

async fn build_test_app() -> TestApp {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test.db").to_string_lossy().to_string();
    let upstream = spawn_upstream().await;

    let config = Config {
        db_path: db_path.clone(),
        construction_api_url: format!("{}/scrape_index_csv", upstream.base_url),
        rebalance_api_url: format!("{}/rebalance_portfolio", upstream.base_url),
        ..Config::default()
    };
    let state = build_state(&config).await.unwrap();
    let router = app_router(state, &config);

    let pool = create_pool(&db_path).unwrap();
    let writer = spawn_writer(pool.clone());
    TestApp {
        _dir: dir,
        router,
        pool,
        writer,
        upstream,
    }
}

impl TestApp {
    async fn add_user(&self, username: &str) -> i32 {
        let password_hash = hash_password(PASSWORD).unwrap();
        UserRepository::new(self.pool.clone(), self.writer.clone())
            .create_user(NewUser {
                username: username.to_string(),
                password_hash,
            })
            .await
            .unwrap()
            .id
    }

    async fn add_index(&self, symbol: &str, path: &str) {
        IndexRepository::new(self.pool.clone(), self.writer.clone())
            .upsert_index(Index {
                symbol: symbol.to_string(),
                url: format!("{}{}", self.upstream.base_url, path),
            })
            .await
            .unwrap();
    }

    async fn add_portfolio(&self, user_id: i32, name: &str, positions: &[(&str, f64, f64)]) -> i32 {
        let holdings = positions
            .iter()
            .map(|(symbol, invested, current)| NewHolding {
                symbol: symbol.to_string(),
                company_name: None,
                date_of_purchase: NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
                buy_price: invested / 10.0,
                current_price: current / 10.0,
                quantity: 10,
                invested_amount: *invested,
                current_value: *current,
                pl_amount: current - invested,
                pl_percent: (current - invested) / invested * 100.0,
            })
            .collect();
        PortfolioRepository::new(self.pool.clone(), self.writer.clone())
            .create(NewPortfolio {
                portfolio_name: name.to_string(),
                description: Some(format!("{} description", name)),
                index_symbol: Some("NIFTY50".to_string()),
                created_by: user_id,
                total_invested: positions.iter().map(|(_, invested, _)| invested).sum(),
                holdings,
            })
            .await
            .unwrap()
            .portfolio_id
    }

    async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn post_form(&self, uri: &str, cookie: Option<&str>, body: &str) -> Response<Body> {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().method(Method::GET).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    /// Logs in and returns the `Cookie` header value for the new session.
    async fn login(&self, username: &str) -> String {
        let body = format!(
            "username={}&password={}",
            username,
            urlencoding::encode(PASSWORD)
        );
        let response = self.post_form("/login", None, &body).await;
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), "/dashboard");
        let set_cookie = response.headers()[header::SET_COOKIE]
            .to_str()
            .unwrap()
            .to_string();
        assert!(set_cookie.contains("HttpOnly"));
        assert!(set_cookie.contains("SameSite=Lax"));
        set_cookie.split(';').next().unwrap().to_string()
    }
}

fn location(response: &Response<Body>) -> String {
    response.headers()[header::LOCATION]
        .to_str()
        .unwrap()
        .to_string()
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn pages_redirect_to_login_without_a_session() {
    let app = build_test_app().await;
    for uri in ["/dashboard", "/view-portfolio", "/view-scripts?symbol=NIFTY50", "/"] {
        let response = app.get(uri, None).await;
        assert_eq!(response.status(), StatusCode::FOUND, "{uri}");
        assert_eq!(location(&response), "/login");
    }

    let forged = app.get("/dashboard", Some("sf_session=forged-token")).await;
    assert_eq!(forged.status(), StatusCode::FOUND);
    assert_eq!(location(&forged), "/login");

    let health = app.get("/healthz", None).await;
    assert_eq!(health.status(), StatusCode::OK);
    assert_eq!(body_text(health).await, "ok");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn login_failures_carry_a_message() {
    let app = build_test_app().await;
    app.add_user("asha").await;

    let blank = app.post_form("/login", None, "username=asha&password=").await;
    assert_eq!(
        location(&blank),
        "/login?error=Please%20enter%20both%20username%20and%20password."
    );

    let unknown = app
        .post_form("/login", None, "username=nobody&password=whatever")
        .await;
    assert_eq!(location(&unknown), "/login?error=Invalid%20username.");

    let wrong = app
        .post_form("/login", None, "username=asha&password=wrong")
        .await;
    assert_eq!(wrong.status(), StatusCode::FOUND);
    assert_eq!(location(&wrong), "/login?error=Invalid%20password.");
    assert!(wrong.headers().get(header::SET_COOKIE).is_none());

    let page = body_text(app.get("/login?error=Invalid%20password.", None).await).await;
    assert!(page.contains("Invalid password."));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn dashboard_shows_totals_and_net_returns() {
    let app = build_test_app().await;
    let user_id = app.add_user("asha").await;
    app.add_portfolio(
        user_id,
        "Core",
        &[("TCS", 100_000.0, 110_000.0), ("INFY", 50_000.0, 55_000.0)],
    )
    .await;
    let cookie = app.login("asha").await;

    let response = app.get("/dashboard", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("Welcome, <strong>asha</strong>!"));
    assert!(page.contains("₹150,000.00"));
    assert!(page.contains(r#"<p class="text-success-thick">₹165,000.00</p>"#));
    assert!(page.contains(r#"<p class="text-success-thick">₹15,000.00</p>"#));
    assert!(page.contains(r#"<p class="text-success-thick">10.00%</p>"#));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn portfolio_list_sorts_and_details_check_ownership() {
    let app = build_test_app().await;
    let asha = app.add_user("asha").await;
    let ravi = app.add_user("ravi").await;
    app.add_portfolio(asha, "Alpha", &[("TCS", 100_000.0, 90_000.0)])
        .await;
    app.add_portfolio(asha, "Beta", &[("INFY", 100_000.0, 120_000.0)])
        .await;
    let foreign = app
        .add_portfolio(ravi, "Gamma", &[("ITC", 10_000.0, 11_000.0)])
        .await;
    let cookie = app.login("asha").await;

    let page = body_text(
        app.get("/view-portfolio?sort=pl_percent&order=desc", Some(&cookie))
            .await,
    )
    .await;
    let beta = page.find("<td>Beta</td>").unwrap();
    let alpha = page.find("<td>Alpha</td>").unwrap();
    assert!(beta < alpha);
    assert!(!page.contains("Gamma"));
    assert!(page.contains(r#"class="text-danger-thick">-10,000.00"#));
    assert!(page.contains(r#"name="no_of_stocks" value="20""#));
    assert!(page.contains(
        r#"href="/view-portfolio?sort=pl_percent&amp;order=desc" class="sort-arrow active""#
    ));

    let injected = body_text(
        app.get(
            "/view-portfolio?sort=portfolio_name%3B%20DROP%20TABLE%20portfolios&order=asc",
            Some(&cookie),
        )
        .await,
    )
    .await;
    assert!(injected.find("<td>Alpha</td>").unwrap() < injected.find("<td>Beta</td>").unwrap());

    let denied = app
        .get(
            &format!("/view-portfolio-details?portfolio_id={}", foreign),
            Some(&cookie),
        )
        .await;
    assert_eq!(denied.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(denied).await, "Portfolio not found for this user.");

    let invalid = app
        .get("/view-portfolio-details?portfolio_id=abc", Some(&cookie))
        .await;
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(invalid).await, "Invalid portfolio.");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn details_page_lists_holdings_with_rebalance_count() {
    let app = build_test_app().await;
    let asha = app.add_user("asha").await;
    let id = app
        .add_portfolio(
            asha,
            "Core",
            &[("TCS", 100_000.0, 110_000.0), ("INFY", 50_000.0, 45_000.0)],
        )
        .await;
    let cookie = app.login("asha").await;

    let page = body_text(
        app.get(
            &format!("/view-portfolio-details?portfolio_id={}&sort=symbol&order=desc", id),
            Some(&cookie),
        )
        .await,
    )
    .await;
    assert!(page.contains("<h2>Core</h2>"));
    assert!(page.contains(r#"name="no_of_stocks" value="2""#));
    assert!(page.find("<td>TCS</td>").unwrap() < page.find("<td>INFY</td>").unwrap());
    assert!(page.contains(r#"class="text-danger-thick">-5,000.00"#));
    assert!(page.contains(&format!(
        "portfolio_id={}&amp;sort=symbol&amp;order=desc\" class=\"sort-arrow active\"",
        id
    )));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn deleting_a_portfolio_returns_to_an_empty_list() {
    let app = build_test_app().await;
    let asha = app.add_user("asha").await;
    let id = app
        .add_portfolio(asha, "Core", &[("TCS", 100_000.0, 110_000.0)])
        .await;
    let cookie = app.login("asha").await;

    let response = app
        .post_form(
            "/view-portfolio",
            Some(&cookie),
            &format!("action=delete_portfolio&portfolio_id={}", id),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/view-portfolio");

    let page = body_text(app.get("/view-portfolio", Some(&cookie)).await).await;
    assert!(page.contains("You have no portfolios to show."));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn add_portfolio_validates_and_remembers_amount() {
    let app = build_test_app().await;
    app.add_user("asha").await;
    app.add_index("NIFTY50", "/ind_nifty50list.csv").await;
    let cookie = app.login("asha").await;

    let form = body_text(app.get("/add-portfolio", Some(&cookie)).await).await;
    assert!(form.contains(r#"<option value="NIFTY50">NIFTY50</option>"#));

    let too_low = body_text(
        app.post_form(
            "/add-portfolio",
            Some(&cookie),
            "investment_amount=50000&index=NIFTY50",
        )
        .await,
    )
    .await;
    assert!(too_low.contains("Investment amount should be at least ₹1,00,000"));

    let no_index = body_text(
        app.post_form("/add-portfolio", Some(&cookie), "investment_amount=200000&index=")
            .await,
    )
    .await;
    assert!(no_index.contains("Please select an index."));

    let accepted = app
        .post_form(
            "/add-portfolio",
            Some(&cookie),
            "investment_amount=200000&index=NIFTY50",
        )
        .await;
    assert_eq!(accepted.status(), StatusCode::FOUND);
    assert_eq!(location(&accepted), "/view-scripts?symbol=NIFTY50");

    // The remembered amount stands in for a missing total_capital.
    let built = app
        .post_form(
            "/view-selected-stocks",
            Some(&cookie),
            "symbol=NIFTY50&num_stocks=10",
        )
        .await;
    assert_eq!(built.status(), StatusCode::OK);
    let page = body_text(built).await;
    assert!(page.contains("₹200,000.00"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn index_browser_joins_latest_prices() {
    let app = build_test_app().await;
    app.add_user("asha").await;
    app.add_index("NIFTY50", "/ind_nifty50list.csv").await;
    app.add_index("BROKEN", "/no_symbol.csv").await;
    PriceRepository::new(app.pool.clone(), app.writer.clone())
        .upsert_close_prices(vec![
            ClosePrice {
                symbol: "RELIANCE".to_string(),
                trade_date: NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
                close_price: 1215.2,
            },
            ClosePrice {
                symbol: "RELIANCE".to_string(),
                trade_date: NaiveDate::from_ymd_opt(2025, 1, 3).unwrap(),
                close_price: 2950.25,
            },
        ])
        .await
        .unwrap();
    let cookie = app.login("asha").await;

    let response = app.get("/view-scripts?symbol=NIFTY50", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("NIFTY50: 3"));
    assert!(page.contains(r#"max="3" placeholder="Suggested: 2""#));
    assert!(page.contains("<td>Reliance Industries Ltd.</td><td>RELIANCE</td><td>2,950.25</td>"));
    assert!(page.contains("<td>INFY</td><td>N/A</td>"));

    let broken = app.get("/view-scripts?symbol=BROKEN", Some(&cookie)).await;
    assert_eq!(broken.status(), StatusCode::BAD_GATEWAY);
    assert!(body_text(broken)
        .await
        .contains("CSV headers do not contain required 'Company Name' or 'Symbol' fields"));

    let unknown = app.get("/view-scripts?symbol=SENSEX", Some(&cookie)).await;
    assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);

    let missing = app.get("/view-scripts", Some(&cookie)).await;
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(missing).await, "No index specified.");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn identical_construction_requests_hit_the_session_cache() {
    let app = build_test_app().await;
    app.add_user("asha").await;
    let cookie = app.login("asha").await;
    let form = "symbol=NIFTY50&num_stocks=10&total_capital=200000";

    let first = app
        .post_form("/view-selected-stocks", Some(&cookie), form)
        .await;
    assert_eq!(first.status(), StatusCode::OK);
    let first = body_text(first).await;
    let second = body_text(
        app.post_form("/view-selected-stocks", Some(&cookie), form)
            .await,
    )
    .await;
    assert_eq!(app.upstream.construct_calls.load(Ordering::SeqCst), 1);
    assert_eq!(first, second);
    assert!(first.contains("₹198,582.00"));
    assert!(first.contains("₹1,418.00"));

    let sorted = body_text(
        app.get(
            "/view-selected-stocks?symbol=NIFTY50&num_stocks=10&total_capital=200000&sort=LTP&order=desc",
            Some(&cookie),
        )
        .await,
    )
    .await;
    assert_eq!(app.upstream.construct_calls.load(Ordering::SeqCst), 1);
    assert!(sorted.find("<td>TCS</td>").unwrap() < sorted.find("<td>INFY</td>").unwrap());

    app.post_form(
        "/view-selected-stocks",
        Some(&cookie),
        "symbol=NIFTY50&num_stocks=11&total_capital=200000",
    )
    .await;
    assert_eq!(app.upstream.construct_calls.load(Ordering::SeqCst), 2);

    let invalid = app
        .post_form("/view-selected-stocks", Some(&cookie), "symbol=NIFTY50&num_stocks=0")
        .await;
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(invalid).await, "Invalid input.");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn saving_a_construction_creates_an_owned_portfolio() {
    let app = build_test_app().await;
    app.add_user("asha").await;
    app.add_index("NIFTY50", "/ind_nifty50list.csv").await;
    let cookie = app.login("asha").await;

    let saved = app
        .post_form(
            "/view-selected-stocks",
            Some(&cookie),
            "symbol=NIFTY50&num_stocks=10&total_capital=200000&action=save_portfolio",
        )
        .await;
    assert_eq!(saved.status(), StatusCode::FOUND);
    assert_eq!(location(&saved), "/dashboard");

    let list = body_text(app.get("/view-portfolio", Some(&cookie)).await).await;
    assert!(list.contains("<td>NIFTY50 - "));
    assert!(list.contains("Auto-generated portfolio for index NIFTY50"));
    assert!(list.contains("<td>198,582.00</td>"));

    let dashboard = body_text(app.get("/dashboard", Some(&cookie)).await).await;
    assert!(dashboard.contains(r#"<p class="text-success-thick">0.00%</p>"#));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn saving_requires_a_known_index() {
    let app = build_test_app().await;
    app.add_user("asha").await;
    app.add_index("NIFTY50", "/ind_nifty50list.csv").await;
    let cookie = app.login("asha").await;

    let rejected = app
        .post_form(
            "/view-selected-stocks",
            Some(&cookie),
            "symbol=X%27%29%3Balert%281%29%2F%2F&num_stocks=10&total_capital=200000&action=save_portfolio",
        )
        .await;
    assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(rejected)
        .await
        .starts_with("Invalid or unknown index selected: X')"));
    assert_eq!(app.upstream.construct_calls.load(Ordering::SeqCst), 0);

    let list = body_text(app.get("/view-portfolio", Some(&cookie)).await).await;
    assert!(list.contains("You have no portfolios to show."));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn portfolio_names_stay_out_of_inline_scripts() {
    let app = build_test_app().await;
    let asha = app.add_user("asha").await;
    let id = app
        .add_portfolio(asha, "O'Brien \"Core\"", &[("TCS", 100_000.0, 110_000.0)])
        .await;
    let cookie = app.login("asha").await;

    let escaped = r#"data-name="O&#039;Brien &quot;Core&quot;""#;
    let list = body_text(app.get("/view-portfolio", Some(&cookie)).await).await;
    assert_eq!(list.matches(escaped).count(), 2);
    assert!(!list.contains("confirm('Rebalance portfolio O"));
    assert!(!list.contains("confirm('Delete portfolio O"));

    let details = body_text(
        app.get(
            &format!("/view-portfolio-details?portfolio_id={}", id),
            Some(&cookie),
        )
        .await,
    )
    .await;
    assert!(details.contains(escaped));
    assert!(details.contains("this.dataset.name"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn rebalance_rejection_is_shown_with_navigation() {
    let app = build_test_app().await;
    let asha = app.add_user("asha").await;
    let id = app
        .add_portfolio(
            asha,
            "Core",
            &[("TCS", 100_000.0, 110_000.0), ("INFY", 50_000.0, 45_000.0)],
        )
        .await;
    let cookie = app.login("asha").await;
    let details_uri = format!("/view-portfolio-details?portfolio_id={}", id);
    let before = body_text(app.get(&details_uri, Some(&cookie)).await).await;

    let response = app
        .post_form(
            "/rebalance",
            Some(&cookie),
            &format!("portfolio_id={}&no_of_stocks=2", id),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("Unable to Update Portfolio"));
    assert!(page.contains("Rebalance allowed only every 30 days"));
    assert!(page.contains(&format!(r#"href="{}""#, details_uri)));
    assert!(page.contains(r#"href="/view-portfolio""#));

    let after = body_text(app.get(&details_uri, Some(&cookie)).await).await;
    assert_eq!(
        between(&after, r#"<div class="summary-section">"#, "</div>\n<div class=\"as-of\">"),
        between(&before, r#"<div class="summary-section">"#, "</div>\n<div class=\"as-of\">")
    );
    assert_eq!(
        between(&after, "<tbody>", "</tbody>"),
        between(&before, "<tbody>", "</tbody>")
    );
    assert!(after.contains("<td>TCS</td>"));
    assert!(after.contains("<td>INFY</td>"));
    assert!(after.contains(r#"<p class="text-success-thick">₹155,000.00</p>"#));

    let invalid = app
        .post_form(
            "/rebalance",
            Some(&cookie),
            &format!("portfolio_id={}&no_of_stocks=0", id),
        )
        .await;
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(invalid).await, "Invalid rebalance request.");
}

/// The text between the first `start` and the next `end`.
fn between<'a>(page: &'a str, start: &str, end: &str) -> &'a str {
    let from = page.find(start).unwrap() + start.len();
    let len = page[from..].find(end).unwrap();
    &page[from..from + len]
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn logout_ends_the_session() {
    let app = build_test_app().await;
    app.add_user("asha").await;
    let cookie = app.login("asha").await;

    let response = app.get("/logout", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/login");
    assert!(response.headers()[header::SET_COOKIE]
        .to_str()
        .unwrap()
        .contains("Max-Age=0"));

    let after = app.get("/dashboard", Some(&cookie)).await;
    assert_eq!(after.status(), StatusCode::FOUND);
    assert_eq!(location(&after), "/login");
}
