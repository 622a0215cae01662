//! HTML building blocks shared by the pages.

use std::fmt::Write as _;

use axum::{
    http::{header::LOCATION, StatusCode},
    response::{Html, IntoResponse, Response},
};
use chrono::{Duration, Utc};
use chrono_tz::Tz;
use stockfolio_core::sorting::{SortColumn, SortOrder, SortSpec};

/// Which navigation entry is highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    Dashboard,
    AddPortfolio,
    ViewPortfolio,
    None,
}

const NAV_LINKS: [(Nav, &str, &str); 3] = [
    (Nav::Dashboard, "/dashboard", "Dashboard"),
    (Nav::AddPortfolio, "/add-portfolio", "Add Portfolio"),
    (Nav::ViewPortfolio, "/view-portfolio", "View Portfolio"),
];

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Two decimals with comma thousands separators: `165000` renders as
/// `165,000.00`.
pub fn format_amount(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let is_zero = whole.chars().all(|c| c == '0') && fraction.chars().all(|c| c == '0');
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, fraction)
}

/// Yesterday in `tz`, formatted like `05 Jan 2025`.
pub fn as_of_date(tz: Tz) -> String {
    let yesterday = Utc::now().with_timezone(&tz) - Duration::days(1);
    yesterday.format("%d %b %Y").to_string()
}

/// `302 Found` to `location`.
pub fn redirect(location: &str) -> Response {
    (StatusCode::FOUND, [(LOCATION, location.to_string())]).into_response()
}

/// Ascending/descending links for one sortable column header. `common`
/// carries the page's other query parameters through the link.
pub fn sort_arrows<C: SortColumn>(
    base_path: &str,
    common: &[(&str, String)],
    column: C,
    current: SortSpec<C>,
) -> String {
    let link = |order: SortOrder, glyph: &str, title: &str| {
        let mut params: Vec<(&str, &str)> =
            common.iter().map(|(k, v)| (*k, v.as_str())).collect();
        params.push(("sort", column.as_str()));
        params.push(("order", order.as_str()));
        let query = serde_urlencoded::to_string(&params).unwrap_or_default();
        let class = if current.is_active(column, order) {
            "sort-arrow active"
        } else {
            "sort-arrow"
        };
        format!(
            r#"<a href="{}?{}" class="{}" title="{}">{}</a>"#,
            base_path,
            escape_html(&query),
            class,
            title,
            glyph
        )
    };
    format!(
        r#"<span class="sort-arrows">{}{}</span>"#,
        link(SortOrder::Asc, "&#9650;", "Sort ascending"),
        link(SortOrder::Desc, "&#9660;", "Sort descending")
    )
}

/// Wraps `body` in the shared page shell. `username` is `None` on pages
/// shown before login.
pub fn layout(title: &str, active: Nav, username: Option<&str>, body: &str) -> Html<String> {
    let mut page = String::with_capacity(body.len() + 1024);
    let _ = write!(
        page,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8" />
<meta name="viewport" content="width=device-width, initial-scale=1" />
<title>{}</title>
<link rel="stylesheet" href="/static/app.css" />
</head>
<body>
"#,
        escape_html(title)
    );

    if username.is_some() {
        page.push_str(r#"<nav class="navbar"><a class="brand" href="/dashboard">Portfolio System</a><ul>"#);
        for (nav, href, label) in NAV_LINKS {
            let class = if nav == active { "nav-link active" } else { "nav-link" };
            let _ = write!(page, r#"<li><a class="{}" href="{}">{}</a></li>"#, class, href, label);
        }
        page.push_str(
            r#"<li><a class="nav-link" href="/logout" onclick="return confirm('Are you sure you want to logout?')">Logout</a></li></ul></nav>"#,
        );
    }

    page.push_str("\n<main class=\"container\">\n");
    page.push_str(body);
    page.push_str("\n</main>\n</body>\n</html>\n");
    Html(page)
}

/// One labelled figure on a summary card.
pub fn summary_card(label: &str, value: &str, class: Option<&str>) -> String {
    match class {
        Some(class) => format!(
            r#"<div class="summary-card"><h5 class="{0}">{1}</h5><p class="{0}">{2}</p></div>"#,
            class, label, value
        ),
        None => format!(
            r#"<div class="summary-card"><h5>{}</h5><p>{}</p></div>"#,
            label, value
        ),
    }
}
