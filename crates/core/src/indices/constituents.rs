//! Parsing of published index files: constituent lists and bhavcopy snapshots.

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use log::warn;

use super::indices_errors::IndexError;
use super::indices_model::{ClosePrice, IndexConstituent};
use crate::constants::{COMPANY_NAME_HEADER, SUGGESTED_STOCK_RATIO, SYMBOL_HEADER};

const BHAVCOPY_DATE_FORMATS: [&str; 4] = ["%d-%b-%Y", "%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y"];

/// Position of `name` in the header row, compared case-insensitively.
fn find_column(header: &StringRecord, name: &str) -> Option<usize> {
    header
        .iter()
        .position(|column| column.trim().eq_ignore_ascii_case(name))
}

/// Drops blanks that pad a field on the left, outside quotes. Published files
/// use `", "` as the separator, and a quote is only recognised as the first
/// byte of a field.
fn strip_field_padding(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_quotes = false;
    let mut at_field_start = true;
    for c in text.chars() {
        if in_quotes {
            if c == '"' {
                in_quotes = false;
            }
            out.push(c);
            continue;
        }
        match c {
            ' ' | '\t' if at_field_start => continue,
            ',' | '\n' | '\r' => at_field_start = true,
            '"' => {
                in_quotes = true;
                at_field_start = false;
            }
            _ => at_field_start = false,
        }
        out.push(c);
    }
    out
}

fn reader_for(text: &str) -> csv::Reader<&[u8]> {
    ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes())
}

/// Extracts company name / symbol pairs from a constituent CSV.
///
/// The first record is the header. Records whose width differs from the
/// header, or with a blank company name or symbol, are skipped.
pub fn parse_constituents(text: &str) -> Result<Vec<IndexConstituent>, IndexError> {
    let text = strip_field_padding(text);
    let mut reader = reader_for(&text);
    let mut records = reader.records();

    let header = match records.next() {
        Some(record) => record?,
        None => return Err(IndexError::MissingColumns),
    };
    let company_idx = find_column(&header, COMPANY_NAME_HEADER).ok_or(IndexError::MissingColumns)?;
    let symbol_idx = find_column(&header, SYMBOL_HEADER).ok_or(IndexError::MissingColumns)?;

    let mut constituents = Vec::new();
    for record in records {
        let record = record?;
        if record.len() != header.len() {
            continue;
        }
        let company_name = record.get(company_idx).unwrap_or_default();
        let symbol = record.get(symbol_idx).unwrap_or_default();
        if company_name.is_empty() || symbol.is_empty() {
            continue;
        }
        constituents.push(IndexConstituent {
            company_name: company_name.to_string(),
            symbol: symbol.to_string(),
        });
    }
    Ok(constituents)
}

/// ceil(40% of `total`), never below one.
pub fn suggested_stock_count(total: usize) -> usize {
    // 40% as an exact ratio so totals like 15 don't pick up float error.
    let numerator = (SUGGESTED_STOCK_RATIO * 10.0).round() as usize;
    let suggested = (total * numerator).div_ceil(10);
    suggested.max(1)
}

fn parse_trade_date(raw: &str) -> Option<NaiveDate> {
    BHAVCOPY_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

/// Reads a bhavcopy CSV into close prices.
///
/// Requires `SYMBOL` and `CLOSE_PRICE` columns. When a `SERIES` column is
/// present only `EQ` rows are kept. The trade date comes from a `DATE1` or
/// `TRADE_DATE` column, else from `fallback_date`. Rows whose width differs
/// from the header are skipped.
pub fn parse_bhavcopy(
    text: &str,
    fallback_date: Option<NaiveDate>,
) -> Result<Vec<ClosePrice>, IndexError> {
    let text = strip_field_padding(text);
    let mut reader = reader_for(&text);
    let mut records = reader.records();

    let header = match records.next() {
        Some(record) => record?,
        None => return Err(IndexError::Csv("bhavcopy file is empty".to_string())),
    };
    let (symbol_idx, close_idx) = match (
        find_column(&header, "SYMBOL"),
        find_column(&header, "CLOSE_PRICE"),
    ) {
        (Some(symbol), Some(close)) => (symbol, close),
        _ => {
            return Err(IndexError::Csv(
                "bhavcopy lacks SYMBOL or CLOSE_PRICE column".to_string(),
            ))
        }
    };
    let series_idx = find_column(&header, "SERIES");
    let date_idx = find_column(&header, "DATE1").or_else(|| find_column(&header, "TRADE_DATE"));

    let mut prices = Vec::new();
    for (line, record) in records.enumerate() {
        let record = record?;
        if record.len() != header.len() {
            warn!(
                "Skipping bhavcopy row {}: {} fields, header has {}",
                line + 2,
                record.len(),
                header.len()
            );
            continue;
        }
        if let Some(idx) = series_idx {
            if !record.get(idx).unwrap_or_default().eq_ignore_ascii_case("EQ") {
                continue;
            }
        }
        let symbol = record.get(symbol_idx).unwrap_or_default();
        if symbol.is_empty() {
            continue;
        }
        let raw_close = record.get(close_idx).unwrap_or_default().replace(',', "");
        let Ok(close_price) = raw_close.parse::<f64>() else {
            warn!("Skipping bhavcopy row {} for {}: bad close '{}'", line + 2, symbol, raw_close);
            continue;
        };
        let trade_date = date_idx
            .and_then(|idx| record.get(idx))
            .and_then(parse_trade_date)
            .or(fallback_date)
            .ok_or_else(|| {
                IndexError::Csv(format!("no trade date for {} on row {}", symbol, line + 2))
            })?;
        prices.push(ClosePrice {
            symbol: symbol.to_string(),
            trade_date,
            close_price,
        });
    }
    Ok(prices)
}
