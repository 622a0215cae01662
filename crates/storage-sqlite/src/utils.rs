//! Helpers for working around SQLite limits.

/// Bind parameters per `IN (...)` query, safely under SQLITE_MAX_VARIABLE_NUMBER.
pub const SQLITE_MAX_PARAMS_CHUNK: usize = 500;

/// Splits `items` into slices small enough for a single `IN (...)` query.
pub fn chunk_for_sqlite<T>(items: &[T]) -> impl Iterator<Item = &[T]> {
    items.chunks(SQLITE_MAX_PARAMS_CHUNK)
}

/// `?, ?, ?` with one placeholder per item.
pub fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}
