use std::cmp::Ordering;

use chrono::NaiveDate;
use serde_json::Value;
use tracing::warn;

use crate::domain::entities::catalog::{ListEndpoint, PaginationMode, SortKind};
use crate::domain::entities::list_query::{FilterValue, ListQuery, SortDirection};
use crate::domain::entities::resource::{ResourcePage, Row};
use crate::usecase::ports::api::{ApiError, QueryParams};

pub fn build_params(endpoint: &ListEndpoint, query: &ListQuery) -> QueryParams {
    let mut params = QueryParams::new();

    let search = query.search_text().trim();
    if !search.is_empty() {
        params.push(("search".to_string(), search.to_string()));
    }

    for (name, value) in query.filters() {
        if value.is_all() {
            continue;
        }
        let value = value.as_param();
        if !value.is_empty() {
            params.push((name.clone(), value));
        }
    }

    if endpoint.pagination == PaginationMode::Server {
        params.push(("page".to_string(), query.page().to_string()));
        params.push((
            "per_page".to_string(),
            query.page_size().get().to_string(),
        ));
        if let Some(key) = &query.sort().key {
            params.push(("sort_by".to_string(), key.clone()));
            params.push((
                "sort_dir".to_string(),
                query.sort().direction.as_param().to_string(),
            ));
        }
    }

    params
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListEnvelope {
    pub rows: Vec<Row>,
    pub reported_total: Option<u64>,
}

fn meta_total(value: &Value) -> Option<u64> {
    match value.get("meta")?.get("total")? {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn rows_from(items: &[Value]) -> Vec<Row> {
    items.iter().cloned().filter_map(Row::from_value).collect()
}

/// Accepts `{ data: [..] }`, `{ data: { data: [..], meta: { total } } }`,
/// `{ data: [..], meta: { total } }` and a bare array.
pub fn parse_envelope(body: &Value) -> Result<ListEnvelope, ApiError> {
    if let Value::Array(items) = body {
        return Ok(ListEnvelope {
            rows: rows_from(items),
            reported_total: None,
        });
    }

    match body.get("data") {
        Some(Value::Array(items)) => Ok(ListEnvelope {
            rows: rows_from(items),
            reported_total: meta_total(body),
        }),
        Some(inner @ Value::Object(_)) => match inner.get("data") {
            Some(Value::Array(items)) => Ok(ListEnvelope {
                rows: rows_from(items),
                reported_total: meta_total(inner).or_else(|| meta_total(body)),
            }),
            _ => Err(ApiError::Decode(
                "expected an array under data.data".to_string(),
            )),
        },
        _ => Err(ApiError::Decode("expected an array under data".to_string())),
    }
}

/// Turns a fetched envelope into the page to display.
///
/// Server-paginated endpoints that omit `meta.total` fall back to local slicing.
pub fn interpret(endpoint: &ListEndpoint, query: &ListQuery, envelope: ListEnvelope) -> ResourcePage {
    let page_size = query.page_size().get() as usize;

    match (endpoint.pagination, envelope.reported_total) {
        (PaginationMode::Server, Some(total)) => {
            let mut rows = envelope.rows;
            if rows.len() > page_size {
                warn!(
                    path = endpoint.path,
                    received = rows.len(),
                    page_size,
                    "backend returned more rows than requested; truncating"
                );
                rows.truncate(page_size);
            }
            ResourcePage {
                rows,
                total_count: total,
                truncated: false,
            }
        }
        (PaginationMode::Server, None) => paginate_locally(endpoint, query, envelope.rows, None),
        (PaginationMode::Client, reported) => {
            paginate_locally(endpoint, query, envelope.rows, reported)
        }
    }
}

fn paginate_locally(
    endpoint: &ListEndpoint,
    query: &ListQuery,
    rows: Vec<Row>,
    reported_total: Option<u64>,
) -> ResourcePage {
    let received = rows.len() as u64;
    let truncated = reported_total.is_some_and(|total| total > received);
    if truncated {
        warn!(
            path = endpoint.path,
            received,
            reported = reported_total.unwrap_or_default(),
            "client-paginated fetch did not return the full set"
        );
    }

    let mut rows = if endpoint.local_filtering {
        filter_rows(endpoint, query, rows)
    } else {
        rows
    };
    sort_rows(endpoint, query, &mut rows);

    let total_count = rows.len() as u64;
    let page_size = query.page_size().get() as usize;
    let start = (query.page() as usize - 1).saturating_mul(page_size);
    let rows = rows.into_iter().skip(start).take(page_size).collect();

    ResourcePage {
        rows,
        total_count,
        truncated,
    }
}

pub fn filter_rows(endpoint: &ListEndpoint, query: &ListQuery, rows: Vec<Row>) -> Vec<Row> {
    let needle = query.search_text().trim().to_lowercase();
    rows.into_iter()
        .filter(|row| needle.is_empty() || matches_search(endpoint, row, &needle))
        .filter(|row| {
            query
                .filters()
                .iter()
                .all(|(name, value)| matches_filter(row, name, value))
        })
        .collect()
}

fn matches_search(endpoint: &ListEndpoint, row: &Row, needle: &str) -> bool {
    if endpoint.search_fields.is_empty() {
        return row
            .fields
            .values()
            .filter_map(Value::as_str)
            .any(|text| text.to_lowercase().contains(needle));
    }
    endpoint
        .search_fields
        .iter()
        .any(|field| row.text(field).to_lowercase().contains(needle))
}

fn matches_filter(row: &Row, name: &str, value: &FilterValue) -> bool {
    if value.is_all() {
        return true;
    }
    let actual = row.text(name);
    match value {
        FilterValue::Text(text) => actual
            .to_lowercase()
            .contains(&text.trim().to_lowercase()),
        FilterValue::Choice(choice) => actual.eq_ignore_ascii_case(choice),
        FilterValue::Date(date) => parse_date(&actual) == Some(*date),
    }
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    let prefix = text.trim().get(..10)?;
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

/// Stable: rows with equal keys keep their fetched order in both directions.
pub fn sort_rows(endpoint: &ListEndpoint, query: &ListQuery, rows: &mut [Row]) {
    let Some(key) = query.sort().key.as_deref() else {
        return;
    };
    let kind = endpoint.sort_kind(key);
    let direction = query.sort().direction;

    rows.sort_by(|a, b| {
        let ordering = compare_field(a, b, key, kind);
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

fn compare_field(a: &Row, b: &Row, key: &str, kind: SortKind) -> Ordering {
    match kind {
        SortKind::Text => a.text(key).cmp(&b.text(key)),
        SortKind::Number => a.number(key).total_cmp(&b.number(key)),
        SortKind::Date => parse_date(&a.text(key)).cmp(&parse_date(&b.text(key))),
    }
}
