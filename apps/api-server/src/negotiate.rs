//! Content negotiation: JSON by default, CSV when the client asks for it.

use actix_web::{HttpRequest, HttpResponse, http::StatusCode, http::header};
use serde_json::Value;

use market_core::resource::Representation;

use crate::middleware::error::{AppError, AppResult};

pub const CSV_MIME: &str = "text/csv";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Csv,
}

impl Format {
    /// Pick the response format from the `Accept` header.
    pub fn from_request(req: &HttpRequest) -> Self {
        req.headers()
            .get(header::ACCEPT)
            .and_then(|v| v.to_str().ok())
            .map(Self::from_accept)
            .unwrap_or(Format::Json)
    }

    /// CSV wins only when its quality beats every JSON-compatible range;
    /// on a tie the earlier entry wins.
    fn from_accept(accept: &str) -> Self {
        let mut csv: Option<(f32, usize)> = None;
        let mut json: Option<(f32, usize)> = None;

        for (position, entry) in accept.split(',').enumerate() {
            let mut parts = entry.split(';');
            let mime = parts.next().unwrap_or("").trim().to_ascii_lowercase();
            let quality = parts
                .filter_map(|p| p.trim().strip_prefix("q="))
                .find_map(|q| q.trim().parse::<f32>().ok())
                .unwrap_or(1.0);

            let slot = match mime.as_str() {
                CSV_MIME => &mut csv,
                "application/json" | "application/*" | "*/*" => &mut json,
                _ => continue,
            };
            if slot.is_none_or(|(best, _)| quality > best) {
                *slot = Some((quality, position));
            }
        }

        match (csv, json) {
            (Some((q, _)), _) if q <= 0.0 => Format::Json,
            (Some(_), None) => Format::Csv,
            (Some((cq, cp)), Some((jq, jp))) if cq > jq || (cq == jq && cp < jp) => Format::Csv,
            _ => Format::Json,
        }
    }
}

/// Render rows as CSV with one column per wire name, in `columns` order.
pub fn to_csv(columns: &[&str], rows: &[Representation]) -> AppResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(columns).map_err(csv_error)?;
    for row in rows {
        writer
            .write_record(columns.iter().map(|c| cell(row.get(*c))))
            .map_err(csv_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV flush failed: {e}")))?;
    String::from_utf8(bytes).map_err(|e| AppError::Internal(e.to_string()))
}

/// Build a CSV response.
pub fn csv_response(status: StatusCode, body: String) -> HttpResponse {
    HttpResponse::build(status)
        .content_type("text/csv; charset=utf-8")
        .body(body)
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn csv_error(e: csv::Error) -> AppError {
    AppError::Internal(format!("CSV encoding failed: {e}"))
}
