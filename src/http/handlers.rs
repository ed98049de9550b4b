//! Request handlers for the service endpoints.

use std::collections::HashMap;
use std::num::{IntErrorKind, ParseIntError};

use axum::extract::Query;
use axum::Json;
use serde_json::{json, Number, Value};

use crate::compute::fibonacci::{fibonacci, MAX_N};
use crate::http::error::ApiError;

/// GET /fibonacci?n=<int>
///
/// Validates `n`, computes the nth Fibonacci number, and returns it as a
/// JSON integer. Values past n=186 exceed u128, so the result is emitted
/// with arbitrary precision rather than truncated.
pub async fn fibonacci_handler(
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    let raw = params.get("n").ok_or(ApiError::MissingParameter)?;
    let n = parse_n(raw)?;

    let result = fibonacci(n);

    Ok(Json(json!({
        "n": n,
        "fibonacci": Number::from_string_unchecked(result.to_string()),
    })))
}

/// Parse and range-check the `n` query parameter.
///
/// Values that overflow i64 are still integers, so they map to the range
/// errors rather than the parse error.
fn parse_n(raw: &str) -> Result<u32, ApiError> {
    let n: i64 = raw.parse().map_err(|err: ParseIntError| match err.kind() {
        IntErrorKind::PosOverflow => ApiError::AboveMaximum(MAX_N),
        IntErrorKind::NegOverflow => ApiError::Negative,
        _ => ApiError::NotAnInteger,
    })?;

    if n < 0 {
        return Err(ApiError::Negative);
    }
    if n > i64::from(MAX_N) {
        return Err(ApiError::AboveMaximum(MAX_N));
    }

    Ok(n as u32)
}

/// GET /health
///
/// Liveness probe. Always healthy while the process is serving; never
/// rate limited.
pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_bounds() {
        assert_eq!(parse_n("0"), Ok(0));
        assert_eq!(parse_n("10"), Ok(10));
        assert_eq!(parse_n("1000"), Ok(1000));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_n("abc"), Err(ApiError::NotAnInteger));
        assert_eq!(parse_n("3.5"), Err(ApiError::NotAnInteger));
        assert_eq!(parse_n(""), Err(ApiError::NotAnInteger));
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        assert_eq!(parse_n("-1"), Err(ApiError::Negative));
        assert_eq!(parse_n("1001"), Err(ApiError::AboveMaximum(MAX_N)));
    }

    #[test]
    fn test_parse_maps_overflow_to_range_errors() {
        // Larger than i64 but still an integer.
        assert_eq!(
            parse_n("99999999999999999999"),
            Err(ApiError::AboveMaximum(MAX_N))
        );
        assert_eq!(parse_n("-99999999999999999999"), Err(ApiError::Negative));
    }

    #[tokio::test]
    async fn test_handler_computes_fibonacci_of_10() {
        let mut params = HashMap::new();
        params.insert("n".to_string(), "10".to_string());

        let Json(body) = fibonacci_handler(Query(params)).await.unwrap();
        assert_eq!(body["n"].as_u64(), Some(10));
        assert_eq!(body["fibonacci"].as_u64(), Some(55));
    }

    #[tokio::test]
    async fn test_handler_rejects_missing_parameter() {
        let result = fibonacci_handler(Query(HashMap::new())).await;
        assert_eq!(result.unwrap_err(), ApiError::MissingParameter);
    }

    #[tokio::test]
    async fn test_health_reports_healthy() {
        let Json(body) = health_handler().await;
        assert_eq!(body["status"], "healthy");
    }
}
