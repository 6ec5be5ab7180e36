use std::io::Read;

use anyhow::{anyhow, Result};
use axum::http::HeaderMap;
use flate2::read::GzDecoder;

use backend_domain::{BenfordRequest, RuntimeConfig};

pub fn authorize(config: &RuntimeConfig, headers: &HeaderMap) -> bool {
    if let Some(api_token) = &config.api_token {
        return extract_bearer(headers)
            .map(|v| v == *api_token)
            .unwrap_or(false);
    }
    true
}

pub fn parse_benford_request(headers: &HeaderMap, body: &[u8]) -> Result<BenfordRequest> {
    let content = maybe_gunzip(headers, body)?;
    if content.trim().is_empty() {
        return Err(anyhow!("request body is empty"));
    }
    let request: BenfordRequest = serde_json::from_str(&content)?;
    Ok(request)
}

fn maybe_gunzip(headers: &HeaderMap, body: &[u8]) -> Result<String> {
    if let Some(encoding) = headers.get("Content-Encoding") {
        if encoding.to_str().unwrap_or("").eq_ignore_ascii_case("gzip") {
            let mut decoder = GzDecoder::new(body);
            let mut out = String::new();
            decoder.read_to_string(&mut out)?;
            return Ok(out);
        }
    }
    Ok(String::from_utf8(body.to_vec())?)
}

fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("Authorization")?.to_str().ok()?.trim();
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use axum::http::HeaderValue;
    use flate2::write::GzEncoder;
    use flate2::Compression;

    use super::*;

    fn config_with_token(token: Option<&str>) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: "127.0.0.1:0".to_string(),
            api_token: token.map(str::to_string),
            dataset_path: "./records.json".to_string(),
            default_column: "total_value_kes".to_string(),
            min_sample_size: 30,
            deviation_threshold_pct: 15.0,
            sample_rows: 10,
            chart_width: 600,
            chart_height: 400,
            max_body_bytes: 1024,
            request_timeout_seconds: 5,
        }
    }

    #[test]
    fn bearer_token_is_checked_when_configured() {
        let mut headers = HeaderMap::new();
        assert!(authorize(&config_with_token(None), &headers));
        assert!(!authorize(&config_with_token(Some("secret")), &headers));

        headers.insert("Authorization", HeaderValue::from_static("Bearer secret"));
        assert!(authorize(&config_with_token(Some("secret")), &headers));

        headers.insert("Authorization", HeaderValue::from_static("Bearer other"));
        assert!(!authorize(&config_with_token(Some("secret")), &headers));

        headers.insert("Authorization", HeaderValue::from_static("Basic secret"));
        assert!(!authorize(&config_with_token(Some("secret")), &headers));
    }

    #[test]
    fn plain_json_body_is_parsed() {
        let body = br#"{"column": "amount", "records": [{"amount": 120}, {"amount": "45"}]}"#;
        let request = parse_benford_request(&HeaderMap::new(), body).expect("request");
        assert_eq!(request.column.as_deref(), Some("amount"));
        assert_eq!(request.records.len(), 2);
    }

    #[test]
    fn gzip_body_is_decoded() {
        let json = br#"{"records": [{"amount": 310.5}]}"#;
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(json).expect("compress");
        let body = encoder.finish().expect("finish");

        let mut headers = HeaderMap::new();
        headers.insert("Content-Encoding", HeaderValue::from_static("gzip"));
        let request = parse_benford_request(&headers, &body).expect("request");
        assert!(request.column.is_none());
        assert_eq!(request.records.len(), 1);
    }

    #[test]
    fn malformed_bodies_are_rejected() {
        assert!(parse_benford_request(&HeaderMap::new(), b"").is_err());
        assert!(parse_benford_request(&HeaderMap::new(), b"{\"records\": 3}").is_err());

        let mut headers = HeaderMap::new();
        headers.insert("Content-Encoding", HeaderValue::from_static("gzip"));
        assert!(parse_benford_request(&headers, b"not gzip").is_err());
    }
}
