// ABOUTME: HTTP page fetching for the crawl engine.
// ABOUTME: Enforces a content-length cap, rejects non-200 responses and decodes bodies by charset.

use std::collections::HashMap;

use bytes::Bytes;

use crate::error::CrawlError;

/// Maximum accepted body size (10 MB).
pub const MAX_CONTENT_LENGTH: usize = 10 * 1024 * 1024;

/// Per-request options.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub headers: HashMap<String, String>,
}

/// A successful fetch.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub status: u16,
    pub url: String,
    /// URL after redirects.
    pub final_url: String,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl FetchResult {
    /// The body as text, decoded per the content-type charset or detection.
    pub fn text(&self) -> String {
        decode_body(&self.body, self.content_type.as_deref())
    }
}

/// Decodes body bytes using the charset of the content type, falling back
/// to detection.
pub fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    if let Some(encoding) = content_type
        .and_then(extract_charset)
        .and_then(|charset| encoding_rs::Encoding::for_label(charset.as_bytes()))
    {
        let (decoded, _, _) = encoding.decode(body);
        return decoded.into_owned();
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(body, true);
    let encoding = detector.guess(None, true);
    let (decoded, _, _) = encoding.decode(body);
    decoded.into_owned()
}

/// Charset parameter of a Content-Type header value.
fn extract_charset(content_type: &str) -> Option<String> {
    content_type
        .to_lowercase()
        .split(';')
        .find_map(|part| {
            part.trim()
                .strip_prefix("charset=")
                .map(|charset| charset.trim_matches('"').trim_matches('\'').to_string())
        })
}

/// Fetches `url`. Only http(s) URLs and 200 responses are accepted.
pub async fn fetch(
    client: &reqwest::Client,
    url: &str,
    opts: &FetchOptions,
) -> Result<FetchResult, CrawlError> {
    let parsed = url::Url::parse(url)
        .map_err(|e| CrawlError::invalid_url(url, Some(anyhow::anyhow!("invalid URL: {}", e))))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(CrawlError::invalid_url(
            url,
            Some(anyhow::anyhow!("scheme must be http or https")),
        ));
    }

    let mut request = client.get(parsed);
    for (key, value) in &opts.headers {
        request = request.header(key, value);
    }

    let response = request
        .send()
        .await
        .map_err(|e| CrawlError::fetch(url, Some(anyhow::anyhow!("request failed: {}", e))))?;

    if let Some(len) = response.content_length() {
        if len as usize > MAX_CONTENT_LENGTH {
            return Err(CrawlError::fetch(url, Some(anyhow::anyhow!("content too large"))));
        }
    }

    let status = response.status().as_u16();
    let final_url = response.url().to_string();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_lowercase());

    if status != 200 {
        return Err(CrawlError::status(url, status));
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| CrawlError::fetch(url, Some(anyhow::anyhow!("failed to read body: {}", e))))?;
    if body.len() > MAX_CONTENT_LENGTH {
        return Err(CrawlError::fetch(url, Some(anyhow::anyhow!("content too large"))));
    }

    Ok(FetchResult {
        status,
        url: url.to_string(),
        final_url,
        content_type,
        body,
    })
}
