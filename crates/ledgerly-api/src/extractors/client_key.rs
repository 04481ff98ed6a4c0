//! `ClientKey` extractor: a tracking key for callers without a session.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::request::Parts;

/// The key anonymous trial usage is counted under.
///
/// A client-supplied fingerprint wins over network-derived addresses, so
/// one device keeps one counter across changing mobile IPs.
#[derive(Debug, Clone)]
pub struct ClientKey(pub String);

impl<S: Send + Sync> FromRequestParts<S> for ClientKey {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ClientKey(derive_client_key(&parts.headers)))
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn derive_client_key(headers: &HeaderMap) -> String {
    if let Some(fingerprint) = header_str(headers, "x-client-fingerprint") {
        return format!("fp_{fingerprint}");
    }
    if let Some(forwarded) = header_str(headers, "x-forwarded-for") {
        // First hop is the client; the rest are proxies.
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }
    if let Some(real_ip) = header_str(headers, "x-real-ip") {
        return real_ip.to_string();
    }
    if let Some(cf_ip) = header_str(headers, "cf-connecting-ip") {
        return cf_ip.to_string();
    }
    "unknown".to_string()
}
