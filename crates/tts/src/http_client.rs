use std::{sync::Arc, time::Duration};

use axum::http;
use reqwest::{Client, ClientBuilder, redirect};

use crate::url_guard;

const MAX_REDIRECTS: usize = 5;

fn base_builder() -> ClientBuilder {
    let mut headers = http::HeaderMap::new();
    headers.insert(http::header::CONNECTION, http::HeaderValue::from_static("keep-alive"));

    Client::builder()
        .pool_idle_timeout(Some(Duration::from_secs(5)))
        .tcp_nodelay(true)
        .tcp_keepalive(Some(Duration::from_secs(60)))
        .default_headers(headers)
}

/// Client for the synthesis call; per-request timeouts are set by the caller
///
/// Redirects are not followed so the credential headers never reach
/// another origin.
pub fn synthesis_client() -> reqwest::Result<Client> {
    base_builder().redirect(redirect::Policy::none()).build()
}

/// Client for provider-returned audio URLs
///
/// With `block_private` set, host names resolve through
/// [`url_guard::PublicOnlyResolver`] and redirects to literal private
/// addresses are refused the same way the initial URL is.
pub fn audio_fetch_client(block_private: bool) -> reqwest::Result<Client> {
    let policy = redirect::Policy::custom(move |attempt| {
        if attempt.previous().len() >= MAX_REDIRECTS {
            attempt.error("too many redirects")
        } else if block_private && url_guard::is_literal_private(attempt.url()) {
            attempt.error("redirect to a private address")
        } else {
            attempt.follow()
        }
    });

    let builder = base_builder().redirect(policy);

    if block_private {
        builder.dns_resolver(Arc::new(url_guard::PublicOnlyResolver)).build()
    } else {
        builder.build()
    }
}
