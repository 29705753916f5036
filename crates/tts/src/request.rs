use axum::body::Body;
use serde::de::DeserializeOwned;

use crate::error::TtsError;

/// Extractor for JSON request bodies
///
/// Every rejection is reported as [`TtsError::InvalidInput`] so clients see
/// the same error body as for validation failures.
pub struct ExtractPayload<T>(pub T);

/// Body limit for synthesis requests (1 MiB)
const BODY_LIMIT_BYTES: usize = 1 << 20;

fn is_json(content_type: &http::HeaderValue) -> bool {
    content_type
        .to_str()
        .ok()
        .and_then(|value| value.split(';').next())
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("application/json"))
}

impl<S, T: DeserializeOwned> axum::extract::FromRequest<S> for ExtractPayload<T>
where
    S: Send + Sync,
{
    type Rejection = TtsError;

    async fn from_request(request: http::Request<Body>, _state: &S) -> Result<Self, Self::Rejection> {
        let (parts, body) = request.into_parts();

        if !parts.headers.get(http::header::CONTENT_TYPE).is_some_and(is_json) {
            return Err(TtsError::InvalidInput(
                "Unsupported Content-Type, expected: 'Content-Type: application/json'".to_string(),
            ));
        }

        let bytes = axum::body::to_bytes(body, BODY_LIMIT_BYTES).await.map_err(|err| {
            if std::error::Error::source(&err)
                .is_some_and(|source| source.is::<http_body_util::LengthLimitError>())
            {
                TtsError::InvalidInput(format!("Request body is too large, limit is {BODY_LIMIT_BYTES} bytes"))
            } else {
                TtsError::InvalidInput(format!("Failed to read request body: {err}"))
            }
        })?;

        match serde_json::from_slice::<T>(&bytes) {
            Ok(body) => Ok(Self(body)),
            Err(e) => {
                tracing::debug!("Rejecting malformed request body: {e}");
                Err(TtsError::InvalidInput(format!("Failed to parse request body: {e}")))
            }
        }
    }
}
