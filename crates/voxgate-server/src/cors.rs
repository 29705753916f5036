use http::{Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};
use voxgate_config::{AllowedOrigins, CorsConfig};

/// Build a Tower CORS layer from configuration
///
/// Methods and headers are fixed to what the voice UI uses. `Content-Length`
/// is exposed so players can size the audio buffer.
pub fn cors_layer(config: &CorsConfig) -> anyhow::Result<CorsLayer> {
    let mut layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .expose_headers([header::CONTENT_LENGTH, header::CONTENT_TYPE]);

    layer = match &config.origins {
        AllowedOrigins::Any => layer.allow_origin(AllowOrigin::any()),
        AllowedOrigins::List(origins) => {
            let origins: Vec<_> = origins
                .iter()
                .filter_map(|o| match o.parse() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!("Ignoring invalid CORS origin '{o}'");
                        None
                    }
                })
                .collect();
            layer.allow_origin(origins)
        }
    };

    if let Some(duration) = config.max_age_duration()? {
        layer = layer.max_age(duration);
    }

    Ok(layer)
}
