use std::time::Duration;

use serde::Deserialize;

/// CORS configuration for browser clients playing back synthesized audio
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorsConfig {
    /// Allowed origins: `"*"`, a single origin, or a list of origins
    #[serde(default)]
    pub origins: AllowedOrigins,
    /// Preflight cache lifetime, e.g. `"10m"`
    #[serde(default)]
    pub max_age: Option<String>,
}

/// Either every origin or an explicit allow list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AllowedOrigins {
    #[default]
    Any,
    List(Vec<String>),
}

impl<'de> Deserialize<'de> for AllowedOrigins {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            One(String),
            Many(Vec<String>),
        }

        let origins = match Raw::deserialize(deserializer)? {
            Raw::One(origin) => vec![origin],
            Raw::Many(origins) => origins,
        };

        if origins.iter().any(|origin| origin == "*") {
            Ok(Self::Any)
        } else {
            Ok(Self::List(origins))
        }
    }
}

impl CorsConfig {
    /// Preflight max age as a `Duration`
    ///
    /// # Errors
    ///
    /// Returns an error if `max_age` is not a valid duration string
    pub fn max_age_duration(&self) -> anyhow::Result<Option<Duration>> {
        self.max_age
            .as_deref()
            .map(|value| crate::parse_duration("server.cors.max_age", value))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> CorsConfig {
        toml::from_str(raw).unwrap()
    }

    #[test]
    fn wildcard_anywhere_means_any() {
        assert_eq!(parse(r#"origins = "*""#).origins, AllowedOrigins::Any);
        assert_eq!(
            parse(r#"origins = ["https://a.example", "*"]"#).origins,
            AllowedOrigins::Any
        );
    }

    #[test]
    fn explicit_origins_are_kept_in_order() {
        let config = parse(r#"origins = ["https://a.example", "https://b.example"]"#);
        assert_eq!(
            config.origins,
            AllowedOrigins::List(vec!["https://a.example".into(), "https://b.example".into()])
        );
    }

    #[test]
    fn max_age_parses_duration_strings() {
        let config = parse(r#"max_age = "10m""#);
        assert_eq!(config.max_age_duration().unwrap(), Some(Duration::from_secs(600)));
        assert!(parse(r#"max_age = "soon""#).max_age_duration().is_err());
    }
}
