use serde::Deserialize;

/// Request shaping applied before the upstream payload is built
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SynthesisConfig {
    /// Replace an explicit `0` stability or clarity with the default value
    ///
    /// Off by default: a caller sending `0` gets `0`. Turn on to reproduce
    /// clients that relied on zero meaning "use the default".
    #[serde(default)]
    pub zero_means_default: bool,
}
