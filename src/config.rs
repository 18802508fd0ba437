//! Load-time configuration.

use std::env;

use crate::layout::Containment;

/// What the top-level loader does with a root pane that fails to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Return the error to the caller.
    #[default]
    Propagate,
    /// Log the error and leave the pane out. A failing pane is always
    /// dropped with its whole subtree. This reproduces the historical
    /// behaviour where broken markup silently yields a degraded UI.
    Degrade,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadOptions {
    pub error_policy: ErrorPolicy,
    /// Treat an `onClick` or `populate` name that resolves to nothing as a
    /// load error instead of loading the element without a callback.
    pub strict_callbacks: bool,
    /// Containment rule given to every paginated pane that gets loaded.
    pub containment: Containment,
}

impl LoadOptions {
    /// Defaults overlaid with `GRIDPANE_DEGRADE`, `GRIDPANE_STRICT_CALLBACKS`
    /// and `GRIDPANE_STRICT_CONTAINMENT` (each enabled by the value `1`).
    pub fn from_env() -> Self {
        let mut options = Self::default();
        if env_flag("GRIDPANE_DEGRADE") {
            options.error_policy = ErrorPolicy::Degrade;
        }
        options.strict_callbacks = env_flag("GRIDPANE_STRICT_CALLBACKS");
        if env_flag("GRIDPANE_STRICT_CONTAINMENT") {
            options.containment = Containment::Strict;
        }
        options
    }

    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    pub fn with_strict_callbacks(mut self, strict: bool) -> Self {
        self.strict_callbacks = strict;
        self
    }

    pub fn with_containment(mut self, containment: Containment) -> Self {
        self.containment = containment;
        self
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key).map(|value| value == "1").unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_strict_about_errors_and_lenient_about_callbacks() {
        let options = LoadOptions::default();
        assert_eq!(options.error_policy, ErrorPolicy::Propagate);
        assert!(!options.strict_callbacks);
        assert_eq!(options.containment, Containment::Legacy);
    }

    #[test]
    fn builders_override_fields() {
        let options = LoadOptions::default()
            .with_error_policy(ErrorPolicy::Degrade)
            .with_strict_callbacks(true)
            .with_containment(Containment::Strict);
        assert_eq!(options.error_policy, ErrorPolicy::Degrade);
        assert!(options.strict_callbacks);
        assert_eq!(options.containment, Containment::Strict);
    }
}
