use std::env;

/// Provider credential. Never printed: `Debug` shows a placeholder.
#[derive(Clone)]
pub(crate) struct ApiKey(String);

impl ApiKey {
    /// Reads `var`; unset or blank values count as missing.
    pub(crate) fn from_env(var: &str) -> Option<Self> {
        Self::parse(env::var(var).ok())
    }

    fn parse(raw: Option<String>) -> Option<Self> {
        raw.map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .map(Self)
    }

    #[cfg(test)]
    pub(crate) fn new(key: &str) -> Self {
        Self(key.to_string())
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}
