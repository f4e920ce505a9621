/// Site identifier and API key issued by the affiliate program.
#[derive(Clone, PartialEq, Eq)]
pub struct AgodaCredentials {
    pub site_id: String,
    pub api_key: String,
}

impl std::fmt::Debug for AgodaCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgodaCredentials")
            .field("site_id", &self.site_id)
            .field("api_key", &"[redacted]")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `None` when either half of the credential pair is unset. The client
    /// refuses to start without it; config loading does not.
    pub credentials: Option<AgodaCredentials>,
    pub default_currency: String,
    pub default_language: String,
    pub default_adults: u32,
    pub default_children: u32,
    pub verbose: bool,
    pub log_level: String,
}

impl AppConfig {
    /// The tracing filter directive implied by `verbose` and `log_level`.
    #[must_use]
    pub fn effective_log_level(&self) -> &str {
        if self.verbose {
            "debug"
        } else {
            &self.log_level
        }
    }
}
