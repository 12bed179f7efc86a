use crate::client::DEFAULT_BASE_URL;

pub const TOKEN_ENV: &str = "MOVIEDB_API_KEY";
/// Name used by earlier releases; still honored when `TOKEN_ENV` is unset.
pub const LEGACY_TOKEN_ENV: &str = "API_KEY";
pub const BASE_URL_ENV: &str = "MOVIEDB_BASE_URL";

/// Process configuration, read once at startup from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub token: String,
    pub base_url: String,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// A missing token is not an error: the empty bearer token is sent and
    /// the API answers with an auth failure.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).as_deref().and_then(non_empty).map(str::to_owned);

        let token = var(TOKEN_ENV)
            .or_else(|| {
                let legacy = var(LEGACY_TOKEN_ENV);
                if legacy.is_some() {
                    tracing::debug!("using token from {LEGACY_TOKEN_ENV}");
                }
                legacy
            })
            .unwrap_or_else(|| {
                tracing::warn!("no API token set; export {TOKEN_ENV}");
                String::new()
            });
        let base_url = var(BASE_URL_ENV).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Self { token, base_url }
    }
}

fn non_empty(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
