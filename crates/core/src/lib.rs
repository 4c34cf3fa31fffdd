pub mod context;
pub mod controller;
pub mod domain;
pub mod error;
pub mod generate;
pub mod normalize;
pub mod store;
pub mod view;

pub mod config {
    use anyhow::Context;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub supabase_url: Option<String>,
        pub supabase_anon_key: Option<String>,
        pub session_access_token: Option<String>,
        pub generation_base_url: Option<String>,
        pub generation_api_key: Option<String>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                supabase_url: std::env::var("SUPABASE_URL").ok(),
                supabase_anon_key: std::env::var("SUPABASE_ANON_KEY").ok(),
                session_access_token: std::env::var("SESSION_ACCESS_TOKEN").ok(),
                generation_base_url: std::env::var("GENERATION_API_BASE_URL").ok(),
                generation_api_key: std::env::var("GENERATION_API_KEY").ok(),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            })
        }

        pub fn require_supabase_url(&self) -> anyhow::Result<&str> {
            self.supabase_url
                .as_deref()
                .context("SUPABASE_URL is required")
        }

        pub fn require_supabase_anon_key(&self) -> anyhow::Result<&str> {
            self.supabase_anon_key
                .as_deref()
                .context("SUPABASE_ANON_KEY is required")
        }

        pub fn require_generation_base_url(&self) -> anyhow::Result<&str> {
            self.generation_base_url
                .as_deref()
                .context("GENERATION_API_BASE_URL is required")
        }

        pub fn require_generation_api_key(&self) -> anyhow::Result<&str> {
            self.generation_api_key
                .as_deref()
                .context("GENERATION_API_KEY is required")
        }

        /// Bearer token attached to store queries. Falls back to the anon key
        /// when no user session token is present.
        pub fn store_bearer_token(&self) -> anyhow::Result<&str> {
            match self.session_access_token.as_deref() {
                Some(token) if !token.trim().is_empty() => Ok(token),
                _ => self.require_supabase_anon_key(),
            }
        }
    }
}
