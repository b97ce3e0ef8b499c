use std::{
    sync::{Arc, LazyLock, RwLock},
    time::Duration,
};

use ureq::{
    http::{self, HeaderMap, Uri},
    typestate::WithoutBody,
    Agent, Proxy, RequestBuilder,
};

/// Default global timeout applied to every request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the shared HTTP agent.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub user_agent: Option<String>,
    pub headers: Option<HeaderMap>,
    pub proxy: Option<Proxy>,
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: Some(concat!("pydex/", env!("CARGO_PKG_VERSION")).into()),
            proxy: None,
            headers: None,
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }
}

impl ClientConfig {
    /// Builds an [`Agent`] from this configuration.
    ///
    /// Non-2xx statuses are reported through the response, never as
    /// transport errors. Callers inspect `response.status()` themselves.
    pub fn build(&self) -> Agent {
        let mut config = ureq::Agent::config_builder()
            .proxy(self.proxy.clone())
            .timeout_global(self.timeout)
            .http_status_as_error(false);

        if let Some(user_agent) = &self.user_agent {
            config = config.user_agent(user_agent);
        }

        config.build().into()
    }
}

struct SharedClient {
    agent: Agent,
    config: ClientConfig,
}

static SHARED_CLIENT_STATE: LazyLock<Arc<RwLock<SharedClient>>> = LazyLock::new(|| {
    let config = ClientConfig::default();
    let agent = config.build();

    Arc::new(RwLock::new(SharedClient {
        agent,
        config,
    }))
});

/// Handle to the process-wide agent.
///
/// The registry surface is read-only, so only the read verbs are
/// exposed. Use [`SHARED_AGENT`] rather than constructing one.
#[derive(Clone, Default)]
pub struct SharedAgent;

impl SharedAgent {
    pub fn new() -> Self {
        Self
    }

    /// Create a GET request builder for the given URI.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use pydex_http::SHARED_AGENT;
    ///
    /// let response = SHARED_AGENT.get("https://pypi.org/pypi/numpy/json").call();
    /// ```
    pub fn get<T>(&self, uri: T) -> RequestBuilder<WithoutBody>
    where
        Uri: TryFrom<T>,
        <Uri as TryFrom<T>>::Error: Into<http::Error>,
    {
        let state = SHARED_CLIENT_STATE.read().unwrap();
        let req = state.agent.get(uri);
        apply_headers(req, &state.config.headers)
    }

    /// Create a HEAD request builder for the given URI.
    pub fn head<T>(&self, uri: T) -> RequestBuilder<WithoutBody>
    where
        Uri: TryFrom<T>,
        <Uri as TryFrom<T>>::Error: Into<http::Error>,
    {
        let state = SHARED_CLIENT_STATE.read().unwrap();
        let req = state.agent.head(uri);
        apply_headers(req, &state.config.headers)
    }
}

fn apply_headers<B>(mut req: RequestBuilder<B>, headers: &Option<HeaderMap>) -> RequestBuilder<B> {
    if let Some(headers) = headers {
        for (key, value) in headers.iter() {
            req = req.header(key, value);
        }
    }
    req
}

pub static SHARED_AGENT: LazyLock<SharedAgent> = LazyLock::new(SharedAgent::new);

/// Replaces the shared client configuration and rebuilds the agent.
///
/// The updater receives a copy of the current [`ClientConfig`]; once it
/// returns, the new agent atomically replaces the old one for every
/// subsequent request in the process.
///
/// # Examples
///
/// ```
/// use pydex_http::configure_http_client;
///
/// configure_http_client(|cfg| {
///     cfg.user_agent = Some("my-tool/1.0".to_string());
/// });
/// ```
pub fn configure_http_client<F>(updater: F)
where
    F: FnOnce(&mut ClientConfig),
{
    let mut state = SHARED_CLIENT_STATE.write().unwrap();
    let mut new_config = state.config.clone();
    updater(&mut new_config);
    let new_agent = new_config.build();
    state.agent = new_agent;
    state.config = new_config;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(
            config.user_agent,
            Some(format!("pydex/{}", env!("CARGO_PKG_VERSION")))
        );
        assert!(config.proxy.is_none());
        assert!(config.headers.is_none());
        assert_eq!(config.timeout, Some(DEFAULT_TIMEOUT));
    }

    #[test]
    fn test_client_config_build() {
        let config = ClientConfig::default();
        let agent = config.build();
        let _ = agent;
    }

    #[test]
    fn test_client_config_without_timeout() {
        let config = ClientConfig {
            timeout: None,
            ..ClientConfig::default()
        };
        let agent = config.build();
        let _ = agent;
    }

    #[test]
    fn test_shared_agent_get() {
        let req = SHARED_AGENT.get("https://pypi.org/simple/");
        let _ = req;
    }

    #[test]
    fn test_shared_agent_head() {
        let req = SHARED_AGENT.head("https://pypi.org/project/numpy");
        let _ = req;
    }

    #[test]
    fn test_configure_http_client() {
        configure_http_client(|cfg| {
            cfg.user_agent = Some("custom-agent/1.0".to_string());
        });

        let _ = SHARED_AGENT.get("https://pypi.org/simple/");
    }

    #[test]
    fn test_apply_headers() {
        let agent: ureq::Agent = ureq::Agent::config_builder().build().into();

        let req = agent.get("https://example.com");
        let _ = apply_headers(req, &None);

        let mut headers = ureq::http::HeaderMap::new();
        headers.insert(
            ureq::http::header::ACCEPT,
            ureq::http::HeaderValue::from_static("application/json"),
        );
        let req = agent.get("https://example.com");
        let _ = apply_headers(req, &Some(headers));
    }
}
