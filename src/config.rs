use leptos::logging::{log, warn};
use leptos::window;
use url::Url;

pub const DEFAULT_TOKEN: &str = "token123";

#[derive(Debug, Clone, PartialEq)]
pub enum Backend {
    /// Requests are answered in-process by [`crate::mock::respond`].
    Mock,
    /// Requests go over the network to this base url.
    Http(Url),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Value sent as `Authorization`. `None` omits the header.
    pub token: Option<String>,
    pub backend: Backend,
    /// Artificial delay applied to mock replies, in milliseconds.
    pub latency_ms: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            token: Some(DEFAULT_TOKEN.to_owned()),
            backend: Backend::Mock,
            latency_ms: 0,
        }
    }
}

impl Config {
    pub fn from_location() -> Self {
        match window().location().search() {
            Ok(search) => Self::from_query(&search),
            Err(err) => {
                warn!("Could not read location {err:?}, using defaults");
                Self::default()
            }
        }
    }

    /// Reads `token`, `backend` and `latency` from a query string such as
    /// `?latency=300&token=`.
    pub fn from_query(search: &str) -> Self {
        let mut config = Self::default();
        let url = match Url::parse(&format!("http://someUrl.com/{search}")) {
            Ok(url) => url,
            Err(err) => {
                warn!("Invalid query {search:?}: {err}");
                return config;
            }
        };
        for (key, value) in url.query_pairs() {
            match &key[..] {
                "token" if value.is_empty() => config.token = None,
                "token" => config.token = Some(value.to_string()),
                "backend" => match Url::parse(&value) {
                    Ok(url) => config.backend = Backend::Http(url),
                    Err(err) => warn!("Ignoring backend {value}: {err}"),
                },
                "latency" => match value.parse() {
                    Ok(ms) => config.latency_ms = ms,
                    Err(err) => warn!("Ignoring latency {value}: {err}"),
                },
                string => log!("Unexpected param {string}: {value}"),
            }
        }
        config
    }
}
