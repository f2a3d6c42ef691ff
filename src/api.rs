use crate::config::{Backend, Config};
use crate::mock;
use crate::state::{NewMessage, Notice};
use leptos::logging::{log, warn};
use leptos::window;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;
use wasm_bindgen::JsValue;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Request failed with {status}: {}", .msg.as_deref().unwrap_or("no details"))]
    Status {
        status: StatusCode,
        msg: Option<String>,
    },

    #[error("Json error {0}")]
    Json(#[from] serde_json::Error),

    #[error("Http error {0}")]
    Http(#[from] reqwest::Error),

    #[error("Url error {0}")]
    Url(#[from] url::ParseError),

    #[error("Invalid authorization token")]
    Token(#[from] reqwest::header::InvalidHeaderValue),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListUsers,
    CreateMessage { content: String },
    UpdateMessage { id: u32, content: String },
    DeleteMessage { id: u32 },
}

impl Call {
    pub fn method(&self) -> Method {
        match self {
            Call::ListUsers => Method::GET,
            Call::CreateMessage { .. } => Method::POST,
            Call::UpdateMessage { .. } => Method::PUT,
            Call::DeleteMessage { .. } => Method::DELETE,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Call::ListUsers => "/users".to_owned(),
            Call::CreateMessage { .. } => "/messages".to_owned(),
            Call::UpdateMessage { id, .. } | Call::DeleteMessage { id } => {
                format!("/messages/{id}")
            }
        }
    }

    pub fn body(&self) -> Option<NewMessage> {
        match self {
            Call::CreateMessage { content } | Call::UpdateMessage { content, .. } => {
                Some(NewMessage {
                    content: content.clone(),
                })
            }
            Call::ListUsers | Call::DeleteMessage { .. } => None,
        }
    }
}

#[derive(Clone)]
enum Transport {
    Mock { latency_ms: u32 },
    Http { base: Url, client: reqwest::Client },
}

#[derive(Clone)]
pub struct Client {
    token: Option<String>,
    transport: Transport,
}

impl Client {
    pub fn new(config: Config) -> Self {
        let transport = match config.backend {
            Backend::Mock => Transport::Mock {
                latency_ms: config.latency_ms,
            },
            Backend::Http(base) => Transport::Http {
                base,
                client: reqwest::Client::new(),
            },
        };
        Client {
            token: config.token,
            transport,
        }
    }

    fn request(&self, call: &Call) -> Result<mock::Request, Error> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &self.token {
            headers.insert(AUTHORIZATION, HeaderValue::from_str(token)?);
        }
        let body = call.body().map(serde_json::to_value).transpose()?;
        Ok(mock::Request {
            method: call.method(),
            path: call.path(),
            headers,
            body,
        })
    }

    /// Sends `call` and decodes a successful reply into `T`.
    pub async fn call<T: DeserializeOwned>(&self, call: &Call) -> Result<T, Error> {
        let request = self.request(call)?;
        log!("{} {}", request.method, request.path);
        let response = match &self.transport {
            Transport::Mock { latency_ms } => {
                pause(*latency_ms).await;
                mock::respond(&request)
            }
            Transport::Http { base, client } => send(client, base, request).await?,
        };
        log!("{} {} -> {}", call.method(), call.path(), response.status);
        decode(response)
    }
}

async fn send(
    client: &reqwest::Client,
    base: &Url,
    request: mock::Request,
) -> Result<mock::Response, Error> {
    let url = Url::parse(&format!(
        "{}{}",
        base.as_str().trim_end_matches('/'),
        request.path
    ))?;
    let mut builder = client.request(request.method, url).headers(request.headers);
    if let Some(body) = &request.body {
        builder = builder.json(body);
    }
    let response = builder.send().await?;
    let status = response.status();
    let text = response.text().await?;
    let body = read_body(status, &text)?;
    Ok(mock::Response { status, body })
}

/// Parses a network reply body. Error replies that are not JSON (a proxy's
/// html page, a plain text 404) become `Null` so the status still surfaces.
fn read_body(status: StatusCode, text: &str) -> Result<Value, Error> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    match serde_json::from_str(text) {
        Ok(body) => Ok(body),
        Err(err) if status.is_success() => Err(err.into()),
        Err(err) => {
            warn!("Unreadable {status} body: {err}");
            Ok(Value::Null)
        }
    }
}

fn decode<T: DeserializeOwned>(response: mock::Response) -> Result<T, Error> {
    if !response.status.is_success() {
        let msg = serde_json::from_value::<Notice>(response.body)
            .ok()
            .map(|notice| notice.msg);
        return Err(Error::Status {
            status: response.status,
            msg,
        });
    }
    Ok(serde_json::from_value(response.body)?)
}

/// Holds the reply back for `ms` milliseconds so the sending state is
/// visible. Zero resolves immediately without touching the browser.
async fn pause(ms: u32) {
    if ms == 0 {
        return;
    }
    let timeout = i32::try_from(ms).unwrap_or(i32::MAX);
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        let scheduled =
            window().set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, timeout);
        if let Err(err) = scheduled {
            warn!("Could not schedule mock latency {err:?}");
            if let Err(err) = resolve.call0(&JsValue::NULL) {
                warn!("Could not release mock latency {err:?}");
            }
        }
    });
    if let Err(err) = wasm_bindgen_futures::JsFuture::from(promise).await {
        warn!("Mock latency timer failed {err:?}");
    }
}
