//! In-process stand-in for the remote API.
//!
//! Every request is matched against a static route table by method and path
//! template. Handlers are stateless: nothing is stored, so updating or
//! deleting an unknown id still succeeds.

use crate::state::{
    MessageCreated, MessageDeleted, MessageUpdated, NewMessage, Notice, User,
};
use chrono::Utc;
use reqwest::header::{HeaderMap, AUTHORIZATION};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use url::Url;

#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    /// Path relative to the API root, e.g. `/messages/3`.
    pub path: String,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: StatusCode,
    pub body: Value,
}

impl Response {
    fn json<T: Serialize>(status: StatusCode, body: &T) -> Self {
        match serde_json::to_value(body) {
            Ok(body) => Response { status, body },
            Err(err) => Response {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: serde_json::json!({ "msg": err.to_string() }),
            },
        }
    }

    fn notice(status: StatusCode, msg: &str) -> Self {
        let notice = Notice {
            msg: msg.to_owned(),
        };
        Response::json(status, &notice)
    }
}

type Params<'a> = Vec<(&'static str, &'a str)>;
type Handler = fn(&Request, &Params) -> Response;

struct Route {
    method: Method,
    template: &'static str,
    auth: bool,
    handler: Handler,
}

fn routes() -> [Route; 4] {
    [
        Route {
            method: Method::GET,
            template: "/users",
            auth: false,
            handler: list_users,
        },
        Route {
            method: Method::POST,
            template: "/messages",
            auth: true,
            handler: create_message,
        },
        Route {
            method: Method::PUT,
            template: "/messages/:id",
            auth: true,
            handler: update_message,
        },
        Route {
            method: Method::DELETE,
            template: "/messages/:id",
            auth: true,
            handler: delete_message,
        },
    ]
}

/// Splits the path part of `path` into its segments, ignoring any query.
fn segments(path: &str) -> Option<Vec<String>> {
    let base = Url::parse("http://mock.invalid/").ok()?;
    let url = base.join(path).ok()?;
    let segments = url
        .path_segments()?
        .filter(|segment| !segment.is_empty())
        .map(str::to_owned)
        .collect();
    Some(segments)
}

fn matches<'a>(template: &'static str, segments: &'a [String]) -> Option<Params<'a>> {
    let parts: Vec<&'static str> = template.split('/').filter(|p| !p.is_empty()).collect();
    if parts.len() != segments.len() {
        return None;
    }
    let mut params = vec![];
    for (part, segment) in parts.into_iter().zip(segments) {
        if let Some(name) = part.strip_prefix(':') {
            params.push((name, segment.as_str()));
        } else if part != segment.as_str() {
            return None;
        }
    }
    Some(params)
}

fn authorized(request: &Request) -> bool {
    request
        .headers
        .get(AUTHORIZATION)
        .map(|value| !value.is_empty())
        .unwrap_or(false)
}

pub fn respond(request: &Request) -> Response {
    let Some(segments) = segments(&request.path) else {
        return Response::notice(StatusCode::NOT_FOUND, "Not Found");
    };
    for route in routes() {
        if route.method != request.method {
            continue;
        }
        let Some(params) = matches(route.template, &segments) else {
            continue;
        };
        if route.auth && !authorized(request) {
            return Response::notice(StatusCode::UNAUTHORIZED, "Unauthorized");
        }
        return (route.handler)(request, &params);
    }
    Response::notice(StatusCode::NOT_FOUND, "Not Found")
}

fn id_param(params: &Params) -> Result<u32, Response> {
    params
        .iter()
        .find(|(name, _)| *name == "id")
        .and_then(|(_, value)| value.parse().ok())
        .ok_or_else(|| Response::notice(StatusCode::BAD_REQUEST, "Invalid id"))
}

fn content(request: &Request) -> Result<String, Response> {
    request
        .body
        .clone()
        .and_then(|body| serde_json::from_value::<NewMessage>(body).ok())
        .map(|body| body.content)
        .ok_or_else(|| Response::notice(StatusCode::BAD_REQUEST, "Invalid body"))
}

fn list_users(_request: &Request, _params: &Params) -> Response {
    let users = vec![User {
        id: 1,
        name: "User Test".to_owned(),
    }];
    Response::json(StatusCode::OK, &users)
}

fn create_message(request: &Request, _params: &Params) -> Response {
    let content = match content(request) {
        Ok(content) => content,
        Err(response) => return response,
    };
    let created = MessageCreated {
        content,
        created_at: Utc::now(),
    };
    Response::json(StatusCode::CREATED, &created)
}

fn update_message(request: &Request, params: &Params) -> Response {
    let (id, content) = match id_param(params).and_then(|id| Ok((id, content(request)?))) {
        Ok(found) => found,
        Err(response) => return response,
    };
    let updated = MessageUpdated {
        id,
        content,
        updated_at: Utc::now(),
        msg: "Message updated successfully".to_owned(),
    };
    Response::json(StatusCode::OK, &updated)
}

fn delete_message(_request: &Request, params: &Params) -> Response {
    let id = match id_param(params) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let deleted = MessageDeleted {
        id,
        msg: "Message deleted successfully".to_owned(),
        deleted_at: Utc::now(),
    };
    Response::json(StatusCode::OK, &deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;
    use serde_json::json;

    fn request(method: Method, path: &str, token: Option<&'static str>, body: Option<Value>) -> Request {
        let mut headers = HeaderMap::new();
        if let Some(token) = token {
            headers.insert(AUTHORIZATION, HeaderValue::from_static(token));
        }
        Request {
            method,
            path: path.to_owned(),
            headers,
            body,
        }
    }

    #[test]
    fn test_users_without_auth() {
        let response = respond(&request(Method::GET, "/users", None, None));
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, json!([{ "id": 1, "name": "User Test" }]));
    }

    #[test]
    fn test_create() {
        let body = Some(json!({ "content": "hello" }));
        let response = respond(&request(Method::POST, "/messages", Some("token123"), body));
        assert_eq!(response.status, StatusCode::CREATED);
        assert_eq!(response.body["content"], "hello");
        let created: MessageCreated = serde_json::from_value(response.body).unwrap();
        assert!(created.created_at <= Utc::now());
    }

    #[test]
    fn test_unauthorized() {
        let unauthorized = Response::notice(StatusCode::UNAUTHORIZED, "Unauthorized");
        let body = Some(json!({ "content": "hello" }));

        let response = respond(&request(Method::POST, "/messages", None, body.clone()));
        assert_eq!(response, unauthorized);
        let response = respond(&request(Method::POST, "/messages", Some(""), body.clone()));
        assert_eq!(response, unauthorized);
        let response = respond(&request(Method::PUT, "/messages/1", None, body));
        assert_eq!(response, unauthorized);
        let response = respond(&request(Method::DELETE, "/messages/1", None, None));
        assert_eq!(response, unauthorized);
    }

    #[test]
    fn test_update_echoes_id() {
        let body = Some(json!({ "content": "hi" }));
        let response = respond(&request(Method::PUT, "/messages/1", Some("token123"), body));
        assert_eq!(response.status, StatusCode::OK);
        let updated: MessageUpdated = serde_json::from_value(response.body).unwrap();
        assert_eq!(updated.id, 1);
        assert_eq!(updated.content, "hi");
        assert_eq!(updated.msg, "Message updated successfully");
    }

    #[test]
    fn test_delete_unknown_id_succeeds() {
        let response = respond(&request(Method::DELETE, "/messages/999", Some("x"), None));
        assert_eq!(response.status, StatusCode::OK);
        let deleted: MessageDeleted = serde_json::from_value(response.body).unwrap();
        assert_eq!(deleted.id, 999);
    }

    #[test]
    fn test_query_is_ignored() {
        let response = respond(&request(Method::GET, "/users?page=2", None, None));
        assert_eq!(response.status, StatusCode::OK);
    }

    #[test]
    fn test_not_found() {
        let not_found = Response::notice(StatusCode::NOT_FOUND, "Not Found");
        assert_eq!(respond(&request(Method::GET, "/messages", Some("x"), None)), not_found);
        assert_eq!(respond(&request(Method::POST, "/users", Some("x"), None)), not_found);
        assert_eq!(respond(&request(Method::DELETE, "/messages", Some("x"), None)), not_found);
        assert_eq!(respond(&request(Method::GET, "/messages/1/extra", None, None)), not_found);
    }

    #[test]
    fn test_bad_requests() {
        let response = respond(&request(Method::DELETE, "/messages/abc", Some("x"), None));
        assert_eq!(response, Response::notice(StatusCode::BAD_REQUEST, "Invalid id"));

        let response = respond(&request(Method::POST, "/messages", Some("x"), None));
        assert_eq!(response, Response::notice(StatusCode::BAD_REQUEST, "Invalid body"));

        let body = Some(json!({ "content": 3 }));
        let response = respond(&request(Method::PUT, "/messages/2", Some("x"), body));
        assert_eq!(response, Response::notice(StatusCode::BAD_REQUEST, "Invalid body"));

        // Auth is checked before the id.
        let response = respond(&request(Method::DELETE, "/messages/abc", None, None));
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    }
}
