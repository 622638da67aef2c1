//! api::request
//!
//! Replayable request description.
//!
//! A `reqwest::RequestBuilder` is consumed on send, so the pipeline keeps the
//! method, path, and body instead and rebuilds the request for each attempt.

use reqwest::Method;
use serde_json::Value;

/// A backend request that can be dispatched more than once.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Path relative to the API base, starting with `/`.
    pub path: String,
    /// JSON body.
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Request with no body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::POST, path).with_body(body)
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::PUT, path).with_body(body)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn constructors_set_method_and_body() {
        assert_eq!(ApiRequest::get("/User").method, Method::GET);
        assert!(ApiRequest::delete("/Contact/Delete/1").body.is_none());

        let put = ApiRequest::put("/Project/Update/3", json!({"name": "x"}));
        assert_eq!(put.method, Method::PUT);
        assert_eq!(put.body, Some(json!({"name": "x"})));
    }
}
