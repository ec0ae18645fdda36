// Transport adapter
//
// Describes requests and responses as plain data and wraps a `Transport`
// into the four verbs the Grapevine API uses. Every status code is a
// successful round trip here; interpreting 4xx/5xx is the caller's job.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::auth::Credentials;
use crate::error::Error;
use crate::transport::Transport;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Self::GET,
            HttpMethod::Post => Self::POST,
            HttpMethod::Patch => Self::PATCH,
            HttpMethod::Delete => Self::DELETE,
        }
    }
}

/// A single request, handed to a [`Transport`] as-is.
///
/// `credentials` is `None` for calls made before authentication; the
/// transport then sends no `Authorization` header at all.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub credentials: Option<Arc<Credentials>>,
    pub body: Option<Value>,
}

/// Status code plus the decoded JSON body, for any status.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse<T = Value> {
    pub status: u16,
    pub data: T,
}

impl HttpResponse {
    /// The Grapevine API signals success with exactly `200`.
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Decode the body into a typed wire shape.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        T::deserialize(&self.data).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: self.data.to_string(),
        })
    }
}

/// Decode a raw response body without ever failing.
///
/// Empty bodies become `null`; anything that is not JSON is kept as a
/// string so error pages still reach the caller.
pub fn decode_body(raw: &str) -> Value {
    if raw.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()))
}

/// Verb-level wrapper around a [`Transport`].
///
/// Holds no mutable state; concurrent calls are independent.
#[derive(Debug, Clone)]
pub struct HttpClient<T> {
    transport: T,
}

impl<T: Transport> HttpClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn get(
        &self,
        url: Url,
        credentials: Option<Arc<Credentials>>,
    ) -> Result<HttpResponse, Error> {
        self.execute(HttpMethod::Get, url, credentials, None).await
    }

    pub async fn post<B: Serialize + Sync>(
        &self,
        url: Url,
        credentials: Option<Arc<Credentials>>,
        body: &B,
    ) -> Result<HttpResponse, Error> {
        let body = encode(body)?;
        self.execute(HttpMethod::Post, url, credentials, Some(body)).await
    }

    pub async fn patch<B: Serialize + Sync>(
        &self,
        url: Url,
        credentials: Option<Arc<Credentials>>,
        body: &B,
    ) -> Result<HttpResponse, Error> {
        let body = encode(body)?;
        self.execute(HttpMethod::Patch, url, credentials, Some(body)).await
    }

    pub async fn delete(
        &self,
        url: Url,
        credentials: Option<Arc<Credentials>>,
    ) -> Result<HttpResponse, Error> {
        self.execute(HttpMethod::Delete, url, credentials, None).await
    }

    /// DELETE carrying a JSON body (feed-group membership removal).
    pub async fn delete_with_body<B: Serialize + Sync>(
        &self,
        url: Url,
        credentials: Option<Arc<Credentials>>,
        body: &B,
    ) -> Result<HttpResponse, Error> {
        let body = encode(body)?;
        self.execute(HttpMethod::Delete, url, credentials, Some(body)).await
    }

    async fn execute(
        &self,
        method: HttpMethod,
        url: Url,
        credentials: Option<Arc<Credentials>>,
        body: Option<Value>,
    ) -> Result<HttpResponse, Error> {
        debug!("{method} {url}");

        let response = self
            .transport
            .send(HttpRequest {
                method,
                url,
                credentials,
                body,
            })
            .await?;

        debug!(status = response.status, "{method} completed");
        Ok(response)
    }
}

fn encode<B: Serialize>(body: &B) -> Result<Value, Error> {
    serde_json::to_value(body).map_err(Error::Serialization)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Numbered {
        id: i64,
    }

    #[test]
    fn method_displays_uppercase() {
        assert_eq!(HttpMethod::Get.to_string(), "GET");
        assert_eq!(HttpMethod::Patch.to_string(), "PATCH");
        assert_eq!(
            reqwest::Method::from(HttpMethod::Delete),
            reqwest::Method::DELETE
        );
    }

    #[test]
    fn decode_body_handles_empty_json_and_text() {
        assert_eq!(decode_body(""), Value::Null);
        assert_eq!(decode_body("  \n"), Value::Null);
        assert_eq!(decode_body(r#"{"a":1}"#), json!({ "a": 1 }));
        assert_eq!(
            decode_body("<html>Not Found</html>"),
            Value::String("<html>Not Found</html>".into())
        );
    }

    #[test]
    fn only_200_counts_as_ok() {
        let ok = HttpResponse {
            status: 200,
            data: Value::Null,
        };
        let created = HttpResponse {
            status: 201,
            data: Value::Null,
        };
        assert!(ok.is_ok());
        assert!(!created.is_ok());
    }

    #[test]
    fn json_decodes_typed_body() {
        let resp = HttpResponse {
            status: 200,
            data: json!({ "id": 7 }),
        };
        let numbered: Numbered = resp.json().unwrap();
        assert_eq!(numbered.id, 7);
    }

    #[test]
    fn json_reports_body_on_mismatch() {
        let resp = HttpResponse {
            status: 200,
            data: json!({ "name": "no id here" }),
        };
        match resp.json::<Numbered>() {
            Err(Error::Deserialization { body, .. }) => assert!(body.contains("no id here")),
            other => panic!("expected Deserialization error, got: {other:?}"),
        }
    }
}
