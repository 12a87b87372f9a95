//! BizHub API adapter
//!
//! Implements the form and submission ports over HTTPS. Requests carry the API key as a
//! bearer token, are retried with exponential backoff on connect failures, timeouts, 5xx and
//! 429, and successful bodies are unwrapped from the `{"data": ...}` envelope when present.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Method, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::application::dto::{SubmissionReceipt, SubmitPayload};
use crate::config::ApiConfig;
use crate::domain::aggregates::FormDefinition;
use crate::domain::value_objects::FormId;
use crate::error::{FormsError, Result};
use crate::ports::outbound::{FormRepository, RepositoryError, SubmissionGateway};

const USER_AGENT: &str = concat!("bizhub-forms/", env!("CARGO_PKG_VERSION"));

/// Upper bound on any wait between attempts, computed or server-requested
const MAX_RETRY_WAIT: Duration = Duration::from_secs(60);

#[derive(Clone)]
pub struct HttpFormsApi {
    http: reqwest::Client,
    base_url: String,
    max_retries: u32,
    retry_delay: Duration,
}

impl HttpFormsApi {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        if let Some(key) = &config.api_key {
            let value = header::HeaderValue::from_str(&format!("Bearer {key}"))
                .map_err(|_| FormsError::Config("API key contains invalid header characters".into()))?;
            headers.insert(header::AUTHORIZATION, value);
        }
        headers.insert(header::CONTENT_TYPE, header::HeaderValue::from_static("application/json"));
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));
        headers.insert(header::USER_AGENT, header::HeaderValue::from_static(USER_AGENT));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()
            .map_err(|e| FormsError::Config(format!("failed to build HTTP client: {e}")))?;

        Url::parse(&config.base_url).map_err(|e| FormsError::Config(format!("invalid API URL: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_retries: config.max_retries,
            retry_delay: config.retry_delay(),
        })
    }

    async fn request<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> std::result::Result<T, RepositoryError> {
        let url = Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| RepositoryError::Transport(format!("invalid url: {e}")))?;

        let mut attempt = 0;
        loop {
            let mut request = self.http.request(method.clone(), url.clone());
            if let Some(body) = body {
                request = request.json(body);
            }

            let (error, wait) = match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    let retry_after = retry_after(&response);
                    match response.bytes().await {
                        Ok(bytes) if status.is_success() => {
                            debug!(%method, path, %status, "request succeeded");
                            return decode(status, &bytes);
                        }
                        Ok(bytes) => (api_error(status, &bytes), retry_after),
                        Err(e) => (RepositoryError::Transport(format!("reading response body: {e}")), None),
                    }
                }
                Err(e) if e.is_timeout() || e.is_connect() => (RepositoryError::Transport(e.to_string()), None),
                Err(e) => return Err(RepositoryError::Transport(e.to_string())),
            };

            if !error.is_retryable() || attempt >= self.max_retries {
                return Err(error);
            }

            let wait = wait.unwrap_or_else(|| backoff(self.retry_delay, attempt));
            warn!(%method, path, attempt, ?wait, error = %error, "retrying request");
            tokio::time::sleep(wait).await;
            attempt += 1;
        }
    }
}

/// `base * 2^attempt`, saturating and capped at [`MAX_RETRY_WAIT`]
fn backoff(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt)).min(MAX_RETRY_WAIT)
}

fn retry_after(response: &reqwest::Response) -> Option<Duration> {
    if response.status() != StatusCode::TOO_MANY_REQUESTS {
        return None;
    }
    response
        .headers()
        .get(header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(|secs| Duration::from_secs(secs).min(MAX_RETRY_WAIT))
}

fn decode<T: DeserializeOwned>(status: StatusCode, bytes: &[u8]) -> std::result::Result<T, RepositoryError> {
    if status == StatusCode::NO_CONTENT || bytes.is_empty() {
        return Ok(serde_json::from_str("null")?);
    }

    #[derive(Deserialize)]
    struct Envelope<T> {
        data: Option<T>,
    }

    if let Ok(Envelope { data: Some(data) }) = serde_json::from_slice::<Envelope<T>>(bytes) {
        return Ok(data);
    }
    Ok(serde_json::from_slice(bytes)?)
}

fn api_error(status: StatusCode, bytes: &[u8]) -> RepositoryError {
    #[derive(Deserialize)]
    struct ErrorResponse {
        error: ErrorBody,
    }

    #[derive(Deserialize)]
    struct ErrorBody {
        #[serde(default)]
        code: Option<String>,
        message: String,
    }

    let message = match serde_json::from_slice::<ErrorResponse>(bytes) {
        Ok(resp) => match resp.error.code {
            Some(code) => format!("{code}: {}", resp.error.message),
            None => resp.error.message,
        },
        Err(_) => String::from_utf8_lossy(bytes).to_string(),
    };

    match status {
        StatusCode::NOT_FOUND => RepositoryError::NotFound(message),
        StatusCode::CONFLICT => RepositoryError::Conflict(message),
        _ => RepositoryError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

#[async_trait]
impl FormRepository for HttpFormsApi {
    async fn fetch(&self, id: &FormId) -> std::result::Result<FormDefinition, RepositoryError> {
        self.request(Method::GET, &format!("/forms/{id}"), None::<&()>).await
    }

    async fn create(&self, form: &FormDefinition) -> std::result::Result<FormDefinition, RepositoryError> {
        self.request(Method::POST, "/forms", Some(form)).await
    }

    async fn update(&self, form: &FormDefinition) -> std::result::Result<FormDefinition, RepositoryError> {
        self.request(Method::PATCH, &format!("/forms/{}", form.id), Some(form))
            .await
    }
}

#[async_trait]
impl SubmissionGateway for HttpFormsApi {
    async fn submit(&self, payload: &SubmitPayload) -> std::result::Result<SubmissionReceipt, RepositoryError> {
        self.request(Method::POST, "/forms/submit", Some(payload)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Responses;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn api(server: &MockServer, max_retries: u32) -> HttpFormsApi {
        HttpFormsApi::new(&ApiConfig {
            base_url: server.uri(),
            api_key: Some("test-key".into()),
            timeout_secs: 5,
            max_retries,
            retry_delay_ms: 1,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_unwraps_envelope() {
        let server = MockServer::start().await;
        let form = FormDefinition::create("Contact");
        Mock::given(method("GET"))
            .and(path(format!("/forms/{}", form.id)))
            .and(header("authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": form })))
            .expect(1)
            .mount(&server)
            .await;

        let fetched = api(&server, 0).fetch(&form.id).await.unwrap();
        assert_eq!(fetched, form);
    }

    #[tokio::test]
    async fn test_not_found_maps_to_repository_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forms/form_missing"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(json!({"error": {"code": "not_found", "message": "no such form"}})),
            )
            .mount(&server)
            .await;

        let err = api(&server, 3).fetch(&"form_missing".into()).await.unwrap_err();
        assert_eq!(err, RepositoryError::NotFound("not_found: no such form".into()));
    }

    #[tokio::test]
    async fn test_retries_server_errors() {
        let server = MockServer::start().await;
        let form = FormDefinition::create("Contact");
        Mock::given(method("POST"))
            .and(path("/forms"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/forms"))
            .respond_with(ResponseTemplate::new(201).set_body_json(&form))
            .mount(&server)
            .await;

        let created = api(&server, 3).create(&form).await.unwrap();
        assert_eq!(created.id, form.id);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(3)
            .mount(&server)
            .await;

        let err = api(&server, 2)
            .update(&FormDefinition::create("Contact"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            RepositoryError::Api {
                status: 500,
                message: "boom".into()
            }
        );
    }

    #[tokio::test]
    async fn test_rate_limit_honours_retry_after() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/forms/submit"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/forms/submit"))
            .and(body_partial_json(json!({"formId": "form_1", "data": {"name": "Ada"}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"submissionId": "sub_1"}})))
            .mount(&server)
            .await;

        let payload = SubmitPayload {
            form_id: "form_1".into(),
            data: Responses::new().with("name", "Ada"),
            captcha_token: None,
            metadata: None,
        };
        let receipt = api(&server, 1).submit(&payload).await.unwrap();
        assert_eq!(receipt.submission_id, "sub_1");
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({"error": {"message": "bad form"}})))
            .expect(1)
            .mount(&server)
            .await;

        let err = api(&server, 3)
            .create(&FormDefinition::create("Contact"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            RepositoryError::Api {
                status: 422,
                message: "bad form".into()
            }
        );
    }

    #[test]
    fn test_backoff_doubles_then_caps() {
        let base = Duration::from_millis(500);
        assert_eq!(backoff(base, 0), Duration::from_millis(500));
        assert_eq!(backoff(base, 3), Duration::from_secs(4));
        assert_eq!(backoff(base, 40), MAX_RETRY_WAIT);
        assert_eq!(backoff(Duration::ZERO, 200), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_many_retries_do_not_overflow() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(41)
            .mount(&server)
            .await;

        let api = HttpFormsApi::new(&ApiConfig {
            base_url: server.uri(),
            api_key: None,
            timeout_secs: 5,
            max_retries: 40,
            retry_delay_ms: 0,
        })
        .unwrap();
        let err = api.fetch(&"form_1".into()).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Api { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_truncated_body_is_retried() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let form = FormDefinition::create("Contact");
        let body = serde_json::to_string(&form).unwrap();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let mut buf = [0u8; 4096];

            // First connection promises more body than it sends, then hangs up
            let (mut socket, _) = listener.accept().await.unwrap();
            let _ = socket.read(&mut buf).await.unwrap();
            let head = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\n\r\n",
                body.len() + 100
            );
            socket.write_all(head.as_bytes()).await.unwrap();
            socket.write_all(&body.as_bytes()[..10]).await.unwrap();
            drop(socket);

            let (mut socket, _) = listener.accept().await.unwrap();
            let _ = socket.read(&mut buf).await.unwrap();
            let response = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
        });

        let api = HttpFormsApi::new(&ApiConfig {
            base_url: format!("http://{addr}"),
            api_key: None,
            timeout_secs: 5,
            max_retries: 2,
            retry_delay_ms: 1,
        })
        .unwrap();
        let fetched = api.fetch(&form.id).await.unwrap();
        assert_eq!(fetched, form);
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        let config = ApiConfig {
            base_url: "not a url".into(),
            ..Default::default()
        };
        assert!(matches!(HttpFormsApi::new(&config), Err(FormsError::Config(_))));
    }
}
