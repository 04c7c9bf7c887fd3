//! HTTP data source backed by the dashboard API.
//!
//! ## Endpoints
//!
//! - `GET /` sets the `csrftoken` session cookie
//! - `GET /devices` returns the device list
//! - `POST /devices/{id}/ping` runs a single probe

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{CACHE_CONTROL, PRAGMA, REFERER};
use reqwest::{Client, Response, Url};
use tracing::{debug, warn};

use super::DeviceSource;
use crate::data::{Device, DeviceId, PingReply};
use crate::error::SourceError;

/// Header marking a request as programmatic rather than a page navigation.
const REQUESTED_WITH_HEADER: &str = "X-Requested-With";
const REQUESTED_WITH_VALUE: &str = "fetch";
/// Header carrying the anti-forgery token.
const CSRF_HEADER: &str = "X-CSRFToken";

/// Device source talking to the dashboard HTTP API.
///
/// Keeps a cookie jar so the anti-forgery token set by the server can be
/// echoed back on probe requests.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    jar: Arc<Jar>,
    base_url: Url,
    csrf_cookie: String,
    csrf_token: Option<String>,
    description: String,
}

impl HttpSource {
    /// Create a new builder for configuring the source.
    pub fn builder() -> HttpSourceBuilder {
        HttpSourceBuilder::default()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Load the dashboard index so the server can set the session cookie.
    pub async fn bootstrap_session(&self) -> Result<(), SourceError> {
        let response = self.client.get(self.base_url.clone()).send().await?;
        check_status(&response)?;
        if self.csrf_token().is_none() {
            warn!(
                cookie = %self.csrf_cookie,
                "Session bootstrap did not set an anti-forgery cookie"
            );
        }
        Ok(())
    }

    /// The anti-forgery token: an explicit override, or the session cookie.
    pub fn csrf_token(&self) -> Option<String> {
        if let Some(ref token) = self.csrf_token {
            return Some(token.clone());
        }
        let header = self.jar.cookies(&self.base_url)?;
        cookie_value(header.to_str().ok()?, &self.csrf_cookie)
    }

    fn devices_url(&self) -> Result<Url, SourceError> {
        self.join("devices")
    }

    fn ping_url(&self, id: DeviceId) -> Result<Url, SourceError> {
        self.join(&format!("devices/{}/ping", id))
    }

    fn join(&self, path: &str) -> Result<Url, SourceError> {
        self.base_url.join(path).map_err(|e| SourceError::InvalidUrl(e.to_string()))
    }
}

#[async_trait]
impl DeviceSource for HttpSource {
    async fn fetch_devices(&self) -> Result<Vec<Device>, SourceError> {
        let url = self.devices_url()?;
        debug!(%url, "Fetching device list");

        let response = self
            .client
            .get(url)
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .send()
            .await?;
        check_status(&response)?;

        response.json::<Vec<Device>>().await.map_err(|e| SourceError::Parse(e.to_string()))
    }

    async fn ping(&self, id: DeviceId) -> Result<PingReply, SourceError> {
        let url = self.ping_url(id)?;
        debug!(%url, "Requesting probe");

        let mut request = self
            .client
            .post(url)
            .header(REQUESTED_WITH_HEADER, REQUESTED_WITH_VALUE)
            .header(REFERER, self.base_url.as_str());
        match self.csrf_token() {
            Some(token) => request = request.header(CSRF_HEADER, token),
            None => warn!("No anti-forgery token available; probe will likely be rejected"),
        }

        let response = request.send().await?;
        check_status(&response)?;

        response.json::<PingReply>().await.map_err(|e| SourceError::Parse(e.to_string()))
    }

    fn description(&self) -> &str {
        &self.description
    }
}

fn check_status(response: &Response) -> Result<(), SourceError> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(SourceError::Http {
            status: status.as_u16(),
        })
    }
}

/// Extract a cookie value from a `Cookie` header string ("a=1; b=2").
pub fn cookie_value(header: &str, name: &str) -> Option<String> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key.trim() == name && !value.is_empty()).then(|| value.trim().to_string())
    })
}

/// Builder for [`HttpSource`].
#[derive(Debug, Default)]
pub struct HttpSourceBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    csrf_cookie: Option<String>,
    csrf_token: Option<String>,
}

impl HttpSourceBuilder {
    /// Set the dashboard base URL (e.g., "http://127.0.0.1:8000").
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Name of the cookie holding the anti-forgery token (default: "csrftoken").
    pub fn csrf_cookie(mut self, name: impl Into<String>) -> Self {
        self.csrf_cookie = Some(name.into());
        self
    }

    /// Use a fixed anti-forgery token instead of reading the cookie.
    pub fn csrf_token(mut self, token: impl Into<String>) -> Self {
        self.csrf_token = Some(token.into());
        self
    }

    /// Build the source.
    pub fn build(self) -> Result<HttpSource, SourceError> {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(10));

        let mut raw = self.base_url.unwrap_or_else(|| "http://127.0.0.1:8000".to_string());
        // Url::join replaces the last path segment unless the base ends in '/'
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let base_url =
            Url::parse(&raw).map_err(|e| SourceError::InvalidUrl(format!("{}: {}", raw, e)))?;

        let jar = Arc::new(Jar::default());
        let client = Client::builder().timeout(timeout).cookie_provider(jar.clone()).build()?;

        Ok(HttpSource {
            client,
            jar,
            description: format!("http: {}", base_url),
            base_url,
            csrf_cookie: self.csrf_cookie.unwrap_or_else(|| "csrftoken".to_string()),
            csrf_token: self.csrf_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    use super::*;

    fn response(status: &str, headers: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\n\
             content-type: application/json\r\n\
             content-length: {}\r\n\
             connection: close\r\n{}\r\n{}",
            status,
            body.len(),
            headers,
            body
        )
    }

    /// Serve the canned responses in order, one per connection, and return
    /// the request heads received (lowercased).
    async fn serve(responses: Vec<String>) -> (HttpSource, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let mut requests = Vec::new();
            for response in responses {
                let (mut stream, _) = listener.accept().await.unwrap();
                let mut head = Vec::new();
                let mut chunk = [0u8; 1024];
                while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                    let n = stream.read(&mut chunk).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    head.extend_from_slice(&chunk[..n]);
                }
                requests.push(String::from_utf8_lossy(&head).to_lowercase());
                stream.write_all(response.as_bytes()).await.unwrap();
                stream.shutdown().await.unwrap();
            }
            requests
        });
        let source = HttpSource::builder().base_url(format!("http://{}", addr)).build().unwrap();
        (source, server)
    }

    #[test]
    fn test_builder_defaults() {
        let source = HttpSource::builder().build().unwrap();
        assert_eq!(source.base_url().as_str(), "http://127.0.0.1:8000/");
        assert_eq!(source.csrf_cookie, "csrftoken");
        assert_eq!(source.description(), "http: http://127.0.0.1:8000/");
        assert!(source.csrf_token().is_none());
    }

    #[test]
    fn test_urls_keep_base_path() {
        let source = HttpSource::builder().base_url("http://noc.local/dashboard").build().unwrap();
        assert_eq!(source.devices_url().unwrap().as_str(), "http://noc.local/dashboard/devices");
        assert_eq!(
            source.ping_url(DeviceId(7)).unwrap().as_str(),
            "http://noc.local/dashboard/devices/7/ping"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = HttpSource::builder().base_url("not a url").build().unwrap_err();
        assert!(matches!(err, SourceError::InvalidUrl(_)));
    }

    #[test]
    fn test_csrf_token_from_cookie_jar() {
        let source = HttpSource::builder().base_url("http://noc.local").build().unwrap();
        source.jar.add_cookie_str("sessionid=xyz; Path=/", source.base_url());
        source.jar.add_cookie_str("csrftoken=abc123; Path=/", source.base_url());
        assert_eq!(source.csrf_token().as_deref(), Some("abc123"));
    }

    #[test]
    fn test_csrf_token_override_wins() {
        let source = HttpSource::builder()
            .base_url("http://noc.local")
            .csrf_token("fixed")
            .build()
            .unwrap();
        source.jar.add_cookie_str("csrftoken=abc123; Path=/", source.base_url());
        assert_eq!(source.csrf_token().as_deref(), Some("fixed"));
    }

    #[test]
    fn test_cookie_value() {
        assert_eq!(cookie_value("a=1; csrftoken=tok; b=2", "csrftoken").as_deref(), Some("tok"));
        assert_eq!(cookie_value("csrftoken=tok", "csrftoken").as_deref(), Some("tok"));
        assert_eq!(cookie_value("xcsrftoken=tok", "csrftoken"), None);
        assert_eq!(cookie_value("csrftoken=", "csrftoken"), None);
        assert_eq!(cookie_value("", "csrftoken"), None);
    }

    #[tokio::test]
    async fn test_ping_sends_marker_and_session_token() {
        let (source, server) = serve(vec![
            response("200 OK", "set-cookie: csrftoken=tok42; Path=/\r\n", "{}"),
            response("200 OK", "", r#"{"ok": true, "rtt_ms": 5}"#),
        ])
        .await;

        source.bootstrap_session().await.unwrap();
        assert_eq!(source.csrf_token().as_deref(), Some("tok42"));

        let reply = source.ping(DeviceId(7)).await.unwrap();
        assert_eq!(reply, PingReply { ok: true, rtt_ms: Some(5) });

        let requests = server.await.unwrap();
        assert!(requests[0].starts_with("get / "));
        let ping = &requests[1];
        assert!(ping.starts_with("post /devices/7/ping "));
        assert!(ping.contains("x-requested-with: fetch\r\n"));
        assert!(ping.contains("x-csrftoken: tok42\r\n"));
        assert!(ping.contains(&format!("referer: {}\r\n", source.base_url())));
    }

    #[tokio::test]
    async fn test_fetch_bypasses_caches() {
        let (source, server) = serve(vec![response("200 OK", "", "[]")]).await;

        let devices = source.fetch_devices().await.unwrap();
        assert!(devices.is_empty());

        let requests = server.await.unwrap();
        assert!(requests[0].starts_with("get /devices "));
        assert!(requests[0].contains("cache-control: no-cache\r\n"));
        assert!(requests[0].contains("pragma: no-cache\r\n"));
    }

    #[tokio::test]
    async fn test_error_status_is_http_error() {
        let (source, server) = serve(vec![
            response("500 Internal Server Error", "", "{}"),
            response("403 Forbidden", "", "{}"),
        ])
        .await;

        let err = source.fetch_devices().await.unwrap_err();
        assert!(matches!(err, SourceError::Http { status: 500 }));
        let err = source.ping(DeviceId(1)).await.unwrap_err();
        assert!(matches!(err, SourceError::Http { status: 403 }));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let (source, server) = serve(vec![
            response("200 OK", "", "<html>not json</html>"),
            response("200 OK", "", r#"[{"id": 1}]"#),
        ])
        .await;

        let err = source.fetch_devices().await.unwrap_err();
        assert!(matches!(err, SourceError::Parse(_)));
        let err = source.fetch_devices().await.unwrap_err();
        assert!(matches!(err, SourceError::Parse(_)));
        server.await.unwrap();
    }
}
