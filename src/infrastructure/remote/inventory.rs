//! Inventory driver implementations

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::domain::{InventoryDriver, InventoryError, Node};
use crate::infrastructure::http::{content_type_essence, HttpClientTrait, HttpRequest};

/// A fixed node list, e.g. from configuration
#[derive(Debug, Clone, Default)]
pub struct StaticInventoryDriver {
    nodes: Vec<Node>,
}

impl StaticInventoryDriver {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }
}

#[async_trait]
impl InventoryDriver for StaticInventoryDriver {
    async fn list_nodes(&self) -> Result<Vec<Node>, InventoryError> {
        Ok(self.nodes.clone())
    }
}

const DRIVER_NAME: &str = "http";

/// Reads the node list from an inventory service that answers `GET <url>`
/// with a JSON array of nodes:
///
/// ```json
/// [{"id": "web-1", "public_address": "203.0.113.7", "private_address": "10.0.0.7"}]
/// ```
pub struct HttpInventoryDriver<C: HttpClientTrait> {
    client: Arc<C>,
    url: String,
    token: Option<String>,
}

impl<C: HttpClientTrait> HttpInventoryDriver<C> {
    pub fn new(client: Arc<C>, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            token: None,
        }
    }

    /// Send `Authorization: Bearer <token>` with every request
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl<C: HttpClientTrait> std::fmt::Debug for HttpInventoryDriver<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpInventoryDriver")
            .field("url", &self.url)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .finish()
    }
}

#[async_trait]
impl<C: HttpClientTrait> InventoryDriver for HttpInventoryDriver<C> {
    async fn list_nodes(&self) -> Result<Vec<Node>, InventoryError> {
        let mut request = HttpRequest::get(&self.url).header("Accept", "application/json");
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let response = self.client.send(request).await?;
        let status = response.status();

        if !status.is_success() {
            return Err(InventoryError::driver(
                DRIVER_NAME,
                format!("{} returned status {}", self.url, status.as_u16()),
            ));
        }

        let content_type = response.content_type().unwrap_or_default().to_string();
        if content_type_essence(&content_type).as_deref() != Some("application/json") {
            return Err(InventoryError::driver(
                DRIVER_NAME,
                format!("{} returned unexpected content type {:?}", self.url, content_type),
            ));
        }

        let body = response.text().await?;
        let nodes: Vec<Node> = serde_json::from_str(&body).map_err(|e| {
            InventoryError::driver(DRIVER_NAME, format!("Invalid node list from {}: {}", self.url, e))
        })?;

        debug!(url = %self.url, count = nodes.len(), "Fetched inventory");
        Ok(nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransportError;
    use crate::infrastructure::http::mock::MockHttpClient;
    use crate::infrastructure::http::HttpClient;
    use reqwest::Method;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const URL: &str = "https://inventory.internal/nodes";

    #[tokio::test]
    async fn test_static_driver() {
        let driver = StaticInventoryDriver::new(vec![Node::new("a"), Node::new("b")]);

        let nodes = driver.list_nodes().await.unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[1].id, "b");
        assert!(StaticInventoryDriver::default().list_nodes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_http_driver_decodes_nodes() {
        let client = Arc::new(MockHttpClient::new().with_json(
            Method::GET,
            URL,
            json!([
                {"id": "web-1", "public_address": "203.0.113.7", "private_address": "10.0.0.7"},
                {"id": "db-1", "private_address": "fd00::5"}
            ]),
        ));
        let driver = HttpInventoryDriver::new(client.clone(), URL).with_token("s3cret");

        let nodes = driver.list_nodes().await.unwrap();

        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].preferred_address(), Some("203.0.113.7".parse().unwrap()));
        assert_eq!(nodes[1].public_address, None);
        assert_eq!(nodes[1].preferred_address(), Some("fd00::5".parse().unwrap()));

        let requests = client.requests_to(URL);
        assert_eq!(requests[0].header_value("authorization"), Some("Bearer s3cret"));
        assert!(!format!("{:?}", driver).contains("s3cret"));
    }

    #[tokio::test]
    async fn test_http_driver_rejects_error_status() {
        let client = Arc::new(MockHttpClient::new().with_response(
            Method::GET,
            URL,
            503,
            Some("application/json"),
            "[]",
        ));
        let driver = HttpInventoryDriver::new(client, URL);

        assert!(matches!(
            driver.list_nodes().await,
            Err(InventoryError::Driver { .. })
        ));
    }

    #[tokio::test]
    async fn test_http_driver_rejects_non_json() {
        let client = Arc::new(MockHttpClient::new().with_response(
            Method::GET,
            URL,
            200,
            Some("text/html"),
            "<html></html>",
        ));
        let driver = HttpInventoryDriver::new(client, URL);

        let error = driver.list_nodes().await.unwrap_err();
        assert!(error.to_string().contains("text/html"));
    }

    #[tokio::test]
    async fn test_http_driver_transport_error() {
        let client = Arc::new(MockHttpClient::new().with_error(Method::GET, URL, "timed out"));
        let driver = HttpInventoryDriver::new(client, URL);

        assert!(matches!(
            driver.list_nodes().await,
            Err(InventoryError::Transport(TransportError::Http { .. }))
        ));
    }

    #[tokio::test]
    async fn test_http_driver_against_server() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/nodes"))
            .and(header("accept", "application/json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{"id": "n1", "public_address": "192.0.2.1"}])),
            )
            .expect(2)
            .mount(&server)
            .await;

        let client = Arc::new(HttpClient::new().unwrap());
        let driver = HttpInventoryDriver::new(client, format!("{}/nodes", server.uri()));

        assert_eq!(driver.list_nodes().await.unwrap()[0].id, "n1");
        assert_eq!(driver.list_nodes().await.unwrap().len(), 1);
    }
}
