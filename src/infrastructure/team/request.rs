//! Bearer-authorized JSON API requests shared by team backends

use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::TeamError;
use crate::infrastructure::http::{content_type_essence, HttpClientTrait, HttpRequest};

const JSON_MEDIA_TYPE: &str = "application/json";

/// Make an authorized API request and decode its JSON body.
///
/// The response must declare `application/json`. Every failure is returned to
/// the caller as is.
pub async fn request_json<C, T>(
    client: &C,
    access_token: &str,
    url: &str,
    method: Method,
) -> Result<T, TeamError>
where
    C: HttpClientTrait + ?Sized,
    T: DeserializeOwned,
{
    let request = HttpRequest::new(method, url)
        .header("Authorization", format!("token {}", access_token))
        .header("Accept", JSON_MEDIA_TYPE);

    let response = client.send(request).await?;
    let status = response.status();

    if !status.is_success() {
        return Err(TeamError::status(url, status.as_u16()));
    }

    let content_type = response.content_type().unwrap_or_default().to_string();
    if content_type_essence(&content_type).as_deref() != Some(JSON_MEDIA_TYPE) {
        return Err(TeamError::unexpected_content_type(url, content_type));
    }

    let headers = response.headers().clone();
    let body = response.text().await?;

    debug!(
        url,
        status = status.as_u16(),
        headers = ?headers,
        body = %body,
        "API response"
    );

    serde_json::from_str(&body).map_err(|e| TeamError::decode(url, e.to_string()))
}
