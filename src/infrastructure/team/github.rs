//! GitHub organization membership backend

use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use tracing::{debug, info, info_span, warn, Instrument, Span};

use super::request::request_json;
use crate::domain::{BackendId, CallbackRequest, Identity, Team, TeamError};
use crate::infrastructure::http::{content_type_essence, HttpClientTrait, HttpRequest};

/// Backend tag carried by identities minted by [`GitHubOrganization`]
pub const GITHUB_ORGANIZATION_BACKEND: &str = "github-organization";

const OAUTH_SCOPE: &str = "read:org,admin:public_key";
const FORM_MEDIA_TYPE: &str = "application/x-www-form-urlencoded";
const JSON_MEDIA_TYPE: &str = "application/json";

/// OAuth and API endpoints of a GitHub installation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GitHubEndpoints {
    pub authorize_url: String,
    pub access_token_url: String,
    pub user_url: String,
    pub orgs_list_url: String,
}

impl Default for GitHubEndpoints {
    fn default() -> Self {
        Self {
            authorize_url: "https://github.com/login/oauth/authorize".to_string(),
            access_token_url: "https://github.com/login/oauth/access_token".to_string(),
            user_url: "https://api.github.com/user".to_string(),
            orgs_list_url: "https://api.github.com/user/orgs".to_string(),
        }
    }
}

impl GitHubEndpoints {
    /// Endpoints of a GitHub Enterprise Server at `base_url`
    pub fn enterprise(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/');

        Self {
            authorize_url: format!("{}/login/oauth/authorize", base_url),
            access_token_url: format!("{}/login/oauth/access_token", base_url),
            user_url: format!("{}/api/v3/user", base_url),
            orgs_list_url: format!("{}/api/v3/user/orgs", base_url),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitHubUser {
    login: String,
}

#[derive(Debug, Deserialize)]
struct Membership {
    login: String,
}

/// Membership listing as decoded at the API boundary
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MembershipResponse {
    Failure { error: serde_json::Value },
    Memberships(Vec<Membership>),
}

/// Authenticates GitHub users and authorizes members of one organization
pub struct GitHubOrganization<C: HttpClientTrait> {
    client: C,
    client_id: String,
    client_secret: String,
    org_login: String,
    endpoints: GitHubEndpoints,
    backend: BackendId,
    span: Span,
}

impl<C: HttpClientTrait> std::fmt::Debug for GitHubOrganization<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubOrganization")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[hidden]")
            .field("org_login", &self.org_login)
            .field("endpoints", &self.endpoints)
            .finish()
    }
}

impl<C: HttpClientTrait> GitHubOrganization<C> {
    pub fn new(
        client: C,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        org_login: impl Into<String>,
    ) -> Self {
        Self {
            client,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            org_login: org_login.into(),
            endpoints: GitHubEndpoints::default(),
            backend: BackendId::new(GITHUB_ORGANIZATION_BACKEND),
            span: Span::none(),
        }
    }

    /// Use other endpoints, e.g. a GitHub Enterprise Server
    pub fn with_endpoints(mut self, endpoints: GitHubEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Parent span for the spans of every operation
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn org_login(&self) -> &str {
        &self.org_login
    }

    /// Verify the callback, exchange its code and check membership
    async fn complete_login(
        &self,
        nonce: &str,
        redirect_url: &str,
        callback: &CallbackRequest,
    ) -> Result<Identity, TeamError> {
        let code = callback
            .param("code")
            .ok_or_else(|| TeamError::authentication("callback carries no code"))?;
        let state = callback
            .param("state")
            .ok_or_else(|| TeamError::authentication("callback carries no state"))?;

        if state != nonce {
            warn!("callback state does not match the issued nonce");
            return Err(TeamError::authentication(
                "callback state does not match the issued nonce",
            ));
        }

        let access_token = self.exchange_code(code, redirect_url).await?;
        let user: GitHubUser = request_json(
            &self.client,
            &access_token,
            &self.endpoints.user_url,
            Method::GET,
        )
        .await?;

        let identity = Identity::new(self.backend.clone(), user.login, access_token);

        if self.authorize(&identity).await {
            info!(user = identity.name(), "user authenticated");
            Ok(identity)
        } else {
            Err(TeamError::authentication(format!(
                "@{} user is not a member of @{} organization",
                identity.name(),
                self.org_login
            )))
        }
    }

    /// Trade an authorization code for an access token
    async fn exchange_code(&self, code: &str, redirect_url: &str) -> Result<String, TeamError> {
        let url = &self.endpoints.access_token_url;
        let form = serde_urlencoded::to_string([
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", redirect_url),
        ])
        .map_err(|e| TeamError::invalid_request(format!("Failed to encode token request: {}", e)))?;

        let request = HttpRequest::post(url.as_str())
            .header("Content-Type", FORM_MEDIA_TYPE)
            .body(form);
        let response = self.client.send(request).await?;

        if !response.status().is_success() {
            return Err(TeamError::status(url.as_str(), response.status().as_u16()));
        }

        let content_type = response.content_type().unwrap_or_default().to_string();
        let token: TokenResponse = match content_type_essence(&content_type).as_deref() {
            Some(FORM_MEDIA_TYPE) => {
                let body = response.text().await?;
                serde_urlencoded::from_str(&body)
                    .map_err(|e| TeamError::decode(url.as_str(), e.to_string()))?
            }
            Some(JSON_MEDIA_TYPE) => {
                let body = response.text().await?;
                serde_json::from_str(&body).map_err(|e| TeamError::decode(url.as_str(), e.to_string()))?
            }
            _ => {
                return Err(TeamError::authentication(format!(
                    "{} sent unsupported content type: {}",
                    url, content_type
                )));
            }
        };

        match token.access_token {
            Some(access_token) if !access_token.is_empty() => Ok(access_token),
            _ => Err(TeamError::authentication(format!(
                "{} did not issue an access token: {}",
                url,
                token
                    .error_description
                    .or(token.error)
                    .unwrap_or_else(|| "no reason given".to_string())
            ))),
        }
    }
}

#[async_trait]
impl<C: HttpClientTrait> Team for GitHubOrganization<C> {
    fn backend(&self) -> &BackendId {
        &self.backend
    }

    fn request_authentication(
        &self,
        nonce: &str,
        redirect_url: &str,
    ) -> Result<String, TeamError> {
        if nonce.is_empty() {
            return Err(TeamError::invalid_request("nonce must not be empty"));
        }
        reqwest::Url::parse(redirect_url)
            .map_err(|e| TeamError::invalid_request(format!("Invalid redirect URL: {}", e)))?;

        let url = reqwest::Url::parse_with_params(
            &self.endpoints.authorize_url,
            [
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", redirect_url),
                ("scope", OAUTH_SCOPE),
                ("state", nonce),
            ],
        )
        .map_err(|e| TeamError::invalid_request(format!("Invalid authorize URL: {}", e)))?;

        Ok(url.into())
    }

    async fn authenticate(
        &self,
        nonce: &str,
        redirect_url: &str,
        callback: &CallbackRequest,
    ) -> Result<Identity, TeamError> {
        let span = info_span!(parent: &self.span, "authenticate", org = %self.org_login);

        self.complete_login(nonce, redirect_url, callback)
            .instrument(span)
            .await
    }

    async fn authorize(&self, identity: &Identity) -> bool {
        let span = info_span!(
            parent: &self.span,
            "authorize",
            org = %self.org_login,
            user = identity.name()
        );

        async move {
            if identity.backend() != &self.backend {
                debug!(backend = %identity.backend(), "identity minted by another backend");
                return false;
            }

            let response = request_json::<_, MembershipResponse>(
                &self.client,
                identity.access_token(),
                &self.endpoints.orgs_list_url,
                Method::GET,
            )
            .await;

            match response {
                Ok(MembershipResponse::Memberships(orgs)) => {
                    orgs.iter().any(|org| org.login == self.org_login)
                }
                Ok(MembershipResponse::Failure { error }) => {
                    debug!(%error, "membership listing returned an error");
                    false
                }
                Err(e) => {
                    warn!(error = %e, "membership lookup failed");
                    false
                }
            }
        }
        .instrument(span)
        .await
    }
}
