//! The inbound request an identity provider redirects the browser back with

use super::TeamError;

/// Query parameters of an OAuth callback request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackRequest {
    params: Vec<(String, String)>,
}

impl CallbackRequest {
    /// Build from the full callback URL (`https://host/auth?code=..&state=..`)
    pub fn from_url(url: &str) -> Result<Self, TeamError> {
        let url = reqwest::Url::parse(url)
            .map_err(|e| TeamError::invalid_request(format!("Invalid callback URL: {}", e)))?;

        Ok(Self {
            params: url.query_pairs().into_owned().collect(),
        })
    }

    /// Build from a raw query string, with or without the leading `?`
    pub fn from_query(query: &str) -> Result<Self, TeamError> {
        let params = serde_urlencoded::from_str(query.trim_start_matches('?'))
            .map_err(|e| TeamError::invalid_request(format!("Invalid callback query: {}", e)))?;

        Ok(Self { params })
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            params: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// First value of the named parameter
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}
