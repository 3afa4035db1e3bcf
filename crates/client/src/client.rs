use std::time::Duration;

use signpost_engine::catalog::Catalogs;
use signpost_engine::entry::Entry;
use signpost_engine::template::Template;

/// Error type for remote operations.
#[derive(Debug)]
pub enum ClientError {
    /// Network error
    Network(String),
    /// HTTP error with status code
    Http(u16, String),
    /// JSON parsing error
    Parse(String),
    /// The server rejected specific rows of a batch; the rest were not
    /// created either (the batch is all-or-nothing on the server side).
    Rejected(Vec<RowFailure>),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Network(msg) => write!(f, "Network error: {}", msg),
            ClientError::Http(code, msg) => write!(f, "HTTP {}: {}", code, msg),
            ClientError::Parse(msg) => write!(f, "Parse error: {}", msg),
            ClientError::Rejected(failures) => {
                write!(f, "{} row(s) rejected", failures.len())?;
                for failure in failures {
                    write!(f, "; row {}: {}", failure.index, failure.message)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ClientError {}

/// One rejected row from a failed batch, by position in the submitted order.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct RowFailure {
    pub index: usize,
    pub message: String,
}

/// Result of a successful batched creation.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct SubmitReceipt {
    /// Server-assigned identifiers, in submitted order.
    pub created: Vec<String>,
}

/// Entry API client (blocking).
#[derive(Clone)]
pub struct Client {
    http: reqwest::blocking::Client,
    api_base: String,
    token: String,
}

impl Client {
    pub fn new(api_base: impl Into<String>, token: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("spost/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Ok(Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    /// Fetch all five reference catalogs in one call. A failure here is
    /// fatal to entering the entry screen.
    pub fn fetch_catalogs(&self) -> Result<Catalogs, ClientError> {
        let url = format!("{}/api/entry/catalogs", self.api_base);
        let resp = self.get(&url)?;
        resp.json::<Catalogs>().map_err(|e| ClientError::Parse(e.to_string()))
    }

    /// Create all submitted rows as one ordered batch.
    ///
    /// HTTP 422 carries per-row failures and maps to `Rejected`; any
    /// error leaves the caller's store untouched for retry.
    pub fn create_entries(&self, entries: &[&Entry]) -> Result<SubmitReceipt, ClientError> {
        let url = format!("{}/api/entry/batch", self.api_base);
        let payload = serde_json::json!({
            "entries": entries.iter().map(|e| &e.fields).collect::<Vec<_>>(),
        });
        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&payload)
            .send()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = resp.status();
        if status.as_u16() == 422 {
            let body: serde_json::Value =
                resp.json().map_err(|e| ClientError::Parse(e.to_string()))?;
            let failures = body
                .get("failures")
                .cloned()
                .map(serde_json::from_value::<Vec<RowFailure>>)
                .transpose()
                .map_err(|e| ClientError::Parse(e.to_string()))?
                .unwrap_or_default();
            log::warn!("batch submission rejected: {} failure(s)", failures.len());
            return Err(ClientError::Rejected(failures));
        }
        let resp = Self::check(resp)?;
        resp.json::<SubmitReceipt>().map_err(|e| ClientError::Parse(e.to_string()))
    }

    /// List saved entry templates.
    pub fn list_templates(&self) -> Result<Vec<Template>, ClientError> {
        let url = format!("{}/api/entry/templates", self.api_base);
        let resp = self.get(&url)?;
        resp.json::<Vec<Template>>().map_err(|e| ClientError::Parse(e.to_string()))
    }

    /// Create or overwrite a named template.
    pub fn save_template(&self, template: &Template) -> Result<(), ClientError> {
        let url = format!("{}/api/entry/templates", self.api_base);
        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(template)
            .send()
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Self::check(resp).map(|_| ())
    }

    /// Delete a template by name.
    pub fn delete_template(&self, name: &str) -> Result<(), ClientError> {
        let url = format!("{}/api/entry/templates/{}", self.api_base, name);
        let resp = self
            .http
            .delete(&url)
            .bearer_auth(&self.token)
            .send()
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Self::check(resp).map(|_| ())
    }

    fn get(&self, url: &str) -> Result<reqwest::blocking::Response, ClientError> {
        let resp = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Self::check(resp)
    }

    fn check(resp: reqwest::blocking::Response) -> Result<reqwest::blocking::Response, ClientError> {
        let status = resp.status();
        if status.is_success() {
            Ok(resp)
        } else {
            let body = resp.text().unwrap_or_default();
            Err(ClientError::Http(status.as_u16(), body))
        }
    }
}
