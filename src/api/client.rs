use reqwest::Url;
use serde::Deserialize;

use crate::config::Config;
use crate::error::ClientError;
use crate::models::{Submission, SubmissionForm};

use super::csrf::CsrfToken;

pub const CSRF_HEADER: &str = "X-CSRF-Token";

#[derive(Deserialize)]
struct CsrfResponse {
    csrf_token: String,
}

/// Body returned by `/add`, `/edit/{id}` and `/delete/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MutationResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl MutationResponse {
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some("success")
    }

    /// The failure the backend reported in a 2xx body, if any.
    pub fn failure(&self) -> Option<String> {
        if let Some(err) = &self.error {
            return Some(err.clone());
        }
        if self.status.as_deref() == Some("error") {
            return Some(
                self.message
                    .clone()
                    .unwrap_or_else(|| "Request failed".to_string()),
            );
        }
        None
    }
}

/// HTTP client for the submissions backend.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    csrf: CsrfToken,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            csrf: CsrfToken::new(),
        })
    }

    pub fn csrf(&self) -> &CsrfToken {
        &self.csrf
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::InvalidUrl(format!("{path}: {e}")))
    }

    async fn request_csrf_token(&self) -> Result<String, ClientError> {
        let resp = self.http.get(self.url("/get_csrf_token")?).send().await?;
        let body: CsrfResponse = check_status(resp).await?.json().await?;
        Ok(body.csrf_token)
    }

    /// Fetch a fresh token and keep it for later requests.
    pub async fn fetch_csrf_token(&self) -> Result<String, ClientError> {
        match self.request_csrf_token().await {
            Ok(token) => {
                tracing::debug!("Got CSRF token");
                self.csrf.set(token.clone()).await;
                Ok(token)
            }
            Err(e) => {
                tracing::error!("Error getting CSRF token: {e}");
                Err(e)
            }
        }
    }

    /// POST a multipart form with the CSRF header, fetching a token first if none is held.
    pub async fn post_with_csrf(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<MutationResponse, ClientError> {
        let result = self.try_post(path, form).await;
        if let Err(e) = &result {
            tracing::error!("Error in POST {path}: {e}");
        }
        result
    }

    async fn try_post(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<MutationResponse, ClientError> {
        let token = self
            .csrf
            .get_or_fetch(|| self.request_csrf_token())
            .await?;

        tracing::debug!("Making POST request to {path}");
        let resp = self
            .http
            .post(self.url(path)?)
            .header(CSRF_HEADER, token)
            .multipart(form)
            .send()
            .await?;

        let body = check_status(resp).await?.json().await?;
        Ok(body)
    }

    /// Submissions matching `query`; an empty query lists everything.
    pub async fn search(&self, query: &str) -> Result<Vec<Submission>, ClientError> {
        let mut url = self.url("/search")?;
        url.query_pairs_mut().append_pair("query", query);

        let resp = self.http.get(url).send().await?;
        let submissions = check_status(resp).await?.json().await?;
        Ok(submissions)
    }

    pub async fn add(&self, form: &SubmissionForm) -> Result<MutationResponse, ClientError> {
        self.post_with_csrf("/add", form.to_multipart()).await
    }

    pub async fn edit(
        &self,
        id: &str,
        form: &SubmissionForm,
    ) -> Result<MutationResponse, ClientError> {
        self.post_with_csrf(&format!("/edit/{id}"), form.to_multipart())
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<MutationResponse, ClientError> {
        self.post_with_csrf(&format!("/delete/{id}"), reqwest::multipart::Form::new())
            .await
    }
}

/// Turn a non-2xx response into an error, keeping the backend's message when it sent one.
async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body: Option<serde_json::Value> = resp.json().await.ok();
    let message = body
        .as_ref()
        .and_then(|b| b.get("message").or_else(|| b.get("error")))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());

    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}
