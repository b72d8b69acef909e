//! HTTP attribute definition service

use crate::{ClientConfig, ClientError, ClientResult};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use rubric_engine::{AttributeDefinitionService, FetchError};
use serde::de::DeserializeOwned;
use shared::error::{ApiResponse, ErrorCode};
use shared::models::AttributeAst;
use shared::types::CategoryId;
use std::collections::BTreeSet;
use std::time::Duration;

/// Resolves ASTs through the catalogue service's REST API
///
/// `GET {base_url}/{ast_path}?category_ids=a,b` answering
/// `ApiResponse<AttributeAst>`.
#[derive(Debug, Clone)]
pub struct HttpDefinitionService {
    client: Client,
    url: String,
    token: Option<String>,
}

impl HttpDefinitionService {
    /// Create a service client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            url: config.ast_url(),
            token: config.token.clone(),
        })
    }

    /// Set the authentication token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Build authorization header value
    fn auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }

    /// Fetch the AST for a selection
    ///
    /// An empty selection is answered locally with an empty AST.
    pub async fn fetch_ast(&self, selected: &BTreeSet<CategoryId>) -> ClientResult<AttributeAst> {
        if selected.is_empty() {
            return Ok(AttributeAst::default());
        }

        let ids = selected.iter().map(String::as_str).collect::<Vec<_>>().join(",");
        let mut request = self.client.get(&self.url).query(&[("category_ids", ids)]);
        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = request.send().await?;
        let envelope: ApiResponse<AttributeAst> = Self::handle_response(response).await?;
        envelope.into_result().map_err(ClientError::from)
    }

    /// Handle the HTTP response
    ///
    /// Error statuses carrying an envelope keep the service's error code.
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            return serde_json::from_str(&text).map_err(Into::into);
        }

        if status == StatusCode::UNAUTHORIZED {
            return Err(ClientError::Unauthorized);
        }
        if let Ok(envelope) = serde_json::from_str::<ApiResponse<serde_json::Value>>(&text)
            && let Some(code) = envelope.code.filter(|c| *c != 0)
        {
            return Err(ClientError::Api {
                code,
                message: envelope.message,
            });
        }

        match status {
            StatusCode::NOT_FOUND => Err(ClientError::NotFound(text)),
            s if s.is_server_error() => Err(ClientError::Api {
                code: ErrorCode::ServiceUnavailable.code(),
                message: format!("HTTP {}: {}", s, text),
            }),
            s => Err(ClientError::InvalidResponse(format!("HTTP {}: {}", s, text))),
        }
    }
}

#[async_trait]
impl AttributeDefinitionService for HttpDefinitionService {
    async fn get_ast(&self, selected: &BTreeSet<CategoryId>) -> Result<AttributeAst, FetchError> {
        let ast = self.fetch_ast(selected).await?;
        tracing::debug!(
            categories = selected.len(),
            groups = ast.groups.len(),
            "Fetched attribute AST over HTTP"
        );
        Ok(ast)
    }
}
