use crate::errors::PortalError;
use crate::models::{AdminConfig, AdminCredential, AdminStatus, QueryResponse, UploadResponse};
use reqwest::{header::ACCEPT, multipart, Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

pub const ADMIN_USER_HEADER: &str = "X-Admin-User";
pub const ADMIN_PASSWORD_HEADER: &str = "X-Admin-Password";

/// Thin wrapper over the vacation backend's HTTP API.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn login(&self, credential: &AdminCredential) -> Result<(), PortalError> {
        let request = self.http.post(self.url("/admin/login"));
        self.send(request, Some(credential)).await?;
        Ok(())
    }

    pub async fn upload(
        &self,
        credential: &AdminCredential,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadResponse, PortalError> {
        let part = multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = multipart::Form::new().part("file", part);
        let request = self.http.post(self.url("/admin/upload")).multipart(form);
        let response = self.send(request, Some(credential)).await?;
        decode(response).await
    }

    pub async fn save_config(
        &self,
        credential: &AdminCredential,
        config: &AdminConfig,
    ) -> Result<(), PortalError> {
        let request = self.http.post(self.url("/admin/config")).json(config);
        self.send(request, Some(credential)).await?;
        Ok(())
    }

    pub async fn status(&self, credential: &AdminCredential) -> Result<AdminStatus, PortalError> {
        let request = self.http.get(self.url("/admin/status"));
        let response = self.send(request, Some(credential)).await?;
        decode(response).await
    }

    pub async fn query(&self, dni: &str, fecha: &str) -> Result<QueryResponse, PortalError> {
        let request = self
            .http
            .get(self.url("/public/query"))
            .query(&[("dni", dni), ("fecha", fecha)]);
        let response = self.send(request, None).await?;
        decode(response).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send(
        &self,
        request: RequestBuilder,
        credential: Option<&AdminCredential>,
    ) -> Result<Response, PortalError> {
        let mut request = request.header(ACCEPT, "application/json");
        if let Some(credential) = credential {
            request = request
                .header(ADMIN_USER_HEADER, &credential.user)
                .header(ADMIN_PASSWORD_HEADER, &credential.pass);
        }

        let response = request.send().await.map_err(|err| {
            warn!("backend request failed: {err}");
            PortalError::Network(err)
        })?;

        let status = response.status();
        debug!("backend {} -> {status}", response.url().path());
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("backend rejected request with {status}");
            return Err(PortalError::Request {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, PortalError> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|err| PortalError::Schema(err.to_string()))
}
