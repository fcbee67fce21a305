use std::sync::Arc;

use reqwest::{
    Client, Request, Response, StatusCode,
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::api::auth::RefreshTokenRequest;
use crate::api::refresh::{RefreshCoordinator, RefreshTicket};
use crate::api::types::{ApiResult, ApiSdkError, RefreshError};
use crate::token_store::{TokenPair, TokenStore};

/// HTTP access layer shared by every resource API.
///
/// Attaches the stored bearer credential on the way out and recovers from
/// access-token expiry on the way back: a 401 triggers one refresh cycle
/// (deduplicated across concurrent requests by the coordinator) followed by
/// a single retry of the original request.
pub struct HttpClient {
    client: Client,
    server_url: String,
    token_store: Arc<dyn TokenStore>,
    refresh: RefreshCoordinator,
}

impl HttpClient {
    pub fn new(server_url: String, token_store: Arc<dyn TokenStore>) -> Self {
        Self { client: Client::new(), server_url, token_store, refresh: RefreshCoordinator::new() }
    }

    fn build_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.server_url.trim_end_matches('/'), endpoint.trim_start_matches('/'))
    }

    fn build_headers(&self) -> ApiResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(access_token) = self.token_store.get().access_token {
            headers.insert(AUTHORIZATION, bearer_header(&access_token)?);
        }

        Ok(headers)
    }

    pub async fn get<T>(&self, endpoint: &str) -> ApiResult<T>
    where
        T: DeserializeOwned,
    {
        let request =
            self.client.get(self.build_url(endpoint)).headers(self.build_headers()?).build()?;

        self.execute_json(request).await
    }

    pub async fn get_with_query<T, Q>(&self, endpoint: &str, query: &Q) -> ApiResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize,
    {
        let request = self
            .client
            .get(self.build_url(endpoint))
            .headers(self.build_headers()?)
            .query(query)
            .build()?;

        self.execute_json(request).await
    }

    pub async fn post<T, B>(&self, endpoint: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let request = self
            .client
            .post(self.build_url(endpoint))
            .headers(self.build_headers()?)
            .json(body)
            .build()?;

        self.execute_json(request).await
    }

    pub async fn delete_status(&self, endpoint: &str) -> ApiResult<()> {
        let request =
            self.client.delete(self.build_url(endpoint)).headers(self.build_headers()?).build()?;

        self.execute(request).await?;

        Ok(())
    }

    /// POST without credential attachment or expiry recovery. Login is the
    /// one public endpoint that must never carry a bearer header.
    pub async fn post_unauthenticated<T, B>(&self, endpoint: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let response = self
            .client
            .post(self.build_url(endpoint))
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .json(body)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<T>().await?)
    }

    pub(crate) fn token_store(&self) -> &Arc<dyn TokenStore> {
        &self.token_store
    }

    async fn execute_json<T>(&self, request: Request) -> ApiResult<T>
    where
        T: DeserializeOwned,
    {
        let response = self.execute(request).await?;
        Ok(response.json::<T>().await?)
    }

    /// Dispatches a request, recovering once from an expired access token.
    async fn execute(&self, request: Request) -> ApiResult<Response> {
        let retry = request.try_clone();
        let response = self.client.execute(request).await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response.error_for_status()?);
        }

        let Some(mut retry_request) = retry else {
            // A streaming body cannot be reissued; surface the failure as-is.
            return Ok(response.error_for_status()?);
        };

        let pair = self.token_store.get();
        let (Some(access_token), Some(refresh_token)) = (pair.access_token, pair.refresh_token)
        else {
            // Nothing to refresh with: the session is unrecoverable.
            self.clear_session();
            return Ok(response.error_for_status()?);
        };

        let new_access_token = self.refresh_access_token(access_token, refresh_token).await?;
        retry_request.headers_mut().insert(AUTHORIZATION, bearer_header(&new_access_token)?);

        // The reissued request does not come back through this branch, so a
        // second 401 propagates instead of starting another cycle.
        let response = self.client.execute(retry_request).await?;
        Ok(response.error_for_status()?)
    }

    /// Obtains a fresh access token, collapsing concurrent callers into a
    /// single call to the refresh endpoint.
    async fn refresh_access_token(
        &self,
        access_token: String,
        refresh_token: String,
    ) -> ApiResult<String> {
        match self.refresh.begin_or_join().await {
            RefreshTicket::Waiter(receiver) => {
                let outcome = receiver
                    .await
                    .map_err(|_| RefreshError("refresh abandoned before completion".to_string()))?;
                Ok(outcome?)
            }
            RefreshTicket::Leader => {
                debug!("access token rejected, starting refresh cycle");
                let outcome = self.run_refresh(&access_token, &refresh_token).await;
                if outcome.is_err() {
                    self.clear_session();
                }
                self.refresh.settle(outcome.clone()).await;
                Ok(outcome?)
            }
        }
    }

    /// The refresh call itself, issued on the bare request path so it can
    /// never recurse into expiry recovery.
    async fn run_refresh(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<String, RefreshError> {
        let body = RefreshTokenRequest {
            access_token: access_token.to_string(),
            refresh_token: refresh_token.to_string(),
        };

        let pair: TokenPair = self
            .client
            .post(self.build_url("auth/refresh"))
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .json(&body)
            .send()
            .await
            .and_then(Response::error_for_status)
            .map_err(|err| RefreshError(err.to_string()))?
            .json()
            .await
            .map_err(|err| RefreshError(err.to_string()))?;

        let Some(new_access_token) = pair.access_token.clone() else {
            return Err(RefreshError("refresh response missing access token".to_string()));
        };

        self.token_store.set(&pair).map_err(|err| RefreshError(err.to_string()))?;
        debug!("token refresh succeeded, retrying rejected requests");

        Ok(new_access_token)
    }

    fn clear_session(&self) {
        if let Err(err) = self.token_store.clear() {
            warn!("failed to clear token store: {}", err);
        }
    }
}

fn bearer_header(access_token: &str) -> ApiResult<HeaderValue> {
    HeaderValue::from_str(&format!("Bearer {}", access_token))
        .map_err(|_| ApiSdkError::ConfigError("access token is not a valid header value".to_string()))
}
