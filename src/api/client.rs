use super::ApiError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use uuid::Uuid;

/// Authenticated entry point to the catalog API.
///
/// The token lives behind a `RefCell` so it can be rotated on a handle that
/// is already shared with views.
pub struct ApiHandle {
    id: Uuid,
    base_url: String,
    token: RefCell<Option<String>>,
    http: reqwest::Client,
}

impl std::fmt::Debug for ApiHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiHandle")
            .field("id", &self.id)
            .field("base_url", &self.base_url)
            .field("has_token", &self.token.borrow().is_some())
            .finish()
    }
}

impl ApiHandle {
    pub fn new(base_url: impl Into<String>, token: Option<String>, http: reqwest::Client) -> Self {
        Self {
            id: Uuid::new_v4(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: RefCell::new(token),
            http,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    pub fn set_token(&self, token: Option<String>) {
        *self.token.borrow_mut() = token;
    }

    /// Full request URL for `path`, with the session token appended.
    pub fn url(&self, path: &str) -> String {
        let mut url = if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        };

        if let Some(token) = self.token.borrow().as_deref() {
            let separator = if url.contains('?') { '&' } else { '?' };
            url.push(separator);
            url.push_str("token=");
            url.push_str(&urlencoding::encode(token));
        }
        url
    }

    pub async fn get_json<T>(&self, path: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let response = self.http.get(&url).send().await?;
        Self::decode(response).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let response = self.http.post(&url).json(body).send().await?;
        Self::decode(response).await
    }

    async fn decode<T>(response: reqwest::Response) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                url: response.url().path().to_string(),
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|err| ApiError::Decode(err.to_string()))
    }
}
