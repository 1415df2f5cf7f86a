use crate::error::ApiError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

/// Lets requests through an ngrok tunnel without its browser warning page.
pub const NGROK_SKIP_HEADER: &str = "ngrok-skip-browser-warning";
pub const NGROK_SKIP_VALUE: &str = "69420";

/// Shared reqwest client carrying the headers every backend call sends.
#[derive(Clone)]
pub struct Backend {
    client: Client,
}

impl Backend {
    pub fn new() -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            HeaderName::from_static(NGROK_SKIP_HEADER),
            HeaderValue::from_static(NGROK_SKIP_VALUE),
        );

        let client = Client::builder().default_headers(headers).build()?;
        Ok(Self { client })
    }

    pub fn get(&self, base_url: &str, path: &str) -> RequestBuilder {
        self.client.get(endpoint(base_url, path))
    }

    pub fn post(&self, base_url: &str, path: &str) -> RequestBuilder {
        self.client.post(endpoint(base_url, path))
    }

    pub fn patch(&self, base_url: &str, path: &str) -> RequestBuilder {
        self.client.patch(endpoint(base_url, path))
    }
}

pub fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// Sends the request and decodes a success body as `T`.
pub async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
    let response = request.send().await?;
    decode(response).await
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(ApiError::Status {
            status: status.as_u16(),
            body,
        });
    }

    Ok(serde_json::from_str(&body)?)
}
