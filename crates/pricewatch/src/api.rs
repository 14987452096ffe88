use gloo_net::http::Response;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy)]
pub enum HttpMethod {
    Get,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not Found: {0}")]
    NotFound(String),
    #[error("Bad Request: {0}")]
    BadRequest(String),
    #[error("Internal Server Error")]
    InternalServerError,
    #[error("Unauthorized Access")]
    UnauthorizedAccess,
    #[error("Forbidden Access")]
    ForbiddenAccess,
    #[error("Rate limited by {0}")]
    RateLimited(String),
    #[error("Network error: {0}")]
    NetworkError(gloo_net::Error),
    #[error("Parse error: {0}")]
    ParseError(gloo_net::Error),
    #[error("Unexpected response status code: {0}")]
    UnexpectedStatusCode(u16),
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Clone, Default)]
pub struct ApiHeaders(HashMap<String, String>);

impl ApiHeaders {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    pub fn insert(&mut self, key: String, value: String) {
        self.0.insert(key, value);
    }

    pub fn delete(&mut self, key: &str) {
        self.0.remove(key);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

impl From<ApiHeaders> for gloo_net::http::Headers {
    fn from(val: ApiHeaders) -> Self {
        let headers = gloo_net::http::Headers::new();
        for (key, value) in val.0 {
            headers.set(&key, &value);
        }
        headers
    }
}

/// Maps an HTTP status to the error the caller sees, `None` on success.
pub fn status_error(status: u16, endpoint: &str) -> Option<ApiError> {
    match status {
        200..=299 => None,
        400 => Some(ApiError::BadRequest(format!("Bad request to {endpoint}"))),
        401 => Some(ApiError::UnauthorizedAccess),
        403 => Some(ApiError::ForbiddenAccess),
        404 => Some(ApiError::NotFound(format!("{endpoint} not found"))),
        429 => Some(ApiError::RateLimited(endpoint.to_string())),
        500..=599 => Some(ApiError::InternalServerError),
        status => Some(ApiError::UnexpectedStatusCode(status)),
    }
}

fn handle_response_status(response: Response, endpoint: &str) -> ApiResult<Response> {
    match status_error(response.status(), endpoint) {
        None => Ok(response),
        Some(err) => Err(err),
    }
}

async fn handle_json_response<T>(response: Response, endpoint: &str) -> ApiResult<T>
where
    T: serde::de::DeserializeOwned,
{
    let validated_response = handle_response_status(response, endpoint)?;
    validated_response
        .json::<T>()
        .await
        .map_err(ApiError::ParseError)
}

#[async_trait::async_trait(?Send)]
pub trait ApiClient {
    async fn make_request(&self, method: HttpMethod, endpoint: &str) -> ApiResult<Response>;

    async fn get<T>(&self, endpoint: &str) -> ApiResult<T>
    where
        T: serde::de::DeserializeOwned;
}

pub struct HttpApiClient {
    root_url: String,
    headers: ApiHeaders,
}

impl HttpApiClient {
    pub fn new(root_url: impl Into<String>) -> Self {
        let mut headers = ApiHeaders::new();
        headers.insert("accept".to_string(), "application/json".to_string());
        Self {
            root_url: root_url.into(),
            headers,
        }
    }

    pub fn set_header(&mut self, key: String, value: String) {
        self.headers.insert(key, value);
    }

    pub fn set_headers(&mut self, headers: Vec<(String, String)>) {
        for (key, value) in headers {
            self.headers.insert(key, value);
        }
    }

    pub fn headers(&self) -> &ApiHeaders {
        &self.headers
    }

    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.root_url, endpoint)
    }
}

#[async_trait::async_trait(?Send)]
impl ApiClient for HttpApiClient {
    async fn make_request(&self, method: HttpMethod, endpoint: &str) -> ApiResult<Response> {
        let url = self.url(endpoint);

        let request = match method {
            HttpMethod::Get => gloo_net::http::Request::get(&url),
        };

        request
            .headers(self.headers.clone().into())
            .send()
            .await
            .map_err(ApiError::NetworkError)
    }

    async fn get<T>(&self, endpoint: &str) -> ApiResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self.make_request(HttpMethod::Get, endpoint).await?;
        handle_json_response(response, endpoint).await
    }
}
