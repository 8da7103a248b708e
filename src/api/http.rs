use reqwest::{
    StatusCode,
    header::{self, HeaderMap, HeaderValue},
};

use super::{ApiCall, Envelope, Method, Transport};
use crate::{
    config::ApiConfig,
    error::{ApiError, Error, Result},
};

/// 基于 reqwest 的 [`Transport`] 实现。
///
/// 所有请求共用一个连接池，配置了 token 时带上 `Authorization: Bearer` 头。
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// 根据接口配置创建传输层
    ///
    /// ```ignore
    /// let transport = HttpTransport::new(&config.api)?;
    /// ```
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = &config.token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| Error::FormatError("api token is not a valid header value"))?;
            headers.insert(header::AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

impl Transport for HttpTransport {
    async fn execute(&self, call: ApiCall) -> Result<Envelope> {
        let url = format!("{}{}", self.base_url, call.path);
        tracing::debug!(method = ?call.method, %url, "api request");

        let mut request = self.client.request(call.method.into(), &url);
        if let Some(body) = &call.body {
            request = request.json(body);
        }

        let resp = request.send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            if status == StatusCode::NOT_FOUND {
                return Err(ApiError::NotFound.into());
            }
            let message = serde_json::from_str::<Envelope>(&text)
                .ok()
                .and_then(|e| e.message)
                .unwrap_or_else(|| text.trim().to_string());
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        // 204 或空响应体视为成功
        if text.trim().is_empty() {
            return Ok(Envelope::empty());
        }
        Ok(serde_json::from_str(&text)?)
    }
}
