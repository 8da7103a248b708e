mod client;
mod http;
mod routes;
pub mod wire;

use std::future::Future;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ApiError, Result};

pub use self::{
    client::ArticleClient,
    http::HttpTransport,
    routes::{ResourceLayout, paths},
};

/// HTTP 方法
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

/// 一次接口调用：方法、以 `/api` 开头的路径和可选的 JSON 请求体。
#[derive(Debug, Clone, PartialEq)]
pub struct ApiCall {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

impl ApiCall {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body: Some(body),
        }
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Put,
            path: path.into(),
            body: Some(body),
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::Delete,
            path: path.into(),
            body: None,
        }
    }
}

/// 后端统一的响应格式 `{ success, data?, message? }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
}

impl Envelope {
    /// 成功并带数据的响应
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    /// 没有数据的成功响应
    pub fn empty() -> Self {
        Self {
            success: true,
            data: None,
            message: None,
        }
    }

    /// 检查 `success` 字段
    pub fn ensure_success(self) -> Result<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(ApiError::Rejected(self.message.unwrap_or_default()).into())
        }
    }

    /// 取出 `data`，`success` 为 `false` 或没有数据时返回错误
    pub fn into_data(self) -> Result<Value> {
        self.ensure_success()?
            .data
            .ok_or_else(|| ApiError::MissingData.into())
    }
}

/// 执行接口调用的传输层。
///
/// 非 2xx 响应应转换为 [`ApiError`]，`success` 字段的检查由调用方完成。
pub trait Transport: Send + Sync {
    fn execute(&self, call: ApiCall) -> impl Future<Output = Result<Envelope>> + Send;
}
