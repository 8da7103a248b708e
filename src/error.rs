use std::io;

use crate::content::BlockKind;

pub type Result<T> = core::result::Result<T, Error>;

/// 后端接口返回的错误。
///
/// 后端所有响应都形如 `{ success, data?, message? }`，这里区分：
///
/// - [`ApiError::NotFound`]：资源不存在（HTTP 404）
/// - [`ApiError::Status`]：其他非 2xx 状态码
/// - [`ApiError::Rejected`]：状态码成功但 `success` 为 `false`
/// - [`ApiError::MissingData`]：需要 `data` 字段但响应中没有
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not Found")]
    NotFound,

    #[error("server responded {status}: {message}")]
    Status { status: u16, message: String },

    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("response has no data")]
    MissingData,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    ApiError(#[from] ApiError),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("block not found: {0}")]
    BlockNotFound(String),

    /// 块还没有保存到服务端，只有临时 id
    #[error("block {0} has not been saved yet")]
    NotPersisted(String),

    /// 当前资源布局下该类型的块没有对应的服务端资源
    #[error("no server resource for {0} blocks")]
    Unroutable(BlockKind),

    #[error("{0}")]
    FormatError(&'static str),
}
