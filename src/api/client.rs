use serde_json::Value;

use super::{
    ApiCall, ResourceLayout, Transport, paths,
    wire::{ArticleRecord, ArticleUpdate, BlockPayload, BlockRecord, Created},
};
use crate::{
    content::{ArticleMetadata, Block, Category},
    error::{Error, Result},
};

/// 文章接口客户端。
///
/// 负责拼接路径、构造请求体和解析响应，块类型到子资源的映射由
/// [`ResourceLayout`] 决定。
#[derive(Debug, Clone)]
pub struct ArticleClient<T> {
    transport: T,
    layout: ResourceLayout,
}

impl<T: Transport> ArticleClient<T> {
    pub fn new(transport: T, layout: ResourceLayout) -> Self {
        Self { transport, layout }
    }

    pub fn layout(&self) -> ResourceLayout {
        self.layout
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// `GET /api/articles/{id}`
    pub async fn fetch_article(&self, article_id: &str) -> Result<ArticleMetadata> {
        let data = self
            .transport
            .execute(ApiCall::get(paths::article(article_id)))
            .await?
            .into_data()?;
        let record: ArticleRecord = serde_json::from_value(data)?;
        Ok(record.into())
    }

    /// `PUT /api/articles/{id}`
    pub async fn update_article(
        &self,
        article_id: &str,
        meta: &ArticleMetadata,
        catalog: &[Category],
    ) -> Result<()> {
        let body = serde_json::to_value(ArticleUpdate::new(meta, catalog))?;
        self.transport
            .execute(ApiCall::put(paths::article(article_id), body))
            .await?
            .ensure_success()?;
        Ok(())
    }

    /// `GET /api/articles/{id}/blocks`
    ///
    /// 保持服务端返回的顺序，无法识别的块记录日志后跳过。
    pub async fn fetch_blocks(&self, article_id: &str) -> Result<Vec<Block>> {
        let data = self
            .transport
            .execute(ApiCall::get(paths::blocks(article_id)))
            .await?
            .into_data()?;
        let records: Vec<Value> = serde_json::from_value(data)?;

        Ok(records
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| {
                match serde_json::from_value::<BlockRecord>(value) {
                    Ok(record) => Some(record.into()),
                    Err(e) => {
                        tracing::warn!(article = article_id, index, error = %e, "skip unreadable block");
                        None
                    }
                }
            })
            .collect())
    }

    /// 创建块，返回服务端分配的 id
    pub async fn create_block(&self, article_id: &str, block: &Block, order: usize) -> Result<String> {
        let segment = self.segment(block)?;
        let body = serde_json::to_value(BlockPayload::new(block, order))?;
        let data = self
            .transport
            .execute(ApiCall::post(
                paths::block_collection(article_id, segment),
                body,
            ))
            .await?
            .into_data()?;
        let created: Created = serde_json::from_value(data)?;
        Ok(created.id.into_string())
    }

    pub async fn update_block(&self, article_id: &str, block: &Block, order: usize) -> Result<()> {
        let segment = self.segment(block)?;
        let server_id = server_id(block)?;
        let body = serde_json::to_value(BlockPayload::new(block, order))?;
        self.transport
            .execute(ApiCall::put(
                paths::block(article_id, segment, server_id),
                body,
            ))
            .await?
            .ensure_success()?;
        Ok(())
    }

    pub async fn delete_block(&self, article_id: &str, block: &Block) -> Result<()> {
        let segment = self.segment(block)?;
        let server_id = server_id(block)?;
        self.transport
            .execute(ApiCall::delete(paths::block(article_id, segment, server_id)))
            .await?
            .ensure_success()?;
        Ok(())
    }

    /// `GET /api/categories`
    pub async fn fetch_categories(&self) -> Result<Vec<Category>> {
        let data = self
            .transport
            .execute(ApiCall::get(paths::categories()))
            .await?
            .into_data()?;
        Ok(serde_json::from_value(data)?)
    }

    fn segment(&self, block: &Block) -> Result<&'static str> {
        self.layout
            .segment(block.kind())
            .ok_or(Error::Unroutable(block.kind()))
    }
}

fn server_id(block: &Block) -> Result<&str> {
    block
        .id()
        .server_id()
        .ok_or_else(|| Error::NotPersisted(block.id().to_string()))
}
