mod report;

use std::collections::HashSet;

use crate::{
    api::{ArticleClient, Transport},
    content::{ArticleMetadata, Block, BlockId, Category, Document},
    error::{Error, Result},
};

pub use self::report::{BlockOutcome, BlockStatus, SaveReport, SaveSummary};

/// 一篇文章的编辑会话。
///
/// 持有元数据和块序列。除了删除块会立即请求服务端外，所有修改都只在内存中，
/// 直到调用 [`ArticleEditor::save`]。保存和删除都需要 `&mut self`，
/// 同一会话不会同时进行两次保存。
#[derive(Debug)]
pub struct ArticleEditor<T> {
    client: ArticleClient<T>,
    article_id: String,
    metadata: ArticleMetadata,
    document: Document,
    categories: Vec<Category>,
}

impl<T: Transport> ArticleEditor<T> {
    /// 空白会话，不请求服务端
    pub fn new(client: ArticleClient<T>, article_id: impl Into<String>) -> Self {
        Self {
            client,
            article_id: article_id.into(),
            metadata: ArticleMetadata::default(),
            document: Document::new(),
            categories: Vec::new(),
        }
    }

    /// 打开已有文章，加载元数据和块。
    ///
    /// 加载失败只记录日志，对应部分使用默认值。
    pub async fn open(client: ArticleClient<T>, article_id: impl Into<String>) -> Self {
        let mut editor = Self::new(client, article_id);
        editor.reload().await;
        editor
    }

    /// 重新从服务端加载，丢弃未保存的修改
    pub async fn reload(&mut self) {
        let id = self.article_id.as_str();
        let (metadata, blocks) = tokio::join!(
            self.client.fetch_article(id),
            self.client.fetch_blocks(id)
        );

        self.metadata = metadata.unwrap_or_else(|e| {
            tracing::warn!(article = id, error = %e, "load article metadata failed");
            ArticleMetadata::default()
        });

        self.document = match blocks {
            Ok(blocks) => Document::from_blocks(blocks),
            Err(e) => {
                tracing::warn!(article = id, error = %e, "load article blocks failed");
                Document::new()
            }
        };

        tracing::debug!(article = id, blocks = self.document.len(), "article loaded");
    }

    /// 加载分类目录，失败时目录为空
    pub async fn load_categories(&mut self) {
        self.categories = self.client.fetch_categories().await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "load categories failed");
            Vec::new()
        });
    }

    pub fn article_id(&self) -> &str {
        &self.article_id
    }

    pub fn client(&self) -> &ArticleClient<T> {
        &self.client
    }

    pub fn metadata(&self) -> &ArticleMetadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut ArticleMetadata {
        &mut self.metadata
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// 整体替换元数据和块序列
    pub fn replace(&mut self, metadata: ArticleMetadata, document: Document) {
        self.metadata = metadata;
        self.document = document;
    }

    /// 保存文章。
    ///
    /// 1. 先保存元数据，失败时直接返回错误，不保存任何块
    /// 2. 按数组顺序逐个保存块，`order` 为当前下标；临时 id 的块新建，
    ///    成功后换成服务端 id，其余的块更新
    /// 3. 单个块失败只记录日志并继续，结果汇总在 [`SaveReport`] 中
    pub async fn save(&mut self) -> Result<SaveReport> {
        let article_id = self.article_id.as_str();

        if let Err(e) = self
            .client
            .update_article(article_id, &self.metadata, &self.categories)
            .await
        {
            tracing::error!(article = article_id, error = %e, "save article metadata failed");
            return Err(e);
        }

        let layout = self.client.layout();
        let mut report = SaveReport::default();

        for order in 0..self.document.len() {
            let block = &self.document.blocks()[order];
            let id = block.id().clone();
            let kind = block.kind();

            let status = if layout.segment(kind).is_none() {
                BlockStatus::Skipped
            } else if id.is_pending() {
                let created = self.client.create_block(article_id, block, order).await;
                match created {
                    Ok(server_id) => {
                        self.document.mark_persisted(&id, server_id.clone());
                        BlockStatus::Created { id: server_id }
                    }
                    Err(e) => failed(article_id, &id, order, e),
                }
            } else {
                let updated = self.client.update_block(article_id, block, order).await;
                match updated {
                    Ok(()) => BlockStatus::Updated,
                    Err(e) => failed(article_id, &id, order, e),
                }
            };

            report.outcomes.push(BlockOutcome {
                id,
                kind,
                order,
                status,
            });
        }

        tracing::info!(
            article = article_id,
            blocks = report.outcomes.len(),
            failed = report.failures().count(),
            summary = ?report.summary(),
            "article saved"
        );
        Ok(report)
    }

    /// 用新的元数据和块替换当前内容并保存。
    ///
    /// `prune` 为真时，当前已保存、但新内容中没有的块会在保存成功后从服务端删除；
    /// 元数据保存失败时直接返回错误，不删除任何块。单个块删除失败只记录日志。
    pub async fn save_replacing(
        &mut self,
        metadata: ArticleMetadata,
        document: Document,
        prune: bool,
    ) -> Result<SaveReport> {
        let stale: Vec<Block> = if prune {
            let keep: HashSet<&BlockId> = document.blocks().iter().map(Block::id).collect();
            let layout = self.client.layout();
            self.document
                .blocks()
                .iter()
                .filter(|b| !b.id().is_pending() && !keep.contains(b.id()))
                .filter(|b| layout.segment(b.kind()).is_some())
                .cloned()
                .collect()
        } else {
            Vec::new()
        };

        self.replace(metadata, document);
        let report = self.save().await?;

        for block in &stale {
            let deleted = self.client.delete_block(&self.article_id, block).await;
            match deleted {
                Ok(()) => {
                    tracing::info!(article = %self.article_id, block = %block.id(), "stale block pruned")
                }
                Err(e) => {
                    tracing::error!(article = %self.article_id, block = %block.id(), error = %e, "prune block failed")
                }
            }
        }

        Ok(report)
    }

    /// 立即在服务端删除块，成功后才从本地移除。
    ///
    /// 还没有保存过的块返回 [`Error::NotPersisted`]，不会发出请求。
    pub async fn delete_block(&mut self, id: &BlockId) -> Result<()> {
        let block = self
            .document
            .get(id)
            .ok_or_else(|| Error::BlockNotFound(id.to_string()))?;

        if id.is_pending() {
            return Err(Error::NotPersisted(id.to_string()));
        }

        let deleted = self.client.delete_block(&self.article_id, block).await;
        match deleted {
            Ok(()) => {
                self.document.remove(id);
                tracing::info!(article = %self.article_id, block = %id, "block deleted");
                Ok(())
            }
            Err(e) => {
                tracing::error!(article = %self.article_id, block = %id, error = %e, "delete block failed");
                Err(e)
            }
        }
    }
}

fn failed(article_id: &str, id: &BlockId, order: usize, e: Error) -> BlockStatus {
    tracing::error!(article = article_id, block = %id, order, error = %e, "save block failed");
    BlockStatus::Failed {
        reason: e.to_string(),
    }
}
