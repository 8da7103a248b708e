use super::block::{Block, BlockId, BlockKind, BlockPatch, create_block};

/// 移动方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// 正在编辑的文章的块序列。
///
/// 块在数组中的位置就是它的显示顺序，保存时的 `order` 由下标得出。
/// 所有操作都是同步的本地操作，无效的 id 或下标被忽略。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    blocks: Vec<Block>,
    active: Option<BlockId>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用服务端返回的块原样填充文档
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        Self {
            blocks,
            active: None,
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn get(&self, id: &BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id() == id)
    }

    pub fn position(&self, id: &BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| b.id() == id)
    }

    /// 当前正在编辑的块
    pub fn active(&self) -> Option<&BlockId> {
        self.active.as_ref()
    }

    pub fn set_active(&mut self, id: Option<BlockId>) {
        self.active = id;
    }

    /// 创建一个新块追加到末尾，并设为正在编辑
    pub fn append(&mut self, kind: BlockKind) -> &Block {
        self.push(create_block(kind))
    }

    /// 追加一个已构造的块，并设为正在编辑
    pub fn push(&mut self, block: Block) -> &Block {
        self.active = Some(block.id().clone());
        self.blocks.push(block);
        &self.blocks[self.blocks.len() - 1]
    }

    /// 合并部分字段，找不到 id 时不做任何事
    pub fn update(&mut self, id: &BlockId, patch: BlockPatch) {
        if let Some(block) = self.block_mut(id) {
            patch.apply(block);
        }
    }

    /// 仅在本地移除块，不会请求服务端
    pub fn remove(&mut self, id: &BlockId) -> Option<Block> {
        let index = self.position(id)?;
        if self.active.as_ref() == Some(id) {
            self.active = None;
        }
        Some(self.blocks.remove(index))
    }

    /// 与相邻块交换位置，边界处不动
    pub fn move_block(&mut self, index: usize, direction: Direction) {
        let target = match direction {
            Direction::Up if index > 0 => index - 1,
            Direction::Down if index < self.blocks.len().saturating_sub(1) => index + 1,
            _ => return,
        };
        if index < self.blocks.len() {
            self.blocks.swap(index, target);
        }
    }

    pub fn add_list_item(&mut self, id: &BlockId) {
        if let Some(items) = self.items_mut(id) {
            items.push(String::new());
        }
    }

    pub fn update_list_item(&mut self, id: &BlockId, index: usize, value: impl Into<String>) {
        if let Some(item) = self.items_mut(id).and_then(|items| items.get_mut(index)) {
            *item = value.into();
        }
    }

    pub fn remove_list_item(&mut self, id: &BlockId, index: usize) {
        if let Some(items) = self.items_mut(id) {
            if index < items.len() {
                items.remove(index);
            }
        }
    }

    /// 用服务端分配的 id 替换临时 id。
    ///
    /// 返回是否找到了对应的块。
    pub(crate) fn mark_persisted(&mut self, pending: &BlockId, server_id: String) -> bool {
        let persisted = BlockId::Persisted(server_id);
        let Some(block) = self.block_mut(pending) else {
            return false;
        };
        block.set_id(persisted.clone());
        if self.active.as_ref() == Some(pending) {
            self.active = Some(persisted);
        }
        true
    }

    fn block_mut(&mut self, id: &BlockId) -> Option<&mut Block> {
        self.blocks.iter_mut().find(|b| b.id() == id)
    }

    fn items_mut(&mut self, id: &BlockId) -> Option<&mut Vec<String>> {
        self.block_mut(id).and_then(|b| b.body_mut().items_mut())
    }
}
