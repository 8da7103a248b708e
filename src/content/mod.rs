mod block;
mod document;
mod metadata;

pub use self::{
    block::{Block, BlockBody, BlockId, BlockKind, BlockPatch, TEMP_PREFIX, create_block},
    document::{Direction, Document},
    metadata::{
        ArticleMetadata, Category, DEFAULT_READ_TIME, parse_read_time, reconcile_category,
    },
};
