use std::fmt;

use crate::content::{BlockId, BlockKind};

/// 单个块的保存结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockStatus {
    /// 新建成功，带服务端分配的 id
    Created { id: String },
    Updated,
    /// 当前资源布局下没有对应的子资源，未发送请求
    Skipped,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockOutcome {
    /// 保存前的 id，新建的块是临时 id
    pub id: BlockId,
    pub kind: BlockKind,
    pub order: usize,
    pub status: BlockStatus,
}

impl BlockOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self.status, BlockStatus::Failed { .. })
    }
}

/// 一次保存的总体结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveSummary {
    Success,
    /// 部分块保存失败
    PartialFailure,
    /// 所有尝试的块都失败了
    Failure,
}

/// 保存报告，元数据保存成功后才会产生
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveReport {
    pub outcomes: Vec<BlockOutcome>,
}

impl SaveReport {
    pub fn failures(&self) -> impl Iterator<Item = &BlockOutcome> {
        self.outcomes.iter().filter(|o| o.is_failed())
    }

    /// 汇总结果，没有发出请求的块不计入
    pub fn summary(&self) -> SaveSummary {
        let attempted = self
            .outcomes
            .iter()
            .filter(|o| o.status != BlockStatus::Skipped)
            .count();
        let failed = self.failures().count();

        match failed {
            0 => SaveSummary::Success,
            n if n == attempted => SaveSummary::Failure,
            _ => SaveSummary::PartialFailure,
        }
    }
}

impl fmt::Display for SaveReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for o in &self.outcomes {
            let status = match &o.status {
                BlockStatus::Created { id } => format!("created {id}"),
                BlockStatus::Updated => "updated".to_string(),
                BlockStatus::Skipped => "skipped".to_string(),
                BlockStatus::Failed { reason } => format!("failed: {reason}"),
            };
            writeln!(f, "#{} {} {}: {}", o.order, o.kind, o.id, status)?;
        }
        write!(f, "{:?}", self.summary())
    }
}
