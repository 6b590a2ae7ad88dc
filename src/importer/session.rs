//! 导入流程状态机
//!
//! `Idle → Parsing → Reconciling → Ready | Failed | Empty`
//!
//! 每次提交都从 `Idle` 重新开始；`Failed` 与 `Empty` 只终结当前这一次尝试。

use std::io::Read;
use std::sync::Arc;
use tracing::{debug, error, warn};

use super::format::FormatDetector;
use super::identity::IdentityMap;
use super::parser::parser_for;
use super::reconcile::reconcile;
use crate::config::ImportConfig;
use crate::errors::{GradebookError, Result};
use crate::models::gradebook::entities::{Assignment, StudentGradeRow};
use crate::models::imports::entities::{ImportedGradeWrapper, ReconcileReport};

/// 导入失败原因
#[derive(Debug, Clone, PartialEq)]
pub enum ImportFailure {
    /// 声明的 MIME 类型不在识别列表中
    UnsupportedFormat { media_type: String },
    /// 格式可识别但内容无法解析
    MalformedStructure { reason: String },
    /// 读取上传内容失败
    Io { reason: String },
}

impl std::fmt::Display for ImportFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportFailure::UnsupportedFormat { media_type } => {
                write!(f, "不支持的文件类型: {media_type}")
            }
            ImportFailure::MalformedStructure { reason } => write!(f, "文件内容无法解析: {reason}"),
            ImportFailure::Io { reason } => write!(f, "读取上传文件失败: {reason}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImportState {
    Idle,
    Parsing,
    Reconciling,
    Ready(ReconcileReport),
    Failed(ImportFailure),
    Empty,
}

impl ImportState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ImportState::Ready(_) | ImportState::Failed(_) | ImportState::Empty
        )
    }

    fn name(&self) -> &'static str {
        match self {
            ImportState::Idle => "idle",
            ImportState::Parsing => "parsing",
            ImportState::Reconciling => "reconciling",
            ImportState::Ready(_) => "ready",
            ImportState::Failed(_) => "failed",
            ImportState::Empty => "empty",
        }
    }
}

/// 一次导入的最终结果
///
/// `Empty` 表示解析成功但没有任何结果，与 `ParseError` 区分开，
/// 两者对应不同的用户提示。
#[derive(Debug, Clone, PartialEq)]
pub enum ImportOutcome {
    Ready(ReconcileReport),
    Empty,
    ParseError(ImportFailure),
}

/// 一次导入会话，只读引用成绩项与成绩矩阵
pub struct GradeImportSession<'a> {
    assignments: &'a [Assignment],
    matrix: &'a [StudentGradeRow],
    identity: Arc<IdentityMap>,
    detector: FormatDetector,
    state: ImportState,
}

impl<'a> GradeImportSession<'a> {
    /// 从成绩矩阵构建学号映射并创建会话，学号重复时返回错误
    pub fn new(
        assignments: &'a [Assignment],
        matrix: &'a [StudentGradeRow],
        config: &ImportConfig,
    ) -> Result<Self> {
        let identity = IdentityMap::from_matrix(matrix)?;
        Ok(Self::with_identity(
            assignments,
            matrix,
            Arc::new(identity),
            FormatDetector::from_config(config),
        ))
    }

    pub fn with_identity(
        assignments: &'a [Assignment],
        matrix: &'a [StudentGradeRow],
        identity: Arc<IdentityMap>,
        detector: FormatDetector,
    ) -> Self {
        Self {
            assignments,
            matrix,
            identity,
            detector,
            state: ImportState::Idle,
        }
    }

    pub fn state(&self) -> &ImportState {
        &self.state
    }

    pub fn identity(&self) -> &IdentityMap {
        &self.identity
    }

    pub fn reset(&mut self) {
        self.transition(ImportState::Idle);
    }

    /// 提交一次上传
    ///
    /// 解析失败与空结果体现在返回的状态中；只有读取上传内容失败时返回错误。
    pub fn submit<R: Read>(&mut self, mut upload: R, media_type: &str) -> Result<&ImportState> {
        self.reset();

        let mut data = Vec::new();
        if let Err(e) = upload.read_to_end(&mut data) {
            error!("读取上传内容失败: {}", e);
            self.transition(ImportState::Failed(ImportFailure::Io {
                reason: e.to_string(),
            }));
            return Err(GradebookError::from(e));
        }

        self.transition(ImportState::Parsing);
        let wrapper = match self.parse(&data, media_type) {
            Ok(wrapper) => wrapper,
            Err(failure) => {
                warn!("上传文件解析失败: {}", failure);
                self.transition(ImportState::Failed(failure));
                return Ok(&self.state);
            }
        };

        self.transition(ImportState::Reconciling);
        let report = reconcile(&wrapper, self.assignments, self.matrix, &self.identity);

        if report.is_empty() {
            self.transition(ImportState::Empty);
        } else {
            self.transition(ImportState::Ready(report));
        }
        Ok(&self.state)
    }

    /// 取出终态对应的结果，非终态返回 None
    pub fn into_outcome(self) -> Option<ImportOutcome> {
        match self.state {
            ImportState::Ready(report) => Some(ImportOutcome::Ready(report)),
            ImportState::Empty => Some(ImportOutcome::Empty),
            ImportState::Failed(failure) => Some(ImportOutcome::ParseError(failure)),
            _ => None,
        }
    }

    fn parse(
        &self,
        data: &[u8],
        media_type: &str,
    ) -> std::result::Result<ImportedGradeWrapper, ImportFailure> {
        let format = self.detector.detect(media_type);
        let Some(parser) = parser_for(format) else {
            return Err(ImportFailure::UnsupportedFormat {
                media_type: media_type.to_string(),
            });
        };

        if !format.accepts_payload(data) {
            return Err(ImportFailure::MalformedStructure {
                reason: format!("文件内容与声明的类型 {media_type} 不匹配"),
            });
        }

        debug!("使用 {} 解析器处理 {} 字节", format, data.len());
        parser
            .parse(data)
            .map_err(|e| ImportFailure::MalformedStructure {
                reason: e.message().to_string(),
            })
    }

    fn transition(&mut self, next: ImportState) {
        debug!("导入状态: {} -> {}", self.state.name(), next.name());
        self.state = next;
    }
}

/// 一次性完成导入：识别格式、解析、对比
pub fn reconcile_upload<R: Read>(
    upload: R,
    media_type: &str,
    identity: Arc<IdentityMap>,
    assignments: &[Assignment],
    matrix: &[StudentGradeRow],
    config: &ImportConfig,
) -> Result<ImportOutcome> {
    let mut session = GradeImportSession::with_identity(
        assignments,
        matrix,
        identity,
        FormatDetector::from_config(config),
    );
    session.submit(upload, media_type)?;
    session
        .into_outcome()
        .ok_or_else(|| GradebookError::validation("导入流程未进入终态"))
}
