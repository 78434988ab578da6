//! 诊断收集

use super::error::Diagnostic;
use tracing::trace;

/// 诊断报告器
///
/// 推断过程把诊断逐条推送给外部协作者，自身不关心其去向。
pub trait ErrorReporter {
    fn report(
        &mut self,
        diagnostic: Diagnostic,
    );
}

/// 默认报告器：按顺序收集诊断，可选数量上限
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    limit: Option<usize>,
    suppressed: usize,
}

impl DiagnosticCollector {
    /// 创建不限数量的收集器
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建带上限的收集器，超出部分只计数
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// 已保存的错误级诊断数量
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity.is_error())
            .count()
    }

    /// 因超出上限而丢弃的诊断数量
    pub fn suppressed(&self) -> usize {
        self.suppressed
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0 || self.suppressed > 0
    }
}

impl ErrorReporter for DiagnosticCollector {
    fn report(
        &mut self,
        diagnostic: Diagnostic,
    ) {
        if let Some(limit) = self.limit {
            if self.diagnostics.len() >= limit {
                self.suppressed += 1;
                trace!("suppressed diagnostic {}", diagnostic.code);
                return;
            }
        }
        self.diagnostics.push(diagnostic);
    }
}
