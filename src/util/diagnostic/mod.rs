//! 统一诊断系统
//!
//! 类型推断只负责产生诊断，不负责格式化或持久化：
//!
//! - [`error`] - 诊断数据结构 (Diagnostic, Severity)
//! - [`collect`] - 报告器接口与默认收集器
//! - [`emitter`] - 文本渲染（CLI 使用）

pub mod collect;
pub mod emitter;
pub mod error;

// 重新导出
pub use collect::{DiagnosticCollector, ErrorReporter};
pub use emitter::render;
pub use error::{Diagnostic, Severity};
