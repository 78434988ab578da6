//! 用户可见的类型错误
//!
//! 每个错误有稳定的错误码，转换成诊断后交给报告器。

use super::ExpressionContext;
use crate::util::diagnostic::Diagnostic;
use crate::util::span::Span;
use thiserror::Error;

/// 类型错误
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    /// 合一时构造器或元数不同
    #[error("type mismatch: `{left}` is not compatible with `{right}`")]
    TypeMismatch { left: String, right: String },

    /// 出现检查失败
    #[error("recursive type: `{variable}` occurs in `{ty}`")]
    RecursiveType { variable: String, ty: String },

    #[error("unknown identifier `{name}`")]
    UnknownIdentifier { name: String },

    #[error("{what} is not supported in {context} context")]
    UnsupportedExpression {
        what: String,
        context: ExpressionContext,
    },

    /// 类型构造器参数个数不对
    #[error("`{name}` expects {expected} type arguments, found {found}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("`{owner}` has no member `{member}`")]
    UnknownMember { owner: String, member: String },

    /// 名字用在了错误的上下文中
    #[error("`{name}` names a {found}, but a {expected} is expected here")]
    ContextMismatch {
        name: String,
        expected: ExpressionContext,
        found: ExpressionContext,
    },

    #[error("`{name}` is already declared")]
    DuplicateDeclaration { name: String },
}

impl TypeError {
    /// 错误码
    pub fn code(&self) -> &'static str {
        match self {
            TypeError::TypeMismatch { .. } => "E2001",
            TypeError::RecursiveType { .. } => "E2002",
            TypeError::UnknownIdentifier { .. } => "E2003",
            TypeError::UnsupportedExpression { .. } => "E2004",
            TypeError::ArityMismatch { .. } => "E2005",
            TypeError::UnknownMember { .. } => "E2006",
            TypeError::ContextMismatch { .. } => "E2007",
            TypeError::DuplicateDeclaration { .. } => "E2008",
        }
    }

    /// 转换为诊断；哑位置不附带
    pub fn into_diagnostic(
        self,
        span: Span,
    ) -> Diagnostic {
        let span = (!span.is_dummy()).then_some(span);
        Diagnostic::error(self.code(), self.to_string(), span)
    }
}
