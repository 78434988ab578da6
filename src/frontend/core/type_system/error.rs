//! 类型系统错误定义
//!
//! - `InternalError`：内部一致性被破坏，是编译器自身的缺陷，立即中止分析
//! - `UnificationFailure`：结构不匹配，收集后返回给调用方

use super::mono::Type;
use super::var::{StoreId, TypeVariable};
use crate::frontend::core::ast::NodeId;
use thiserror::Error;

/// 内部一致性错误
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InternalError {
    #[error("type variable {index} belongs to {found}, not {expected}")]
    ForeignVariable {
        index: usize,
        expected: StoreId,
        found: StoreId,
    },

    #[error("type variable {index} is out of range (store holds {len} variables)")]
    VariableOutOfRange { index: usize, len: usize },

    #[error("type variable {index} is already bound")]
    AlreadyBound { index: usize },

    #[error("type constructor {name} already declared")]
    DuplicateTypeConstructor { name: String },

    #[error("type constructor {name} was never declared")]
    UndeclaredTypeConstructor { name: String },

    #[error("invalid arity for {name}: expected {expected} arguments, found {found}")]
    InvalidArity {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("expected a type expression, found type variable {var}")]
    NotATypeExpression { var: TypeVariable },

    #[error("expected a {expected} type, found {found}")]
    UnexpectedConstructor {
        expected: &'static str,
        found: String,
    },

    #[error("annotation of node {node} written twice")]
    AnnotationAlreadySet { node: NodeId },
}

/// 内部结果类型
pub type InternalResult<T> = Result<T, InternalError>;

/// 合一失败（可恢复）
///
/// 记录的是解析之后的两侧类型。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnificationFailure {
    /// 构造器或元数不同
    TypeMismatch { left: Type, right: Type },
    /// 变量出现在要绑定的类型内部
    RecursiveType { variable: TypeVariable, ty: Type },
}
