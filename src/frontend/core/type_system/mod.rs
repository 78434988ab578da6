//! 类型系统子模块
//!
//! - var: 类型变量与存储身份
//! - mono: 类型、构造器与内置标签
//! - system: 类型存储（解析、绑定、合一、泛化、构造器注册）
//! - helpers: 元组/函数编码
//! - printer: 诊断用的类型打印
//! - error: 内部错误与合一失败

pub mod error;
pub mod helpers;
pub mod mono;
pub mod printer;
pub mod system;
pub mod var;

// 重新导出主要类型
pub use error::{InternalError, InternalResult, UnificationFailure};
pub use helpers::TypeSystemHelpers;
pub use mono::{BuiltinType, DeclarationRef, Type, TypeClass, TypeConstructor, TypeExpression};
pub use system::{ClassInstantiation, TypeConstructorInfo, TypeSystem};
pub use var::{StoreId, TypeVariable};
