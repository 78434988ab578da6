//! Core algorithm layer
//!
//! - ast: 外部解析器交付的语法树
//! - type_system: 类型表示、存储与合一

pub mod ast;
pub mod type_system;

#[cfg(test)]
mod tests;
