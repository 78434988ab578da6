//! 推断遍历
//!
//! - declarations: 编译单元的分阶段处理、函数、类型定义、类型类
//! - statements: 语句与语句块
//! - expressions: 三种上下文中的表达式

mod declarations;
mod expressions;
mod statements;

use crate::frontend::core::ast::FunctionDefinition;
use crate::frontend::core::type_system::Type;

/// 函数签名：参数类型、结果类型和整体函数类型
#[derive(Debug, Clone)]
pub(crate) struct Signature {
    pub parameters: Vec<Type>,
    pub result: Type,
    pub ty: Type,
}

/// 顶层函数的检查进度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FunctionState {
    /// 只有签名
    Pending,
    /// 函数体正在检查
    InProgress,
    /// 函数体已检查，等待所在的互相递归组一起泛化
    Awaiting,
    /// 已泛化
    Done,
}

/// 顶层函数
///
/// 函数体在第一次被引用时检查（或在源码顺序轮到它时），
/// 互相递归的一组函数检查完毕后才一起泛化。
#[derive(Debug, Clone)]
pub(crate) struct TopLevelFunction {
    pub definition: FunctionDefinition,
    pub signature: Signature,
    pub state: FunctionState,
    /// 当前绑定类型：泛化前是签名类型，泛化后是泛化类型
    pub ty: Type,
    /// 访问序号与能到达的最小序号
    pub index: usize,
    pub low: usize,
}
