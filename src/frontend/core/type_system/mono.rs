//! 类型定义
//!
//! 类型是一个封闭的和类型：要么是类型变量，要么是类型构造器应用到
//! 一组参数上。构造器要么引用用户声明，要么是内置构造器标签。

use super::var::TypeVariable;
use crate::frontend::core::ast::NodeId;
use std::fmt;

/// 类型
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Variable(TypeVariable),
    Expression(TypeExpression),
}

impl Type {
    pub fn as_variable(&self) -> Option<&TypeVariable> {
        match self {
            Type::Variable(var) => Some(var),
            Type::Expression(_) => None,
        }
    }

    pub fn as_expression(&self) -> Option<&TypeExpression> {
        match self {
            Type::Expression(expr) => Some(expr),
            Type::Variable(_) => None,
        }
    }

    /// 是否是指定内置构造器的应用（不解析变量）
    pub fn is_builtin(
        &self,
        builtin: BuiltinType,
    ) -> bool {
        matches!(
            self,
            Type::Expression(TypeExpression {
                constructor: TypeConstructor::Builtin(b),
                ..
            }) if *b == builtin
        )
    }
}

impl From<TypeVariable> for Type {
    fn from(var: TypeVariable) -> Self {
        Type::Variable(var)
    }
}

impl From<TypeExpression> for Type {
    fn from(expr: TypeExpression) -> Self {
        Type::Expression(expr)
    }
}

/// 类型构造器应用
///
/// 参数个数必须等于构造器声明的元数；只能通过 `TypeSystem` 构造。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeExpression {
    pub constructor: TypeConstructor,
    pub arguments: Vec<Type>,
}

/// 类型构造器
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeConstructor {
    /// 用户声明的名义类型
    Declaration(DeclarationRef),
    Builtin(BuiltinType),
}

impl fmt::Display for TypeConstructor {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            TypeConstructor::Declaration(decl) => write!(f, "{}", decl.name),
            TypeConstructor::Builtin(builtin) => write!(f, "{}", builtin.default_name()),
        }
    }
}

/// 声明引用：按节点身份比较，名字只用于显示
#[derive(Debug, Clone)]
pub struct DeclarationRef {
    pub id: NodeId,
    pub name: String,
}

impl DeclarationRef {
    pub fn new(
        id: NodeId,
        name: impl Into<String>,
    ) -> Self {
        DeclarationRef {
            id,
            name: name.into(),
        }
    }
}

impl PartialEq for DeclarationRef {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.id == other.id
    }
}

impl Eq for DeclarationRef {}

impl std::hash::Hash for DeclarationRef {
    fn hash<H: std::hash::Hasher>(
        &self,
        state: &mut H,
    ) {
        self.id.hash(state);
    }
}

/// 类型类
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeClass(pub DeclarationRef);

impl TypeClass {
    pub fn name(&self) -> &str {
        &self.0.name
    }
}

/// 内置类型构造器标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BuiltinType {
    Void,
    /// 函数：定义域、值域
    Function,
    Unit,
    /// 元组的 cons 单元
    Pair,
    /// 机器字
    Word,
    Integer,
    Bool,
}

impl BuiltinType {
    pub const ALL: [BuiltinType; 7] = [
        BuiltinType::Void,
        BuiltinType::Function,
        BuiltinType::Unit,
        BuiltinType::Pair,
        BuiltinType::Word,
        BuiltinType::Integer,
        BuiltinType::Bool,
    ];

    /// 标准注册时使用的名字
    pub fn default_name(&self) -> &'static str {
        match self {
            BuiltinType::Void => "Void",
            BuiltinType::Function => "Function",
            BuiltinType::Unit => "Unit",
            BuiltinType::Pair => "Pair",
            BuiltinType::Word => "Word",
            BuiltinType::Integer => "Integer",
            BuiltinType::Bool => "Bool",
        }
    }

    /// 标准注册时使用的元数
    pub fn default_arity(&self) -> usize {
        match self {
            BuiltinType::Function | BuiltinType::Pair => 2,
            _ => 0,
        }
    }
}
