//! Abstract Syntax Tree types
//!
//! 语法树由外部解析器构建后交给类型推断。每个声明和表达式都带有
//! 稳定的 [`NodeId`]，推断结果按节点身份（而不是结构内容）记录。

use crate::util::span::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod builder;

pub use builder::AstBuilder;

/// 节点身份
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 编译单元
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceUnit {
    pub declarations: Vec<Declaration>,
}

/// 顶层声明
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Declaration {
    Function(FunctionDefinition),
    TypeDefinition(TypeDefinition),
    TypeClass(TypeClassDefinition),
    Instantiation(TypeClassInstantiation),
}

/// 函数定义
///
/// 没有函数体的定义只出现在类型类中，表示成员签名。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub id: NodeId,
    #[serde(default)]
    pub span: Span,
    pub name: String,
    pub parameters: Vec<VariableDeclaration>,
    #[serde(default)]
    pub return_type: Option<Expression>,
    #[serde(default)]
    pub body: Option<Block>,
}

/// 变量声明（局部变量、参数、类型参数）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableDeclaration {
    pub id: NodeId,
    #[serde(default)]
    pub span: Span,
    pub name: String,
    /// 类型标注，处于类型上下文
    #[serde(default)]
    pub type_name: Option<Expression>,
}

/// 类型定义：`type T(a, b) = underlying;`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDefinition {
    pub id: NodeId,
    #[serde(default)]
    pub span: Span,
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<VariableDeclaration>,
    #[serde(default)]
    pub underlying: Option<Expression>,
}

/// 类型类定义：`class self: C { ... }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeClassDefinition {
    pub id: NodeId,
    #[serde(default)]
    pub span: Span,
    pub name: String,
    pub type_variable: VariableDeclaration,
    #[serde(default)]
    pub functions: Vec<FunctionDefinition>,
}

/// 类型类实例：`instantiation T(S1, S2): C { ... }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeClassInstantiation {
    pub id: NodeId,
    #[serde(default)]
    pub span: Span,
    /// 被实例化的类型构造器，处于类型上下文
    pub type_constructor: Expression,
    /// 构造器参数的类别，处于类别上下文
    #[serde(default)]
    pub argument_sorts: Vec<Expression>,
    /// 目标类型类，处于类别上下文
    pub class: Expression,
    #[serde(default)]
    pub functions: Vec<FunctionDefinition>,
}

/// 语句块
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Block {
    #[serde(default)]
    pub span: Span,
    pub statements: Vec<Statement>,
}

/// 语句
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Statement {
    Block(Block),
    VariableDeclaration(VariableDeclarationStatement),
    Expression(ExpressionStatement),
    Return(Return),
    InlineAssembly(InlineAssembly),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableDeclarationStatement {
    #[serde(default)]
    pub span: Span,
    pub declaration: VariableDeclaration,
    #[serde(default)]
    pub initial_value: Option<Expression>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpressionStatement {
    #[serde(default)]
    pub span: Span,
    pub expression: Expression,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Return {
    #[serde(default)]
    pub span: Span,
    #[serde(default)]
    pub expression: Option<Expression>,
}

/// 内联汇编块，只关心它引用的外部变量
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InlineAssembly {
    #[serde(default)]
    pub span: Span,
    pub external_references: Vec<Expression>,
}

/// 表达式
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expression {
    pub id: NodeId,
    #[serde(default)]
    pub span: Span,
    pub kind: ExpressionKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ExpressionKind {
    Identifier(String),
    /// `a.b.c`
    IdentifierPath(Vec<String>),
    ElementaryTypeName(ElementaryTypeName),
    Literal(Literal),
    Tuple(Vec<Expression>),
    Call {
        callee: Box<Expression>,
        arguments: Vec<Expression>,
    },
    MemberAccess {
        expression: Box<Expression>,
        member: String,
    },
    BinaryOperation {
        operator: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Assignment {
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },
}

/// 内置类型名
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementaryTypeName {
    Void,
    Word,
    Integer,
    Bool,
    Unit,
    Pair,
    Fun,
}

impl fmt::Display for ElementaryTypeName {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let name = match self {
            ElementaryTypeName::Void => "void",
            ElementaryTypeName::Word => "word",
            ElementaryTypeName::Integer => "integer",
            ElementaryTypeName::Bool => "bool",
            ElementaryTypeName::Unit => "unit",
            ElementaryTypeName::Pair => "pair",
            ElementaryTypeName::Fun => "fun",
        };
        write!(f, "{}", name)
    }
}

/// 字面量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Number(String),
    Bool(bool),
}

/// 二元运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Neq,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    /// `a -> b`，只在类型上下文中有意义
    Arrow,
}

impl BinaryOperator {
    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Add
                | BinaryOperator::Sub
                | BinaryOperator::Mul
                | BinaryOperator::Div
                | BinaryOperator::Mod
        )
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Eq
                | BinaryOperator::Neq
                | BinaryOperator::Lt
                | BinaryOperator::Le
                | BinaryOperator::Gt
                | BinaryOperator::Ge
        )
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOperator::And | BinaryOperator::Or)
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let symbol = match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Mod => "%",
            BinaryOperator::Eq => "==",
            BinaryOperator::Neq => "!=",
            BinaryOperator::Lt => "<",
            BinaryOperator::Le => "<=",
            BinaryOperator::Gt => ">",
            BinaryOperator::Ge => ">=",
            BinaryOperator::And => "&&",
            BinaryOperator::Or => "||",
            BinaryOperator::Arrow => "->",
        };
        write!(f, "{}", symbol)
    }
}
