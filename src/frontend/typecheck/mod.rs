//! 类型推断
//!
//! 在外部解析器交付的语法树上做一次 Hindley-Milner 推断：
//! - 按声明分阶段收集：类型定义、类型类、函数签名，然后才检查函数体
//! - 表达式在项（Term）、类型（Type）、类别（Sort）三种上下文中推断
//! - 每个被访问的节点恰好写入一次注解
//! - 合一失败逐条报告给外部报告器，推断继续进行
//!
//! 内部一致性错误（[`InternalError`]）立即中止整次推断。

use std::collections::HashMap;
use std::fmt;

use crate::frontend::core::ast::{NodeId, SourceUnit};
use crate::frontend::core::type_system::{
    InternalError, InternalResult, Type, TypeSystem, TypeSystemHelpers, UnificationFailure,
};
use crate::util::config::InferenceSettings;
use crate::util::diagnostic::ErrorReporter;
use crate::util::span::Span;
use tracing::{debug, trace};

pub mod env;
pub mod errors;
pub mod inference;

#[cfg(test)]
mod tests;

pub use env::{Binding, TypeClassInfo, TypeDefinitionInfo, TypeEnvironment};

use inference::TopLevelFunction;
pub use errors::TypeError;

/// 表达式上下文
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpressionContext {
    /// 普通值表达式
    Term,
    /// 类型标注位置，表达式的"类型"就是它所表示的类型
    Type,
    /// 类型类位置
    Sort,
}

impl fmt::Display for ExpressionContext {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            ExpressionContext::Term => write!(f, "term"),
            ExpressionContext::Type => write!(f, "type"),
            ExpressionContext::Sort => write!(f, "sort"),
        }
    }
}

/// 节点注解
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Annotation {
    pub ty: Option<Type>,
}

/// 按节点身份索引的注解表（每个节点只写一次）
#[derive(Debug, Clone, Default)]
pub struct Annotations {
    entries: HashMap<NodeId, Annotation>,
}

impl Annotations {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入注解，重复写入是内部错误
    pub fn set(
        &mut self,
        node: NodeId,
        ty: Type,
    ) -> InternalResult<()> {
        let entry = self.entries.entry(node).or_default();
        if entry.ty.is_some() {
            return Err(InternalError::AnnotationAlreadySet { node });
        }
        entry.ty = Some(ty);
        Ok(())
    }

    pub fn get(
        &self,
        node: NodeId,
    ) -> Option<&Annotation> {
        self.entries.get(&node)
    }

    pub fn type_of(
        &self,
        node: NodeId,
    ) -> Option<&Type> {
        self.entries.get(&node).and_then(|a| a.ty.as_ref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 按节点身份排序的 (节点, 类型) 列表
    pub fn sorted(&self) -> Vec<(NodeId, &Type)> {
        let mut entries: Vec<_> = self
            .entries
            .iter()
            .filter_map(|(node, a)| a.ty.as_ref().map(|ty| (*node, ty)))
            .collect();
        entries.sort_by_key(|(node, _)| *node);
        entries
    }
}

/// 类型推断器
///
/// 拥有本次推断的类型存储和注解表；诊断写入外部报告器。
pub struct TypeInference<'a> {
    settings: InferenceSettings,
    type_system: TypeSystem,
    annotations: Annotations,
    env: TypeEnvironment,
    reporter: &'a mut dyn ErrorReporter,
    /// 已报告的诊断数
    error_count: usize,
    /// 顶层函数，按声明节点索引
    functions: HashMap<NodeId, TopLevelFunction>,
    /// 检查中或等待泛化的顶层函数，按访问顺序
    function_stack: Vec<NodeId>,
    /// 正在检查函数体的顶层函数，最内层在最后
    active_functions: Vec<NodeId>,
    next_function_index: usize,
}

impl<'a> TypeInference<'a> {
    /// 创建推断器，类型存储预先声明全部内置类型
    pub fn new(
        settings: InferenceSettings,
        reporter: &'a mut dyn ErrorReporter,
    ) -> InternalResult<Self> {
        Ok(Self {
            settings,
            type_system: TypeSystem::with_builtins()?,
            annotations: Annotations::new(),
            env: TypeEnvironment::new(),
            reporter,
            error_count: 0,
            functions: HashMap::new(),
            function_stack: Vec::new(),
            active_functions: Vec::new(),
            next_function_index: 0,
        })
    }

    /// 推断整个编译单元
    pub fn infer(
        &mut self,
        unit: &SourceUnit,
    ) -> InternalResult<()> {
        debug!("Inferring {} declarations", unit.declarations.len());
        self.infer_source_unit(unit)?;
        debug!(
            "Inference finished: {} type variables, {} diagnostics",
            self.type_system.variable_count(),
            self.error_count
        );
        Ok(())
    }

    pub fn type_system(&self) -> &TypeSystem {
        &self.type_system
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// 取出类型存储和注解表
    pub fn into_parts(self) -> (TypeSystem, Annotations) {
        (self.type_system, self.annotations)
    }

    // ---- 内部工具 ----

    fn helpers(&self) -> TypeSystemHelpers<'_> {
        TypeSystemHelpers::new(&self.type_system)
    }

    fn annotate(
        &mut self,
        node: NodeId,
        ty: Type,
    ) -> InternalResult<()> {
        self.annotations.set(node, ty)
    }

    fn report(
        &mut self,
        error: TypeError,
        span: Span,
    ) {
        trace!("type error at {}: {}", span, error);
        self.error_count += 1;
        self.reporter.report(error.into_diagnostic(span));
    }

    /// 报告错误并返回一个新的非泛型变量，避免后续级联错误
    fn recover(
        &mut self,
        error: TypeError,
        span: Span,
    ) -> Type {
        self.report(error, span);
        self.type_system.fresh_type_variable(false)
    }

    /// 合一并把每个失败报告为一条诊断；返回是否成功
    fn unify_and_report(
        &mut self,
        a: &Type,
        b: &Type,
        span: Span,
    ) -> InternalResult<bool> {
        let failures = self.type_system.unify(a, b)?;
        let ok = failures.is_empty();
        for failure in failures {
            let error = match failure {
                UnificationFailure::TypeMismatch { left, right } => TypeError::TypeMismatch {
                    left: self.type_system.type_to_string(&left)?,
                    right: self.type_system.type_to_string(&right)?,
                },
                UnificationFailure::RecursiveType { variable, ty } => TypeError::RecursiveType {
                    variable: variable.to_string(),
                    ty: self.type_system.type_to_string(&ty)?,
                },
            };
            self.report(error, span);
        }
        Ok(ok)
    }
}
