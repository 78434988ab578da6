//! 类型环境
//!
//! 作用域栈：最外层是全局作用域，函数体、语句块、类型定义各自压入新作用域。

use indexmap::IndexMap;

use super::ExpressionContext;
use crate::frontend::core::ast::NodeId;
use crate::frontend::core::type_system::{DeclarationRef, Type, TypeClass};

/// 类型定义信息
#[derive(Debug, Clone)]
pub struct TypeDefinitionInfo {
    pub declaration: DeclarationRef,
    /// 类型参数（泛型变量）
    pub parameters: Vec<Type>,
    /// 底层类型；不透明类型没有
    pub underlying: Option<Type>,
}

/// 类型类信息
#[derive(Debug, Clone)]
pub struct TypeClassInfo {
    pub class: TypeClass,
    /// 类型类的泛型类型变量
    pub type_variable: Type,
    /// 成员签名，保持声明顺序
    ///
    /// 每个成员存为 `类型类变量 -> 成员类型` 并整体泛化，
    /// 使用时一次实例化即可得到一致的类型类变量和成员类型。
    pub members: IndexMap<String, Type>,
}

/// 名字绑定
#[derive(Debug, Clone)]
pub enum Binding {
    /// 局部变量或参数，直接使用其类型
    Variable(Type),
    /// 顶层函数，每次使用时实例化
    Function { declaration: NodeId, ty: Type },
    /// 类型参数
    TypeVariable(Type),
    TypeDefinition(TypeDefinitionInfo),
    TypeClass(TypeClassInfo),
}

impl Binding {
    /// 名字所属的上下文
    pub fn context(&self) -> ExpressionContext {
        match self {
            Binding::Variable(_) | Binding::Function { .. } => ExpressionContext::Term,
            Binding::TypeVariable(_) | Binding::TypeDefinition(_) => ExpressionContext::Type,
            Binding::TypeClass(_) => ExpressionContext::Sort,
        }
    }

    /// 引入该绑定的声明；局部绑定没有
    pub fn declaration(&self) -> Option<NodeId> {
        match self {
            Binding::Variable(_) | Binding::TypeVariable(_) => None,
            Binding::Function { declaration, .. } => Some(*declaration),
            Binding::TypeDefinition(info) => Some(info.declaration.id),
            Binding::TypeClass(info) => Some(info.class.0.id),
        }
    }
}

/// 类型环境
#[derive(Debug)]
pub struct TypeEnvironment {
    scopes: Vec<IndexMap<String, Binding>>,
}

impl Default for TypeEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeEnvironment {
    /// 创建只有全局作用域的环境
    pub fn new() -> Self {
        Self {
            scopes: vec![IndexMap::new()],
        }
    }

    /// 进入新的作用域
    pub fn enter_scope(&mut self) {
        self.scopes.push(IndexMap::new());
    }

    /// 退出当前作用域（全局作用域不会被弹出）
    pub fn exit_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// 在当前作用域绑定名字，返回同一作用域中被覆盖的旧绑定
    pub fn bind(
        &mut self,
        name: impl Into<String>,
        binding: Binding,
    ) -> Option<Binding> {
        self.scopes
            .last_mut()
            .and_then(|scope| scope.insert(name.into(), binding))
    }

    /// 替换全局绑定，仅当该名字仍绑定到同一个声明；返回是否替换
    pub fn rebind_global(
        &mut self,
        name: &str,
        binding: Binding,
    ) -> bool {
        let Some(slot) = self.scopes[0].get_mut(name) else {
            return false;
        };
        let owner = slot.declaration();
        if owner.is_none() || owner != binding.declaration() {
            return false;
        }
        *slot = binding;
        true
    }

    /// 暂时移走全局作用域以外的作用域，在干净的全局环境中检查另一个函数
    pub fn suspend_locals(&mut self) -> Vec<IndexMap<String, Binding>> {
        self.scopes.split_off(1)
    }

    /// 恢复 [`suspend_locals`](Self::suspend_locals) 移走的作用域
    pub fn restore_locals(
        &mut self,
        locals: Vec<IndexMap<String, Binding>>,
    ) {
        self.scopes.truncate(1);
        self.scopes.extend(locals);
    }

    /// 从内到外查找
    pub fn lookup(
        &self,
        name: &str,
    ) -> Option<&Binding> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    /// 全局作用域中是否已有该名字
    pub fn is_declared_globally(
        &self,
        name: &str,
    ) -> bool {
        self.scopes[0].contains_key(name)
    }
}
