//! 类型存储
//!
//! 持有类型变量的替换表、类型构造器注册表以及（尚未生效的）类型类
//! 实例登记。一次分析只有一个存储，所有变量随存储一起释放。
//!
//! 替换表只会从"未绑定"单调地变为"已绑定"，绑定后不再修改。

use super::error::{InternalError, InternalResult, UnificationFailure};
use super::mono::{BuiltinType, DeclarationRef, Type, TypeClass, TypeConstructor, TypeExpression};
use super::var::{StoreId, TypeVariable};
use std::collections::HashMap;
use tracing::trace;

/// 类型构造器信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeConstructorInfo {
    pub name: String,
    pub arity: usize,
}

/// 类型类实例登记：构造器在给定参数类别下满足某个类型类
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassInstantiation {
    pub constructor: TypeConstructor,
    pub argument_sorts: Vec<TypeClass>,
    pub class: TypeClass,
}

/// 类型存储
#[derive(Debug)]
pub struct TypeSystem {
    id: StoreId,
    /// 替换表，按变量索引
    type_variables: Vec<Option<Type>>,
    type_constructors: HashMap<TypeConstructor, TypeConstructorInfo>,
    class_instantiations: Vec<ClassInstantiation>,
}

impl Default for TypeSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeSystem {
    /// 创建空存储（未声明任何内置类型）
    pub fn new() -> Self {
        TypeSystem {
            id: StoreId::fresh(),
            type_variables: Vec::new(),
            type_constructors: HashMap::new(),
            class_instantiations: Vec::new(),
        }
    }

    /// 创建存储并按标准名字和元数声明全部内置类型
    pub fn with_builtins() -> InternalResult<Self> {
        let mut system = Self::new();
        for builtin in BuiltinType::ALL {
            system.declare_builtin_type(builtin, builtin.default_name(), builtin.default_arity())?;
        }
        Ok(system)
    }

    pub fn id(&self) -> StoreId {
        self.id
    }

    /// 已分配的类型变量数量
    pub fn variable_count(&self) -> usize {
        self.type_variables.len()
    }

    // ---- 类型变量 ----

    /// 分配新的未绑定变量
    pub fn fresh_type_variable(
        &mut self,
        generic: bool,
    ) -> Type {
        let index = self.type_variables.len();
        self.type_variables.push(None);
        Type::Variable(TypeVariable::new(self.id, index, generic))
    }

    /// 校验变量属于本存储且索引有效
    pub fn validate(
        &self,
        var: &TypeVariable,
    ) -> InternalResult<()> {
        if var.store() != self.id {
            return Err(InternalError::ForeignVariable {
                index: var.index(),
                expected: self.id,
                found: var.store(),
            });
        }
        if var.index() >= self.type_variables.len() {
            return Err(InternalError::VariableOutOfRange {
                index: var.index(),
                len: self.type_variables.len(),
            });
        }
        Ok(())
    }

    /// 沿替换链查找，直到未绑定变量或类型表达式
    pub fn resolve(
        &self,
        ty: &Type,
    ) -> InternalResult<Type> {
        let mut result = ty.clone();
        loop {
            let next = match &result {
                Type::Variable(var) => {
                    self.validate(var)?;
                    self.type_variables[var.index()].clone()
                }
                Type::Expression(_) => None,
            };
            match next {
                Some(bound) => result = bound,
                None => return Ok(result),
            }
        }
    }

    /// 递归解析所有参数
    pub fn resolve_fully(
        &self,
        ty: &Type,
    ) -> InternalResult<Type> {
        match self.resolve(ty)? {
            Type::Expression(expr) => {
                let arguments = expr
                    .arguments
                    .iter()
                    .map(|arg| self.resolve_fully(arg))
                    .collect::<InternalResult<Vec<_>>>()?;
                Ok(Type::Expression(TypeExpression {
                    constructor: expr.constructor,
                    arguments,
                }))
            }
            var => Ok(var),
        }
    }

    /// 绑定变量（只允许一次）
    pub fn instantiate(
        &mut self,
        var: &TypeVariable,
        ty: Type,
    ) -> InternalResult<()> {
        self.validate(var)?;
        let slot = &mut self.type_variables[var.index()];
        if slot.is_some() {
            return Err(InternalError::AlreadyBound { index: var.index() });
        }
        trace!("bind {} := {:?}", var, ty);
        *slot = Some(ty);
        Ok(())
    }

    // ---- 合一 ----

    /// 合一两个类型
    ///
    /// 不在第一个不匹配处停止：同一构造器下的每个参数位置都会尝试，
    /// 返回全部失败。内部一致性错误则立即返回 `Err`。
    pub fn unify(
        &mut self,
        a: &Type,
        b: &Type,
    ) -> InternalResult<Vec<UnificationFailure>> {
        let mut failures = Vec::new();
        self.unify_into(a, b, &mut failures)?;
        Ok(failures)
    }

    fn unify_into(
        &mut self,
        a: &Type,
        b: &Type,
        failures: &mut Vec<UnificationFailure>,
    ) -> InternalResult<()> {
        let a = self.resolve(a)?;
        let b = self.resolve(b)?;
        match (&a, &b) {
            (Type::Variable(left), Type::Variable(right)) => {
                self.validate(left)?;
                self.validate(right)?;
                if left.index() != right.index() {
                    self.instantiate(left, b.clone())?;
                }
            }
            (Type::Variable(var), Type::Expression(_)) => {
                self.bind_checked(var, &b, failures)?;
            }
            (Type::Expression(_), Type::Variable(var)) => {
                self.bind_checked(var, &a, failures)?;
            }
            (Type::Expression(left), Type::Expression(right)) => {
                if left.constructor != right.constructor
                    || left.arguments.len() != right.arguments.len()
                {
                    trace!("unification failure: {:?} vs {:?}", a, b);
                    failures.push(UnificationFailure::TypeMismatch {
                        left: a.clone(),
                        right: b.clone(),
                    });
                    return Ok(());
                }
                for (l, r) in left.arguments.iter().zip(right.arguments.iter()) {
                    self.unify_into(l, r, failures)?;
                }
            }
        }
        Ok(())
    }

    /// 带出现检查的绑定
    fn bind_checked(
        &mut self,
        var: &TypeVariable,
        ty: &Type,
        failures: &mut Vec<UnificationFailure>,
    ) -> InternalResult<()> {
        if self.occurs(var, ty)? {
            trace!("occurs check: {} in {:?}", var, ty);
            failures.push(UnificationFailure::RecursiveType {
                variable: *var,
                ty: ty.clone(),
            });
            return Ok(());
        }
        self.instantiate(var, ty.clone())
    }

    /// 变量是否出现在类型内部
    fn occurs(
        &self,
        var: &TypeVariable,
        ty: &Type,
    ) -> InternalResult<bool> {
        match self.resolve(ty)? {
            Type::Variable(other) => Ok(other.index() == var.index()),
            Type::Expression(expr) => {
                for arg in &expr.arguments {
                    if self.occurs(var, arg)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }

    // ---- 构造器注册表 ----

    /// 声明内置类型构造器，重复声明是内部错误
    pub fn declare_builtin_type(
        &mut self,
        builtin: BuiltinType,
        name: impl Into<String>,
        arity: usize,
    ) -> InternalResult<()> {
        self.declare(TypeConstructor::Builtin(builtin), name.into(), arity)
    }

    /// 声明用户名义类型构造器
    pub fn declare_type_constructor(
        &mut self,
        declaration: DeclarationRef,
        arity: usize,
    ) -> InternalResult<()> {
        let name = declaration.name.clone();
        self.declare(TypeConstructor::Declaration(declaration), name, arity)
    }

    fn declare(
        &mut self,
        constructor: TypeConstructor,
        name: String,
        arity: usize,
    ) -> InternalResult<()> {
        if self.type_constructors.contains_key(&constructor) {
            return Err(InternalError::DuplicateTypeConstructor { name });
        }
        self.type_constructors
            .insert(constructor, TypeConstructorInfo { name, arity });
        Ok(())
    }

    pub fn constructor_info(
        &self,
        constructor: &TypeConstructor,
    ) -> InternalResult<&TypeConstructorInfo> {
        self.type_constructors.get(constructor).ok_or_else(|| {
            InternalError::UndeclaredTypeConstructor {
                name: constructor.to_string(),
            }
        })
    }

    /// 内置类型的注册名
    pub fn builtin_type_name(
        &self,
        builtin: BuiltinType,
    ) -> InternalResult<&str> {
        Ok(&self
            .constructor_info(&TypeConstructor::Builtin(builtin))?
            .name)
    }

    /// 构造内置类型，参数个数必须与元数一致
    pub fn builtin_type(
        &self,
        builtin: BuiltinType,
        arguments: Vec<Type>,
    ) -> InternalResult<Type> {
        self.type_expression(TypeConstructor::Builtin(builtin), arguments)
    }

    /// 构造任意已声明构造器的应用
    pub fn type_expression(
        &self,
        constructor: TypeConstructor,
        arguments: Vec<Type>,
    ) -> InternalResult<Type> {
        let info = self.constructor_info(&constructor)?;
        if info.arity != arguments.len() {
            return Err(InternalError::InvalidArity {
                name: info.name.clone(),
                expected: info.arity,
                found: arguments.len(),
            });
        }
        Ok(Type::Expression(TypeExpression {
            constructor,
            arguments,
        }))
    }

    // ---- 泛化 ----

    /// 结构复制，按需替换变量
    ///
    /// `generalize` 为真或变量自身带泛型标记时换成新分配的泛型变量；
    /// 同一次调用中同一个源变量的所有出现共享一个替换。
    pub fn fresh(
        &mut self,
        ty: &Type,
        generalize: bool,
    ) -> InternalResult<Type> {
        let mut mapping: HashMap<usize, Type> = HashMap::new();
        self.fresh_impl(ty, generalize, &mut mapping)
    }

    fn fresh_impl(
        &mut self,
        ty: &Type,
        generalize: bool,
        mapping: &mut HashMap<usize, Type>,
    ) -> InternalResult<Type> {
        match self.resolve(ty)? {
            Type::Expression(expr) => {
                let arguments = expr
                    .arguments
                    .iter()
                    .map(|arg| self.fresh_impl(arg, generalize, mapping))
                    .collect::<InternalResult<Vec<_>>>()?;
                Ok(Type::Expression(TypeExpression {
                    constructor: expr.constructor,
                    arguments,
                }))
            }
            Type::Variable(var) => {
                self.validate(&var)?;
                if !(generalize || var.is_generic()) {
                    return Ok(Type::Variable(var));
                }
                if let Some(existing) = mapping.get(&var.index()) {
                    return Ok(existing.clone());
                }
                let replacement = self.fresh_type_variable(true);
                mapping.insert(var.index(), replacement.clone());
                Ok(replacement)
            }
        }
    }

    // ---- 类型类 ----

    /// 登记构造器满足类型类的意图
    ///
    /// 目前只做记录，不参与合一。
    pub fn instantiate_class(
        &mut self,
        constructor: TypeConstructor,
        argument_sorts: Vec<TypeClass>,
        class: TypeClass,
    ) {
        trace!("class instantiation {} : {}", constructor, class.name());
        self.class_instantiations.push(ClassInstantiation {
            constructor,
            argument_sorts,
            class,
        });
    }

    pub fn class_instantiations(&self) -> &[ClassInstantiation] {
        &self.class_instantiations
    }
}
