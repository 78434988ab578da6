//! 声明推断
//!
//! 编译单元分五个阶段处理，保证前向引用可用：
//! 1. 声明类型构造器，分配类型参数
//! 2. 类型类：类型变量与成员签名
//! 3. 类型定义的底层类型
//! 4. 顶层函数签名
//! 5. 按源码顺序检查函数体和类型类实例
//!
//! 顶层函数体在第一次被引用时就检查，检查完才泛化；
//! 互相递归的一组函数（强连通分量）全部检查完后一起泛化。

use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::{debug, trace};

use super::{FunctionState, Signature, TopLevelFunction};
use crate::frontend::core::ast::{
    Declaration, FunctionDefinition, NodeId, SourceUnit, TypeClassDefinition,
    TypeClassInstantiation, TypeDefinition, VariableDeclaration,
};
use crate::frontend::core::type_system::{
    DeclarationRef, InternalResult, Type, TypeClass, TypeConstructor,
};
use crate::frontend::typecheck::{
    Binding, ExpressionContext, TypeClassInfo, TypeDefinitionInfo, TypeError, TypeInference,
};
use crate::util::span::Span;

impl TypeInference<'_> {
    pub(crate) fn infer_source_unit(
        &mut self,
        unit: &SourceUnit,
    ) -> InternalResult<()> {
        let mut type_definitions: HashMap<NodeId, TypeDefinitionInfo> = HashMap::new();
        for declaration in &unit.declarations {
            if let Declaration::TypeDefinition(definition) = declaration {
                let info = self.declare_type_definition(definition)?;
                type_definitions.insert(definition.id, info);
            }
        }
        debug!("Declared {} type definitions", type_definitions.len());

        for declaration in &unit.declarations {
            if let Declaration::TypeClass(class) = declaration {
                self.infer_type_class(class)?;
            }
        }

        for declaration in &unit.declarations {
            if let Declaration::TypeDefinition(definition) = declaration {
                if let Some(info) = type_definitions.remove(&definition.id) {
                    self.infer_type_definition(definition, info)?;
                }
            }
        }

        for declaration in &unit.declarations {
            if let Declaration::Function(function) = declaration {
                let signature = self.infer_function_signature(function)?;
                self.declare_global(
                    &function.name,
                    Binding::Function {
                        declaration: function.id,
                        ty: signature.ty.clone(),
                    },
                    function.span,
                );
                self.functions.insert(
                    function.id,
                    TopLevelFunction {
                        definition: function.clone(),
                        ty: signature.ty.clone(),
                        signature,
                        state: FunctionState::Pending,
                        index: 0,
                        low: 0,
                    },
                );
            }
        }
        debug!("Collected {} function signatures", self.functions.len());

        for declaration in &unit.declarations {
            match declaration {
                Declaration::Function(function) => {
                    let pending = self
                        .functions
                        .get(&function.id)
                        .is_some_and(|f| f.state == FunctionState::Pending);
                    if pending {
                        self.check_top_level_function(function.id)?;
                    }
                }
                Declaration::Instantiation(instantiation) => {
                    self.infer_instantiation(instantiation)?;
                }
                Declaration::TypeDefinition(_) | Declaration::TypeClass(_) => {}
            }
        }
        Ok(())
    }

    /// 在全局作用域绑定，重名时报告
    fn declare_global(
        &mut self,
        name: &str,
        binding: Binding,
        span: Span,
    ) {
        if self.env.is_declared_globally(name) {
            self.report(
                TypeError::DuplicateDeclaration {
                    name: name.to_string(),
                },
                span,
            );
        }
        self.env.bind(name, binding);
    }

    /// 变量声明的类型：显式标注（类型上下文）或新变量
    pub(super) fn declared_type(
        &mut self,
        declaration: &VariableDeclaration,
    ) -> InternalResult<Type> {
        match &declaration.type_name {
            Some(type_name) => self.infer_expression(type_name, ExpressionContext::Type),
            None => Ok(self.type_system.fresh_type_variable(false)),
        }
    }

    // ---- 类型定义 ----

    fn declare_type_definition(
        &mut self,
        definition: &TypeDefinition,
    ) -> InternalResult<TypeDefinitionInfo> {
        let declaration = DeclarationRef::new(definition.id, &definition.name);
        self.type_system
            .declare_type_constructor(declaration.clone(), definition.parameters.len())?;

        let mut parameters = Vec::with_capacity(definition.parameters.len());
        for parameter in &definition.parameters {
            let variable = self.type_system.fresh_type_variable(true);
            self.annotate(parameter.id, variable.clone())?;
            parameters.push(variable);
        }

        let info = TypeDefinitionInfo {
            declaration,
            parameters,
            underlying: None,
        };
        self.declare_global(
            &definition.name,
            Binding::TypeDefinition(info.clone()),
            definition.span,
        );
        Ok(info)
    }

    fn infer_type_definition(
        &mut self,
        definition: &TypeDefinition,
        mut info: TypeDefinitionInfo,
    ) -> InternalResult<()> {
        self.env.enter_scope();
        for (parameter, variable) in definition.parameters.iter().zip(&info.parameters) {
            if let Some(sort) = &parameter.type_name {
                self.infer_expression(sort, ExpressionContext::Sort)?;
            }
            self.env
                .bind(&parameter.name, Binding::TypeVariable(variable.clone()));
        }
        let underlying = match &definition.underlying {
            Some(underlying) => Some(self.infer_expression(underlying, ExpressionContext::Type)?),
            None => None,
        };
        self.env.exit_scope();

        let constructor = TypeConstructor::Declaration(info.declaration.clone());
        let ty = self
            .type_system
            .type_expression(constructor, info.parameters.clone())?;
        trace!("type {} = {:?}", definition.name, underlying);
        self.annotate(definition.id, ty)?;

        info.underlying = underlying;
        self.env
            .rebind_global(&definition.name, Binding::TypeDefinition(info));
        Ok(())
    }

    // ---- 类型类 ----

    fn infer_type_class(
        &mut self,
        class: &TypeClassDefinition,
    ) -> InternalResult<()> {
        let type_variable = self.type_system.fresh_type_variable(true);
        self.annotate(class.type_variable.id, type_variable.clone())?;
        self.annotate(class.id, type_variable.clone())?;

        self.env.enter_scope();
        self.env.bind(
            &class.type_variable.name,
            Binding::TypeVariable(type_variable.clone()),
        );
        let mut members = IndexMap::new();
        for function in &class.functions {
            let ty = self.infer_function(function)?;
            self.annotate(function.id, ty.clone())?;
            let scheme = self.helpers().function_type(type_variable.clone(), ty)?;
            let scheme = self.type_system.fresh(&scheme, true)?;
            if members.insert(function.name.clone(), scheme).is_some() {
                self.report(
                    TypeError::DuplicateDeclaration {
                        name: function.name.clone(),
                    },
                    function.span,
                );
            }
        }
        self.env.exit_scope();

        debug!("Type class {} with {} members", class.name, members.len());
        let info = TypeClassInfo {
            class: TypeClass(DeclarationRef::new(class.id, &class.name)),
            type_variable,
            members,
        };
        self.declare_global(&class.name, Binding::TypeClass(info), class.span);
        Ok(())
    }

    fn infer_instantiation(
        &mut self,
        instantiation: &TypeClassInstantiation,
    ) -> InternalResult<()> {
        let constructor = self.resolve_type_constructor(&instantiation.type_constructor)?;

        let mut sorts = Vec::with_capacity(instantiation.argument_sorts.len());
        let mut sorts_resolved = true;
        for sort in &instantiation.argument_sorts {
            match self.resolve_class(sort)? {
                Some(info) => sorts.push(info.class),
                None => sorts_resolved = false,
            }
        }
        let class = self.resolve_class(&instantiation.class)?;

        let instance = match (constructor, &class) {
            (Some(constructor), Some(class)) if sorts_resolved => {
                self.instance_type(instantiation, constructor, sorts, class)?
            }
            _ => None,
        };
        let annotation = match &instance {
            Some(instance) => instance.clone(),
            None => self.type_system.fresh_type_variable(false),
        };
        self.annotate(instantiation.type_constructor.id, annotation.clone())?;
        self.annotate(instantiation.id, annotation)?;

        for function in &instantiation.functions {
            let ty = self.infer_function(function)?;
            self.annotate(function.id, ty.clone())?;
            if let (Some(instance), Some(class)) = (&instance, &class) {
                self.check_instance_member(function, &ty, instance, class)?;
            }
        }
        Ok(())
    }

    /// 构造器应用到新变量上，得到实例类型；同时登记类型类实例
    fn instance_type(
        &mut self,
        instantiation: &TypeClassInstantiation,
        constructor: TypeConstructor,
        sorts: Vec<TypeClass>,
        class: &TypeClassInfo,
    ) -> InternalResult<Option<Type>> {
        let info = self.type_system.constructor_info(&constructor)?;
        let (name, arity) = (info.name.clone(), info.arity);
        if arity != sorts.len() {
            self.report(
                TypeError::ArityMismatch {
                    name,
                    expected: arity,
                    found: sorts.len(),
                },
                instantiation.type_constructor.span,
            );
            return Ok(None);
        }

        self.type_system
            .instantiate_class(constructor.clone(), sorts, class.class.clone());
        let arguments = (0..arity)
            .map(|_| self.type_system.fresh_type_variable(false))
            .collect();
        Ok(Some(self.type_system.type_expression(constructor, arguments)?))
    }

    /// 实例函数必须符合类型类成员签名（类型变量代入实例类型）
    fn check_instance_member(
        &mut self,
        function: &FunctionDefinition,
        ty: &Type,
        instance: &Type,
        class: &TypeClassInfo,
    ) -> InternalResult<()> {
        let Some(member) = class.members.get(&function.name).cloned() else {
            self.report(
                TypeError::UnknownMember {
                    owner: class.class.name().to_string(),
                    member: function.name.clone(),
                },
                function.span,
            );
            return Ok(());
        };

        let (variable, expected) = self.class_member(&member)?;
        self.unify_and_report(&variable, instance, function.span)?;
        self.unify_and_report(&expected, ty, function.span)?;
        Ok(())
    }

    /// 实例化成员签名，得到 (类型类变量, 成员类型)
    pub(super) fn class_member(
        &mut self,
        scheme: &Type,
    ) -> InternalResult<(Type, Type)> {
        let scheme = self.type_system.fresh(scheme, false)?;
        self.helpers().dest_function_type(&scheme)
    }

    // ---- 函数 ----

    /// 参数与返回类型，不检查函数体
    fn infer_function_signature(
        &mut self,
        function: &FunctionDefinition,
    ) -> InternalResult<Signature> {
        let mut parameters = Vec::with_capacity(function.parameters.len());
        for parameter in &function.parameters {
            let ty = self.declared_type(parameter)?;
            self.annotate(parameter.id, ty.clone())?;
            parameters.push(ty);
        }
        let result = match &function.return_type {
            Some(return_type) => self.infer_expression(return_type, ExpressionContext::Type)?,
            None => self.type_system.fresh_type_variable(false),
        };

        let helpers = self.helpers();
        let domain = helpers.tuple_type(parameters.clone())?;
        let ty = helpers.function_type(domain, result.clone())?;
        Ok(Signature {
            parameters,
            result,
            ty,
        })
    }

    fn infer_function_body(
        &mut self,
        function: &FunctionDefinition,
        signature: &Signature,
    ) -> InternalResult<()> {
        let Some(body) = &function.body else {
            return Ok(());
        };
        self.env.enter_scope();
        for (parameter, ty) in function.parameters.iter().zip(&signature.parameters) {
            self.env
                .bind(&parameter.name, Binding::Variable(ty.clone()));
        }
        self.infer_block(body, &signature.result)?;
        self.env.exit_scope();
        Ok(())
    }

    /// 签名加函数体，返回（未泛化的）函数类型
    fn infer_function(
        &mut self,
        function: &FunctionDefinition,
    ) -> InternalResult<Type> {
        let signature = self.infer_function_signature(function)?;
        self.infer_function_body(function, &signature)?;
        Ok(signature.ty)
    }

    /// 引用顶层函数：尚未检查的先检查函数体，返回当前绑定类型
    ///
    /// 引用检查中或等待泛化的函数时，调用者与它属于同一个互相递归组。
    pub(super) fn use_top_level_function(
        &mut self,
        declaration: NodeId,
    ) -> InternalResult<Option<Type>> {
        let Some((state, index)) = self.functions.get(&declaration).map(|f| (f.state, f.index))
        else {
            return Ok(None);
        };
        let reached = match state {
            FunctionState::Pending => {
                self.check_top_level_function(declaration)?;
                self.functions
                    .get(&declaration)
                    .filter(|f| f.state != FunctionState::Done)
                    .map(|f| f.low)
            }
            FunctionState::InProgress | FunctionState::Awaiting => Some(index),
            FunctionState::Done => None,
        };
        if let (Some(reached), Some(caller)) = (reached, self.active_functions.last()) {
            if let Some(caller) = self.functions.get_mut(caller) {
                caller.low = caller.low.min(reached);
            }
        }
        Ok(self.functions.get(&declaration).map(|f| f.ty.clone()))
    }

    /// 在只有全局作用域的环境中检查函数体；
    /// 若它是所在互相递归组的入口，整组泛化
    fn check_top_level_function(
        &mut self,
        declaration: NodeId,
    ) -> InternalResult<()> {
        let index = self.next_function_index;
        let Some(function) = self.functions.get_mut(&declaration) else {
            return Ok(());
        };
        self.next_function_index += 1;
        function.state = FunctionState::InProgress;
        function.index = index;
        function.low = index;
        let definition = function.definition.clone();
        let signature = function.signature.clone();
        trace!("checking body of {}", definition.name);

        self.function_stack.push(declaration);
        self.active_functions.push(declaration);
        let locals = self.env.suspend_locals();
        self.infer_function_body(&definition, &signature)?;
        self.env.restore_locals(locals);
        self.active_functions.pop();

        let Some(function) = self.functions.get_mut(&declaration) else {
            return Ok(());
        };
        if function.low < index {
            function.state = FunctionState::Awaiting;
            return Ok(());
        }
        let start = self
            .function_stack
            .iter()
            .rposition(|id| *id == declaration)
            .unwrap_or(self.function_stack.len());
        let group = self.function_stack.split_off(start);
        if group.len() > 1 {
            debug!("Generalizing {} mutually recursive functions", group.len());
        }
        for member in group {
            self.generalize_top_level_function(member)?;
        }
        Ok(())
    }

    fn generalize_top_level_function(
        &mut self,
        declaration: NodeId,
    ) -> InternalResult<()> {
        let Some(function) = self.functions.get(&declaration) else {
            return Ok(());
        };
        let name = function.definition.name.clone();
        let ty = if self.settings.generalize_functions {
            self.type_system.fresh(&function.signature.ty, true)?
        } else {
            function.signature.ty.clone()
        };
        trace!("function {} : {}", name, self.type_system.type_to_string(&ty)?);
        self.annotate(declaration, ty.clone())?;
        if let Some(function) = self.functions.get_mut(&declaration) {
            function.state = FunctionState::Done;
            function.ty = ty.clone();
        }
        self.env
            .rebind_global(&name, Binding::Function { declaration, ty });
        Ok(())
    }
}
