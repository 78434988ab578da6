//! 表达式推断
//!
//! 同一个表达式语法在三种上下文中含义不同：
//! - Term：值表达式，结果是它的类型
//! - Type：类型标注，结果是它所表示的类型
//! - Sort：类型类位置，结果是该类型类的类型变量的新副本
//!
//! 自身产生诊断的表达式被注解为新的非泛型变量。

use tracing::trace;

use crate::frontend::core::ast::{
    BinaryOperator, ElementaryTypeName, Expression, ExpressionKind, Literal,
};
use crate::frontend::core::type_system::{BuiltinType, InternalResult, Type, TypeConstructor};
use crate::frontend::typecheck::{
    Binding, ExpressionContext, TypeClassInfo, TypeDefinitionInfo, TypeError, TypeInference,
};
use crate::util::span::Span;

/// 内置类型名对应的构造器
fn builtin_of(name: ElementaryTypeName) -> BuiltinType {
    match name {
        ElementaryTypeName::Void => BuiltinType::Void,
        ElementaryTypeName::Word => BuiltinType::Word,
        ElementaryTypeName::Integer => BuiltinType::Integer,
        ElementaryTypeName::Bool => BuiltinType::Bool,
        ElementaryTypeName::Unit => BuiltinType::Unit,
        ElementaryTypeName::Pair => BuiltinType::Pair,
        ElementaryTypeName::Fun => BuiltinType::Function,
    }
}

impl TypeInference<'_> {
    /// 推断表达式并写入注解
    pub(crate) fn infer_expression(
        &mut self,
        expr: &Expression,
        context: ExpressionContext,
    ) -> InternalResult<Type> {
        let ty = match &expr.kind {
            ExpressionKind::Identifier(name) => self.infer_identifier(name, context, expr.span)?,
            ExpressionKind::IdentifierPath(segments) => {
                self.infer_path(segments, context, expr.span)?
            }
            ExpressionKind::ElementaryTypeName(name) => {
                self.infer_elementary(*name, context, expr.span)?
            }
            ExpressionKind::Literal(literal) => self.infer_literal(literal, context, expr.span)?,
            ExpressionKind::Tuple(components) => {
                self.infer_tuple(components, context, expr.span)?
            }
            ExpressionKind::Call { callee, arguments } => match context {
                ExpressionContext::Term => self.infer_call(callee, arguments, expr.span)?,
                ExpressionContext::Type => {
                    self.infer_type_application(callee, arguments, expr.span)?
                }
                ExpressionContext::Sort => self.unsupported("a call", context, expr.span),
            },
            ExpressionKind::MemberAccess { expression, member } => {
                self.infer_member_access(expression, member, context, expr.span)?
            }
            ExpressionKind::BinaryOperation {
                operator,
                left,
                right,
            } => self.infer_binary(*operator, left, right, context, expr.span)?,
            ExpressionKind::Assignment { lhs, rhs } => {
                self.infer_assignment(lhs, rhs, context, expr.span)?
            }
        };
        self.annotate(expr.id, ty.clone())?;
        Ok(ty)
    }

    fn unsupported(
        &mut self,
        what: impl Into<String>,
        context: ExpressionContext,
        span: Span,
    ) -> Type {
        self.recover(
            TypeError::UnsupportedExpression {
                what: what.into(),
                context,
            },
            span,
        )
    }

    // ---- 名字 ----

    fn infer_identifier(
        &mut self,
        name: &str,
        context: ExpressionContext,
        span: Span,
    ) -> InternalResult<Type> {
        let Some(binding) = self.env.lookup(name).cloned() else {
            return Ok(self.recover(
                TypeError::UnknownIdentifier {
                    name: name.to_string(),
                },
                span,
            ));
        };
        match (context, binding) {
            (ExpressionContext::Term, Binding::Variable(ty)) => Ok(ty),
            (ExpressionContext::Term, Binding::Function { declaration, ty }) => {
                let ty = self.use_top_level_function(declaration)?.unwrap_or(ty);
                self.type_system.fresh(&ty, false)
            }
            (ExpressionContext::Type, Binding::TypeVariable(ty)) => Ok(ty),
            (ExpressionContext::Type, Binding::TypeDefinition(info)) => {
                self.nominal_type(name, &info, Vec::new(), span)
            }
            (ExpressionContext::Sort, Binding::TypeClass(info)) => {
                self.type_system.fresh(&info.type_variable, false)
            }
            (context, binding) => Ok(self.recover(
                TypeError::ContextMismatch {
                    name: name.to_string(),
                    expected: context,
                    found: binding.context(),
                },
                span,
            )),
        }
    }

    /// `T(args)`，检查用户类型构造器的元数
    fn nominal_type(
        &mut self,
        name: &str,
        info: &TypeDefinitionInfo,
        arguments: Vec<Type>,
        span: Span,
    ) -> InternalResult<Type> {
        if arguments.len() != info.parameters.len() {
            return Ok(self.recover(
                TypeError::ArityMismatch {
                    name: name.to_string(),
                    expected: info.parameters.len(),
                    found: arguments.len(),
                },
                span,
            ));
        }
        let constructor = TypeConstructor::Declaration(info.declaration.clone());
        self.type_system.type_expression(constructor, arguments)
    }

    fn infer_path(
        &mut self,
        segments: &[String],
        context: ExpressionContext,
        span: Span,
    ) -> InternalResult<Type> {
        match segments {
            [name] => self.infer_identifier(name, context, span),
            [owner, member] => self.infer_qualified(owner, member, context, span),
            _ => Ok(self.unsupported(
                format!("path `{}`", segments.join(".")),
                context,
                span,
            )),
        }
    }

    fn infer_member_access(
        &mut self,
        expression: &Expression,
        member: &str,
        context: ExpressionContext,
        span: Span,
    ) -> InternalResult<Type> {
        if let ExpressionKind::Identifier(owner) = &expression.kind {
            let owner_type = match self.env.lookup(owner).cloned() {
                Some(Binding::TypeDefinition(info)) => Some(self.owner_type(&info)?),
                Some(Binding::TypeClass(info)) => {
                    Some(self.type_system.fresh(&info.type_variable, false)?)
                }
                _ => None,
            };
            if let Some(owner_type) = owner_type {
                self.annotate(expression.id, owner_type)?;
                return self.infer_qualified(owner, member, context, span);
            }
        }
        self.infer_expression(expression, context)?;
        Ok(self.unsupported(format!("member access `.{}`", member), context, span))
    }

    /// 类型名本身作为成员访问的主体时的注解
    fn owner_type(
        &mut self,
        info: &TypeDefinitionInfo,
    ) -> InternalResult<Type> {
        let constructor = TypeConstructor::Declaration(info.declaration.clone());
        let ty = self
            .type_system
            .type_expression(constructor, info.parameters.clone())?;
        self.type_system.fresh(&ty, false)
    }

    /// `T.abs` / `T.rep` / `C.member`
    fn infer_qualified(
        &mut self,
        owner: &str,
        member: &str,
        context: ExpressionContext,
        span: Span,
    ) -> InternalResult<Type> {
        let binding = match self.env.lookup(owner).cloned() {
            Some(binding @ (Binding::TypeDefinition(_) | Binding::TypeClass(_))) => binding,
            Some(_) => {
                return Ok(self.unsupported(
                    format!("member access on `{}`", owner),
                    context,
                    span,
                ))
            }
            None => {
                return Ok(self.recover(
                    TypeError::UnknownIdentifier {
                        name: owner.to_string(),
                    },
                    span,
                ))
            }
        };
        if context != ExpressionContext::Term {
            return Ok(self.recover(
                TypeError::ContextMismatch {
                    name: format!("{}.{}", owner, member),
                    expected: context,
                    found: ExpressionContext::Term,
                },
                span,
            ));
        }
        match binding {
            Binding::TypeDefinition(info) => self.infer_abs_rep(owner, member, &info, span),
            Binding::TypeClass(info) => self.infer_class_member(member, &info, span),
            _ => Ok(self.unsupported(format!("member access on `{}`", owner), context, span)),
        }
    }

    /// `abs : underlying -> T(params)`，`rep : T(params) -> underlying`
    fn infer_abs_rep(
        &mut self,
        owner: &str,
        member: &str,
        info: &TypeDefinitionInfo,
        span: Span,
    ) -> InternalResult<Type> {
        let underlying = match (member, &info.underlying) {
            ("abs" | "rep", Some(underlying)) => underlying.clone(),
            _ => {
                return Ok(self.recover(
                    TypeError::UnknownMember {
                        owner: owner.to_string(),
                        member: member.to_string(),
                    },
                    span,
                ))
            }
        };
        let constructor = TypeConstructor::Declaration(info.declaration.clone());
        let nominal = self
            .type_system
            .type_expression(constructor, info.parameters.clone())?;
        let helpers = self.helpers();
        let ty = if member == "abs" {
            helpers.function_type(underlying, nominal)?
        } else {
            helpers.function_type(nominal, underlying)?
        };
        self.type_system.fresh(&ty, false)
    }

    fn infer_class_member(
        &mut self,
        member: &str,
        info: &TypeClassInfo,
        span: Span,
    ) -> InternalResult<Type> {
        match info.members.get(member) {
            Some(scheme) => Ok(self.class_member(scheme)?.1),
            None => Ok(self.recover(
                TypeError::UnknownMember {
                    owner: info.class.name().to_string(),
                    member: member.to_string(),
                },
                span,
            )),
        }
    }

    // ---- 字面量与类型名 ----

    fn infer_elementary(
        &mut self,
        name: ElementaryTypeName,
        context: ExpressionContext,
        span: Span,
    ) -> InternalResult<Type> {
        if context != ExpressionContext::Type {
            return Ok(self.unsupported(format!("type name `{}`", name), context, span));
        }
        self.builtin_application(name, Vec::new(), span)
    }

    /// 内置构造器应用，元数按注册表检查
    fn builtin_application(
        &mut self,
        name: ElementaryTypeName,
        arguments: Vec<Type>,
        span: Span,
    ) -> InternalResult<Type> {
        let builtin = builtin_of(name);
        let arity = self
            .type_system
            .constructor_info(&TypeConstructor::Builtin(builtin))?
            .arity;
        if arity != arguments.len() {
            return Ok(self.recover(
                TypeError::ArityMismatch {
                    name: name.to_string(),
                    expected: arity,
                    found: arguments.len(),
                },
                span,
            ));
        }
        self.type_system.builtin_type(builtin, arguments)
    }

    fn infer_literal(
        &mut self,
        literal: &Literal,
        context: ExpressionContext,
        span: Span,
    ) -> InternalResult<Type> {
        if context != ExpressionContext::Term {
            return Ok(self.unsupported("a literal", context, span));
        }
        let builtin = match literal {
            Literal::Number(_) => BuiltinType::Integer,
            Literal::Bool(_) => BuiltinType::Bool,
        };
        self.type_system.builtin_type(builtin, Vec::new())
    }

    // ---- 复合表达式 ----

    fn infer_tuple(
        &mut self,
        components: &[Expression],
        context: ExpressionContext,
        span: Span,
    ) -> InternalResult<Type> {
        if context == ExpressionContext::Sort {
            return Ok(self.unsupported("a tuple", context, span));
        }
        let mut types = Vec::with_capacity(components.len());
        for component in components {
            types.push(self.infer_expression(component, context)?);
        }
        self.helpers().tuple_type(types)
    }

    /// 函数调用：被调用者与 `参数元组 -> 结果` 合一
    fn infer_call(
        &mut self,
        callee: &Expression,
        arguments: &[Expression],
        span: Span,
    ) -> InternalResult<Type> {
        let callee_type = self.infer_expression(callee, ExpressionContext::Term)?;
        let mut argument_types = Vec::with_capacity(arguments.len());
        for argument in arguments {
            argument_types.push(self.infer_expression(argument, ExpressionContext::Term)?);
        }
        let result = self.type_system.fresh_type_variable(false);
        let helpers = self.helpers();
        let argument = helpers.tuple_type(argument_types)?;
        let expected = helpers.function_type(argument, result.clone())?;
        self.unify_and_report(&callee_type, &expected, span)?;
        Ok(result)
    }

    /// 类型上下文中的调用：类型构造器应用
    fn infer_type_application(
        &mut self,
        callee: &Expression,
        arguments: &[Expression],
        span: Span,
    ) -> InternalResult<Type> {
        let mut argument_types = Vec::with_capacity(arguments.len());
        for argument in arguments {
            argument_types.push(self.infer_expression(argument, ExpressionContext::Type)?);
        }
        let context = ExpressionContext::Type;
        let ty = match &callee.kind {
            ExpressionKind::ElementaryTypeName(name) => {
                self.builtin_application(*name, argument_types, span)?
            }
            ExpressionKind::Identifier(name) => match self.env.lookup(name).cloned() {
                Some(Binding::TypeDefinition(info)) => {
                    self.nominal_type(name, &info, argument_types, span)?
                }
                Some(Binding::TypeVariable(_)) => {
                    self.unsupported(format!("applying type variable `{}`", name), context, span)
                }
                Some(binding) => self.recover(
                    TypeError::ContextMismatch {
                        name: name.clone(),
                        expected: context,
                        found: binding.context(),
                    },
                    span,
                ),
                None => self.recover(
                    TypeError::UnknownIdentifier { name: name.clone() },
                    span,
                ),
            },
            _ => self.unsupported("this type constructor", context, span),
        };
        self.annotate(callee.id, ty.clone())?;
        Ok(ty)
    }

    fn infer_binary(
        &mut self,
        operator: BinaryOperator,
        left: &Expression,
        right: &Expression,
        context: ExpressionContext,
        span: Span,
    ) -> InternalResult<Type> {
        match (context, operator) {
            (ExpressionContext::Type, BinaryOperator::Arrow) => {
                let domain = self.infer_expression(left, context)?;
                let codomain = self.infer_expression(right, context)?;
                self.helpers().function_type(domain, codomain)
            }
            (ExpressionContext::Term, operator) if operator != BinaryOperator::Arrow => {
                let left_type = self.infer_expression(left, context)?;
                let right_type = self.infer_expression(right, context)?;
                if operator.is_logical() {
                    let bool_type = self.type_system.builtin_type(BuiltinType::Bool, Vec::new())?;
                    self.unify_and_report(&left_type, &bool_type, span)?;
                    self.unify_and_report(&right_type, &bool_type, span)?;
                    return Ok(bool_type);
                }
                trace!("binary {} in term context", operator);
                self.unify_and_report(&left_type, &right_type, span)?;
                if operator.is_comparison() {
                    self.type_system.builtin_type(BuiltinType::Bool, Vec::new())
                } else {
                    Ok(left_type)
                }
            }
            (context, operator) => {
                Ok(self.unsupported(format!("operator `{}`", operator), context, span))
            }
        }
    }

    fn infer_assignment(
        &mut self,
        lhs: &Expression,
        rhs: &Expression,
        context: ExpressionContext,
        span: Span,
    ) -> InternalResult<Type> {
        if context != ExpressionContext::Term {
            return Ok(self.unsupported("an assignment", context, span));
        }
        let left = self.infer_expression(lhs, context)?;
        let right = self.infer_expression(rhs, context)?;
        self.unify_and_report(&left, &right, span)?;
        Ok(left)
    }

    /// Sort 上下文中解析类型类；返回其信息（已报告错误时为 `None`）
    pub(super) fn resolve_class(
        &mut self,
        expr: &Expression,
    ) -> InternalResult<Option<TypeClassInfo>> {
        self.infer_expression(expr, ExpressionContext::Sort)?;
        let ExpressionKind::Identifier(name) = &expr.kind else {
            return Ok(None);
        };
        match self.env.lookup(name) {
            Some(Binding::TypeClass(info)) => Ok(Some(info.clone())),
            _ => Ok(None),
        }
    }

    /// 实例声明中的类型构造器：类型定义名或内置类型名
    ///
    /// 不写注解，由调用方在得到实例类型后写入。
    pub(super) fn resolve_type_constructor(
        &mut self,
        expr: &Expression,
    ) -> InternalResult<Option<TypeConstructor>> {
        let context = ExpressionContext::Type;
        match &expr.kind {
            ExpressionKind::ElementaryTypeName(name) => {
                Ok(Some(TypeConstructor::Builtin(builtin_of(*name))))
            }
            ExpressionKind::Identifier(name) => match self.env.lookup(name).cloned() {
                Some(Binding::TypeDefinition(info)) => {
                    Ok(Some(TypeConstructor::Declaration(info.declaration)))
                }
                Some(Binding::TypeVariable(_)) => {
                    self.report(
                        TypeError::UnsupportedExpression {
                            what: format!("type variable `{}` as a constructor", name),
                            context,
                        },
                        expr.span,
                    );
                    Ok(None)
                }
                Some(binding) => {
                    self.report(
                        TypeError::ContextMismatch {
                            name: name.clone(),
                            expected: context,
                            found: binding.context(),
                        },
                        expr.span,
                    );
                    Ok(None)
                }
                None => {
                    self.report(
                        TypeError::UnknownIdentifier { name: name.clone() },
                        expr.span,
                    );
                    Ok(None)
                }
            },
            _ => {
                self.report(
                    TypeError::UnsupportedExpression {
                        what: "this type constructor".to_string(),
                        context,
                    },
                    expr.span,
                );
                Ok(None)
            }
        }
    }
}
