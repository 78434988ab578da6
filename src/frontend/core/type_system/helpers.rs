//! 元组与函数类型的编码
//!
//! 元组编码为右嵌套的 `Pair` 链：空元组是 `Unit`，单元素元组就是元素本身，
//! `(a, b, c)` 是 `Pair(a, Pair(b, c))`。

use super::error::{InternalError, InternalResult};
use super::mono::{BuiltinType, Type, TypeConstructor};
use super::system::TypeSystem;

/// 建立在类型存储之上的编码辅助
pub struct TypeSystemHelpers<'a> {
    pub type_system: &'a TypeSystem,
}

impl<'a> TypeSystemHelpers<'a> {
    pub fn new(type_system: &'a TypeSystem) -> Self {
        TypeSystemHelpers { type_system }
    }

    /// 元素序列 → 元组类型
    pub fn tuple_type(
        &self,
        elements: Vec<Type>,
    ) -> InternalResult<Type> {
        let mut elements = elements.into_iter().rev();
        let Some(last) = elements.next() else {
            return self.type_system.builtin_type(BuiltinType::Unit, vec![]);
        };
        elements.try_fold(last, |tail, head| {
            self.type_system
                .builtin_type(BuiltinType::Pair, vec![head, tail])
        })
    }

    /// 元组类型 → 元素序列
    ///
    /// `Unit` 得到空序列；非 `Pair` 类型（包括未绑定变量）得到只含自身的序列。
    pub fn dest_tuple_type(
        &self,
        tuple_type: &Type,
    ) -> InternalResult<Vec<Type>> {
        let resolved = self.type_system.resolve(tuple_type)?;
        if resolved.is_builtin(BuiltinType::Unit) {
            return Ok(Vec::new());
        }
        let mut result = Vec::new();
        let mut tail = resolved;
        while let Some((head, rest)) = self.dest_pair(&tail)? {
            result.push(head);
            tail = self.type_system.resolve(&rest)?;
        }
        result.push(tail);
        Ok(result)
    }

    fn dest_pair(
        &self,
        ty: &Type,
    ) -> InternalResult<Option<(Type, Type)>> {
        if !ty.is_builtin(BuiltinType::Pair) {
            return Ok(None);
        }
        let (_, arguments) = self.dest_type_expression(ty)?;
        match <[Type; 2]>::try_from(arguments) {
            Ok([head, tail]) => Ok(Some((head, tail))),
            Err(arguments) => Err(InternalError::InvalidArity {
                name: BuiltinType::Pair.default_name().to_string(),
                expected: 2,
                found: arguments.len(),
            }),
        }
    }

    /// 构造函数类型
    pub fn function_type(
        &self,
        argument: Type,
        result: Type,
    ) -> InternalResult<Type> {
        self.type_system
            .builtin_type(BuiltinType::Function, vec![argument, result])
    }

    /// 拆出构造器和参数；对类型变量是内部错误
    pub fn dest_type_expression(
        &self,
        ty: &Type,
    ) -> InternalResult<(TypeConstructor, Vec<Type>)> {
        match ty {
            Type::Expression(expr) => Ok((expr.constructor.clone(), expr.arguments.clone())),
            Type::Variable(var) => Err(InternalError::NotATypeExpression { var: *var }),
        }
    }

    /// 拆出函数类型的定义域与值域；对非函数类型是内部错误
    pub fn dest_function_type(
        &self,
        function_type: &Type,
    ) -> InternalResult<(Type, Type)> {
        let (constructor, arguments) = self.dest_type_expression(function_type)?;
        if constructor != TypeConstructor::Builtin(BuiltinType::Function) {
            return Err(InternalError::UnexpectedConstructor {
                expected: "function",
                found: constructor.to_string(),
            });
        }
        match <[Type; 2]>::try_from(arguments) {
            Ok([argument, result]) => Ok((argument, result)),
            Err(arguments) => Err(InternalError::InvalidArity {
                name: BuiltinType::Function.default_name().to_string(),
                expected: 2,
                found: arguments.len(),
            }),
        }
    }
}
