//! 类型打印（仅用于诊断，不作为结构键）

use super::error::InternalResult;
use super::helpers::TypeSystemHelpers;
use super::mono::{BuiltinType, Type, TypeConstructor};
use super::system::TypeSystem;

impl TypeSystem {
    /// 打印类型
    ///
    /// - 名义类型：`(a, b) Name`，无参数时只有名字
    /// - `Function`：`domain -> codomain`
    /// - `Unit`：`()`
    /// - `Pair`：展平成元组 `(a, b, c)`
    /// - 未绑定变量：`'varN`，泛型变量 `?varN`
    pub fn type_to_string(
        &self,
        ty: &Type,
    ) -> InternalResult<String> {
        let expr = match self.resolve(ty)? {
            Type::Variable(var) => return Ok(var.to_string()),
            Type::Expression(expr) => expr,
        };
        match &expr.constructor {
            TypeConstructor::Builtin(BuiltinType::Function) => {
                let helpers = TypeSystemHelpers::new(self);
                let (domain, codomain) = helpers.dest_function_type(&Type::Expression(expr.clone()))?;
                Ok(format!(
                    "{} -> {}",
                    self.type_to_string(&domain)?,
                    self.type_to_string(&codomain)?
                ))
            }
            TypeConstructor::Builtin(BuiltinType::Unit) => Ok("()".to_string()),
            TypeConstructor::Builtin(BuiltinType::Pair) => {
                let helpers = TypeSystemHelpers::new(self);
                let elements = helpers.dest_tuple_type(&Type::Expression(expr.clone()))?;
                Ok(format!("({})", self.join(&elements)?))
            }
            TypeConstructor::Builtin(builtin) => {
                let name = self.builtin_type_name(*builtin)?;
                self.with_arguments(&expr.arguments, name)
            }
            TypeConstructor::Declaration(declaration) => {
                self.with_arguments(&expr.arguments, &declaration.name)
            }
        }
    }

    fn with_arguments(
        &self,
        arguments: &[Type],
        name: &str,
    ) -> InternalResult<String> {
        if arguments.is_empty() {
            return Ok(name.to_string());
        }
        Ok(format!("({}) {}", self.join(arguments)?, name))
    }

    fn join(
        &self,
        types: &[Type],
    ) -> InternalResult<String> {
        let printed = types
            .iter()
            .map(|t| self.type_to_string(t))
            .collect::<InternalResult<Vec<_>>>()?;
        Ok(printed.join(", "))
    }
}
