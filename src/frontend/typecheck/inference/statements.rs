//! 语句推断

use crate::frontend::core::ast::{Block, Statement};
use crate::frontend::core::type_system::{BuiltinType, InternalResult, Type};
use crate::frontend::typecheck::{Binding, ExpressionContext, TypeInference};

impl TypeInference<'_> {
    /// 推断语句块；`result` 是所在函数的结果类型
    pub(super) fn infer_block(
        &mut self,
        block: &Block,
        result: &Type,
    ) -> InternalResult<()> {
        self.env.enter_scope();
        for statement in &block.statements {
            self.infer_statement(statement, result)?;
        }
        self.env.exit_scope();
        Ok(())
    }

    fn infer_statement(
        &mut self,
        statement: &Statement,
        result: &Type,
    ) -> InternalResult<()> {
        match statement {
            Statement::Block(block) => self.infer_block(block, result),
            Statement::VariableDeclaration(stmt) => {
                let ty = self.declared_type(&stmt.declaration)?;
                self.annotate(stmt.declaration.id, ty.clone())?;
                if let Some(value) = &stmt.initial_value {
                    let value_type = self.infer_expression(value, ExpressionContext::Term)?;
                    self.unify_and_report(&ty, &value_type, stmt.span)?;
                }
                // 初始值中的同名引用指向外层绑定
                self.env
                    .bind(&stmt.declaration.name, Binding::Variable(ty));
                Ok(())
            }
            Statement::Expression(stmt) => {
                self.infer_expression(&stmt.expression, ExpressionContext::Term)?;
                Ok(())
            }
            Statement::Return(ret) => {
                let ty = match &ret.expression {
                    Some(expression) => self.infer_expression(expression, ExpressionContext::Term)?,
                    None => self.type_system.builtin_type(BuiltinType::Unit, Vec::new())?,
                };
                self.unify_and_report(result, &ty, ret.span)?;
                Ok(())
            }
            Statement::InlineAssembly(assembly) => {
                let word = self.type_system.builtin_type(BuiltinType::Word, Vec::new())?;
                for reference in &assembly.external_references {
                    let ty = self.infer_expression(reference, ExpressionContext::Term)?;
                    self.unify_and_report(&ty, &word, reference.span)?;
                }
                Ok(())
            }
        }
    }
}
