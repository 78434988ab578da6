//! 语法树构建器
//!
//! 负责分配节点身份，供解析器和测试使用。

use super::*;

/// 语法树构建器
#[derive(Debug, Default)]
pub struct AstBuilder {
    next_id: u32,
}

impl AstBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 分配新的节点身份
    pub fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    fn expression(
        &mut self,
        kind: ExpressionKind,
        span: Span,
    ) -> Expression {
        Expression {
            id: self.next_id(),
            span,
            kind,
        }
    }

    // ---- 表达式 ----

    pub fn identifier(
        &mut self,
        name: &str,
    ) -> Expression {
        self.expression(ExpressionKind::Identifier(name.to_string()), Span::dummy())
    }

    pub fn path(
        &mut self,
        segments: &[&str],
    ) -> Expression {
        let segments = segments.iter().map(|s| s.to_string()).collect();
        self.expression(ExpressionKind::IdentifierPath(segments), Span::dummy())
    }

    pub fn elementary(
        &mut self,
        name: ElementaryTypeName,
    ) -> Expression {
        self.expression(ExpressionKind::ElementaryTypeName(name), Span::dummy())
    }

    pub fn number(
        &mut self,
        value: &str,
    ) -> Expression {
        self.expression(
            ExpressionKind::Literal(Literal::Number(value.to_string())),
            Span::dummy(),
        )
    }

    pub fn boolean(
        &mut self,
        value: bool,
    ) -> Expression {
        self.expression(ExpressionKind::Literal(Literal::Bool(value)), Span::dummy())
    }

    pub fn tuple(
        &mut self,
        components: Vec<Expression>,
    ) -> Expression {
        let span = components
            .iter()
            .fold(Span::dummy(), |acc, c| acc.merge(c.span));
        self.expression(ExpressionKind::Tuple(components), span)
    }

    pub fn call(
        &mut self,
        callee: Expression,
        arguments: Vec<Expression>,
    ) -> Expression {
        let span = arguments
            .iter()
            .fold(callee.span, |acc, a| acc.merge(a.span));
        self.expression(
            ExpressionKind::Call {
                callee: Box::new(callee),
                arguments,
            },
            span,
        )
    }

    pub fn member(
        &mut self,
        expression: Expression,
        member: &str,
    ) -> Expression {
        let span = expression.span;
        self.expression(
            ExpressionKind::MemberAccess {
                expression: Box::new(expression),
                member: member.to_string(),
            },
            span,
        )
    }

    pub fn binary(
        &mut self,
        operator: BinaryOperator,
        left: Expression,
        right: Expression,
    ) -> Expression {
        let span = left.span.merge(right.span);
        self.expression(
            ExpressionKind::BinaryOperation {
                operator,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        )
    }

    /// 类型上下文中的函数类型 `a -> b`
    pub fn arrow(
        &mut self,
        domain: Expression,
        codomain: Expression,
    ) -> Expression {
        self.binary(BinaryOperator::Arrow, domain, codomain)
    }

    pub fn assign(
        &mut self,
        lhs: Expression,
        rhs: Expression,
    ) -> Expression {
        let span = lhs.span.merge(rhs.span);
        self.expression(
            ExpressionKind::Assignment {
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
            span,
        )
    }

    // ---- 声明 ----

    pub fn variable(
        &mut self,
        name: &str,
        type_name: Option<Expression>,
    ) -> VariableDeclaration {
        VariableDeclaration {
            id: self.next_id(),
            span: Span::dummy(),
            name: name.to_string(),
            type_name,
        }
    }

    pub fn function(
        &mut self,
        name: &str,
        parameters: Vec<VariableDeclaration>,
        return_type: Option<Expression>,
        body: Option<Block>,
    ) -> FunctionDefinition {
        FunctionDefinition {
            id: self.next_id(),
            span: Span::dummy(),
            name: name.to_string(),
            parameters,
            return_type,
            body,
        }
    }

    pub fn type_definition(
        &mut self,
        name: &str,
        parameters: Vec<VariableDeclaration>,
        underlying: Option<Expression>,
    ) -> TypeDefinition {
        TypeDefinition {
            id: self.next_id(),
            span: Span::dummy(),
            name: name.to_string(),
            parameters,
            underlying,
        }
    }

    pub fn type_class(
        &mut self,
        name: &str,
        type_variable: VariableDeclaration,
        functions: Vec<FunctionDefinition>,
    ) -> TypeClassDefinition {
        TypeClassDefinition {
            id: self.next_id(),
            span: Span::dummy(),
            name: name.to_string(),
            type_variable,
            functions,
        }
    }

    pub fn instantiation(
        &mut self,
        type_constructor: Expression,
        argument_sorts: Vec<Expression>,
        class: Expression,
        functions: Vec<FunctionDefinition>,
    ) -> TypeClassInstantiation {
        TypeClassInstantiation {
            id: self.next_id(),
            span: Span::dummy(),
            type_constructor,
            argument_sorts,
            class,
            functions,
        }
    }

    // ---- 语句 ----

    pub fn block(
        &mut self,
        statements: Vec<Statement>,
    ) -> Block {
        Block {
            span: Span::dummy(),
            statements,
        }
    }

    pub fn return_statement(
        &mut self,
        expression: Option<Expression>,
    ) -> Statement {
        let span = expression.as_ref().map(|e| e.span).unwrap_or_default();
        Statement::Return(Return { span, expression })
    }

    pub fn expression_statement(
        &mut self,
        expression: Expression,
    ) -> Statement {
        Statement::Expression(ExpressionStatement {
            span: expression.span,
            expression,
        })
    }

    pub fn let_statement(
        &mut self,
        declaration: VariableDeclaration,
        initial_value: Option<Expression>,
    ) -> Statement {
        Statement::VariableDeclaration(VariableDeclarationStatement {
            span: declaration.span,
            declaration,
            initial_value,
        })
    }

    pub fn assembly(
        &mut self,
        external_references: Vec<Expression>,
    ) -> Statement {
        Statement::InlineAssembly(InlineAssembly {
            span: Span::dummy(),
            external_references,
        })
    }
}
