//! 诊断与错误恢复测试

use super::*;
use crate::frontend::core::ast::{AstBuilder, BinaryOperator, ElementaryTypeName};
use crate::util::span::{Position, Span};

/// 未知名字只报告一次，后续使用不再级联
#[test]
fn test_unknown_identifier_does_not_cascade() {
    let mut b = AstBuilder::new();
    let ret_type = b.elementary(ElementaryTypeName::Integer);
    let missing = b.identifier("missing");
    let missing_id = missing.id;
    let one = b.number("1");
    let sum = b.binary(BinaryOperator::Add, missing, one);
    let ret = b.return_statement(Some(sum));
    let body = b.block(vec![ret]);
    let f = b.function("f", vec![], Some(ret_type), Some(body));

    let outcome = infer(vec![Declaration::Function(f)]);
    assert_eq!(outcome.codes(), vec!["E2003"]);
    assert_eq!(outcome.type_string(missing_id), "Integer");
}

#[test]
fn test_type_used_as_value() {
    let mut b = AstBuilder::new();
    let handle = b.type_definition("Handle", vec![], None);
    let value = b.identifier("Handle");
    let ret = b.return_statement(Some(value));
    let body = b.block(vec![ret]);
    let f = b.function("f", vec![], None, Some(body));

    let outcome = infer(vec![
        Declaration::TypeDefinition(handle),
        Declaration::Function(f),
    ]);
    assert_eq!(
        outcome.messages(),
        vec!["`Handle` names a type, but a term is expected here"]
    );
}

#[test]
fn test_value_used_as_type() {
    let mut b = AstBuilder::new();
    let empty = b.block(vec![]);
    let g = b.function("g", vec![], None, Some(empty));
    let g_type = b.identifier("g");
    let x = b.variable("x", Some(g_type));
    let empty = b.block(vec![]);
    let f = b.function("f", vec![x], None, Some(empty));

    let outcome = infer(vec![Declaration::Function(g), Declaration::Function(f)]);
    assert_eq!(outcome.codes(), vec!["E2007"]);
}

#[test]
fn test_unsupported_forms() {
    let mut b = AstBuilder::new();
    // 项上下文中的 `->`
    let left = b.number("1");
    let right = b.number("2");
    let arrow = b.arrow(left, right);
    let arrow_stmt = b.expression_statement(arrow);
    // 类型上下文中的字面量
    let literal = b.number("3");
    let x = b.variable("x", Some(literal));
    // 项上下文中的内置类型名
    let type_name = b.elementary(ElementaryTypeName::Word);
    let type_stmt = b.expression_statement(type_name);
    let body = b.block(vec![arrow_stmt, type_stmt]);
    let f = b.function("f", vec![x], None, Some(body));

    let outcome = infer(vec![Declaration::Function(f)]);
    assert_eq!(
        outcome.messages(),
        vec![
            "a literal is not supported in type context",
            "operator `->` is not supported in term context",
            "type name `word` is not supported in term context",
        ]
    );
    assert!(outcome.codes().iter().all(|code| *code == "E2004"));
}

#[test]
fn test_duplicate_top_level_names() {
    let mut b = AstBuilder::new();
    let empty = b.block(vec![]);
    let first = b.function("f", vec![], None, Some(empty));
    let empty = b.block(vec![]);
    let second = b.function("f", vec![], None, Some(empty));

    let outcome = infer(vec![Declaration::Function(first), Declaration::Function(second)]);
    assert_eq!(outcome.messages(), vec!["`f` is already declared"]);
    assert_eq!(outcome.codes(), vec!["E2008"]);
}

/// 同名函数中后声明的生效，先声明的函数泛化后不会覆盖它
#[test]
fn test_later_duplicate_function_stays_bound() {
    let mut b = AstBuilder::new();
    let one = b.number("1");
    let ret = b.return_statement(Some(one));
    let body = b.block(vec![ret]);
    let first = b.function("f", vec![], None, Some(body));
    let yes = b.boolean(true);
    let ret = b.return_statement(Some(yes));
    let body = b.block(vec![ret]);
    let second = b.function("f", vec![], None, Some(body));

    let boolean = b.elementary(ElementaryTypeName::Bool);
    let x = b.variable("x", Some(boolean));
    let callee = b.identifier("f");
    let call = b.call(callee, vec![]);
    let let_x = b.let_statement(x, Some(call));
    let body = b.block(vec![let_x]);
    let main = b.function("main", vec![], None, Some(body));

    let outcome = infer(vec![
        Declaration::Function(first),
        Declaration::Function(second),
        Declaration::Function(main),
    ]);
    assert_eq!(outcome.codes(), vec!["E2008"]);
}

/// 与类型同名的类型类仍然绑定在全局作用域
#[test]
fn test_class_sharing_type_name_stays_bound() {
    let mut b = AstBuilder::new();
    let opaque = b.type_definition("T", vec![], None);
    let self_var = b.variable("self", None);
    let class = b.type_class("T", self_var, vec![]);
    let constructor = b.elementary(ElementaryTypeName::Integer);
    let target = b.identifier("T");
    let instance = b.instantiation(constructor, vec![], target, vec![]);

    let outcome = infer(vec![
        Declaration::TypeDefinition(opaque),
        Declaration::TypeClass(class),
        Declaration::Instantiation(instance),
    ]);
    assert_eq!(outcome.codes(), vec!["E2008"]);
    let recorded = outcome.output.type_system.class_instantiations();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].class.name(), "T");
}

/// 诊断带有触发它的语句位置
#[test]
fn test_diagnostic_carries_span() {
    let mut b = AstBuilder::new();
    let ret_type = b.elementary(ElementaryTypeName::Bool);
    let one = b.number("1");
    let span = Span::new(Position::new(3, 5), Position::new(3, 14));
    let ret = crate::frontend::core::ast::Statement::Return(crate::frontend::core::ast::Return {
        span,
        expression: Some(one),
    });
    let body = b.block(vec![ret]);
    let f = b.function("f", vec![], Some(ret_type), Some(body));

    let outcome = infer(vec![Declaration::Function(f)]);
    assert_eq!(outcome.diagnostics.len(), 1);
    assert_eq!(outcome.diagnostics[0].span, Some(span));
}

/// 推断遇到错误后继续，尽量多地报告
#[test]
fn test_errors_accumulate_across_functions() {
    let mut b = AstBuilder::new();
    let mut declarations = Vec::new();
    for name in ["a", "b", "c"] {
        let ret_type = b.elementary(ElementaryTypeName::Bool);
        let one = b.number("1");
        let ret = b.return_statement(Some(one));
        let body = b.block(vec![ret]);
        declarations.push(Declaration::Function(b.function(
            name,
            vec![],
            Some(ret_type),
            Some(body),
        )));
    }

    let outcome = infer(declarations);
    assert_eq!(outcome.codes(), vec!["E2001", "E2001", "E2001"]);
}

/// 出现检查：`f(x) { return x(x); }`
#[test]
fn test_self_application_is_recursive_type() {
    let mut b = AstBuilder::new();
    let x = b.variable("x", None);
    let callee = b.identifier("x");
    let arg = b.identifier("x");
    let call = b.call(callee, vec![arg]);
    let ret = b.return_statement(Some(call));
    let body = b.block(vec![ret]);
    let f = b.function("f", vec![x], None, Some(body));

    let outcome = infer(vec![Declaration::Function(f)]);
    assert_eq!(outcome.codes(), vec!["E2002"]);
    assert!(outcome.messages()[0].starts_with("recursive type: `'var0` occurs in"));
}
