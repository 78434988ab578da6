//! 注解表测试

use super::*;
use crate::frontend::core::ast::{AstBuilder, ElementaryTypeName};
use crate::frontend::core::type_system::{InternalError, TypeSystem};
use crate::frontend::typecheck::Annotations;

#[test]
fn test_annotation_is_write_once() {
    let mut ts = TypeSystem::with_builtins().unwrap();
    let ty = ts.fresh_type_variable(false);
    let mut annotations = Annotations::new();
    annotations.set(NodeId(7), ty.clone()).unwrap();
    let err = annotations.set(NodeId(7), ty.clone()).unwrap_err();
    assert_eq!(err, InternalError::AnnotationAlreadySet { node: NodeId(7) });
    assert_eq!(annotations.type_of(NodeId(7)), Some(&ty));
    assert!(annotations.type_of(NodeId(8)).is_none());
}

/// 每个被访问的节点都有注解
#[test]
fn test_every_visited_node_is_annotated() {
    let mut b = AstBuilder::new();
    let integer = b.elementary(ElementaryTypeName::Integer);
    let x = b.variable("x", Some(integer));
    let ret_type = b.elementary(ElementaryTypeName::Integer);
    let ret_expr = b.identifier("x");
    let ret = b.return_statement(Some(ret_expr));
    let body = b.block(vec![ret]);
    let f = b.function("f", vec![x], Some(ret_type), Some(body));

    let outcome = infer(vec![Declaration::Function(f)]);
    let annotations = &outcome.output.annotations;
    assert_eq!(annotations.len(), 5);
    for id in 0..5 {
        assert!(annotations.type_of(NodeId(id)).is_some(), "node {} missing", id);
    }
    let sorted: Vec<_> = annotations.sorted().into_iter().map(|(id, _)| id).collect();
    assert_eq!(sorted, (0..5).map(NodeId).collect::<Vec<_>>());
}

/// `type_of` 返回完全解析后的类型
#[test]
fn test_type_of_is_fully_resolved() {
    let mut b = AstBuilder::new();
    let x = b.variable("x", None);
    let y = b.variable("y", None);
    let left = b.identifier("x");
    let right = b.identifier("y");
    let pair = b.tuple(vec![left, right]);
    let pair_id = pair.id;
    let ret = b.return_statement(Some(pair));
    let one = b.number("1");
    let yes = b.boolean(true);
    let assign_x = {
        let lhs = b.identifier("x");
        let e = b.assign(lhs, one);
        b.expression_statement(e)
    };
    let assign_y = {
        let lhs = b.identifier("y");
        let e = b.assign(lhs, yes);
        b.expression_statement(e)
    };
    let body = b.block(vec![ret, assign_x, assign_y]);
    let f = b.function("f", vec![x, y], None, Some(body));

    let outcome = infer(vec![Declaration::Function(f)]);
    assert!(outcome.diagnostics.is_empty());
    let resolved = outcome.output.type_of(pair_id).unwrap().unwrap();
    let ts = &outcome.output.type_system;
    assert_eq!(ts.resolve_fully(&resolved).unwrap(), resolved);
    assert_eq!(ts.type_to_string(&resolved).unwrap(), "(Integer, Bool)");
}
