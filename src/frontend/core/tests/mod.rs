//! 类型系统测试模块

mod fresh;

use crate::frontend::core::ast::NodeId;
use crate::frontend::core::type_system::{
    BuiltinType, DeclarationRef, Type, TypeConstructor, TypeSystem,
};

/// 带全部内置类型的存储
fn system() -> TypeSystem {
    TypeSystem::with_builtins().unwrap()
}

fn integer(ts: &TypeSystem) -> Type {
    ts.builtin_type(BuiltinType::Integer, vec![]).unwrap()
}

fn word(ts: &TypeSystem) -> Type {
    ts.builtin_type(BuiltinType::Word, vec![]).unwrap()
}

fn unit(ts: &TypeSystem) -> Type {
    ts.builtin_type(BuiltinType::Unit, vec![]).unwrap()
}

fn pair(
    ts: &TypeSystem,
    a: Type,
    b: Type,
) -> Type {
    ts.builtin_type(BuiltinType::Pair, vec![a, b]).unwrap()
}

fn function(
    ts: &TypeSystem,
    a: Type,
    b: Type,
) -> Type {
    ts.builtin_type(BuiltinType::Function, vec![a, b]).unwrap()
}

/// 声明一个名义类型构造器
fn nominal(
    ts: &mut TypeSystem,
    id: u32,
    name: &str,
    arity: usize,
) -> TypeConstructor {
    let declaration = DeclarationRef::new(NodeId(id), name);
    ts.declare_type_constructor(declaration.clone(), arity)
        .unwrap();
    TypeConstructor::Declaration(declaration)
}
