//! 泛化（fresh）测试

use super::*;

#[test]
fn test_fresh_generalize_renames_consistently() {
    let mut ts = system();
    let a = ts.fresh_type_variable(false);
    let f = function(&ts, a.clone(), a.clone());

    let copy = ts.fresh(&f, true).unwrap();
    let helpers = crate::frontend::core::type_system::TypeSystemHelpers::new(&ts);
    let (domain, codomain) = helpers.dest_function_type(&copy).unwrap();
    assert_eq!(domain, codomain);
    assert_ne!(domain, a);
    assert!(domain.as_variable().unwrap().is_generic());
}

#[test]
fn test_fresh_without_generalize_keeps_plain_variables() {
    let mut ts = system();
    let a = ts.fresh_type_variable(false);
    let g = ts.fresh_type_variable(true);
    let f = function(&ts, a.clone(), g.clone());

    let copy = ts.fresh(&f, false).unwrap();
    let helpers = crate::frontend::core::type_system::TypeSystemHelpers::new(&ts);
    let (domain, codomain) = helpers.dest_function_type(&copy).unwrap();
    assert_eq!(domain, a);
    assert_ne!(codomain, g);
    assert!(codomain.as_variable().unwrap().is_generic());
}

#[test]
fn test_fresh_copies_are_independent() {
    let mut ts = system();
    let g = ts.fresh_type_variable(true);
    let int = integer(&ts);
    let w = word(&ts);
    let id = function(&ts, g.clone(), g);

    let first = ts.fresh(&id, false).unwrap();
    let second = ts.fresh(&id, false).unwrap();
    let use_int = function(&ts, int.clone(), int.clone());
    let use_word = function(&ts, w.clone(), w.clone());

    assert!(ts.unify(&first, &use_int).unwrap().is_empty());
    assert!(ts.unify(&second, &use_word).unwrap().is_empty());
    assert_eq!(ts.resolve_fully(&first).unwrap(), use_int);
    assert_eq!(ts.resolve_fully(&second).unwrap(), use_word);
}

#[test]
fn test_fresh_sees_through_bindings() {
    let mut ts = system();
    let a = ts.fresh_type_variable(false);
    let int = integer(&ts);
    ts.instantiate(a.as_variable().unwrap(), int.clone())
        .unwrap();
    let p = pair(&ts, a, int.clone());
    assert_eq!(ts.fresh(&p, true).unwrap(), pair(&ts, int.clone(), int));
}
