//! Block extraction during translation: helper synthesis, capture lists,
//! deduplication, and stability across repeated translation.

use smelt_decl::{Member, SourceFile};
use smelt_expr::{BinaryOp, Block, Expr, TypeRef, Var};

/// `test ? { v = 2; v * x } : { v = 3; v * x }` with both arms
/// multi-statement.
fn build_conditional_file() -> SourceFile {
    SourceFile::build(|f| {
        f.class("Chooser", |c| {
            c.method("Choose", |m| {
                let test = m.param("test", TypeRef::bool())?;
                let x = m.param("x", TypeRef::int())?;
                m.returns(TypeRef::int());

                let arm = |value: i32| {
                    let v = Var::new("v", TypeRef::int());
                    Ok::<_, Box<smelt_decl::Error>>(Expr::block(Block::with_variables(
                        vec![v.clone()],
                        vec![
                            v.assign(Expr::literal(value))?,
                            Expr::binary(BinaryOp::Multiply, v.read(), x.read())?,
                        ],
                    )))
                };
                m.body(Expr::conditional(test.read(), arm(2)?, arm(3)?)?);
                Ok(())
            })?;
            Ok(())
        })?;
        Ok(())
    })
    .unwrap()
}

#[test]
fn both_arms_are_extracted_into_single_parameter_helpers() {
    let file = build_conditional_file();
    let unit = file.translate();
    let chooser = &unit.types()[0];

    let helpers = chooser.helpers();
    assert_eq!(helpers.len(), 2);
    for helper in helpers {
        assert_eq!(helper.params().len(), 1);
        assert_eq!(helper.params()[0].name(), "x");
        assert_eq!(*helper.params()[0].ty(), TypeRef::int());
        assert_eq!(*helper.return_type(), TypeRef::int());
        assert!(helper.visibility().is_private());
    }
    assert_eq!(helpers[0].name(), "GetInt32");
    assert_eq!(helpers[1].name(), "GetInt322");

    // the original body now delegates to the helpers
    let body = chooser.members()[0].body().expect("translated body");
    match body {
        Expr::Conditional {
            if_true, if_false, ..
        } => {
            for arm in [if_true, if_false] {
                match arm.as_ref() {
                    Expr::Call { method, args, .. } => {
                        assert!(method.name().starts_with("GetInt32"));
                        assert_eq!(args.len(), 1);
                        assert!(matches!(args[0], Expr::Var(_)));
                    }
                    other => panic!("expected call, got {}", other.kind_label()),
                }
            }
        }
        other => panic!("expected conditional, got {}", other.kind_label()),
    }
}

#[test]
fn repeated_translation_does_not_accumulate_helpers() {
    let file = build_conditional_file();
    let first = file.translate();
    let second = file.translate();
    assert_eq!(first.types()[0].helpers().len(), 2);
    assert_eq!(second.types()[0].helpers().len(), 2);

    let first_names: Vec<&str> = first.types()[0]
        .helpers()
        .iter()
        .map(|h| h.name())
        .collect();
    let second_names: Vec<&str> = second.types()[0]
        .helpers()
        .iter()
        .map(|h| h.name())
        .collect();
    assert_eq!(first_names, second_names);
}

#[test]
fn structurally_equal_blocks_share_one_helper() {
    let file = SourceFile::build(|f| {
        f.class("Twice", |c| {
            c.method("Same", |m| {
                let x = m.param("x", TypeRef::int())?;
                m.returns(TypeRef::int());
                let arm = || {
                    let v = Var::new("v", TypeRef::int());
                    Ok::<_, Box<smelt_decl::Error>>(Expr::block(Block::with_variables(
                        vec![v.clone()],
                        vec![
                            v.assign(Expr::literal(2))?,
                            Expr::binary(BinaryOp::Multiply, v.read(), x.read())?,
                        ],
                    )))
                };
                m.body(Expr::binary(BinaryOp::Add, arm()?, arm()?)?);
                Ok(())
            })?;
            Ok(())
        })?;
        Ok(())
    })
    .unwrap();

    let unit = file.translate();
    assert_eq!(unit.types()[0].helpers().len(), 1);
}

#[test]
fn nested_blocks_chain_helpers() {
    let file = SourceFile::build(|f| {
        f.class("Nested", |c| {
            c.method("Outer", |m| {
                let x = m.param("x", TypeRef::int())?;
                m.returns(TypeRef::int());

                let inner_v = Var::new("v", TypeRef::int());
                let inner = Expr::block(Block::with_variables(
                    vec![inner_v.clone()],
                    vec![
                        inner_v.assign(Expr::literal(10))?,
                        Expr::binary(BinaryOp::Add, inner_v.read(), x.read())?,
                    ],
                ));
                let outer_w = Var::new("w", TypeRef::int());
                let outer = Expr::block(Block::with_variables(
                    vec![outer_w.clone()],
                    vec![
                        // the inner block sits in an operand position here
                        outer_w.assign(Expr::binary(BinaryOp::Multiply, inner, Expr::literal(2))?)?,
                        outer_w.read(),
                    ],
                ));
                m.body(Expr::conditional(
                    Expr::literal(true),
                    outer,
                    Expr::literal(0),
                )?);
                Ok(())
            })?;
            Ok(())
        })?;
        Ok(())
    })
    .unwrap();

    let unit = file.translate();
    let helpers = unit.types()[0].helpers();
    assert_eq!(helpers.len(), 2);

    // the inner helper was extracted first, so the outer helper's body calls it
    let outer_helper = &helpers[1];
    let mut calls_inner = false;
    if let Some(Expr::Block(block)) = outer_helper.body() {
        for statement in &block.statements {
            smelt_expr::visit::walk(statement, &mut |expr| {
                if let Expr::Call { method, .. } = expr {
                    if method.name() == helpers[0].name() {
                        calls_inner = true;
                    }
                }
            });
        }
    }
    assert!(calls_inner, "outer helper should delegate to the inner one");
}

#[test]
fn helpers_mirror_the_staticness_of_their_member() {
    let file = SourceFile::build(|f| {
        f.class("StaticHost", |c| {
            c.method("Compute", |m| {
                m.static_()?;
                let x = m.param("x", TypeRef::int())?;
                m.returns(TypeRef::int());
                let v = Var::new("v", TypeRef::int());
                let block = Expr::block(Block::with_variables(
                    vec![v.clone()],
                    vec![
                        v.assign(Expr::literal(1))?,
                        Expr::binary(BinaryOp::Add, v.read(), x.read())?,
                    ],
                ));
                m.body(Expr::binary(BinaryOp::Add, block, Expr::literal(0))?);
                Ok(())
            })?;
            Ok(())
        })?;
        Ok(())
    })
    .unwrap();

    let unit = file.translate();
    let helper = &unit.types()[0].helpers()[0];
    assert!(helper.modifiers().is_static());
    assert!(helper.handle().is_static());
}

#[test]
fn helper_names_avoid_declared_members() {
    let file = SourceFile::build(|f| {
        f.class("Clash", |c| {
            // a member already owns the default helper name
            c.method("GetInt32", |m| {
                m.returns(TypeRef::int());
                m.body(Expr::literal(7));
                Ok(())
            })?;
            c.method("Compute", |m| {
                let x = m.param("x", TypeRef::int())?;
                m.returns(TypeRef::int());
                let v = Var::new("v", TypeRef::int());
                let block = Expr::block(Block::with_variables(
                    vec![v.clone()],
                    vec![
                        v.assign(Expr::literal(2))?,
                        Expr::binary(BinaryOp::Multiply, v.read(), x.read())?,
                    ],
                ));
                m.body(Expr::binary(BinaryOp::Add, block, Expr::literal(1))?);
                Ok(())
            })?;
            Ok(())
        })?;
        Ok(())
    })
    .unwrap();

    let unit = file.translate();
    let clash = unit
        .types()
        .iter()
        .find(|t| t.decl().name() == "Clash")
        .unwrap();
    assert_eq!(clash.helpers().len(), 1);
    assert_eq!(clash.helpers()[0].name(), "GetInt322");
}

#[test]
fn single_statement_blocks_are_left_alone() {
    let file = SourceFile::build(|f| {
        f.class("Plain", |c| {
            c.method("Identity", |m| {
                let x = m.param("x", TypeRef::int())?;
                m.returns(TypeRef::int());
                m.body(Expr::binary(
                    BinaryOp::Add,
                    Expr::block(Block::new(vec![x.read()])),
                    Expr::literal(0),
                )?);
                Ok(())
            })?;
            Ok(())
        })?;
        Ok(())
    })
    .unwrap();

    let unit = file.translate();
    assert!(unit.types()[0].helpers().is_empty());
}

#[test]
fn member_visibility_of_helpers_is_private() {
    let file = build_conditional_file();
    let unit = file.translate();
    for helper in unit.types()[0].helpers() {
        assert!(matches!(
            unit.types()[0].members().first().map(|m| m.member()),
            Some(Member::Method(_))
        ));
        assert!(helper.visibility().is_private());
    }
}
