//! Builder scenarios: configuration-time validation and the frozen graph.

use smelt_decl::{SourceFile, compile::ModelCompiler};
use smelt_expr::{Block, ConstValue, Expr, ExternalType, TypeKind, TypeRef, Visibility};

#[test]
fn messager_scenario_builds_compiles_and_invokes() {
    let file = SourceFile::build(|f| {
        f.namespace("Generated.Messages")?;
        let imessager = f.interface("IMessager", |i| {
            i.method("GetMessage", |m| {
                m.returns(TypeRef::string());
                Ok(())
            })?;
            Ok(())
        })?;
        f.class("Messager", |c| {
            c.implements(imessager.clone())?;
            c.method("GetMessage", |m| {
                m.returns(TypeRef::string());
                m.body(Expr::literal("Hello!"));
                Ok(())
            })?;
            Ok(())
        })?;
        Ok(())
    })
    .unwrap();

    let messager = file.type_named("Messager").unwrap();
    assert_eq!(messager.kind(), TypeKind::Class);
    assert_eq!(messager.members().len(), 1);
    let method = messager.members()[0].handle();
    assert_eq!(method.signature(), "GetMessage()");
    assert_eq!(*method.return_type(), TypeRef::string());

    let unit = ModelCompiler::new().compile_graph(&file).unwrap();
    let compiled = unit.type_named("Messager").unwrap();
    assert_eq!(
        compiled.invoke("GetMessage", &[]).unwrap(),
        ConstValue::from("Hello!")
    );
}

#[test]
fn type_names_are_validated_and_unique() {
    let err = SourceFile::build(|f| {
        f.class("hello world", |_| Ok(()))?;
        Ok(())
    })
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid type name 'hello world': name contains the disallowed character ' '"
    );

    let err = SourceFile::build(|f| {
        f.class("", |_| Ok(()))?;
        Ok(())
    })
    .unwrap_err();
    assert!(err.to_string().contains("name is empty"));

    let err = SourceFile::build(|f| {
        f.class("2Fast", |_| Ok(()))?;
        Ok(())
    })
    .unwrap_err();
    assert!(err.to_string().contains("starts with the digit '2'"));

    let err = SourceFile::build(|f| {
        f.class("Messager", |_| Ok(()))?;
        f.struct_("Messager", |_| Ok(()))?;
        Ok(())
    })
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "a type named 'Messager' already exists in this source file"
    );
}

#[test]
fn duplicate_member_signatures_are_rejected() {
    let err = SourceFile::build(|f| {
        f.class("Calc", |c| {
            c.method("Add", |m| {
                m.param("a", TypeRef::int())?;
                m.returns(TypeRef::int());
                m.body(Expr::literal(0));
                Ok(())
            })?;
            c.method("Add", |m| {
                m.param("b", TypeRef::int())?;
                m.returns(TypeRef::int());
                m.body(Expr::literal(1));
                Ok(())
            })?;
            Ok(())
        })?;
        Ok(())
    })
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "type 'Calc' already declares a member with signature 'Add(int)'"
    );

    // a different parameter list is a different signature
    SourceFile::build(|f| {
        f.class("Calc", |c| {
            c.method("Add", |m| {
                m.param("a", TypeRef::int())?;
                m.returns(TypeRef::int());
                m.body(Expr::literal(0));
                Ok(())
            })?;
            c.method("Add", |m| {
                m.param("a", TypeRef::long())?;
                m.returns(TypeRef::long());
                m.body(Expr::literal(0i64));
                Ok(())
            })?;
            Ok(())
        })?;
        Ok(())
    })
    .unwrap();
}

#[test]
fn base_type_rules_are_enforced() {
    let sealed = ExternalType::class("Acme", "SealedThing").sealed().into_ref();
    let err = SourceFile::build(|f| {
        f.class("Derived", |c| {
            c.base_type(sealed.clone())?;
            Ok(())
        })?;
        Ok(())
    })
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "'Acme.SealedThing' cannot be the base type of 'Derived': it is sealed"
    );

    let err = SourceFile::build(|f| {
        let iface = f.interface("IThing", |_| Ok(()))?;
        f.class("Derived", |c| {
            c.base_type(iface.clone())?;
            Ok(())
        })?;
        Ok(())
    })
    .unwrap_err();
    assert!(err.to_string().contains("it is an interface"));

    let base = ExternalType::class("Acme", "Widget").into_ref();
    let other = ExternalType::class("Acme", "Gadget").into_ref();
    let err = SourceFile::build(|f| {
        f.class("Derived", |c| {
            c.base_type(base.clone())?;
            c.base_type(other.clone())?;
            Ok(())
        })?;
        Ok(())
    })
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "'Derived' already has base type 'Acme.Widget'"
    );
}

#[test]
fn implements_rejects_non_interfaces() {
    let class_ref = ExternalType::class("Acme", "Widget").into_ref();
    let err = SourceFile::build(|f| {
        f.class("Impl", |c| {
            c.implements(class_ref.clone())?;
            Ok(())
        })?;
        Ok(())
    })
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "'Impl' cannot implement 'Acme.Widget': it is not an interface"
    );
}

#[test]
fn member_modifier_conflicts_are_symmetric() {
    let first_then_second = SourceFile::build(|f| {
        f.class("Host", |c| {
            c.abstract_()?;
            c.method("M", |m| {
                m.static_()?;
                m.abstract_()?;
                Ok(())
            })?;
            Ok(())
        })?;
        Ok(())
    })
    .unwrap_err();
    assert_eq!(
        first_then_second.to_string(),
        "'M()' cannot be both static and abstract"
    );

    let second_then_first = SourceFile::build(|f| {
        f.class("Host", |c| {
            c.abstract_()?;
            c.method("M", |m| {
                m.abstract_()?;
                m.static_()?;
                Ok(())
            })?;
            Ok(())
        })?;
        Ok(())
    })
    .unwrap_err();
    assert_eq!(
        second_then_first.to_string(),
        "'M()' cannot be both abstract and static"
    );

    let virtual_conflict = SourceFile::build(|f| {
        f.class("Host", |c| {
            c.method("M", |m| {
                m.virtual_()?;
                m.static_()?;
                Ok(())
            })?;
            Ok(())
        })?;
        Ok(())
    })
    .unwrap_err();
    assert_eq!(
        virtual_conflict.to_string(),
        "'M()' cannot be both virtual and static"
    );
}

#[test]
fn type_modifiers_are_mutually_exclusive() {
    let err = SourceFile::build(|f| {
        f.class("Host", |c| {
            c.static_()?;
            c.abstract_()?;
            Ok(())
        })?;
        Ok(())
    })
    .unwrap_err();
    assert_eq!(err.to_string(), "'Host' cannot be both static and abstract");
}

#[test]
fn abstract_members_need_abstract_types() {
    let err = SourceFile::build(|f| {
        f.class("Concrete", |c| {
            c.method("M", |m| {
                m.abstract_()?;
                Ok(())
            })?;
            Ok(())
        })?;
        Ok(())
    })
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "abstract member 'M()' cannot be declared on non-abstract type 'Concrete'"
    );
}

#[test]
fn bodies_are_required_exactly_when_concrete() {
    let missing = SourceFile::build(|f| {
        f.class("Host", |c| {
            c.method("M", |m| {
                m.returns(TypeRef::int());
                Ok(())
            })?;
            Ok(())
        })?;
        Ok(())
    })
    .unwrap_err();
    assert_eq!(missing.to_string(), "non-abstract member 'M()' requires a body");

    let on_abstract = SourceFile::build(|f| {
        f.class("Host", |c| {
            c.abstract_()?;
            c.method("M", |m| {
                m.abstract_()?;
                m.body(Expr::literal(1));
                Ok(())
            })?;
            Ok(())
        })?;
        Ok(())
    })
    .unwrap_err();
    assert_eq!(
        on_abstract.to_string(),
        "abstract member 'M()' cannot have a body"
    );
}

#[test]
fn constructor_chaining_is_validated() {
    // legal: sibling and accessible base constructors
    SourceFile::build(|f| {
        let base_ctor_holder = f.class("BaseHolder", |c| {
            c.ctor(|p| {
                p.param("seed", TypeRef::int())?;
                p.body(Expr::block(Block::new(vec![])));
                Ok(())
            })?;
            Ok(())
        })?;
        let _ = base_ctor_holder;
        Ok(())
    })
    .unwrap();

    let err = SourceFile::build(|f| {
        let mut other_ctor = None;
        f.class("Other", |c| {
            other_ctor = Some(c.ctor(|p| {
                p.body(Expr::block(Block::new(vec![])));
                Ok(())
            })?);
            Ok(())
        })?;
        f.class("Caller", |c| {
            let target = other_ctor.clone().unwrap();
            c.ctor(|p| {
                p.body(Expr::block(Block::new(vec![])));
                p.chains_to(&target, vec![])?;
                Ok(())
            })?;
            Ok(())
        })?;
        Ok(())
    })
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "constructor Caller() cannot call constructor Other()"
    );
}

#[test]
fn chaining_to_base_and_sibling_constructors_works() {
    let file = SourceFile::build(|f| {
        let mut base_ctor = None;
        let base = f.class("Base", |c| {
            base_ctor = Some(c.ctor(|p| {
                p.param("seed", TypeRef::int())?;
                p.body(Expr::block(Block::new(vec![])));
                Ok(())
            })?);
            Ok(())
        })?;
        f.class("Derived", |c| {
            c.base_type(base.clone())?;
            let target = base_ctor.clone().unwrap();
            let first = c.ctor(|p| {
                p.param("seed", TypeRef::int())?;
                let seed = p.param("extra", TypeRef::int());
                let _ = seed;
                p.body(Expr::block(Block::new(vec![])));
                Ok(())
            })?;
            c.ctor(|p| {
                p.body(Expr::block(Block::new(vec![])));
                p.chains_to(&target, vec![Expr::literal(1)])?;
                Ok(())
            })?;
            let _ = first;
            Ok(())
        })?;
        Ok(())
    })
    .unwrap();
    let derived = file.type_named("Derived").unwrap();
    assert_eq!(derived.members().len(), 2);
    match &derived.members()[1] {
        smelt_decl::Member::Constructor(ctor) => {
            let chain = ctor.chain().expect("configured chain");
            assert_eq!(chain.kind(), smelt_decl::ChainKind::Base);
            assert_eq!(chain.target().signature(), "Base(int)");
        }
        other => panic!("expected a constructor, got '{}'", other.signature()),
    }
}

#[test]
fn chaining_to_private_foreign_constructor_is_rejected() {
    let err = SourceFile::build(|f| {
        let mut base_ctor = None;
        let base = f.class("Base", |c| {
            base_ctor = Some(c.ctor(|p| {
                p.visibility(Visibility::Private);
                p.body(Expr::block(Block::new(vec![])));
                Ok(())
            })?);
            Ok(())
        })?;
        f.class("Derived", |c| {
            c.base_type(base.clone())?;
            let target = base_ctor.clone().unwrap();
            c.ctor(|p| {
                p.body(Expr::block(Block::new(vec![])));
                p.chains_to(&target, vec![])?;
                Ok(())
            })?;
            Ok(())
        })?;
        Ok(())
    })
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "constructor Derived() cannot call private constructor Base()"
    );
}

#[test]
fn chain_arguments_are_type_checked() {
    let err = SourceFile::build(|f| {
        let mut base_ctor = None;
        let base = f.class("Base", |c| {
            base_ctor = Some(c.ctor(|p| {
                p.param("seed", TypeRef::int())?;
                p.body(Expr::block(Block::new(vec![])));
                Ok(())
            })?);
            Ok(())
        })?;
        f.class("Derived", |c| {
            c.base_type(base.clone())?;
            let target = base_ctor.clone().unwrap();
            c.ctor(|p| {
                p.body(Expr::block(Block::new(vec![])));
                p.chains_to(&target, vec![Expr::literal("wrong")])?;
                Ok(())
            })?;
            Ok(())
        })?;
        Ok(())
    })
    .unwrap_err();
    assert!(err.to_string().contains("expects 'int', got 'string'"));
}

#[test]
fn undefined_variables_are_reported_with_types() {
    let stray_x = smelt_expr::Var::new("x", TypeRef::int());
    let stray_name = smelt_expr::Var::new("name", TypeRef::string());
    let err = SourceFile::build(|f| {
        f.class("Host", |c| {
            c.method("M", |m| {
                m.returns(TypeRef::int());
                m.body(Expr::block(Block::new(vec![
                    stray_name.read(),
                    stray_x.read(),
                ])));
                Ok(())
            })?;
            Ok(())
        })?;
        Ok(())
    })
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "body of 'M()' references undefined variable(s): name: string, x: int"
    );
}

#[test]
fn frozen_files_expose_namespace_types_and_references() {
    let disposable = smelt_expr::well_known::disposable();
    let file = SourceFile::build(|f| {
        f.namespace("Acme.Generated")?;
        f.class("Resource", |c| {
            c.implements(disposable.clone())?;
            c.method("Dispose", |m| {
                m.body(Expr::block(Block::new(vec![])));
                Ok(())
            })?;
            Ok(())
        })?;
        f.enum_("Mode", |e| {
            e.member("Fast")?;
            e.member_valued("Careful", 5)?;
            Ok(())
        })?;
        Ok(())
    })
    .unwrap();

    assert_eq!(file.namespace(), Some("Acme.Generated"));
    let names: Vec<&str> = file.types().iter().map(|t| t.name()).collect();
    assert_eq!(names, vec!["Resource", "Mode"]);
    let references: Vec<&str> = file.references().collect();
    assert_eq!(references, vec!["System.Runtime"]);
}

#[test]
fn duplicate_enum_members_are_rejected() {
    let err = SourceFile::build(|f| {
        f.enum_("Mode", |e| {
            e.member("Fast")?;
            e.member("Fast")?;
            Ok(())
        })?;
        Ok(())
    })
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "enum 'Mode' already declares a member named 'Fast'"
    );
}

#[test]
fn call_arguments_are_validated_at_the_call_site() {
    let err = SourceFile::build(|f| {
        f.class("Host", |c| {
            let greet = c.method("Greet", |m| {
                m.param("name", TypeRef::string())?;
                m.returns(TypeRef::string());
                let name = smelt_expr::Var::new("ignored", TypeRef::string());
                let _ = name;
                m.body(Expr::literal("hi"));
                Ok(())
            })?;
            c.method("Caller", |m| {
                m.returns(TypeRef::string());
                m.body(greet.call(vec![Expr::literal(42)])?);
                Ok(())
            })?;
            Ok(())
        })?;
        Ok(())
    })
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "argument 0 of Greet(string) expects 'string', got 'int'"
    );
}
