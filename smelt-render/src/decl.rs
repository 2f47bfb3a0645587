//! Declarations rendered as source text.

use smelt_core::escape_reserved;
use smelt_decl::{
    GenericParam, Member, MemberModifiers, Method, Param, ParamMode, TranslatedMember,
    TranslatedType, TypeDecl,
};
use smelt_expr::{Expr, TypeKind, TypeRef};

use crate::code_builder::CodeBuilder;
use crate::expr::render_expr;
use crate::types::type_name;

pub(crate) fn render_type(builder: &mut CodeBuilder, translated: &TranslatedType<'_>) {
    let decl = translated.decl();
    let current = decl.as_ref();

    builder.open_block(&type_header(decl));
    match decl.kind() {
        TypeKind::Enum => render_enum_members(builder, decl),
        _ => {
            let mut first = true;
            for member in translated.members() {
                if !first {
                    builder.push_blank();
                }
                first = false;
                render_member(builder, member, &current, decl.kind() == TypeKind::Interface);
            }
            for helper in translated.helpers() {
                if !first {
                    builder.push_blank();
                }
                first = false;
                render_method(builder, helper, helper.body(), &current, false);
            }
        }
    }
    builder.close_block();
}

fn type_header(decl: &TypeDecl) -> String {
    let mut header = String::new();
    header.push_str(decl.visibility().keyword());
    header.push(' ');
    if let Some(modifier) = decl.modifier() {
        header.push_str(modifier.label());
        header.push(' ');
    }
    header.push_str(match decl.kind() {
        TypeKind::Class | TypeKind::Attribute => "class",
        TypeKind::Struct => "struct",
        TypeKind::Interface => "interface",
        TypeKind::Enum => "enum",
    });
    header.push(' ');
    header.push_str(&escape_reserved(decl.name()));
    header.push_str(&generic_list(decl.generic_params()));

    let mut bases: Vec<String> = Vec::new();
    if let Some(base) = decl.base() {
        bases.push(type_name(&base));
    }
    for implemented in decl.interfaces() {
        bases.push(type_name(&implemented.emitted_ref()));
    }
    if !bases.is_empty() {
        header.push_str(" : ");
        header.push_str(&bases.join(", "));
    }

    for clause in decl.generic_params().iter().filter_map(where_clause) {
        header.push(' ');
        header.push_str(&clause);
    }
    header
}

fn render_enum_members(builder: &mut CodeBuilder, decl: &TypeDecl) {
    let count = decl.enum_members().len();
    for (index, member) in decl.enum_members().iter().enumerate() {
        let mut line = escape_reserved(member.name());
        if let Some(value) = member.value() {
            line.push_str(&format!(" = {value}"));
        }
        if index + 1 < count {
            line.push(',');
        }
        builder.push_line(&line);
    }
}

fn render_member(
    builder: &mut CodeBuilder,
    translated: &TranslatedMember<'_>,
    current: &TypeRef,
    interface_mode: bool,
) {
    match translated.member() {
        Member::Method(method) => {
            render_method(builder, method, translated.body(), current, interface_mode);
        }
        Member::Constructor(ctor) => {
            let mut header = String::new();
            header.push_str(ctor.visibility().keyword());
            header.push(' ');
            header.push_str(&escape_reserved(ctor.type_name()));
            header.push('(');
            header.push_str(&param_list(ctor.params()));
            header.push(')');
            if let Some(chain) = ctor.chain() {
                let args = translated
                    .chain_args()
                    .unwrap_or(chain.args())
                    .iter()
                    .map(|arg| render_expr(arg, current))
                    .collect::<Vec<_>>()
                    .join(", ");
                let keyword = match chain.kind() {
                    smelt_decl::ChainKind::This => "this",
                    smelt_decl::ChainKind::Base => "base",
                };
                header.push_str(&format!(" : {keyword}({args})"));
            }
            builder.open_block(&header);
            if let Some(body) = translated.body() {
                render_body(builder, body, &TypeRef::void(), current);
            }
            builder.close_block();
        }
        Member::Property(property) => {
            let mut line = String::new();
            if !interface_mode {
                line.push_str(property.visibility().keyword());
                line.push(' ');
                line.push_str(&modifier_prefix(property.modifiers()));
            }
            line.push_str(&type_name(property.ty()));
            line.push(' ');
            line.push_str(&escape_reserved(property.name()));

            let abstract_like = interface_mode || property.modifiers().is_abstract();
            match translated.body() {
                Some(getter) if !abstract_like => {
                    builder.open_block(&line);
                    builder.open_block("get");
                    render_body(builder, getter, property.ty(), current);
                    builder.close_block();
                    if property.has_setter() {
                        builder.push_line("set { }");
                    }
                    builder.close_block();
                }
                _ => {
                    let accessors = if property.has_setter() {
                        "{ get; set; }"
                    } else {
                        "{ get; }"
                    };
                    builder.push_line(&format!("{line} {accessors}"));
                }
            }
        }
        Member::Field(field) => {
            let mut line = String::new();
            line.push_str(field.visibility().keyword());
            line.push(' ');
            if field.is_static() {
                line.push_str("static ");
            }
            if field.is_readonly() {
                line.push_str("readonly ");
            }
            line.push_str(&type_name(field.ty()));
            line.push(' ');
            line.push_str(&escape_reserved(field.name()));
            if let Some(init) = translated.body() {
                line.push_str(&format!(" = {}", render_expr(init, current)));
            }
            line.push(';');
            builder.push_line(&line);
        }
    }
}

pub(crate) fn render_method(
    builder: &mut CodeBuilder,
    method: &Method,
    body: Option<&Expr>,
    current: &TypeRef,
    interface_mode: bool,
) {
    let mut header = String::new();
    if !interface_mode {
        header.push_str(method.visibility().keyword());
        header.push(' ');
        header.push_str(&modifier_prefix(method.modifiers()));
    }
    header.push_str(&type_name(method.return_type()));
    header.push(' ');
    header.push_str(&escape_reserved(method.name()));
    header.push_str(&generic_list(method.generic_params()));
    header.push('(');
    header.push_str(&param_list(method.params()));
    header.push(')');
    for clause in method.generic_params().iter().filter_map(where_clause) {
        header.push(' ');
        header.push_str(&clause);
    }

    let abstract_like = interface_mode || method.modifiers().is_abstract();
    if abstract_like {
        header.push(';');
        builder.push_line(&header);
        return;
    }
    builder.open_block(&header);
    if let Some(body) = body {
        render_body(builder, body, method.return_type(), current);
    }
    builder.close_block();
}

fn render_body(builder: &mut CodeBuilder, body: &Expr, return_type: &TypeRef, current: &TypeRef) {
    match body {
        Expr::Block(block) => {
            for var in &block.variables {
                builder.push_line(&format!(
                    "{} {};",
                    type_name(var.ty()),
                    escape_reserved(var.name())
                ));
            }
            let count = block.statements.len();
            for (index, statement) in block.statements.iter().enumerate() {
                let is_last = index + 1 == count;
                render_statement(builder, statement, is_last, return_type, current);
            }
        }
        other => render_statement(builder, other, true, return_type, current),
    }
}

fn render_statement(
    builder: &mut CodeBuilder,
    statement: &Expr,
    is_last: bool,
    return_type: &TypeRef,
    current: &TypeRef,
) {
    if let Expr::Block(_) = statement {
        // a block in statement position keeps its own scope
        let void_ty = TypeRef::void();
        let inner_return = if is_last { return_type } else { &void_ty };
        builder.push_line("{");
        builder.push_indent();
        render_body(builder, statement, inner_return, current);
        builder.push_dedent();
        builder.push_line("}");
        return;
    }
    let rendered = render_expr(statement, current);
    if is_last && !return_type.is_void() {
        builder.push_line(&format!("return {rendered};"));
    } else {
        builder.push_line(&format!("{rendered};"));
    }
}

fn modifier_prefix(mods: &MemberModifiers) -> String {
    let mut prefix = String::new();
    if mods.is_static() {
        prefix.push_str("static ");
    }
    if mods.is_abstract() {
        prefix.push_str("abstract ");
    }
    if mods.is_virtual() {
        prefix.push_str("virtual ");
    }
    prefix
}

fn param_list(params: &[Param]) -> String {
    let rendered: Vec<String> = params
        .iter()
        .map(|param| {
            let mode = param.mode();
            let prefix = if mode == ParamMode::Value {
                String::new()
            } else {
                format!("{} ", mode.keyword())
            };
            format!(
                "{prefix}{} {}",
                type_name(param.ty()),
                escape_reserved(param.name())
            )
        })
        .collect();
    rendered.join(", ")
}

fn generic_list(params: &[GenericParam]) -> String {
    if params.is_empty() {
        return String::new();
    }
    let names: Vec<String> = params
        .iter()
        .map(|param| escape_reserved(param.name()))
        .collect();
    format!("<{}>", names.join(", "))
}

fn where_clause(param: &GenericParam) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();
    if param.has_class_constraint() {
        parts.push("class".to_string());
    }
    if param.has_struct_constraint() {
        parts.push("struct".to_string());
    }
    for constraint in param.constraints() {
        parts.push(type_name(&constraint));
    }
    if param.has_newable_constraint() {
        parts.push("new()".to_string());
    }
    if parts.is_empty() {
        return None;
    }
    Some(format!(
        "where {} : {}",
        escape_reserved(param.name()),
        parts.join(", ")
    ))
}
