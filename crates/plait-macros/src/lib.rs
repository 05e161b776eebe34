//! `#[derive(Grammar)]` for plait output types.
//!
//! Expands field attributes into the registration calls a hand-written
//! `Grammar::describe` would make, in field order.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::parse::ParseStream;
use syn::{
    Attribute, Data, DataStruct, DeriveInput, Fields, Ident, LitStr, Token, parse_macro_input,
};

/// Derives `plait::Grammar` for a struct with named fields.
///
/// ```rust,ignore
/// #[derive(Default, Grammar)]
/// #[grammar(name = "Assign")]
/// struct Assignment {
///     #[grammar("@Ident '='")]
///     name: String,
///     #[grammar("@@ ';'")]
///     value: Box<Expr>,
///     #[grammar(pos)]
///     pos: plait::Position,
/// }
/// ```
///
/// The capture kind is read from the annotation: `@@` registers a nested
/// field, `@` a value field, and an annotation without captures a plain rule.
/// `custom`, `embed`, `value`, `node` and `rule` override the choice;
/// `pos`, `end_pos` and `tokens` take no annotation. Fields without
/// `#[grammar]` are not part of the grammar.
#[proc_macro_derive(Grammar, attributes(grammar))]
pub fn derive_grammar(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Role {
    Value,
    Custom,
    Node,
    Embed,
    Rule,
    Pos,
    EndPos,
    Tokens,
}

impl Role {
    fn from_ident(ident: &Ident) -> syn::Result<Self> {
        Ok(match ident.to_string().as_str() {
            "value" => Role::Value,
            "custom" => Role::Custom,
            "node" => Role::Node,
            "embed" => Role::Embed,
            "rule" => Role::Rule,
            "pos" => Role::Pos,
            "end_pos" => Role::EndPos,
            "tokens" => Role::Tokens,
            other => {
                return Err(syn::Error::new(
                    ident.span(),
                    format!("unknown grammar option `{other}`"),
                ));
            }
        })
    }

    fn is_span(self) -> bool {
        matches!(self, Role::Pos | Role::EndPos | Role::Tokens)
    }
}

#[derive(Default)]
struct FieldAttr {
    annotation: Option<LitStr>,
    role: Option<Role>,
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let Data::Struct(DataStruct {
        fields: Fields::Named(fields),
        ..
    }) = &input.data
    else {
        return Err(syn::Error::new(
            input.ident.span(),
            "Grammar can only be derived for structs with named fields",
        ));
    };

    let mut calls = Vec::new();
    if let Some(name) = type_name(&input.attrs)? {
        calls.push(quote! { g.name(#name); });
    }

    for field in &fields.named {
        let Some(ident) = &field.ident else {
            continue;
        };
        let Some(attr) = field_attr(&field.attrs)? else {
            continue;
        };
        calls.push(registration(ident, attr)?);
    }

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    Ok(quote! {
        impl #impl_generics ::plait::Grammar for #ident #ty_generics #where_clause {
            fn describe(g: &mut ::plait::Describe<Self>) {
                #(#calls)*
            }
        }
    })
}

fn registration(ident: &Ident, attr: FieldAttr) -> syn::Result<TokenStream2> {
    let name = ident.unraw().to_string();

    if let Some(role) = attr.role.filter(|role| role.is_span()) {
        if let Some(annotation) = attr.annotation {
            return Err(syn::Error::new(
                annotation.span(),
                "position fields take no annotation",
            ));
        }
        return Ok(match role {
            Role::Pos => quote! { g.pos(|node| &mut node.#ident); },
            Role::EndPos => quote! { g.end_pos(|node| &mut node.#ident); },
            _ => quote! { g.tokens(|node| &mut node.#ident); },
        });
    }

    let Some(annotation) = attr.annotation else {
        return Err(syn::Error::new(
            ident.span(),
            "missing annotation, e.g. #[grammar(\"@Ident\")]",
        ));
    };
    let role = attr
        .role
        .unwrap_or_else(|| classify(&annotation.value()));

    Ok(match role {
        Role::Value => quote! { g.value(#name, #annotation, |node| &mut node.#ident); },
        Role::Custom => quote! { g.custom(#name, #annotation, |node| &mut node.#ident); },
        Role::Node => quote! { g.node(#name, #annotation, |node| &mut node.#ident); },
        Role::Embed => quote! { g.embed(#name, #annotation, |node| &mut node.#ident); },
        _ => quote! { g.rule(#name, #annotation); },
    })
}

/// Picks the role from the capture operators outside string literals.
fn classify(annotation: &str) -> Role {
    let mut chars = annotation.chars().peekable();
    let mut value = false;
    while let Some(c) = chars.next() {
        match c {
            '"' | '\'' => {
                while let Some(inner) = chars.next() {
                    if inner == '\\' {
                        chars.next();
                    } else if inner == c {
                        break;
                    }
                }
            }
            '@' if chars.peek() == Some(&'@') => return Role::Node,
            '@' => value = true,
            _ => {}
        }
    }
    if value { Role::Value } else { Role::Rule }
}

fn grammar_attrs(attrs: &[Attribute]) -> impl Iterator<Item = &Attribute> {
    attrs.iter().filter(|attr| attr.path().is_ident("grammar"))
}

/// `#[grammar(name = "...")]` on the struct.
fn type_name(attrs: &[Attribute]) -> syn::Result<Option<LitStr>> {
    let mut name = None;
    for attr in grammar_attrs(attrs) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                name = Some(meta.value()?.parse::<LitStr>()?);
                Ok(())
            } else {
                Err(meta.error("expected `name = \"...\"`"))
            }
        })?;
    }
    Ok(name)
}

/// `#[grammar("annotation", option)]` on a field.
fn field_attr(attrs: &[Attribute]) -> syn::Result<Option<FieldAttr>> {
    let mut found: Option<FieldAttr> = None;
    for attr in grammar_attrs(attrs) {
        if found.is_some() {
            return Err(syn::Error::new_spanned(attr, "duplicate `grammar` attribute"));
        }
        let parsed = attr.parse_args_with(|input: ParseStream| {
            let mut parsed = FieldAttr::default();
            while !input.is_empty() {
                if input.peek(LitStr) {
                    let annotation: LitStr = input.parse()?;
                    if parsed.annotation.replace(annotation).is_some() {
                        return Err(input.error("only one annotation per field"));
                    }
                } else {
                    let ident: Ident = input.parse()?;
                    let role = Role::from_ident(&ident)?;
                    if parsed.role.replace(role).is_some() {
                        return Err(syn::Error::new(ident.span(), "conflicting grammar options"));
                    }
                }
                if input.is_empty() {
                    break;
                }
                input.parse::<Token![,]>()?;
            }
            Ok(parsed)
        })?;
        found = Some(parsed);
    }
    Ok(found)
}
