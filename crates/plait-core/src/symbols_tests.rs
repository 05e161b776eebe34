use crate::{Symbols, TokenKind};

#[test]
fn eof_is_always_zero() {
    let symbols = Symbols::new();
    assert_eq!(symbols.get("EOF"), Some(TokenKind::EOF));
    assert_eq!(symbols.name(TokenKind::EOF), Some("EOF"));
    assert_eq!(symbols.len(), 1);
}

#[test]
fn define_is_idempotent() {
    let mut symbols = Symbols::new();
    let ident = symbols.define("Ident");
    let int = symbols.define("Int");

    assert_eq!(ident.id(), 1);
    assert_eq!(int.id(), 2);
    assert_eq!(symbols.define("Ident"), ident);
    assert_eq!(symbols.len(), 3);
}

#[test]
fn unknown_kind_has_no_name() {
    let symbols: Symbols = ["Ident"].into_iter().collect();
    assert_eq!(symbols.name(TokenKind::new(7)), None);
    assert_eq!(symbols.get("Float"), None);
}

#[test]
fn names_in_definition_order() {
    let symbols: Symbols = ["Ident", "Int", "Punct"].into_iter().collect();
    let names: Vec<_> = symbols.names().collect();
    assert_eq!(names, ["EOF", "Ident", "Int", "Punct"]);
}

#[test]
fn serializes_as_name_to_id_map() {
    let symbols: Symbols = ["Ident"].into_iter().collect();
    let json = serde_json::to_string(&symbols).unwrap();
    insta::assert_snapshot!(json, @r#"{"names":{"EOF":0,"Ident":1}}"#);
}
