//! End-to-end tests of template, decode and encode over an inheritance chain.

use schemacfg::parser::ParserError;
use schemacfg::{
    ConfigFactory, ConfigInstance, Error, FieldDecl, IncludeDecl, Layout, Level, PropertiesStore,
    TextParser, Value,
};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
struct Token(String);

/// Stores its text reversed, so a missing format call shows up in the file.
struct TokenParser;

impl TextParser for TokenParser {
    type Value = Token;

    fn name(&self) -> &str {
        "token"
    }

    fn parse(&self, text: &str) -> Result<Token, ParserError> {
        if text.contains('!') {
            return Err(ParserError::new("token", format!("bad token {:?}", text)));
        }
        Ok(Token(text.chars().rev().collect()))
    }

    fn format(&self, value: &Token) -> String {
        value.0.chars().rev().collect()
    }
}

fn included_level() -> Arc<schemacfg::Schema> {
    let factory = ConfigFactory::from_levels(
        "Included",
        &[Level::new("Included")
            .prefix("included")
            .field(FieldDecl::new("includedInt", "int").default_value("1"))
            .field(FieldDecl::new("includedDouble", "double").default_value("1.5"))],
    )
    .unwrap();
    Arc::clone(factory.schema())
}

fn demo_levels() -> Vec<Level> {
    vec![
        Level::new("DemoSuperSuper")
            .prefix("super.super.")
            .field(
                FieldDecl::new("inherited2", "int")
                    .default_value("-3")
                    .comment("from DemoSuperSuper"),
            )
            .field(
                FieldDecl::new("inherited", "int")
                    .default_value("-2")
                    .comment("from DemoSuperSuper"),
            )
            .field(
                FieldDecl::new("intMethod", "int")
                    .key("key")
                    .default_value("3")
                    .comment("from DemoSuperSuper"),
            ),
        Level::new("DemoSuper")
            .prefix("super ")
            .field(
                FieldDecl::new("inherited", "int")
                    .default_value("-1")
                    .comment("from DemoSuper"),
            )
            .field(
                FieldDecl::new("intMethod", "int")
                    .default_value("2")
                    .comment("from DemoSuper"),
            )
            .field(
                FieldDecl::new("randomClass", "Token")
                    .default_value("serialized string")
                    .parser(TokenParser)
                    .comment("This string is parsed into an object\n\tand this line starts with a tab."),
            ),
        Level::new("Demo")
            .prefix("prefix")
            .field(
                FieldDecl::new("intMethod", "int")
                    .default_value("1")
                    .comment("This key name is inherited from DemoSuperSuper"),
            )
            .field(FieldDecl::new("doubleMethod", "Double").default_value("0."))
            .field(
                FieldDecl::new("StringMethod", "String")
                    .default_value("Default String")
                    .comment("This is a multiline\ncomment.\n\nThis is a new paragraph."),
            )
            .field(
                FieldDecl::new("doubles", "List<Double>")
                    .default_value("0. 5.34 17")
                    .comment("List of Doubles"),
            )
            .field(
                FieldDecl::new("randomClass", "Token")
                    .default_value("set in Demo")
                    .parser(TokenParser),
            )
            .field(
                FieldDecl::new("randoms", "List<Token>")
                    .default_value("obj1\nobj2\nobj3 obj4\n")
                    .parser(TokenParser)
                    .comment("List of tokens"),
            )
            .field(FieldDecl::new("notConfigured", "String"))
            .include(IncludeDecl::new("included", included_level()).comment("Included values")),
    ]
}

fn demo() -> ConfigFactory {
    ConfigFactory::from_levels("Demo", &demo_levels()).unwrap()
}

#[test]
fn test_schema_order_and_prefix() {
    let factory = demo();
    let ids: Vec<&str> = factory
        .schema()
        .fields()
        .iter()
        .map(|f| f.identifier.as_str())
        .collect();
    assert_eq!(
        ids,
        vec![
            "inherited2",
            "inherited",
            "intMethod",
            "randomClass",
            "doubleMethod",
            "StringMethod",
            "doubles",
            "randoms"
        ]
    );
    assert_eq!(factory.prefix(), "prefix.");
}

#[test]
fn test_override_precedence() {
    let factory = demo();
    let field = factory.schema().field("intMethod").unwrap();
    assert_eq!(field.key, "key");
    assert_eq!(field.default_literal, "1");
    assert_eq!(field.comment, "This key name is inherited from DemoSuperSuper");
    assert_eq!(factory.schema().effective_key(field), "prefix.key");

    let field = factory.schema().field("randomClass").unwrap();
    assert_eq!(field.comment, "");
    assert_eq!(field.default_literal, "set in Demo");
}

#[test]
fn test_template_values() {
    let template = demo().get_template().unwrap();
    assert_eq!(template.value::<i32>("intMethod").unwrap(), 1);
    assert_eq!(template.value::<i32>("inherited").unwrap(), -1);
    assert_eq!(template.value::<f64>("doubleMethod").unwrap(), 0.0);
    assert_eq!(
        template.value::<Vec<f64>>("doubles").unwrap(),
        vec![0.0, 5.34, 17.0]
    );
    assert_eq!(
        template.parsed::<Token>("randomClass").unwrap(),
        Token("omeD ni tes".into())
    );
    assert_eq!(template.parsed_list::<Token>("randoms").unwrap().len(), 4);
    assert!(template.get("notConfigured").is_none());
    assert_eq!(
        template
            .included("included")
            .unwrap()
            .value::<f64>("includedDouble")
            .unwrap(),
        1.5
    );
}

#[test]
fn test_round_trip() {
    let factory = demo();
    let template = factory.get_template().unwrap();
    let store = factory.to_store(&template).unwrap();
    assert_eq!(factory.from_store(&store).unwrap(), template);

    let text = store.to_text();
    let reread = PropertiesStore::from_text(&text).unwrap();
    assert_eq!(factory.from_store(&reread).unwrap(), template);
}

#[test]
fn test_encoded_layout() {
    let factory = demo();
    let store = factory.to_store(&factory.get_template().unwrap()).unwrap();
    let keys: Vec<&str> = store.keys().collect();
    assert_eq!(
        keys,
        vec![
            "prefix.inherited2",
            "prefix.inherited",
            "prefix.key",
            "prefix.randomClass",
            "prefix.doubleMethod",
            "prefix.StringMethod",
            "prefix.doubles",
            "prefix.randoms",
            "included.includedInt",
            "included.includedDouble",
        ]
    );
    assert_eq!(store.get_string("prefix.randomClass"), Some("set in Demo"));
    assert_eq!(store.get_string("prefix.doubleMethod"), Some("0.0"));
    assert_eq!(
        store.get_string_array("prefix.randoms").unwrap(),
        vec!["obj1", "obj2", "obj3", "obj4"]
    );
    assert_eq!(store.layout().blank_lines_before("prefix.inherited2"), 1);
    assert_eq!(store.layout().blank_lines_before("included.includedInt"), 1);
    assert_eq!(store.layout().comment("prefix.doubleMethod"), None);
    assert_eq!(
        store.layout().comment("included.includedInt"),
        Some("Included values")
    );

    let text = store.to_text();
    assert!(text.starts_with("\n# from DemoSuperSuper\nprefix.inherited2 = -3\n"));
    assert!(text.contains("# List of Doubles\nprefix.doubles = 0.0\nprefix.doubles = 5.34\nprefix.doubles = 17.0\n"));
    assert!(text.contains("# This is a multiline\n# comment.\n#\n# This is a new paragraph.\n"));
}

#[test]
fn test_idempotent_re_encode() {
    let factory = demo();
    let text = "\
prefix.inherited2 = 10
prefix.inherited = 0x10
prefix.key = -7
prefix.randomClass = abc
prefix.doubleMethod = 2.5
prefix.StringMethod =  padded
prefix.doubles = 1
prefix.doubles = 2.25
prefix.randoms = one
included.includedInt = 4
included.includedDouble = 1e3
";
    let store = PropertiesStore::from_text(text).unwrap();
    let instance = factory.from_store(&store).unwrap();
    assert_eq!(instance.value::<i32>("inherited").unwrap(), 16);
    assert_eq!(instance.value::<String>("StringMethod").unwrap(), "padded");

    let again = factory.to_store(&instance).unwrap();
    let mut original_keys: Vec<&str> = store.keys().collect();
    let mut encoded_keys: Vec<&str> = again.keys().collect();
    original_keys.sort_unstable();
    encoded_keys.sort_unstable();
    assert_eq!(original_keys, encoded_keys);
    assert_eq!(factory.from_store(&again).unwrap(), instance);
    assert_eq!(again.get_string("prefix.randomClass"), Some("abc"));
    assert_eq!(again.get_string("included.includedDouble"), Some("1000.0"));
}

#[test]
fn test_missing_key_under_other_prefix() {
    let factory = demo().with_prefix("otherPrefix");
    assert_eq!(factory.prefix(), "otherPrefix.");
    let mut store = factory.to_store(&factory.get_template().unwrap()).unwrap();
    assert!(store.remove("otherPrefix.randoms").is_some());

    let err = factory.from_store(&store).unwrap_err();
    assert!(matches!(err, Error::MissingKey(ref key) if key == "otherPrefix.randoms"));
    assert_eq!(err.to_string(), "No such key otherPrefix.randoms");
}

#[test]
fn test_stored_value_wins_over_default() {
    let factory = demo();
    let mut store = factory.to_store(&factory.get_template().unwrap()).unwrap();
    store.set_property("prefix.key", "42");
    assert_eq!(
        factory.from_store(&store).unwrap().value::<i32>("intMethod").unwrap(),
        42
    );
}

#[test]
fn test_parser_error_passes_through() {
    let factory = demo();
    let mut store = factory.to_store(&factory.get_template().unwrap()).unwrap();
    store.set_property("prefix.randomClass", "boom!");
    let err = factory.from_store(&store).unwrap_err();
    match err {
        Error::Parser(e) => assert_eq!(e.parser, "token"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_with_field_on_instance() {
    let factory = demo();
    let template = factory.get_template().unwrap();
    let store = factory
        .with_field(&template, "doubles", vec![1.5, 2.5])
        .unwrap();
    assert_eq!(
        store.get_string_array("prefix.doubles").unwrap(),
        vec!["1.5", "2.5"]
    );
    assert_eq!(store.get_string("prefix.key"), Some("1"));
    assert_eq!(store.len(), 10);
}

#[test]
fn test_with_field_in_store_keeps_everything_else() {
    let factory = demo();
    let mut layout = Layout::new();
    layout.set_header_comment(Some("generated".to_string()));
    let store = factory
        .to_store_with_layout(&factory.get_template().unwrap(), layout)
        .unwrap();

    let value = factory.parse_field_text("randoms", "x y").unwrap();
    let updated = factory
        .with_field_in_store(&store, "randoms", value)
        .unwrap();
    assert_eq!(
        updated.get_string_array("prefix.randoms").unwrap(),
        vec!["x", "y"]
    );
    for key in store.keys().filter(|k| *k != "prefix.randoms") {
        assert_eq!(updated.get(key), store.get(key), "{key} changed");
    }
    assert_eq!(updated.layout(), store.layout());
    assert_eq!(updated.into_layout().header_comment(), Some("generated"));
}

#[test]
fn test_with_field_replaces_parsed_value() {
    let factory = demo();
    let template = factory.get_template().unwrap();
    let token = Value::parsed(Token("olleh".into()));
    let store = factory.with_field(&template, "randomClass", token).unwrap();
    assert_eq!(store.get_string("prefix.randomClass"), Some("hello"));
}

#[test]
fn test_prefix_normalization_from_middle_level() {
    let levels = demo_levels();
    let factory = ConfigFactory::from_levels("DemoSuper", &levels[..2]).unwrap();
    assert_eq!(factory.prefix(), "super.");
    let store = factory.to_store(&factory.get_template().unwrap()).unwrap();
    assert_eq!(store.get_string("super.key"), Some("2"));
}

#[test]
fn test_template_error_aborts() {
    let factory = ConfigFactory::from_levels(
        "Bad",
        &[Level::new("Bad").field(FieldDecl::new("n", "int").default_value("x"))],
    )
    .unwrap();
    assert!(matches!(
        factory.get_template().unwrap_err(),
        Error::Template { .. }
    ));
}

#[test]
fn test_instance_builder_matches_template() {
    let factory = ConfigFactory::from_levels(
        "Small",
        &[Level::new("Small")
            .field(FieldDecl::new("flag", "boolean").default_value("TRUE"))
            .field(FieldDecl::new("names", "List<String>").default_value("a b"))],
    )
    .unwrap();
    let expected = ConfigInstance::new()
        .with("flag", true)
        .with("names", vec!["a", "b"]);
    assert_eq!(factory.get_template().unwrap(), expected);
    let store = factory.to_store(&expected).unwrap();
    assert_eq!(store.get_string("flag"), Some("true"));
}
