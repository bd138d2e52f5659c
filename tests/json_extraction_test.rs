//! # 自动填充 JSON 提取测试

use market_ai::ai::extract::{
    ExtractionRule, extract_json_text, extract_json_with_rule, parse_json_reply,
};
use proptest::prelude::*;
use rstest::rstest;
use serde_json::{Map, Value, json};

#[rstest]
#[case::json_fence(
    "Claro:\n```json\n{\"title\": \"Mesa\"}\n```\nSaludos",
    "{\"title\": \"Mesa\"}",
    ExtractionRule::JsonFence
)]
#[case::plain_fence(
    "```\n{\"title\": \"Mesa\"}\n```",
    "{\"title\": \"Mesa\"}",
    ExtractionRule::AnyFence
)]
#[case::fence_without_braces_falls_through(
    "```text\nnada aquí\n``` luego {\"a\": 1} fin",
    "{\"a\": 1}",
    ExtractionRule::Braces
)]
#[case::bare_braces(
    "Resultado {\"price\": 10, \"tags\": [\"a\"]} listo",
    "{\"price\": 10, \"tags\": [\"a\"]}",
    ExtractionRule::Braces
)]
#[case::unterminated_fence(
    "```json\n{\"title\": \"Silla\"}",
    "{\"title\": \"Silla\"}",
    ExtractionRule::JsonFence
)]
#[case::whole_text("  sin estructura  ", "sin estructura", ExtractionRule::WholeText)]
fn test_extraction_rules(
    #[case] input: &str,
    #[case] expected: &str,
    #[case] rule: ExtractionRule,
) {
    assert_eq!(extract_json_with_rule(input), (expected, rule));
}

#[test]
fn test_nested_object_keeps_outer_braces() {
    let text = "ok {\"a\": {\"b\": 1}} ok";
    assert_eq!(extract_json_text(text), "{\"a\": {\"b\": 1}}");
    assert_eq!(parse_json_reply(text).unwrap(), json!({"a": {"b": 1}}));
}

#[test]
fn test_reversed_braces_are_not_a_slice() {
    assert_eq!(
        extract_json_with_rule("} al revés {"),
        ("} al revés {", ExtractionRule::WholeText)
    );
    assert!(parse_json_reply("} al revés {").is_err());
}

fn json_object() -> impl Strategy<Value = Value> {
    prop::collection::btree_map("[a-z]{1,8}", any::<i32>(), 0..6).prop_map(|entries| {
        let map: Map<String, Value> = entries
            .into_iter()
            .map(|(key, value)| (key, Value::from(value)))
            .collect();
        Value::Object(map)
    })
}

proptest! {
    #[test]
    fn prop_json_fence_round_trips(
        object in json_object(),
        prefix in "[A-Za-z ,.:]{0,40}",
        suffix in "[A-Za-z ,.:]{0,40}",
    ) {
        let reply = format!("{prefix}\n```json\n{object}\n```\n{suffix}");
        prop_assert_eq!(parse_json_reply(&reply).unwrap(), object);
    }

    #[test]
    fn prop_plain_fence_round_trips(
        object in json_object(),
        prefix in "[A-Za-z ,.:]{0,40}",
    ) {
        let reply = format!("{prefix}\n```\n{object}\n```");
        prop_assert_eq!(parse_json_reply(&reply).unwrap(), object);
    }

    #[test]
    fn prop_bare_braces_round_trip(
        object in json_object(),
        prefix in "[A-Za-z ,.:]{0,40}",
        suffix in "[A-Za-z ,.:]{0,40}",
    ) {
        let reply = format!("{prefix}{object}{suffix}");
        prop_assert_eq!(parse_json_reply(&reply).unwrap(), object);
    }
}
