//! # 模型回复中的 JSON 提取
//!
//! 按顺序尝试：```` ```json ```` 代码块、任意包含 `{` 的代码块、首个 `{` 到最后一个 `}`、
//! 整段文本。未闭合的代码块取到文本末尾。

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

use crate::error::Result;
use crate::{ldebug, logging::{LogComponent, LogStage}};

static JSON_FENCE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?s)```json(.*?)(?:```|\z)").ok());

static ANY_FENCE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?s)```[^\n`]*\n(.*?)(?:```|\z)").ok());

/// 命中的提取规则
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionRule {
    JsonFence,
    AnyFence,
    Braces,
    WholeText,
}

/// 提取 JSON 文本并返回命中的规则
#[must_use]
pub fn extract_json_with_rule(text: &str) -> (&str, ExtractionRule) {
    if let Some(body) = JSON_FENCE
        .as_ref()
        .and_then(|re| re.captures(text))
        .and_then(|caps| caps.get(1))
    {
        return (body.as_str().trim(), ExtractionRule::JsonFence);
    }

    if let Some(body) = ANY_FENCE.as_ref().and_then(|re| {
        re.captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .find(|body| body.as_str().contains('{'))
    })
    {
        return (body.as_str().trim(), ExtractionRule::AnyFence);
    }

    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}'))
        && start < end
    {
        return (&text[start..=end], ExtractionRule::Braces);
    }

    (text.trim(), ExtractionRule::WholeText)
}

/// 从模型回复中取出最可能的 JSON 片段
#[must_use]
pub fn extract_json_text(text: &str) -> &str {
    extract_json_with_rule(text).0
}

/// 提取并解析为 JSON 值
pub fn parse_json_reply(text: &str) -> Result<Value> {
    let (json_text, rule) = extract_json_with_rule(text);
    ldebug!(
        "system",
        LogStage::Internal,
        LogComponent::Extractor,
        "extract_json",
        "提取模型回复中的JSON",
        rule = ?rule,
        extracted_len = json_text.len()
    );
    Ok(serde_json::from_str(json_text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_fence_wins_over_braces() {
        let text = "Aquí está {no json}:\n```json\n{\"title\": \"Silla\"}\n```\nfin {x}";
        assert_eq!(
            extract_json_with_rule(text),
            ("{\"title\": \"Silla\"}", ExtractionRule::JsonFence)
        );
    }

    #[test]
    fn test_unterminated_fence_takes_rest() {
        let text = "```json\n{\"title\": \"Mesa\"}\n";
        assert_eq!(extract_json_text(text), "{\"title\": \"Mesa\"}");
    }

    #[test]
    fn test_parse_reply_failure_is_error() {
        assert!(parse_json_reply("no hay json aquí").is_err());
        assert_eq!(
            parse_json_reply("Resultado: {\"tags\": \"a, b\"} gracias").unwrap(),
            json!({"tags": "a, b"})
        );
    }
}
