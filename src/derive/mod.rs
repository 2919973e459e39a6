use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Language used when the request names none and for content fallback.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Which document a PATCH re-derives the instance config from.
///
/// `Template` keeps repeated language switches idempotent because the
/// multilingual `content` map is still available. `Instance` derives from
/// the already-resolved config, so a second switch can only fall back to
/// the empty content value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateSource {
    Template,
    Instance,
}

/// Derive an instance config from a template config for one language.
///
/// The template document is never mutated. The result always carries a
/// `language` key and a `content` key holding a single resolved value:
/// the entry for the selected language, the `"en"` entry as fallback, or
/// `{}` when `content` is absent, not a map, or has no usable entry. The
/// unresolved multilingual map never leaks into the instance.
pub fn derive_config(template_config: &Value, requested_language: Option<&str>) -> Value {
    let mut result = match template_config {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };

    let language = match requested_language {
        Some(lang) if !lang.is_empty() => lang,
        _ => DEFAULT_LANGUAGE,
    };
    result.insert("language".to_string(), json!(language));

    let content = match result.get("content") {
        Some(Value::Object(by_language)) => by_language
            .get(language)
            .or_else(|| by_language.get(DEFAULT_LANGUAGE))
            .cloned()
            .unwrap_or_else(|| json!({})),
        _ => json!({}),
    };
    result.insert("content".to_string(), content);

    Value::Object(result)
}
