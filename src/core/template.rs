use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Za-z]+)\}").expect("placeholder pattern is valid"));

/// Replaces `{name}` placeholders with values from `tokens`. Placeholders
/// without a matching token are kept as written.
pub fn render(template: &str, tokens: &HashMap<&str, String>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| match tokens.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}
