//! Narrowing of raw model output to a JSON object candidate.
//!
//! Models are asked for bare JSON but routinely wrap it in markdown fences
//! or a sentence of prose. [`extract_json_object`] strips fence markers and
//! keeps the span from the first `{` to the last `}`. It does not parse.

use std::sync::LazyLock;

use regex::Regex;

/// A fence marker with an optional language tag and the whitespace after it.
///
/// Any tag is removed, not just `json`, so a backtick run inside a string
/// value also loses the word that follows it ("Use ```rust blocks" becomes
/// "Use blocks").
static FENCE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```[A-Za-z0-9_+-]*\s*").expect("fence marker pattern is valid")
});

/// Remove every fenced-code marker (opening or closing) from `raw`.
pub fn strip_code_fences(raw: &str) -> String {
    FENCE_MARKER.replace_all(raw, "").into_owned()
}

/// Extract the outermost `{ ... }` span from model output.
///
/// The span runs from the first `{` to the last `}` of the fence-stripped
/// text, without checking that the braces balance. Returns `None` when no
/// such pair exists.
pub fn extract_json_object(raw: &str) -> Option<String> {
    let text = strip_code_fences(raw);
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if start >= end {
        return None;
    }
    Some(text[start..=end].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_fence() {
        assert_eq!(
            extract_json_object("```json\n{\"a\":1}\n```").as_deref(),
            Some("{\"a\":1}")
        );
    }

    #[test]
    fn strips_bare_fence() {
        assert_eq!(
            extract_json_object("```\n{\"a\":1}\n```").as_deref(),
            Some("{\"a\":1}")
        );
    }

    #[test]
    fn no_braces_is_not_found() {
        assert_eq!(extract_json_object("no braces here"), None);
        assert_eq!(extract_json_object(""), None);
    }

    #[test]
    fn nested_braces_use_first_open_and_last_close() {
        assert_eq!(
            extract_json_object("prefix {\"x\":[1,{\"y\":2}]} suffix").as_deref(),
            Some("{\"x\":[1,{\"y\":2}]}")
        );
    }

    #[test]
    fn span_covers_two_separate_objects() {
        // Not balanced matching: both objects and the text between them.
        assert_eq!(
            extract_json_object("{\"a\":1} and {\"b\":2}").as_deref(),
            Some("{\"a\":1} and {\"b\":2}")
        );
    }

    #[test]
    fn close_before_open_is_not_found() {
        assert_eq!(extract_json_object("} oops {"), None);
        assert_eq!(extract_json_object("only an opening {"), None);
        assert_eq!(extract_json_object("only a closing }"), None);
    }

    #[test]
    fn prose_and_fence_around_plan() {
        let raw = "Sure! ```json\n{\"durationDays\":7,\"tasks\":[]}\n``` Hope this helps.";
        assert_eq!(
            extract_json_object(raw).as_deref(),
            Some("{\"durationDays\":7,\"tasks\":[]}")
        );
    }

    #[test]
    fn strip_removes_every_marker() {
        assert_eq!(strip_code_fences("```json\nA\n```\n```\nB```"), "A\nB");
    }

    #[test]
    fn fence_inside_string_value_drops_following_word() {
        let raw = r#"{"subtasks": ["Use ```rust blocks"]}"#;
        assert_eq!(
            extract_json_object(raw).unwrap(),
            r#"{"subtasks": ["Use blocks"]}"#
        );
    }
}
