//! Argument bag resolution
//!
//! A trigger may embed a serialized bag. When that is missing, malformed or
//! empty, the bag is collected from argument-source elements in the island.

use crate::config::IslandConfig;
use crate::element::{Element, ElementTree};
use quill_core::{ArgValue, Args, QuillError};
use tracing::warn;

/// Where an argument source's value is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueExtraction {
    /// The element's input value
    InputValue,
    /// The configured data attribute
    DataValue,
    /// The element's text content
    TextContent,
}

/// Strategies tried in turn; the first that yields a value wins
pub const EXTRACTION_ORDER: [ValueExtraction; 3] = [
    ValueExtraction::InputValue,
    ValueExtraction::DataValue,
    ValueExtraction::TextContent,
];

impl ValueExtraction {
    pub fn extract<'a>(self, element: &'a Element, config: &IslandConfig) -> Option<&'a str> {
        match self {
            ValueExtraction::InputValue => element.input_value(),
            ValueExtraction::DataValue => element.get_attr(&config.value_attr),
            ValueExtraction::TextContent => Some(element.text_content()),
        }
    }
}

/// Parse the bag embedded on a trigger. Malformed input is logged and
/// treated as absent.
pub fn parse_trigger_args(raw: &str) -> Option<Args> {
    match Args::from_json_str(raw) {
        Ok(args) => Some(args),
        Err(e) => {
            let err = QuillError::from(e);
            warn!(raw, code = %err.code, error = %err, "ignoring invalid trigger arguments");
            None
        }
    }
}

/// Collect one key per argument-source element. Later sources with the
/// same key win.
pub fn collect_args(tree: &ElementTree, config: &IslandConfig) -> Args {
    let mut out = Args::new();
    for element in tree.descendants_with(&config.arg_source_attr) {
        let key = match element.get_attr(&config.arg_source_attr) {
            Some(k) if !k.is_empty() => k,
            _ => continue,
        };
        let value = EXTRACTION_ORDER.iter()
            .find_map(|strategy| strategy.extract(element, config))
            .unwrap_or_default();
        out.insert(key, ArgValue::from(value));
    }
    out
}

/// Resolve the bag for `trigger`: embedded bag if non-empty, else scanned
pub fn resolve_args(trigger: &Element, tree: &ElementTree, config: &IslandConfig) -> Args {
    let embedded = trigger
        .get_attr(&config.args_attr)
        .filter(|raw| !raw.is_empty())
        .and_then(parse_trigger_args);

    match embedded {
        Some(args) if !args.is_empty() => args,
        _ => collect_args(tree, config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementId;

    fn config() -> IslandConfig {
        IslandConfig::default()
    }

    #[test]
    fn test_extraction_priority() {
        let cfg = config();
        let all = Element::new().value("input").attr("data-value", "data").text("text");
        let no_input = Element::new().attr("data-value", "data").text("text");
        let text_only = Element::new().text("text");

        let first = |e: &Element| EXTRACTION_ORDER.iter().find_map(|s| s.extract(e, &cfg)).map(str::to_string);
        assert_eq!(first(&all).as_deref(), Some("input"));
        assert_eq!(first(&no_input).as_deref(), Some("data"));
        assert_eq!(first(&text_only).as_deref(), Some("text"));
    }

    #[test]
    fn test_empty_input_value_still_wins() {
        let cfg = config();
        let e = Element::new().value("").attr("data-value", "data");
        assert_eq!(ValueExtraction::InputValue.extract(&e, &cfg), Some(""));
        let mut tree = ElementTree::new(Element::new());
        tree.append(ElementId::ROOT, e.attr("data-arg", "shift"));
        assert_eq!(collect_args(&tree, &cfg).get("shift"), Some(&ArgValue::from("")));
    }

    #[test]
    fn test_collect_args_skips_blank_keys_and_last_wins() {
        let cfg = config();
        let mut tree = ElementTree::new(Element::new());
        tree.append(ElementId::ROOT, Element::new().attr("data-arg", "shift").value("1"));
        tree.append(ElementId::ROOT, Element::new().attr("data-arg", "").value("ignored"));
        tree.append(ElementId::ROOT, Element::new().attr("data-arg", "shift").value("2"));
        let args = collect_args(&tree, &cfg);
        assert_eq!(args.len(), 1);
        assert_eq!(args.get("shift"), Some(&ArgValue::from("2")));
    }

    #[test]
    fn test_embedded_args_preferred() {
        let cfg = config();
        let mut tree = ElementTree::new(Element::new());
        tree.append(ElementId::ROOT, Element::new().attr("data-arg", "shift").value("9"));
        let trigger = Element::new().attr("data-args", r#"{"shift": 3}"#);
        let args = resolve_args(&trigger, &tree, &cfg);
        assert_eq!(args.get("shift"), Some(&ArgValue::Number(3.0)));
    }

    #[test]
    fn test_malformed_or_empty_embedded_args_fall_back_to_scan() {
        let cfg = config();
        let mut tree = ElementTree::new(Element::new());
        tree.append(ElementId::ROOT, Element::new().attr("data-arg", "shift").value("9"));

        for raw in ["{not json", "{}", "[1, 2]", ""] {
            let trigger = Element::new().attr("data-args", raw);
            let args = resolve_args(&trigger, &tree, &cfg);
            assert_eq!(args.get("shift"), Some(&ArgValue::from("9")), "raw = {:?}", raw);
        }
    }

    #[test]
    fn test_nothing_anywhere_gives_empty_bag() {
        let cfg = config();
        let tree = ElementTree::new(Element::new());
        let trigger = Element::new();
        assert!(resolve_args(&trigger, &tree, &cfg).is_empty());
    }
}
