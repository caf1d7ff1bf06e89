use crate::constant::{EQUALS_MARKER, LONG_MARKER};
use crate::model::Value;

/// Render `(long name, value)` pairs into canonical `--name=value` tokens.
///
/// Boolean values render as a bare `--name` flag when true and are omitted
/// when false. For an option set without positional slots, parsing the
/// rendered tokens reproduces the input pairs.
pub fn render<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a Value)>) -> Vec<String> {
    pairs
        .into_iter()
        .filter_map(|(name, value)| match value {
            Value::Boolean(true) => Some(format!("{LONG_MARKER}{name}")),
            Value::Boolean(false) => None,
            other => Some(format!("{LONG_MARKER}{name}{EQUALS_MARKER}{other}")),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_scalars() {
        let length = Value::Integer(150);
        let input = Value::String("Input.bin".to_string());
        let tokens = render(vec![("length", &length), ("input", &input)]);
        assert_eq!(tokens, vec!["--length=150", "--input=Input.bin"]);
    }

    #[test]
    fn render_booleans() {
        let on = Value::Boolean(true);
        let off = Value::Boolean(false);
        let tokens = render(vec![("verbose", &on), ("quiet", &off)]);
        assert_eq!(tokens, vec!["--verbose"]);
    }

    #[test]
    fn render_empty() {
        let tokens = render(Vec::default());
        assert!(tokens.is_empty());
    }
}
