use thiserror::Error;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

use crate::constant::{EQUALS_MARKER, LONG_MARKER, SHORT_MARKER};
use crate::convert::{ConverterRegistry, UnconvertibleValue};
use crate::model::Value;
use crate::parser::AssignError;
use crate::table::RuleTable;

/// Failure while resolving the token stream against the rule table.
///
/// Every variant aborts the parse operation immediately; a caller receives
/// either a fully populated record or one of these.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The progress guard tripped: a state handler failed to shorten its
    /// input. Signals an engine inconsistency rather than bad user input.
    #[error("Token '{0}' was not shortened.")]
    MalformedArgument(String),

    /// A token resembling an option marker arrived while a positional slot
    /// was still open.
    #[error("Argument '{0}' is not valid for an index based option.")]
    InvalidPositionalValue(String),

    /// No registered name matches the token at any prefix length.
    #[error("Argument '{0}' is not mapped to any option.")]
    UnknownOption(String),

    /// A bare value token arrived with no armed rule to receive it.
    #[error("There is no pending option for value '{0}'.")]
    NoPendingOption(String),

    /// The textual value was rejected by the option's converter.
    #[error("The value is not assignable to option '{option}': {source}")]
    InvalidValueFormat {
        /// The option whose value was rejected.
        option: String,
        /// The underlying conversion failure.
        source: UnconvertibleValue,
    },

    /// End of input was reached with a required option still unset.
    #[error("The required option '{0}' was not supplied.")]
    MissingRequiredOption(String),

    /// The result record rejected a parsed value.
    #[error(transparent)]
    Assign(#[from] AssignError),
}

/// States of the per-token state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    Indexed,
    GenericOption,
    ShortOption,
    LongOption,
    BooleanChain,
    Value,
    Terminal,
}

/// Transient context of one parse operation.
///
/// The armed rule persists across tokens: it may be set while processing
/// token N and consumed while processing token N+1.
#[derive(Debug)]
struct ParseCursor {
    armed: Option<usize>,
    state: ParseState,
}

impl ParseCursor {
    fn new() -> Self {
        Self {
            armed: None,
            state: ParseState::Terminal,
        }
    }
}

/// Consumes the raw token sequence, classifying each remaining fragment into
/// a state and dispatching to the state handler, which mutates the rule
/// table and returns the unconsumed remainder.
#[derive(Debug)]
pub(crate) struct Tokenizer {
    table: RuleTable,
    converters: ConverterRegistry,
    cursor: ParseCursor,
}

impl Tokenizer {
    pub(crate) fn new(table: RuleTable, converters: ConverterRegistry) -> Self {
        Self {
            table,
            converters,
            cursor: ParseCursor::new(),
        }
    }

    pub(crate) fn feed(&mut self, token: &str) -> Result<(), ParseError> {
        let mut remaining = token;

        while !remaining.is_empty() {
            let before = remaining.len();
            let state = self.select(remaining);
            self.cursor.state = state;

            #[cfg(feature = "tracing_debug")]
            {
                debug!("Dispatching '{remaining}' to {state:?}.");
            }

            remaining = self.dispatch(state, remaining)?;

            // Every handler must consume at least one character, otherwise
            // this loop would never terminate.
            if remaining.len() >= before {
                return Err(ParseError::MalformedArgument(token.to_string()));
            }
        }

        self.cursor.state = ParseState::Terminal;
        Ok(())
    }

    pub(crate) fn into_table(self) -> RuleTable {
        self.table
    }

    // Transition selection, in priority order, against the current remainder.
    fn select(&self, remaining: &str) -> ParseState {
        if self.table.next_positional().is_some() {
            ParseState::Indexed
        } else if self.table.prefix_candidate(remaining, true).is_some() {
            ParseState::BooleanChain
        } else if remaining.starts_with(LONG_MARKER) {
            ParseState::LongOption
        } else if remaining.starts_with(SHORT_MARKER) {
            ParseState::ShortOption
        } else if remaining.find(EQUALS_MARKER).map_or(false, |at| at > 0)
            || self.table.prefix_candidate(remaining, false).is_some()
        {
            ParseState::GenericOption
        } else {
            ParseState::Value
        }
    }

    fn dispatch<'t>(
        &mut self,
        state: ParseState,
        remaining: &'t str,
    ) -> Result<&'t str, ParseError> {
        match state {
            ParseState::Indexed => self.indexed(remaining),
            ParseState::GenericOption => self.named_option(remaining),
            ParseState::ShortOption => self.named_option(&remaining[SHORT_MARKER.len()..]),
            ParseState::LongOption => self.named_option(&remaining[LONG_MARKER.len()..]),
            ParseState::BooleanChain => self.boolean_chain(remaining),
            ParseState::Value => self.value(remaining),
            ParseState::Terminal => {
                unreachable!("internal error - the terminal state cannot be dispatched")
            }
        }
    }

    // Positional binding takes the whole remainder; marker-prefixed tokens
    // are rejected outright.
    fn indexed<'t>(&mut self, remaining: &'t str) -> Result<&'t str, ParseError> {
        let slot = self
            .table
            .next_positional()
            .expect("internal error - the indexed state requires an open positional rule");

        if remaining.starts_with(SHORT_MARKER) {
            return Err(ParseError::InvalidPositionalValue(remaining.to_string()));
        }

        let value = self.convert(slot, remaining)?;
        self.table.bind(slot, value);
        self.cursor.armed = None;
        Ok("")
    }

    // Shared resolution for the short/long/generic states: longest-key match
    // against the registered names, then either bind (boolean) or arm.
    fn named_option<'t>(&mut self, remaining: &'t str) -> Result<&'t str, ParseError> {
        let (key_length, slot) = self
            .table
            .longest_key_match(remaining)
            .ok_or_else(|| ParseError::UnknownOption(remaining.to_string()))?;
        let rest = &remaining[key_length..];

        if self.table.get(slot).is_boolean() {
            self.table.bind(slot, Value::Boolean(true));
            self.cursor.armed = None;
        } else {
            self.cursor.armed = Some(slot);
        }

        Ok(rest)
    }

    fn boolean_chain<'t>(&mut self, remaining: &'t str) -> Result<&'t str, ParseError> {
        let slot = self
            .table
            .prefix_candidate(remaining, true)
            .expect("internal error - the boolean chain state requires a boolean candidate");
        self.table.bind(slot, Value::Boolean(true));
        self.cursor.armed = None;

        let descriptor = self.table.get(slot).descriptor();

        if let Some(long) = descriptor.long_name() {
            if let Some(rest) = remaining
                .strip_prefix(LONG_MARKER)
                .and_then(|text| text.strip_prefix(long))
            {
                return Ok(rest);
            }
        }

        if let Some(short) = descriptor.short_name() {
            if let Some(rest) = remaining
                .strip_prefix(SHORT_MARKER)
                .and_then(|text| text.strip_prefix(short))
            {
                return Ok(rest);
            }
        }

        // A bare-name candidacy leaves no marker form to strip; the progress
        // guard reports the token.
        Ok(remaining)
    }

    // The value is always the rest of the current token, never split further.
    fn value<'t>(&mut self, remaining: &'t str) -> Result<&'t str, ParseError> {
        let slot = self
            .cursor
            .armed
            .take()
            .ok_or_else(|| ParseError::NoPendingOption(remaining.to_string()))?;

        let text = remaining.trim_matches(EQUALS_MARKER).trim();
        let value = self.convert(slot, text)?;
        self.table.bind(slot, value);
        Ok("")
    }

    fn convert(&self, slot: usize, text: &str) -> Result<Value, ParseError> {
        let rule = self.table.get(slot);
        self.converters
            .convert(rule.kind(), text)
            .map_err(|source| ParseError::InvalidValueFormat {
                option: rule.display_name().to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::OptionDescriptor;
    use crate::model::ValueKind;
    use crate::table::Binding;
    use rand::{thread_rng, Rng};
    use rstest::rstest;

    fn named_table() -> RuleTable {
        RuleTable::new(vec![
            Binding::new(OptionDescriptor::short("i"), "input", ValueKind::String),
            Binding::new(
                OptionDescriptor::short("o").with_long("output"),
                "output",
                ValueKind::String,
            ),
            Binding::new(
                OptionDescriptor::short("l").with_long("length"),
                "length",
                ValueKind::Integer,
            ),
            Binding::new(
                OptionDescriptor::short("v").with_long("verbose"),
                "verbose",
                ValueKind::Boolean,
            ),
        ])
        .unwrap()
    }

    fn indexed_table() -> RuleTable {
        RuleTable::new(vec![
            Binding::new(OptionDescriptor::positional(0), "input", ValueKind::String),
            Binding::new(OptionDescriptor::positional(1), "output", ValueKind::String),
            Binding::new(
                OptionDescriptor::short("l").with_long("length"),
                "length",
                ValueKind::Integer,
            ),
            Binding::new(
                OptionDescriptor::short("v").with_long("verbose"),
                "verbose",
                ValueKind::Boolean,
            ),
        ])
        .unwrap()
    }

    fn run(table: RuleTable, tokens: &[&str]) -> Result<Vec<(String, Value)>, ParseError> {
        let mut tokenizer = Tokenizer::new(table, ConverterRegistry::default());

        for token in tokens {
            tokenizer.feed(token)?;
        }

        Ok(tokenizer.into_table().into_filled().collect())
    }

    #[rstest]
    #[case(vec!["-iInput.bin"])]
    #[case(vec!["-i", "Input.bin"])]
    #[case(vec!["-i=Input.bin"])]
    fn fused_and_split_values(#[case] tokens: Vec<&str>) {
        let filled = run(named_table(), tokens.as_slice()).unwrap();
        assert_eq!(
            filled,
            vec![("input".to_string(), Value::String("Input.bin".to_string()))]
        );
    }

    #[rstest]
    #[case(vec!["--length=150"])]
    #[case(vec!["--length", "150"])]
    #[case(vec!["-l=150"])]
    #[case(vec!["-l", "150"])]
    fn integer_option(#[case] tokens: Vec<&str>) {
        let filled = run(named_table(), tokens.as_slice()).unwrap();
        assert_eq!(filled, vec![("length".to_string(), Value::Integer(150))]);
    }

    #[rstest]
    #[case(vec!["-vl=150"])]
    #[case(vec!["-vlength=150"])]
    #[case(vec!["--verboselength=150"])]
    fn boolean_chain_continues_on_remainder(#[case] tokens: Vec<&str>) {
        // The '=150' trailing text binds to the next matched option, never to
        // the boolean flag itself.
        let filled = run(named_table(), tokens.as_slice()).unwrap();
        assert_eq!(
            filled,
            vec![
                ("length".to_string(), Value::Integer(150)),
                ("verbose".to_string(), Value::Boolean(true)),
            ]
        );
    }

    #[test]
    fn armed_rule_persists_across_tokens() {
        let filled = run(named_table(), &["-o", "Out.bin", "-i", "Input.bin"]).unwrap();
        assert_eq!(
            filled,
            vec![
                ("input".to_string(), Value::String("Input.bin".to_string())),
                ("output".to_string(), Value::String("Out.bin".to_string())),
            ]
        );
    }

    #[test]
    fn indexed_fill_ascending() {
        let filled = run(indexed_table(), &["Input.bin", "Out.bin", "-vl=150"]).unwrap();
        assert_eq!(
            filled,
            vec![
                ("input".to_string(), Value::String("Input.bin".to_string())),
                ("output".to_string(), Value::String("Out.bin".to_string())),
                ("length".to_string(), Value::Integer(150)),
                ("verbose".to_string(), Value::Boolean(true)),
            ]
        );
    }

    #[rstest]
    #[case(vec!["-vl=150"], "-vl=150")]
    #[case(vec!["Input.bin", "--length=150"], "--length=150")]
    fn indexed_rejects_markers(#[case] tokens: Vec<&str>, #[case] offender: &str) {
        assert_eq!(
            run(indexed_table(), tokens.as_slice()).unwrap_err(),
            ParseError::InvalidPositionalValue(offender.to_string())
        );
    }

    #[test]
    fn unknown_option() {
        assert_eq!(
            run(named_table(), &["-x5"]).unwrap_err(),
            ParseError::UnknownOption("x5".to_string())
        );
    }

    #[test]
    fn no_pending_option() {
        assert_eq!(
            run(named_table(), &["Input.bin"]).unwrap_err(),
            ParseError::NoPendingOption("Input.bin".to_string())
        );
    }

    #[test]
    fn boolean_disarms_pending_rule() {
        // '-v' clears the armed rule left by '-i', so the trailing value has
        // no rule to land on.
        assert_eq!(
            run(named_table(), &["-i", "-v", "Input.bin"]).unwrap_err(),
            ParseError::NoPendingOption("Input.bin".to_string())
        );
    }

    #[test]
    fn invalid_value_format() {
        assert_matches!(
            run(named_table(), &["--length=abc"]).unwrap_err(),
            ParseError::InvalidValueFormat { option, .. } if option == "l"
        );
    }

    #[test]
    fn repeated_option_is_unknown() {
        assert_eq!(
            run(named_table(), &["-i=A", "-i=B"]).unwrap_err(),
            ParseError::UnknownOption("i=B".to_string())
        );
    }

    #[test]
    fn repeated_boolean_is_unknown() {
        assert_eq!(
            run(named_table(), &["-v", "-v"]).unwrap_err(),
            ParseError::UnknownOption("v".to_string())
        );
    }

    #[test]
    fn bare_boolean_name_trips_progress_guard() {
        // A bare-name candidacy matches but leaves no marker form to strip.
        assert_eq!(
            run(named_table(), &["verbose"]).unwrap_err(),
            ParseError::MalformedArgument("verbose".to_string())
        );
    }

    #[test]
    fn empty_token_is_ignored() {
        let filled = run(named_table(), &["", "-v", ""]).unwrap();
        assert_eq!(filled, vec![("verbose".to_string(), Value::Boolean(true))]);
    }

    #[test]
    fn progress_guard_always_terminates() {
        let charset: Vec<char> = "-=vilo length.bin150xyz".chars().collect();

        for _ in 0..500 {
            let length = thread_rng().gen_range(0..12);
            let token: String = (0..length)
                .map(|_| charset[thread_rng().gen_range(0..charset.len())])
                .collect();

            let mut tokenizer = Tokenizer::new(named_table(), ConverterRegistry::default());
            // Any outcome is acceptable; the feed must simply return.
            let _ = tokenizer.feed(&token);
        }
    }
}
