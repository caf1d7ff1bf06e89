use std::marker::PhantomData;

use thiserror::Error;

use crate::constant::TOKEN_SEPARATOR;
use crate::convert::ConverterRegistry;
use crate::machine::{ParseError, Tokenizer};
use crate::model::Value;
use crate::table::{Binding, ConfigError, RuleTable};

/// Failure to assign a parsed value onto a result record field.
///
/// Returned by [`Bindable::assign`] when the field or the value shape does
/// not match the record; signals a mismatch between the bindings and the
/// record rather than bad user input.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Cannot assign to the field '{field}': {message}.")]
pub struct AssignError {
    /// The field that rejected the value.
    pub field: String,
    /// Why the assignment was rejected.
    pub message: String,
}

/// A result record the engine can populate field by field.
///
/// Implemented by the caller, or generated by an external descriptor
/// collaborator; `assign` receives one call per filled binding rule, after
/// the full token stream has been consumed.
pub trait Bindable: Default {
    /// Write `value` into `field`.
    fn assign(&mut self, field: &str, value: Value) -> Result<(), AssignError>;
}

/// A single-use argument parser over a fixed set of bindings.
///
/// Each instance owns its rule table and parse cursor outright; nothing is
/// shared or retained between parse operations. `parse` consumes the parser,
/// so state cannot leak between unrelated argument lists.
pub struct ArgumentParser<T: Bindable> {
    tokenizer: Tokenizer,
    _result: PhantomData<T>,
}

impl<T: Bindable> std::fmt::Debug for ArgumentParser<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArgumentParser{..}").finish()
    }
}

impl<T: Bindable> ArgumentParser<T> {
    /// Build a parser over `bindings` with the default string/integer/boolean
    /// converters.
    pub fn new(bindings: Vec<Binding>) -> Result<Self, ConfigError> {
        Self::with_converters(bindings, ConverterRegistry::default())
    }

    /// Build a parser over `bindings` with a caller-supplied converter
    /// registry.
    pub fn with_converters(
        bindings: Vec<Binding>,
        converters: ConverterRegistry,
    ) -> Result<Self, ConfigError> {
        let table = RuleTable::new(bindings)?;

        Ok(Self {
            tokenizer: Tokenizer::new(table, converters),
            _result: PhantomData,
        })
    }

    /// Run the engine to exhaustion over `tokens`, then build the result
    /// record from the filled rules.
    pub fn parse(mut self, tokens: &[&str]) -> Result<T, ParseError> {
        for token in tokens {
            self.tokenizer.feed(token)?;
        }

        build(self.tokenizer.into_table())
    }

    /// Parse a single command line, split on the space character.
    pub fn parse_str(self, input: &str) -> Result<T, ParseError> {
        let tokens: Vec<&str> = input.split(TOKEN_SEPARATOR).collect();
        self.parse(tokens.as_slice())
    }
}

fn build<T: Bindable>(table: RuleTable) -> Result<T, ParseError> {
    if let Some(name) = table.unmet_required() {
        return Err(ParseError::MissingRequiredOption(name));
    }

    let mut record = T::default();

    for (field, value) in table.into_filled() {
        record.assign(&field, value)?;
    }

    Ok(record)
}
