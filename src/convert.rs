use std::collections::HashMap;

use thiserror::Error;

use crate::model::{Value, ValueKind};

/// Failure to coerce a textual fragment into a primitive kind.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("cannot convert '{token}' to {kind}.")]
pub struct UnconvertibleValue {
    /// The rejected textual fragment.
    pub token: String,
    /// The kind the fragment was expected to convert into.
    pub kind: ValueKind,
}

/// Behaviour to coerce a trimmed textual fragment into a typed [`Value`].
///
/// An implementation must produce a `Value` of the kind it is registered
/// under in the [`ConverterRegistry`].
pub trait Convert {
    /// Convert `token`, or reject it.
    fn convert(&self, token: &str) -> Result<Value, UnconvertibleValue>;
}

struct StringConverter;

impl Convert for StringConverter {
    fn convert(&self, token: &str) -> Result<Value, UnconvertibleValue> {
        Ok(Value::String(token.to_string()))
    }
}

struct IntegerConverter;

impl Convert for IntegerConverter {
    fn convert(&self, token: &str) -> Result<Value, UnconvertibleValue> {
        token
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|_| UnconvertibleValue {
                token: token.to_string(),
                kind: ValueKind::Integer,
            })
    }
}

struct BooleanConverter;

impl Convert for BooleanConverter {
    fn convert(&self, token: &str) -> Result<Value, UnconvertibleValue> {
        token
            .parse::<bool>()
            .map(Value::Boolean)
            .map_err(|_| UnconvertibleValue {
                token: token.to_string(),
                kind: ValueKind::Boolean,
            })
    }
}

/// The set of typed conversion functions used by one parse operation.
///
/// `Default` installs the closed string/integer/boolean set; [`register`]
/// is the explicit extension contract, replacing the converter for a kind.
///
/// [`register`]: ConverterRegistry::register
pub struct ConverterRegistry {
    converters: HashMap<ValueKind, Box<dyn Convert>>,
}

impl std::fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConverterRegistry{..}").finish()
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        let mut registry = Self {
            converters: HashMap::default(),
        };
        registry.register(ValueKind::String, StringConverter);
        registry.register(ValueKind::Integer, IntegerConverter);
        registry.register(ValueKind::Boolean, BooleanConverter);
        registry
    }
}

impl ConverterRegistry {
    /// Install (or replace) the converter for `kind`.
    pub fn register(&mut self, kind: ValueKind, converter: impl Convert + 'static) {
        self.converters.insert(kind, Box::new(converter));
    }

    pub(crate) fn convert(&self, kind: ValueKind, token: &str) -> Result<Value, UnconvertibleValue> {
        match self.converters.get(&kind) {
            Some(converter) => converter.convert(token),
            None => unreachable!("internal error - no converter registered for {kind}"),
        }
    }
}
