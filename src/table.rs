use std::collections::HashMap;

use thiserror::Error;

use crate::constant::{LONG_MARKER, SHORT_MARKER};
use crate::descriptor::OptionDescriptor;
use crate::model::{Value, ValueKind};

/// Failure to assemble a rule table from the caller's bindings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Two bindings share a short or long name.
    #[error("Cannot duplicate the option '{0}'.")]
    DuplicateOption(String),

    /// Two bindings share a positional index.
    #[error("Cannot duplicate the positional index {0}.")]
    DuplicateIndex(usize),
}

/// One caller-declared binding: an option descriptor paired with the target
/// field it populates.
///
/// How bindings are derived (attributes, builder calls, config files) is
/// outside this crate; the engine consumes an already-built list.
#[derive(Debug, Clone)]
pub struct Binding {
    descriptor: OptionDescriptor,
    field: String,
    kind: ValueKind,
}

impl Binding {
    /// Pair `descriptor` with the target `field` of the given `kind`.
    pub fn new(descriptor: OptionDescriptor, field: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            descriptor,
            field: field.into(),
            kind,
        }
    }
}

/// The per-operation pairing of a descriptor with its value slot.
/// The slot transitions unset to set at most once per parse operation.
#[derive(Debug)]
pub(crate) struct BindingRule {
    descriptor: OptionDescriptor,
    field: String,
    kind: ValueKind,
    value: Option<Value>,
}

impl BindingRule {
    fn new(binding: Binding) -> Self {
        let Binding {
            descriptor,
            field,
            kind,
        } = binding;
        Self {
            descriptor,
            field,
            kind,
            value: None,
        }
    }

    pub(crate) fn descriptor(&self) -> &OptionDescriptor {
        &self.descriptor
    }

    pub(crate) fn kind(&self) -> ValueKind {
        self.kind
    }

    pub(crate) fn is_boolean(&self) -> bool {
        self.kind == ValueKind::Boolean
    }

    pub(crate) fn is_filled(&self) -> bool {
        self.value.is_some()
    }

    /// The name to report this rule by: short name, else long name, else the
    /// target field.
    pub(crate) fn display_name(&self) -> &str {
        self.descriptor
            .short_name()
            .or_else(|| self.descriptor.long_name())
            .unwrap_or(&self.field)
    }

    // Candidate ordering key: the long name's length when configured, else
    // the short name's.
    fn name_length(&self) -> usize {
        match self.descriptor.long_name() {
            Some(long) => long.len(),
            None => self.descriptor.short_name().map_or(0, str::len),
        }
    }

    // Whether `text` leads with this rule's `-short`/`--long`/bare name form.
    fn is_prefix_candidate(&self, text: &str) -> bool {
        for name in [self.descriptor.long_name(), self.descriptor.short_name()]
            .into_iter()
            .flatten()
        {
            if text.starts_with(name)
                || text.starts_with(&format!("{SHORT_MARKER}{name}"))
                || text.starts_with(&format!("{LONG_MARKER}{name}"))
            {
                return true;
            }
        }

        false
    }
}

/// The working set of one parse operation: every binding rule, queryable by
/// name, prefix, and positional status.
#[derive(Debug)]
pub(crate) struct RuleTable {
    rules: Vec<BindingRule>,
    keys: HashMap<String, usize>,
}

impl RuleTable {
    pub(crate) fn new(bindings: Vec<Binding>) -> Result<Self, ConfigError> {
        let mut table = Self {
            rules: Vec::default(),
            keys: HashMap::default(),
        };

        for binding in bindings.into_iter() {
            table.register(binding)?;
        }

        Ok(table)
    }

    fn register(&mut self, binding: Binding) -> Result<(), ConfigError> {
        let slot = self.rules.len();
        let rule = BindingRule::new(binding);

        if let Some(index) = rule.descriptor().index() {
            if self
                .rules
                .iter()
                .any(|existing| existing.descriptor().index() == Some(index))
            {
                return Err(ConfigError::DuplicateIndex(index));
            }
        }

        for name in [
            rule.descriptor().short_name(),
            rule.descriptor().long_name(),
        ]
        .into_iter()
        .flatten()
        {
            if self.keys.insert(name.to_string(), slot).is_some() {
                return Err(ConfigError::DuplicateOption(name.to_string()));
            }
        }

        self.rules.push(rule);
        Ok(())
    }

    pub(crate) fn get(&self, slot: usize) -> &BindingRule {
        &self.rules[slot]
    }

    /// The lowest-index unfilled positional rule.
    pub(crate) fn next_positional(&self) -> Option<usize> {
        self.rules
            .iter()
            .enumerate()
            .filter(|(_, rule)| !rule.is_filled())
            .filter_map(|(slot, rule)| rule.descriptor().index().map(|index| (index, slot)))
            .min_by_key(|(index, _)| *index)
            .map(|(_, slot)| slot)
    }

    /// The unfilled rule of the given boolean-ness whose `-short`/`--long`/bare
    /// name form is a leading substring of `text`.
    ///
    /// Among multiple candidates the rule with the shortest configured name
    /// wins, so a short option name that prefixes a longer option's name
    /// always takes the match.
    pub(crate) fn prefix_candidate(&self, text: &str, boolean: bool) -> Option<usize> {
        let mut slots: Vec<usize> = (0..self.rules.len())
            .filter(|&slot| {
                let rule = &self.rules[slot];
                !rule.is_filled() && rule.is_boolean() == boolean
            })
            .collect();
        slots.sort_by_key(|&slot| self.rules[slot].name_length());
        slots
            .into_iter()
            .find(|&slot| self.rules[slot].is_prefix_candidate(text))
    }

    /// The registered name with the greatest length that is a prefix of
    /// `text`, as `(name length, slot)`. Filled rules do not participate, so
    /// re-specifying an option reports as unmatched.
    pub(crate) fn longest_key_match(&self, text: &str) -> Option<(usize, usize)> {
        self.keys
            .iter()
            .filter(|(key, slot)| text.starts_with(key.as_str()) && !self.rules[**slot].is_filled())
            .max_by_key(|(key, _)| key.len())
            .map(|(key, slot)| (key.len(), *slot))
    }

    pub(crate) fn bind(&mut self, slot: usize, value: Value) {
        if self.rules[slot].value.replace(value).is_some() {
            unreachable!(
                "internal error - the rule '{}' must not be bound twice",
                self.rules[slot].display_name()
            );
        }
    }

    /// The display name of the first required rule left unfilled, if any.
    pub(crate) fn unmet_required(&self) -> Option<String> {
        self.rules
            .iter()
            .find(|rule| rule.descriptor().is_required() && !rule.is_filled())
            .map(|rule| rule.display_name().to_string())
    }

    /// Consume the table, yielding `(field, value)` for every filled rule.
    pub(crate) fn into_filled(self) -> impl Iterator<Item = (String, Value)> {
        self.rules.into_iter().filter_map(|rule| {
            let BindingRule { field, value, .. } = rule;
            value.map(|value| (field, value))
        })
    }
}
