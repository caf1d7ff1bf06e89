//! `argbind` is a declarative command line tokenizing and binding engine.
//!
//! Given a set of [`OptionDescriptor`]s bound to the fields of a result
//! record, the engine resolves a raw token sequence into typed values and
//! produces a fully populated record. It is deliberately small: it does not
//! extract descriptors from your types (supply them yourself, or generate
//! them), it does not render help text, and it converts only the primitive
//! string/integer/boolean kinds.
//!
//! The tokenizer is a per-token state machine that disambiguates:
//! * fused short flag and value: `-iInput.bin`
//! * `=`-delimited values: `--length=150`, `-l=150`
//! * space-delimited values: `-i Input.bin` (the option stays armed across
//!   the token boundary)
//! * boolean flag chains with a trailing value: `-vl=150`
//! * positional (indexed) values competing with named options
//!
//! A progress guard ensures the engine never loops on malformed input: every
//! state handler must strictly shorten the text it was handed.
//!
//! # Usage
//! ```
//! use argbind::{
//!     ArgumentParser, AssignError, Bindable, Binding, OptionDescriptor, Value, ValueKind,
//! };
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Transfer {
//!     input: String,
//!     length: i64,
//!     verbose: bool,
//! }
//!
//! impl Bindable for Transfer {
//!     fn assign(&mut self, field: &str, value: Value) -> Result<(), AssignError> {
//!         match (field, value) {
//!             ("input", Value::String(input)) => self.input = input,
//!             ("length", Value::Integer(length)) => self.length = length,
//!             ("verbose", Value::Boolean(verbose)) => self.verbose = verbose,
//!             (field, value) => {
//!                 return Err(AssignError {
//!                     field: field.to_string(),
//!                     message: format!("unexpected value {value:?}"),
//!                 });
//!             }
//!         };
//!         Ok(())
//!     }
//! }
//!
//! let bindings = vec![
//!     Binding::new(OptionDescriptor::short("i").required(), "input", ValueKind::String),
//!     Binding::new(OptionDescriptor::short("l").with_long("length"), "length", ValueKind::Integer),
//!     Binding::new(OptionDescriptor::short("v").with_long("verbose"), "verbose", ValueKind::Boolean),
//! ];
//! let parser = ArgumentParser::<Transfer>::new(bindings).unwrap();
//! let transfer = parser.parse_str("-iInput.bin -vlength=150").unwrap();
//!
//! assert_eq!(
//!     transfer,
//!     Transfer {
//!         input: "Input.bin".to_string(),
//!         length: 150,
//!         verbose: true,
//!     }
//! );
//! ```
//!
//! # Semantics
//! * A single `-` marks a short option, a double `--` marks a long option,
//!   and `=` optionally separates an option name from its inline value; a
//!   positional value carries no marker at all.
//! * While any positional slot remains open, positional binding takes
//!   priority over named-option matching, and positional slots fill in
//!   ascending index order.
//! * Named-option resolution takes the longest registered name that prefixes
//!   the remaining text. The boolean candidate search instead prefers the
//!   rule with the shortest configured name; a short boolean name that
//!   prefixes a longer option's name always wins that match. Both tie-breaks
//!   are intentional and covered by tests.
//! * Boolean flags accept no value text; flag presence binds `true`, and any
//!   trailing text after the flag continues through the state machine.
//! * Every parse operation owns its state. `ArgumentParser::parse` consumes
//!   the parser, so no rule table or cursor is ever reused.
//!
//! # Features
//! * `tracing_debug`: emit `tracing` debug events from the state machine.
#![deny(missing_docs)]
mod constant;
mod convert;
mod descriptor;
mod machine;
mod model;
mod parser;
mod render;
mod table;

pub use convert::{Convert, ConverterRegistry, UnconvertibleValue};
pub use descriptor::OptionDescriptor;
pub use machine::ParseError;
pub use model::{Value, ValueKind};
pub use parser::{ArgumentParser, AssignError, Bindable};
pub use render::render;
pub use table::{Binding, ConfigError};

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
