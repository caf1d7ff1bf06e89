/// Immutable declaration of one configurable option.
///
/// Every descriptor carries at least one of a short name, a long name, or a
/// positional index; the constructors establish this and the chaining methods
/// only add attributes.
///
/// ```
/// use argbind::OptionDescriptor;
///
/// let length = OptionDescriptor::short("l").with_long("length");
/// let input = OptionDescriptor::positional(0).required();
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionDescriptor {
    short: Option<String>,
    long: Option<String>,
    index: Option<usize>,
    required: bool,
    help: Option<String>,
}

impl OptionDescriptor {
    fn empty() -> Self {
        Self {
            short: None,
            long: None,
            index: None,
            required: false,
            help: None,
        }
    }

    /// Declare an option addressed by a short name (`-NAME` on the Cli).
    pub fn short(name: impl Into<String>) -> Self {
        Self {
            short: Some(name.into()),
            ..Self::empty()
        }
    }

    /// Declare an option addressed by a long name (`--NAME` on the Cli).
    pub fn long(name: impl Into<String>) -> Self {
        Self {
            long: Some(name.into()),
            ..Self::empty()
        }
    }

    /// Declare a positional option, matched by argument order rather than by name.
    pub fn positional(index: usize) -> Self {
        Self {
            index: Some(index),
            ..Self::empty()
        }
    }

    /// Additionally address this option by a long name.
    pub fn with_long(mut self, name: impl Into<String>) -> Self {
        self.long = Some(name.into());
        self
    }

    /// Additionally address this option by a short name.
    pub fn with_short(mut self, name: impl Into<String>) -> Self {
        self.short = Some(name.into());
        self
    }

    /// Additionally match this option by argument order.
    pub fn at(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// Mark this option as required; parsing fails if it goes unfilled.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Attach a help text to this option.
    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.help = Some(text.into());
        self
    }

    /// The short name, if configured.
    pub fn short_name(&self) -> Option<&str> {
        self.short.as_deref()
    }

    /// The long name, if configured.
    pub fn long_name(&self) -> Option<&str> {
        self.long.as_deref()
    }

    /// The positional index, if configured.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Whether this option must be filled by the end of the token stream.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// The help text, if configured.
    pub fn help_text(&self) -> Option<&str> {
        self.help.as_deref()
    }
}
