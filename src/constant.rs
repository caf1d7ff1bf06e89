pub(crate) const SHORT_MARKER: &str = "-";
pub(crate) const LONG_MARKER: &str = "--";
pub(crate) const EQUALS_MARKER: char = '=';
pub(crate) const TOKEN_SEPARATOR: char = ' ';
