/// How radix point literals that do not terminate are realized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    #[default]
    Rational,
    Float,
}

/// Settings read by parsers during tokenization.
///
/// A `Config` is fixed when its `Registry` is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Config {
    pub parse_mode: ParseMode,
}

impl Config {
    pub fn new(parse_mode: ParseMode) -> Config {
        Config { parse_mode }
    }
}
