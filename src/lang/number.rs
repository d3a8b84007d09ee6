/*!
## Numeric literals

```text
0                 zero
-e3   e-2         powers of ten
-12   0b101  017  0x1f  0X1F    integers, optional exponent e3 (p3 for hex)
1.5   0.1̅6   0b.1  07.4  0x.8   radix point literals, optional repeating part
```

A combining overbar (page byte 0x8D in byte form) starts the
repeating digits, so `0.1̅6` is one sixth. Radix point literals that
do not terminate become rationals unless the registry is configured
for floats. In byte form an integer may also be written as 0xF8
followed by an inline integer.
*/

use super::{codepage, varint};
use super::{Error, ParseMode, Parser, Registry, Source, Token, TokenKind};
use crate::error;
use crate::mach::Number;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Zero};
use regex::bytes::{Captures, Regex};

type Result<T> = std::result::Result<T, Error>;

/// Largest accepted exponent magnitude.
const MAX_EXPONENT: i64 = 1 << 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Form {
    Zero,
    TenPower,
    Integer,
    Point,
}

#[derive(Debug, Clone, Copy)]
struct Radix {
    base: u32,
    prefix: &'static str,
    digits: &'static str,
    lead: &'static str,
    letters: Option<(u8, u8)>,
    exponent: char,
}

const BINARY: Radix = Radix {
    base: 2,
    prefix: "0b",
    digits: "[01]",
    lead: "0|1[01]*",
    letters: None,
    exponent: 'e',
};

const OCTAL: Radix = Radix {
    base: 8,
    prefix: "0",
    digits: "[0-7]",
    lead: "[1-7][0-7]*",
    letters: None,
    exponent: 'e',
};

const DECIMAL: Radix = Radix {
    base: 10,
    prefix: "",
    digits: "[0-9]",
    lead: "[1-9][0-9]*",
    letters: None,
    exponent: 'e',
};

const HEX_LOWER: Radix = Radix {
    base: 16,
    prefix: "0x",
    digits: "[0-9a-f]",
    lead: "0|[1-9a-f][0-9a-f]*",
    letters: Some((b'a', b'f')),
    exponent: 'p',
};

const HEX_UPPER: Radix = Radix {
    base: 16,
    prefix: "0X",
    digits: "[0-9A-F]",
    lead: "0|[1-9A-F][0-9A-F]*",
    letters: Some((b'A', b'F')),
    exponent: 'p',
};

impl Radix {
    fn is_digit(&self, byte: u8) -> bool {
        let numeric = self.base.min(10) as u8;
        match self.letters {
            _ if byte.is_ascii_digit() => byte - b'0' < numeric,
            Some((first, last)) => (first..=last).contains(&byte),
            None => false,
        }
    }
}

/// One literal grammar with a regex for each source form.
pub struct NumberParser {
    name: &'static str,
    form: Form,
    radix: Radix,
    text: Regex,
    bytes: Regex,
}

fn pattern(form: Form, radix: &Radix, overbar: &str) -> String {
    let Radix {
        prefix,
        digits,
        lead,
        exponent,
        ..
    } = radix;
    match form {
        Form::Zero => "^0".to_string(),
        Form::TenPower => "^(-)?e([+-]?[0-9]+)".to_string(),
        Form::Integer => format!("^(-)?{}({})(?:{}([+-]?[0-9]+))?", prefix, lead, exponent),
        Form::Point => format!(
            "^(-)?{p}({d}{w})\\.({d}*)(?:{o}({d}+))?(?:{e}([+-]?[0-9]+))?",
            p = prefix,
            d = digits,
            w = if radix.base == 8 { "+" } else { "*" },
            o = overbar,
            e = exponent
        ),
    }
}

impl NumberParser {
    fn new(name: &'static str, form: Form, radix: Radix) -> Option<NumberParser> {
        let text = Regex::new(&pattern(form, &radix, "\\x{0305}")).ok()?;
        let bytes = Regex::new(&pattern(form, &radix, "(?-u:\\x8D)")).ok()?;
        Some(NumberParser {
            name,
            form,
            radix,
            text,
            bytes,
        })
    }

    /// The parsers for every textual number form.
    pub fn all() -> Vec<NumberParser> {
        [
            ("zero", Form::Zero, DECIMAL),
            ("ten power", Form::TenPower, DECIMAL),
            ("decimal integer", Form::Integer, DECIMAL),
            ("binary integer", Form::Integer, BINARY),
            ("octal integer", Form::Integer, OCTAL),
            ("hex integer", Form::Integer, HEX_LOWER),
            ("hex integer", Form::Integer, HEX_UPPER),
            ("decimal point", Form::Point, DECIMAL),
            ("binary point", Form::Point, BINARY),
            ("octal point", Form::Point, OCTAL),
            ("hex point", Form::Point, HEX_LOWER),
            ("hex point", Form::Point, HEX_UPPER),
        ]
        .into_iter()
        .filter_map(|(name, form, radix)| NumberParser::new(name, form, radix))
        .collect()
    }

    fn captures<'a>(&self, source: Source<'a>) -> Option<Captures<'a>> {
        let regex = if source.is_text() {
            &self.text
        } else {
            &self.bytes
        };
        let caps = regex.captures(source.as_bytes())?;
        let rest = source.as_bytes();
        match self.form {
            Form::Integer => {
                let end = caps.get(2)?.end();
                match rest.get(end) {
                    Some(&b) if b == b'.' || self.radix.is_digit(b) => None,
                    _ => Some(caps),
                }
            }
            Form::Point => {
                let whole = caps.get(2).map_or(&[][..], |m| m.as_bytes());
                let has_digits = [2, 3, 4]
                    .iter()
                    .any(|&i| caps.get(i).map_or(false, |m| !m.is_empty()));
                let padded = self.radix.base == 10 && whole.len() > 1 && whole[0] == b'0';
                if has_digits && !padded {
                    Some(caps)
                } else {
                    None
                }
            }
            _ => Some(caps),
        }
    }

    fn value(&self, caps: &Captures, mode: ParseMode) -> Result<Number> {
        let negative = caps.get(1).is_some();
        let base = self.radix.base;
        let exponent = match self.exponent_group().and_then(|i| caps.get(i)) {
            Some(m) => exponent(m.as_bytes())?,
            None => 0,
        };
        let magnitude = match self.form {
            Form::Zero => BigRational::zero(),
            Form::TenPower => scale(BigRational::one(), 10, exponent),
            Form::Integer => {
                let digits = digits(caps.get(2).map(|m| m.as_bytes()), base);
                scale(BigRational::from_integer(digits), base, exponent)
            }
            Form::Point => {
                let whole = caps.get(2).map_or(&[][..], |m| m.as_bytes());
                let fraction = caps.get(3).map_or(&[][..], |m| m.as_bytes());
                let mut joined = whole.to_vec();
                joined.extend_from_slice(fraction);
                let mut num = BigRational::from_integer(digits(Some(&joined), base));
                if let Some(repeat) = caps.get(4) {
                    let period = num_traits::pow(BigInt::from(base), repeat.len()) - 1;
                    num += BigRational::new(digits(Some(repeat.as_bytes()), base), period);
                }
                scale(num, base, exponent - fraction.len() as i64)
            }
        };
        let value = if negative { -magnitude } else { magnitude };
        Ok(match mode {
            ParseMode::Float if !value.is_integer() => Number::float(Number::Rational(value).to_f64()),
            _ => Number::rational(value),
        })
    }

    fn exponent_group(&self) -> Option<usize> {
        match self.form {
            Form::Zero => None,
            Form::TenPower => Some(2),
            Form::Integer => Some(3),
            Form::Point => Some(5),
        }
    }
}

fn digits(bytes: Option<&[u8]>, base: u32) -> BigInt {
    match bytes {
        Some(b) if !b.is_empty() => BigInt::parse_bytes(b, base).unwrap_or_default(),
        _ => BigInt::zero(),
    }
}

fn exponent(bytes: &[u8]) -> Result<i64> {
    let text = std::str::from_utf8(bytes).unwrap_or("");
    match text.parse::<i64>() {
        Ok(e) if e.abs() <= MAX_EXPONENT => Ok(e),
        _ => Err(error!(ValueError; &format!("EXPONENT {} IS TOO LARGE", text))),
    }
}

fn scale(num: BigRational, base: u32, power: i64) -> BigRational {
    let factor = num_traits::pow(BigInt::from(base), power.unsigned_abs() as usize);
    if power >= 0 {
        num * BigRational::from_integer(factor)
    } else {
        num / BigRational::from_integer(factor)
    }
}

impl Parser for NumberParser {
    fn name(&self) -> &str {
        self.name
    }

    fn matches(&self, source: Source, _: &Registry) -> usize {
        self.captures(source).map_or(0, |caps| caps.get(0).map_or(0, |m| m.end()))
    }

    fn parse(&self, source: Source, registry: &Registry) -> Result<(Vec<Token>, usize)> {
        let caps = self
            .captures(source)
            .ok_or_else(|| error!(InternalError; "NUMBER PARSER CALLED WITHOUT MATCH"))?;
        let len = caps.get(0).map_or(0, |m| m.end());
        let number = self
            .value(&caps, registry.config().parse_mode)
            .map_err(|e| e.in_column(&(0..len)))?;
        Ok((vec![Token::new(0..len, TokenKind::Number(number))], len))
    }
}

/// 0xF8 and an inline integer, byte form only.
pub struct InlineInteger;

impl Parser for InlineInteger {
    fn name(&self) -> &str {
        "inline integer"
    }

    fn matches(&self, source: Source, _: &Registry) -> usize {
        match source {
            Source::Bytes(b) if b.first() == Some(&codepage::INTEGER_PREFIX) => {
                varint::decode(&b[1..]).map_or(1, |(_, len)| 1 + len)
            }
            _ => 0,
        }
    }

    fn parse(&self, source: Source, _: &Registry) -> Result<(Vec<Token>, usize)> {
        let bytes = source.as_bytes();
        let (value, len) = varint::decode_literal(bytes.get(1..).unwrap_or(&[]))
            .map_err(|e| e.in_column(&(0..1)))?;
        let kind = TokenKind::Number(Number::integer(value));
        Ok((vec![Token::new(0..len + 1, kind)], len + 1))
    }
}
