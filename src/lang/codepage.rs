/*!
## Code page

Fiddle programs are written either as UTF-8 text or as bytes.
In byte form the 192 most common symbols occupy a single byte.
Everything else is written with a 2, 3 or 4 byte escape whose
lead byte says how long it is, much like UTF-8.

```text
00xxxxxx-10xxxxxx                     paged symbol 0x00-0xBF
110xxxxx xxxxxxxx                     codepoint < 0x2000
1110xxxx xxxxxxxx xxxxxxxx            codepoint < 0x100000
11110000 xxxxxxxx xxxxxxxx xxxxxxxx   any codepoint
```

Lead bytes 0xF1 and above never start a symbol. 0xF8 starts an
inline integer and 0xFF marks an operand taken from the stack.
*/

use crate::error;
use crate::lang::Error;
use std::collections::HashMap;
use std::sync::OnceLock;

type Result<T> = std::result::Result<T, Error>;

pub const PAGE_SIZE: usize = 192;

/// Lead byte of an inline integer literal.
pub const INTEGER_PREFIX: u8 = 0xF8;

/// Operand byte meaning "take this value from the stack".
pub const FROM_STACK: u8 = 0xFF;

/// Marks the repeating part of a radix point literal.
pub const OVERBAR: char = '\u{0305}';

const LANGUAGE_ROW: [char; 16] = [
    '≠', '≤', '≥', '→', '↣', '↦', '↠', '⇉', '⇶', '↑', '↥', '↟', '⇈', OVERBAR, '\u{8E}', '\u{8F}',
];

struct Page {
    symbols: [char; PAGE_SIZE],
    index: HashMap<char, u8>,
}

fn page() -> &'static Page {
    static PAGE: OnceLock<Page> = OnceLock::new();
    PAGE.get_or_init(|| {
        let mut symbols = ['\0'; PAGE_SIZE];
        for (index, symbol) in symbols.iter_mut().enumerate() {
            *symbol = match index {
                0x80..=0x8F => LANGUAGE_ROW[index - 0x80],
                _ => char::from(index as u8),
            };
        }
        let index = symbols
            .iter()
            .enumerate()
            .map(|(i, c)| (*c, i as u8))
            .collect();
        Page { symbols, index }
    })
}

/// The symbol stored at a page index.
pub fn symbol(index: u8) -> Option<char> {
    page().symbols.get(index as usize).copied()
}

/// The page index of a symbol, if it has one.
pub fn index_of(symbol: char) -> Option<u8> {
    page().index.get(&symbol).copied()
}

/// Decode one symbol from the front of `bytes`.
///
/// Returns the codepoint and the number of bytes used, or `None`
/// when the input is short or starts with a non-symbol lead byte.
pub fn decode(bytes: &[u8]) -> Option<(u32, usize)> {
    let head = *bytes.first()?;
    match head {
        0x00..=0xBF => symbol(head).map(|c| (c as u32, 1)),
        0xC0..=0xDF => {
            let b1 = *bytes.get(1)? as u32;
            Some((b1 + 256 * (head as u32 - 0xC0), 2))
        }
        0xE0..=0xEF => {
            let b1 = *bytes.get(1)? as u32;
            let b2 = *bytes.get(2)? as u32;
            Some((b2 + 256 * b1 + 65536 * (head as u32 - 0xE0), 3))
        }
        0xF0 => {
            let b1 = *bytes.get(1)? as u32;
            let b2 = *bytes.get(2)? as u32;
            let b3 = *bytes.get(3)? as u32;
            Some((b3 + 256 * b2 + 65536 * b1, 4))
        }
        _ => None,
    }
}

/// Encode a codepoint in the shortest form available.
pub fn encode(code: u32) -> Result<Vec<u8>> {
    if let Some(c) = char::from_u32(code) {
        if let Some(index) = index_of(c) {
            return Ok(vec![index]);
        }
    }
    match code {
        0..=0x1FFF => Ok(vec![0xC0 + (code >> 8) as u8, code as u8]),
        0x2000..=0xFFFFF => Ok(vec![
            0xE0 + (code >> 16) as u8,
            (code >> 8) as u8,
            code as u8,
        ]),
        0x100000..=0x10FFFF => Ok(vec![0xF0, (code >> 16) as u8, (code >> 8) as u8, code as u8]),
        _ => Err(error!(ValueError; &format!("CODEPOINT {:#X} EXCEEDS U+10FFFF", code))),
    }
}

/// Encode a symbol. Never fails since every `char` is in range.
pub fn encode_char(c: char) -> Vec<u8> {
    match index_of(c) {
        Some(index) => vec![index],
        None => encode(c as u32).unwrap_or_default(),
    }
}

/// Encode a whole string of symbols.
pub fn encode_str(s: &str) -> Vec<u8> {
    s.chars().flat_map(encode_char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_is_distinct() {
        assert_eq!(page().index.len(), PAGE_SIZE);
    }

    #[test]
    fn test_ascii_is_identity() {
        assert_eq!(index_of('+'), Some(b'+'));
        assert_eq!(index_of('\n'), Some(0x0A));
        assert_eq!(decode(b"5"), Some(('5' as u32, 1)));
    }

    #[test]
    fn test_language_row() {
        assert_eq!(index_of('≠'), Some(0x80));
        assert_eq!(index_of(OVERBAR), Some(0x8D));
        assert_eq!(index_of('¿'), Some(0xBF));
        assert_eq!(index_of('À'), None);
    }

    #[test]
    fn test_widths() {
        assert_eq!(encode(0x80).unwrap(), vec![0xC0, 0x80]);
        assert_eq!(encode(0x2000).unwrap(), vec![0xE0, 0x20, 0x00]);
        assert_eq!(encode(0x10FFFF).unwrap(), vec![0xF0, 0x10, 0xFF, 0xFF]);
        assert!(encode(0x110000).is_err());
    }

    #[test]
    fn test_short_input() {
        assert_eq!(decode(&[]), None);
        assert_eq!(decode(&[0xC1]), None);
        assert_eq!(decode(&[0xE0, 0x01]), None);
        assert_eq!(decode(&[0xF0, 0x01, 0x02]), None);
        assert_eq!(decode(&[INTEGER_PREFIX, 0x01]), None);
        assert_eq!(decode(&[FROM_STACK]), None);
    }
}
