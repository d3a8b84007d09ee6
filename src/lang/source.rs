use super::codepage;

/// ## Program text in either of its two forms
///
/// Positions and lengths are counted in bytes for both forms.
/// Parsers only ever advance by whole symbols so text positions
/// always land on character boundaries.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source<'a> {
    Text(&'a str),
    Bytes(&'a [u8]),
}

impl<'a> Source<'a> {
    pub fn is_text(&self) -> bool {
        matches!(self, Source::Text(_))
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        match self {
            Source::Text(s) => s.as_bytes(),
            Source::Bytes(b) => b,
        }
    }

    /// The remainder of the source starting at `pos`.
    pub fn at(&self, pos: usize) -> Source<'a> {
        match self {
            Source::Text(s) => Source::Text(s.get(pos..).unwrap_or("")),
            Source::Bytes(b) => Source::Bytes(b.get(pos..).unwrap_or(&[])),
        }
    }

    /// The first `len` units of the source.
    pub fn prefix(&self, len: usize) -> Source<'a> {
        match self {
            Source::Text(s) => Source::Text(s.get(..len).unwrap_or(s)),
            Source::Bytes(b) => Source::Bytes(b.get(..len).unwrap_or(b)),
        }
    }

    pub fn first_byte(&self) -> Option<u8> {
        self.as_bytes().first().copied()
    }

    /// The next symbol and how many units it occupies.
    pub fn next_symbol(&self) -> Option<(char, usize)> {
        match self {
            Source::Text(s) => s.chars().next().map(|c| (c, c.len_utf8())),
            Source::Bytes(b) => {
                let (code, len) = codepage::decode(b)?;
                char::from_u32(code).map(|c| (c, len))
            }
        }
    }

    /// Length of `symbol` if the source starts with it, else 0.
    pub fn starts_with(&self, symbol: char) -> usize {
        match self.next_symbol() {
            Some((c, len)) if c == symbol => len,
            _ => 0,
        }
    }

    /// Length of `word` if the source starts with all of its symbols, else 0.
    pub fn starts_with_word(&self, word: &str) -> usize {
        let mut len = 0;
        for c in word.chars() {
            match self.at(len).starts_with(c) {
                0 => return 0,
                n => len += n,
            }
        }
        len
    }
}

impl std::fmt::Display for Source<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Source::Text(s) => write!(f, "{}", s),
            Source::Bytes(b) => {
                let mut rest = *b;
                while !rest.is_empty() {
                    match Source::Bytes(rest).next_symbol() {
                        Some((c, len)) => {
                            write!(f, "{}", c)?;
                            rest = &rest[len..];
                        }
                        None => {
                            write!(f, "\\x{:02X}", rest[0])?;
                            rest = &rest[1..];
                        }
                    }
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols_agree() {
        let text = Source::Text("≠+");
        let bytes = Source::Bytes(&[0x80, b'+']);
        assert_eq!(text.next_symbol(), Some(('≠', 3)));
        assert_eq!(bytes.next_symbol(), Some(('≠', 1)));
        assert_eq!(text.starts_with_word("≠+"), 4);
        assert_eq!(bytes.starts_with_word("≠+"), 2);
        assert_eq!(bytes.starts_with_word("≠-"), 0);
    }

    #[test]
    fn test_display_bytes() {
        let bytes = Source::Bytes(&[b'r', 0xFF]);
        assert_eq!(bytes.to_string(), "r\\xFF");
    }
}
