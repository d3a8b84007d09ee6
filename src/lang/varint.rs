/*!
## Inline integers

Command operands and integer literals in byte form use a self
delimiting encoding. The count of leading one bits in the first
byte gives the number of extra bytes. Each width continues where
the previous one stopped, so no value has two encodings.

```text
0xxxxxxx                        0 ..= 127
10xxxxxx xxxxxxxx               128 ..= 16511
110xxxxx xxxxxxxx xxxxxxxx      16512 ..= 2113663
...
11111110 (7 bytes)              up to 72624976668147839
11111111                        reserved, value comes from the stack
```

Rotate packs its `(count, times)` pair into one integer by walking
the triangle of valid pairs: `(3,1) (3,2) (4,1) (4,2) (4,3) (5,1) ...`
*/

use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

pub const MAX_WIDTH: usize = 8;

/// First value that needs `width` bytes.
fn offset(width: usize) -> u64 {
    (1..width).map(|i| 1u64 << (7 * i)).sum()
}

/// Width announced by a lead byte, `None` for the reserved 0xFF.
pub fn width(lead: u8) -> Option<usize> {
    match lead.leading_ones() as usize {
        n if n < MAX_WIDTH => Some(n + 1),
        _ => None,
    }
}

pub fn encode(value: u64) -> Result<Vec<u8>> {
    let mut rest = value;
    let mut width = 1;
    while rest >> (7 * width) != 0 {
        rest -= 1 << (7 * width);
        width += 1;
        if width > MAX_WIDTH {
            return Err(error!(ValueError; &format!("{} IS TOO LARGE FOR AN INLINE INTEGER", value)));
        }
    }
    let mut bytes = rest.to_be_bytes()[8 - width..].to_vec();
    bytes[0] |= !(0xFFu8 >> (width - 1));
    Ok(bytes)
}

/// Decode one integer from the front of `bytes`.
///
/// Returns `None` for short input or the reserved 0xFF lead byte.
pub fn decode(bytes: &[u8]) -> Option<(u64, usize)> {
    let lead = *bytes.first()?;
    let width = width(lead)?;
    let body = bytes.get(1..width)?;
    let mut value = 0xFFu8.checked_shr(width as u32).map_or(0, |mask| lead & mask) as u64;
    for b in body {
        value = (value << 8) | *b as u64;
    }
    Some((value + offset(width), width))
}

/// Like `decode` but treats short input and 0xFF as malformed literals.
pub fn decode_literal(bytes: &[u8]) -> Result<(u64, usize)> {
    match bytes.first() {
        None => Err(error!(ValueError; "MISSING INLINE INTEGER")),
        Some(&lead) if width(lead).is_none() => {
            Err(error!(ValueError; "INVALID INLINE INTEGER LEAD BYTE"))
        }
        Some(_) => decode(bytes).ok_or_else(|| error!(ValueError; "TRUNCATED INLINE INTEGER")),
    }
}

pub fn triangular(n: u128) -> u128 {
    checked_triangular(n).unwrap_or(u128::MAX)
}

fn checked_triangular(n: u128) -> Option<u128> {
    if n % 2 == 0 {
        (n / 2).checked_mul(n + 1)
    } else {
        n.checked_mul((n + 1) / 2)
    }
}

/// Largest `r` with `r * r <= n`.
pub fn isqrt(n: u128) -> u128 {
    if n < 2 {
        return n;
    }
    let bits = 128 - n.leading_zeros();
    let mut x = 1u128 << ((bits + 1) / 2);
    loop {
        let y = (x + n / x) / 2;
        if y >= x {
            break;
        }
        x = y;
    }
    while x.checked_mul(x).map_or(true, |sq| sq > n) {
        x -= 1;
    }
    while (x + 1).checked_mul(x + 1).map_or(false, |sq| sq <= n) {
        x += 1;
    }
    x
}

/// Largest `n` with `triangular(n) <= x`.
pub fn inverse_triangular(x: u128) -> u128 {
    let mut n = isqrt(x.saturating_mul(2));
    while checked_triangular(n).map_or(true, |t| t > x) {
        n -= 1;
    }
    while checked_triangular(n + 1).map_or(false, |t| t <= x) {
        n += 1;
    }
    n
}

/// Pack a rotate pair. `count >= 3` and `1 <= times < count`.
pub fn pack_rotate(count: u64, times: u64) -> Result<u128> {
    if count < 3 || times < 1 || times >= count {
        return Err(error!(ValueError; &format!("ROTATE ({}, {}) IS OUT OF RANGE", count, times)));
    }
    Ok(triangular(count as u128 - 2) + times as u128 - 1)
}

/// Inverse of `pack_rotate`. Index 0 would be the two item swap and is rejected.
pub fn unpack_rotate(index: u128) -> Result<(u64, u64)> {
    let n = inverse_triangular(index);
    let count = n + 2;
    let times = index - triangular(n) + 1;
    if count < 3 {
        return Err(error!(ValueError; &format!("ROTATE INDEX {} IS OUT OF RANGE", index)));
    }
    match (u64::try_from(count), u64::try_from(times)) {
        (Ok(count), Ok(times)) => Ok((count, times)),
        _ => Err(error!(ValueError; &format!("ROTATE INDEX {} IS TOO LARGE", index))),
    }
}
