use fiddle::lang::{codepage, varint, ErrorCode};
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_codepoints_round_trip(code in 0u32..0x100000) {
        let bytes = codepage::encode(code).unwrap();
        prop_assert_eq!(codepage::decode(&bytes), Some((code, bytes.len())));
    }

    #[test]
    fn test_varint_round_trip(value in 0u64..=72624976668147839) {
        let bytes = varint::encode(value).unwrap();
        prop_assert_eq!(varint::decode(&bytes), Some((value, bytes.len())));
        let first = (1..bytes.len()).map(|i| 1u64 << (7 * i)).sum::<u64>();
        prop_assert!(value >= first);
    }

    #[test]
    fn test_rotate_round_trip((count, times) in rotate_pair(1 << 40)) {
        let index = varint::pack_rotate(count, times).unwrap();
        prop_assert_eq!(varint::unpack_rotate(index).unwrap(), (count, times));
    }

    #[test]
    fn test_rotate_is_increasing((count, times) in rotate_pair(1 << 30)) {
        let here = varint::pack_rotate(count, times).unwrap();
        if times + 1 < count {
            prop_assert_eq!(varint::pack_rotate(count, times + 1).unwrap(), here + 1);
        } else {
            prop_assert_eq!(varint::pack_rotate(count + 1, 1).unwrap(), here + 1);
        }
    }
}

fn rotate_pair(limit: u64) -> impl Strategy<Value = (u64, u64)> {
    (3..limit).prop_flat_map(|count| (Just(count), 1..count))
}

#[test]
fn test_every_page_symbol_is_one_byte() {
    for index in 0..codepage::PAGE_SIZE as u8 {
        let symbol = codepage::symbol(index).unwrap();
        assert_eq!(codepage::encode_char(symbol), vec![index]);
        assert_eq!(codepage::decode(&[index]), Some((symbol as u32, 1)));
    }
}

#[test]
fn test_varint_widths_are_minimal() {
    assert_eq!(varint::encode(0).unwrap().len(), 1);
    assert_eq!(varint::encode(127).unwrap().len(), 1);
    assert_eq!(varint::encode(128).unwrap().len(), 2);
    assert_eq!(varint::encode(16511).unwrap().len(), 2);
    assert_eq!(varint::encode(16512).unwrap().len(), 3);
    assert!(varint::encode(u64::MAX).is_err());
}

#[test]
fn test_rotate_at_huge_indices() {
    let count = u64::MAX;
    let index = varint::pack_rotate(count, count - 1).unwrap();
    assert_eq!(varint::unpack_rotate(index).unwrap(), (count, count - 1));
    assert_eq!(varint::unpack_rotate(index + 1).unwrap_err().code(), ErrorCode::ValueError);
}
