//! Property-based tests for the round-trip guarantees of the serde layer
//! and the variable formatter/parser.

use bintoken::bintoken::{format_vec, parse_slice};
use bintoken::{from_slice, to_vec, Variable};
use proptest::prelude::*;
use serde::{Deserialize, Serialize};

fn roundtrip<T: Serialize + for<'de> Deserialize<'de> + PartialEq + std::fmt::Debug>(
    value: &T,
) -> bool {
    match to_vec(value) {
        Ok(bytes) => match from_slice::<T>(&bytes) {
            Ok(back) => *value == back,
            Err(e) => {
                eprintln!("Deserialize failed: {}", e);
                eprintln!("Serialized was: {:02X?}", bytes);
                false
            }
        },
        Err(e) => {
            eprintln!("Serialize failed: {}", e);
            false
        }
    }
}

fn scalar() -> impl Strategy<Value = Variable> {
    prop_oneof![
        Just(Variable::Null),
        any::<bool>().prop_map(Variable::from),
        any::<i8>().prop_map(Variable::from),
        any::<i16>().prop_map(Variable::from),
        any::<i32>().prop_map(Variable::from),
        any::<i64>().prop_map(Variable::from),
        any::<u8>().prop_map(Variable::from),
        any::<u16>().prop_map(Variable::from),
        any::<u32>().prop_map(Variable::from),
        any::<u64>().prop_map(Variable::from),
        any::<f32>().prop_map(Variable::from),
        any::<f64>().prop_map(Variable::from),
        ".{0,12}".prop_map(Variable::from),
    ]
}

fn variable() -> impl Strategy<Value = Variable> {
    scalar().prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Variable::Array),
            prop::collection::vec(("[a-z]{1,6}", inner), 0..6).prop_map(Variable::map),
        ]
    })
}

proptest! {
    #[test]
    fn prop_i64(n in any::<i64>()) {
        prop_assert!(roundtrip(&n));
    }

    #[test]
    fn prop_u64(n in any::<u64>()) {
        prop_assert!(roundtrip(&n));
    }

    #[test]
    fn prop_i8(n in any::<i8>()) {
        prop_assert!(roundtrip(&n));
    }

    #[test]
    fn prop_bool(b in any::<bool>()) {
        prop_assert!(roundtrip(&b));
    }

    #[test]
    fn prop_f64_bits(x in any::<f64>()) {
        let bytes = to_vec(&x).unwrap();
        let back: f64 = from_slice(&bytes).unwrap();
        prop_assert_eq!(back.to_bits(), x.to_bits());
    }

    #[test]
    fn prop_string(s in ".*") {
        prop_assert!(roundtrip(&s));
    }

    #[test]
    fn prop_bytes_len_prefix(len in 0usize..70_000) {
        let text = "a".repeat(len);
        let bytes = to_vec(&text).unwrap();
        let prefix = match len {
            0..=0xFF => 1,
            0x100..=0xFFFF => 2,
            _ => 4,
        };
        prop_assert_eq!(bytes.len(), 1 + prefix + len);
    }

    #[test]
    fn prop_vec_i32(v in prop::collection::vec(any::<i32>(), 0..20)) {
        prop_assert!(roundtrip(&v));
    }

    #[test]
    fn prop_option_u16(opt in proptest::option::of(any::<u16>())) {
        prop_assert!(roundtrip(&opt));
    }

    #[test]
    fn prop_tuple(t in (any::<u8>(), ".{0,8}", any::<bool>())) {
        prop_assert!(roundtrip(&t));
    }

    #[test]
    fn prop_variable_format_parse(value in variable()) {
        let bytes = format_vec(&value).unwrap();
        let back = parse_slice(&bytes).unwrap();
        prop_assert_eq!(back.kind(), value.kind());
        prop_assert_eq!(back, value);
    }

    #[test]
    fn prop_parse_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let _ = parse_slice(&bytes);
        let _ = from_slice::<Variable>(&bytes);
    }

    #[test]
    fn prop_order_is_total(a in variable(), b in variable()) {
        let forward = a.cmp(&b);
        prop_assert_eq!(forward.reverse(), b.cmp(&a));
        prop_assert_eq!(forward == std::cmp::Ordering::Equal, a == b);
    }
}
