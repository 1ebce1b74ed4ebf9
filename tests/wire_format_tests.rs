//! Wire format and dynamic value behavior, checked through the public API.

use bintoken::bintoken::{format_vec, parse_slice, Code, Decoder, Reader, Writer};
use bintoken::variable::{algorithm, key};
use bintoken::{variable, Category, Error, ErrorKind, Symbol, Variable};

fn write<T: bintoken::bintoken::Encode + ?Sized>(value: &T) -> Vec<u8> {
    let mut writer = Writer::new(Vec::new());
    writer.value(value).unwrap();
    writer.into_inner()
}

macro_rules! scalar_round_trip {
    ($($t:ty => $code:expr),* $(,)?) => {$(
        for v in [<$t>::MIN, <$t>::MAX, 0 as $t, (0 as $t).wrapping_sub(1)] {
            let bytes = write(&v);
            let reader = Reader::new(&bytes);
            assert_eq!(reader.code(), $code);
            assert_eq!(reader.value::<$t>().unwrap(), v);
            assert_eq!(bytes.len(), 1 + std::mem::size_of::<$t>());
        }
    )*};
}

#[test]
fn test_integers_round_trip_bit_exact() {
    scalar_round_trip! {
        i8 => Code::Int8,
        i16 => Code::Int16,
        i32 => Code::Int32,
        i64 => Code::Int64,
        u8 => Code::UInt8,
        u16 => Code::UInt16,
        u32 => Code::UInt32,
        u64 => Code::UInt64,
    }
}

#[test]
fn test_floats_round_trip_bit_exact() {
    for v in [f32::MIN, f32::MAX, 0.0, -0.0, -1.0, f32::MIN_POSITIVE] {
        let bytes = write(&v);
        assert_eq!(bytes[0], 0x98);
        let back: f32 = Reader::new(&bytes).value().unwrap();
        assert_eq!(back.to_bits(), v.to_bits());
    }
    for v in [f64::MIN, f64::MAX, 0.0, -1.0, f64::NAN] {
        let bytes = write(&v);
        assert_eq!(bytes[0], 0x99);
        let back: f64 = Reader::new(&bytes).value().unwrap();
        assert_eq!(back.to_bits(), v.to_bits());
    }
}

#[test]
fn test_little_endian_payload() {
    assert_eq!(write(&0x0102_0304u32), vec![0x96, 0x04, 0x03, 0x02, 0x01]);
    assert_eq!(write(&-2i16), vec![0x91, 0xFE, 0xFF]);
}

#[test]
fn test_length_prefix_is_narrowest() {
    let cases = [
        (0usize, 0xA0u8, 1usize),
        (255, 0xA0, 1),
        (256, 0xA1, 2),
        (65_535, 0xA1, 2),
        (65_536, 0xA2, 4),
    ];
    for (len, tag, prefix) in cases {
        let text = "x".repeat(len);
        let bytes = write(text.as_str());
        assert_eq!(bytes[0], tag, "length {}", len);
        assert_eq!(bytes.len(), 1 + prefix + len);
        assert_eq!(Reader::new(&bytes).value::<&str>().unwrap(), text);
    }

    let blob = vec![7u8; 300];
    let bytes = write(blob.as_slice());
    assert_eq!(&bytes[..3], &[0xA5, 0x2C, 0x01]);
}

#[test]
fn test_non_canonical_and_negative_lengths() {
    let decoder = Decoder::new(&[0xA1, 0x01, 0x00, b'a']);
    assert_eq!(decoder.error(), Some(ErrorKind::InvalidLength));

    let mut negative = vec![0xA3];
    negative.extend_from_slice(&u64::MAX.to_le_bytes());
    let decoder = Decoder::new(&negative);
    assert_eq!(decoder.error(), Some(ErrorKind::NegativeLength));
    assert_eq!(decoder.offset(), 0);
    assert_eq!(decoder.tail(), negative.as_slice());

    let decoder = Decoder::new(&[0xA0, 0x04, b'a']);
    assert_eq!(decoder.error(), Some(ErrorKind::UnexpectedEnd));
}

#[test]
fn test_level_returns_to_zero_at_outermost_end() {
    let value = variable!([[1, {"a": [true]}], [], {"b": null}]);
    let bytes = format_vec(&value).unwrap();
    let mut reader = Reader::new(&bytes);
    let mut levels = vec![reader.level()];
    while reader.next() {
        levels.push(reader.level());
    }
    assert_eq!(reader.code(), Code::End);
    assert_eq!(levels.last(), Some(&0));
    // Only the final close brings the level back to zero.
    let zeros = levels.iter().filter(|&&level| level == 0).count();
    assert_eq!(zeros, 1);
}

#[test]
fn test_truncated_streams_never_succeed() {
    let value = variable!({"list": [1, 2, [3]], "rec": null});
    let bytes = format_vec(&value).unwrap();
    for cut in 1..bytes.len() {
        let mut reader = Reader::new(&bytes[..cut]);
        while reader.next() {}
        assert!(
            reader.error().is_some(),
            "truncated at {} ended cleanly",
            cut
        );
        assert!(parse_slice(&bytes[..cut]).is_err());
    }
}

#[test]
fn test_truncated_close_reports_expected_end() {
    let cases: [(&[u8], ErrorKind); 3] = [
        (&[0xB2, 0x80], ErrorKind::ExpectedEndArray),
        (&[0xB0, 0x80], ErrorKind::ExpectedEndRecord),
        (&[0xB4, 0x80], ErrorKind::ExpectedEndAssocArray),
    ];
    for (input, kind) in cases {
        let mut reader = Reader::new(input);
        while reader.next() {}
        assert_eq!(reader.error(), Some(kind));
    }
}

#[test]
fn test_mismatched_and_unbalanced_close() {
    let mut reader = Reader::new(&[0xB2, 0xB1]);
    assert!(!reader.next());
    assert_eq!(reader.error(), Some(ErrorKind::ExpectedEndArray));

    let mut reader = Reader::new(&[0x80, 0xB3]);
    assert!(!reader.next());
    assert_eq!(reader.error(), Some(ErrorKind::UnbalancedEndArray));
}

#[test]
fn test_error_code_and_result_parity() {
    let inputs: [&[u8]; 5] = [
        &[0xB2, 0xB1],
        &[0x80, 0xFF],
        &[0x80, 0xA0, 0x03],
        &[0x80, 0xB5],
        &[0x80, 0xB2],
    ];
    for input in inputs {
        let mut by_code = Reader::new(input);
        while by_code.next() {}
        let code = by_code.error();

        let mut by_result = Reader::new(input);
        let err = loop {
            match by_result.try_next() {
                Ok(true) => continue,
                Ok(false) => panic!("no error for {:?}", input),
                Err(err) => break err,
            }
        };
        assert!(code.is_some());
        assert_eq!(err.kind(), code);
        assert_eq!(err, Error::syntax(code.unwrap(), by_code.offset()));
    }
}

#[test]
fn test_value_extraction_parity() {
    let bytes = write(&-1i32);
    let reader = Reader::new(&bytes);
    let err = reader.value::<u32>().unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::Overflow));
    let decoder = Decoder::new(&bytes);
    assert_eq!(decoder.value::<u32>(), Err(ErrorKind::Overflow));
    assert_eq!(decoder.value::<&str>(), Err(ErrorKind::IncompatibleType));
}

#[test]
fn test_symbol_and_category() {
    let bytes = format_vec(&variable!([null, 1, "s"])).unwrap();
    let mut reader = Reader::new(&bytes);
    let mut seen = vec![(reader.symbol(), reader.category())];
    while reader.next() {
        seen.push((reader.symbol(), reader.category()));
    }
    assert_eq!(seen[0], (Symbol::BeginArray, Category::Structural));
    assert_eq!(seen[1], (Symbol::Null, Category::Nullable));
    assert_eq!(seen[2].1, Category::Data);
    assert_eq!(seen[3].0, Symbol::String);
    assert_eq!(seen[4].0, Symbol::EndArray);
    assert_eq!(reader.category(), Category::Status);
}

#[test]
fn test_kind_promotion() {
    assert!(!Variable::from(2).is::<f64>());
    assert!(!Variable::from(2.0).is::<i64>());
    assert!(Variable::from(2).is::<i64>());
    assert!(Variable::from(2).is::<u8>());
    assert!(!Variable::from(true).is::<i32>());
    assert!(Variable::from(2.0f32).is::<f64>());
    assert!(!Variable::from(2).same::<i64>());
    assert!(Variable::from(2).same::<i32>());
    assert!(Variable::Null.is::<()>());
    assert!(!Variable::Null.is::<bool>());
}

#[test]
fn test_value_code_and_result_parity() {
    let value = Variable::from("text");
    assert_eq!(value.check::<i32>(), Some(ErrorKind::IncompatibleType));
    assert_eq!(value.get::<i32>(), None);
    let err = value.value::<i32>().unwrap_err();
    assert_eq!(err.kind(), value.check::<i32>());
}

#[test]
fn test_key_count() {
    let data = variable!({"alpha": null, "bravo": true, "charlie": 2});
    assert_eq!(key::count(&data, &Variable::from("alpha")), 1);
    assert_eq!(key::count(&data, &Variable::from("missing")), 0);
    assert_eq!(key::count(&data, &Variable::Null), 0);

    let list = variable!(["x", "y"]);
    assert_eq!(key::count(&list, &Variable::from(1u64)), 1);
    assert_eq!(key::count(&Variable::Null, &Variable::Null), 0);
    assert_eq!(key::count(&Variable::from(5), &Variable::from(5)), 1);
}

#[test]
fn test_key_erase() {
    let mut data = variable!({"alpha": null});
    assert_eq!(key::erase(&mut data, &Variable::from("alpha")), None);
    assert_eq!(data.len(), 0);
    assert!(data.is_map());

    let mut data = variable!({"alpha": 1, "bravo": 2});
    assert_eq!(key::erase(&mut data, &Variable::from("missing")), None);
    assert_eq!(data.len(), 2);
    assert_eq!(key::erase(&mut data, &Variable::from("alpha")), Some(0));
    assert_eq!(data["bravo"], Variable::from(2));
}

#[test]
fn test_key_erase_on_non_map_is_noop() {
    let mut list = variable!(["alpha"]);
    assert_eq!(key::erase(&mut list, &Variable::from(0u64)), None);
    assert_eq!(list, variable!(["alpha"]));

    let mut scalar = Variable::from("alpha");
    assert_eq!(key::erase(&mut scalar, &Variable::from("alpha")), None);
    assert_eq!(scalar, Variable::from("alpha"));
}

#[test]
fn test_value_algorithms() {
    let mut list = variable!([1, 2u8, 1.0, "1"]);
    assert_eq!(algorithm::count(&list, &Variable::from(1)), 1);
    assert_eq!(algorithm::find(&list, &Variable::from(2i64)), Some(1));
    assert_eq!(algorithm::erase(&mut list, &Variable::from(1)), 1);
    assert_eq!(list.len(), 3);
}

#[test]
fn test_total_order() {
    let sorted = |v: &Variable| {
        let items = v.as_array().unwrap();
        items.windows(2).all(|w| w[0] <= w[1])
    };
    assert!(sorted(&Variable::array([Variable::from(true), Variable::from(2)])));
    assert!(!sorted(&Variable::array([Variable::from(2), Variable::from(true)])));

    let mut mixed = variable!([{}, [], "s", 1.5, 3, false, null]);
    mixed.as_array_mut().unwrap().sort();
    assert_eq!(mixed, variable!([null, false, 3, 1.5, "s", [], {}]));
}
