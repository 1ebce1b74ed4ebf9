//! Serde deserialization from binary tokens.
//!
//! [`Deserializer`] walks a [`Reader`] and hands scalars to the visitor
//! without copying: `&str` and `&[u8]` fields borrow straight from the input.
//! Records and arrays both deserialize as sequences, and binary blobs and
//! packed arrays can fill any sequence of numbers.
//!
//! ```rust
//! use bintoken::from_slice;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Entry<'a> {
//!     name: &'a str,
//!     size: u32,
//! }
//!
//! let input = [
//!     0xB4, 0x80, 0xA0, 0x04, b'n', b'a', b'm', b'e', 0xA0, 0x02, b'o', b'k',
//!     0xA0, 0x04, b's', b'i', b'z', b'e', 0x94, 0x07, 0xB5,
//! ];
//! let entry: Entry = from_slice(&input).unwrap();
//! assert_eq!(entry, Entry { name: "ok", size: 7 });
//! ```

use crate::bintoken::{le, Code, Element, Reader};
use crate::{Error, ErrorKind, Options, Result, Variable, VariableMap};
use serde::de::{self, Deserializer as _, IntoDeserializer};
use serde::forward_to_deserialize_any;

/// Deserializes Rust values from a token stream.
pub struct Deserializer<'de> {
    reader: Reader<'de>,
}

impl<'de> Deserializer<'de> {
    pub fn from_slice(input: &'de [u8]) -> Self {
        Self::with_options(input, Options::default())
    }

    pub fn with_options(input: &'de [u8], options: Options) -> Self {
        Deserializer {
            reader: Reader::with_options(input, options),
        }
    }

    /// Checks that the whole input was consumed.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::UnexpectedToken`] if tokens remain after the value.
    pub fn end(&self) -> Result<()> {
        self.reader.check()?;
        match self.reader.code() {
            Code::End => Ok(()),
            _ => Err(self.error(ErrorKind::UnexpectedToken)),
        }
    }

    fn error(&self, kind: ErrorKind) -> Error {
        Error::syntax(kind, self.reader.offset())
    }

    /// The current token, which must start a value.
    fn peek(&self) -> Result<Code> {
        self.reader.check()?;
        match self.reader.code() {
            Code::End => Err(self.error(ErrorKind::UnexpectedEnd)),
            code => Ok(code),
        }
    }

    fn advance(&mut self) -> Result<()> {
        self.reader.try_next().map(drop)
    }

    /// Consumes the close token of a container the visitor has finished.
    fn close(&mut self, close: Code) -> Result<()> {
        self.reader.check()?;
        if self.reader.code() != close {
            return Err(self.error(ErrorKind::UnexpectedToken));
        }
        self.advance()
    }

    fn packed(&mut self, code: Code) -> Result<PackedAccess<'de>> {
        let size = match code {
            Code::Array(element, _) => element.size(),
            _ => 1,
        };
        let literal = self.reader.literal();
        self.advance()?;
        Ok(PackedAccess {
            code,
            chunks: literal.chunks_exact(size),
        })
    }
}

macro_rules! visit_scalar {
    ($de:ident, $visitor:ident, $t:ty, $visit:ident) => {{
        let value: $t = $de.reader.value()?;
        $de.advance()?;
        $visitor.$visit(value)
    }};
}

impl<'de, 'a> de::Deserializer<'de> for &'a mut Deserializer<'de> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let code = self.peek()?;
        match code {
            Code::Null => {
                self.advance()?;
                visitor.visit_unit()
            }
            Code::True | Code::False => visit_scalar!(self, visitor, bool, visit_bool),
            Code::Int8 => visit_scalar!(self, visitor, i8, visit_i8),
            Code::Int16 => visit_scalar!(self, visitor, i16, visit_i16),
            Code::Int32 => visit_scalar!(self, visitor, i32, visit_i32),
            Code::Int64 => visit_scalar!(self, visitor, i64, visit_i64),
            Code::UInt8 => visit_scalar!(self, visitor, u8, visit_u8),
            Code::UInt16 => visit_scalar!(self, visitor, u16, visit_u16),
            Code::UInt32 => visit_scalar!(self, visitor, u32, visit_u32),
            Code::UInt64 => visit_scalar!(self, visitor, u64, visit_u64),
            Code::Float32 => visit_scalar!(self, visitor, f32, visit_f32),
            Code::Float64 | Code::Float128 => visit_scalar!(self, visitor, f64, visit_f64),
            Code::String(_) => visit_scalar!(self, visitor, &'de str, visit_borrowed_str),
            Code::Binary(_) => visit_scalar!(self, visitor, &'de [u8], visit_borrowed_bytes),
            Code::Array(..) => {
                let access = self.packed(code)?;
                visitor.visit_seq(access)
            }
            Code::BeginArray | Code::BeginRecord => {
                let close = code.closer().unwrap_or(Code::EndArray);
                self.advance()?;
                let value = visitor.visit_seq(SeqAccess { de: self, close })?;
                self.close(close)?;
                Ok(value)
            }
            Code::BeginAssocArray => {
                self.advance()?;
                let value = visitor.visit_map(MapAccess { de: self })?;
                self.close(Code::EndAssocArray)?;
                Ok(value)
            }
            _ => Err(self.error(ErrorKind::UnexpectedToken)),
        }
    }

    fn is_human_readable(&self) -> bool {
        false
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if self.peek()? == Code::Null {
            self.advance()?;
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.peek()? {
            code @ Code::Binary(_) => {
                let access = self.packed(code)?;
                visitor.visit_seq(access)
            }
            _ => self.deserialize_any(visitor),
        }
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.peek()? {
            Code::String(_) => {
                let variant: &'de str = self.reader.value()?;
                self.advance()?;
                visitor.visit_enum(variant.into_deserializer())
            }
            Code::BeginAssocArray => {
                self.advance()?;
                let value = visitor.visit_enum(VariantAccess { de: self })?;
                self.close(Code::EndAssocArray)?;
                Ok(value)
            }
            _ => Err(self.error(ErrorKind::IncompatibleType)),
        }
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.peek()?;
        self.reader.skip()?;
        visitor.visit_unit()
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct map struct identifier
    }
}

struct SeqAccess<'a, 'de> {
    de: &'a mut Deserializer<'de>,
    close: Code,
}

impl<'de, 'a> de::SeqAccess<'de> for SeqAccess<'a, 'de> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        if self.de.peek()? == self.close {
            return Ok(None);
        }
        seed.deserialize(&mut *self.de).map(Some)
    }
}

struct MapAccess<'a, 'de> {
    de: &'a mut Deserializer<'de>,
}

impl<'de, 'a> de::MapAccess<'de> for MapAccess<'a, 'de> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        if self.de.peek()? == Code::EndAssocArray {
            return Ok(None);
        }
        seed.deserialize(&mut *self.de).map(Some)
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        if self.de.peek()? == Code::EndAssocArray {
            return Err(self.de.error(ErrorKind::UnexpectedToken));
        }
        seed.deserialize(&mut *self.de)
    }
}

struct VariantAccess<'a, 'de> {
    de: &'a mut Deserializer<'de>,
}

impl<'de, 'a> de::EnumAccess<'de> for VariantAccess<'a, 'de> {
    type Error = Error;
    type Variant = Self;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(&mut *self.de)?;
        Ok((variant, self))
    }
}

impl<'de, 'a> de::VariantAccess<'de> for VariantAccess<'a, 'de> {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        de::Deserialize::deserialize(self.de)
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        seed.deserialize(self.de)
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.de.deserialize_seq(visitor)
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.de.deserialize_map(visitor)
    }
}

/// Elements of a binary blob or a packed scalar array.
struct PackedAccess<'de> {
    code: Code,
    chunks: std::slice::ChunksExact<'de, u8>,
}

fn element<'de, T, V>(seed: T, value: V) -> Result<T::Value>
where
    T: de::DeserializeSeed<'de>,
    V: IntoDeserializer<'de, Error>,
{
    seed.deserialize(value.into_deserializer())
}

impl<'de> de::SeqAccess<'de> for PackedAccess<'de> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        let chunk = match self.chunks.next() {
            Some(chunk) => chunk,
            None => return Ok(None),
        };
        let value = match self.code {
            Code::Array(Element::Int8, _) => element(seed, i8::from_le_bytes(le(chunk))),
            Code::Array(Element::Int16, _) => element(seed, i16::from_le_bytes(le(chunk))),
            Code::Array(Element::Int32, _) => element(seed, i32::from_le_bytes(le(chunk))),
            Code::Array(Element::Int64, _) => element(seed, i64::from_le_bytes(le(chunk))),
            Code::Array(Element::Float32, _) => element(seed, f32::from_le_bytes(le(chunk))),
            Code::Array(Element::Float64, _) => element(seed, f64::from_le_bytes(le(chunk))),
            _ => element(seed, chunk[0]),
        }?;
        Ok(Some(value))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.chunks.len())
    }
}

/// Deserializes Rust values out of an owned [`Variable`].
pub struct VariableDeserializer {
    value: Variable,
}

impl VariableDeserializer {
    pub fn new(value: Variable) -> Self {
        VariableDeserializer { value }
    }
}

impl<'de> IntoDeserializer<'de, Error> for Variable {
    type Deserializer = VariableDeserializer;

    fn into_deserializer(self) -> VariableDeserializer {
        VariableDeserializer::new(self)
    }
}

impl<'de> de::Deserializer<'de> for VariableDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Variable::Null => visitor.visit_unit(),
            Variable::Boolean(b) => visitor.visit_bool(b),
            Variable::Int8(i) => visitor.visit_i8(i),
            Variable::Int16(i) => visitor.visit_i16(i),
            Variable::Int32(i) => visitor.visit_i32(i),
            Variable::Int64(i) => visitor.visit_i64(i),
            Variable::UInt8(u) => visitor.visit_u8(u),
            Variable::UInt16(u) => visitor.visit_u16(u),
            Variable::UInt32(u) => visitor.visit_u32(u),
            Variable::UInt64(u) => visitor.visit_u64(u),
            Variable::Float32(x) => visitor.visit_f32(x),
            Variable::Float64(x) => visitor.visit_f64(x),
            Variable::String(s) => visitor.visit_string(s),
            Variable::Array(items) => visitor.visit_seq(SeqDeserializer::new(items)),
            Variable::Map(map) => visitor.visit_map(MapDeserializer::new(map)),
            other => visitor.visit_string(other.value::<String>()?),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Variable::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Variable::Map(map) if map.len() == 1 => {
                let (variant, value) = map
                    .into_iter()
                    .next()
                    .ok_or(Error::Kind(ErrorKind::IncompatibleType))?;
                visitor.visit_enum(EnumDeserializer::new(variant, value))
            }
            other if other.is_string() => {
                let variant: String = other.value()?;
                visitor.visit_enum(variant.into_deserializer())
            }
            _ => Err(Error::Kind(ErrorKind::IncompatibleType)),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple tuple_struct map struct
        identifier ignored_any
    }
}

struct SeqDeserializer {
    iter: std::vec::IntoIter<Variable>,
}

impl SeqDeserializer {
    fn new(items: Vec<Variable>) -> Self {
        SeqDeserializer {
            iter: items.into_iter(),
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => seed.deserialize(VariableDeserializer::new(value)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct MapDeserializer {
    iter: indexmap::map::IntoIter<String, Variable>,
    value: Option<Variable>,
}

impl MapDeserializer {
    fn new(map: VariableMap) -> Self {
        MapDeserializer {
            iter: map.into_iter(),
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(VariableDeserializer::new(Variable::String(key)))
                    .map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(VariableDeserializer::new(value)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct EnumDeserializer {
    variant: String,
    value: Variable,
}

impl EnumDeserializer {
    fn new(variant: String, value: Variable) -> Self {
        EnumDeserializer { variant, value }
    }
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = VariableDeserializer;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, VariableDeserializer)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(VariableDeserializer::new(Variable::String(self.variant)))?;
        Ok((variant, VariableDeserializer::new(self.value)))
    }
}

impl<'de> de::VariantAccess<'de> for VariableDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.value {
            Variable::Null => Ok(()),
            _ => Err(Error::Kind(ErrorKind::IncompatibleType)),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        seed.deserialize(self)
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Variable::Array(items) => visitor.visit_seq(SeqDeserializer::new(items)),
            _ => Err(Error::Kind(ErrorKind::IncompatibleType)),
        }
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Variable::Map(map) => visitor.visit_map(MapDeserializer::new(map)),
            _ => Err(Error::Kind(ErrorKind::IncompatibleType)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::BTreeMap;

    fn from_bytes<'a, T: Deserialize<'a>>(input: &'a [u8]) -> Result<T> {
        let mut de = Deserializer::from_slice(input);
        let value = T::deserialize(&mut de)?;
        de.end()?;
        Ok(value)
    }

    #[derive(Deserialize, Debug, PartialEq)]
    enum Shape {
        Empty,
        Circle(u8),
        Line(u8, u8),
        Rect { w: u8 },
    }

    #[test]
    fn test_scalars_widen_and_check_range() {
        assert_eq!(from_bytes::<i64>(&[0x94, 0x07]).unwrap(), 7);
        assert_eq!(from_bytes::<f64>(&[0x98, 0x00, 0x00, 0xC0, 0x3F]).unwrap(), 1.5);
        assert!(from_bytes::<u8>(&[0x90, 0xFF]).is_err());
        assert_eq!(from_bytes::<Option<bool>>(&[0x80]).unwrap(), None);
        assert_eq!(from_bytes::<Option<bool>>(&[0x81]).unwrap(), Some(true));
    }

    #[test]
    fn test_borrowed_str_and_bytes() {
        let input = [0xB0, 0xA0, 0x02, b'h', b'i', 0xA4, 0x01, 0x09, 0xB1];
        let (text, raw): (&str, &[u8]) = from_bytes(&input).unwrap();
        assert_eq!(text, "hi");
        assert_eq!(raw, &[9]);
    }

    #[test]
    fn test_packed_arrays_fill_sequences() {
        let input = [0xC4, 0x04, 0x01, 0x00, 0xFF, 0xFF];
        assert_eq!(from_bytes::<Vec<i32>>(&input).unwrap(), vec![1, -1]);
        let blob = [0xA4, 0x02, 0x05, 0x06];
        assert_eq!(from_bytes::<Vec<u8>>(&blob).unwrap(), vec![5, 6]);
    }

    #[test]
    fn test_enums() {
        let unit = [0xA0, 0x05, b'E', b'm', b'p', b't', b'y'];
        assert_eq!(from_bytes::<Shape>(&unit).unwrap(), Shape::Empty);
        let newtype = [
            0xB4, 0x80, 0xA0, 0x06, b'C', b'i', b'r', b'c', b'l', b'e', 0x94, 0x09, 0xB5,
        ];
        assert_eq!(from_bytes::<Shape>(&newtype).unwrap(), Shape::Circle(9));
        let tuple = [
            0xB4, 0xA0, 0x04, b'L', b'i', b'n', b'e', 0xB0, 0x94, 0x01, 0x94, 0x02, 0xB1, 0xB5,
        ];
        assert_eq!(from_bytes::<Shape>(&tuple).unwrap(), Shape::Line(1, 2));
    }

    #[test]
    fn test_ignored_fields_are_skipped() {
        #[derive(Deserialize, Debug, PartialEq)]
        struct Only {
            keep: u8,
        }
        let input = [
            0xB4, 0x80, 0xA0, 0x04, b'd', b'r', b'o', b'p', 0xB2, 0x81, 0xB3, 0xA0, 0x04, b'k',
            b'e', b'e', b'p', 0x94, 0x02, 0xB5,
        ];
        assert_eq!(from_bytes::<Only>(&input).unwrap(), Only { keep: 2 });
    }

    #[test]
    fn test_errors() {
        let err = from_bytes::<Vec<u8>>(&[0xB2, 0x94, 0x01]).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::ExpectedEndArray));
        let err = from_bytes::<u8>(&[0x94, 0x01, 0x80]).unwrap_err();
        assert_eq!(err, Error::syntax(ErrorKind::UnexpectedToken, 2));
        let err = from_bytes::<u8>(&[]).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::UnexpectedEnd));
        let err = from_bytes::<BTreeMap<String, u8>>(&[0xB4, 0xA0, 0x00, 0xB5]).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::UnexpectedToken));
    }

    #[test]
    fn test_variable_deserializer() {
        let value = Variable::map([("Rect", Variable::map([("w", 3u8)]))]);
        let shape = Shape::deserialize(VariableDeserializer::new(value)).unwrap();
        assert_eq!(shape, Shape::Rect { w: 3 });

        let value = Variable::wide("Empty");
        let shape = Shape::deserialize(VariableDeserializer::new(value)).unwrap();
        assert_eq!(shape, Shape::Empty);

        let value = Variable::array([Variable::from(1u8), Variable::Null]);
        let pair: (u8, Option<u8>) = Deserialize::deserialize(VariableDeserializer::new(value)).unwrap();
        assert_eq!(pair, (1, None));
    }
}
