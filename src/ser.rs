//! Serde serialization into binary tokens.
//!
//! ## Data model mapping
//!
//! | serde                         | tokens                                   |
//! |-------------------------------|------------------------------------------|
//! | `bool`, integers, floats      | scalar of the same width                 |
//! | `char`, `str`                 | string                                   |
//! | bytes                         | binary                                   |
//! | `None`, unit, unit struct     | null                                     |
//! | sequence                      | array                                    |
//! | tuple, tuple struct           | record                                   |
//! | map, struct                   | associative array                        |
//! | unit variant                  | string holding the variant name          |
//! | other variants                | one-entry associative array, name → body |
//!
//! Most callers use [`to_vec`](crate::to_vec); the [`Serializer`] can also
//! write into any [`Buffer`]:
//!
//! ```rust
//! use bintoken::buffer::SliceBuffer;
//! use bintoken::Serializer;
//! use serde::Serialize;
//!
//! let mut storage = [0u8; 16];
//! let mut serializer = Serializer::new(SliceBuffer::new(&mut storage));
//! (1u8, true).serialize(&mut serializer).unwrap();
//! assert_eq!(serializer.into_inner().as_slice(), &[0xB0, 0x94, 0x01, 0x81, 0xB1]);
//! ```

use crate::bintoken::Writer;
use crate::buffer::Buffer;
use crate::{Error, ErrorKind, Options, Result, Variable, VariableMap};
use serde::{ser, Serialize};

/// Serializes Rust values through a [`Writer`].
pub struct Serializer<B> {
    writer: Writer<B>,
}

impl<B: Buffer> Serializer<B> {
    pub fn new(buffer: B) -> Self {
        Self::with_options(buffer, Options::default())
    }

    pub fn with_options(buffer: B, options: Options) -> Self {
        Serializer {
            writer: Writer::with_options(buffer, options),
        }
    }

    pub fn into_inner(self) -> B {
        self.writer.into_inner()
    }

    /// Opens the one-entry associative array that wraps a non-unit variant.
    fn begin_variant(&mut self, variant: &'static str) -> Result<()> {
        self.writer.begin_assoc_array()?;
        self.writer.value(variant)?;
        Ok(())
    }
}

impl<'a, B: Buffer> ser::Serializer for &'a mut Serializer<B> {
    type Ok = ();
    type Error = Error;

    type SerializeSeq = Compound<'a, B>;
    type SerializeTuple = Compound<'a, B>;
    type SerializeTupleStruct = Compound<'a, B>;
    type SerializeTupleVariant = Compound<'a, B>;
    type SerializeMap = Compound<'a, B>;
    type SerializeStruct = Compound<'a, B>;
    type SerializeStructVariant = Compound<'a, B>;

    fn is_human_readable(&self) -> bool {
        false
    }

    fn serialize_bool(self, v: bool) -> Result<()> {
        self.writer.value(&v).map(drop)
    }

    fn serialize_i8(self, v: i8) -> Result<()> {
        self.writer.value(&v).map(drop)
    }

    fn serialize_i16(self, v: i16) -> Result<()> {
        self.writer.value(&v).map(drop)
    }

    fn serialize_i32(self, v: i32) -> Result<()> {
        self.writer.value(&v).map(drop)
    }

    fn serialize_i64(self, v: i64) -> Result<()> {
        self.writer.value(&v).map(drop)
    }

    fn serialize_u8(self, v: u8) -> Result<()> {
        self.writer.value(&v).map(drop)
    }

    fn serialize_u16(self, v: u16) -> Result<()> {
        self.writer.value(&v).map(drop)
    }

    fn serialize_u32(self, v: u32) -> Result<()> {
        self.writer.value(&v).map(drop)
    }

    fn serialize_u64(self, v: u64) -> Result<()> {
        self.writer.value(&v).map(drop)
    }

    fn serialize_f32(self, v: f32) -> Result<()> {
        self.writer.value(&v).map(drop)
    }

    fn serialize_f64(self, v: f64) -> Result<()> {
        self.writer.value(&v).map(drop)
    }

    fn serialize_char(self, v: char) -> Result<()> {
        self.writer.value(&v).map(drop)
    }

    fn serialize_str(self, v: &str) -> Result<()> {
        self.writer.value(v).map(drop)
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<()> {
        self.writer.value(v).map(drop)
    }

    fn serialize_none(self) -> Result<()> {
        self.writer.null().map(drop)
    }

    fn serialize_some<T>(self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<()> {
        self.writer.null().map(drop)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<()> {
        self.writer.null().map(drop)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<()> {
        self.writer.value(variant).map(drop)
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.begin_variant(variant)?;
        value.serialize(&mut *self)?;
        self.writer.end_assoc_array().map(drop)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        self.writer.begin_array()?;
        Ok(Compound { ser: self })
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        self.writer.begin_record()?;
        Ok(Compound { ser: self })
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        self.writer.begin_record()?;
        Ok(Compound { ser: self })
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        self.begin_variant(variant)?;
        self.writer.begin_record()?;
        Ok(Compound { ser: self })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        self.writer.begin_assoc_array()?;
        Ok(Compound { ser: self })
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        self.writer.begin_assoc_array()?;
        Ok(Compound { ser: self })
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        self.begin_variant(variant)?;
        self.writer.begin_assoc_array()?;
        Ok(Compound { ser: self })
    }
}

/// Serializes the members of an open container.
pub struct Compound<'a, B> {
    ser: &'a mut Serializer<B>,
}

impl<'a, B: Buffer> ser::SerializeSeq for Compound<'a, B> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(&mut *self.ser)
    }

    fn end(self) -> Result<()> {
        self.ser.writer.end_array().map(drop)
    }
}

impl<'a, B: Buffer> ser::SerializeTuple for Compound<'a, B> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(&mut *self.ser)
    }

    fn end(self) -> Result<()> {
        self.ser.writer.end_record().map(drop)
    }
}

impl<'a, B: Buffer> ser::SerializeTupleStruct for Compound<'a, B> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(&mut *self.ser)
    }

    fn end(self) -> Result<()> {
        self.ser.writer.end_record().map(drop)
    }
}

impl<'a, B: Buffer> ser::SerializeTupleVariant for Compound<'a, B> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(&mut *self.ser)
    }

    fn end(self) -> Result<()> {
        self.ser.writer.end_record()?;
        self.ser.writer.end_assoc_array().map(drop)
    }
}

impl<'a, B: Buffer> ser::SerializeMap for Compound<'a, B> {
    type Ok = ();
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        key.serialize(&mut *self.ser)
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(&mut *self.ser)
    }

    fn end(self) -> Result<()> {
        self.ser.writer.end_assoc_array().map(drop)
    }
}

impl<'a, B: Buffer> ser::SerializeStruct for Compound<'a, B> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.ser.writer.value(key)?;
        value.serialize(&mut *self.ser)
    }

    fn end(self) -> Result<()> {
        self.ser.writer.end_assoc_array().map(drop)
    }
}

impl<'a, B: Buffer> ser::SerializeStructVariant for Compound<'a, B> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.ser.writer.value(key)?;
        value.serialize(&mut *self.ser)
    }

    fn end(self) -> Result<()> {
        self.ser.writer.end_assoc_array()?;
        self.ser.writer.end_assoc_array().map(drop)
    }
}

/// Serializes Rust values straight into a [`Variable`], keeping every
/// scalar's width.
pub struct VariableSerializer;

pub struct SerializeVec {
    vec: Vec<Variable>,
    variant: Option<&'static str>,
}

pub struct SerializeMap {
    map: VariableMap,
    current_key: Option<String>,
    variant: Option<&'static str>,
}

fn wrap_variant(variant: Option<&'static str>, value: Variable) -> Variable {
    match variant {
        Some(name) => Variable::map([(name, value)]),
        None => value,
    }
}

impl ser::Serializer for VariableSerializer {
    type Ok = Variable;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeVec;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeMap;

    fn serialize_bool(self, v: bool) -> Result<Variable> {
        Ok(Variable::Boolean(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Variable> {
        Ok(Variable::Int8(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Variable> {
        Ok(Variable::Int16(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Variable> {
        Ok(Variable::Int32(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Variable> {
        Ok(Variable::Int64(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Variable> {
        Ok(Variable::UInt8(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Variable> {
        Ok(Variable::UInt16(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Variable> {
        Ok(Variable::UInt32(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Variable> {
        Ok(Variable::UInt64(v))
    }

    fn serialize_f32(self, v: f32) -> Result<Variable> {
        Ok(Variable::Float32(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Variable> {
        Ok(Variable::Float64(v))
    }

    fn serialize_char(self, v: char) -> Result<Variable> {
        Ok(Variable::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Variable> {
        Ok(Variable::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Variable> {
        Ok(Variable::array(v.iter().copied()))
    }

    fn serialize_none(self) -> Result<Variable> {
        Ok(Variable::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Variable>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Variable> {
        Ok(Variable::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Variable> {
        Ok(Variable::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Variable> {
        Ok(Variable::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Variable>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Variable>
    where
        T: ?Sized + Serialize,
    {
        Ok(wrap_variant(Some(variant), value.serialize(self)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len.unwrap_or(0), None))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, None))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, None))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, Some(variant)))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::new(None))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<SerializeMap> {
        Ok(SerializeMap::new(None))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<SerializeMap> {
        Ok(SerializeMap::new(Some(variant)))
    }
}

impl SerializeVec {
    fn new(capacity: usize, variant: Option<&'static str>) -> Self {
        SerializeVec {
            vec: Vec::with_capacity(capacity),
            variant,
        }
    }

    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.vec.push(value.serialize(VariableSerializer)?);
        Ok(())
    }

    fn finish(self) -> Variable {
        wrap_variant(self.variant, Variable::Array(self.vec))
    }
}

impl SerializeMap {
    fn new(variant: Option<&'static str>) -> Self {
        SerializeMap {
            map: VariableMap::new(),
            current_key: None,
            variant,
        }
    }

    fn finish(self) -> Variable {
        wrap_variant(self.variant, Variable::Map(self.map))
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Variable;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Variable> {
        Ok(self.finish())
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Variable;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Variable> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Variable;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Variable> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleVariant for SerializeVec {
    type Ok = Variable;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Variable> {
        Ok(self.finish())
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Variable;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = key.serialize(VariableSerializer)?;
        match key.text() {
            Some(text) => {
                self.current_key = Some(text.into_owned());
                Ok(())
            }
            None => Err(Error::Kind(ErrorKind::IncompatibleType)),
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.map.insert(key, value.serialize(VariableSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Variable> {
        Ok(self.finish())
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Variable;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map
            .insert(key.to_string(), value.serialize(VariableSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Variable> {
        Ok(self.finish())
    }
}

impl ser::SerializeStructVariant for SerializeMap {
    type Ok = Variable;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map
            .insert(key.to_string(), value.serialize(VariableSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Variable> {
        Ok(self.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use std::collections::BTreeMap;

    fn bytes<T: Serialize>(value: &T) -> Vec<u8> {
        let mut serializer = Serializer::new(Vec::new());
        value.serialize(&mut serializer).unwrap();
        serializer.into_inner()
    }

    #[derive(Serialize)]
    struct Point {
        x: i16,
        y: i16,
    }

    #[derive(Serialize)]
    enum Shape {
        Empty,
        Circle(u8),
        Line(u8, u8),
        Rect { w: u8 },
    }

    #[test]
    fn test_struct_is_assoc_array() {
        assert_eq!(
            bytes(&Point { x: 1, y: -1 }),
            vec![
                0xB4, 0x80, 0xA0, 0x01, b'x', 0x91, 0x01, 0x00, 0xA0, 0x01, b'y', 0x91, 0xFF,
                0xFF, 0xB5
            ]
        );
    }

    #[test]
    fn test_option_and_unit() {
        assert_eq!(bytes(&None::<u8>), vec![0x80]);
        assert_eq!(bytes(&Some(3u8)), vec![0x94, 0x03]);
        assert_eq!(bytes(&()), vec![0x80]);
    }

    #[test]
    fn test_sequences_and_tuples() {
        assert_eq!(bytes(&vec![true, false]), vec![0xB2, 0x81, 0x82, 0xB3]);
        assert_eq!(bytes(&('a', 2u8)), vec![0xB0, 0xA0, 0x01, b'a', 0x94, 0x02, 0xB1]);
    }

    #[test]
    fn test_enum_variants() {
        assert_eq!(bytes(&Shape::Empty), vec![0xA0, 0x05, b'E', b'm', b'p', b't', b'y']);
        assert_eq!(
            bytes(&Shape::Circle(9)),
            vec![0xB4, 0x80, 0xA0, 0x06, b'C', b'i', b'r', b'c', b'l', b'e', 0x94, 0x09, 0xB5]
        );
        assert_eq!(
            bytes(&Shape::Line(1, 2)),
            vec![
                0xB4, 0x80, 0xA0, 0x04, b'L', b'i', b'n', b'e', 0xB0, 0x94, 0x01, 0x94, 0x02,
                0xB1, 0xB5
            ]
        );
        assert_eq!(
            bytes(&Shape::Rect { w: 4 }),
            vec![
                0xB4, 0x80, 0xA0, 0x04, b'R', b'e', b'c', b't', 0xB4, 0x80, 0xA0, 0x01, b'w',
                0x94, 0x04, 0xB5, 0xB5
            ]
        );
    }

    #[test]
    fn test_map_keys_any_scalar() {
        let mut map = BTreeMap::new();
        map.insert(1u8, "one");
        assert_eq!(
            bytes(&map),
            vec![0xB4, 0x80, 0x94, 0x01, 0xA0, 0x03, b'o', b'n', b'e', 0xB5]
        );
    }

    #[test]
    fn test_variable_serializer() {
        let value = Point { x: 3, y: 4 }.serialize(VariableSerializer).unwrap();
        assert_eq!(value, Variable::map([("x", 3i16), ("y", 4i16)]));
        assert_eq!(value["x"].kind(), crate::Kind::Int16);

        let value = Shape::Line(1, 2).serialize(VariableSerializer).unwrap();
        assert_eq!(value, Variable::map([("Line", Variable::array([1u8, 2u8]))]));

        let mut map = BTreeMap::new();
        map.insert(1u8, 2u8);
        let err = map.serialize(VariableSerializer).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::IncompatibleType));
    }
}
