//! Token stream to [`Variable`].

use super::token::{Code, Element};
use super::Reader;
use crate::{Error, ErrorKind, Result, Variable, VariableMap};
use log::trace;

/// Reads one complete value starting at the reader's current token and
/// leaves the reader on the token that follows it.
///
/// Records become arrays, binary blobs and packed arrays become arrays of
/// numbers, and extended reals are narrowed to `Float64`. Map keys must be
/// strings.
///
/// # Errors
///
/// Any error token the reader reaches, [`ErrorKind::UnexpectedEnd`] if the
/// stream holds no value, [`ErrorKind::UnexpectedToken`] for a stray close
/// or a key without a value, and [`ErrorKind::IncompatibleType`] for a
/// non-string key.
///
/// # Examples
///
/// ```rust
/// use bintoken::bintoken::{parse, Reader};
/// use bintoken::Variable;
///
/// let input = [0xB4, 0x80, 0xA0, 0x01, b'k', 0xB2, 0x81, 0x94, 0x02, 0xB3, 0xB5];
/// let mut reader = Reader::new(&input);
/// let value = parse(&mut reader).unwrap();
/// assert_eq!(value["k"], Variable::array([Variable::from(true), Variable::from(2u8)]));
/// assert!(reader.code().error().is_none());
/// ```
pub fn parse(reader: &mut Reader<'_>) -> Result<Variable> {
    reader.check()?;
    let code = reader.code();
    trace!("parse {:?} at level {}", code, reader.level());
    let value = match code {
        Code::End => return Err(Error::syntax(ErrorKind::UnexpectedEnd, reader.offset())),
        Code::Null => Variable::Null,
        Code::True => Variable::Boolean(true),
        Code::False => Variable::Boolean(false),
        Code::Int8 => Variable::Int8(reader.value()?),
        Code::Int16 => Variable::Int16(reader.value()?),
        Code::Int32 => Variable::Int32(reader.value()?),
        Code::Int64 => Variable::Int64(reader.value()?),
        Code::UInt8 => Variable::UInt8(reader.value()?),
        Code::UInt16 => Variable::UInt16(reader.value()?),
        Code::UInt32 => Variable::UInt32(reader.value()?),
        Code::UInt64 => Variable::UInt64(reader.value()?),
        Code::Float32 => Variable::Float32(reader.value()?),
        Code::Float64 | Code::Float128 => Variable::Float64(reader.value()?),
        Code::String(_) => Variable::String(reader.value()?),
        Code::Binary(_) => Variable::array(reader.value::<&[u8]>()?.iter().copied()),
        Code::Array(element, _) => packed(reader, element)?,
        Code::BeginArray | Code::BeginRecord => {
            let close = code.closer().unwrap_or(Code::EndArray);
            let mut items = Vec::new();
            reader.try_next()?;
            while reader.code() != close {
                items.push(parse(reader)?);
            }
            Variable::Array(items)
        }
        Code::BeginAssocArray => {
            let mut map = VariableMap::new();
            reader.try_next()?;
            while reader.code() != Code::EndAssocArray {
                let key = match reader.code() {
                    Code::String(_) => reader.value::<String>()?,
                    _ => {
                        return Err(Error::syntax(
                            ErrorKind::IncompatibleType,
                            reader.offset(),
                        ))
                    }
                };
                reader.try_next()?;
                if reader.code() == Code::EndAssocArray {
                    return Err(Error::syntax(ErrorKind::UnexpectedToken, reader.offset()));
                }
                map.insert(key, parse(reader)?);
            }
            Variable::Map(map)
        }
        Code::EndArray | Code::EndRecord | Code::EndAssocArray => {
            return Err(Error::syntax(ErrorKind::UnexpectedToken, reader.offset()))
        }
        Code::Error(kind) => return Err(Error::syntax(kind, reader.offset())),
    };
    reader.try_next()?;
    Ok(value)
}

fn packed(reader: &Reader<'_>, element: Element) -> Result<Variable> {
    let value = match element {
        Element::Int8 => Variable::array(reader.value::<Vec<i8>>()?),
        Element::Int16 => Variable::array(reader.value::<Vec<i16>>()?),
        Element::Int32 => Variable::array(reader.value::<Vec<i32>>()?),
        Element::Int64 => Variable::array(reader.value::<Vec<i64>>()?),
        Element::Float32 => Variable::array(reader.value::<Vec<f32>>()?),
        Element::Float64 => Variable::array(reader.value::<Vec<f64>>()?),
    };
    Ok(value)
}
