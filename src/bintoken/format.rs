//! [`Variable`] to token stream.

use super::Writer;
use crate::buffer::Buffer;
use crate::{Result, Variable};

/// Writes `value` depth-first: array elements in index order, map entries in
/// insertion order. Every scalar keeps its exact width; strings of any
/// character width are written as UTF-8.
///
/// # Errors
///
/// [`ErrorKind::InvalidValue`](crate::ErrorKind::InvalidValue) for a UTF-16 string with unpaired
/// surrogates, [`ErrorKind::DepthExceeded`](crate::ErrorKind::DepthExceeded) when nesting goes past the
/// writer's `max_depth`, and any error from the writer.
///
/// # Examples
///
/// ```rust
/// use bintoken::bintoken::{format, Writer};
/// use bintoken::Variable;
///
/// let mut writer = Writer::new(Vec::new());
/// format(&mut writer, &Variable::array([1u8, 2u8])).unwrap();
/// assert_eq!(writer.into_inner(), vec![0xB2, 0x94, 0x01, 0x94, 0x02, 0xB3]);
/// ```
pub fn format<B: Buffer>(writer: &mut Writer<B>, value: &Variable) -> Result<()> {
    match value {
        Variable::Null => writer.null()?,
        Variable::Boolean(b) => writer.value(b)?,
        Variable::Int8(i) => writer.value(i)?,
        Variable::Int16(i) => writer.value(i)?,
        Variable::Int32(i) => writer.value(i)?,
        Variable::Int64(i) => writer.value(i)?,
        Variable::UInt8(u) => writer.value(u)?,
        Variable::UInt16(u) => writer.value(u)?,
        Variable::UInt32(u) => writer.value(u)?,
        Variable::UInt64(u) => writer.value(u)?,
        Variable::Float32(x) => writer.value(x)?,
        Variable::Float64(x) => writer.value(x)?,
        Variable::String(s) => writer.value(s.as_str())?,
        Variable::WString(_) | Variable::U16String(_) | Variable::U32String(_) => {
            let text: String = value.value()?;
            writer.value(text.as_str())?
        }
        Variable::Array(items) => {
            writer.begin_array()?;
            for item in items {
                format(writer, item)?;
            }
            writer.end_array()?
        }
        Variable::Map(map) => {
            writer.begin_assoc_array()?;
            for (key, item) in map {
                writer.value(key.as_str())?;
                format(writer, item)?;
            }
            writer.end_assoc_array()?
        }
    };
    Ok(())
}
