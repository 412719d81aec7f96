//! CBOR encoding of property mappings
//!
//! Layout:
//! ```text
//! mapping := [ entry* ]                      insertion order
//! entry   := [ fmtid: bytes(16), pid: uint, value ]
//! value   := [ vt, payload ]                 payload is null when there is none
//!          | [ VT_VECTOR|vt, count, [ payload* ] ]          homogeneous vector
//!          | [ VT_VECTOR|VT_VARIANT, count, [ value* ] ]    anything else
//!          | [ VT_VECTOR|VT_UI1, bytes ]                    byte sequence
//! ```
//! The decoder reads exactly `count` elements and rejects a disagreeing
//! array. Tags it does not know decode to [`Variant::Unsupported`].

use serde_cbor::Value;
use thiserror::Error;
use tracing::trace;
use uuid::Uuid;
use wpd_core::{
    HResult, PropertyKey, PropertyValues, Tag, VarType, Variant, VariantCollection,
};

#[derive(Error, Debug)]
pub enum WireError {
    #[error("CBOR error: {0}")]
    Cbor(#[from] serde_cbor::Error),
    #[error("Malformed {0}")]
    Shape(&'static str),
    #[error("Invalid payload for {0}")]
    Payload(Tag),
    #[error("Value {value} out of range for {tag}")]
    OutOfRange { tag: Tag, value: i128 },
    #[error("Vector declares {expected} elements but carries {actual}")]
    CountMismatch { expected: usize, actual: usize },
    #[error("Invalid GUID: {0}")]
    InvalidGuid(#[from] uuid::Error),
}

pub fn encode_values(values: &PropertyValues) -> Result<Vec<u8>, WireError> {
    let entries = values
        .iter()
        .map(|(key, value)| {
            trace!(key = %key, tag = %value.tag(), "Encoding entry");
            Value::Array(vec![
                Value::Bytes(key.fmtid.as_bytes().to_vec()),
                Value::Integer(key.pid.into()),
                encode_variant(value),
            ])
        })
        .collect();
    Ok(serde_cbor::to_vec(&Value::Array(entries))?)
}

pub fn decode_values(bytes: &[u8]) -> Result<PropertyValues, WireError> {
    let root: Value = serde_cbor::from_slice(bytes)?;
    let Value::Array(entries) = root else {
        return Err(WireError::Shape("mapping"));
    };

    let mut values = PropertyValues::new();
    for entry in &entries {
        let (key, value) = decode_entry(entry)?;
        trace!(key = %key, tag = %value.tag(), "Decoded entry");
        values.set(key, value);
    }
    Ok(values)
}

fn decode_entry(entry: &Value) -> Result<(PropertyKey, Variant), WireError> {
    let Value::Array(parts) = entry else {
        return Err(WireError::Shape("entry"));
    };
    let [fmtid, pid, value] = parts.as_slice() else {
        return Err(WireError::Shape("entry"));
    };
    let fmtid = match fmtid {
        Value::Bytes(bytes) => Uuid::from_slice(bytes)?,
        _ => return Err(WireError::Shape("entry fmtid")),
    };
    let pid = match pid {
        Value::Integer(n) => u32::try_from(*n).map_err(|_| WireError::Shape("entry pid"))?,
        _ => return Err(WireError::Shape("entry pid")),
    };
    Ok((PropertyKey::new(fmtid, pid), decode_variant(value)?))
}

pub fn encode_variant(value: &Variant) -> Value {
    let tag = Value::Integer(value.tag().raw().into());
    match value {
        Variant::Vector(items) => {
            let count = Value::Integer(items.len() as i128);
            let elements = match items.element_type() {
                Some(_) => items.iter().map(encode_payload).collect(),
                None => items.iter().map(encode_variant).collect(),
            };
            Value::Array(vec![tag, count, Value::Array(elements)])
        }
        _ => Value::Array(vec![tag, encode_payload(value)]),
    }
}

fn encode_payload(value: &Variant) -> Value {
    match value {
        Variant::Empty | Variant::Null | Variant::Unsupported(_) => Value::Null,
        Variant::I1(v) => Value::Integer((*v).into()),
        Variant::UI1(v) => Value::Integer((*v).into()),
        Variant::I2(v) => Value::Integer((*v).into()),
        Variant::UI2(v) => Value::Integer((*v).into()),
        Variant::I4(v) | Variant::Int(v) => Value::Integer((*v).into()),
        Variant::UI4(v) | Variant::UInt(v) => Value::Integer((*v).into()),
        Variant::I8(v) => Value::Integer((*v).into()),
        Variant::UI8(v) => Value::Integer((*v).into()),
        Variant::R4(v) => Value::Float((*v).into()),
        Variant::R8(v) | Variant::Date(v) => Value::Float(*v),
        Variant::Bool(v) => Value::Bool(*v),
        Variant::Clsid(v) => Value::Bytes(v.as_bytes().to_vec()),
        Variant::LpStr(bytes) => {
            let end = bytes.iter().position(|b| *b == 0).unwrap_or(bytes.len());
            Value::Bytes(bytes[..end].to_vec())
        }
        Variant::LpWStr(_) => Value::Text(value.get_string().unwrap_or_default()),
        Variant::Bstr(wide) => Value::Text(String::from_utf16_lossy(wide)),
        Variant::Error(code) => Value::Integer(code.0.into()),
        Variant::Bytes(bytes) => Value::Bytes(bytes.clone()),
        Variant::Vector(_) => encode_variant(value),
    }
}

pub fn decode_variant(value: &Value) -> Result<Variant, WireError> {
    let Value::Array(parts) = value else {
        return Err(WireError::Shape("value"));
    };
    let raw = match parts.first() {
        Some(Value::Integer(n)) => u16::try_from(*n).map_err(|_| WireError::Shape("value tag"))?,
        _ => return Err(WireError::Shape("value tag")),
    };

    match (Tag::from_raw(raw), &parts[1..]) {
        (Tag::Unknown(raw), _) => Ok(Variant::Unsupported(raw)),
        (Tag::Scalar(vt), [payload]) => decode_scalar(vt, payload),
        (Tag::Scalar(vt), []) => decode_scalar(vt, &Value::Null),
        (Tag::Vector(VarType::UI1), [Value::Bytes(bytes)]) => Ok(Variant::Bytes(bytes.clone())),
        // A counted UI1 run folds into Bytes like the compact form, even when empty
        (Tag::Vector(VarType::UI1), [count, Value::Array(elements)]) => {
            let items = decode_vector(VarType::UI1, count, elements)?;
            Ok(Variant::Bytes(items.iter().map(Variant::get_u8).collect()))
        }
        (Tag::Vector(vt), [count, Value::Array(elements)]) => {
            decode_vector(vt, count, elements).map(Variant::from)
        }
        _ => Err(WireError::Shape("value")),
    }
}

fn decode_vector(vt: VarType, count: &Value, elements: &[Value]) -> Result<VariantCollection, WireError> {
    let expected = match count {
        Value::Integer(n) => usize::try_from(*n).map_err(|_| WireError::Shape("vector count"))?,
        _ => return Err(WireError::Shape("vector count")),
    };
    if expected != elements.len() {
        return Err(WireError::CountMismatch {
            expected,
            actual: elements.len(),
        });
    }

    let mut items = VariantCollection::with_capacity(expected);
    for element in elements {
        let item = match vt {
            VarType::Variant => decode_variant(element)?,
            _ => decode_scalar(vt, element)?,
        };
        items.push(item);
    }
    Ok(items)
}

fn decode_scalar(vt: VarType, payload: &Value) -> Result<Variant, WireError> {
    let tag = Tag::Scalar(vt);
    let value = match vt {
        VarType::Empty => Variant::Empty,
        VarType::Null => Variant::Null,
        VarType::I1 => Variant::I1(integer(tag, payload)?),
        VarType::UI1 => Variant::UI1(integer(tag, payload)?),
        VarType::I2 => Variant::I2(integer(tag, payload)?),
        VarType::UI2 => Variant::UI2(integer(tag, payload)?),
        VarType::I4 => Variant::I4(integer(tag, payload)?),
        VarType::UI4 => Variant::UI4(integer(tag, payload)?),
        VarType::Int => Variant::Int(integer(tag, payload)?),
        VarType::UInt => Variant::UInt(integer(tag, payload)?),
        VarType::I8 => Variant::I8(integer(tag, payload)?),
        VarType::UI8 => Variant::UI8(integer(tag, payload)?),
        VarType::R4 => Variant::R4(float(tag, payload)? as f32),
        VarType::R8 => Variant::R8(float(tag, payload)?),
        VarType::Date => Variant::Date(float(tag, payload)?),
        VarType::Bool => match payload {
            Value::Bool(v) => Variant::Bool(*v),
            _ => return Err(WireError::Payload(tag)),
        },
        VarType::Error => Variant::Error(HResult(integer(tag, payload)?)),
        VarType::Clsid => match payload {
            Value::Bytes(bytes) => Variant::Clsid(Uuid::from_slice(bytes)?),
            _ => return Err(WireError::Payload(tag)),
        },
        VarType::LpStr => match payload {
            Value::Bytes(bytes) => {
                let mut raw = bytes.clone();
                raw.push(0);
                Variant::LpStr(raw)
            }
            _ => return Err(WireError::Payload(tag)),
        },
        VarType::LpWStr => Variant::lpwstr(text(tag, payload)?),
        VarType::Bstr => Variant::bstr(text(tag, payload)?),
        VarType::Variant => return Err(WireError::Payload(tag)),
    };
    Ok(value)
}

fn integer<T: TryFrom<i128>>(tag: Tag, payload: &Value) -> Result<T, WireError> {
    match payload {
        Value::Integer(n) => T::try_from(*n).map_err(|_| WireError::OutOfRange { tag, value: *n }),
        _ => Err(WireError::Payload(tag)),
    }
}

fn float(tag: Tag, payload: &Value) -> Result<f64, WireError> {
    match payload {
        Value::Float(v) => Ok(*v),
        Value::Integer(n) => Ok(*n as f64),
        _ => Err(WireError::Payload(tag)),
    }
}

fn text(tag: Tag, payload: &Value) -> Result<&str, WireError> {
    match payload {
        Value::Text(s) => Ok(s),
        _ => Err(WireError::Payload(tag)),
    }
}
