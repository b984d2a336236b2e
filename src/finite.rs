//! Rejects floats that JSON cannot carry.
//!
//! serde_json writes `NaN` and the infinities as `null`, which would log a
//! different value from the one the handler produced. [`ensure_finite`] walks
//! a value through a serializer that only inspects floats and fails on the
//! first non-finite one.

use serde::ser::{self, Serialize};

use crate::error::LoggerError;

/// Fails with [`LoggerError::Serialization`] if `value` contains a
/// non-finite `f32` or `f64` anywhere in its tree.
pub(crate) fn ensure_finite<T>(value: &T) -> Result<(), LoggerError>
where
    T: Serialize + ?Sized,
{
    value.serialize(FiniteFloats)
}

impl ser::Error for LoggerError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        LoggerError::serialization(msg.to_string())
    }
}

#[derive(Clone, Copy)]
struct FiniteFloats;

impl FiniteFloats {
    fn check(v: f64) -> Result<(), LoggerError> {
        if v.is_finite() {
            Ok(())
        } else {
            Err(LoggerError::serialization(format!(
                "non-finite float {} cannot be represented as JSON",
                v
            )))
        }
    }
}

type Done = Result<(), LoggerError>;

impl ser::Serializer for FiniteFloats {
    type Ok = ();
    type Error = LoggerError;
    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    fn serialize_bool(self, _v: bool) -> Done {
        Ok(())
    }

    fn serialize_i8(self, _v: i8) -> Done {
        Ok(())
    }

    fn serialize_i16(self, _v: i16) -> Done {
        Ok(())
    }

    fn serialize_i32(self, _v: i32) -> Done {
        Ok(())
    }

    fn serialize_i64(self, _v: i64) -> Done {
        Ok(())
    }

    fn serialize_i128(self, _v: i128) -> Done {
        Ok(())
    }

    fn serialize_u8(self, _v: u8) -> Done {
        Ok(())
    }

    fn serialize_u16(self, _v: u16) -> Done {
        Ok(())
    }

    fn serialize_u32(self, _v: u32) -> Done {
        Ok(())
    }

    fn serialize_u64(self, _v: u64) -> Done {
        Ok(())
    }

    fn serialize_u128(self, _v: u128) -> Done {
        Ok(())
    }

    fn serialize_f32(self, v: f32) -> Done {
        Self::check(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> Done {
        Self::check(v)
    }

    fn serialize_char(self, _v: char) -> Done {
        Ok(())
    }

    fn serialize_str(self, _v: &str) -> Done {
        Ok(())
    }

    fn serialize_bytes(self, _v: &[u8]) -> Done {
        Ok(())
    }

    fn serialize_none(self) -> Done {
        Ok(())
    }

    fn serialize_some<T>(self, value: &T) -> Done
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Done {
        Ok(())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Done {
        Ok(())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Done {
        Ok(())
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Done
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        value: &T,
    ) -> Done
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self, LoggerError> {
        Ok(self)
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self, LoggerError> {
        Ok(self)
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self, LoggerError> {
        Ok(self)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self, LoggerError> {
        Ok(self)
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self, LoggerError> {
        Ok(self)
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self, LoggerError> {
        Ok(self)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self, LoggerError> {
        Ok(self)
    }
}

impl ser::SerializeSeq for FiniteFloats {
    type Ok = ();
    type Error = LoggerError;

    fn serialize_element<T>(&mut self, value: &T) -> Done
    where
        T: ?Sized + Serialize,
    {
        value.serialize(FiniteFloats)
    }

    fn end(self) -> Done {
        Ok(())
    }
}

impl ser::SerializeTuple for FiniteFloats {
    type Ok = ();
    type Error = LoggerError;

    fn serialize_element<T>(&mut self, value: &T) -> Done
    where
        T: ?Sized + Serialize,
    {
        value.serialize(FiniteFloats)
    }

    fn end(self) -> Done {
        Ok(())
    }
}

impl ser::SerializeTupleStruct for FiniteFloats {
    type Ok = ();
    type Error = LoggerError;

    fn serialize_field<T>(&mut self, value: &T) -> Done
    where
        T: ?Sized + Serialize,
    {
        value.serialize(FiniteFloats)
    }

    fn end(self) -> Done {
        Ok(())
    }
}

impl ser::SerializeTupleVariant for FiniteFloats {
    type Ok = ();
    type Error = LoggerError;

    fn serialize_field<T>(&mut self, value: &T) -> Done
    where
        T: ?Sized + Serialize,
    {
        value.serialize(FiniteFloats)
    }

    fn end(self) -> Done {
        Ok(())
    }
}

impl ser::SerializeMap for FiniteFloats {
    type Ok = ();
    type Error = LoggerError;

    fn serialize_key<T>(&mut self, key: &T) -> Done
    where
        T: ?Sized + Serialize,
    {
        key.serialize(FiniteFloats)
    }

    fn serialize_value<T>(&mut self, value: &T) -> Done
    where
        T: ?Sized + Serialize,
    {
        value.serialize(FiniteFloats)
    }

    fn end(self) -> Done {
        Ok(())
    }
}

impl ser::SerializeStruct for FiniteFloats {
    type Ok = ();
    type Error = LoggerError;

    fn serialize_field<T>(&mut self, _key: &'static str, value: &T) -> Done
    where
        T: ?Sized + Serialize,
    {
        value.serialize(FiniteFloats)
    }

    fn end(self) -> Done {
        Ok(())
    }
}

impl ser::SerializeStructVariant for FiniteFloats {
    type Ok = ();
    type Error = LoggerError;

    fn serialize_field<T>(&mut self, _key: &'static str, value: &T) -> Done
    where
        T: ?Sized + Serialize,
    {
        value.serialize(FiniteFloats)
    }

    fn end(self) -> Done {
        Ok(())
    }
}
