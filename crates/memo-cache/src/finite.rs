//! Rejects results containing NaN or infinite floats.
//!
//! `serde_json` writes non-finite floats as `null`, so such a result would be
//! stored successfully and then fail to decode on every later hit. Walking the
//! value with a serializer that only inspects floats catches this before
//! anything reaches disk.

use serde::ser::{self, Serialize};
use std::fmt;

#[derive(Debug)]
pub(crate) struct NonFiniteFloat(String);

impl fmt::Display for NonFiniteFloat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for NonFiniteFloat {}

impl ser::Error for NonFiniteFloat {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self(msg.to_string())
    }
}

pub(crate) fn ensure_finite<T: Serialize + ?Sized>(value: &T) -> Result<(), NonFiniteFloat> {
    value.serialize(FloatCheck)
}

fn check(finite: bool, value: impl fmt::Display) -> Result<(), NonFiniteFloat> {
    if finite {
        Ok(())
    } else {
        Err(NonFiniteFloat(format!("{value} has no JSON representation")))
    }
}

struct FloatCheck;

macro_rules! accept_scalars {
    ($($method:ident($ty:ty)),* $(,)?) => {
        $(
            fn $method(self, _: $ty) -> Result<(), NonFiniteFloat> {
                Ok(())
            }
        )*
    };
}

impl ser::Serializer for FloatCheck {
    type Ok = ();
    type Error = NonFiniteFloat;
    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    accept_scalars! {
        serialize_bool(bool),
        serialize_i8(i8),
        serialize_i16(i16),
        serialize_i32(i32),
        serialize_i64(i64),
        serialize_i128(i128),
        serialize_u8(u8),
        serialize_u16(u16),
        serialize_u32(u32),
        serialize_u64(u64),
        serialize_u128(u128),
        serialize_char(char),
        serialize_str(&str),
        serialize_bytes(&[u8]),
        serialize_unit_struct(&'static str),
    }

    fn serialize_f32(self, v: f32) -> Result<(), NonFiniteFloat> {
        check(v.is_finite(), v)
    }

    fn serialize_f64(self, v: f64) -> Result<(), NonFiniteFloat> {
        check(v.is_finite(), v)
    }

    fn serialize_none(self) -> Result<(), NonFiniteFloat> {
        Ok(())
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<(), NonFiniteFloat> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<(), NonFiniteFloat> {
        Ok(())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
    ) -> Result<(), NonFiniteFloat> {
        Ok(())
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<(), NonFiniteFloat> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        value: &T,
    ) -> Result<(), NonFiniteFloat> {
        value.serialize(self)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self, NonFiniteFloat> {
        Ok(self)
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self, NonFiniteFloat> {
        Ok(self)
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self, NonFiniteFloat> {
        Ok(self)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self, NonFiniteFloat> {
        Ok(self)
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self, NonFiniteFloat> {
        Ok(self)
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self, NonFiniteFloat> {
        Ok(self)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self, NonFiniteFloat> {
        Ok(self)
    }
}

impl ser::SerializeSeq for FloatCheck {
    type Ok = ();
    type Error = NonFiniteFloat;

    fn serialize_element<T: Serialize + ?Sized>(
        &mut self,
        value: &T,
    ) -> Result<(), NonFiniteFloat> {
        value.serialize(FloatCheck)
    }

    fn end(self) -> Result<(), NonFiniteFloat> {
        Ok(())
    }
}

impl ser::SerializeTuple for FloatCheck {
    type Ok = ();
    type Error = NonFiniteFloat;

    fn serialize_element<T: Serialize + ?Sized>(
        &mut self,
        value: &T,
    ) -> Result<(), NonFiniteFloat> {
        value.serialize(FloatCheck)
    }

    fn end(self) -> Result<(), NonFiniteFloat> {
        Ok(())
    }
}

impl ser::SerializeTupleStruct for FloatCheck {
    type Ok = ();
    type Error = NonFiniteFloat;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        value: &T,
    ) -> Result<(), NonFiniteFloat> {
        value.serialize(FloatCheck)
    }

    fn end(self) -> Result<(), NonFiniteFloat> {
        Ok(())
    }
}

impl ser::SerializeTupleVariant for FloatCheck {
    type Ok = ();
    type Error = NonFiniteFloat;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        value: &T,
    ) -> Result<(), NonFiniteFloat> {
        value.serialize(FloatCheck)
    }

    fn end(self) -> Result<(), NonFiniteFloat> {
        Ok(())
    }
}

impl ser::SerializeMap for FloatCheck {
    type Ok = ();
    type Error = NonFiniteFloat;

    fn serialize_key<T: Serialize + ?Sized>(
        &mut self,
        key: &T,
    ) -> Result<(), NonFiniteFloat> {
        key.serialize(FloatCheck)
    }

    fn serialize_value<T: Serialize + ?Sized>(
        &mut self,
        value: &T,
    ) -> Result<(), NonFiniteFloat> {
        value.serialize(FloatCheck)
    }

    fn end(self) -> Result<(), NonFiniteFloat> {
        Ok(())
    }
}

impl ser::SerializeStruct for FloatCheck {
    type Ok = ();
    type Error = NonFiniteFloat;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        _key: &'static str,
        value: &T,
    ) -> Result<(), NonFiniteFloat> {
        value.serialize(FloatCheck)
    }

    fn end(self) -> Result<(), NonFiniteFloat> {
        Ok(())
    }
}

impl ser::SerializeStructVariant for FloatCheck {
    type Ok = ();
    type Error = NonFiniteFloat;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        _key: &'static str,
        value: &T,
    ) -> Result<(), NonFiniteFloat> {
        value.serialize(FloatCheck)
    }

    fn end(self) -> Result<(), NonFiniteFloat> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn finite_values_pass() {
        ensure_finite(&1.5_f64).unwrap();
        ensure_finite(&vec![Some(0.0_f32), None]).unwrap();
        ensure_finite(&serde_json::json!({"a": [1, 2.5, null, "x"]})).unwrap();
    }

    #[test]
    fn nested_non_finite_floats_are_rejected() {
        assert!(ensure_finite(&f64::NAN).is_err());
        assert!(ensure_finite(&Some(f64::INFINITY)).is_err());
        assert!(ensure_finite(&(1, vec![f32::NEG_INFINITY])).is_err());

        let mut map = BTreeMap::new();
        map.insert("ratio".to_string(), f64::NAN);
        let err = ensure_finite(&map).unwrap_err();
        assert_eq!(err.to_string(), "NaN has no JSON representation");
    }
}
