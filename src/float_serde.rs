//! Serde field helpers that keep non-finite floats in text formats
//!
//! JSON has no literal for NaN or infinity and serde_json writes them as
//! `null`, which cannot be read back into a float. In human-readable formats
//! these helpers write the strings `"NaN"`, `"Infinity"` and `"-Infinity"`
//! instead. Binary formats keep the plain float encoding.

use num_traits::{Float, NumCast};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;

const NAN: &str = "NaN";
const INFINITY: &str = "Infinity";
const NEG_INFINITY: &str = "-Infinity";

/// A float written as a number when finite and as a string otherwise
struct TextFloat<T>(T);

impl<T: Float + Serialize> Serialize for TextFloat<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let value = self.0;
        if value.is_nan() {
            serializer.serialize_str(NAN)
        } else if value.is_infinite() && value.is_sign_positive() {
            serializer.serialize_str(INFINITY)
        } else if value.is_infinite() {
            serializer.serialize_str(NEG_INFINITY)
        } else {
            value.serialize(serializer)
        }
    }
}

struct TextFloatVisitor<T>(PhantomData<T>);

impl<T: Float> TextFloatVisitor<T> {
    fn cast<N, E>(&self, value: N) -> Result<T, E>
    where
        N: NumCast + fmt::Display + Copy,
        E: de::Error,
    {
        <T as NumCast>::from(value).ok_or_else(|| E::custom(format!("{} is out of range", value)))
    }
}

impl<'de, T: Float> Visitor<'de> for TextFloatVisitor<T> {
    type Value = T;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a number or one of \"NaN\", \"Infinity\", \"-Infinity\"")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<T, E> {
        self.cast(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<T, E> {
        self.cast(v)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<T, E> {
        self.cast(v)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<T, E> {
        match v {
            NAN => Ok(T::nan()),
            INFINITY => Ok(T::infinity()),
            NEG_INFINITY => Ok(T::neg_infinity()),
            other => Err(E::invalid_value(de::Unexpected::Str(other), &self)),
        }
    }
}

impl<'de, T: Float> Deserialize<'de> for TextFloat<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer
            .deserialize_any(TextFloatVisitor(PhantomData))
            .map(TextFloat)
    }
}

/// `#[serde(with = "...")]` for `Vec<f32>` / `Vec<f64>` fields
pub mod vec {
    use super::TextFloat;
    use num_traits::Float;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[allow(clippy::ptr_arg)]
    pub fn serialize<S, T>(values: &Vec<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Float + Serialize,
    {
        if !serializer.is_human_readable() {
            return values.serialize(serializer);
        }
        serializer.collect_seq(values.iter().map(|v| TextFloat(*v)))
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Float + Deserialize<'de>,
    {
        if !deserializer.is_human_readable() {
            return Vec::deserialize(deserializer);
        }
        let values = Vec::<TextFloat<T>>::deserialize(deserializer)?;
        Ok(values.into_iter().map(|v| v.0).collect())
    }
}

/// `#[serde(with = "...")]` for `ArrayD<f32>` / `ArrayD<f64>` fields
///
/// Human-readable output is `{"dim": [...], "data": [...]}` with the data in
/// row-major order.
pub mod array {
    use super::TextFloat;
    use ndarray::{ArrayD, IxDyn};
    use num_traits::Float;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Shaped<V> {
        dim: Vec<usize>,
        data: Vec<V>,
    }

    pub fn serialize<S, T>(array: &ArrayD<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Float + Serialize,
    {
        if !serializer.is_human_readable() {
            return array.serialize(serializer);
        }
        Shaped {
            dim: array.shape().to_vec(),
            data: array.iter().map(|v| TextFloat(*v)).collect(),
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<ArrayD<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Float + Deserialize<'de>,
    {
        if !deserializer.is_human_readable() {
            return ArrayD::deserialize(deserializer);
        }
        let shaped = Shaped::<TextFloat<T>>::deserialize(deserializer)?;
        let data = shaped.data.into_iter().map(|v| v.0).collect();
        ArrayD::from_shape_vec(IxDyn(&shaped.dim), data).map_err(de::Error::custom)
    }
}
