use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::CoreError;

/// One field of a raw snapshot record.
///
/// A value of the wrong JSON type is kept as `Invalid` instead of failing
/// the whole document, so only the views that read the field fail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawField<T> {
    Valid(T),
    Invalid(Value),
}

impl<T> RawField<T> {
    pub fn as_valid(&self) -> Option<&T> {
        match self {
            RawField::Valid(v) => Some(v),
            RawField::Invalid(_) => None,
        }
    }
}

impl<T> From<T> for RawField<T> {
    fn from(value: T) -> Self {
        RawField::Valid(value)
    }
}

/// Reads typed fields out of one raw record, naming the record in errors.
#[derive(Debug, Clone, Copy)]
pub struct FieldReader<'a> {
    record: &'a str,
    index: usize,
}

impl<'a> FieldReader<'a> {
    pub fn new(record: &'a str, index: usize) -> Self {
        Self { record, index }
    }

    /// `None` when absent or null; `MalformedRecord` when mistyped.
    pub fn optional<T: Clone>(
        &self,
        name: &str,
        field: &Option<RawField<T>>,
    ) -> Result<Option<T>, CoreError> {
        match field {
            None => Ok(None),
            Some(RawField::Valid(v)) => Ok(Some(v.clone())),
            Some(RawField::Invalid(v)) => Err(self.invalid(name, v)),
        }
    }

    pub fn required<T: Clone>(
        &self,
        name: &str,
        field: &Option<RawField<T>>,
    ) -> Result<T, CoreError> {
        self.optional(name, field)?
            .ok_or_else(|| CoreError::missing_field(self.record, self.index, name))
    }

    /// Like [`optional`](Self::optional) for counts: a float with no
    /// fractional part (`50.0`) is taken as the whole number it spells.
    pub fn whole_number<T>(
        &self,
        name: &str,
        field: &Option<RawField<T>>,
    ) -> Result<Option<T>, CoreError>
    where
        T: Clone + TryFrom<u64>,
    {
        match field {
            Some(RawField::Invalid(value)) => value
                .as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f < u64::MAX as f64)
                .and_then(|f| T::try_from(f as u64).ok())
                .map(Some)
                .ok_or_else(|| self.invalid(name, value)),
            other => self.optional(name, other),
        }
    }

    fn invalid(&self, name: &str, value: &Value) -> CoreError {
        CoreError::invalid_field(self.record, self.index, name, value)
    }
}
