use derive_more::{Display, From};

use crate::{attribute::Number, node::Variable};

/// The attributes holding no-data values. The position of the attribute in this list is the bit set in the [`NodataRole`].
pub const NODATA_ATTRIBUTES: [&str; 2] = ["_FillValue", "missing_value"];

/// The role of a no-data value.
#[derive(Clone, Debug, PartialEq, Eq, Display, From)]
pub enum NodataRole {
    /// A bitmask: bit 0 is set for pad (fill) values, which can be used as background. Bit 1 is set for missing values.
    #[display("{_0:#04b}")]
    Mask(u32),
    /// A textual description of the value.
    #[display("{_0}")]
    Description(String),
}

impl NodataRole {
    /// The bit of pad (fill) values.
    pub const PAD: u32 = 1;

    /// The bit of missing values.
    pub const MISSING: u32 = 2;

    /// Return the bitmask, or [`None`] for a description.
    #[must_use]
    pub const fn mask(&self) -> Option<u32> {
        match self {
            Self::Mask(mask) => Some(*mask),
            Self::Description(_) => None,
        }
    }
}

/// No-data values of a variable, in insertion order.
///
/// Keys are compared with their kind: `Number::Short(-1)` and `Number::Int(-1)` are distinct keys.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodataValues(Vec<(Number, NodataRole)>);

impl NodataValues {
    /// Create an empty set of no-data values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the role of `value`, or [`None`] if it is not a no-data value.
    #[must_use]
    pub fn get(&self, value: &Number) -> Option<&NodataRole> {
        self.0
            .iter()
            .find_map(|(key, role)| (key == value).then_some(role))
    }

    /// Add `mask` to the role of `value`, inserting `value` at the end if absent.
    ///
    /// A description is replaced by the mask.
    pub fn merge(&mut self, value: Number, mask: u32) {
        match self.0.iter_mut().find(|(key, _)| *key == value) {
            Some((_, role)) => {
                *role = NodataRole::Mask(role.mask().unwrap_or(0) | mask);
            }
            None => self.0.push((value, NodataRole::Mask(mask))),
        }
    }

    /// Set the role of `value`, inserting `value` at the end if absent.
    pub fn insert(&mut self, value: Number, role: NodataRole) {
        match self.0.iter_mut().find(|(key, _)| *key == value) {
            Some((_, existing)) => *existing = role,
            None => self.0.push((value, role)),
        }
    }

    /// Return an iterator over the values and their roles, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Number, &NodataRole)> {
        self.0.iter().map(|(value, role)| (value, role))
    }

    /// Return the number of no-data values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return true if there are no no-data values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Collect the no-data values of `variable` from the [`NODATA_ATTRIBUTES`].
pub(crate) fn nodata_values_of(variable: &dyn Variable) -> NodataValues {
    let mut values = NodataValues::new();
    for (bit, attribute) in NODATA_ATTRIBUTES.iter().enumerate() {
        for value in variable.numeric_attribute_values(attribute) {
            values.merge(value, 1 << bit);
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nodata_values_merge() {
        let mut values = NodataValues::new();
        values.merge(Number::Short(-999), NodataRole::PAD);
        values.merge(Number::Short(-1), NodataRole::MISSING);
        values.merge(Number::Short(-999), NodataRole::MISSING);
        values.merge(Number::Int(-1), NodataRole::PAD);
        assert_eq!(values.len(), 3);
        assert_eq!(values.get(&Number::Short(-999)), Some(&NodataRole::Mask(0b11)));
        assert_eq!(values.get(&Number::Int(-1)), Some(&NodataRole::Mask(0b01)));
        let keys: Vec<_> = values.iter().map(|(value, _)| *value).collect();
        assert_eq!(
            keys,
            vec![Number::Short(-999), Number::Short(-1), Number::Int(-1)]
        );
        values.insert(Number::Short(-1), "no measurement".to_string().into());
        assert_eq!(values.get(&Number::Short(-1)).unwrap().mask(), None);
        assert_eq!(NodataRole::Mask(3).to_string(), "0b11");
    }
}
