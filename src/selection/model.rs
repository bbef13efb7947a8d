use std::{collections::BTreeMap, fmt};

/// Selection fields summarized in image layer ids unless configured otherwise.
pub const DEFAULT_TRANSITION_FIELDS: [&str; 2] = ["t", "z"];

/// Owned copy of [`DEFAULT_TRANSITION_FIELDS`].
pub fn default_transition_fields() -> Vec<String> {
    DEFAULT_TRANSITION_FIELDS.iter().map(|f| f.to_string()).collect()
}

/// Index of one image plane along each named dimension (`channel`, `z`, `t`, ...).
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct PlaneSelection(BTreeMap<String, u32>);

impl PlaneSelection {
    /// Empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy with `label` set to `index`.
    pub fn with(mut self, label: impl Into<String>, index: u32) -> Self {
        self.0.insert(label.into(), index);
        self
    }

    /// Index selected along `label`, if any.
    pub fn get(&self, label: &str) -> Option<u32> {
        self.0.get(label).copied()
    }

    /// Iterate `(label, index)` pairs in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<K: Into<String>> FromIterator<(K, u32)> for PlaneSelection {
    fn from_iter<I: IntoIterator<Item = (K, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl fmt::Display for PlaneSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (label, index)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{label}={index}")?;
        }
        f.write_str("}")
    }
}

/// Ordered set of active planes, typically one per rendered channel.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct Selection(Vec<PlaneSelection>);

impl Selection {
    /// Build from planes.
    pub fn new(planes: Vec<PlaneSelection>) -> Self {
        Self(planes)
    }

    /// Active planes in order.
    pub fn planes(&self) -> &[PlaneSelection] {
        &self.0
    }

    /// Number of planes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return `true` when no plane is selected.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Layer id suffix summarizing this selection.
    ///
    /// Joins the first plane's value of every field, in the given order, each preceded by `-`.
    /// Missing fields contribute an empty segment; no fields yield an empty suffix.
    pub fn transition_suffix(&self, fields: &[String]) -> String {
        let first = self.0.first();
        fields
            .iter()
            .map(|field| {
                first
                    .and_then(|plane| plane.get(field))
                    .map(|v| v.to_string())
                    .unwrap_or_default()
            })
            .fold(String::new(), |mut acc, value| {
                acc.push('-');
                acc.push_str(&value);
                acc
            })
    }
}

impl From<Vec<PlaneSelection>> for Selection {
    fn from(planes: Vec<PlaneSelection>) -> Self {
        Self(planes)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/selection/model.rs"]
mod tests;
