//! Plain nested records fed into and derived from a tree.

use serde::{Deserialize, Serialize};

/// Caller-owned nested record: an arbitrary payload plus ordered children.
///
/// The payload is flattened on (de)serialization, so `{"id": 1, "children": [...]}`
/// maps onto `Model { data: Item { id: 1 }, children: vec![...] }`.
/// A missing `children` key reads as an empty list and an empty list is not written back.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Model<T> {
    #[serde(flatten)]
    pub data: T,
    #[serde(default = "Vec::new", skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Model<T>>,
}

impl<T> Model<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Model<T>>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

impl<T> From<T> for Model<T> {
    fn from(data: T) -> Self {
        Self::new(data)
    }
}
