//! Dense index mapping for domain entities.

use std::collections::HashMap;
use std::hash::Hash;

/// Bidirectional mapping between entities and dense zero-based indices.
///
/// Indices follow the order of the collection the indexer was built from and
/// stay fixed for the indexer's lifetime, so array-backed solver state can
/// refer to entities by position.
///
/// # Examples
///
/// ```
/// use u_timetable::model::Indexer;
///
/// let idx = Indexer::new(vec!["a", "b", "c"]).unwrap();
/// assert_eq!(idx.index_of(&"b"), Some(1));
/// assert_eq!(idx.value_of(2), Some(&"c"));
/// assert_eq!(idx.index_of(&"z"), None);
/// ```
#[derive(Debug, Clone)]
pub struct Indexer<V> {
    values: Vec<V>,
    indices: HashMap<V, usize>,
}

impl<V: Eq + Hash + Clone> Indexer<V> {
    /// Builds an indexer from an ordered collection.
    ///
    /// Returns the first repeated value as `Err` if the collection contains
    /// duplicates.
    pub fn new(values: impl IntoIterator<Item = V>) -> Result<Self, V> {
        let values: Vec<V> = values.into_iter().collect();
        let mut indices = HashMap::with_capacity(values.len());
        for (i, value) in values.iter().enumerate() {
            if indices.insert(value.clone(), i).is_some() {
                return Err(value.clone());
            }
        }
        Ok(Self { values, indices })
    }

    /// Index of `value`, or `None` if it was not part of the collection.
    pub fn index_of(&self, value: &V) -> Option<usize> {
        self.indices.get(value).copied()
    }

    /// Entity at `index`, or `None` if out of range.
    pub fn value_of(&self, index: usize) -> Option<&V> {
        self.values.get(index)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Entities in index order.
    pub fn values(&self) -> &[V] {
        &self.values
    }
}
