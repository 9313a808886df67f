/// A read-only list of (key, value) entries, e.g. the slices of a pie.
pub trait SliceDataset {
    fn item_count(&self) -> usize;

    fn key(&self, item: usize) -> &str;

    fn value(&self, item: usize) -> Option<f64>;

    fn index_of(&self, key: &str) -> Option<usize> {
        (0..self.item_count()).find(|&i| self.key(i) == key)
    }

    fn value_for(&self, key: &str) -> Option<f64> {
        self.index_of(key).and_then(|i| self.value(i))
    }
}

/// In-memory slice dataset with unique keys in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefaultSliceDataset {
    entries: Vec<(String, Option<f64>)>,
}

impl DefaultSliceDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value for `key`, replacing it in place if the key exists and
    /// appending otherwise.
    pub fn set_value(&mut self, key: &str, value: impl Into<Option<f64>>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<Option<f64>> {
        let at = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(at).1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn entries(&self) -> &[(String, Option<f64>)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SliceDataset for DefaultSliceDataset {
    fn item_count(&self) -> usize {
        self.entries.len()
    }

    fn key(&self, item: usize) -> &str {
        &self.entries[item].0
    }

    fn value(&self, item: usize) -> Option<f64> {
        self.entries[item].1
    }
}
