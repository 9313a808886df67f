use std::collections::BTreeMap;

/// Assigns row keys to named groups for partitioned stacking.
///
/// Keys without an explicit mapping belong to the default group. Group
/// indices run default group first, then the other groups in the order they
/// were first mapped.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyToGroupMap {
    default_group: String,
    groups: Vec<String>,
    key_to_group: BTreeMap<String, String>,
}

impl Default for KeyToGroupMap {
    fn default() -> Self {
        KeyToGroupMap::new("Default Group")
    }
}

impl KeyToGroupMap {
    pub fn new(default_group: impl Into<String>) -> Self {
        KeyToGroupMap {
            default_group: default_group.into(),
            groups: Vec::new(),
            key_to_group: BTreeMap::new(),
        }
    }

    pub fn default_group(&self) -> &str {
        &self.default_group
    }

    pub fn group_count(&self) -> usize {
        self.groups.len() + 1
    }

    /// All groups, default first.
    pub fn groups(&self) -> Vec<&str> {
        std::iter::once(self.default_group.as_str())
            .chain(self.groups.iter().map(|g| g.as_str()))
            .collect()
    }

    pub fn group_index(&self, group: &str) -> Option<usize> {
        if group == self.default_group {
            return Some(0);
        }
        self.groups.iter().position(|g| g == group).map(|i| i + 1)
    }

    pub fn group(&self, key: &str) -> &str {
        self.key_to_group
            .get(key)
            .map(|g| g.as_str())
            .unwrap_or(self.default_group.as_str())
    }

    /// Map `key` to `group`, or back to the default group when `group` is
    /// `None`. A group left with no keys is dropped.
    pub fn map_key_to_group(&mut self, key: &str, group: Option<&str>) {
        let current = self.group(key).to_string();
        let moving = group.map_or(true, |g| g != current);
        if current != self.default_group && moving && self.key_count(&current) == 1 {
            self.groups.retain(|g| *g != current);
        }
        match group {
            None => {
                self.key_to_group.remove(key);
            }
            Some(g) => {
                if g != self.default_group && !self.groups.iter().any(|x| x == g) {
                    self.groups.push(g.to_string());
                }
                self.key_to_group.insert(key.to_string(), g.to_string());
            }
        }
    }

    /// Number of keys explicitly mapped to `group`.
    pub fn key_count(&self, group: &str) -> usize {
        self.key_to_group.values().filter(|g| *g == group).count()
    }

    /// Keys with an explicit mapping, in key order.
    pub fn mapped_keys(&self) -> impl Iterator<Item = &str> {
        self.key_to_group.keys().map(|k| k.as_str())
    }
}
