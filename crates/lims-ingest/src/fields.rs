//! Ordered key/value rows.

/// Column name to cell value, in file column order.
///
/// Inserting an existing key replaces its value in place, so a repeated
/// column keeps its first position and its last value. Stagers consume a
/// map by [`take`](Self::take)-ing the keys they recognize; whatever is
/// left afterwards was not understood.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
    entries: Vec<(String, String)>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pair up names and values positionally; extra cells on either side are dropped.
    pub fn zip<N, V>(names: &[N], values: &[V]) -> Self
    where
        N: AsRef<str>,
        V: AsRef<str>,
    {
        let mut map = Self::new();
        for (name, value) in names.iter().zip(values) {
            map.insert(name.as_ref(), value.as_ref());
        }
        map
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(existing, _)| existing == key)
    }

    /// Remove a key and return its value.
    pub fn take(&mut self, key: &str) -> Option<String> {
        let index = self.entries.iter().position(|(existing, _)| existing == key)?;
        Some(self.entries.remove(index).1)
    }

    /// Remove a key matched case-insensitively.
    pub fn take_ignore_case(&mut self, key: &str) -> Option<(String, String)> {
        let index = self
            .entries
            .iter()
            .position(|(existing, _)| existing.eq_ignore_ascii_case(key))?;
        Some(self.entries.remove(index))
    }

    /// Remove and return every entry whose key satisfies `predicate`, in order.
    pub fn take_where(&mut self, mut predicate: impl FnMut(&str) -> bool) -> Vec<(String, String)> {
        let mut taken = Vec::new();
        let mut kept = Vec::with_capacity(self.entries.len());
        for (key, value) in self.entries.drain(..) {
            if predicate(&key) {
                taken.push((key, value));
            } else {
                kept.push((key, value));
            }
        }
        self.entries = kept;
        taken
    }

    /// Drop entries whose key is blank (empty spreadsheet header cells).
    pub fn remove_blank_keys(&mut self) {
        self.entries.retain(|(key, _)| !key.trim().is_empty());
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for FieldMap {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K, V> FromIterator<(K, V)> for FieldMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zip_truncates_to_shorter_side() {
        let map = FieldMap::zip(&["A", "B", "C"], &["1", "2"]);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("B"), Some("2"));
        assert!(!map.contains_key("C"));
    }

    #[test]
    fn test_repeated_key_keeps_position_and_last_value() {
        let map = FieldMap::zip(&["A", "B", "A"], &["1", "2", "3"]);
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(map.get("A"), Some("3"));
    }

    #[test]
    fn test_take_removes_entry() {
        let mut map = FieldMap::zip(&["A", "B"], &["1", "2"]);
        assert_eq!(map.take("A"), Some("1".to_string()));
        assert_eq!(map.take("A"), None);
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["B"]);
    }

    #[test]
    fn test_take_ignore_case() {
        let mut map = FieldMap::zip(&["Title", "Remarks"], &["B-1", "x"]);
        assert_eq!(
            map.take_ignore_case("title"),
            Some(("Title".to_string(), "B-1".to_string()))
        );
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_take_where_preserves_order() {
        let mut map = FieldMap::zip(&["Ca", "Remarks", "Mg"], &["1", "x", "0"]);
        let taken = map.take_where(|key| key.len() == 2);
        assert_eq!(
            taken,
            vec![
                ("Ca".to_string(), "1".to_string()),
                ("Mg".to_string(), "0".to_string())
            ]
        );
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["Remarks"]);
    }

    #[test]
    fn test_remove_blank_keys() {
        let mut map = FieldMap::zip(&["A", "", " "], &["1", "2", "3"]);
        map.remove_blank_keys();
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["A"]);
    }
}
