use std::collections::BTreeMap;

/// Finite map from a key to a canned result, with a designated entry that
/// answers for every key it does not know.
#[derive(Debug, Clone)]
pub struct CannedTable<V> {
    entries: BTreeMap<&'static str, V>,
    default_key: &'static str,
    fallback: V,
}

impl<V: Clone> CannedTable<V> {
    /// `default` is both a regular entry and the answer for unknown keys.
    pub fn new<I>(default: (&'static str, V), others: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, V)>,
    {
        let (default_key, fallback) = default;
        let mut entries: BTreeMap<_, _> = others.into_iter().collect();
        entries.insert(default_key, fallback.clone());
        Self {
            entries,
            default_key,
            fallback,
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn default_key(&self) -> &'static str {
        self.default_key
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }

    /// Entry for `key`, or the default entry.
    pub fn resolve(&self, key: &str) -> &V {
        self.entries.get(key).unwrap_or(&self.fallback)
    }
}
