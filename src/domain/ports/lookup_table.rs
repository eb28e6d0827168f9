//! Lookup table port.

/// Immutable keyed table with an optional default record.
pub trait LookupTable<V>: Send + Sync {
    /// Record stored under `key`.
    fn lookup(&self, key: &str) -> Option<V>;

    /// Record served when `key` is not in the table.
    fn default_for(&self, _key: &str) -> Option<V> {
        None
    }

    fn lookup_or_default(&self, key: &str) -> Option<V> {
        self.lookup(key).or_else(|| self.default_for(key))
    }
}
