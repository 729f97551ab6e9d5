// Per-player prior lookup (future-value grades, batted-ball profiles).
//
// Upstream catalogs key these by a stable player id, but hand-maintained lists
// are often keyed by display name only. A `Resolver` tries the id first and
// then the name, and reports which one matched.

use std::collections::HashMap;

/// Identifies a player for prior lookups.
#[derive(Debug, Clone, Copy)]
pub struct PlayerKey<'a> {
    pub id: Option<u64>,
    pub name: &'a str,
}

impl<'a> PlayerKey<'a> {
    pub fn new(id: Option<u64>, name: &'a str) -> Self {
        PlayerKey { id, name }
    }
}

/// Which lookup strategy produced a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedBy {
    Id,
    Name,
}

/// Two-stage lookup table: stable id first, display name second.
#[derive(Debug, Clone)]
pub struct Resolver<T> {
    by_id: HashMap<u64, T>,
    by_name: HashMap<String, T>,
}

impl<T> Default for Resolver<T> {
    fn default() -> Self {
        Resolver {
            by_id: HashMap::new(),
            by_name: HashMap::new(),
        }
    }
}

impl<T> Resolver<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_id(&mut self, id: u64, value: T) -> Option<T> {
        self.by_id.insert(id, value)
    }

    pub fn insert_name(&mut self, name: &str, value: T) -> Option<T> {
        self.by_name.insert(normalize_name(name), value)
    }

    /// Look up `key`, returning the value and the strategy that found it.
    pub fn resolve_with_source(&self, key: &PlayerKey<'_>) -> Option<(&T, ResolvedBy)> {
        if let Some(v) = key.id.and_then(|id| self.by_id.get(&id)) {
            return Some((v, ResolvedBy::Id));
        }
        self.by_name
            .get(&normalize_name(key.name))
            .map(|v| (v, ResolvedBy::Name))
    }

    pub fn resolve(&self, key: &PlayerKey<'_>) -> Option<&T> {
        self.resolve_with_source(key).map(|(v, _)| v)
    }

    pub fn len(&self) -> usize {
        self.by_id.len() + self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty() && self.by_name.is_empty()
    }
}

/// Names compare after trimming and collapsing internal whitespace.
fn normalize_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> Resolver<u8> {
        let mut r = Resolver::new();
        r.insert_id(804606, 65);
        r.insert_name("Konnor Griffin", 60);
        r.insert_name("Max Clark", 60);
        r
    }

    #[test]
    fn id_wins_over_name() {
        let r = resolver();
        let key = PlayerKey::new(Some(804606), "Konnor Griffin");
        assert_eq!(r.resolve_with_source(&key), Some((&65, ResolvedBy::Id)));
    }

    #[test]
    fn falls_back_to_name_when_id_unknown() {
        let r = resolver();
        let key = PlayerKey::new(Some(1), "Max Clark");
        assert_eq!(r.resolve_with_source(&key), Some((&60, ResolvedBy::Name)));
    }

    #[test]
    fn falls_back_to_name_without_id() {
        let r = resolver();
        assert_eq!(r.resolve(&PlayerKey::new(None, "  Max   Clark ")), Some(&60));
    }

    #[test]
    fn miss_on_both_is_none() {
        let r = resolver();
        assert_eq!(r.resolve(&PlayerKey::new(Some(2), "Nobody")), None);
        assert_eq!(r.len(), 3);
        assert!(Resolver::<u8>::new().is_empty());
    }
}
