use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::String;

/// Best-effort storage for scroll positions, keyed per list instance.
pub trait ScrollStore {
    fn save(&mut self, key: &str, offset: u64);

    fn load(&self, key: &str) -> Option<u64>;
}

/// The persistence key for a list scope.
pub fn position_key(scope: &str) -> String {
    format!("{scope}/position")
}

/// A [`ScrollStore`] that keeps positions in memory (e.g. for the lifetime of a session).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryScrollStore {
    positions: BTreeMap<String, u64>,
}

impl MemoryScrollStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScrollStore for MemoryScrollStore {
    fn save(&mut self, key: &str, offset: u64) {
        self.positions.insert(key.into(), offset);
    }

    fn load(&self, key: &str) -> Option<u64> {
        self.positions.get(key).copied()
    }
}

/// Storage is unavailable: nothing is saved and nothing restored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoScrollStore;

impl ScrollStore for NoScrollStore {
    fn save(&mut self, _key: &str, _offset: u64) {}

    fn load(&self, _key: &str) -> Option<u64> {
        None
    }
}
