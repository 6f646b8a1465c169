pub use fixed_map::Key as Term;
use fixed_map::Map as FixedMap;

use crate::membership::MembershipFunction;

/// The terms of one linguistic variable, each backed by a membership function.
pub struct Terms<K: Term>(pub(crate) FixedMap<K, MembershipFunction>);

impl<K: Term> Terms<K> {
    pub fn new() -> Self {
        Self(FixedMap::new())
    }

    pub fn insert(&mut self, key: K, value: MembershipFunction) {
        self.0.insert(key, value);
    }

    pub fn get(&self, key: K) -> Option<&MembershipFunction> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Term> Default for Terms<K> {
    fn default() -> Self {
        Self::new()
    }
}
