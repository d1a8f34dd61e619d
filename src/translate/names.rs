use crate::foundation::ids::NodeId;
use std::collections::{BTreeMap, HashMap};

/// Issues synthetic block names `bn_<id>_<n>`.
///
/// Each target id carries its own monotonically increasing counter, so a name is never issued
/// twice by the same allocator. The allocator is plain data: keep one across translations for
/// names that stay unique over incremental builds, or start from [`Default`] for deterministic
/// output.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct BlockNameAllocator {
    next: BTreeMap<NodeId, u64>,
}

impl BlockNameAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next name for `target` and record it in `scope`.
    ///
    /// Always issues a fresh name; callers that want one name per scope check
    /// [`BlockScope::get`] first.
    pub fn allocate(&mut self, target: &NodeId, scope: &mut BlockScope) -> String {
        let n = self.next.entry(target.clone()).or_insert(0);
        let name = format!("bn_{target}_{n}");
        *n += 1;
        tracing::trace!(node = %target, name = %name, "allocated block name");
        scope.names.insert(target.clone(), name.clone());
        name
    }

    /// Number of names issued so far for `target`.
    pub fn issued(&self, target: &NodeId) -> u64 {
        self.next.get(target).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.next.is_empty()
    }

    pub fn reset(&mut self) {
        self.next.clear();
    }
}

/// Names allocated while translating one animation.
#[derive(Debug, Clone, Default)]
pub struct BlockScope {
    names: HashMap<NodeId, String>,
}

impl BlockScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, target: &NodeId) -> Option<&str> {
        self.names.get(target).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
