//! Resource identity tags.
//!
//! Resources are interned in a process-wide table that maps names to stable
//! identity tokens. Comparing or hashing a [`Resource`] only looks at the
//! token, so two handles are equal exactly when they were interned under the
//! same name.

use crate::error::{EffectError, EffectResult};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use std::fmt;
use std::sync::OnceLock;

const DEFAULT_RESOURCE_NAME: &str = "<Default>";
const AUTOMATIC_ALLOCATION_SCOPE_NAME: &str = "AutomaticAllocationScope";

/// Names an abstract class of state that an effect applies to.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Resource(u32);

struct ResourceTable {
    ids: FxHashMap<SmolStr, u32>,
    names: Vec<SmolStr>,
}

/// Token for the next name interned into a table holding `len` names.
/// Tokens are `u32`, which bounds a process to `u32::MAX + 1` resources.
fn next_id(len: usize) -> Option<u32> {
    u32::try_from(len).ok()
}

impl ResourceTable {
    fn with_builtins() -> Self {
        let names = vec![
            SmolStr::new(DEFAULT_RESOURCE_NAME),
            SmolStr::new(AUTOMATIC_ALLOCATION_SCOPE_NAME),
        ];
        let ids = [
            (names[0].clone(), Resource::DEFAULT.0),
            (names[1].clone(), Resource::AUTOMATIC_ALLOCATION_SCOPE.0),
        ]
        .into_iter()
        .collect();
        Self { ids, names }
    }

    fn intern(&mut self, name: &str) -> EffectResult<u32> {
        if let Some(&id) = self.ids.get(name) {
            return Ok(id);
        }
        let id = next_id(self.names.len())
            .ok_or_else(|| EffectError::ResourceTableFull { name: name.into() })?;
        let name = SmolStr::new(name);
        self.names.push(name.clone());
        self.ids.insert(name, id);
        Ok(id)
    }
}

/// The interning table, with the built-in resources at fixed slots.
fn table() -> &'static RwLock<ResourceTable> {
    static TABLE: OnceLock<RwLock<ResourceTable>> = OnceLock::new();
    TABLE.get_or_init(|| RwLock::new(ResourceTable::with_builtins()))
}

impl Resource {
    const DEFAULT: Resource = Resource(0);
    const AUTOMATIC_ALLOCATION_SCOPE: Resource = Resource(1);

    /// Intern a resource by name, returning the existing handle if the name
    /// was seen before.
    ///
    /// # Panics
    ///
    /// Panics if the process-wide table is full. Use [`Resource::try_new`]
    /// to handle that case.
    pub fn new(name: &str) -> Self {
        match Self::try_new(name) {
            Ok(resource) => resource,
            Err(e) => panic!("{}", e),
        }
    }

    /// Like [`Resource::new`], but reports a full table as an error.
    pub fn try_new(name: &str) -> EffectResult<Self> {
        if let Some(&id) = table().read().ids.get(name) {
            return Ok(Resource(id));
        }
        let id = table().write().intern(name)?;
        tracing::trace!(resource = name, id, "interned resource");
        Ok(Resource(id))
    }

    /// The conservative catch-all resource.
    pub fn default_resource() -> Self {
        Self::DEFAULT
    }

    /// Stack-like storage released when the enclosing allocation scope ends.
    pub fn automatic_allocation_scope() -> Self {
        Self::AUTOMATIC_ALLOCATION_SCOPE
    }

    /// The name this resource was interned under.
    pub fn name(&self) -> SmolStr {
        table().read().names[self.0 as usize].clone()
    }

    pub fn is_default(&self) -> bool {
        *self == Self::DEFAULT
    }
}

impl Default for Resource {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Resource").field(&self.name()).finish()
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    #[test]
    fn test_builtin_resources() {
        assert_eq!(Resource::default_resource().name(), "<Default>");
        assert_eq!(
            Resource::automatic_allocation_scope().name(),
            "AutomaticAllocationScope"
        );
        assert_ne!(
            Resource::default_resource(),
            Resource::automatic_allocation_scope()
        );
        assert!(Resource::default().is_default());
    }

    #[test]
    fn test_interning_is_stable() {
        let heap = Resource::new("test.heap");
        let again = Resource::new("test.heap");
        let other = Resource::new("test.other_heap");
        assert_eq!(heap, again);
        assert_ne!(heap, other);
        assert_eq!(Resource::new("<Default>"), Resource::default_resource());
    }

    #[test]
    fn test_try_new_matches_new() {
        let resource = Resource::try_new("test.fallible").unwrap();
        assert_eq!(resource, Resource::new("test.fallible"));
        assert_eq!(resource.name(), "test.fallible");
    }

    #[test]
    fn test_next_id_bounds() {
        assert_eq!(next_id(0), Some(0));
        assert_eq!(next_id(u32::MAX as usize), Some(u32::MAX));
        #[cfg(target_pointer_width = "64")]
        assert_eq!(next_id(u32::MAX as usize + 1), None);
    }

    #[test]
    fn test_builtin_slots() {
        let mut table = ResourceTable::with_builtins();
        assert_eq!(table.intern(DEFAULT_RESOURCE_NAME), Ok(Resource::DEFAULT.0));
        assert_eq!(
            table.intern(AUTOMATIC_ALLOCATION_SCOPE_NAME),
            Ok(Resource::AUTOMATIC_ALLOCATION_SCOPE.0)
        );
        assert_eq!(table.intern("test.third"), Ok(2));
    }

    #[test]
    fn test_hash_follows_identity() {
        let mut set = FxHashSet::default();
        set.insert(Resource::new("test.hash"));
        set.insert(Resource::new("test.hash"));
        set.insert(Resource::default_resource());
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_resource_display() {
        assert_eq!(format!("{}", Resource::new("test.display")), "test.display");
        assert_eq!(
            format!("{:?}", Resource::default_resource()),
            "Resource(\"<Default>\")"
        );
    }

    #[test]
    fn test_concurrent_interning() {
        let ids: Vec<Resource> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| Resource::new("test.concurrent")))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(ids.windows(2).all(|w| w[0] == w[1]));
    }
}
