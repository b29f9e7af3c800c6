//! # IDs and names
//! Two flavors of identity live in a document.
//!
//! Cameras and materials are identified by an [`EntityID<T>`], which is unique within this execution of the program
//! and namespaced by the type T. Snapshots keep the IDs of the entities they copy, so a reference held by a layer
//! resolves to the copy living in the same snapshot, never to one in another.
//!
//! Layers carry a small [`LayerID`], unique only within their document. Clone relationships are written in terms of
//! these, so they are allocated as the smallest free positive value by [`allocate_layer_id`].
//!
//! Display names are unique per entity kind, compared without regard to ASCII case. See [`unique_name`].

use std::num::NonZeroU32;

// Next free EntityID, by namespace.
static ID_SERVER: parking_lot::RwLock<
    std::collections::BTreeMap<std::any::TypeId, std::sync::atomic::AtomicU64>,
> = parking_lot::const_rwlock(std::collections::BTreeMap::new());

/// ID that is guaranteed unique within this execution of the program.
/// IDs with different types may share a value but should not be considered equal.
pub struct EntityID<T: std::any::Any> {
    id: std::num::NonZeroU64,
    _phantom: std::marker::PhantomData<T>,
}
impl<T: std::any::Any> Clone for EntityID<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T: std::any::Any> Copy for EntityID<T> {}
impl<T: std::any::Any> PartialEq for EntityID<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl<T: std::any::Any> Eq for EntityID<T> {}

// Safety - it's just a u64. The namespace marker is never stored, so T's auto traits
// have no business leaking onto the ID.
unsafe impl<T: std::any::Any> Send for EntityID<T> {}
unsafe impl<T: std::any::Any> Sync for EntityID<T> {}

impl<T: std::any::Any> std::hash::Hash for EntityID<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T: std::any::Any> EntityID<T> {
    /// Get the raw numeric value of this ID.
    /// IDs from differing namespaces may share the same numeric ID!
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id.get()
    }
    fn allocate() -> Self {
        let ty = std::any::TypeId::of::<T>();
        let raw = {
            let read = ID_SERVER.upgradable_read();
            if let Some(next) = read.get(&ty) {
                next.fetch_add(1, std::sync::atomic::Ordering::Relaxed)
            } else {
                // First ID of this namespace. Happens once per type for the life of the program.
                let mut write = parking_lot::RwLockUpgradableReadGuard::upgrade(read);
                // Another thread may have raced us between the upgrade.
                write
                    .entry(ty)
                    .or_insert_with(|| 1.into())
                    .fetch_add(1, std::sync::atomic::Ordering::Relaxed)
            }
        };
        let Some(id) = std::num::NonZeroU64::new(raw) else {
            // Wrapped all the way around. Uniqueness is gone for good, nothing sensible to do.
            log::error!("{} ID overflow! Aborting!", std::any::type_name::<T>());
            log::logger().flush();
            std::process::abort();
        };
        Self {
            id,
            _phantom: std::marker::PhantomData,
        }
    }
}
impl<T: std::any::Any> Default for EntityID<T> {
    fn default() -> Self {
        Self::allocate()
    }
}
impl<T: std::any::Any> std::fmt::Display for EntityID<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // rsplit always yields at least one element, even for empty strings.
        let name = std::any::type_name::<T>().rsplit("::").next().unwrap_or_default();
        write!(f, "{name}#{}", self.id)
    }
}
impl<T: std::any::Any> std::fmt::Debug for EntityID<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as std::fmt::Display>::fmt(self, f)
    }
}

/// Document-local layer identifier. Never zero, "no layer" is spelled `None`.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerID(NonZeroU32);
impl LayerID {
    /// Wrap a raw value, `None` if zero.
    #[must_use]
    pub fn new(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(Self)
    }
    #[must_use]
    pub fn get(self) -> u32 {
        self.0.get()
    }
}
impl std::fmt::Display for LayerID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Layer#{}", self.0)
    }
}
impl std::fmt::Debug for LayerID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as std::fmt::Display>::fmt(self, f)
    }
}

/// Smallest positive ID not present in `used`.
pub fn allocate_layer_id(used: impl IntoIterator<Item = LayerID>) -> LayerID {
    let used: hashbrown::HashSet<u32> = used.into_iter().map(LayerID::get).collect();
    let mut raw = NonZeroU32::MIN;
    // At most used.len() + 1 candidates are visited.
    while used.contains(&raw.get()) {
        raw = raw.saturating_add(1);
    }
    LayerID(raw)
}

/// Generates `"<base>.1"`, `"<base>.2"`, ... returning the first for which `exists` is false.
pub fn unique_name(base: &str, exists: impl Fn(&str) -> bool) -> String {
    (1u64..)
        .map(|i| format!("{base}.{i}"))
        .find(|candidate| !exists(candidate))
        // The range is practically endless, we'd run out of memory long before.
        .unwrap_or_else(|| base.to_owned())
}

/// Keep `requested` if it is free. Otherwise drop any trailing `.N` and disambiguate
/// the remaining stem with [`unique_name`], so "Layer.1" collides into "Layer.2" rather than "Layer.1.1"
pub fn available_name(requested: &str, exists: impl Fn(&str) -> bool) -> String {
    if !exists(requested) {
        return requested.to_owned();
    }
    let stem = match requested.rsplit_once('.') {
        Some((stem, suffix))
            if !stem.is_empty()
                && !suffix.is_empty()
                && suffix.bytes().all(|b| b.is_ascii_digit()) =>
        {
            stem
        }
        _ => requested,
    };
    unique_name(stem, exists)
}

/// Name lookup as done for every entity kind.
pub(crate) fn name_eq(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}
