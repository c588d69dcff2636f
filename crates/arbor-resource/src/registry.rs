use std::collections::BTreeMap;
use std::sync::RwLock;

use arbor_store::PropertySet;
use arbor_types::{ResourcePath, TypeTag};

use crate::error::{ResourceError, ResourceResult};
use crate::resource::{Resource, ResourceKind};

/// Constructor materializing a resource from its persisted state.
pub type Constructor = fn(ResourcePath, PropertySet) -> Resource;

/// Explicit map from persisted type tag to resource constructor.
///
/// Storage is polymorphic by a stored tag; this registry replaces dynamic
/// class lookup with a tagged-variant pattern, resolved once at load time.
/// Registration happens at startup, lookups happen on every cache miss.
pub struct TypeRegistry {
    constructors: RwLock<BTreeMap<TypeTag, Constructor>>,
}

impl TypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            constructors: RwLock::new(BTreeMap::new()),
        }
    }

    /// Create a registry pre-populated with the builtin resource types:
    /// `folder` and `website` (containers), `file`, `webpage` and `user`
    /// (leaves).
    pub fn with_builtin_types() -> Self {
        let registry = Self::new();
        let builtins: [(&str, Constructor); 5] = [
            ("folder", construct_container),
            ("website", construct_container),
            ("file", construct_leaf),
            ("webpage", construct_leaf),
            ("user", construct_leaf),
        ];
        {
            let mut map = registry.constructors.write().expect("lock poisoned");
            for (tag, constructor) in builtins {
                map.insert(TypeTag::from(tag), constructor);
            }
        }
        registry
    }

    /// Register a constructor for `tag`.
    ///
    /// Fails if the tag is already taken; re-registering a type is almost
    /// always a startup wiring mistake.
    pub fn register(&self, tag: TypeTag, constructor: Constructor) -> ResourceResult<()> {
        let mut map = self.constructors.write().expect("lock poisoned");
        if map.contains_key(&tag) {
            return Err(ResourceError::AlreadyRegistered(tag));
        }
        map.insert(tag, constructor);
        Ok(())
    }

    /// Look up the constructor for `tag`.
    pub fn lookup(&self, tag: &TypeTag) -> ResourceResult<Constructor> {
        let map = self.constructors.read().expect("lock poisoned");
        map.get(tag)
            .copied()
            .ok_or_else(|| ResourceError::UnknownType(tag.clone()))
    }

    /// Materialize a resource from its persisted state.
    pub fn construct(
        &self,
        path: ResourcePath,
        properties: PropertySet,
    ) -> ResourceResult<Resource> {
        let constructor = self.lookup(properties.format())?;
        Ok(constructor(path, properties))
    }

    /// All registered tags, in order.
    pub fn tags(&self) -> Vec<TypeTag> {
        let map = self.constructors.read().expect("lock poisoned");
        map.keys().cloned().collect()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::with_builtin_types()
    }
}

fn construct_container(path: ResourcePath, properties: PropertySet) -> Resource {
    Resource::new(path, ResourceKind::Container, properties)
}

fn construct_leaf(path: ResourcePath, properties: PropertySet) -> Resource {
    Resource::new(path, ResourceKind::Leaf, properties)
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("tags", &self.tags())
            .finish()
    }
}
