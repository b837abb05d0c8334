use std::{any::TypeId, collections::HashMap, fmt, sync::Arc};

use anyhow::anyhow;
use parking_lot::RwLock;
use support::kind::ArrayKind;
use tracing::debug;

use crate::{error::ArrayError, invalid, invalidate};

use super::{
    builtins::{
        ByteArray, CharArray, DoubleArray, FloatArray, IntArray, LongArray, ReferenceArray,
        ShortArray,
    },
    header::ArrayInit,
    AnyArray, ArrayType, CopyableArray,
};

pub type NewFn = for<'f> fn(ArrayInit<'f>) -> anyhow::Result<Box<dyn AnyArray>>;
pub type CopyFn = for<'f, 's> fn(ArrayInit<'f>, &'s dyn AnyArray) -> anyhow::Result<Box<dyn AnyArray>>;

fn new_erased<A: ArrayType>(init: ArrayInit<'_>) -> anyhow::Result<Box<dyn AnyArray>> {
    Ok(Box::new(A::construct(init)?))
}

fn copy_erased<A: CopyableArray>(
    init: ArrayInit<'_>,
    source: &dyn AnyArray,
) -> anyhow::Result<Box<dyn AnyArray>> {
    let source = source.downcast_ref::<A>().ok_or_else(|| {
        anyhow!(
            "cannot copy a {} into a {}",
            source.class_name(),
            A::type_name()
        )
    })?;

    Ok(Box::new(A::construct_copy(init, source)?))
}

/// Runtime description of an array type, for callers that only hold a
/// descriptor or a type-erased array.
#[derive(Clone)]
pub struct ArrayClass {
    name: &'static str,
    descriptor: String,
    kind: ArrayKind,
    type_id: TypeId,
    new_fn: Option<NewFn>,
    copy_fn: Option<CopyFn>,
}

impl ArrayClass {
    /// A class with no reachable constructors.
    pub fn bare<A: ArrayType>(descriptor: impl Into<String>) -> Self {
        Self {
            name: A::type_name(),
            descriptor: descriptor.into(),
            kind: A::KIND,
            type_id: TypeId::of::<A>(),
            new_fn: None,
            copy_fn: None,
        }
    }

    pub fn constructible<A: ArrayType>(descriptor: impl Into<String>) -> Self {
        Self {
            new_fn: Some(new_erased::<A>),
            ..Self::bare::<A>(descriptor)
        }
    }

    pub fn copyable<A: CopyableArray>(descriptor: impl Into<String>) -> Self {
        Self {
            copy_fn: Some(copy_erased::<A>),
            ..Self::constructible::<A>(descriptor)
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }

    pub fn kind(&self) -> ArrayKind {
        self.kind
    }

    pub fn new_fn(&self) -> Option<NewFn> {
        self.new_fn
    }

    pub fn copy_fn(&self) -> Option<CopyFn> {
        self.copy_fn
    }

    pub fn is_instance(&self, array: &dyn AnyArray) -> bool {
        array.as_any().type_id() == self.type_id
    }
}

impl fmt::Debug for ArrayClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayClass")
            .field("name", &self.name)
            .field("descriptor", &self.descriptor)
            .field("kind", &self.kind)
            .field("new", &self.new_fn.is_some())
            .field("copy", &self.copy_fn.is_some())
            .finish()
    }
}

#[derive(Default)]
struct Classes {
    by_descriptor: HashMap<String, Arc<ArrayClass>>,
    by_type: HashMap<TypeId, Arc<ArrayClass>>,
}

/// Maps descriptors and runtime types to their [`ArrayClass`].
#[derive(Default)]
pub struct ClassRegistry {
    classes: RwLock<Classes>,
}

lazy_static::lazy_static! {
    static ref GLOBAL: ClassRegistry = ClassRegistry::with_builtins();
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in arrays under their canonical
    /// descriptors.
    pub fn with_builtins() -> Self {
        let registry = Self::new();

        let builtins = [
            ArrayClass::copyable::<ByteArray>(ArrayKind::Byte.descriptor()),
            ArrayClass::copyable::<CharArray>(ArrayKind::Char.descriptor()),
            ArrayClass::copyable::<ShortArray>(ArrayKind::Short.descriptor()),
            ArrayClass::copyable::<IntArray>(ArrayKind::Int.descriptor()),
            ArrayClass::copyable::<FloatArray>(ArrayKind::Float.descriptor()),
            ArrayClass::copyable::<LongArray>(ArrayKind::Long.descriptor()),
            ArrayClass::copyable::<DoubleArray>(ArrayKind::Double.descriptor()),
            ArrayClass::copyable::<ReferenceArray>(ArrayKind::Reference.descriptor()),
        ];

        // Canonical descriptors always classify to their own kind
        for class in builtins {
            registry.insert(class);
        }

        registry
    }

    /// The process-wide registry, pre-populated with the built-in arrays.
    pub fn global() -> &'static ClassRegistry {
        &GLOBAL
    }

    /// Register `class`, replacing any class with the same descriptor.
    ///
    /// The descriptor must classify to the class's kind.
    pub fn register(&self, class: ArrayClass) -> Result<Arc<ArrayClass>, ArrayError> {
        let kind = ArrayKind::from_descriptor(&class.descriptor).map_err(invalidate!())?;
        if kind != class.kind {
            return Err(invalid!(
                "descriptor {} is a {} array but {} is a {} array",
                class.descriptor,
                kind,
                class.name,
                class.kind
            ));
        }

        Ok(self.insert(class))
    }

    fn insert(&self, class: ArrayClass) -> Arc<ArrayClass> {
        debug!(name = class.name, descriptor = %class.descriptor, "registering array class");

        let class = Arc::new(class);
        let mut guard = self.classes.write();
        let classes = &mut *guard;

        // A displaced class must not stay reachable through the other map
        if let Some(old) = classes
            .by_descriptor
            .insert(class.descriptor.clone(), class.clone())
        {
            if classes
                .by_type
                .get(&old.type_id)
                .map_or(false, |current| Arc::ptr_eq(current, &old))
            {
                classes.by_type.remove(&old.type_id);
            }
        }

        if let Some(old) = classes.by_type.insert(class.type_id, class.clone()) {
            if classes
                .by_descriptor
                .get(&old.descriptor)
                .map_or(false, |current| Arc::ptr_eq(current, &old))
            {
                classes.by_descriptor.remove(&old.descriptor);
            }
        }

        class
    }

    /// Look up the class registered for `descriptor`.
    ///
    /// Descriptors that do not name a known array kind are rejected before
    /// the lookup.
    pub fn for_descriptor(&self, descriptor: &str) -> Result<Arc<ArrayClass>, ArrayError> {
        ArrayKind::from_descriptor(descriptor).map_err(invalidate!())?;

        self.classes
            .read()
            .by_descriptor
            .get(descriptor)
            .cloned()
            .ok_or_else(|| invalid!("no array class is registered for {descriptor}"))
    }

    /// The class of a type-erased array.
    pub fn for_instance(&self, array: &dyn AnyArray) -> Option<Arc<ArrayClass>> {
        self.classes
            .read()
            .by_type
            .get(&array.as_any().type_id())
            .cloned()
    }

    pub fn for_type<A: ArrayType>(&self) -> Option<Arc<ArrayClass>> {
        self.classes.read().by_type.get(&TypeId::of::<A>()).cloned()
    }
}
