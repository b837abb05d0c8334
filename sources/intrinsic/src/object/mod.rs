use std::{any::Any, fmt};

use support::kind::ArrayKind;

use self::header::{ArrayHeader, ArrayInit};

pub mod builtins;
pub mod class;
pub mod header;
pub mod layout;

/// A value that can be stored in an array. The element type decides the
/// array's kind.
pub trait ArrayElement: Clone + Default + 'static {
    const KIND: ArrayKind;
}

/// An array type that can be built by the factory.
///
/// `construct` is the restricted constructor: it receives the requested
/// length through the [`ArrayInit`] token and must turn that token into the
/// array's [`ArrayHeader`]. Nothing outside the factory can produce a token,
/// so arrays cannot be built behind the factory's back.
///
/// ```compile_fail
/// use intrinsic::object::{builtins::IntArray, ArrayType};
///
/// // Only the factory can hand out construction tokens.
/// let array = IntArray::construct(intrinsic::object::header::ArrayInit::new(4, 0, todo!()));
/// ```
pub trait ArrayType: Sized + 'static {
    type Element: ArrayElement;

    const KIND: ArrayKind = <Self::Element as ArrayElement>::KIND;

    fn type_name() -> &'static str;

    fn header(&self) -> &ArrayHeader;

    fn construct(init: ArrayInit<'_>) -> anyhow::Result<Self>;

    fn len(&self) -> usize {
        self.header().len()
    }

    fn is_empty(&self) -> bool {
        self.header().is_empty()
    }
}

/// An array type with a copy constructor.
///
/// The factory fixes the copy's length; copying the elements is up to
/// `construct_copy`.
pub trait CopyableArray: ArrayType {
    fn construct_copy(init: ArrayInit<'_>, source: &Self) -> anyhow::Result<Self>;
}

/// Type-erased view of any [`ArrayType`].
pub trait AnyArray: Any {
    fn array_header(&self) -> &ArrayHeader;
    fn kind(&self) -> ArrayKind;
    fn class_name(&self) -> &'static str;
    fn as_any(&self) -> &dyn Any;
}

impl<A: ArrayType> AnyArray for A {
    fn array_header(&self) -> &ArrayHeader {
        self.header()
    }

    fn kind(&self) -> ArrayKind {
        A::KIND
    }

    fn class_name(&self) -> &'static str {
        A::type_name()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl dyn AnyArray {
    pub fn len(&self) -> usize {
        self.array_header().len()
    }

    pub fn is_empty(&self) -> bool {
        self.array_header().is_empty()
    }

    pub fn footprint(&self) -> u64 {
        self.array_header().footprint()
    }

    pub fn is<A: ArrayType>(&self) -> bool {
        self.as_any().is::<A>()
    }

    pub fn downcast_ref<A: ArrayType>(&self) -> Option<&A> {
        self.as_any().downcast_ref::<A>()
    }
}

impl fmt::Debug for dyn AnyArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(self.class_name())
            .field("kind", &self.kind())
            .field("length", &self.len())
            .finish()
    }
}
