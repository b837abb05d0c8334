use std::{any::Any, sync::Arc};

use anyhow::anyhow;
use paste::paste;
use support::kind::ArrayKind;

use super::{
    header::{ArrayHeader, ArrayInit},
    ArrayElement, ArrayType, CopyableArray,
};

pub type Byte = i8;
pub type Char = u16;
pub type Short = i16;
pub type Int = i32;
pub type Float = f32;
pub type Long = i64;
pub type Double = f64;

/// A reference slot. `None` is null.
pub type Reference = Option<Arc<dyn Any + Send + Sync>>;

fn reserve<T>(length: usize) -> anyhow::Result<Vec<T>> {
    let mut elements = Vec::new();
    elements.try_reserve_exact(length).map_err(|e| {
        anyhow!(
            "cannot allocate {length} elements of {} bytes: {e}",
            std::mem::size_of::<T>()
        )
    })?;

    Ok(elements)
}

/// Zeroed storage for `length` elements. Allocation failure is an error, not an abort.
fn zeroed<T: Clone + Default>(length: usize) -> anyhow::Result<Box<[T]>> {
    let mut elements = reserve(length)?;
    elements.resize(length, T::default());

    Ok(elements.into_boxed_slice())
}

fn copied<T: Clone>(source: &[T]) -> anyhow::Result<Box<[T]>> {
    let mut elements = reserve(source.len())?;
    elements.extend_from_slice(source);

    Ok(elements.into_boxed_slice())
}

macro_rules! builtin_array {
    ($kind: ident) => {
        impl ArrayElement for $kind {
            const KIND: ArrayKind = ArrayKind::$kind;
        }

        paste! {
            #[doc = "A fixed length array of `" $kind "` elements, zeroed on creation."]
            #[derive(Debug)]
            pub struct [<$kind Array>] {
                header: ArrayHeader,
                elements: Box<[$kind]>,
            }

            impl [<$kind Array>] {
                pub fn get(&self, index: usize) -> Option<&$kind> {
                    self.elements.get(index)
                }

                pub fn get_mut(&mut self, index: usize) -> Option<&mut $kind> {
                    self.elements.get_mut(index)
                }

                pub fn as_slice(&self) -> &[$kind] {
                    &self.elements
                }

                pub fn as_mut_slice(&mut self) -> &mut [$kind] {
                    &mut self.elements
                }
            }

            impl ArrayType for [<$kind Array>] {
                type Element = $kind;

                fn type_name() -> &'static str {
                    stringify!([<$kind Array>])
                }

                fn header(&self) -> &ArrayHeader {
                    &self.header
                }

                fn construct(init: ArrayInit<'_>) -> anyhow::Result<Self> {
                    let elements = zeroed::<$kind>(init.length())?;

                    Ok(Self {
                        header: ArrayHeader::new(init),
                        elements,
                    })
                }
            }

            impl CopyableArray for [<$kind Array>] {
                fn construct_copy(init: ArrayInit<'_>, source: &Self) -> anyhow::Result<Self> {
                    let elements = copied(&source.elements)?;

                    Ok(Self {
                        header: ArrayHeader::new(init),
                        elements,
                    })
                }
            }
        }
    };
}

builtin_array!(Byte);
builtin_array!(Char);
builtin_array!(Short);
builtin_array!(Int);
builtin_array!(Float);
builtin_array!(Long);
builtin_array!(Double);
builtin_array!(Reference);
