use std::fmt;

use anyhow::{anyhow, Result};
use enum_as_inner::EnumAsInner;

use crate::descriptor::{BaseType, FieldType};

/// The element category of an array.
///
/// Every array type belongs to exactly one kind, and every kind has a fixed
/// element width. `Reference` models a machine-word sized reference slot.
#[derive(EnumAsInner, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArrayKind {
    Byte,
    Char,
    Short,
    Int,
    Float,
    Long,
    Double,
    Reference,
}

impl ArrayKind {
    pub const ALL: [ArrayKind; 8] = [
        ArrayKind::Byte,
        ArrayKind::Char,
        ArrayKind::Short,
        ArrayKind::Int,
        ArrayKind::Float,
        ArrayKind::Long,
        ArrayKind::Double,
        ArrayKind::Reference,
    ];

    /// Width of a single element, in bytes.
    pub const fn element_size(self) -> usize {
        match self {
            ArrayKind::Byte => 1,
            ArrayKind::Char | ArrayKind::Short => 2,
            ArrayKind::Int | ArrayKind::Float => 4,
            ArrayKind::Long | ArrayKind::Double | ArrayKind::Reference => 8,
        }
    }

    /// The component descriptor of arrays of this kind, `L` for references.
    pub const fn component_tag(self) -> char {
        match self {
            ArrayKind::Byte => 'B',
            ArrayKind::Char => 'C',
            ArrayKind::Short => 'S',
            ArrayKind::Int => 'I',
            ArrayKind::Float => 'F',
            ArrayKind::Long => 'J',
            ArrayKind::Double => 'D',
            ArrayKind::Reference => 'L',
        }
    }

    /// The descriptor of the canonical array type for this kind.
    pub fn descriptor(self) -> String {
        match self {
            ArrayKind::Reference => "[Ljava/lang/Object;".to_string(),
            kind => format!("[{}", kind.component_tag()),
        }
    }

    pub fn from_base(base: BaseType) -> Result<Self> {
        Ok(match base {
            BaseType::Byte => ArrayKind::Byte,
            BaseType::Char => ArrayKind::Char,
            BaseType::Short => ArrayKind::Short,
            BaseType::Int => ArrayKind::Int,
            BaseType::Float => ArrayKind::Float,
            BaseType::Long => ArrayKind::Long,
            BaseType::Double => ArrayKind::Double,
            BaseType::Boolean | BaseType::Void => {
                return Err(anyhow!("unrecognized array element type {base}"))
            }
        })
    }

    /// Classify an array descriptor such as `[I` or `[Ljava/lang/String;`.
    ///
    /// Arrays of objects and arrays of arrays are both reference arrays.
    pub fn from_descriptor(descriptor: impl AsRef<str>) -> Result<Self> {
        let descriptor = descriptor.as_ref();
        let ty = FieldType::parse(descriptor)?;

        let array = match ty {
            FieldType::Array(array) => array,
            ty => return Err(anyhow!("`{ty}` is not an array type")),
        };

        match *array.field_type {
            FieldType::Base(base) => ArrayKind::from_base(base),
            FieldType::Object(_) | FieldType::Array(_) => Ok(ArrayKind::Reference),
        }
    }
}

impl fmt::Display for ArrayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArrayKind::Byte => "byte",
            ArrayKind::Char => "char",
            ArrayKind::Short => "short",
            ArrayKind::Int => "int",
            ArrayKind::Float => "float",
            ArrayKind::Long => "long",
            ArrayKind::Double => "double",
            ArrayKind::Reference => "reference",
        };

        f.write_str(name)
    }
}
