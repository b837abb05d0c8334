use std::{fmt, iter::Peekable, str::Chars};

use anyhow::{anyhow, Result};
use enum_as_inner::EnumAsInner;

/// <BaseType> ::= 'B' | 'C' | 'D' | 'F' | 'I' | 'J' | 'S' | 'Z'
#[derive(EnumAsInner, Debug, PartialEq, Eq, Clone, Copy)]
pub enum BaseType {
    Boolean, // Z
    Char,    // C
    Float,   // F
    Double,  // D
    Byte,    // B
    Short,   // S
    Int,     // I
    Long,    // J
    Void,    // V
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            BaseType::Boolean => "Z",
            BaseType::Char => "C",
            BaseType::Float => "F",
            BaseType::Double => "D",
            BaseType::Byte => "B",
            BaseType::Short => "S",
            BaseType::Int => "I",
            BaseType::Long => "J",
            BaseType::Void => "V",
        };

        f.write_str(tag)
    }
}

/// <ObjectType> ::= 'L' <ClassName> ';'
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ObjectType {
    pub class_name: String,
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{};", self.class_name)
    }
}

/// <ArrayType> ::= '[' <FieldType>
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ArrayType {
    pub field_type: Box<FieldType>,
}

impl fmt::Display for ArrayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}", self.field_type)
    }
}

#[derive(EnumAsInner, Debug, PartialEq, Eq, Clone)]
pub enum FieldType {
    Base(BaseType),
    Object(ObjectType),
    Array(ArrayType),
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Base(base) => base.fmt(f),
            FieldType::Object(object) => object.fmt(f),
            FieldType::Array(array) => array.fmt(f),
        }
    }
}

impl FieldType {
    fn parse_from_iterator(chars: &mut Peekable<Chars>) -> Result<Self> {
        let first = chars.next().ok_or(anyhow!("unexpected end of descriptor"))?;

        Ok(match first {
            'B' => FieldType::Base(BaseType::Byte),
            'C' => FieldType::Base(BaseType::Char),
            'D' => FieldType::Base(BaseType::Double),
            'F' => FieldType::Base(BaseType::Float),
            'I' => FieldType::Base(BaseType::Int),
            'J' => FieldType::Base(BaseType::Long),
            'S' => FieldType::Base(BaseType::Short),
            'Z' => FieldType::Base(BaseType::Boolean),
            'V' => FieldType::Base(BaseType::Void),
            '[' => FieldType::Array(ArrayType {
                field_type: Box::new(FieldType::parse_from_iterator(chars)?),
            }),
            'L' => {
                let mut class_name = String::new();
                let mut terminated = false;

                for c in chars.by_ref() {
                    if c == ';' {
                        terminated = true;
                        break;
                    }
                    class_name.push(c);
                }

                if !terminated {
                    return Err(anyhow!("object type `L{class_name}` is missing its `;`"));
                }

                if class_name.is_empty() {
                    return Err(anyhow!("object type has an empty class name"));
                }

                FieldType::Object(ObjectType { class_name })
            }
            _ => return Err(anyhow!("unknown type {first}")),
        })
    }

    /// Parse a complete field descriptor. Trailing input is rejected.
    pub fn parse(str: impl AsRef<str>) -> Result<Self> {
        let str = str.as_ref();
        let mut chars = str.chars().peekable();
        let ty = FieldType::parse_from_iterator(&mut chars)?;

        if chars.peek().is_some() {
            let rest = chars.collect::<String>();
            return Err(anyhow!("trailing input `{rest}` after descriptor `{ty}`"));
        }

        Ok(ty)
    }
}
