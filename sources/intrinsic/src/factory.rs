use std::{cell::Cell, sync::Arc};

use anyhow::anyhow;
use support::kind::ArrayKind;
use tracing::{debug, trace};

use crate::{
    error::ArrayError,
    invalid,
    object::{
        class::ArrayClass,
        header::{ArrayInit, InitState},
        layout::{footprint, FootprintModel, ObjectModel},
        AnyArray, ArrayType, CopyableArray,
    },
};

/// The only way to create arrays.
///
/// Every creation validates the length, computes the array's standalone
/// footprint, hands a construction token to the array's constructor and
/// checks that the constructor built its header from that token.
#[derive(Clone)]
pub struct ArrayFactory {
    model: Arc<dyn FootprintModel>,
}

impl Default for ArrayFactory {
    fn default() -> Self {
        Self::new(ObjectModel::default())
    }
}

impl ArrayFactory {
    pub fn new(model: impl FootprintModel + 'static) -> Self {
        Self {
            model: Arc::new(model),
        }
    }

    pub fn model(&self) -> &dyn FootprintModel {
        self.model.as_ref()
    }

    /// Footprint of an `A` holding `length` elements.
    pub fn footprint_of<A: ArrayType>(&self, length: i64, contained: bool) -> Result<u64, ArrayError> {
        footprint(self.model(), A::KIND, length, contained)
    }

    /// A new, zeroed `A` of the given length.
    pub fn create_new<A: ArrayType>(&self, length: i64) -> Result<A, ArrayError> {
        self.create_with(length, A::construct)
    }

    /// A new `A` built by `construct`, which receives the construction token
    /// in place of `A::construct`. Extra constructor arguments are captured
    /// by the closure.
    pub fn create_with<A, F>(&self, length: i64, construct: F) -> Result<A, ArrayError>
    where
        A: ArrayType,
        F: for<'f> FnOnce(ArrayInit<'f>) -> anyhow::Result<A>,
    {
        let count = checked_length(A::type_name(), length)?;
        self.instantiate(A::type_name(), A::KIND, count, construct, |array: &A| array.len())
    }

    /// A new `A` with the same length as `source`. Elements are copied by
    /// `A::construct_copy`.
    pub fn create_copy<A: CopyableArray>(&self, source: &A) -> Result<A, ArrayError> {
        self.instantiate(
            A::type_name(),
            A::KIND,
            source.len(),
            |init| A::construct_copy(init, source),
            |array: &A| array.len(),
        )
    }

    /// A new array of a runtime class.
    pub fn create_new_dyn(
        &self,
        class: &ArrayClass,
        length: i64,
    ) -> Result<Box<dyn AnyArray>, ArrayError> {
        let count = checked_length(class.name(), length)?;
        let construct = class.new_fn().ok_or_else(|| ArrayError::Construction {
            type_name: class.name(),
            length,
            source: anyhow!("{} has no constructor for new instances", class.descriptor()),
        })?;

        self.instantiate(class.name(), class.kind(), count, construct, |array: &Box<dyn AnyArray>| {
            array.len()
        })
    }

    /// A copy of a type-erased array, through its runtime class.
    pub fn create_copy_dyn(
        &self,
        class: &ArrayClass,
        source: &dyn AnyArray,
    ) -> Result<Box<dyn AnyArray>, ArrayError> {
        let length = source.len();
        let unconstructible = |reason: String| ArrayError::Construction {
            type_name: class.name(),
            length: length as i64,
            source: anyhow!(reason),
        };

        if !class.is_instance(source) {
            return Err(unconstructible(format!(
                "{} is not an instance of {}",
                source.class_name(),
                class.descriptor()
            )));
        }

        let construct = class.copy_fn().ok_or_else(|| {
            unconstructible(format!("{} has no copy constructor", class.descriptor()))
        })?;

        self.instantiate(
            class.name(),
            class.kind(),
            length,
            |init| construct(init, source),
            |array: &Box<dyn AnyArray>| array.len(),
        )
    }

    fn instantiate<T, F>(
        &self,
        type_name: &'static str,
        kind: ArrayKind,
        length: usize,
        construct: F,
        length_of: fn(&T) -> usize,
    ) -> Result<T, ArrayError>
    where
        F: for<'f> FnOnce(ArrayInit<'f>) -> anyhow::Result<T>,
    {
        let signed_length =
            i64::try_from(length).map_err(|_| invalid!("array length {length} is too large"))?;
        let footprint = footprint(self.model(), kind, signed_length, false)?;

        debug!(type_name, %kind, length, footprint, "instantiating array");

        // TODO: allocate `footprint` bytes from a placement region and construct
        // the array in place once contained layout is supported.
        let state = Cell::new(InitState::Pending);
        let array = construct(ArrayInit::new(length, footprint, &state)).map_err(|source| {
            ArrayError::Construction {
                type_name,
                length: signed_length,
                source,
            }
        })?;

        if state.get() != InitState::Redeemed {
            return Err(ArrayError::IllegalConstruction {
                type_name,
                reason: "the constructor did not redeem its construction token".to_string(),
            });
        }

        let actual = length_of(&array);
        if actual != length {
            return Err(ArrayError::IllegalConstruction {
                type_name,
                reason: format!("the constructor returned an array of length {actual}, expected {length}"),
            });
        }

        trace!(type_name, length, "array constructed");
        Ok(array)
    }
}

fn checked_length(type_name: &str, length: i64) -> Result<usize, ArrayError> {
    usize::try_from(length)
        .map_err(|_| invalid!("cannot create {type_name} with negative length {length}"))
}

/// A new, zeroed `A`, sized with the default object model.
pub fn new_instance<A: ArrayType>(length: i64) -> Result<A, ArrayError> {
    ArrayFactory::default().create_new(length)
}

/// A copy of `source`, sized with the default object model.
pub fn copy_instance<A: CopyableArray>(source: &A) -> Result<A, ArrayError> {
    ArrayFactory::default().create_copy(source)
}
