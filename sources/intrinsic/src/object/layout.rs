use std::alloc::Layout;

use support::kind::ArrayKind;
use tracing::trace;

use crate::{error::ArrayError, invalid, invalidate};

/// Object model parameters used to size standalone arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutConfig {
    /// Bytes preceding the element storage: object header plus the length field.
    pub header_bytes: usize,
    /// Every standalone object is padded to a multiple of this.
    pub object_alignment: usize,
}

impl LayoutConfig {
    pub const DEFAULT_HEADER_BYTES: usize = 16;
    pub const DEFAULT_OBJECT_ALIGNMENT: usize = 8;

    pub fn validate(&self) -> Result<(), ArrayError> {
        if !self.object_alignment.is_power_of_two() {
            return Err(invalid!(
                "object alignment must be a power of two, got {}",
                self.object_alignment
            ));
        }

        Ok(())
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            header_bytes: Self::DEFAULT_HEADER_BYTES,
            object_alignment: Self::DEFAULT_OBJECT_ALIGNMENT,
        }
    }
}

/// Computes how many bytes an array occupies.
///
/// The accounting (headers, padding) is up to the implementation. Both
/// methods must be pure, and `standalone` must never be smaller than
/// `contained` for the same inputs.
pub trait FootprintModel: Send + Sync {
    /// Size of an independently allocated array object.
    fn standalone(&self, element_size: usize, length: u64) -> Result<u64, ArrayError>;

    /// Size contributed by the array's storage when it is embedded in an
    /// enclosing object. Carries no header of its own.
    fn contained(&self, element_size: usize, length: u64) -> Result<u64, ArrayError>;

    fn footprint(&self, element_size: usize, length: u64, contained: bool) -> Result<u64, ArrayError> {
        if contained {
            self.contained(element_size, length)
        } else {
            self.standalone(element_size, length)
        }
    }
}

/// A header-then-elements object model, computed with [`Layout`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObjectModel {
    config: LayoutConfig,
}

impl ObjectModel {
    pub fn new(config: LayoutConfig) -> Result<Self, ArrayError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    fn header_layout(&self) -> Result<Layout, ArrayError> {
        Layout::from_size_align(self.config.header_bytes, self.config.object_alignment)
            .map_err(invalidate!())
    }

    fn element_layout(element_size: usize, length: u64) -> Result<Layout, ArrayError> {
        if !element_size.is_power_of_two() {
            return Err(invalid!("element size {element_size} is not a power of two"));
        }

        let length = usize::try_from(length)
            .map_err(|_| invalid!("array length {length} does not fit in memory"))?;

        let size = element_size
            .checked_mul(length)
            .ok_or_else(|| invalid!("{length} elements of {element_size} bytes overflow"))?;

        Layout::from_size_align(size, element_size).map_err(invalidate!())
    }

    /// Offset of the first element in a standalone array of this kind.
    pub fn elements_offset(&self, kind: ArrayKind) -> Result<usize, ArrayError> {
        let (_, offset) = self
            .header_layout()?
            .extend(Self::element_layout(kind.element_size(), 0)?)
            .map_err(invalidate!())?;

        Ok(offset)
    }
}

impl FootprintModel for ObjectModel {
    fn standalone(&self, element_size: usize, length: u64) -> Result<u64, ArrayError> {
        let (layout, _) = self
            .header_layout()?
            .extend(Self::element_layout(element_size, length)?)
            .map_err(invalidate!())?;

        let size = layout.pad_to_align().size() as u64;
        trace!(element_size, length, size, "standalone footprint");
        Ok(size)
    }

    fn contained(&self, element_size: usize, length: u64) -> Result<u64, ArrayError> {
        let size = Self::element_layout(element_size, length)?
            .pad_to_align()
            .size() as u64;

        trace!(element_size, length, size, "contained footprint");
        Ok(size)
    }
}

/// Footprint of an array of `kind` holding `length` elements.
pub fn footprint(
    model: &dyn FootprintModel,
    kind: ArrayKind,
    length: i64,
    contained: bool,
) -> Result<u64, ArrayError> {
    let length = u64::try_from(length).map_err(|_| invalid!("negative array length {length}"))?;
    model.footprint(kind.element_size(), length, contained)
}
