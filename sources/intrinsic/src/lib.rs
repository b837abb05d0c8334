//! Factory-only construction of fixed length arrays.
//!
//! Arrays are built exclusively through [`ArrayFactory`]: it classifies the
//! array by element kind, computes the footprint the array would occupy and
//! passes the requested length to the array's constructor as a
//! [`ArrayInit`](object::header::ArrayInit) token that nothing else can
//! create.

pub mod error;
pub mod factory;
pub mod object;

pub use error::ArrayError;
pub use factory::{copy_instance, new_instance, ArrayFactory};
pub use support::kind::ArrayKind;
