use std::cell::Cell;

/// Progress of a single factory construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InitState {
    Pending,
    Redeemed,
}

/// The length (and footprint) handed to an array constructor by the factory.
///
/// A token is only ever created by [`ArrayFactory`](crate::factory::ArrayFactory)
/// and borrows state owned by that factory call, so it cannot outlive the
/// call, be sent to another thread, or be stashed for later use. Redeeming it
/// with [`ArrayHeader::new`] is the only way to produce an [`ArrayHeader`].
///
/// ```compile_fail
/// use intrinsic::object::header::ArrayInit;
///
/// // The fields are private; tokens cannot be forged.
/// let init = ArrayInit {
///     length: 4,
///     footprint: 32,
///     state: todo!(),
/// };
/// ```
#[derive(Debug)]
#[must_use = "an array constructor must redeem its construction token"]
pub struct ArrayInit<'f> {
    length: usize,
    footprint: u64,
    state: &'f Cell<InitState>,
}

impl<'f> ArrayInit<'f> {
    pub(crate) fn new(length: usize, footprint: u64, state: &'f Cell<InitState>) -> Self {
        Self {
            length,
            footprint,
            state,
        }
    }

    /// The length the new array must have.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Standalone footprint computed for this construction, in bytes.
    pub fn footprint(&self) -> u64 {
        self.footprint
    }
}

/// The state every array carries: its length, fixed at construction, and
/// the footprint the factory computed for it.
///
/// ```compile_fail
/// use intrinsic::object::header::ArrayHeader;
///
/// // Headers can only come from a construction token.
/// let header = ArrayHeader {
///     length: 4,
///     footprint: 32,
/// };
/// ```
#[derive(Debug, PartialEq, Eq)]
pub struct ArrayHeader {
    length: usize,
    footprint: u64,
}

impl ArrayHeader {
    pub fn new(init: ArrayInit<'_>) -> Self {
        init.state.set(InitState::Redeemed);
        Self {
            length: init.length,
            footprint: init.footprint,
        }
    }

    /// Standalone footprint the factory computed when this array was created.
    pub fn footprint(&self) -> u64 {
        self.footprint
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}
