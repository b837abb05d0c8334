#![allow(dead_code)]

use std::sync::Mutex;

use intrinsic::{
    object::layout::{LayoutConfig, ObjectModel},
    ArrayFactory,
};
use tracing::Level;
use tracing_subscriber::fmt;

lazy_static::lazy_static! {
    static ref TRACING: Mutex<bool> = Mutex::new(false);
}

/// Install a test-friendly subscriber once per test binary.
pub fn init_tracing() {
    let mut installed = TRACING.lock().expect("tracing lock to be not poisoned");
    if *installed {
        return;
    }

    let format = fmt::format()
        .with_ansi(false)
        .without_time()
        .with_level(true)
        .with_target(false)
        .compact();

    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::TRACE)
        .event_format(format)
        .with_test_writer()
        .try_init();

    *installed = true;
}

pub fn factory() -> ArrayFactory {
    init_tracing();
    ArrayFactory::default()
}

/// A model without alignment padding, so footprints are exactly
/// `header + elements`.
pub fn unaligned_model(header_bytes: usize) -> ObjectModel {
    ObjectModel::new(LayoutConfig {
        header_bytes,
        object_alignment: 1,
    })
    .expect("alignment of 1 to be valid")
}
