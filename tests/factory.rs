mod common;

use std::any::Any;

use anyhow::{anyhow, Result};
use common::factory;
use intrinsic::{
    object::{
        builtins::{
            ByteArray, CharArray, DoubleArray, FloatArray, IntArray, LongArray, ReferenceArray,
            ShortArray,
        },
        class::{ArrayClass, ClassRegistry},
        layout::footprint,
        header::{ArrayHeader, ArrayInit},
        AnyArray, ArrayType, CopyableArray,
    },
    ArrayError, ArrayKind,
};

/// An array defined outside the crate: pairs of coordinates stored as longs.
#[derive(Debug)]
struct PointArray {
    header: ArrayHeader,
    xs: Vec<i64>,
    ys: Vec<i64>,
}

impl ArrayType for PointArray {
    type Element = i64;

    fn type_name() -> &'static str {
        "PointArray"
    }

    fn header(&self) -> &ArrayHeader {
        &self.header
    }

    fn construct(init: ArrayInit<'_>) -> Result<Self> {
        let length = init.length();
        Ok(Self {
            header: ArrayHeader::new(init),
            xs: vec![0; length],
            ys: vec![0; length],
        })
    }
}

impl CopyableArray for PointArray {
    fn construct_copy(init: ArrayInit<'_>, source: &Self) -> Result<Self> {
        Ok(Self {
            header: ArrayHeader::new(init),
            xs: source.xs.clone(),
            ys: source.ys.clone(),
        })
    }
}

/// An array whose constructor always fails.
#[derive(Debug)]
struct BrokenArray {
    header: ArrayHeader,
}

impl ArrayType for BrokenArray {
    type Element = i32;

    fn type_name() -> &'static str {
        "BrokenArray"
    }

    fn header(&self) -> &ArrayHeader {
        &self.header
    }

    fn construct(init: ArrayInit<'_>) -> Result<Self> {
        if init.length() > 0 {
            return Err(anyhow!("broken arrays must be empty"));
        }

        Ok(Self {
            header: ArrayHeader::new(init),
        })
    }
}

fn check_new<A: ArrayType>(lengths: &[i64]) -> Result<(), ArrayError> {
    let factory = factory();
    for &length in lengths {
        let array = factory.create_new::<A>(length)?;
        assert_eq!(array.len() as i64, length, "{}", A::type_name());
    }

    Ok(())
}

#[test]
fn every_kind_creates_the_requested_length() -> Result<(), ArrayError> {
    let lengths = [0, 1, 2, 7, 64, 1000];

    check_new::<ByteArray>(&lengths)?;
    check_new::<CharArray>(&lengths)?;
    check_new::<ShortArray>(&lengths)?;
    check_new::<IntArray>(&lengths)?;
    check_new::<FloatArray>(&lengths)?;
    check_new::<LongArray>(&lengths)?;
    check_new::<DoubleArray>(&lengths)?;
    check_new::<ReferenceArray>(&lengths)?;
    check_new::<PointArray>(&lengths)?;

    Ok(())
}

#[test]
fn negative_lengths_never_construct() {
    let factory = factory();

    for length in [-1, -2, -1000, i64::MIN] {
        let err = factory.create_new::<IntArray>(length).unwrap_err();
        assert!(err.is_invalid_argument(), "{err}");

        let err = factory.footprint_of::<IntArray>(length, false).unwrap_err();
        assert!(err.is_invalid_argument(), "{err}");
    }
}

#[test]
fn negative_lengths_are_rejected_before_the_constructor_runs() {
    let factory = factory();
    let mut called = false;

    let err = factory
        .create_with(-5, |init| {
            called = true;
            IntArray::construct(init)
        })
        .unwrap_err();

    assert!(err.is_invalid_argument());
    assert!(!called);
}

#[test]
fn copies_are_distinct_with_the_same_length() -> Result<(), ArrayError> {
    let factory = factory();

    let mut source = factory.create_new::<DoubleArray>(3)?;
    source.as_mut_slice().copy_from_slice(&[0.5, 1.5, 2.5]);

    let mut copy = factory.create_copy(&source)?;
    assert_eq!(copy.len(), source.len());
    assert_eq!(copy.as_slice(), source.as_slice());
    assert!(!std::ptr::eq(&copy, &source));
    assert_eq!(copy.type_id(), source.type_id());

    copy.as_mut_slice()[0] = 9.0;
    assert_eq!(source.as_slice()[0], 0.5);

    Ok(())
}

#[test]
fn external_copy_constructors_copy_their_own_data() -> Result<(), ArrayError> {
    let factory = factory();

    let mut source = factory.create_new::<PointArray>(2)?;
    source.xs.copy_from_slice(&[1, 2]);
    source.ys.copy_from_slice(&[3, 4]);

    let copy = factory.create_copy(&source)?;
    assert_eq!(copy.len(), 2);
    assert_eq!(copy.xs, vec![1, 2]);
    assert_eq!(copy.ys, vec![3, 4]);

    Ok(())
}

#[test]
fn external_arrays_classify_by_element_type() {
    assert_eq!(PointArray::KIND, ArrayKind::Long);
    assert_eq!(BrokenArray::KIND, ArrayKind::Int);
}

#[test]
fn constructor_failures_surface_as_construction_errors() {
    let factory = factory();

    let err = factory.create_new::<BrokenArray>(3).unwrap_err();
    match err {
        ArrayError::Construction {
            type_name, length, ..
        } => {
            assert_eq!(type_name, "BrokenArray");
            assert_eq!(length, 3);
        }
        other => panic!("expected a construction error, got {other}"),
    }

    // A failed attempt leaves nothing behind for the next one
    let empty = factory.create_new::<BrokenArray>(0).unwrap();
    assert!(empty.is_empty());
}

#[test]
fn unallocatable_lengths_fail_without_aborting() {
    let factory = factory();

    // Both exceed any user address space but still have a valid footprint
    for (length, err) in [
        (1 << 48, factory.create_new::<ByteArray>(1 << 48).unwrap_err()),
        (1 << 45, factory.create_new::<LongArray>(1 << 45).unwrap_err()),
    ] {
        assert!(err.is_construction(), "{err}");
        match err {
            ArrayError::Construction { length: got, .. } => assert_eq!(got, length),
            other => panic!("expected a construction error, got {other}"),
        }
    }

    assert!(factory.footprint_of::<ByteArray>(1 << 48, false).is_ok());
    assert_eq!(factory.create_new::<ByteArray>(8).unwrap().len(), 8);
}

#[test]
fn constructors_must_build_their_own_header() {
    let factory = factory();

    let err = factory
        .create_with(4, |_init| Ok(intrinsic::new_instance::<IntArray>(4)?))
        .unwrap_err();

    assert!(err.is_illegal_construction(), "{err}");

    // The factory is still usable afterwards
    assert_eq!(factory.create_new::<IntArray>(4).unwrap().len(), 4);
}

#[test]
fn runtime_classes_create_and_copy() -> Result<(), ArrayError> {
    let factory = factory();
    let registry = ClassRegistry::global();

    for kind in ArrayKind::ALL {
        let class = registry.for_descriptor(&kind.descriptor())?;
        let array = factory.create_new_dyn(&class, 5)?;
        assert_eq!(array.len(), 5);
        assert_eq!(array.kind(), kind);
        assert_eq!(array.footprint(), footprint(factory.model(), kind, 5, false)?);

        let copy = factory.create_copy_dyn(&class, &*array)?;
        assert_eq!(copy.len(), 5);
        assert_eq!(copy.as_any().type_id(), array.as_any().type_id());
    }

    Ok(())
}

#[test]
fn registered_external_classes_are_reachable() -> Result<(), ArrayError> {
    let registry = ClassRegistry::new();
    registry.register(ArrayClass::copyable::<PointArray>("[J"))?;

    let class = registry.for_descriptor("[J")?;
    let array = factory().create_new_dyn(&class, 6)?;

    let points = array.downcast_ref::<PointArray>().expect("a point array");
    assert_eq!(points.xs.len(), 6);

    Ok(())
}

#[test]
fn classes_without_a_copy_constructor_cannot_copy() -> Result<(), ArrayError> {
    let factory = factory();
    let class = ArrayClass::constructible::<PointArray>("[J");

    let source = factory.create_new_dyn(&class, 1)?;
    let err = factory.create_copy_dyn(&class, &*source).unwrap_err();
    assert!(err.is_construction());

    Ok(())
}

#[test]
fn reference_arrays_hold_shared_referents() -> Result<(), ArrayError> {
    let factory = factory();
    let mut array = factory.create_new::<ReferenceArray>(2)?;

    let value: std::sync::Arc<dyn Any + Send + Sync> = std::sync::Arc::new("hello");
    array.as_mut_slice()[1] = Some(value);

    let copy = factory.create_copy(&array)?;
    assert!(copy.get(0).unwrap().is_none());

    let copied = copy.get(1).unwrap().as_ref().unwrap();
    assert_eq!(copied.downcast_ref::<&str>(), Some(&"hello"));

    Ok(())
}
