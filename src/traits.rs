//! Core trait for matrix element types
//!
//! This module defines the fundamental abstraction used throughout the crate:
//! [`Scalar`], the bound on element types stored in a sparse matrix.

use num_traits::Zero;
use std::fmt::{Debug, Display};
use std::ops::{Add, AddAssign, Mul};

/// Trait for element types that can be stored in a sparse matrix.
///
/// The storage engine needs a commutative-ring-like capability set from its
/// elements: a zero value (the implicit value of every unstored position),
/// equality (to keep the representation canonical, zeros are evicted rather
/// than stored), and addition and multiplication for the matrix products and
/// sums. `Display` is required so matrices can be printed as a dense grid.
///
/// # Implementations
///
/// A blanket implementation covers every type with the required bounds, so
/// `f64`, `f32`, integer types, and `num_complex::Complex64` all work without
/// further ceremony.
pub trait Scalar:
    Copy
    + PartialEq
    + Debug
    + Display
    + Send
    + Sync
    + Zero
    + Add<Output = Self>
    + AddAssign
    + Mul<Output = Self>
    + 'static
{
}

impl<T> Scalar for T where
    T: Copy
        + PartialEq
        + Debug
        + Display
        + Send
        + Sync
        + Zero
        + Add<Output = Self>
        + AddAssign
        + Mul<Output = Self>
        + 'static
{
}
