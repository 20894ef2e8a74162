//! Masking-based multiparty primitives on encrypted values.
//!
//! All the primitives are batched: they take slices of ciphertexts and run a
//! fixed number of exchanges regardless of the batch length. They are methods
//! of [`crate::Party`]:
//! - [`Party::threshold_decrypt`](crate::Party::threshold_decrypt);
//! - [`Party::additive_share`](crate::Party::additive_share);
//! - [`Party::secure_multiply`](crate::Party::secure_multiply);
//! - [`Party::zero_test`](crate::Party::zero_test);
//! - [`Party::masked_inverse`](crate::Party::masked_inverse) and, for schemes
//!   with a native multiplication,
//!   [`Party::secure_inverse`](crate::Party::secure_inverse).
//!
//! The [`Arithmetic`] trait selects between the interactive multiplication
//! and inversion and the native ones of a multiplicative scheme.

mod arithmetic;
mod decrypt;
mod inverse;
mod multiply;
mod sharing;

pub use arithmetic::{Arithmetic, Interactive, Native};
