//! Cardinality test: decide whether at most T elements lie outside the
//! intersection of the sets, without revealing anything else.
//!
//! The parties build an encrypted Hankel matrix whose rank is the number of
//! elements outside the intersection, and test it for singularity.

mod hankel;
mod singularity;

pub use hankel::{hankel_contribution, hankel_matrix};
