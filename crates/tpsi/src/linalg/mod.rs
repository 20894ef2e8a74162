//! Encrypted linear algebra and polynomials.
//!
//! [`EncryptedMatrix`], [`EncryptedPolynomial`] and
//! [`RationalEncryptedPolynomial`] only support the operations that the
//! parties can compute locally with the homomorphic properties of the
//! scheme. Operations that need the other parties, such as the masked matrix
//! product or the threshold decryption of a matrix, are methods of
//! [`crate::Party`].

mod matrix;
mod polynomial;
mod product;
mod rational;

pub use matrix::EncryptedMatrix;
pub use polynomial::EncryptedPolynomial;
pub use rational::{Denominator, RationalEncryptedPolynomial};
