//! Normalization of terms from command files.
//!
//! This crate connects the parser to the kernel:
//! it scopes parsed terms against declared symbols,
//! provides scalars and labels as leaves, and
//! processes commands in a [`Session`].

mod atom;
mod error;
mod opt;
pub mod scalar;
pub mod scope;
mod session;

pub use atom::Atom;
pub use error::Error;
pub use opt::Opt;
pub use scalar::Scalar;
pub use scope::Scope;
pub use session::{Output, Session};
