/*!
 * ACVP test-vector repository
 *
 * Parses the keyGen and encapDecap internal-projection files into typed test
 * groups. Each group's `function` selects a closed case type, so dispatch
 * never branches on strings after loading.
 */

mod model;
mod repository;

pub use model::*;
pub use repository::{VectorFile, VectorRepository};

#[cfg(test)]
mod tests;
