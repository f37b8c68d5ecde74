//! Substring checks against captured command output.

use crate::error::{Error, Result};

/// Succeeds iff every fragment in `expected` occurs in `output`.
///
/// Fragments are checked in order and the first one missing is reported,
/// together with the full output.
pub fn verify<S: AsRef<str>>(output: &str, expected: &[S]) -> Result<()> {
    match first_missing(output, expected) {
        Some(missing) => Err(Error::command_output_mismatch(missing, output)),
        None => Ok(()),
    }
}

/// First fragment of `expected` not contained in `output`.
pub fn first_missing<'a, S: AsRef<str>>(output: &str, expected: &'a [S]) -> Option<&'a str> {
    expected
        .iter()
        .map(AsRef::as_ref)
        .find(|fragment| !output.contains(fragment))
}
