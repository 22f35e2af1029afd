//! Constants used throughout the PRM core crate.

/// Age (in full years) from which a user counts as an adult.
///
/// A user younger than this cannot be added as a representative, and a user
/// younger than this must always keep at least one active representative.
pub const ADULT_AGE_YEARS: u32 = 18;
