/// Numeric conversion helpers.
///
/// Provides safe conversion from integers to the 64-bit floats templates
/// compute with, without risking silent rounding.
pub mod num;
