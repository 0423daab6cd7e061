/// Element types.
///
/// Defines `ElementType`, the closed set of types reported by lookups and
/// produced by values, including the `NotExists` sentinel.
pub mod element_type;

pub mod core;
