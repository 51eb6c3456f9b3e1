//! Derived read-only statistics over the attendance map.

pub mod percentage;
