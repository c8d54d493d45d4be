//! Core building blocks: validated run parameters, the tag mapping and the
//! converters that fill it from input tables or command-line pairs. These are
//! consumed by the high-level `api` module.
pub mod convert;
pub mod params;
pub mod tags;
