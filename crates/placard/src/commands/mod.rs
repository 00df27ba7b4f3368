//! CLI command implementations.

mod common;
pub(crate) mod fill;
pub(crate) mod generate;
pub(crate) mod markers;
pub(crate) mod sweep;

pub(crate) use fill::FillArgs;
pub(crate) use generate::GenerateArgs;
pub(crate) use markers::MarkersArgs;
pub(crate) use sweep::SweepArgs;
