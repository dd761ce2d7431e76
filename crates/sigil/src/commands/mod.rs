//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod sigils;
pub(crate) mod transpile;

pub(crate) use build::BuildArgs;
pub(crate) use sigils::SigilsArgs;
pub(crate) use transpile::TranspileArgs;
