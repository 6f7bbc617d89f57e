// src/handler/registry.rs

//! Fixed table from build type to handler constructor.
//!
//! Populated once on first use and never mutated afterwards.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::errors::{ExecutorError, Result};
use crate::handler::echo::new_echo;
use crate::handler::sandbox_handler::{
    new_cc, new_custom, new_finder, new_texture_compressor, new_ue4,
};
use crate::handler::Handler;
use crate::types::BuildType;

type Constructor = fn() -> Result<Box<dyn Handler>>;

static HANDLERS: LazyLock<HashMap<BuildType, Constructor>> = LazyLock::new(|| {
    HashMap::from([
        (BuildType::Cc, new_cc as Constructor),
        (BuildType::Find, new_finder as Constructor),
        (BuildType::Tc, new_texture_compressor as Constructor),
        (BuildType::Ue4, new_ue4 as Constructor),
        (BuildType::Echo, new_echo as Constructor),
        (BuildType::Custom, new_custom as Constructor),
    ])
});

/// Construct the handler registered for `build_type`.
///
/// Unregistered types fail with [`ExecutorError::UnknownHandler`]; a failing
/// constructor's error is returned unchanged.
pub fn get_handler(build_type: &BuildType) -> Result<Box<dyn Handler>> {
    match HANDLERS.get(build_type) {
        Some(construct) => construct(),
        None => Err(ExecutorError::UnknownHandler(build_type.clone())),
    }
}

/// Every build type with a registered handler.
pub fn registered_types() -> impl Iterator<Item = &'static BuildType> {
    HANDLERS.keys()
}
