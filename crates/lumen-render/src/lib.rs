pub mod cascade;
pub mod composite;
pub mod emission;
pub mod fields;
pub mod merge;
pub mod obstacle;
pub mod radiance;
#[cfg(not(target_arch = "wasm32"))]
pub mod readback;

mod bindings;
mod passes;

pub use fields::{FieldHandle, FieldRegistry, RADIANCE_FORMAT};
pub use radiance::RadiancePipeline;
