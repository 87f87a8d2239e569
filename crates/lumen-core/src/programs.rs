//! Program table: every WGSL program, including the small utility ones,
//! is composed here from the constants preamble plus its include list.

use crate::constants::{
    COMPOSITE_EXPOSURE, DIFFUSE_RADIUS, DIFFUSE_SIGMA, EMISSION_INTENSITY, EMISSION_PULSE_RATE,
    LEVEL_ENERGY, MERGE_WEIGHT, OBSTACLE_PROBE_TEXELS, OBSTACLE_RESTITUTION, STEER_EPSILON,
    TILE_SIZE, WORKGROUP_SIZE,
};

const TYPES_WGSL: &str = include_str!("../../../shaders/common/types.wgsl");
const COORDS_WGSL: &str = include_str!("../../../shaders/common/coords.wgsl");
const MASK_WGSL: &str = include_str!("../../../shaders/common/mask.wgsl");
const AGENTS_WGSL: &str = include_str!("../../../shaders/sim/agents.wgsl");
const CLEAR_WGSL: &str = include_str!("../../../shaders/radiance/clear.wgsl");
const EMIT_WGSL: &str = include_str!("../../../shaders/radiance/emit.wgsl");
const DIFFUSE_WGSL: &str = include_str!("../../../shaders/radiance/diffuse.wgsl");
const UPSAMPLE_WGSL: &str = include_str!("../../../shaders/radiance/upsample.wgsl");
const COMPOSITE_WGSL: &str = include_str!("../../../shaders/radiance/composite.wgsl");

/// Identifies one program in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgramId {
    Agents,
    Clear,
    Emit,
    Diffuse,
    Upsample,
    Composite,
}

impl ProgramId {
    pub const ALL: [ProgramId; 6] = [
        ProgramId::Agents,
        ProgramId::Clear,
        ProgramId::Emit,
        ProgramId::Diffuse,
        ProgramId::Upsample,
        ProgramId::Composite,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ProgramId::Agents => "agents-shader",
            ProgramId::Clear => "clear-shader",
            ProgramId::Emit => "emit-shader",
            ProgramId::Diffuse => "diffuse-shader",
            ProgramId::Upsample => "upsample-shader",
            ProgramId::Composite => "composite-shader",
        }
    }

    /// Compute entry point, or `None` for the render program.
    pub fn compute_entry(self) -> Option<&'static str> {
        match self {
            ProgramId::Composite => None,
            _ => Some("main"),
        }
    }

    fn parts(self) -> &'static [&'static str] {
        match self {
            ProgramId::Agents => &[TYPES_WGSL, COORDS_WGSL, MASK_WGSL, AGENTS_WGSL],
            ProgramId::Clear => &[CLEAR_WGSL],
            ProgramId::Emit => &[TYPES_WGSL, COORDS_WGSL, EMIT_WGSL],
            ProgramId::Diffuse => &[COORDS_WGSL, MASK_WGSL, DIFFUSE_WGSL],
            ProgramId::Upsample => &[COORDS_WGSL, MASK_WGSL, UPSAMPLE_WGSL],
            ProgramId::Composite => &[COMPOSITE_WGSL],
        }
    }
}

/// Vertex and fragment entry points of the composite program.
pub const COMPOSITE_VERTEX_ENTRY: &str = "vs_main";
pub const COMPOSITE_FRAGMENT_ENTRY: &str = "fs_main";

/// WGSL `const` declarations mirroring `constants.rs`.
pub fn constants_preamble() -> String {
    format!(
        "const WORKGROUP_SIZE: u32 = {WORKGROUP_SIZE}u;\n\
         const TILE_SIZE: u32 = {TILE_SIZE}u;\n\
         const STEER_EPSILON: f32 = {STEER_EPSILON:?};\n\
         const OBSTACLE_RESTITUTION: f32 = {OBSTACLE_RESTITUTION:?};\n\
         const OBSTACLE_PROBE_TEXELS: f32 = {OBSTACLE_PROBE_TEXELS:?};\n\
         const EMISSION_INTENSITY: f32 = {EMISSION_INTENSITY:?};\n\
         const EMISSION_PULSE_RATE: f32 = {EMISSION_PULSE_RATE:?};\n\
         const DIFFUSE_RADIUS: i32 = {DIFFUSE_RADIUS}i;\n\
         const DIFFUSE_SIGMA: f32 = {DIFFUSE_SIGMA:?};\n\
         const LEVEL_ENERGY: f32 = {LEVEL_ENERGY:?};\n\
         const MERGE_WEIGHT: f32 = {MERGE_WEIGHT:?};\n\
         const COMPOSITE_EXPOSURE: f32 = {COMPOSITE_EXPOSURE:?};\n"
    )
}

/// Composed source for every program, built once at setup.
#[derive(Debug, Clone)]
pub struct ProgramTable {
    sources: Vec<(ProgramId, String)>,
}

impl ProgramTable {
    pub fn load() -> Self {
        let preamble = constants_preamble();
        let sources = ProgramId::ALL
            .iter()
            .map(|&id| {
                let mut source = preamble.clone();
                for part in id.parts() {
                    source.push('\n');
                    source.push_str(part);
                }
                (id, source)
            })
            .collect();
        Self { sources }
    }

    pub fn source(&self, id: ProgramId) -> &str {
        self.sources
            .iter()
            .find(|(program, _)| *program == id)
            .map(|(_, source)| source.as_str())
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ProgramId, &str)> {
        self.sources.iter().map(|(id, s)| (*id, s.as_str()))
    }
}
