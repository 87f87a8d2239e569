pub mod clock;
pub mod context;
pub mod loop_control;
pub mod orchestrator;
pub mod status;

pub use clock::{FrameClock, FrameState, FrameTiming};
pub use context::DeviceContext;
pub use loop_control::LoopControl;
pub use orchestrator::{FrameOrchestrator, FrameStats};
pub use status::pointer_status;
