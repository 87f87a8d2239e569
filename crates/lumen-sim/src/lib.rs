pub mod agents;
pub mod kernel;
pub mod pipeline;

mod passes;
mod rng;

pub use agents::{seed_agents, AgentStore};
pub use pipeline::SimPipeline;
