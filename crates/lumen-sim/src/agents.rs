use lumen_core::constants::INITIAL_SPEED_RANGE;
use lumen_core::obstacle::ObstacleMask;
use lumen_core::types::Agent;
use wgpu::util::DeviceExt;

use crate::rng::{agent_hash, hash_to_signed};

/// Redraws allowed before an agent is left on a blocked cell.
const PLACEMENT_ATTEMPTS: u32 = 32;

/// Deterministic initial agents: positions in [-1, 1]^2 on free cells of
/// `mask`, small random velocities. A position landing on a blocked cell is
/// redrawn from the next pair of hash streams.
pub fn seed_agents(count: u32, seed: u32, mask: &ObstacleMask) -> Vec<Agent> {
    (0..count)
        .map(|i| {
            let draw = |attempt: u32| {
                // Streams 2 and 3 belong to the velocity.
                let stream = if attempt == 0 { 0 } else { 2 + 2 * attempt };
                [
                    hash_to_signed(agent_hash(i, seed, stream), 1.0),
                    hash_to_signed(agent_hash(i, seed, stream + 1), 1.0),
                ]
            };
            let position = (0..PLACEMENT_ATTEMPTS)
                .map(draw)
                .find(|&p| !mask.is_blocked_ndc(p))
                .unwrap_or_else(|| {
                    log::warn!("seed_agents: no free cell found for agent {i}");
                    draw(0)
                });
            let velocity = [
                hash_to_signed(agent_hash(i, seed, 2), INITIAL_SPEED_RANGE),
                hash_to_signed(agent_hash(i, seed, 3), INITIAL_SPEED_RANGE),
            ];
            Agent::new(position, velocity)
        })
        .collect()
}

/// GPU-resident agent records.
///
/// Capacity is fixed at creation. The buffer always holds at least one
/// record so it can be bound even when the scene has no agents; the
/// active count decides how many records the kernels touch.
pub struct AgentStore {
    buffer: wgpu::Buffer,
    capacity: u32,
    count: u32,
}

impl AgentStore {
    pub fn new(device: &wgpu::Device, agents: &[Agent]) -> Self {
        let count = agents.len() as u32;
        let contents: Vec<Agent> = if agents.is_empty() {
            vec![Agent::default()]
        } else {
            agents.to_vec()
        };
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("agent-buffer"),
            contents: bytemuck::cast_slice(&contents),
            usage: wgpu::BufferUsages::STORAGE
                | wgpu::BufferUsages::COPY_DST
                | wgpu::BufferUsages::COPY_SRC,
        });
        log::info!(
            "AgentStore: {} agents, {} bytes",
            count,
            contents.len() * std::mem::size_of::<Agent>()
        );
        Self {
            buffer,
            capacity: contents.len() as u32,
            count,
        }
    }

    /// Overwrite the leading records and make exactly those active.
    /// Records beyond capacity are dropped with a warning.
    pub fn write_agents(&mut self, queue: &wgpu::Queue, agents: &[Agent]) {
        let n = agents.len().min(self.capacity as usize);
        if n < agents.len() {
            log::warn!(
                "AgentStore: {} agents exceed capacity {}, truncating",
                agents.len(),
                self.capacity
            );
        }
        if n > 0 {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&agents[..n]));
        }
        self.count = n as u32;
    }

    /// Change how many records are active without touching their contents.
    pub fn set_active_count(&mut self, count: u32) {
        self.count = count.min(self.capacity);
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Byte size of the active records.
    pub fn active_bytes(&self) -> u64 {
        self.count as u64 * std::mem::size_of::<Agent>() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::constants::AGENT_SEED;
    use lumen_core::obstacle::DEFAULT_OBSTACLES;
    use lumen_core::types::Resolution;

    fn open_mask() -> ObstacleMask {
        ObstacleMask::rasterize(Resolution::new(64, 64), &[])
    }

    #[test]
    fn test_seed_is_reproducible() {
        let mask = open_mask();
        assert_eq!(seed_agents(10, 42, &mask), seed_agents(10, 42, &mask));
        assert_ne!(seed_agents(10, 42, &mask), seed_agents(10, 43, &mask));
    }

    #[test]
    fn test_seed_ranges() {
        for agent in seed_agents(256, 9, &open_mask()) {
            for p in agent.position {
                assert!((-1.0..1.0).contains(&p), "position {p}");
            }
            for v in agent.velocity {
                assert!(v.abs() <= INITIAL_SPEED_RANGE, "velocity {v}");
            }
        }
    }

    #[test]
    fn test_seed_zero_count() {
        assert!(seed_agents(0, 1, &open_mask()).is_empty());
    }

    #[test]
    fn test_default_scene_seeds_on_free_cells() {
        for res in [Resolution::new(640, 480), Resolution::new(64, 64)] {
            let mask = ObstacleMask::rasterize(res, &DEFAULT_OBSTACLES);
            for (i, agent) in seed_agents(1000, AGENT_SEED, &mask).iter().enumerate() {
                assert!(
                    !mask.is_blocked_ndc(agent.position),
                    "agent {i} seeded inside an obstacle at {:?}",
                    agent.position
                );
            }
        }
    }

    #[test]
    fn test_free_first_draw_is_kept() {
        let open = seed_agents(50, 7, &open_mask());
        let mask = ObstacleMask::rasterize(Resolution::new(64, 64), &DEFAULT_OBSTACLES);
        let walled = seed_agents(50, 7, &mask);
        for (a, b) in open.iter().zip(&walled) {
            if !mask.is_blocked_ndc(a.position) {
                assert_eq!(a, b);
            }
        }
    }
}
