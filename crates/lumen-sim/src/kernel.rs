//! CPU mirror of shaders/sim/agents.wgsl.
//!
//! Used by tests and the headless report to predict agent motion; must
//! stay step-for-step identical to the WGSL kernel.

use glam::Vec2;
use lumen_core::constants::{OBSTACLE_PROBE_TEXELS, OBSTACLE_RESTITUTION, STEER_EPSILON};
use lumen_core::math::clamp_speed;
use lumen_core::obstacle::ObstacleMask;
use lumen_core::params::SimParams;
use lumen_core::types::Agent;

fn ndc_blocked(mask: &ObstacleMask, ndc: Vec2) -> bool {
    mask.is_blocked_ndc(ndc.into())
}

fn deflect(mask: &ObstacleMask, ahead: Vec2, velocity: Vec2) -> Vec2 {
    let res = mask.resolution();
    let probe = OBSTACLE_PROBE_TEXELS * 2.0 / Vec2::new(res.width as f32, res.height as f32);
    let open = |p: Vec2| if ndc_blocked(mask, p) { 0.0 } else { 1.0 };
    let normal = Vec2::new(
        open(ahead + Vec2::new(probe.x, 0.0)) - open(ahead - Vec2::new(probe.x, 0.0)),
        open(ahead + Vec2::new(0.0, probe.y)) - open(ahead - Vec2::new(0.0, probe.y)),
    );

    if normal.length() < 0.5 {
        return -velocity * OBSTACLE_RESTITUTION;
    }
    let n = normal.normalize();
    let approach = velocity.dot(n);
    if approach >= 0.0 {
        return velocity;
    }
    velocity - (1.0 + OBSTACLE_RESTITUTION) * approach * n
}

/// Advance one agent by one step.
pub fn step_agent(agent: Agent, params: &SimParams, mask: &ObstacleMask) -> Agent {
    let position = Vec2::from(agent.position);
    let mut velocity = Vec2::from(agent.velocity);
    let pointer = Vec2::from(params.pointer);

    let to_pointer = pointer - position;
    let dist = to_pointer.length();
    if dist > STEER_EPSILON {
        velocity += (to_pointer / dist) * params.accel_strength * params.dt;
    }

    let ahead = position + velocity * params.dt;
    if ndc_blocked(mask, ahead) {
        velocity = deflect(mask, ahead, velocity);
    }

    velocity = clamp_speed(velocity, params.max_speed);
    let mut next = position + velocity * params.dt;

    if next.x > 1.0 {
        next.x = 1.0;
        velocity.x = -velocity.x.abs();
    } else if next.x < -1.0 {
        next.x = -1.0;
        velocity.x = velocity.x.abs();
    }
    if next.y > 1.0 {
        next.y = 1.0;
        velocity.y = -velocity.y.abs();
    } else if next.y < -1.0 {
        next.y = -1.0;
        velocity.y = velocity.y.abs();
    }

    // A free agent never steps onto a blocked cell; it holds until steering
    // or the next deflection turns it away.
    if ndc_blocked(mask, next) && !ndc_blocked(mask, position) {
        next = position;
    }

    Agent::new(next.into(), velocity.into())
}

/// Advance the first `params.agent_count` agents in place.
pub fn step_agents(agents: &mut [Agent], params: &SimParams, mask: &ObstacleMask) {
    let n = (params.agent_count as usize).min(agents.len());
    for agent in &mut agents[..n] {
        *agent = step_agent(*agent, params, mask);
    }
}
