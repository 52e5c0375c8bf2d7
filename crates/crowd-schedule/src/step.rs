//! The `StepModel` trait: the seam to the locomotion collaborator.
//!
//! The scheduler only decides *when* and in *which order* agents step.  How
//! far an agent moves and how long the step takes belong to the locomotion
//! model plugged in here.

use crowd_agent::Agent;
use crowd_core::SimTime;

/// Pluggable per-agent stepping.
///
/// # Contract
///
/// - May change `agent.position`; the scheduler re-buckets the agent in the
///   spatial grid afterwards.
/// - Must not touch `agent.next_step_time`; the scheduler owns it.
/// - Returns the duration of the step, which must be finite and `> 0`.
///   Anything else aborts the tick with
///   [`ScheduleError::InvalidStepDuration`](crate::ScheduleError::InvalidStepDuration).
pub trait StepModel {
    /// Perform one step of `agent` starting at logical time `at`.
    fn step(&mut self, agent: &mut Agent, at: SimTime) -> SimTime;
}

impl<S: StepModel + ?Sized> StepModel for &mut S {
    fn step(&mut self, agent: &mut Agent, at: SimTime) -> SimTime {
        (**self).step(agent, at)
    }
}

/// Agents never move; every step takes `step_duration` seconds.
///
/// Useful as a placeholder in tests or for populations that only take part
/// in group dynamics.
pub struct StandStill {
    pub step_duration: SimTime,
}

impl StepModel for StandStill {
    fn step(&mut self, _agent: &mut Agent, _at: SimTime) -> SimTime {
        self.step_duration
    }
}

/// Straight-line walking towards `agent.target` with a fixed stride.
///
/// Each step covers `min(step_length, remaining)` metres and lasts
/// `step_length / desired_speed` seconds, so slow agents step less often.
/// Agents without a target, or already at it, stay put for one stride.
/// A non-positive speed yields an infinite duration, which the scheduler
/// rejects.
pub struct ConstantVelocity {
    pub step_length: f64,
}

impl StepModel for ConstantVelocity {
    fn step(&mut self, agent: &mut Agent, _at: SimTime) -> SimTime {
        if let Some(target) = agent.target {
            let remaining = agent.position.distance(target);
            if remaining <= self.step_length {
                agent.position = target;
            } else if remaining > 0.0 {
                let f = self.step_length / remaining;
                agent.position.x += (target.x - agent.position.x) * f;
                agent.position.y += (target.y - agent.position.y) * f;
            }
        }
        if agent.desired_speed > 0.0 {
            self.step_length / agent.desired_speed
        } else {
            SimTime::INFINITY
        }
    }
}
