//! `EventScheduler`: decides which agents act during a tick, and in which
//! order.
//!
//! # Agent cycle
//!
//! ```text
//! SCHEDULED ──(time < tick end)──▶ DUE ──pop──▶ ACTING ──step──▶ RESCHEDULED ──push──▶ SCHEDULED
//! ```
//!
//! An agent is `SCHEDULED` while its entry sits in the queue.  `advance`
//! pops it once it is `DUE`, runs the step model (`ACTING`), advances its
//! next-step time by the returned duration and pushes it back
//! (`RESCHEDULED`).  An agent may act several times within one tick if its
//! steps are shorter than the tick.
//!
//! # Consistency
//!
//! The scheduler is a registry listener: its entry set is always exactly
//! the live agent set.  It never adds or removes entries on its own.

use log::{debug, trace};

use crowd_agent::{Agent, ElementListener, ListenerResult, Registry};
use crowd_core::{AgentId, SimTime};
use crowd_spatial::SpatialGrid;

use crate::{EventQueue, ScheduleError, ScheduleResult, StepModel};

/// Event-driven update scheme over an [`EventQueue`].
#[derive(Debug)]
pub struct EventScheduler {
    queue: EventQueue,
    /// Start of the tick being (or next to be) processed.  Agents without a
    /// next-step time are scheduled here on insertion.
    current_time: SimTime,
}

impl EventScheduler {
    pub fn new(start_time: SimTime) -> Self {
        Self { queue: EventQueue::new(), current_time: start_time }
    }

    pub fn current_time(&self) -> SimTime {
        self.current_time
    }

    /// Number of scheduled agents.  Equals the registry's live count.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn contains(&self, agent: AgentId) -> bool {
        self.queue.contains(agent)
    }

    /// Next-step time recorded for `agent`.
    pub fn next_step_time(&self, agent: AgentId) -> Option<SimTime> {
        self.queue.time_of(agent)
    }

    /// Read-only view of the underlying queue.
    pub fn queue(&self) -> &EventQueue {
        &self.queue
    }

    /// Step every agent whose next-step time is strictly before `until`.
    ///
    /// Agents are processed in ascending `(next_step_time, id)` order; an
    /// agent whose new time is still before `until` is processed again in
    /// the same call.  Returns the number of steps performed.
    ///
    /// # Errors
    ///
    /// Any error aborts the tick; the popped agent is not re-queued.
    ///
    /// - [`ScheduleError::Dangling`] if an entry has no registry record.
    /// - [`ScheduleError::InvalidStepDuration`] if the step model returns a
    ///   non-finite or non-positive duration.
    /// - [`ScheduleError::Spatial`] if re-bucketing fails.
    pub fn advance<S: StepModel>(
        &mut self,
        until:    SimTime,
        registry: &mut Registry,
        grid:     &mut SpatialGrid,
        stepper:  &mut S,
    ) -> ScheduleResult<usize> {
        let mut steps = 0usize;

        while let Some(head) = self.queue.peek() {
            if head.time >= until {
                break;
            }
            // DUE → ACTING
            self.queue.pop();
            let agent = registry
                .get_mut(head.agent)
                .ok_or(ScheduleError::Dangling(head.agent))?;

            let old_position = agent.position;
            let duration = stepper.step(agent, head.time);
            if !duration.is_finite() || duration <= 0.0 {
                return Err(ScheduleError::InvalidStepDuration { agent: head.agent, duration });
            }

            // RESCHEDULED
            let next = head.time + duration;
            agent.next_step_time = Some(next);
            grid.move_agent(head.agent, old_position, agent.position)?;
            self.queue.push(head.agent, next);
            trace!("scheduler: {} stepped at {:.3}, next {:.3}", head.agent, head.time, next);
            steps += 1;
        }

        self.current_time = self.current_time.max(until);
        debug!("scheduler: advanced to {until:.3} ({steps} steps, {} agents)", self.queue.len());
        Ok(steps)
    }
}

impl ElementListener for EventScheduler {
    fn name(&self) -> &'static str {
        "event-scheduler"
    }

    fn on_added(&mut self, agent: &mut Agent) -> ListenerResult {
        let time = *agent.next_step_time.get_or_insert(self.current_time);
        if !time.is_finite() {
            return Err(ScheduleError::InvalidTime { agent: agent.id(), time }.into());
        }
        if !self.queue.push(agent.id(), time) {
            return Err(ScheduleError::AlreadyScheduled(agent.id()).into());
        }
        Ok(())
    }

    fn on_removed(&mut self, agent: &Agent) -> ListenerResult {
        match self.queue.remove(agent.id()) {
            Some(_) => Ok(()),
            None => Err(ScheduleError::NotScheduled(agent.id()).into()),
        }
    }
}
