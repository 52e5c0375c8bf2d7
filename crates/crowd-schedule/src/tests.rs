//! Unit tests for crowd-schedule.

use std::cell::RefCell;
use std::rc::Rc;

use crowd_agent::{Agent, Registry};
use crowd_core::{AgentId, Point, Rect, SimTime};
use crowd_spatial::{GridConfig, SpatialGrid};

use crate::{EventScheduler, StepModel};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Step model that records `(agent, time)` for every step it performs.
struct Trace {
    duration: SimTime,
    steps:    Vec<(u32, SimTime)>,
}

impl Trace {
    fn new(duration: SimTime) -> Self {
        Self { duration, steps: Vec::new() }
    }

    fn order(&self) -> Vec<u32> {
        self.steps.iter().map(|&(id, _)| id).collect()
    }
}

impl StepModel for Trace {
    fn step(&mut self, agent: &mut Agent, at: SimTime) -> SimTime {
        self.steps.push((agent.id().0, at));
        self.duration
    }
}

struct World {
    registry:  Registry,
    grid:      Rc<RefCell<SpatialGrid>>,
    scheduler: Rc<RefCell<EventScheduler>>,
}

impl World {
    fn new(start: SimTime) -> Self {
        let grid = Rc::new(RefCell::new(
            SpatialGrid::new(GridConfig::new(Rect::new(0.0, 0.0, 10.0, 10.0), 1.0)).unwrap(),
        ));
        let scheduler = Rc::new(RefCell::new(EventScheduler::new(start)));
        let mut registry = Registry::new();
        registry.add_listener(grid.clone());
        registry.add_listener(scheduler.clone());
        Self { registry, grid, scheduler }
    }

    fn spawn(&mut self, id: u32, at: Option<SimTime>) {
        let mut a = Agent::new(AgentId(id), Point::new(1.0, 1.0));
        a.next_step_time = at;
        self.registry.add(a).unwrap();
    }

    fn advance<S: StepModel>(&mut self, until: SimTime, stepper: &mut S) -> crate::ScheduleResult<usize> {
        self.scheduler.borrow_mut().advance(
            until,
            &mut self.registry,
            &mut self.grid.borrow_mut(),
            stepper,
        )
    }
}

// ── EventQueue ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod queue {
    use super::*;
    use crate::EventQueue;

    #[test]
    fn pops_in_time_order() {
        let mut q = EventQueue::new();
        q.push(AgentId(1), 3.0);
        q.push(AgentId(2), 1.0);
        q.push(AgentId(3), 2.0);
        let order: Vec<u32> = std::iter::from_fn(|| q.pop()).map(|k| k.agent.0).collect();
        assert_eq!(order, vec![2, 3, 1]);
    }

    #[test]
    fn equal_times_pop_smaller_id_first() {
        for _ in 0..3 {
            let mut q = EventQueue::new();
            q.push(AgentId(7), 1.5);
            q.push(AgentId(3), 1.5);
            assert_eq!(q.pop().unwrap().agent, AgentId(3));
            assert_eq!(q.pop().unwrap().agent, AgentId(7));
            assert!(q.pop().is_none());
        }
    }

    #[test]
    fn duplicate_push_is_refused() {
        let mut q = EventQueue::new();
        assert!(q.push(AgentId(1), 1.0));
        assert!(!q.push(AgentId(1), 0.5));
        assert_eq!(q.len(), 1);
        assert_eq!(q.time_of(AgentId(1)), Some(1.0));
    }

    #[test]
    fn remove_from_middle() {
        let mut q = EventQueue::new();
        for (id, t) in [(1, 5.0), (2, 1.0), (3, 4.0), (4, 2.0), (5, 3.0)] {
            q.push(AgentId(id), t);
        }
        assert_eq!(q.remove(AgentId(3)), Some(4.0));
        assert_eq!(q.remove(AgentId(3)), None);
        assert!(q.is_consistent());
        let order: Vec<u32> = std::iter::from_fn(|| q.pop()).map(|k| k.agent.0).collect();
        assert_eq!(order, vec![2, 4, 5, 1]);
    }

    #[test]
    fn requeue_moves_both_directions() {
        let mut q = EventQueue::new();
        for (id, t) in [(1, 1.0), (2, 2.0), (3, 3.0)] {
            q.push(AgentId(id), t);
        }
        assert!(q.requeue(AgentId(1), 10.0));
        assert_eq!(q.peek().unwrap().agent, AgentId(2));
        assert!(q.requeue(AgentId(3), 0.5));
        assert_eq!(q.peek().unwrap().agent, AgentId(3));
        assert!(!q.requeue(AgentId(9), 0.0));
        assert!(q.is_consistent());
    }

    #[test]
    fn sorted_view() {
        let mut q = EventQueue::new();
        q.push(AgentId(2), 1.0);
        q.push(AgentId(1), 1.0);
        q.push(AgentId(0), 0.0);
        let ids: Vec<u32> = q.sorted().iter().map(|k| k.agent.0).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }
}

// ── EventScheduler ────────────────────────────────────────────────────────────

#[cfg(test)]
mod scheduler {
    use super::*;
    use crate::{ConstantVelocity, ScheduleError, StandStill};

    #[test]
    fn unset_time_initialized_to_current_time() {
        let mut w = World::new(2.0);
        w.spawn(1, None);
        w.spawn(2, Some(5.0));
        assert_eq!(w.registry.get(AgentId(1)).unwrap().next_step_time, Some(2.0));
        assert_eq!(w.scheduler.borrow().next_step_time(AgentId(1)), Some(2.0));
        assert_eq!(w.scheduler.borrow().next_step_time(AgentId(2)), Some(5.0));
    }

    #[test]
    fn tie_break_is_deterministic() {
        for _ in 0..3 {
            let mut w = World::new(0.0);
            w.spawn(7, Some(1.0));
            w.spawn(3, Some(1.0));
            let mut trace = Trace::new(10.0);
            w.advance(2.0, &mut trace).unwrap();
            assert_eq!(trace.order(), vec![3, 7]);
        }
    }

    #[test]
    fn only_strictly_earlier_events_run() {
        let mut w = World::new(0.0);
        w.spawn(1, Some(0.5));
        w.spawn(2, Some(1.0));
        let mut trace = Trace::new(10.0);
        let steps = w.advance(1.0, &mut trace).unwrap();
        assert_eq!(steps, 1);
        assert_eq!(trace.order(), vec![1]);
        assert_eq!(w.scheduler.borrow().next_step_time(AgentId(1)), Some(10.5));
    }

    #[test]
    fn short_steps_act_repeatedly_in_time_order() {
        let mut w = World::new(0.0);
        w.spawn(1, Some(0.0));
        w.spawn(2, Some(0.1));
        let mut trace = Trace::new(0.4);
        w.advance(1.0, &mut trace).unwrap();
        // 1 @ 0.0, 0.4, 0.8 ; 2 @ 0.1, 0.5, 0.9
        assert_eq!(trace.order(), vec![1, 2, 1, 2, 1, 2]);
        let times: Vec<SimTime> = trace.steps.iter().map(|&(_, t)| t).collect();
        assert!(times.windows(2).all(|w| w[0] <= w[1]));
        let next = w.registry.get(AgentId(1)).unwrap().next_step_time.unwrap();
        assert!((next - 1.2).abs() < 1e-12, "got {next}");
    }

    #[test]
    fn empty_queue_is_noop() {
        let mut w = World::new(0.0);
        assert_eq!(w.advance(5.0, &mut StandStill { step_duration: 1.0 }).unwrap(), 0);
        assert_eq!(w.scheduler.borrow().current_time(), 5.0);
    }

    #[test]
    fn entries_track_registry() {
        let mut w = World::new(0.0);
        for id in 0..5 {
            w.spawn(id, None);
        }
        w.registry.remove(AgentId(2)).unwrap();
        w.registry.remove(AgentId(9)).unwrap();
        assert_eq!(w.scheduler.borrow().len(), w.registry.len());
        assert!(!w.scheduler.borrow().contains(AgentId(2)));

        w.advance(1.0, &mut StandStill { step_duration: 0.3 }).unwrap();
        assert_eq!(w.scheduler.borrow().len(), w.registry.len());
    }

    #[test]
    fn late_spawn_starts_at_current_time() {
        let mut w = World::new(0.0);
        w.advance(3.0, &mut StandStill { step_duration: 1.0 }).unwrap();
        w.spawn(1, None);
        assert_eq!(w.scheduler.borrow().next_step_time(AgentId(1)), Some(3.0));
    }

    #[test]
    fn zero_duration_aborts() {
        let mut w = World::new(0.0);
        w.spawn(1, None);
        let err = w.advance(1.0, &mut StandStill { step_duration: 0.0 }).unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidStepDuration { agent: AgentId(1), .. }));
    }

    #[test]
    fn zero_speed_aborts() {
        let mut w = World::new(0.0);
        let a = Agent::new(AgentId(1), Point::new(1.0, 1.0)).with_speed(0.0);
        w.registry.add(a).unwrap();
        let err = w.advance(1.0, &mut ConstantVelocity { step_length: 0.5 }).unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidStepDuration { .. }));
    }

    #[test]
    fn stepping_rebuckets_agent() {
        let mut w = World::new(0.0);
        let a = Agent::new(AgentId(1), Point::new(1.5, 1.5))
            .with_target(Point::new(1.5, 8.5))
            .with_speed(1.0);
        w.registry.add(a).unwrap();

        // Steps at t = 0, 1, 2 → three metres north.
        w.advance(2.5, &mut ConstantVelocity { step_length: 1.0 }).unwrap();
        let pos = w.registry.get(AgentId(1)).unwrap().position;
        assert!((pos.y - 4.5).abs() < 1e-12);
        let grid = w.grid.borrow();
        assert_eq!(grid.cell_of(AgentId(1)), Some((1, 4)));
        assert!(grid.query(Point::new(1.5, 1.5), 0.1).is_empty());
        grid.check_consistency(w.registry.elements()).unwrap();
    }

    #[test]
    fn walker_stops_at_target() {
        let mut w = World::new(0.0);
        let a = Agent::new(AgentId(1), Point::new(1.0, 1.0))
            .with_target(Point::new(1.0, 2.5))
            .with_speed(2.0);
        w.registry.add(a).unwrap();
        w.advance(10.0, &mut ConstantVelocity { step_length: 1.0 }).unwrap();
        assert_eq!(w.registry.get(AgentId(1)).unwrap().position, Point::new(1.0, 2.5));
    }
}

// ── Properties ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod properties {
    use std::collections::BTreeMap;

    use proptest::prelude::*;

    use crowd_core::AgentId;

    use crate::EventQueue;

    proptest! {
        /// Interleaved push / remove / requeue keep the heap valid and pops
        /// come out in `(time, id)` order.
        #[test]
        fn heap_matches_sorted_model(
            ops in prop::collection::vec((0u8..3, 0u32..20, 0u32..8), 0..120),
        ) {
            let mut q = EventQueue::new();
            let mut model: BTreeMap<u32, f64> = BTreeMap::new();
            for (kind, id, t) in ops {
                let t = t as f64 * 0.5;
                match kind {
                    0 => {
                        prop_assert_eq!(q.push(AgentId(id), t), !model.contains_key(&id));
                        model.entry(id).or_insert(t);
                    }
                    1 => {
                        prop_assert_eq!(q.remove(AgentId(id)), model.remove(&id));
                    }
                    _ => {
                        let known = model.contains_key(&id);
                        prop_assert_eq!(q.requeue(AgentId(id), t), known);
                        if known {
                            model.insert(id, t);
                        }
                    }
                }
                prop_assert!(q.is_consistent());
            }

            let mut expected: Vec<(f64, u32)> = model.iter().map(|(&id, &t)| (t, id)).collect();
            expected.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
            let popped: Vec<(f64, u32)> =
                std::iter::from_fn(|| q.pop()).map(|k| (k.time, k.agent.0)).collect();
            prop_assert_eq!(popped, expected);
        }
    }
}
