//! Unit tests for crowd-agent.

use std::cell::RefCell;
use std::rc::Rc;

use crowd_core::{AgentId, GroupId, Point};

use crate::{Agent, ElementListener, ListenerResult, Registry};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Listener that records every notification into a shared log.
struct Recorder {
    name: &'static str,
    log:  Rc<RefCell<Vec<String>>>,
}

impl ElementListener for Recorder {
    fn name(&self) -> &'static str {
        self.name
    }

    fn on_added(&mut self, agent: &mut Agent) -> ListenerResult {
        self.log.borrow_mut().push(format!("{}+{}", self.name, agent.id().0));
        Ok(())
    }

    fn on_removed(&mut self, agent: &Agent) -> ListenerResult {
        self.log.borrow_mut().push(format!(
            "{}-{}@{},{}",
            self.name,
            agent.id().0,
            agent.position.x,
            agent.position.y
        ));
        Ok(())
    }
}

/// Listener that refuses every agent.
struct Refuser;

impl ElementListener for Refuser {
    fn name(&self) -> &'static str {
        "refuser"
    }

    fn on_added(&mut self, _agent: &mut Agent) -> ListenerResult {
        Err("no vacancy".into())
    }

    fn on_removed(&mut self, _agent: &Agent) -> ListenerResult {
        Ok(())
    }
}

fn agent(id: u32, x: f64, y: f64) -> Agent {
    Agent::new(AgentId(id), Point::new(x, y))
}

fn registry_with_recorders(names: &[&'static str]) -> (Registry, Rc<RefCell<Vec<String>>>) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut reg = Registry::new();
    for &name in names {
        reg.add_listener(Rc::new(RefCell::new(Recorder { name, log: log.clone() })));
    }
    (reg, log)
}

// ── Agent record ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod agent_record {
    use super::*;
    use crate::{GroupDimension, GroupMembership};

    fn m(dimension: GroupDimension, group: u32, size: usize) -> GroupMembership {
        GroupMembership { dimension, group: GroupId(group), size_at_assignment: size }
    }

    #[test]
    fn new_agent_is_unscheduled_and_ungrouped() {
        let a = agent(1, 2.0, 3.0);
        assert_eq!(a.id(), AgentId(1));
        assert!(a.next_step_time.is_none());
        assert!(a.memberships().is_empty());
    }

    #[test]
    fn set_membership_replaces_within_dimension() {
        let mut a = agent(1, 0.0, 0.0);
        a.set_membership(m(GroupDimension::EPIDEMIC, 0, 1));
        a.set_membership(m(GroupDimension::COHORT, 4, 2));
        a.set_membership(m(GroupDimension::EPIDEMIC, 1, 5));
        assert_eq!(a.memberships().len(), 2);
        assert_eq!(a.membership(GroupDimension::EPIDEMIC).unwrap().group, GroupId(1));
        assert_eq!(a.membership(GroupDimension::COHORT).unwrap().group, GroupId(4));
    }

    #[test]
    fn clear_membership_only_touches_one_dimension() {
        let mut a = agent(1, 0.0, 0.0);
        a.set_membership(m(GroupDimension::EPIDEMIC, 0, 1));
        a.set_membership(m(GroupDimension::COHORT, 4, 2));
        let cleared = a.clear_membership(GroupDimension::EPIDEMIC).unwrap();
        assert_eq!(cleared.group, GroupId(0));
        assert!(a.membership(GroupDimension::EPIDEMIC).is_none());
        assert!(a.membership(GroupDimension::COHORT).is_some());
        assert!(a.clear_membership(GroupDimension::EPIDEMIC).is_none());
    }
}

// ── Registry ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod registry {
    use super::*;
    use crate::AgentError;

    #[test]
    fn add_notifies_in_registration_order() {
        let (mut reg, log) = registry_with_recorders(&["a", "b", "c"]);
        reg.add(agent(1, 0.0, 0.0)).unwrap();
        assert_eq!(*log.borrow(), vec!["a+1", "b+1", "c+1"]);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn duplicate_id_is_rejected_without_notification() {
        let (mut reg, log) = registry_with_recorders(&["a"]);
        reg.add(agent(1, 0.0, 0.0)).unwrap();
        let err = reg.add(agent(1, 5.0, 5.0)).unwrap_err();
        assert!(matches!(err, AgentError::DuplicateId(AgentId(1))));
        assert_eq!(log.borrow().len(), 1);
        // The original record is untouched.
        assert_eq!(reg.get(AgentId(1)).unwrap().position, Point::new(0.0, 0.0));
    }

    #[test]
    fn remove_absent_is_noop() {
        let (mut reg, log) = registry_with_recorders(&["a"]);
        assert!(reg.remove(AgentId(9)).unwrap().is_none());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn remove_notifies_with_last_known_state() {
        let (mut reg, log) = registry_with_recorders(&["a", "b"]);
        reg.add(agent(4, 1.0, 2.0)).unwrap();
        reg.get_mut(AgentId(4)).unwrap().position = Point::new(3.0, 4.0);
        let removed = reg.remove(AgentId(4)).unwrap().unwrap();
        assert_eq!(removed.id(), AgentId(4));
        assert_eq!(log.borrow()[2..], ["a-4@3,4", "b-4@3,4"]);
        assert!(!reg.contains(AgentId(4)));
    }

    #[test]
    fn removal_preserves_order_of_remaining() {
        let mut reg = Registry::new();
        for id in [5, 1, 9, 3] {
            reg.add(agent(id, 0.0, 0.0)).unwrap();
        }
        reg.remove(AgentId(1)).unwrap();
        let ids: Vec<u32> = reg.ids().map(|a| a.0).collect();
        assert_eq!(ids, vec![5, 9, 3]);
    }

    #[test]
    fn snapshot_is_stable_under_mutation() {
        let mut reg = Registry::new();
        for id in 0..4 {
            reg.add(agent(id, 0.0, 0.0)).unwrap();
        }
        let snap = reg.snapshot();
        let mut visited = Vec::new();
        for &id in &snap {
            if reg.get(id).is_none() {
                continue;
            }
            visited.push(id.0);
            if id == AgentId(0) {
                reg.remove(AgentId(2)).unwrap();
                reg.add(agent(10, 0.0, 0.0)).unwrap();
            }
        }
        assert_eq!(snap.len(), 4);
        assert_eq!(visited, vec![0, 1, 3]);
        assert_eq!(reg.len(), 4);
    }

    #[test]
    fn listener_error_is_surfaced_with_context() {
        let mut reg = Registry::new();
        reg.add_listener(Rc::new(RefCell::new(Refuser)));
        match reg.add(agent(2, 0.0, 0.0)) {
            Err(AgentError::Listener { listener, agent, .. }) => {
                assert_eq!(listener, "refuser");
                assert_eq!(agent, AgentId(2));
            }
            other => panic!("expected listener error, got {other:?}"),
        }
    }

    #[test]
    fn require_reports_missing() {
        let reg = Registry::new();
        assert!(matches!(reg.require(AgentId(3)), Err(AgentError::NotFound(AgentId(3)))));
    }

    #[test]
    fn reentrant_mutation_is_detected() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let recorder = Rc::new(RefCell::new(Recorder { name: "held", log }));
        let mut reg = Registry::new();
        reg.add_listener(recorder.clone());
        let _guard = recorder.borrow_mut();
        assert!(matches!(
            reg.add(agent(1, 0.0, 0.0)),
            Err(AgentError::ReentrantNotification { index: 0 })
        ));
    }
}

// ── Properties ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod properties {
    use std::collections::BTreeSet;

    use proptest::prelude::*;

    use super::*;

    proptest! {
        /// After any add/remove sequence the registry holds exactly the ids
        /// a set model says it should, and every listener saw a balanced
        /// add/remove stream.
        #[test]
        fn live_set_matches_model(ops in prop::collection::vec((any::<bool>(), 0u32..16), 0..64)) {
            let (mut reg, log) = registry_with_recorders(&["l"]);
            let mut model = BTreeSet::new();
            for (is_add, id) in ops {
                if is_add {
                    let res = reg.add(agent(id, 0.0, 0.0));
                    prop_assert_eq!(res.is_ok(), model.insert(id));
                } else {
                    let res = reg.remove(AgentId(id)).unwrap();
                    prop_assert_eq!(res.is_some(), model.remove(&id));
                }
            }
            let live: BTreeSet<u32> = reg.ids().map(|a| a.0).collect();
            prop_assert_eq!(&live, &model);
            let adds = log.borrow().iter().filter(|e| e.contains('+')).count();
            let removes = log.borrow().iter().filter(|e| e.contains('-')).count();
            prop_assert_eq!(adds - removes, model.len());
        }
    }
}
