//! Simulation observer trait for progress reporting and data collection.

use crowd_agent::{GroupDimension, Registry};
use crowd_core::{GroupId, SimTime, Tick};

/// What happened in one tick.
#[derive(Clone, Debug, PartialEq)]
pub struct TickSummary {
    pub tick: Tick,
    /// End of the tick; the time both entry points ran at.
    pub sim_time: SimTime,
    /// Agent steps the scheduler performed.
    pub steps: usize,
    /// Live agents after the tick.
    pub live: usize,
    /// `(dimension, [(group, size)])` for every group model, in
    /// registration order.
    pub groups: Vec<(GroupDimension, Vec<(GroupId, usize)>)>,
}

impl TickSummary {
    /// Size of `group` in `dimension`; 0 when absent.
    pub fn group_size(&self, dimension: GroupDimension, group: GroupId) -> usize {
        self.groups
            .iter()
            .find(|(d, _)| *d == dimension)
            .and_then(|(_, sizes)| sizes.iter().find(|(g, _)| *g == group))
            .map_or(0, |&(_, n)| n)
    }
}

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: epidemic curve
///
/// ```rust,ignore
/// struct Curve(Vec<usize>);
///
/// impl SimObserver for Curve {
///     fn on_tick_end(&mut self, summary: &TickSummary, _agents: &Registry) {
///         self.0.push(summary.group_size(GroupDimension::EPIDEMIC, SirCategory::Infected.group_id()));
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each tick with read-only access to the live set.
    fn on_tick_end(&mut self, _summary: &TickSummary, _agents: &Registry) {}

    /// Called once after the final tick of [`Sim::run`][crate::Sim::run].
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
