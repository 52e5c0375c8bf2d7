//! Fixed-size cohorts.
//!
//! Agents are seated into the current cohort in spawn order until it holds
//! `cohortSize` members; the next agent opens a new cohort.  A cohort that
//! loses members is refilled while it is still the open one.  Cohorts never
//! change between ticks.

use crowd_agent::{Agent, GroupDimension};
use crowd_core::{AgentId, CoreError, GroupId, ModelParams, SimRng};

use crate::{GroupBook, GroupResult, TransitionContext, TransitionRule};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CohortConfig {
    pub cohort_size: u32,
}

impl Default for CohortConfig {
    fn default() -> Self {
        Self { cohort_size: 4 }
    }
}

impl CohortConfig {
    pub const PARAMS: [&'static str; 1] = ["cohortSize"];

    pub fn from_params(params: &ModelParams) -> GroupResult<Self> {
        params.ensure_known("cohort", &Self::PARAMS)?;
        let cohort_size = params.count_or("cohortSize", Self::default().cohort_size)?;
        if cohort_size == 0 {
            return Err(CoreError::InvalidParameter {
                name:   "cohortSize".to_owned(),
                value:  0.0,
                reason: "must be >= 1",
            }
            .into());
        }
        Ok(Self { cohort_size })
    }
}

/// Seats agents into cohorts of `cohort_size`.
#[derive(Clone, Debug)]
pub struct CohortRule {
    config: CohortConfig,
    open:   GroupId,
}

impl CohortRule {
    pub fn new(config: CohortConfig) -> Self {
        Self { config, open: GroupId(0) }
    }

    /// The cohort new agents are currently seated into.
    pub fn open_cohort(&self) -> GroupId {
        self.open
    }
}

impl TransitionRule for CohortRule {
    type State = ();

    const DIMENSION: GroupDimension = GroupDimension::COHORT;

    fn group_state(_id: GroupId) {}

    fn initial_group(
        &mut self,
        _agent: &Agent,
        book:   &GroupBook<()>,
        _rng:   &mut SimRng,
    ) -> GroupResult<GroupId> {
        if book.size_of(self.open) >= self.config.cohort_size as usize {
            self.open = GroupId(self.open.0 + 1);
        }
        Ok(self.open)
    }

    fn visit(&mut self, _agent: AgentId, _ctx: &mut TransitionContext<'_, ()>) -> GroupResult<()> {
        Ok(())
    }
}
