//! Building group models by dimension name.

use std::cell::RefCell;
use std::rc::Rc;

use crowd_agent::{GroupDimension, SharedListener};
use crowd_core::{ModelParams, SimRng};

use crate::{
    CohortConfig, CohortRule, GroupError, GroupModel, GroupResult, GroupUpdate, SirConfig, SirRule,
    TransitionRule,
};

/// Dimensions that can be built from configuration.
pub const KNOWN_DIMENSIONS: [GroupDimension; 2] = [GroupDimension::EPIDEMIC, GroupDimension::COHORT];

/// Look up a dimension by its configured name.
pub fn dimension_by_name(name: &str) -> GroupResult<GroupDimension> {
    KNOWN_DIMENSIONS
        .into_iter()
        .find(|d| d.name() == name)
        .ok_or_else(|| GroupError::UnknownDimension(name.to_owned()))
}

/// Two views of one shared group model: the registry's listener handle and
/// the simulation's update handle.
#[derive(Clone)]
pub struct GroupModelHandle {
    pub listener: SharedListener,
    pub model:    Rc<RefCell<dyn GroupUpdate>>,
}

impl GroupModelHandle {
    pub fn new<R: TransitionRule>(model: GroupModel<R>) -> Self {
        Self::from_shared(Rc::new(RefCell::new(model)))
    }

    /// Wrap a model the caller keeps a typed handle to.
    pub fn from_shared<R: TransitionRule>(shared: Rc<RefCell<GroupModel<R>>>) -> Self {
        let listener: SharedListener = shared.clone();
        let model: Rc<RefCell<dyn GroupUpdate>> = shared;
        Self { listener, model }
    }

    pub fn dimension(&self) -> GroupDimension {
        self.model.borrow().dimension()
    }
}

/// Build the model of dimension `name` from named parameters.
///
/// # Errors
///
/// [`GroupError::UnknownDimension`] for an unrecognised name, or
/// [`GroupError::Config`] for unknown or out-of-range parameters.
pub fn build_model(name: &str, params: &ModelParams, rng: SimRng) -> GroupResult<GroupModelHandle> {
    let dimension = dimension_by_name(name)?;
    let handle = if dimension == GroupDimension::EPIDEMIC {
        GroupModelHandle::new(GroupModel::new(SirRule::new(SirConfig::from_params(params)?), rng))
    } else {
        GroupModelHandle::new(GroupModel::new(CohortRule::new(CohortConfig::from_params(params)?), rng))
    };
    Ok(handle)
}
