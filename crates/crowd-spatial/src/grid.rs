//! Linked-cell uniform grid over a bounded 2D domain.
//!
//! # Data layout
//!
//! The domain rectangle is divided into `cols × rows` square cells of side
//! `cell_size`.  Cell `(cx, cy)` is stored at `cells[cy * cols + cx]` and
//! holds `(AgentId, Point)` pairs for every agent currently inside it:
//!
//! ```text
//! cx = clamp(floor((p.x - bounds.x) / cell_size), 0, cols - 1)
//! cy = clamp(floor((p.y - bounds.y) / cell_size), 0, rows - 1)
//! ```
//!
//! Positions outside the domain are clamped onto the border cells, so no
//! position is ever rejected for being out of bounds.
//!
//! A side map `AgentId → cell index` makes `remove` and `move_agent` O(1)
//! amortized (plus a short scan of one bucket) and lets the grid detect a
//! caller that changed a position without re-bucketing.
//!
//! # Queries
//!
//! `query(p, r)` scans every cell intersecting the square `[p - r, p + r]`,
//! i.e. `ceil(r / cell_size)` rings around the centre cell, then filters by
//! exact Euclidean distance.  The distance contract is `d <= r + tolerance`
//! for every radius: ties are included and a radius-0 query matches
//! coincident points without relying on float equality.  Keep `tolerance`
//! far below any meaningful distance.

use log::trace;
use rustc_hash::FxHashMap;

use crowd_agent::{Agent, ElementListener, ListenerResult};
use crowd_core::{AgentId, Point, Rect};

use crate::{SpatialError, SpatialResult};

/// Default distance tolerance used by radius filters, in metres.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Largest number of cells a grid may allocate.
pub const MAX_CELLS: usize = 1 << 22;

// ── GridConfig ────────────────────────────────────────────────────────────────

/// Geometry of a [`SpatialGrid`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridConfig {
    /// Domain covered by the grid.
    pub bounds: Rect,
    /// Cell side length.  Choose at least the largest radius queried in the
    /// hot path so most queries touch only the 3×3 neighbourhood.
    pub cell_size: f64,
    /// Slack added to every query radius; part of the distance contract.
    pub tolerance: f64,
}

impl GridConfig {
    pub fn new(bounds: Rect, cell_size: f64) -> Self {
        Self { bounds, cell_size, tolerance: DEFAULT_TOLERANCE }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    fn validate(&self) -> SpatialResult<()> {
        if !self.bounds.is_valid() {
            return Err(SpatialError::InvalidConfig("bounds must be finite with positive size"));
        }
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(SpatialError::InvalidConfig("cell_size must be finite and positive"));
        }
        if !(self.tolerance.is_finite() && self.tolerance >= 0.0) {
            return Err(SpatialError::InvalidConfig("tolerance must be finite and non-negative"));
        }
        Ok(())
    }
}

// ── SpatialGrid ───────────────────────────────────────────────────────────────

/// Uniform-grid bucket index answering radius queries in O(cells touched).
///
/// Registered with the [`Registry`](crowd_agent::Registry) as a listener, it
/// inserts and removes agents automatically.  Position changes must be
/// reported through [`move_agent`](Self::move_agent).
pub struct SpatialGrid {
    config: GridConfig,
    cols:   usize,
    rows:   usize,
    cells:  Vec<Vec<(AgentId, Point)>>,
    located: FxHashMap<AgentId, usize>,
}

impl SpatialGrid {
    /// Build an empty grid.
    ///
    /// # Errors
    ///
    /// [`SpatialError::InvalidConfig`] for degenerate bounds, a non-positive
    /// cell size, a negative tolerance, or more than [`MAX_CELLS`] cells.
    pub fn new(config: GridConfig) -> SpatialResult<Self> {
        config.validate()?;
        let cols = cells_along(config.bounds.width, config.cell_size)?;
        let rows = cells_along(config.bounds.height, config.cell_size)?;
        let total = cols
            .checked_mul(rows)
            .filter(|&n| n <= MAX_CELLS)
            .ok_or(SpatialError::InvalidConfig("cell_size too small for the domain"))?;
        Ok(Self {
            config,
            cols,
            rows,
            cells: vec![Vec::new(); total],
            located: FxHashMap::default(),
        })
    }

    // ── Geometry ──────────────────────────────────────────────────────────

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Grid dimensions `(cols, rows)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    /// Cell coordinates containing `p`, clamped onto the grid.
    pub fn cell_coords(&self, p: Point) -> (usize, usize) {
        (
            clamp_axis(p.x - self.config.bounds.x, self.config.cell_size, self.cols),
            clamp_axis(p.y - self.config.bounds.y, self.config.cell_size, self.rows),
        )
    }

    #[inline]
    fn cell_index(&self, p: Point) -> usize {
        let (cx, cy) = self.cell_coords(p);
        cy * self.cols + cx
    }

    #[inline]
    fn coords_of(&self, idx: usize) -> (usize, usize) {
        (idx % self.cols, idx / self.cols)
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Index `agent` at `position`.
    pub fn insert(&mut self, agent: AgentId, position: Point) -> SpatialResult<()> {
        if !position.is_finite() {
            return Err(SpatialError::NonFinitePosition { agent, position });
        }
        if self.located.contains_key(&agent) {
            return Err(SpatialError::AlreadyIndexed(agent));
        }
        let idx = self.cell_index(position);
        self.cells[idx].push((agent, position));
        self.located.insert(agent, idx);
        Ok(())
    }

    /// Drop `agent` from the index.  Returns `false` if it was not indexed.
    pub fn remove(&mut self, agent: AgentId) -> bool {
        let Some(idx) = self.located.remove(&agent) else {
            return false;
        };
        let bucket = &mut self.cells[idx];
        if let Some(pos) = bucket.iter().position(|(id, _)| *id == agent) {
            bucket.swap_remove(pos);
        }
        true
    }

    /// Re-bucket `agent` after it moved from `old_position` to `new_position`.
    ///
    /// # Errors
    ///
    /// - [`SpatialError::NotIndexed`] if the agent was never inserted.
    /// - [`SpatialError::Desync`] if `old_position` maps to a different cell
    ///   than the one recorded, i.e. an earlier move was not reported.
    /// - [`SpatialError::NonFinitePosition`] for a NaN/infinite target.
    pub fn move_agent(
        &mut self,
        agent:        AgentId,
        old_position: Point,
        new_position: Point,
    ) -> SpatialResult<()> {
        if !new_position.is_finite() {
            return Err(SpatialError::NonFinitePosition { agent, position: new_position });
        }
        let recorded = *self.located.get(&agent).ok_or(SpatialError::NotIndexed(agent))?;
        let expected = self.cell_index(old_position);
        if recorded != expected {
            return Err(SpatialError::Desync {
                agent,
                expected: self.coords_of(expected),
                recorded: self.coords_of(recorded),
            });
        }

        let target = self.cell_index(new_position);
        let bucket = &mut self.cells[recorded];
        let slot = bucket
            .iter()
            .position(|(id, _)| *id == agent)
            .ok_or(SpatialError::NotIndexed(agent))?;

        if target == recorded {
            bucket[slot].1 = new_position;
        } else {
            bucket.swap_remove(slot);
            self.cells[target].push((agent, new_position));
            self.located.insert(agent, target);
            trace!(
                "grid: {agent} {:?} -> {:?}",
                self.coords_of(recorded),
                self.coords_of(target)
            );
        }
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// All agents within `radius` of `center`, in ascending id order.
    pub fn query(&self, center: Point, radius: f64) -> Vec<AgentId> {
        let mut out: Vec<AgentId> = self
            .query_entries(center, radius)
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        out.sort_unstable();
        out
    }

    /// Like [`query`](Self::query) but also returns each agent's indexed
    /// position.  Order follows the cell scan.
    pub fn query_entries(&self, center: Point, radius: f64) -> Vec<(AgentId, Point)> {
        let mut out = Vec::new();
        self.for_each_within(center, radius, |id, pos| out.push((id, pos)));
        out
    }

    /// Visit every agent at distance `<= radius + tolerance` from `center`
    /// without allocating.
    ///
    /// A negative or NaN radius visits nothing.
    pub fn for_each_within<F: FnMut(AgentId, Point)>(&self, center: Point, radius: f64, mut visit: F) {
        if radius.is_nan() || radius < 0.0 || !center.is_finite() {
            return;
        }
        let reach = radius + self.config.tolerance;
        let reach_sq = reach * reach;

        let (min_x, min_y) = self.cell_coords(Point::new(center.x - reach, center.y - reach));
        let (max_x, max_y) = self.cell_coords(Point::new(center.x + reach, center.y + reach));

        for cy in min_y..=max_y {
            let row = cy * self.cols;
            for cx in min_x..=max_x {
                for &(id, pos) in &self.cells[row + cx] {
                    if pos.distance_sq(center) <= reach_sq {
                        visit(id, pos);
                    }
                }
            }
        }
    }

    /// Position recorded for `agent`, if indexed.
    pub fn position_of(&self, agent: AgentId) -> Option<Point> {
        let idx = *self.located.get(&agent)?;
        self.cells[idx].iter().find(|(id, _)| *id == agent).map(|&(_, p)| p)
    }

    /// Cell currently holding `agent`.
    pub fn cell_of(&self, agent: AgentId) -> Option<(usize, usize)> {
        self.located.get(&agent).map(|&idx| self.coords_of(idx))
    }

    /// Agents bucketed in cell `(cx, cy)`.
    pub fn cell_members(&self, cx: usize, cy: usize) -> impl Iterator<Item = AgentId> + '_ {
        let bucket: &[(AgentId, Point)] = if cx < self.cols && cy < self.rows {
            &self.cells[cy * self.cols + cx]
        } else {
            &[]
        };
        bucket.iter().map(|&(id, _)| id)
    }

    pub fn contains(&self, agent: AgentId) -> bool {
        self.located.contains_key(&agent)
    }

    pub fn len(&self) -> usize {
        self.located.len()
    }

    pub fn is_empty(&self) -> bool {
        self.located.is_empty()
    }

    /// Verify that the index holds exactly `agents`, each at its actual
    /// position and in the matching cell.
    ///
    /// Intended for debug assertions and tests; O(n).
    pub fn check_consistency<'a, I>(&self, agents: I) -> SpatialResult<()>
    where
        I: IntoIterator<Item = &'a Agent>,
    {
        let mut seen = 0usize;
        for agent in agents {
            seen += 1;
            let id = agent.id();
            let indexed = self.position_of(id).ok_or(SpatialError::NotIndexed(id))?;
            if indexed != agent.position {
                return Err(SpatialError::StalePosition { agent: id, indexed, actual: agent.position });
            }
            let recorded = self.located[&id];
            let expected = self.cell_index(agent.position);
            if recorded != expected {
                return Err(SpatialError::Desync {
                    agent:    id,
                    expected: self.coords_of(expected),
                    recorded: self.coords_of(recorded),
                });
            }
        }
        if seen != self.len() {
            return Err(SpatialError::Orphaned { indexed: self.len(), live: seen });
        }
        Ok(())
    }
}

/// Number of cells covering `extent` along one axis, at least 1.
fn cells_along(extent: f64, cell: f64) -> SpatialResult<usize> {
    let n = (extent / cell).ceil().max(1.0);
    if !(n.is_finite() && n <= MAX_CELLS as f64) {
        return Err(SpatialError::InvalidConfig("cell_size too small for the domain"));
    }
    Ok(n as usize)
}

/// `floor(offset / cell)` clamped to `[0, n - 1]`.
#[inline]
fn clamp_axis(offset: f64, cell: f64, n: usize) -> usize {
    let c = (offset / cell).floor();
    if c <= 0.0 {
        0
    } else if c >= (n - 1) as f64 {
        n - 1
    } else {
        c as usize
    }
}

// ── Registry listener ─────────────────────────────────────────────────────────

impl ElementListener for SpatialGrid {
    fn name(&self) -> &'static str {
        "spatial-grid"
    }

    fn on_added(&mut self, agent: &mut Agent) -> ListenerResult {
        self.insert(agent.id(), agent.position)?;
        Ok(())
    }

    fn on_removed(&mut self, agent: &Agent) -> ListenerResult {
        if !self.remove(agent.id()) {
            return Err(SpatialError::NotIndexed(agent.id()).into());
        }
        Ok(())
    }
}
