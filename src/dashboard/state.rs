//! Dashboard State
//!
//! Reducer over the current selection and the live timeline. Each operation
//! returns the side effect the caller must run instead of performing it, so
//! the state can be driven deterministically without a runtime.
//!
//! Every real selection change bumps `generation`. A fetch result is applied
//! only if it carries the current generation and the state is still loading.

use serde::{Deserialize, Serialize};

use crate::chains::Chain;
use crate::timeline::{DisplayedTimeline, Granularity, TimelineResponse};
use crate::tokenguard::TokenGuardError;

/// The pair of chains being compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub chain_from: Chain,
    pub chain_to: Chain,
}

impl Selection {
    pub fn new(chain_from: Chain, chain_to: Chain) -> Self {
        Self {
            chain_from,
            chain_to,
        }
    }

    /// A chain compared with itself is not fetched
    pub fn is_comparable(&self) -> bool {
        self.chain_from != self.chain_to
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::new(Chain::Ethereum, Chain::Solana)
    }
}

/// Where the live timeline slot currently stands
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    /// Nothing to fetch (same chain on both sides, or torn down)
    Idle,
    /// A fetch for the current generation is in flight
    Loading,
    /// The current generation's response is live
    Ready(TimelineResponse),
    /// The current generation's fetch failed
    Failed,
}

/// User-driven state transitions
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DashboardAction {
    SetChainFrom(Chain),
    SetChainTo(Chain),
    SetSelection(Selection),
    SetGranularity(Granularity),
}

/// A fetch to run for a specific generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub selection: Selection,
}

/// Side effect requested by a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Cancel whatever is in flight and start this fetch
    Fetch(FetchTicket),
    /// Cancel whatever is in flight
    Cancel,
}

/// Outcome of handing a settled fetch to the state
#[derive(Debug)]
pub enum Completion {
    Applied,
    Failed(TokenGuardError),
    /// Superseded or canceled; nothing changed
    Stale,
}

/// Selection plus the live timeline
#[derive(Debug, Clone)]
pub struct DashboardState {
    selection: Selection,
    granularity: Granularity,
    phase: Phase,
    generation: u64,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(Selection::default(), Granularity::default())
    }
}

impl DashboardState {
    pub fn new(selection: Selection, granularity: Granularity) -> Self {
        Self {
            selection,
            granularity,
            phase: Phase::Idle,
            generation: 0,
        }
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The live response, if one has been applied for the current selection
    pub fn response(&self) -> Option<&TimelineResponse> {
        match &self.phase {
            Phase::Ready(response) => Some(response),
            _ => None,
        }
    }

    /// The live response resampled by the current granularity
    pub fn displayed(&self) -> Option<DisplayedTimeline> {
        self.response()
            .map(|response| DisplayedTimeline::from_response(response, self.granularity))
    }

    /// Initial transition for the starting selection
    pub fn start(&mut self) -> Option<Effect> {
        self.reselect()
    }

    pub fn apply(&mut self, action: DashboardAction) -> Option<Effect> {
        match action {
            DashboardAction::SetChainFrom(chain) => self.set_chain_from(chain),
            DashboardAction::SetChainTo(chain) => self.set_chain_to(chain),
            DashboardAction::SetSelection(selection) => self.set_selection(selection),
            DashboardAction::SetGranularity(granularity) => self.set_granularity(granularity),
        }
    }

    pub fn set_chain_from(&mut self, chain: Chain) -> Option<Effect> {
        self.set_selection(Selection::new(chain, self.selection.chain_to))
    }

    pub fn set_chain_to(&mut self, chain: Chain) -> Option<Effect> {
        self.set_selection(Selection::new(self.selection.chain_from, chain))
    }

    /// Replace both chains at once; unchanged selections are a no-op
    pub fn set_selection(&mut self, selection: Selection) -> Option<Effect> {
        if selection == self.selection {
            return None;
        }
        self.selection = selection;
        self.reselect()
    }

    /// Only the displayed timeline depends on granularity
    pub fn set_granularity(&mut self, granularity: Granularity) -> Option<Effect> {
        self.granularity = granularity;
        None
    }

    /// Apply a settled fetch if it still belongs to the current generation
    pub fn complete(
        &mut self,
        generation: u64,
        outcome: Result<TimelineResponse, TokenGuardError>,
    ) -> Completion {
        if generation != self.generation || self.phase != Phase::Loading {
            return Completion::Stale;
        }

        match outcome {
            Ok(response) => {
                self.phase = Phase::Ready(response);
                Completion::Applied
            }
            Err(e) => {
                self.phase = Phase::Failed;
                Completion::Failed(e)
            }
        }
    }

    /// Invalidate any in-flight fetch when the owner goes away
    pub fn teardown(&mut self) -> Option<Effect> {
        self.generation += 1;
        if self.phase == Phase::Loading {
            self.phase = Phase::Idle;
        }
        Some(Effect::Cancel)
    }

    fn reselect(&mut self) -> Option<Effect> {
        self.generation += 1;

        if !self.selection.is_comparable() {
            self.phase = Phase::Idle;
            return Some(Effect::Cancel);
        }

        self.phase = Phase::Loading;
        Some(Effect::Fetch(FetchTicket {
            generation: self.generation,
            selection: self.selection,
        }))
    }
}
