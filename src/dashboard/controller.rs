//! Dashboard Controller
//!
//! Runs a [`DashboardState`] on a single task. Selection changes arrive as
//! commands, fetches run as child tasks, and every transition is published
//! on a watch channel.
//!
//! Starting a fetch aborts the previous fetch task. A settlement that still
//! slips through is checked against the current generation and dropped if
//! it is stale.

use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use super::error::ControllerError;
use super::state::{Completion, DashboardAction, DashboardState, Effect, FetchTicket, Selection};
use super::view::DashboardView;
use crate::chains::Chain;
use crate::timeline::{Granularity, TimelineResponse};
use crate::tokenguard::{TimelineSource, TokenGuardError};

/// Capacity of the command queue shared by all handles
const COMMAND_CAPACITY: usize = 64;

enum Command {
    Dispatch {
        action: DashboardAction,
        reply: oneshot::Sender<DashboardView>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

/// A fetch task reporting back to the controller
struct Settled {
    generation: u64,
    outcome: Result<TimelineResponse, TokenGuardError>,
}

struct InFlight {
    generation: u64,
    task: JoinHandle<()>,
}

/// Owns the dashboard state and executes its effects
pub struct DashboardController {
    state: DashboardState,
    source: Arc<dyn TimelineSource>,
    in_flight: Option<InFlight>,
    settled_tx: mpsc::UnboundedSender<Settled>,
    settled_rx: mpsc::UnboundedReceiver<Settled>,
    view_tx: watch::Sender<DashboardView>,
}

impl DashboardController {
    /// Start a controller for the initial selection and return its handle
    ///
    /// The initial fetch (if any) is issued before this returns, so the
    /// first published view is already loading. Must be called from within
    /// a tokio runtime.
    pub fn spawn(
        source: Arc<dyn TimelineSource>,
        selection: Selection,
        granularity: Granularity,
    ) -> DashboardHandle {
        let (controller, handle, commands_rx) = Self::new(source, selection, granularity);
        tokio::spawn(controller.run(commands_rx));
        handle
    }

    fn new(
        source: Arc<dyn TimelineSource>,
        selection: Selection,
        granularity: Granularity,
    ) -> (Self, DashboardHandle, mpsc::Receiver<Command>) {
        let state = DashboardState::new(selection, granularity);
        let (view_tx, view_rx) = watch::channel(DashboardView::from_state(&state));
        let (settled_tx, settled_rx) = mpsc::unbounded_channel();
        let (commands_tx, commands_rx) = mpsc::channel(COMMAND_CAPACITY);

        let mut controller = Self {
            state,
            source,
            in_flight: None,
            settled_tx,
            settled_rx,
            view_tx,
        };

        let effect = controller.state.start();
        controller.execute(effect);
        controller.publish();

        tracing::info!(
            chain_from = %selection.chain_from,
            chain_to = %selection.chain_to,
            granularity = granularity.stride(),
            "Dashboard controller started"
        );

        let handle = DashboardHandle {
            commands: commands_tx,
            views: view_rx,
        };
        (controller, handle, commands_rx)
    }

    async fn run(mut self, mut commands: mpsc::Receiver<Command>) {
        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::Dispatch { action, reply }) => {
                        let effect = self.state.apply(action);
                        self.execute(effect);
                        let view = self.publish();
                        let _ = reply.send(view);
                    }
                    Some(Command::Shutdown { reply }) => {
                        self.teardown();
                        let _ = reply.send(());
                        break;
                    }
                    None => {
                        self.teardown();
                        break;
                    }
                },
                Some(settled) = self.settled_rx.recv() => {
                    self.settle(settled);
                }
            }
        }

        tracing::info!("Dashboard controller stopped");
    }

    fn execute(&mut self, effect: Option<Effect>) {
        match effect {
            Some(Effect::Fetch(ticket)) => {
                self.cancel_in_flight();
                self.start_fetch(ticket);
            }
            Some(Effect::Cancel) => {
                self.cancel_in_flight();
            }
            None => {}
        }
    }

    fn start_fetch(&mut self, ticket: FetchTicket) {
        let FetchTicket {
            generation,
            selection,
        } = ticket;

        tracing::info!(
            generation,
            chain_from = %selection.chain_from,
            chain_to = %selection.chain_to,
            "Fetching growth index timeline"
        );

        let source = Arc::clone(&self.source);
        let settled_tx = self.settled_tx.clone();
        let task = tokio::spawn(async move {
            let outcome = source
                .fetch(selection.chain_from, selection.chain_to)
                .await;
            let _ = settled_tx.send(Settled {
                generation,
                outcome,
            });
        });

        self.in_flight = Some(InFlight { generation, task });
    }

    fn cancel_in_flight(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            if !in_flight.task.is_finished() {
                tracing::debug!(
                    generation = in_flight.generation,
                    "Canceling superseded timeline fetch"
                );
            }
            in_flight.task.abort();
        }
    }

    fn settle(&mut self, settled: Settled) {
        let Settled {
            generation,
            outcome,
        } = settled;

        if self
            .in_flight
            .as_ref()
            .is_some_and(|f| f.generation == generation)
        {
            self.in_flight = None;
        }

        match self.state.complete(generation, outcome) {
            Completion::Applied => {
                tracing::info!(generation, "Growth index timeline applied");
                self.publish();
            }
            Completion::Failed(e) => {
                tracing::error!(generation, error = %e, "Failed to fetch growth index timeline");
                self.publish();
            }
            Completion::Stale => {
                tracing::debug!(
                    generation,
                    current = self.state.generation(),
                    "Discarding stale timeline result"
                );
            }
        }
    }

    fn teardown(&mut self) {
        let effect = self.state.teardown();
        self.execute(effect);
        self.publish();
    }

    fn publish(&self) -> DashboardView {
        let view = DashboardView::from_state(&self.state);
        self.view_tx.send_replace(view.clone());
        view
    }
}

/// Cloneable handle to a running [`DashboardController`]
#[derive(Clone)]
pub struct DashboardHandle {
    commands: mpsc::Sender<Command>,
    views: watch::Receiver<DashboardView>,
}

impl DashboardHandle {
    /// Apply an action and return the view right after the transition
    pub async fn dispatch(&self, action: DashboardAction) -> Result<DashboardView, ControllerError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Dispatch { action, reply })
            .await
            .map_err(|_| ControllerError::Closed)?;
        response.await.map_err(|_| ControllerError::Closed)
    }

    pub async fn set_chain_from(&self, chain: Chain) -> Result<DashboardView, ControllerError> {
        self.dispatch(DashboardAction::SetChainFrom(chain)).await
    }

    pub async fn set_chain_to(&self, chain: Chain) -> Result<DashboardView, ControllerError> {
        self.dispatch(DashboardAction::SetChainTo(chain)).await
    }

    pub async fn set_selection(
        &self,
        selection: Selection,
    ) -> Result<DashboardView, ControllerError> {
        self.dispatch(DashboardAction::SetSelection(selection)).await
    }

    pub async fn set_granularity(
        &self,
        granularity: Granularity,
    ) -> Result<DashboardView, ControllerError> {
        self.dispatch(DashboardAction::SetGranularity(granularity))
            .await
    }

    /// Latest published view
    pub fn view(&self) -> DashboardView {
        self.views.borrow().clone()
    }

    /// Receiver notified on every published view
    pub fn subscribe(&self) -> watch::Receiver<DashboardView> {
        self.views.clone()
    }

    pub fn is_running(&self) -> bool {
        !self.commands.is_closed()
    }

    /// Cancel any in-flight fetch and stop the controller
    pub async fn shutdown(&self) -> Result<(), ControllerError> {
        let (reply, done) = oneshot::channel();
        self.commands
            .send(Command::Shutdown { reply })
            .await
            .map_err(|_| ControllerError::Closed)?;
        done.await.map_err(|_| ControllerError::Closed)
    }
}
