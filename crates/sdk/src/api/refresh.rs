use tokio::sync::{Mutex, oneshot};
use tracing::debug;

use crate::api::types::RefreshError;

type RefreshOutcome = Result<String, RefreshError>;

/// A caller's place in the current refresh cycle.
pub enum RefreshTicket {
    /// No refresh was in flight. The holder must perform the refresh call
    /// and `settle` the cycle with its outcome.
    Leader,
    /// A refresh is already in flight; the receiver yields its outcome.
    Waiter(oneshot::Receiver<RefreshOutcome>),
}

#[derive(Default)]
struct RefreshState {
    in_flight: bool,
    waiters: Vec<oneshot::Sender<RefreshOutcome>>,
}

/// Serializes token refresh attempts.
///
/// However many requests discover the expired access token concurrently,
/// exactly one refresh call goes out; everyone else queues behind it and is
/// handed the same outcome, in enqueue order. One coordinator lives inside
/// each HTTP client rather than in module-level state, so it can be tested
/// without any transport.
pub struct RefreshCoordinator {
    state: Mutex<RefreshState>,
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        RefreshCoordinator { state: Mutex::new(RefreshState::default()) }
    }

    /// Claims leadership of a refresh cycle, or joins the one in flight.
    ///
    /// The check and the flag update happen under a single lock, so two
    /// callers can never both come out as leader.
    pub async fn begin_or_join(&self) -> RefreshTicket {
        let mut state = self.state.lock().await;
        if state.in_flight {
            let (sender, receiver) = oneshot::channel();
            state.waiters.push(sender);
            debug!("joining in-flight token refresh ({} queued)", state.waiters.len());
            return RefreshTicket::Waiter(receiver);
        }
        state.in_flight = true;
        RefreshTicket::Leader
    }

    /// Ends the current cycle: clears the in-flight flag and delivers the
    /// outcome to every queued waiter in enqueue order, so a later
    /// authentication failure can start a fresh cycle.
    pub async fn settle(&self, outcome: RefreshOutcome) {
        let mut state = self.state.lock().await;
        state.in_flight = false;
        for waiter in state.waiters.drain(..) {
            // A waiter whose request was dropped is fine to skip.
            let _ = waiter.send(outcome.clone());
        }
    }
}

impl Default for RefreshCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
