// View registry - Tracks the mounted view and discards stale page loads
use crate::domain::telemetry::Subsystem;
use serde::Serialize;
use std::sync::{Mutex, PoisonError};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewId {
    Overview,
    Subsystem(Subsystem),
}

/// Identifies one mount of a view. Only the ticket of the current mount may apply a page.
#[derive(Debug, Clone)]
pub struct MountTicket {
    pub view: ViewId,
    generation: u64,
    cancel: CancellationToken,
}

impl MountTicket {
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }
}

struct Mounted {
    view: ViewId,
    generation: u64,
    cancel: CancellationToken,
}

struct RegistryState<P> {
    next_generation: u64,
    mounted: Option<Mounted>,
    rendered: Option<P>,
}

/// One active view at a time. Mounting a view cancels the requests of the
/// previous mount, and its late results are refused by `apply`.
pub struct ViewRegistry<P> {
    state: Mutex<RegistryState<P>>,
}

impl<P: Clone> ViewRegistry<P> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(RegistryState {
                next_generation: 0,
                mounted: None,
                rendered: None,
            }),
        }
    }

    pub fn mount(&self, view: ViewId) -> MountTicket {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(previous) = state.mounted.take() {
            tracing::debug!(view = ?previous.view, generation = previous.generation, "unmounting view");
            previous.cancel.cancel();
        }

        state.next_generation += 1;
        let ticket = MountTicket {
            view,
            generation: state.next_generation,
            cancel: CancellationToken::new(),
        };
        state.mounted = Some(Mounted {
            view,
            generation: ticket.generation,
            cancel: ticket.cancel.clone(),
        });
        state.rendered = None;

        ticket
    }

    /// Unmounts whatever is mounted, e.g. on logout
    pub fn unmount_all(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = state.mounted.take() {
            previous.cancel.cancel();
        }
        state.rendered = None;
    }

    /// Stores the page if the ticket still belongs to the mounted view.
    /// Returns false for a stale ticket, leaving state untouched.
    pub fn apply(&self, ticket: &MountTicket, page: P) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        let current = state
            .mounted
            .as_ref()
            .is_some_and(|m| m.generation == ticket.generation);
        if !current {
            tracing::debug!(view = ?ticket.view, generation = ticket.generation, "discarding stale page");
            return false;
        }

        state.rendered = Some(page);
        true
    }

    pub fn current(&self) -> Option<(ViewId, P)> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let view = state.mounted.as_ref()?.view;
        state.rendered.clone().map(|page| (view, page))
    }
}

impl<P: Clone> Default for ViewRegistry<P> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_ticket_applies() {
        let registry = ViewRegistry::new();
        let ticket = registry.mount(ViewId::Overview);

        assert!(registry.apply(&ticket, "overview"));
        assert_eq!(registry.current(), Some((ViewId::Overview, "overview")));
    }

    #[test]
    fn test_stale_ticket_is_discarded() {
        let registry = ViewRegistry::new();
        let engine = registry.mount(ViewId::Subsystem(Subsystem::Engine));
        let battery = registry.mount(ViewId::Subsystem(Subsystem::Battery));

        assert!(engine.cancellation().is_cancelled());
        assert!(!battery.cancellation().is_cancelled());

        assert!(registry.apply(&battery, "battery page"));
        assert!(!registry.apply(&engine, "late engine page"));
        assert_eq!(
            registry.current(),
            Some((ViewId::Subsystem(Subsystem::Battery), "battery page"))
        );
    }

    #[test]
    fn test_remount_of_same_view_invalidates_previous_load() {
        let registry = ViewRegistry::new();
        let first = registry.mount(ViewId::Overview);
        let second = registry.mount(ViewId::Overview);

        assert!(!registry.apply(&first, 1));
        assert!(registry.apply(&second, 2));
        assert_eq!(registry.current(), Some((ViewId::Overview, 2)));
    }

    #[test]
    fn test_unmount_all_rejects_in_flight_loads() {
        let registry = ViewRegistry::new();
        let ticket = registry.mount(ViewId::Overview);

        registry.unmount_all();

        assert!(ticket.cancellation().is_cancelled());
        assert!(!registry.apply(&ticket, "late"));
        assert_eq!(registry.current(), None);
    }
}
