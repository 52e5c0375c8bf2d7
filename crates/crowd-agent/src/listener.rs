//! The add/remove observer protocol.
//!
//! Any subsystem that derives state from the live agent set (a spatial
//! bucket, a scheduler entry, a group membership) implements
//! [`ElementListener`] and registers with the [`Registry`](crate::Registry).
//! The registry calls every listener synchronously, in registration order.

use std::cell::RefCell;
use std::rc::Rc;

use crate::Agent;
use crate::error::BoxedListenerError;

/// Result of a listener callback.  An error aborts the registry operation
/// and, with it, the current tick.
pub type ListenerResult = Result<(), BoxedListenerError>;

/// Capability interface for add/remove notifications.
///
/// # Re-entrancy
///
/// Callbacks must not add or remove agents through the registry that is
/// notifying them.  The registry detects this and fails with
/// [`AgentError::ReentrantNotification`](crate::AgentError::ReentrantNotification).
pub trait ElementListener {
    /// Short name used in error messages and logs.
    fn name(&self) -> &'static str;

    /// The agent has just joined the live set.
    ///
    /// The record is mutable so listeners can initialize the state they own
    /// on it (next-step time, group membership).
    fn on_added(&mut self, agent: &mut Agent) -> ListenerResult;

    /// The agent is about to leave the live set.  Its last position and
    /// memberships are still readable.
    fn on_removed(&mut self, agent: &Agent) -> ListenerResult;
}

/// A listener handle shared between the registry and its owner.
///
/// The kernel is single-threaded, so `Rc<RefCell<_>>` is sufficient: the
/// simulation keeps a typed handle for driving the component and the
/// registry keeps a type-erased one for notifications.
pub type SharedListener = Rc<RefCell<dyn ElementListener>>;
