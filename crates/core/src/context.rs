//! Shared application context: current user, organization, and the mirrored
//! credit balance. Explicit object with an update-and-notify contract rather
//! than ambient globals; interested components subscribe for change events.

use std::sync::{Mutex, MutexGuard};
use tokio::sync::broadcast;

const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub user_id: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextEvent {
    CreditsSet { balance: i64 },
    CreditsSpent { amount: i64, remaining: i64 },
    OrganizationChanged { organization_id: Option<i64> },
}

#[derive(Debug, Default)]
struct ContextState {
    user: Option<UserIdentity>,
    organization_id: Option<i64>,
    credit_balance: i64,
}

pub struct AppContext {
    state: Mutex<ContextState>,
    events: broadcast::Sender<ContextEvent>,
}

impl AppContext {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            state: Mutex::new(ContextState::default()),
            events,
        }
    }

    fn state(&self) -> MutexGuard<'_, ContextState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn notify(&self, event: ContextEvent) {
        // No subscribers is fine; the send result is informational only.
        let _ = self.events.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ContextEvent> {
        self.events.subscribe()
    }

    pub fn user(&self) -> Option<UserIdentity> {
        self.state().user.clone()
    }

    pub fn set_user(&self, user: Option<UserIdentity>) {
        self.state().user = user;
    }

    pub fn organization_id(&self) -> Option<i64> {
        self.state().organization_id
    }

    pub fn set_organization(&self, organization_id: Option<i64>) {
        self.state().organization_id = organization_id;
        self.notify(ContextEvent::OrganizationChanged { organization_id });
    }

    pub fn credit_balance(&self) -> i64 {
        self.state().credit_balance
    }

    /// Overwrite the mirrored balance with the externally authoritative one.
    pub fn set_credit_balance(&self, balance: i64) {
        self.state().credit_balance = balance;
        self.notify(ContextEvent::CreditsSet { balance });
    }

    /// Decrement by the amount the generation API reported as consumed.
    /// The balance mirrors an external authority; no client-side floor.
    pub fn spend_credits(&self, amount: i64) -> i64 {
        let remaining = {
            let mut state = self.state();
            state.credit_balance -= amount;
            state.credit_balance
        };
        self.notify(ContextEvent::CreditsSpent { amount, remaining });
        remaining
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn spend_decrements_by_reported_amount_and_notifies() {
        let ctx = AppContext::new();
        let mut events = ctx.subscribe();

        ctx.set_credit_balance(10);
        assert_eq!(ctx.spend_credits(2), 8);
        assert_eq!(ctx.credit_balance(), 8);

        assert_eq!(
            events.recv().await.unwrap(),
            ContextEvent::CreditsSet { balance: 10 }
        );
        assert_eq!(
            events.recv().await.unwrap(),
            ContextEvent::CreditsSpent {
                amount: 2,
                remaining: 8
            }
        );
    }

    #[tokio::test]
    async fn organization_change_notifies_subscribers() {
        let ctx = AppContext::new();
        let mut events = ctx.subscribe();

        ctx.set_organization(Some(7));
        assert_eq!(ctx.organization_id(), Some(7));
        assert_eq!(
            events.recv().await.unwrap(),
            ContextEvent::OrganizationChanged {
                organization_id: Some(7)
            }
        );
    }
}
