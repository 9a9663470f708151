use tokio::{
    sync::broadcast::{self, Receiver, Sender, error::RecvError},
    task::JoinHandle,
};
use tracing::{info, warn};

use crate::domain::{
    events::user_registration_event::UserRegistrationEvent,
    services::event_service::EventPublisher,
};

/// In-process event bus backed by a tokio broadcast channel
#[derive(Clone)]
pub struct BroadcastEventBus {
    sender: Sender<UserRegistrationEvent>,
}

impl BroadcastEventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> Receiver<UserRegistrationEvent> {
        self.sender.subscribe()
    }
}

impl EventPublisher for BroadcastEventBus {
    fn publish(&self, event: UserRegistrationEvent) {
        // sending only fails when nobody is listening
        if let Err(e) = self.sender.send(event) {
            warn!(email = %e.0.email, "registration event dropped: no subscribers");
        }
    }
}

/// Consume registration events until the bus is closed.
/// Mail delivery is handled elsewhere; this only records the pending confirmation.
pub fn spawn_registration_listener(mut receiver: Receiver<UserRegistrationEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    info!(email = %event.email, "confirmation pending for registered user");
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "registration listener lagged behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::user::ConfirmationCode;

    fn event(email: &str) -> UserRegistrationEvent {
        UserRegistrationEvent::new(email.to_string(), ConfirmationCode::new("code".to_string()))
    }

    #[tokio::test]
    async fn subscriber_receives_published_event() {
        let bus = BroadcastEventBus::new(8);
        let mut receiver = bus.subscribe();

        bus.publish(event("carol@x.com"));

        let received = receiver.recv().await.unwrap();
        assert_eq!(received, event("carol@x.com"));
    }

    #[tokio::test]
    async fn publish_without_subscribers_does_not_fail() {
        let bus = BroadcastEventBus::new(8);
        bus.publish(event("nobody@x.com"));
    }

    #[tokio::test]
    async fn listener_stops_when_bus_is_dropped() {
        let bus = BroadcastEventBus::new(8);
        let handle = spawn_registration_listener(bus.subscribe());

        bus.publish(event("carol@x.com"));
        drop(bus);

        handle.await.unwrap();
    }
}
