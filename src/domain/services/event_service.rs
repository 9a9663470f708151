use crate::domain::events::user_registration_event::UserRegistrationEvent;

/// Fire-and-forget delivery of domain events to in-process subscribers.
/// Delivery failures stay inside the publisher.
pub trait EventPublisher: Send + Sync {
    fn publish(&self, event: UserRegistrationEvent);
}
