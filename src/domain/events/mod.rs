pub mod user_registration_event;
