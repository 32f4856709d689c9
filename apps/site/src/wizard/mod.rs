// Generate → preview wizard.
// Validation and templates are pure; the controller and copy acknowledger own
// their timers; sessions tie both to the lifetime of one screen.

pub mod clipboard;
pub mod controller;
pub mod handlers;
pub mod models;
pub mod session;
pub mod templates;
pub mod validation;
