pub mod events;
pub mod health;
pub mod internal;
pub mod provisioning;
pub mod runs;
