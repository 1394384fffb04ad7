pub mod api;
pub mod clock;
pub mod config;
pub mod error;
pub mod events;
pub mod popup;
pub mod render;
pub mod session;
pub mod store;
