//! Session & synchronization core of the FinPro admin client.
//!
//! Everything the presentation layer needs lives behind three seams: the
//! [`SessionStore`] (who is logged in), the [`Client`] gateway (every
//! backend operation), and the [`EntityCache`] (the rendered snapshot).
//! The presentation layer never talks to a transport directly.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod session;
pub mod transport;

pub use cache::EntityCache;
pub use client::{AlwaysOnline, Client, ConnectivityProbe};
pub use config::AppConfig;
pub use error::{ApiError, AppError};
pub use session::{Session, SessionStore};
pub use transport::{Transport, TransportKind};
