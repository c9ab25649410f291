//! ticklist — a live-syncing todo service.
//!
//! ARCHITECTURE
//! ============
//! The server owns a single `todos` table in Postgres and exposes it two
//! ways: a REST surface for one-shot callers and a websocket subscription
//! that re-delivers the full list whenever the collection changes. All
//! mutations funnel through the todo service, which is the only writer.

pub mod db;
pub mod frame;
pub mod routes;
pub mod services;
pub mod state;
