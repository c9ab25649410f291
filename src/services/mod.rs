//! Domain services used by websocket and HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own business logic and persistence concerns so route
//! handlers stay thin: `todo` is the only writer of the collection, `live`
//! owns subscriber fan-out. Routes translate service errors into HTTP
//! statuses or error frames and never touch SQL directly.

pub mod live;
pub mod todo;
