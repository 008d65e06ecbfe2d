//! # parkswap
//!
//! REST service coordinating pairwise parking space swaps between
//! residents of a community.
//!
//! A resident holding spaces in block A who wants block B registers a
//! swap request; the service matches it against pending requests from
//! residents holding B, tracks two-party confirmation, and once both
//! sides confirm, exchanges the two assignment records in a single
//! atomic transaction. All coordination state lives in PostgreSQL;
//! there is no shared in-process mutable state, so horizontally scaled
//! instances coordinate purely through conditional and transactional
//! writes.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── SwapCoordinator + Matcher (service/)
//!     │
//!     ├── SwapStore trait (persistence/)
//!     │
//!     └── PostgreSQL (sqlx)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
