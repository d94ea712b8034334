//! # mnumistore
//!
//! File-backed storage for the calendars and translations a web-to-print
//! designer uses. Each resource is one small JSON file in a per-kind
//! directory; the file name is the resource's identity. On top of the
//! files this crate provides filtered, paginated listings and maps each
//! resource into the document shape the designer's REST clients expect.
//!
//! The crate is a library first. The `mnumi` binary is one client of it; a
//! REST handler would be another.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Picks the store per kind, fills listing defaults         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - list / get / create / update / delete                    │
//! │  - Returns CmdResult, never prints                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Query, mapping, codecs                                     │
//! │  - query.rs: filter + paginate    mapper.rs: documents      │
//! │  - calendar.rs / translation.rs: payload formats            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - ResourceStore trait                                      │
//! │  - FsStore (production), InMemoryStore (testing)            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## No I/O Assumptions in Core
//!
//! Nothing in this crate writes to stdout or stderr or exits the process.
//! Diagnostics go through `tracing`; installing a subscriber is up to the
//! binary.

pub mod api;
pub mod calendar;
pub mod commands;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod mapper;
pub mod metadata;
pub mod model;
pub mod naming;
pub mod pagination;
pub mod payload;
pub mod query;
pub mod store;
pub mod translation;

pub use api::{DesignerApi, ListParams};
pub use error::{Result, StoreError};
pub use model::{ResourceHandle, ResourceId, ResourceKind};
