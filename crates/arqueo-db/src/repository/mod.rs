//! # Repository Module
//!
//! SQL for shifts and transactions lives here and nowhere else.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ShiftService                                                           │
//! │       │                                                                 │
//! │       ├──► ShiftRepository        insert / get / mark_closed ...        │
//! │       └──► TransactionRepository  insert / list_for_shift ...           │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │               SQLite Database                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ShiftRepository`](shift::ShiftRepository) - Shift rows and the guarded close
//! - [`TransactionRepository`](transaction::TransactionRepository) - Sales per shift

pub mod shift;
pub mod transaction;
