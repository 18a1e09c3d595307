//! # arqueo-core: Shift Cash-Reconciliation Engine
//!
//! Pure business logic behind opening a shift, totalling its sales and
//! closing it with a cash audit ("arqueo"). Zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Arqueo Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Cashier UI                                   │   │
//! │  │    Open Shift ──► Checkout ──► Count Drawer ──► Print Arqueo    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ arqueo-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐  ┌────────────┐  ┌──────────┐  ┌──────────────┐  │   │
//! │  │   │  money   │  │ aggregator │  │  shift   │  │reconciliation│  │   │
//! │  │   │  Money   │  │SalesSummary│  │ open /   │  │  reconcile   │  │   │
//! │  │   │ to_money │  │ by_method  │  │ close    │  │ EXACT/±      │  │   │
//! │  │   └──────────┘  └────────────┘  └──────────┘  └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │          arqueo-db (shifts, transactions, ShiftService)         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic and input parsing
//! - [`aggregator`] - Reduces a shift's transactions into sale statistics
//! - [`shift`] - Shift lifecycle (open, preview, close)
//! - [`reconciliation`] - Expected vs counted cash
//! - [`types`] - Shift, Transaction and their enums
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use arqueo_core::money::to_money;
//! use arqueo_core::reconciliation::ReconciliationStatus;
//! use arqueo_core::shift::{close_shift, open_shift};
//! use chrono::Utc;
//!
//! let float = to_money("500.00", "initial_cash").unwrap();
//! let mut shift = open_shift("cashier-7", float, Utc::now()).unwrap();
//!
//! // ... sales recorded elsewhere ...
//! let counted = to_money("500.00", "counted_cash").unwrap();
//! let closure = close_shift(&mut shift, counted, &[], Utc::now()).unwrap();
//!
//! assert_eq!(closure.reconciliation.status, ReconciliationStatus::Exact);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod aggregator;
pub mod error;
pub mod money;
pub mod reconciliation;
pub mod shift;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use aggregator::{aggregate, MethodTotals, PaymentMethodBreakdown, SalesSummary};
pub use error::{CoreError, CoreResult, DataIntegrityWarning, ValidationError};
pub use money::{to_money, Money, RawAmount};
pub use reconciliation::{reconcile, ReconciliationResult, ReconciliationStatus};
pub use shift::{close_shift, open_shift, preview_close, ShiftClosure, ShiftPhase};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity on a single sale line.
///
/// Catches typos like 1000 instead of 10 before they reach the drawer total.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Largest amount accepted for a single input: $1,000,000,000,000.00.
///
/// Far below `i64::MAX`, so the sums and differences the engine forms from
/// accepted inputs cannot overflow.
pub const MAX_AMOUNT_CENTS: i64 = 100_000_000_000_000;

/// Maximum length of an opaque identifier (cashier id, shift id).
pub const MAX_ID_LENGTH: usize = 64;
