//! Core business logic module
//!
//! This module contains the ledger components:
//! - `traits` - Seams for time, notifications and receipt delivery
//! - `validation` - Form and recipient checks
//! - `transaction_store` - Append-only record storage
//! - `ledger` - Application state and its action handlers
//! - `desk` - Async controller sharing the state with in-flight sends
//! - `gateway` - Simulated receipt delivery
//! - `clock` - System and deterministic clocks
//! - `notifier` - Notification sink backed by tracing

pub mod clock;
pub mod desk;
pub mod gateway;
pub mod ledger;
pub mod notifier;
pub mod traits;
pub mod transaction_store;
pub mod validation;

pub use clock::{SteppingClock, SystemClock};
pub use desk::{PendingSend, ReceiptDesk};
pub use gateway::{DeliveryConfig, SimulatedGateway};
pub use ledger::{LedgerState, SendTicket};
pub use notifier::TracingNotifier;
pub use traits::{Clock, DeliveryGateway, NoticeKind, Notifier, Sound};
pub use transaction_store::TransactionStore;
pub use validation::{is_valid_email, validate_email, validate_form, ValidatedForm};
