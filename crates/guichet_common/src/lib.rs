//! Shared domain library for the guichet intake service.
//!
//! Holds the conversation state machine (session registry + dialogue
//! engine) and the stores it drives (ticket ledger, notification log),
//! plus configuration and the shared error type. The daemon crate wires
//! these behind an HTTP surface.

pub mod config;
pub mod dialogue;
pub mod error;
pub mod notification;
pub mod phrases;
pub mod session;
pub mod ticket;

pub use config::GuichetConfig;
pub use dialogue::{handle, Reply, ReplyStatus};
pub use error::{GuichetError, Result};
pub use notification::{Notification, NotificationLevel, NotificationLog};
pub use session::{SessionRegistry, Stage};
pub use ticket::{
    aggregate, DayActivity, LocationCount, Ticket, TicketStats, TicketStatus, TicketStore,
};
