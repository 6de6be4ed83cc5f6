//! Intent router and stage continuations.
//!
//! One call per inbound message: [`handle`] reads the caller's stage,
//! dispatches either to new-conversation classification or to the
//! continuation for the active stage, and returns the reply payload.
//! Only the two ticket-completing continuations touch the ticket store and
//! the notification log; every other path mutates the session registry at
//! most.

use std::collections::HashMap;

use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::notification::{NotificationLevel, NotificationLog};
use crate::phrases;
use crate::session::{SessionRegistry, Stage};
use crate::ticket::TicketStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyStatus {
    Success,
    Retry,
}

/// What goes back to the user, plus the machine-readable extras the web
/// client keys on.
#[derive(Debug, Clone, Serialize)]
pub struct Reply {
    pub reply: String,
    pub status: ReplyStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
}

impl Reply {
    fn success(text: impl Into<String>) -> Self {
        Self {
            reply: text.into(),
            status: ReplyStatus::Success,
            ticket_id: None,
            priority: None,
        }
    }

    fn retry(text: impl Into<String>) -> Self {
        Self {
            reply: text.into(),
            status: ReplyStatus::Retry,
            ticket_id: None,
            priority: None,
        }
    }
}

/// Process one inbound message for one user.
///
/// The raw text is lower-cased once for matching; ticket locations keep the
/// user's original casing.
pub fn handle(
    sessions: &mut SessionRegistry,
    tickets: &mut TicketStore,
    notifications: &mut NotificationLog,
    user_id: &str,
    raw_message: &str,
) -> Result<Reply> {
    let message = raw_message.to_lowercase();
    match sessions.stage(user_id) {
        Stage::AwaitingLocation => {
            complete_location_ticket(sessions, tickets, notifications, user_id, raw_message)
        }
        Stage::AwaitingEmergencyLocation => {
            complete_emergency_ticket(sessions, tickets, notifications, user_id, raw_message)
        }
        Stage::AwaitingBillDetail => Ok(resolve_bill_detail(sessions, user_id, &message)),
        Stage::Idle => Ok(classify_new_conversation(sessions, user_id, &message)),
    }
}

fn contains_any(message: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| message.contains(k))
}

/// Ordered first-match-wins classification for users with no active stage.
/// A message holding both "panne" and "facture" resolves to the panne
/// branch.
fn classify_new_conversation(
    sessions: &mut SessionRegistry,
    user_id: &str,
    message: &str,
) -> Reply {
    if contains_any(message, phrases::OUTAGE_KEYWORDS) {
        sessions.set_stage(user_id, Stage::AwaitingLocation, HashMap::new());
        Reply::success(phrases::ASK_LOCATION)
    } else if contains_any(message, phrases::BILL_KEYWORDS) {
        sessions.set_stage(user_id, Stage::AwaitingBillDetail, HashMap::new());
        Reply::success(phrases::ASK_BILL_DETAIL)
    } else if contains_any(message, phrases::EMERGENCY_KEYWORDS) {
        sessions.set_stage(user_id, Stage::AwaitingEmergencyLocation, HashMap::new());
        Reply::success(phrases::ASK_EMERGENCY_LOCATION)
    } else if contains_any(message, phrases::GREETING_KEYWORDS) {
        Reply::success(phrases::GREETING)
    } else if contains_any(message, phrases::FAREWELL_KEYWORDS) {
        sessions.clear(user_id);
        Reply::success(phrases::FAREWELL)
    } else {
        Reply::success(phrases::FALLBACK)
    }
}

/// Continuation for `AwaitingLocation`: anything longer than 2 characters
/// counts as a location; shorter input gets a retry reply and the stage is
/// left untouched so the user can try again indefinitely.
fn complete_location_ticket(
    sessions: &mut SessionRegistry,
    tickets: &mut TicketStore,
    notifications: &mut NotificationLog,
    user_id: &str,
    raw_message: &str,
) -> Result<Reply> {
    let location = raw_message.trim();
    if location.chars().count() <= 2 {
        return Ok(Reply::retry(phrases::RETRY_LOCATION));
    }

    let ticket_id = tickets.create(user_id, "panne", location)?;
    notifications.add(
        "Nouvelle panne signalée",
        &format!("Ticket #{ticket_id} — {location}"),
        NotificationLevel::Info,
    );
    sessions.clear(user_id);
    info!(ticket_id, user = user_id, location, "outage ticket created");

    let mut reply = Reply::success(phrases::outage_created(ticket_id, location));
    reply.ticket_id = Some(ticket_id);
    Ok(reply)
}

/// Continuation for `AwaitingEmergencyLocation`: same shape as the outage
/// flow with a stricter length threshold, an urgent notification and a
/// priority marker on the reply.
fn complete_emergency_ticket(
    sessions: &mut SessionRegistry,
    tickets: &mut TicketStore,
    notifications: &mut NotificationLog,
    user_id: &str,
    raw_message: &str,
) -> Result<Reply> {
    let location = raw_message.trim();
    if location.chars().count() <= 5 {
        return Ok(Reply::retry(phrases::RETRY_EMERGENCY_LOCATION));
    }

    let ticket_id = tickets.create(user_id, "urgence_medicale", location)?;
    notifications.add(
        "🚨 Urgence médicale",
        &format!("Ticket #{ticket_id} — {location}"),
        NotificationLevel::Urgent,
    );
    sessions.clear(user_id);
    info!(ticket_id, user = user_id, location, "emergency ticket created");

    let mut reply = Reply::success(phrases::emergency_created(ticket_id, location));
    reply.ticket_id = Some(ticket_id);
    reply.priority = Some("urgent".to_string());
    Ok(reply)
}

/// Continuation for `AwaitingBillDetail`: first matching topic wins; no
/// match gets the generic hint. Either way the session is cleared — the
/// bill flow does not loop, unlike the location flows.
fn resolve_bill_detail(sessions: &mut SessionRegistry, user_id: &str, message: &str) -> Reply {
    sessions.clear(user_id);
    for (key, explanation) in phrases::BILL_TOPICS {
        if message.contains(key) {
            return Reply::success(*explanation);
        }
    }
    Reply::success(phrases::BILL_FALLBACK)
}
