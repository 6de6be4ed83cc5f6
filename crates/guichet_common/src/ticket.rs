//! Ticket ledger.
//!
//! Tickets live in one JSON document `{ "tickets": [...], "next_id": n }`
//! that is loaded at startup and rewritten in full after every mutation
//! (atomic temp file + rename). An absent file on first run is not an
//! error; the store initializes empty with `next_id = 1`.

use crate::error::{GuichetError, Result};
use chrono::{Days, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Local-time timestamps, stored as strings so the activity histogram can
/// prefix-match calendar dates.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Closed status set. Unknown values are rejected at the edge instead of
/// being stored verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Nouveau,
    EnCours,
    Resolu,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Nouveau => "nouveau",
            TicketStatus::EnCours => "en_cours",
            TicketStatus::Resolu => "resolu",
        }
    }
}

impl FromStr for TicketStatus {
    type Err = GuichetError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "nouveau" => Ok(TicketStatus::Nouveau),
            "en_cours" => Ok(TicketStatus::EnCours),
            "resolu" => Ok(TicketStatus::Resolu),
            other => Err(GuichetError::Validation(format!(
                "unknown ticket status '{other}' (expected nouveau, en_cours or resolu)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: u64,
    pub user_id: String,
    #[serde(rename = "type")]
    pub ticket_type: String,
    pub location: String,
    pub status: TicketStatus,
    pub created_at: String,
}

/// The persisted aggregate: every ticket plus the id counter, as one unit.
#[derive(Debug, Serialize, Deserialize)]
struct Ledger {
    tickets: Vec<Ticket>,
    next_id: u64,
}

impl Default for Ledger {
    fn default() -> Self {
        Self {
            tickets: Vec::new(),
            next_id: 1,
        }
    }
}

/// Durable, append-mostly ticket store. Identity allocation, append and
/// persist happen inside the same call; callers serialize access behind a
/// lock.
#[derive(Debug)]
pub struct TicketStore {
    path: PathBuf,
    ledger: Ledger,
}

impl TicketStore {
    /// Open the store at `path`, loading the persisted aggregate. A missing
    /// file initializes an empty ledger; a corrupt one is an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let ledger = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ledger::default(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, ledger })
    }

    /// Create a ticket and persist the aggregate. The returned id is unique
    /// and strictly greater than every previously issued id, also across
    /// restarts, because the counter is persisted with the tickets.
    pub fn create(&mut self, user_id: &str, ticket_type: &str, location: &str) -> Result<u64> {
        let id = self.ledger.next_id;
        self.ledger.tickets.push(Ticket {
            id,
            user_id: user_id.to_string(),
            ticket_type: ticket_type.to_string(),
            location: location.to_string(),
            status: TicketStatus::Nouveau,
            created_at: Local::now().format(TIMESTAMP_FORMAT).to_string(),
        });
        self.ledger.next_id += 1;
        if let Err(e) = self.persist() {
            // A failed write must not burn the id or leave a phantom ticket
            // in memory that the file does not have.
            self.ledger.tickets.pop();
            self.ledger.next_id = id;
            return Err(e);
        }
        Ok(id)
    }

    /// All tickets in creation order.
    pub fn list(&self) -> &[Ticket] {
        &self.ledger.tickets
    }

    pub fn get(&self, id: u64) -> Option<&Ticket> {
        self.ledger.tickets.iter().find(|t| t.id == id)
    }

    /// Set the status of an existing ticket, persisting on success.
    /// Returns `false` when the id is unknown.
    pub fn update_status(&mut self, id: u64, status: TicketStatus) -> Result<bool> {
        match self.ledger.tickets.iter_mut().find(|t| t.id == id) {
            Some(ticket) => {
                let previous = ticket.status;
                ticket.status = status;
                if let Err(e) = self.persist() {
                    if let Some(t) = self.ledger.tickets.iter_mut().find(|t| t.id == id) {
                        t.status = previous;
                    }
                    return Err(e);
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn persist(&self) -> Result<()> {
        let body = serde_json::to_string_pretty(&self.ledger)?;
        atomic_write(&self.path, &body)?;
        Ok(())
    }
}

/// Write via temp file + rename so the ledger is never half-written.
fn atomic_write(path: &Path, data: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let temp_path = path.with_extension("tmp");
    let mut file = File::create(&temp_path)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    fs::rename(&temp_path, path)
}

// ============================================================================
// Aggregate statistics
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationCount {
    pub location: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayActivity {
    pub date: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TicketStats {
    pub total: usize,
    pub nouveaux: usize,
    pub en_cours: usize,
    pub resolus: usize,
    pub urgents: usize,
    pub by_type: BTreeMap<String, usize>,
    pub top_locations: Vec<LocationCount>,
    pub last_7_days: Vec<DayActivity>,
}

/// The family groups related types: `facture_montant` counts as `facture`,
/// `urgence_medicale` as `urgence`.
fn type_family(ticket_type: &str) -> &str {
    ticket_type.split('_').next().unwrap_or(ticket_type)
}

/// Pure aggregation over a ticket slice. Empty input yields all-zero counts,
/// an empty top list and seven zero buckets.
pub fn aggregate(tickets: &[Ticket], top_n: usize) -> TicketStats {
    let mut nouveaux = 0;
    let mut en_cours = 0;
    let mut resolus = 0;
    for ticket in tickets {
        match ticket.status {
            TicketStatus::Nouveau => nouveaux += 1,
            TicketStatus::EnCours => en_cours += 1,
            TicketStatus::Resolu => resolus += 1,
        }
    }

    let mut by_type: BTreeMap<String, usize> = BTreeMap::new();
    for ticket in tickets {
        *by_type.entry(type_family(&ticket.ticket_type).to_string()).or_insert(0) += 1;
    }
    let urgents = by_type.get("urgence").copied().unwrap_or(0);

    // First-encounter order, then a stable sort on count alone: entries only
    // move ahead of one another on a strictly greater count, so ties keep
    // their original order.
    let mut top_locations: Vec<LocationCount> = Vec::new();
    for ticket in tickets {
        match top_locations.iter_mut().find(|l| l.location == ticket.location) {
            Some(entry) => entry.count += 1,
            None => top_locations.push(LocationCount {
                location: ticket.location.clone(),
                count: 1,
            }),
        }
    }
    top_locations.sort_by(|a, b| b.count.cmp(&a.count));
    top_locations.truncate(top_n);

    let today = Local::now().date_naive();
    let last_7_days = (0..7u64)
        .rev()
        .map(|offset| {
            let date = today
                .checked_sub_days(Days::new(offset))
                .unwrap_or(today)
                .format("%Y-%m-%d")
                .to_string();
            let count = tickets
                .iter()
                .filter(|t| t.created_at.starts_with(&date))
                .count();
            DayActivity { date, count }
        })
        .collect();

    TicketStats {
        total: tickets.len(),
        nouveaux,
        en_cours,
        resolus,
        urgents,
        by_type,
        top_locations,
        last_7_days,
    }
}
