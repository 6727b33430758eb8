//! Mailbox sorting — drives name resolution over every inbox message and
//! issues move/flag decisions back to the mailbox.

use tracing::{debug, warn};

use crate::error::MailboxError;
use crate::mailbox::{Mailbox, decode};
use crate::roster::{Roster, resolve};

// ANSI markers for the per-message report lines.
const MAGENTA: &str = "\x1b[35m";
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";
const RESET: &str = "\x1b[0m";

/// Terminal state of one processed message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The display name did not resolve to a student; nothing was touched.
    Unmatched,
    /// Copied into the class folder and flagged for deletion.
    Moved {
        given_name: String,
        surname: String,
        class_id: String,
    },
    /// The copy failed; the message stays in place, unflagged.
    MoveFailed {
        given_name: String,
        surname: String,
        class_id: String,
    },
}

/// Report for one processed message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageReport {
    pub display_name: String,
    pub outcome: Outcome,
}

/// Render the one-line console report for a processed message.
pub fn report_line(report: &MessageReport) -> String {
    match &report.outcome {
        Outcome::Unmatched => {
            format!("{} - {CYAN}Not a student{RESET}", report.display_name)
        }
        Outcome::Moved {
            given_name,
            surname,
            class_id,
        } => format!(
            "{} - {MAGENTA}{given_name} {surname}{RESET} - {GREEN}Moved to {class_id}{RESET}",
            report.display_name
        ),
        Outcome::MoveFailed {
            given_name,
            surname,
            class_id,
        } => format!(
            "{} - {MAGENTA}{given_name} {surname}{RESET} - {RED}Issue during move to {class_id}{RESET}",
            report.display_name
        ),
    }
}

/// Sorts a mailbox against a fixed roster.
pub struct Sorter<'a> {
    roster: &'a Roster,
    folder_prefix: &'a str,
}

impl<'a> Sorter<'a> {
    pub fn new(roster: &'a Roster, folder_prefix: &'a str) -> Self {
        Self {
            roster,
            folder_prefix,
        }
    }

    /// Process every message in listing order, printing one report line per
    /// message, then purge everything flagged for deletion.
    ///
    /// Messages are handled strictly one at a time. A failed move is
    /// reported and skipped, never retried; the message keeps its place and
    /// is not flagged.
    pub fn run(&self, mailbox: &mut dyn Mailbox) -> Result<Vec<MessageReport>, MailboxError> {
        let ids = mailbox.list_message_ids()?;
        debug!(messages = ids.len(), "Inbox listed");

        let mut reports = Vec::with_capacity(ids.len());
        for id in &ids {
            let report = self.process_message(mailbox, id)?;
            println!("{}", report_line(&report));
            reports.push(report);
        }

        mailbox.purge_marked()?;
        Ok(reports)
    }

    fn process_message(
        &self,
        mailbox: &mut dyn Mailbox,
        id: &str,
    ) -> Result<MessageReport, MailboxError> {
        let raw = mailbox.fetch_sender_header(id)?;
        let (display_name, _address) = decode::decode_sender(&raw);

        let Some(student) = resolve(self.roster, &display_name) else {
            return Ok(MessageReport {
                display_name,
                outcome: Outcome::Unmatched,
            });
        };

        let folder = format!("{}/{}", self.folder_prefix, student.class_id);
        let outcome = match mailbox.move_message(id, &folder) {
            Ok(()) => {
                mailbox.mark_for_deletion(id)?;
                Outcome::Moved {
                    given_name: student.given_name.clone(),
                    surname: student.surname.clone(),
                    class_id: student.class_id.clone(),
                }
            }
            Err(e) => {
                warn!(message = %id, folder = %folder, error = %e, "Move failed");
                Outcome::MoveFailed {
                    given_name: student.given_name.clone(),
                    surname: student.surname.clone(),
                    class_id: student.class_id.clone(),
                }
            }
        };

        Ok(MessageReport {
            display_name,
            outcome,
        })
    }
}
