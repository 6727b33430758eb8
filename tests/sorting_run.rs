//! End-to-end sorting tests: CSV rosters on disk, an in-memory mailbox
//! double, and the real resolver in between.

use classmail::error::MailboxError;
use classmail::mailbox::{Mailbox, MessageId};
use classmail::roster;
use classmail::sorter::{Outcome, Sorter};

/// Mailbox double backed by a fixed set of raw `From:` headers.
#[derive(Default)]
struct FakeMailbox {
    messages: Vec<(MessageId, Vec<u8>)>,
    failing_folders: Vec<String>,
    moved: Vec<(MessageId, String)>,
    marked: Vec<MessageId>,
    expunged: Vec<MessageId>,
}

impl FakeMailbox {
    fn new(headers: &[&str]) -> Self {
        let messages = headers
            .iter()
            .enumerate()
            .map(|(i, header)| ((i + 1).to_string(), format!("{header}\r\n\r\n").into_bytes()))
            .collect();
        Self {
            messages,
            ..Self::default()
        }
    }
}

impl Mailbox for FakeMailbox {
    fn list_message_ids(&mut self) -> Result<Vec<MessageId>, MailboxError> {
        Ok(self.messages.iter().map(|(id, _)| id.clone()).collect())
    }

    fn fetch_sender_header(&mut self, id: &str) -> Result<Vec<u8>, MailboxError> {
        self.messages
            .iter()
            .find(|(message_id, _)| message_id == id)
            .map(|(_, raw)| raw.clone())
            .ok_or(MailboxError::Disconnected)
    }

    fn move_message(&mut self, id: &str, destination_folder: &str) -> Result<(), MailboxError> {
        if self.failing_folders.iter().any(|f| f == destination_folder) {
            return Err(MailboxError::Protocol {
                command: format!("COPY {id} \"{destination_folder}\""),
                response: "NO copy refused".to_string(),
            });
        }
        self.moved
            .push((id.to_string(), destination_folder.to_string()));
        Ok(())
    }

    fn mark_for_deletion(&mut self, id: &str) -> Result<(), MailboxError> {
        self.marked.push(id.to_string());
        Ok(())
    }

    fn purge_marked(&mut self) -> Result<(), MailboxError> {
        self.expunged.append(&mut self.marked);
        Ok(())
    }
}

fn write_rosters(dir: &std::path::Path) {
    std::fs::write(
        dir.join("sixieme.csv"),
        "nom,prenom,classe\nMartin,Paul,6A\nMartin,Julie,6B\n",
    )
    .unwrap();
    std::fs::write(
        dir.join("cinquieme.csv"),
        "surname,given_name,class_id\nDe La Tour,Anne,5C\n",
    )
    .unwrap();
}

#[test]
fn full_run_moves_matched_students_and_purges() {
    let dir = tempfile::tempdir().unwrap();
    write_rosters(dir.path());
    let roster = roster::load_dir(dir.path()).unwrap();
    assert_eq!(roster.len(), 3);

    let mut mailbox = FakeMailbox::new(&[
        "From: Paul Martin <paul@famille-martin.example>",
        "From: Weekly Newsletter <news@example.com>",
        "From: =?utf-8?Q?Anne_De_La_Tour?= <anne@example.org>",
        "From: Martin <mystery@example.org>",
    ]);

    let sorter = Sorter::new(&roster, "INBOX/STUDENTS");
    let reports = sorter.run(&mut mailbox).unwrap();

    assert_eq!(reports.len(), 4);
    assert!(matches!(reports[0].outcome, Outcome::Moved { ref class_id, .. } if class_id == "6A"));
    assert_eq!(reports[1].outcome, Outcome::Unmatched);
    assert!(matches!(reports[2].outcome, Outcome::Moved { ref class_id, .. } if class_id == "5C"));
    // Two Martins, no given name in the display name: ambiguous, left alone.
    assert_eq!(reports[3].outcome, Outcome::Unmatched);

    assert_eq!(
        mailbox.moved,
        vec![
            ("1".to_string(), "INBOX/STUDENTS/6A".to_string()),
            ("3".to_string(), "INBOX/STUDENTS/5C".to_string()),
        ]
    );
    assert_eq!(mailbox.expunged, vec!["1".to_string(), "3".to_string()]);
}

#[test]
fn failed_move_survives_the_purge() {
    let dir = tempfile::tempdir().unwrap();
    write_rosters(dir.path());
    let roster = roster::load_dir(dir.path()).unwrap();

    let mut mailbox = FakeMailbox::new(&[
        "From: Julie Martin <julie@example.org>",
        "From: Anne De La Tour <anne@example.org>",
    ]);
    mailbox.failing_folders.push("INBOX/STUDENTS/6B".to_string());

    let sorter = Sorter::new(&roster, "INBOX/STUDENTS");
    let reports = sorter.run(&mut mailbox).unwrap();

    assert!(matches!(
        reports[0].outcome,
        Outcome::MoveFailed { ref class_id, .. } if class_id == "6B"
    ));
    assert!(matches!(reports[1].outcome, Outcome::Moved { .. }));
    // Only the successfully moved message was flagged and expunged.
    assert_eq!(mailbox.expunged, vec!["2".to_string()]);
}

#[test]
fn empty_roster_leaves_every_message_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let roster = roster::load_dir(dir.path()).unwrap();
    assert!(roster.is_empty());

    let mut mailbox = FakeMailbox::new(&["From: Paul Martin <paul@example.org>"]);
    let sorter = Sorter::new(&roster, "INBOX/STUDENTS");
    let reports = sorter.run(&mut mailbox).unwrap();

    assert_eq!(reports[0].outcome, Outcome::Unmatched);
    assert!(mailbox.moved.is_empty());
    assert!(mailbox.expunged.is_empty());
}
