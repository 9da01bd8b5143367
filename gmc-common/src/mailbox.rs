//! Single-slot command mailbox
//!
//! Holds only the most recent [`Command`]. Writers overwrite, readers get a
//! cloned snapshot of the command together with its arrival time. Critical
//! sections are a clone or a swap, so a plain `std::sync::RwLock` is enough
//! for both the synchronous perception loop and async request handlers.

use std::sync::RwLock;

use chrono::{DateTime, Utc};

use crate::command::Command;

/// Latest command plus the time the mailbox received it
#[derive(Debug, Clone, PartialEq)]
pub struct MailboxEntry {
    pub command: Command,
    pub received_at: DateTime<Utc>,
}

/// Thread-safe single-slot mailbox
#[derive(Debug, Default)]
pub struct Mailbox {
    slot: RwLock<Option<MailboxEntry>>,
}

impl Mailbox {
    /// Create an empty mailbox
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `command` as the latest, stamped with the current time.
    pub fn ingest(&self, command: Command) -> MailboxEntry {
        self.ingest_at(command, crate::time::now())
    }

    /// Store `command` as the latest with an explicit arrival time.
    pub fn ingest_at(&self, command: Command, received_at: DateTime<Utc>) -> MailboxEntry {
        let entry = MailboxEntry {
            command,
            received_at,
        };
        // A poisoned lock still holds a complete entry; keep serving it.
        let mut slot = self.slot.write().unwrap_or_else(|e| e.into_inner());
        *slot = Some(entry.clone());
        entry
    }

    /// Snapshot of the latest entry, or `None` if nothing has arrived yet.
    pub fn latest(&self) -> Option<MailboxEntry> {
        self.slot
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::{Action, Gesture};
    use crate::time::from_unix_seconds;
    use std::sync::Arc;
    use std::thread;

    fn command(gesture: Gesture, action: Action, secs: f64) -> Command {
        Command::new(gesture, action, from_unix_seconds(secs).unwrap())
    }

    #[test]
    fn test_empty_mailbox() {
        let mailbox = Mailbox::new();
        assert!(mailbox.latest().is_none());
    }

    #[test]
    fn test_latest_wins() {
        let mailbox = Mailbox::new();
        let c1 = command(Gesture::PalmPausePlay, Action::PausePlay, 10.0);
        let c2 = command(Gesture::FistMute, Action::Mute, 11.0);

        mailbox.ingest(c1);
        mailbox.ingest(c2.clone());

        let latest = mailbox.latest().unwrap();
        assert_eq!(latest.command, c2);
    }

    #[test]
    fn test_records_arrival_time() {
        let mailbox = Mailbox::new();
        let arrival = from_unix_seconds(500.0).unwrap();
        mailbox.ingest_at(command(Gesture::FistMute, Action::Mute, 1.0), arrival);

        assert_eq!(mailbox.latest().unwrap().received_at, arrival);
    }

    #[test]
    fn test_concurrent_snapshots_are_consistent() {
        // Each command's timestamp equals its arrival time, so a torn read
        // would show up as a mismatch.
        let mailbox = Arc::new(Mailbox::new());

        let writer = {
            let mailbox = Arc::clone(&mailbox);
            thread::spawn(move || {
                for i in 0..2000 {
                    let secs = 1_000.0 + i as f64;
                    let gesture = if i % 2 == 0 { Gesture::PalmPausePlay } else { Gesture::FistMute };
                    let c = command(gesture, Action::Mute, secs);
                    let at = c.timestamp;
                    mailbox.ingest_at(c, at);
                }
            })
        };

        for _ in 0..2000 {
            if let Some(entry) = mailbox.latest() {
                assert_eq!(entry.command.timestamp, entry.received_at);
            }
        }

        writer.join().unwrap();
    }
}
