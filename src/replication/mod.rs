//! Seed replication
//!
//! Only the seed crosses the wire; every participant rebuilds the arena
//! from it locally. The replicated value is a single-writer, multi-reader
//! cell:
//! 1. The authority owns the one `SeedWriter` and publishes a `Seed`
//! 2. Every participant holds a `SeedReader` replica
//! 3. Each publish delivers `(old, new)` to the readers subscribed at that
//!    moment; a reader that subscribes later must pull `current()`
//!
//! Transport is out of scope here: this cell is the in-process stand-in a
//! network layer plugs into. Clients never own a writer, so write attempts
//! from them cannot be expressed.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, PoisonError, RwLock};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{PENDING_SEED, SEED_MAX, SEED_MIN};
use crate::error::ArenaResult;
use crate::generation::Seed;

/// Change notification: raw values, 0 meaning pending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedChange {
    pub old: u32,
    pub new: u32,
}

impl SeedChange {
    /// The new value as a seed; `None` while still pending
    pub fn new_seed(&self) -> ArenaResult<Option<Seed>> {
        if self.new == PENDING_SEED {
            return Ok(None);
        }
        Seed::try_from(self.new).map(Some)
    }
}

#[derive(Debug)]
struct SeedCell {
    value: u32,
    observers: Vec<Sender<SeedChange>>,
    publishes: u64,
}

type SharedCell = Arc<RwLock<SeedCell>>;

pub struct ReplicatedSeed;

impl ReplicatedSeed {
    /// A fresh cell in the pending state, with its only writer and a first reader
    pub fn channel() -> (SeedWriter, SeedReader) {
        let cell = Arc::new(RwLock::new(SeedCell {
            value: PENDING_SEED,
            observers: Vec::new(),
            publishes: 0,
        }));
        (
            SeedWriter {
                cell: Arc::clone(&cell),
            },
            SeedReader { cell },
        )
    }
}

/// Write half. Deliberately not `Clone`.
#[derive(Debug)]
pub struct SeedWriter {
    cell: SharedCell,
}

impl SeedWriter {
    /// Store `seed` and notify every live subscriber
    pub fn publish(&self, seed: Seed) -> SeedChange {
        let mut cell = self.cell.write().unwrap_or_else(PoisonError::into_inner);
        let change = SeedChange {
            old: cell.value,
            new: seed.value(),
        };
        cell.value = seed.value();
        cell.publishes += 1;
        cell.observers.retain(|tx| tx.send(change).is_ok());
        tracing::info!(
            old = change.old,
            new = change.new,
            observers = cell.observers.len(),
            "Seed published"
        );
        change
    }

    pub fn reader(&self) -> SeedReader {
        SeedReader {
            cell: Arc::clone(&self.cell),
        }
    }
}

/// Read-only replica handle
#[derive(Debug, Clone)]
pub struct SeedReader {
    cell: SharedCell,
}

impl SeedReader {
    /// Raw current value (0 while pending)
    pub fn current(&self) -> u32 {
        self.cell
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .value
    }

    /// Current value as a seed, `None` while pending
    pub fn current_seed(&self) -> ArenaResult<Option<Seed>> {
        match self.current() {
            PENDING_SEED => Ok(None),
            raw => Seed::try_from(raw).map(Some),
        }
    }

    /// Receive every change published after this call
    pub fn subscribe(&self) -> Receiver<SeedChange> {
        let (tx, rx) = channel();
        self.cell
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .observers
            .push(tx);
        rx
    }

    /// How many times the authority has written the cell
    pub fn publish_count(&self) -> u64 {
        self.cell
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .publishes
    }
}

/// Uniform in [SEED_MIN, SEED_MAX). Takes its own RNG, never the generation stream.
pub fn choose_seed<R: Rng + ?Sized>(rng: &mut R) -> Seed {
    let raw = rng.gen_range(SEED_MIN..SEED_MAX);
    Seed::try_from(raw).unwrap_or_else(|_| unreachable!("gen_range stays in seed range"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn seed(value: u32) -> Seed {
        Seed::try_from(value).unwrap()
    }

    #[test]
    fn test_starts_pending() {
        let (_writer, reader) = ReplicatedSeed::channel();
        assert_eq!(reader.current(), PENDING_SEED);
        assert_eq!(reader.current_seed().unwrap(), None);
        assert_eq!(reader.publish_count(), 0);
    }

    #[test]
    fn test_publish_updates_all_readers() {
        let (writer, reader) = ReplicatedSeed::channel();
        let other = reader.clone();
        let change = writer.publish(seed(4321));
        assert_eq!(change, SeedChange { old: 0, new: 4321 });
        assert_eq!(reader.current(), 4321);
        assert_eq!(other.current_seed().unwrap(), Some(seed(4321)));
        assert_eq!(writer.reader().publish_count(), 1);
    }

    #[test]
    fn test_subscribers_receive_old_and_new() {
        let (writer, reader) = ReplicatedSeed::channel();
        let rx = reader.subscribe();
        writer.publish(seed(1111));
        writer.publish(seed(2222));
        let received: Vec<SeedChange> = rx.try_iter().collect();
        assert_eq!(
            received,
            vec![
                SeedChange { old: 0, new: 1111 },
                SeedChange {
                    old: 1111,
                    new: 2222
                },
            ]
        );
    }

    #[test]
    fn test_late_subscriber_misses_earlier_notification() {
        let (writer, reader) = ReplicatedSeed::channel();
        writer.publish(seed(5555));
        let rx = reader.subscribe();
        assert!(rx.try_recv().is_err(), "notification already fired");
        assert_eq!(reader.current(), 5555, "late joiner must pull instead");
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let (writer, reader) = ReplicatedSeed::channel();
        let kept = reader.subscribe();
        drop(reader.subscribe());
        writer.publish(seed(3000));
        assert_eq!(writer.cell.read().unwrap().observers.len(), 1);
        assert_eq!(kept.try_recv().unwrap().new, 3000);
    }

    #[test]
    fn test_change_new_seed() {
        let pending = SeedChange { old: 0, new: 0 };
        assert_eq!(pending.new_seed().unwrap(), None);
        let valid = SeedChange { old: 0, new: 1234 };
        assert_eq!(valid.new_seed().unwrap(), Some(seed(1234)));
        let garbage = SeedChange { old: 0, new: 12 };
        assert!(garbage.new_seed().is_err());
    }

    #[test]
    fn test_choose_seed_in_range() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(99);
        for _ in 0..10_000 {
            let value = choose_seed(&mut rng).value();
            assert!((SEED_MIN..SEED_MAX).contains(&value));
            assert_ne!(value, PENDING_SEED);
        }
    }
}
