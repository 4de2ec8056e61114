//! Participant lifecycle and the once-per-process generation guard.
//!
//! Three things can ask for generation:
//! (a) the authority, right after it publishes the seed
//! (b) a seed change notification
//! (c) the late-join pull of the current value
//!
//! All three go through [`Participant::ensure_generated_for`]. Only the
//! first call that wins the guard generates; the rest are no-ops.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Receiver;
use std::sync::{Mutex, PoisonError};

use bevy::prelude::*;
use rand::Rng;

use crate::config::{GenerationConfig, Role, SessionConfig};
use crate::error::{ArenaError, ArenaResult};
use crate::generation::{generate_arena, Arena, ArenaGenerated, Seed};
use crate::replication::{choose_seed, ReplicatedSeed, SeedChange, SeedReader, SeedWriter};

/// Latch that flips false -> true once and never back
#[derive(Debug, Default)]
pub struct GenerationGuard {
    generated: AtomicBool,
}

impl GenerationGuard {
    /// True for exactly one caller over the guard's lifetime
    pub fn try_claim(&self) -> bool {
        self.generated
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn is_generated(&self) -> bool {
        self.generated.load(Ordering::Acquire)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// This call built the arena
    Generated,
    /// An earlier trigger already built it
    AlreadyGenerated,
    /// No seed yet; wait for a notification
    Pending,
}

/// One process taking part in the session
#[derive(Debug)]
pub struct Participant {
    ordinal: u64,
    reader: SeedReader,
    writer: Option<SeedWriter>,
    config: GenerationConfig,
    guard: GenerationGuard,
    arena: Option<Arena>,
    generations: u32,
}

impl Participant {
    /// The authority is always ordinal 0 and the only writer
    pub fn authority(writer: SeedWriter, config: GenerationConfig) -> ArenaResult<Self> {
        config.validate()?;
        Ok(Self {
            ordinal: 0,
            reader: writer.reader(),
            writer: Some(writer),
            config,
            guard: GenerationGuard::default(),
            arena: None,
            generations: 0,
        })
    }

    pub fn client(
        ordinal: u64,
        reader: SeedReader,
        config: GenerationConfig,
    ) -> ArenaResult<Self> {
        if ordinal == 0 {
            return Err(ArenaError::InvalidConfig(
                "ordinal 0 is reserved for the authority".into(),
            ));
        }
        config.validate()?;
        Ok(Self {
            ordinal,
            reader,
            writer: None,
            config,
            guard: GenerationGuard::default(),
            arena: None,
            generations: 0,
        })
    }

    pub fn ordinal(&self) -> u64 {
        self.ordinal
    }

    pub fn is_authority(&self) -> bool {
        self.writer.is_some()
    }

    pub fn reader(&self) -> &SeedReader {
        &self.reader
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn arena(&self) -> Option<&Arena> {
        self.arena.as_ref()
    }

    pub fn is_generated(&self) -> bool {
        self.guard.is_generated()
    }

    /// Number of grids this participant actually built (0 or 1)
    pub fn generation_count(&self) -> u32 {
        self.generations
    }

    /// Session start. The authority picks and publishes a seed with `rng`
    /// then generates (a); a client pulls whatever is already there (c).
    ///
    /// The authority publishes at most once: if the cell already holds a
    /// seed, a repeated start reuses it instead of drawing a new one.
    ///
    /// Clients should subscribe before calling this so nothing published
    /// between the pull and the subscription is lost.
    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) -> ArenaResult<GenerationOutcome> {
        if let Some(writer) = &self.writer {
            if let Some(seed) = self.reader.current_seed()? {
                debug!(seed = seed.value(), "Seed already published, not choosing again");
                return Ok(self.ensure_generated_for(seed));
            }
            let seed = choose_seed(rng);
            info!(seed = seed.value(), "Authority chose seed");
            writer.publish(seed);
            return Ok(self.ensure_generated_for(seed));
        }

        match self.reader.current_seed()? {
            Some(seed) => {
                debug!(ordinal = self.ordinal, seed = seed.value(), "Late join, seed already set");
                Ok(self.ensure_generated_for(seed))
            }
            None => Ok(GenerationOutcome::Pending),
        }
    }

    /// Notification path (b)
    pub fn on_seed_changed(&mut self, change: SeedChange) -> ArenaResult<GenerationOutcome> {
        match change.new_seed()? {
            Some(seed) => Ok(self.ensure_generated_for(seed)),
            None if change.old != 0 => Err(ArenaError::SeedReset {
                previous: change.old,
            }),
            None => Ok(GenerationOutcome::Pending),
        }
    }

    /// The single idempotent entry point shared by every trigger
    pub fn ensure_generated_for(&mut self, seed: Seed) -> GenerationOutcome {
        if !self.guard.try_claim() {
            match &self.arena {
                Some(arena) if arena.seed != seed => warn!(
                    ordinal = self.ordinal,
                    built = arena.seed.value(),
                    requested = seed.value(),
                    "Ignoring seed change after generation"
                ),
                _ => debug!(ordinal = self.ordinal, seed = seed.value(), "Redundant generation trigger"),
            }
            return GenerationOutcome::AlreadyGenerated;
        }

        self.arena = Some(generate_arena(seed, &self.config));
        self.generations += 1;
        GenerationOutcome::Generated
    }
}

// =====================================================
// Bevy integration
// =====================================================

/// How this process is wired to the replicated seed
pub enum SeedLink {
    Authority(SeedWriter),
    Client { ordinal: u64, reader: SeedReader },
    /// Client whose notifications come from an external transport
    Transport {
        ordinal: u64,
        reader: SeedReader,
        changes: Receiver<SeedChange>,
    },
    /// Client plus an in-process stand-in authority, for running without a transport
    Loopback { ordinal: u64 },
}

impl SeedLink {
    pub fn from_session(session: &SessionConfig) -> Self {
        match session.role {
            Role::Authority => {
                let (writer, _reader) = ReplicatedSeed::channel();
                Self::Authority(writer)
            }
            Role::Client => Self::Loopback {
                ordinal: session.ordinal,
            },
        }
    }
}

/// Owns the generation config its participants build from, so the result
/// never depends on plugin order. The same config is installed as the
/// `GenerationConfig` resource for geometry and spawn systems.
pub struct SessionPlugin {
    link: Mutex<Option<SeedLink>>,
    config: GenerationConfig,
}

impl SessionPlugin {
    pub fn new(link: SeedLink, config: GenerationConfig) -> Self {
        Self {
            link: Mutex::new(Some(link)),
            config,
        }
    }
}

/// The local participant
#[derive(Resource, Debug)]
pub struct LocalParticipant(pub Participant);

/// Stand-in authority sharing this process (loopback sessions only)
#[derive(Resource, Debug)]
pub struct LoopbackHost(pub Participant);

/// Notification stream for the local participant
#[derive(Resource)]
pub struct SeedFeed {
    receiver: Mutex<Receiver<SeedChange>>,
}

impl Plugin for SessionPlugin {
    fn build(&self, app: &mut App) {
        let config = self.config.clone();
        match app.world().get_resource::<GenerationConfig>() {
            Some(installed) if *installed != config => error!(
                installed = %format!("{:016x}", installed.fingerprint()),
                session = %format!("{:016x}", config.fingerprint()),
                "GenerationConfig resource differs from the session config, replacing it"
            ),
            _ => {}
        }
        app.insert_resource(config.clone())
            .add_event::<ArenaGenerated>();

        let link = self
            .link
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some(link) = link else {
            warn!("SessionPlugin built twice, ignoring");
            return;
        };

        let (participant, receiver) = match connect(app, link, config) {
            Ok(connected) => connected,
            Err(e) => {
                error!("Session setup failed: {}", e);
                app.add_systems(Startup, exit_on_setup_failure);
                return;
            }
        };

        app.insert_resource(SeedFeed {
            receiver: Mutex::new(receiver),
        })
        .insert_resource(LocalParticipant(participant))
        .add_systems(Startup, (start_loopback_host, start_local_participant).chain())
        .add_systems(Update, drain_seed_feed);
    }
}

/// Build the local participant and its notification stream.
/// Subscribes before anything can publish.
fn connect(
    app: &mut App,
    link: SeedLink,
    config: GenerationConfig,
) -> ArenaResult<(Participant, Receiver<SeedChange>)> {
    Ok(match link {
        SeedLink::Authority(writer) => {
            let participant = Participant::authority(writer, config)?;
            let receiver = participant.reader().subscribe();
            (participant, receiver)
        }
        SeedLink::Client { ordinal, reader } => {
            let receiver = reader.subscribe();
            (Participant::client(ordinal, reader, config)?, receiver)
        }
        SeedLink::Transport {
            ordinal,
            reader,
            changes,
        } => (Participant::client(ordinal, reader, config)?, changes),
        SeedLink::Loopback { ordinal } => {
            let (writer, reader) = ReplicatedSeed::channel();
            let receiver = reader.subscribe();
            let local = Participant::client(ordinal, reader, config.clone())?;
            app.insert_resource(LoopbackHost(Participant::authority(writer, config)?));
            (local, receiver)
        }
    })
}

fn exit_on_setup_failure(mut exit: EventWriter<AppExit>) {
    exit.send(AppExit::error());
}

fn start_loopback_host(host: Option<ResMut<LoopbackHost>>) {
    let Some(mut host) = host else {
        return;
    };
    if let Err(e) = host.0.start(&mut rand::thread_rng()) {
        error!("Loopback host failed to start: {}", e);
    }
}

fn start_local_participant(
    mut local: ResMut<LocalParticipant>,
    mut generated: EventWriter<ArenaGenerated>,
    mut exit: EventWriter<AppExit>,
) {
    let result = local.0.start(&mut rand::thread_rng());
    report_outcome(&local.0, result, &mut generated, &mut exit);
}

fn drain_seed_feed(
    feed: Res<SeedFeed>,
    mut local: ResMut<LocalParticipant>,
    mut generated: EventWriter<ArenaGenerated>,
    mut exit: EventWriter<AppExit>,
) {
    let receiver = feed.receiver.lock().unwrap_or_else(PoisonError::into_inner);
    for change in receiver.try_iter() {
        let result = local.0.on_seed_changed(change);
        report_outcome(&local.0, result, &mut generated, &mut exit);
    }
}

fn report_outcome(
    participant: &Participant,
    result: ArenaResult<GenerationOutcome>,
    generated: &mut EventWriter<ArenaGenerated>,
    exit: &mut EventWriter<AppExit>,
) {
    match result {
        Ok(GenerationOutcome::Generated) => {
            if let Some(arena) = participant.arena() {
                generated.send(ArenaGenerated {
                    seed: arena.seed,
                    grid: arena.grid.clone(),
                });
            }
        }
        Ok(GenerationOutcome::AlreadyGenerated | GenerationOutcome::Pending) => {}
        Err(e) => {
            // A bad seed after join means the authority broke its contract
            error!(ordinal = participant.ordinal(), "Seed contract violated: {}", e);
            exit.send(AppExit::error());
        }
    }
}
