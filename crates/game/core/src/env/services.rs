//! Command-side collaborator services.
//!
//! These are the narrow interfaces through which the core drives the host:
//! navigation commands, fire-and-forget presentation calls, and delayed
//! callbacks. Nothing here returns data the core's decision logic depends on
//! except [`Navigator::is_navigating`] and timer identifiers used for
//! cancellation.

use crate::state::{AssetId, EntityId, Seconds, WorldPos};

/// Pathing commands for an actor. Implemented by the host's movement layer.
pub trait Navigator {
    fn move_to_point(&mut self, actor: EntityId, goal: WorldPos);
    fn move_to_entity(&mut self, actor: EntityId, target: EntityId);
    fn stop(&mut self, actor: EntityId);
    fn is_navigating(&self, actor: EntityId) -> bool;
}

/// Fire-and-forget audio/animation sink. The core never consumes a return
/// value from these calls.
pub trait Presentation {
    fn play_sound(&mut self, sound: AssetId);
    fn play_sound_at(&mut self, sound: AssetId, location: WorldPos);
    fn play_animation(&mut self, actor: EntityId, cue: AnimationCue);
}

/// Animation triggers the core can request by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationCue {
    Attack,
    Death,
}

/// Handle for a scheduled callback, used for cancellation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

/// Payload delivered back into the core when a scheduled delay elapses.
///
/// Events that mutate equipment-dependent state carry the equip epoch that
/// was current when they were scheduled; a landing whose epoch no longer
/// matches is stale (the item was swapped or dropped mid-flight) and must be
/// discarded without touching state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerEvent {
    FireCooldown { owner: EntityId, epoch: u64 },
    ReloadComplete { owner: EntityId, epoch: u64 },
    TempHealthDecay { owner: EntityId },
}

/// Delayed-callback scheduler. All callbacks resolve on the host's main tick
/// thread; there is no preemption.
pub trait TimerScheduler {
    /// One-shot callback after `delay`.
    fn schedule(&mut self, delay: Seconds, event: TimerEvent) -> TimerId;

    /// Repeating callback every `interval`.
    fn schedule_repeating(&mut self, interval: Seconds, event: TimerEvent) -> TimerId;

    /// Cancels a pending callback. Unknown or already-delivered ids are
    /// ignored.
    fn cancel(&mut self, id: TimerId);
}

/// Bundle of mutable collaborator services passed into core operations.
pub struct Services<'a> {
    pub navigator: &'a mut dyn Navigator,
    pub presentation: &'a mut dyn Presentation,
    pub timers: &'a mut dyn TimerScheduler,
}
