//! Lifecycle event bus for scripting collaborators
//!
//! Handlers subscribe per event kind. For the vetoable kinds (battle start,
//! player turn, explore) a handler answering [`HookResponse::Handled`] tells
//! the engine to skip its default behavior.

use std::collections::HashMap;
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    BattleStart,
    BattleEnd,
    PlayerTurn,
    Explore,
    LevelUp,
    MissionComplete,
    ItemAcquired,
    BuffApplied,
    AreaEntered,
    CompanionHired,
}

impl EventKind {
    /// Whether a handler may suppress the engine's default behavior
    pub fn is_vetoable(self) -> bool {
        matches!(
            self,
            EventKind::BattleStart | EventKind::PlayerTurn | EventKind::Explore
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    BattleStart { foe: String, is_boss: bool },
    BattleEnd { foe: String, outcome: String },
    PlayerTurn { round: u32, foe: String },
    Explore { area: String },
    LevelUp { level: u32 },
    MissionComplete { mission_id: String },
    ItemAcquired { item_id: String },
    BuffApplied { name: String, duration: i32 },
    AreaEntered { area: String },
    CompanionHired { companion_id: String },
}

impl GameEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::BattleStart { .. } => EventKind::BattleStart,
            GameEvent::BattleEnd { .. } => EventKind::BattleEnd,
            GameEvent::PlayerTurn { .. } => EventKind::PlayerTurn,
            GameEvent::Explore { .. } => EventKind::Explore,
            GameEvent::LevelUp { .. } => EventKind::LevelUp,
            GameEvent::MissionComplete { .. } => EventKind::MissionComplete,
            GameEvent::ItemAcquired { .. } => EventKind::ItemAcquired,
            GameEvent::BuffApplied { .. } => EventKind::BuffApplied,
            GameEvent::AreaEntered { .. } => EventKind::AreaEntered,
            GameEvent::CompanionHired { .. } => EventKind::CompanionHired,
        }
    }
}

/// A handler's answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookResponse {
    /// The handler took care of the event; skip the default
    Handled,
    /// Carry on normally
    Continue,
}

/// Outcome of publishing one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookDecision {
    /// No handler is registered for the event
    NoHook,
    /// A handler asked to skip the default behavior
    Suppressed,
    /// Handlers ran and the default goes ahead
    Proceed,
}

impl HookDecision {
    pub fn is_suppressed(self) -> bool {
        self == HookDecision::Suppressed
    }
}

pub type Hook = Box<dyn FnMut(&GameEvent) -> HookResponse>;

/// Owned registry of event handlers
#[derive(Default)]
pub struct EventBus {
    hooks: HashMap<EventKind, Vec<Hook>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, kind: EventKind, hook: F)
    where
        F: FnMut(&GameEvent) -> HookResponse + 'static,
    {
        self.hooks.entry(kind).or_default().push(Box::new(hook));
    }

    pub fn has_hooks(&self, kind: EventKind) -> bool {
        self.hooks.get(&kind).map_or(false, |h| !h.is_empty())
    }

    /// Run every handler for the event in subscription order.
    ///
    /// For vetoable events the first `Handled` answer stops the chain.
    pub fn publish(&mut self, event: &GameEvent) -> HookDecision {
        let kind = event.kind();
        let Some(hooks) = self.hooks.get_mut(&kind) else {
            return HookDecision::NoHook;
        };
        if hooks.is_empty() {
            return HookDecision::NoHook;
        }

        for hook in hooks.iter_mut() {
            if hook(event) == HookResponse::Handled && kind.is_vetoable() {
                debug!(?kind, "hook suppressed default behavior");
                return HookDecision::Suppressed;
            }
        }
        HookDecision::Proceed
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<_, _> = self.hooks.iter().map(|(k, v)| (*k, v.len())).collect();
        f.debug_struct("EventBus").field("hooks", &counts).finish()
    }
}
