//! Settlement events
//!
//! One event is appended per completed wager and never mutated afterwards.
//! Off-chain observers consume them to audit fairness.

use crate::common::traits::EventSink;
use crate::common::types::{AccountId, Amount};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Result of a single-asset coin flip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlipEvent {
    pub player: AccountId,
    pub is_won: bool,
    pub amount_bet: Amount,
}

/// Result of a coin flip on an explicit asset (multi-asset and delegate)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlipEventTyped {
    pub player: AccountId,
    pub is_won: bool,
    pub asset_name: String,
    pub amount_bet: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouletteEvent {
    pub player: AccountId,
    pub is_won: bool,
    pub asset_name: String,
    pub amount_bet: Amount,
    pub chosen_numbers: Vec<u64>,
    pub drawn_number: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    Flip(FlipEvent),
    FlipTyped(FlipEventTyped),
    Roulette(RouletteEvent),
}

impl GameEvent {
    pub fn player(&self) -> &AccountId {
        match self {
            GameEvent::Flip(e) => &e.player,
            GameEvent::FlipTyped(e) => &e.player,
            GameEvent::Roulette(e) => &e.player,
        }
    }

    pub fn is_won(&self) -> bool {
        match self {
            GameEvent::Flip(e) => e.is_won,
            GameEvent::FlipTyped(e) => e.is_won,
            GameEvent::Roulette(e) => e.is_won,
        }
    }

    pub fn amount_bet(&self) -> Amount {
        match self {
            GameEvent::Flip(e) => e.amount_bet,
            GameEvent::FlipTyped(e) => e.amount_bet,
            GameEvent::Roulette(e) => e.amount_bet,
        }
    }
}

/// Immutable settlement record as appended to an [`EventSink`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementEvent {
    pub id: Uuid,
    pub settled_at: DateTime<Utc>,
    #[serde(flatten)]
    pub game: GameEvent,
    /// Key of the randomness proof behind the outcome, when the source keeps one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof_ref: Option<String>,
}

impl SettlementEvent {
    pub fn new(game: GameEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            settled_at: Utc::now(),
            game,
            proof_ref: None,
        }
    }

    pub fn with_proof_ref(mut self, proof_ref: Option<String>) -> Self {
        self.proof_ref = proof_ref;
        self
    }
}

/// Keeps every event in memory, in emission order
#[derive(Default)]
pub struct MemoryEventSink {
    events: RwLock<Vec<SettlementEvent>>,
}

impl MemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SettlementEvent> {
        self.events.read().clone()
    }

    pub fn last(&self) -> Option<SettlementEvent> {
        self.events.read().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }
}

impl EventSink for MemoryEventSink {
    fn emit(&self, event: SettlementEvent) {
        self.events.write().push(event);
    }
}

/// Publishes events to live subscribers. Events emitted while nobody is
/// subscribed are dropped.
pub struct BroadcastEventSink {
    sender: broadcast::Sender<SettlementEvent>,
}

impl BroadcastEventSink {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SettlementEvent> {
        self.sender.subscribe()
    }
}

impl EventSink for BroadcastEventSink {
    fn emit(&self, event: SettlementEvent) {
        let _ = self.sender.send(event);
    }
}

/// Writes each event to the `settlement_events` tracing target as JSON
#[derive(Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: SettlementEvent) {
        match serde_json::to_string(&event) {
            Ok(json) => tracing::info!(target: "settlement_events", event = %json),
            Err(e) => tracing::error!(target: "settlement_events", "Failed to encode event {}: {}", event.id, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flip(is_won: bool) -> SettlementEvent {
        SettlementEvent::new(GameEvent::Flip(FlipEvent {
            player: AccountId::new("player"),
            is_won,
            amount_bet: 100,
        }))
    }

    #[test]
    fn test_memory_sink_preserves_order() {
        let sink = MemoryEventSink::new();
        sink.emit(flip(true));
        sink.emit(flip(false));

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert!(events[0].game.is_won());
        assert!(!events[1].game.is_won());
    }

    #[test]
    fn test_event_json_shape() {
        let event = SettlementEvent::new(GameEvent::Roulette(RouletteEvent {
            player: AccountId::new("p"),
            is_won: false,
            asset_name: "NATIVE".to_string(),
            amount_bet: 5,
            chosen_numbers: vec![7, 17],
            drawn_number: 0,
        }));

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "roulette");
        assert_eq!(json["drawn_number"], 0);
        assert_eq!(json["chosen_numbers"][1], 17);

        let decoded: SettlementEvent = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, event);
    }

    #[tokio::test]
    async fn test_broadcast_sink_delivers_to_subscribers() {
        let sink = BroadcastEventSink::new(16);
        let mut receiver = sink.subscribe();

        let event = flip(true);
        sink.emit(event.clone());

        assert_eq!(receiver.recv().await.unwrap(), event);
    }
}
