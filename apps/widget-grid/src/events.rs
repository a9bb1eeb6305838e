//! Change notifications emitted by the layout engine.
//!
//! The engine owns a `tokio::sync::broadcast` sender. Sending is synchronous and never blocks;
//! with no live receivers the event is simply discarded. Receivers that fall behind see
//! `RecvError::Lagged` and should re-read the engine snapshot.

use std::fmt;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::models::{Position, SizeClass, WidgetId};

/// Buffered events per receiver before the oldest are overwritten.
pub const EVENT_CAPACITY: usize = 64;

/// Which user intent ran out of room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoSpaceContext {
    Add,
    Resize,
    Move,
}

impl fmt::Display for NoSpaceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NoSpaceContext::Add => "add",
            NoSpaceContext::Resize => "resize",
            NoSpaceContext::Move => "move",
        })
    }
}

/// A recoverable "no legal position" outcome, rendered by the UI as a transient message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoSpace {
    pub context: NoSpaceContext,
    pub size: SizeClass,
    pub details: String,
}

impl NoSpace {
    pub fn new(context: NoSpaceContext, size: SizeClass) -> Self {
        let details = match context {
            NoSpaceContext::Add => format!("no space for a {size} widget on any page"),
            NoSpaceContext::Resize => format!("no space to resize widget to {size}"),
            NoSpaceContext::Move => format!("no space to drop a {size} widget"),
        };
        Self {
            context,
            size,
            details,
        }
    }
}

impl fmt::Display for NoSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.details, self.context)
    }
}

/// Emitted after every successful commit, and for every `NoSpace` rejection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LayoutEvent {
    Added {
        id: WidgetId,
        position: Position,
    },
    Removed {
        id: WidgetId,
    },
    Resized {
        id: WidgetId,
        size: SizeClass,
        position: Position,
    },
    Moved {
        id: WidgetId,
        position: Position,
    },
    /// The grid geometry changed and every widget was re-placed. `dropped` lists widgets that
    /// no longer fit anywhere.
    Relaid {
        columns: usize,
        rows: usize,
        dropped: Vec<WidgetId>,
    },
    NoSpace(NoSpace),
}

/// Fire-and-forget event fan-out.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<LayoutEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LayoutEvent> {
        self.sender.subscribe()
    }

    pub fn emit(&self, event: LayoutEvent) {
        // An error only means nobody is listening right now.
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::broadcast::error::TryRecvError;

    #[test]
    fn test_emit_without_subscribers_is_silent() {
        let bus = EventBus::new();
        bus.emit(LayoutEvent::Removed { id: WidgetId::new() });
    }

    #[test]
    fn test_subscriber_receives_events_in_order() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();
        let id = WidgetId::new();
        bus.emit(LayoutEvent::Added {
            id,
            position: Position::new(0, 0, 0),
        });
        bus.emit(LayoutEvent::Removed { id });

        assert!(matches!(rx.try_recv(), Ok(LayoutEvent::Added { .. })));
        assert_eq!(rx.try_recv(), Ok(LayoutEvent::Removed { id }));
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn test_no_space_details_name_the_size() {
        let signal = NoSpace::new(NoSpaceContext::Resize, SizeClass::ExtraLarge);
        assert!(signal.details.contains("extraLarge"));
        assert_eq!(signal.to_string(), format!("{} (resize)", signal.details));
    }

    #[test]
    fn test_event_json_is_tagged() {
        let event = LayoutEvent::NoSpace(NoSpace::new(NoSpaceContext::Add, SizeClass::Small));
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event"], "no_space");
        assert_eq!(value["context"], "add");
    }
}
