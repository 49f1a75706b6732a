use crate::{
    core::geo::{LatLng, Point, Size},
    prelude::HashMap,
    traits::ElementId,
};
use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::{Deserialize, Serialize};

/// Raw input delivered by the host. Positions are relative to the container's
/// top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    PointerDown {
        position: Point,
        button: MouseButton,
        target: Option<ElementId>,
    },
    PointerMove {
        position: Point,
    },
    PointerUp {
        position: Point,
        target: Option<ElementId>,
    },
    /// `touches` is the full list of active touches after the change
    TouchStart {
        touches: Vec<TouchPoint>,
        target: Option<ElementId>,
    },
    TouchMove {
        touches: Vec<TouchPoint>,
    },
    /// `touches` are the remaining touches, `changed` the ones that lifted
    TouchEnd {
        touches: Vec<TouchPoint>,
        changed: Vec<TouchPoint>,
    },
    Wheel {
        position: Point,
        delta_y: f64,
        modifiers: KeyModifiers,
    },
}

/// Individual touch point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub id: u64,
    pub position: Point,
}

impl TouchPoint {
    pub fn new(id: u64, x: f64, y: f64) -> Self {
        Self {
            id,
            position: Point::new(x, y),
        }
    }
}

/// Keyboard modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct KeyModifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Mouse button types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

/// Whether an event was consumed; hosts prevent the default action when it was
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventHandled {
    Handled,
    NotHandled,
}

impl EventHandled {
    pub fn is_handled(self) -> bool {
        self == EventHandled::Handled
    }
}

/// Transient advisories shown to the user instead of performing a gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WarningKind {
    /// Wheel zoom needs the meta/ctrl key
    MetaWheelZoom,
    /// Panning needs two fingers
    TwoFingerDrag,
}

/// Notifications emitted by the viewport
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// Something observable changed (size, delta, center or zoom)
    Update,
    /// A new center/zoom was committed, including every animation frame
    ViewChanged { center: LatLng, zoom: f64 },
    Resize { size: Size },
    Click { lat_lng: LatLng, pixel: Point },
    AnimationStart,
    AnimationStop,
    Warning { kind: WarningKind, message: String },
    WarningCleared,
}

impl MapEvent {
    /// Listener key of the event
    pub fn kind(&self) -> &'static str {
        match self {
            MapEvent::Update => "update",
            MapEvent::ViewChanged { .. } => "viewchanged",
            MapEvent::Resize { .. } => "resize",
            MapEvent::Click { .. } => "click",
            MapEvent::AnimationStart => "animationstart",
            MapEvent::AnimationStop => "animationstop",
            MapEvent::Warning { .. } => "warning",
            MapEvent::WarningCleared => "warningcleared",
        }
    }
}

/// Event listener callback type
pub type EventCallback = Box<dyn Fn(&MapEvent) + Send + Sync>;

/// Handle returned by [`EventManager::on`]
pub type ListenerId = u64;

/// Dispatches map events to callbacks (by kind) and channel subscribers
#[derive(Default)]
pub struct EventManager {
    listeners: HashMap<&'static str, Vec<(ListenerId, EventCallback)>>,
    subscribers: Vec<Sender<MapEvent>>,
    next_id: ListenerId,
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event listener for one event kind (see [`MapEvent::kind`])
    pub fn on<F>(&mut self, event_type: &'static str, callback: F) -> ListenerId
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.next_id += 1;
        self.listeners
            .entry(event_type)
            .or_default()
            .push((self.next_id, Box::new(callback)));
        self.next_id
    }

    /// Remove a listener; returns whether it was registered
    pub fn off(&mut self, id: ListenerId) -> bool {
        let mut removed = false;
        for callbacks in self.listeners.values_mut() {
            let before = callbacks.len();
            callbacks.retain(|(listener, _)| *listener != id);
            removed |= callbacks.len() != before;
        }
        removed
    }

    /// Receive every event through a channel
    pub fn subscribe(&mut self) -> Receiver<MapEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Deliver an event synchronously
    pub fn emit(&mut self, event: MapEvent) {
        if let Some(callbacks) = self.listeners.get(event.kind()) {
            for (_, callback) in callbacks {
                callback(&event);
            }
        }

        // Dropped receivers are pruned on the next send.
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Number of registered callbacks and live subscribers
    pub fn listener_count(&self) -> usize {
        self.listeners.values().map(Vec::len).sum::<usize>() + self.subscribers.len()
    }

    /// Drop all listeners and subscribers
    pub fn clear(&mut self) {
        self.listeners.clear();
        self.subscribers.clear();
    }
}
