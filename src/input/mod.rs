pub mod events;
pub mod gestures;
pub mod throw;

// Re-export the essential types
pub use events::{
    EventCallback, EventHandled, EventManager, InputEvent, KeyModifiers, ListenerId, MapEvent,
    MouseButton, TouchPoint, WarningKind,
};
pub use gestures::{GestureDelta, GestureState, PinchStart, TouchAnchor};
pub use throw::{MoveSample, MoveTracker, ThrowTarget};
