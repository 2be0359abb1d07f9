//! Per-window event queue.
//!
//! winit events are converted into [`Event`]s and buffered per window until
//! the window's next render, where the application sees them as an
//! [`EventBatch`].

pub use winit::dpi::{PhysicalPosition, PhysicalSize};
pub use winit::event::{ElementState, MouseButton};
pub use winit::keyboard::{KeyCode, PhysicalKey};

use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Resized(PhysicalSize<u32>),
    ScaleFactorChanged(f64),
    Focused(bool),
    CloseRequested,
    MouseButtonDown(MouseButton),
    MouseButtonUp(MouseButton),
    MouseMoved(PhysicalPosition<f64>),
    KeyInput(KeyEvent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: PhysicalKey,
    pub state: ElementState,
    pub repeat: bool,
}

impl KeyEvent {
    /// The key code, if the platform reported a known key.
    pub fn code(&self) -> Option<KeyCode> {
        match self.key {
            PhysicalKey::Code(code) => Some(code),
            PhysicalKey::Unidentified(_) => None,
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.state == ElementState::Pressed
    }
}

impl Event {
    pub(crate) fn from_winit(event: winit::event::WindowEvent) -> Option<Self> {
        use winit::event::WindowEvent;

        match event {
            WindowEvent::Resized(size) => Some(Event::Resized(size)),
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                Some(Event::ScaleFactorChanged(scale_factor))
            }
            WindowEvent::Focused(focus) => Some(Event::Focused(focus)),
            WindowEvent::CloseRequested => Some(Event::CloseRequested),
            WindowEvent::MouseInput { state, button, .. } => match state {
                ElementState::Pressed => Some(Event::MouseButtonDown(button)),
                ElementState::Released => Some(Event::MouseButtonUp(button)),
            },
            WindowEvent::CursorMoved { position, .. } => Some(Event::MouseMoved(position)),
            WindowEvent::KeyboardInput { event, .. } => Some(Event::KeyInput(KeyEvent {
                key: event.physical_key,
                state: event.state,
                repeat: event.repeat,
            })),
            WindowEvent::RedrawRequested => None,
            other => {
                tracing::trace!("ignored window event: {:?}", other);
                None
            }
        }
    }
}

bitflags::bitflags! {
    /// Result of handing an event to a handler.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct HandleStatus: u8 {
        const HANDLED = 0b00000001;
        const CONSUMED = 0b00000010;
    }
}

impl HandleStatus {
    pub const fn is_consumed(&self) -> bool {
        self.contains(Self::CONSUMED)
    }

    pub const fn consumed() -> Self {
        Self::from_bits_truncate(Self::HANDLED.bits() | Self::CONSUMED.bits())
    }

    pub const fn handled() -> Self {
        Self::HANDLED
    }

    pub const fn ignored() -> Self {
        Self::empty()
    }
}

/// Buffered events for one window.
///
/// Close and resize requests are delivered before anything else, and only the
/// latest cursor position is kept.
pub struct EventQueue {
    priority: VecDeque<Event>,
    pending: VecDeque<Event>,
    latest_mouse_pos: Option<PhysicalPosition<f64>>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            priority: VecDeque::with_capacity(8),
            pending: VecDeque::with_capacity(64),
            latest_mouse_pos: None,
        }
    }

    pub fn push(&mut self, event: Event) {
        match event {
            Event::CloseRequested | Event::Resized(_) | Event::Focused(_) => {
                self.priority.push_back(event);
            }
            Event::MouseMoved(pos) => {
                self.latest_mouse_pos = Some(pos);
            }
            _ => self.pending.push_back(event),
        }
    }

    pub fn drain(&mut self) -> EventBatch {
        let mut events = Vec::with_capacity(self.priority.len() + self.pending.len() + 1);
        events.extend(self.priority.drain(..));
        if let Some(pos) = self.latest_mouse_pos.take() {
            events.push(Event::MouseMoved(pos));
        }
        events.extend(self.pending.drain(..));
        EventBatch { events }
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Events handed to the application for one render.
pub struct EventBatch {
    events: Vec<Event>,
}

impl EventBatch {
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Run `handler` over every event, dropping the ones it consumes.
    pub fn dispatch<H>(&mut self, mut handler: H)
    where
        H: FnMut(&Event) -> HandleStatus,
    {
        self.events.retain(|event| !handler(event).is_consumed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, state: ElementState) -> Event {
        Event::KeyInput(KeyEvent {
            key: PhysicalKey::Code(code),
            state,
            repeat: false,
        })
    }

    #[test]
    fn test_priority_events_first() {
        let mut queue = EventQueue::new();
        queue.push(key(KeyCode::Space, ElementState::Pressed));
        queue.push(Event::MouseMoved(PhysicalPosition::new(1.0, 1.0)));
        queue.push(Event::MouseMoved(PhysicalPosition::new(5.0, 7.0)));
        queue.push(Event::CloseRequested);

        let batch = queue.drain();
        let events: Vec<_> = batch.iter().cloned().collect();
        assert_eq!(
            events,
            vec![
                Event::CloseRequested,
                Event::MouseMoved(PhysicalPosition::new(5.0, 7.0)),
                key(KeyCode::Space, ElementState::Pressed),
            ]
        );
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn test_dispatch_drops_consumed() {
        let mut queue = EventQueue::new();
        queue.push(Event::CloseRequested);
        queue.push(key(KeyCode::KeyA, ElementState::Released));

        let mut batch = queue.drain();
        batch.dispatch(|event| match event {
            Event::CloseRequested => HandleStatus::consumed(),
            _ => HandleStatus::handled(),
        });
        assert_eq!(batch.len(), 1);
    }

    #[test]
    fn test_key_event_code() {
        let Event::KeyInput(event) = key(KeyCode::ArrowLeft, ElementState::Pressed) else {
            unreachable!();
        };
        assert_eq!(event.code(), Some(KeyCode::ArrowLeft));
        assert!(event.is_pressed());
    }
}
