//! Window, event loop and input plumbing.
//!
//! Everything an application needs from the platform arrives through
//! [`app::AppCtx`], which is passed into every [`app::App`] hook. There is no
//! global window or input state.

pub mod app;
pub mod event;
pub mod input;
pub mod time;
pub mod window;

pub use winit::window::WindowId;

pub use time::FrameTime;
