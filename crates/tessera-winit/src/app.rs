use tessera_core::alloc::HashMap;
pub use winit::error::{EventLoopError, OsError};
use winit::event_loop::ActiveEventLoop;
use winit::window::WindowId;

use crate::{
    event::{Event, EventBatch, EventQueue, HandleStatus},
    input::KeyboardState,
    time::{FrameTime, TimeTracker},
    window::{Window, WindowDescriptor},
};

struct WindowResources {
    events: EventQueue,
}

/// Handle into the running event loop, passed to every [`App`] hook.
pub struct AppCtx<'a> {
    event_loop: &'a ActiveEventLoop,
    windows: &'a mut HashMap<WindowId, WindowResources>,
    input: &'a KeyboardState,
}

impl AppCtx<'_> {
    pub fn create_window(&mut self, descriptor: WindowDescriptor) -> Result<Window, OsError> {
        let window = Window::new(self.event_loop, descriptor)?;
        self.windows.insert(
            window.id(),
            WindowResources {
                events: EventQueue::new(),
            },
        );
        Ok(window)
    }

    /// Keyboard state accumulated over all windows.
    pub fn input(&self) -> &KeyboardState {
        self.input
    }

    pub fn exit(&self) {
        self.event_loop.exit();
    }
}

pub trait App {
    /// Called once, after the event loop is running and before the first update.
    #[allow(unused_variables)]
    fn on_start(&mut self, ctx: &mut AppCtx) {}

    /// Called once per frame, before any window renders.
    ///
    /// Movement should scale with `time.delta_seconds()`.
    #[allow(unused_variables)]
    fn update(&mut self, ctx: &mut AppCtx, time: &FrameTime) {}

    /// Called once per window that needs rendering, with that window's events.
    fn render(&mut self, ctx: &mut AppCtx, window_id: WindowId, events: &mut EventBatch);

    #[allow(unused_variables)]
    fn on_exit(&mut self, ctx: &mut AppCtx) {}
}

pub type AppFactory = fn(ctx: &mut AppCtx) -> Box<dyn App>;

struct AppProxy {
    factory: AppFactory,
    app: Option<Box<dyn App>>,
    windows: HashMap<WindowId, WindowResources>,
    input: KeyboardState,
    time_tracker: TimeTracker,
    updated_this_frame: bool,
}

impl winit::application::ApplicationHandler for AppProxy {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.app.is_some() {
            return;
        }
        let mut ctx = AppCtx {
            event_loop,
            windows: &mut self.windows,
            input: &self.input,
        };
        let mut app = (self.factory)(&mut ctx);
        app.on_start(&mut ctx);
        self.app = Some(app);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        self.input.end_frame();
        self.updated_this_frame = false;
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: winit::event::WindowEvent,
    ) {
        use winit::event::WindowEvent;

        let Some(app) = self.app.as_mut() else {
            return;
        };

        if !matches!(event, WindowEvent::RedrawRequested) {
            let Some(window) = self.windows.get_mut(&window_id) else {
                return;
            };
            if let Some(event) = Event::from_winit(event) {
                self.input.handle_event(&event);
                window.events.push(event);
            }
            return;
        }

        let mut ctx = AppCtx {
            event_loop,
            windows: &mut self.windows,
            input: &self.input,
        };

        if !self.updated_this_frame {
            let frame_time = self.time_tracker.tick();
            app.update(&mut ctx, &frame_time);
            self.updated_this_frame = true;
        }

        let Some(window) = ctx.windows.get_mut(&window_id) else {
            return;
        };
        let mut events = window.events.drain();
        app.render(&mut ctx, window_id, &mut events);

        let mut close = false;
        events.dispatch(|event| match event {
            Event::CloseRequested => {
                close = true;
                HandleStatus::consumed()
            }
            _ => HandleStatus::ignored(),
        });
        if close {
            tracing::info!("close requested for window {:?}", window_id);
            app.on_exit(&mut ctx);
            ctx.event_loop.exit();
        }
    }
}

/// Run the application until its last window closes or it calls [`AppCtx::exit`].
pub fn run_app(factory: AppFactory) -> Result<(), EventLoopError> {
    use winit::event_loop::{ControlFlow, EventLoop};

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);
    let mut proxy = AppProxy {
        factory,
        app: None,
        windows: HashMap::default(),
        input: KeyboardState::new(),
        time_tracker: TimeTracker::new(),
        updated_this_frame: false,
    };
    event_loop.run_app(&mut proxy)
}
