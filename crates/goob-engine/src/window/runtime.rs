use anyhow::{Context, Result};
use ouroboros::self_referencing;
use std::collections::HashMap;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::coords::{Letterbox, Vec2, Viewport};
use crate::core::{App as CoreApp, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::platform::winit::translate_window_event;
use crate::input::{InputFrame, InputState};
use crate::time::{FrameClock, FrameTime};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub resizable: bool,
    /// Fixed logical resolution. When set, drawing happens in this space and
    /// is scaled to fit the window with bars; otherwise logical space is the
    /// window's own logical size.
    pub logical_size: Option<Viewport>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "goob".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            resizable: true,
            logical_size: None,
        }
    }
}

impl RuntimeConfig {
    pub fn new(title: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            title: title.into(),
            initial_size: LogicalSize::new(width, height),
            ..Self::default()
        }
    }

    pub fn with_resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    pub fn with_logical_size(mut self, width: f32, height: f32) -> Self {
        self.logical_size = Some(Viewport::new(width, height));
        self
    }
}

/// Runtime context passed to the application.
///
/// Commands are buffered and applied after the current callback returns.
#[derive(Default)]
pub struct RuntimeCtx {
    commands: Vec<Command>,
}

impl RuntimeCtx {
    pub fn close_window(&mut self, id: WindowId) {
        self.commands.push(Command::CloseWindow(id));
    }

    pub fn exit(&mut self) {
        self.commands.push(Command::Exit);
    }
}

enum Command {
    CloseWindow(WindowId),
    Exit,
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window described by `initial` and drives `app` until the
    /// last window closes or the app asks to exit.
    ///
    /// Window or GPU setup failures end the loop and are returned.
    pub fn run<A>(initial: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(initial, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;
        log::info!("event loop finished");

        match state.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    input_state: InputState,
    input_frame: InputFrame,
    clock: FrameClock,
    logical_size: Option<Viewport>,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

impl WindowEntry {
    fn letterbox(&self) -> Letterbox {
        self.with(|fields| letterbox_for(fields.window, fields.gpu, *fields.logical_size))
    }
}

fn letterbox_for(window: &Window, gpu: &Gpu<'_>, logical_size: Option<Viewport>) -> Letterbox {
    let size = gpu.size();
    let physical = Vec2::new(size.width as f32, size.height as f32);
    match logical_size {
        Some(logical) => Letterbox::fit(logical, physical),
        None => Letterbox::window(physical, window.scale_factor() as f32),
    }
}

/// Discards input recorded while the window had no surface so it is not
/// replayed on restore, and restarts frame timing.
fn skip_hidden_frame(input_frame: &mut InputFrame, clock: &mut FrameClock) {
    input_frame.clear();
    clock.reset();
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    initial: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    windows: HashMap<WindowId, WindowEntry>,
    exit_requested: bool,
    fatal: Option<anyhow::Error>,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(initial: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            initial,
            gpu_init,
            app,
            windows: HashMap::new(),
            exit_requested: false,
            fatal: None,
        }
    }

    fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    fn fail(&mut self, err: anyhow::Error) {
        log::error!("{err:#}");
        self.fatal.get_or_insert(err);
        self.request_exit();
    }

    fn create_window_entry(&mut self, event_loop: &ActiveEventLoop, config: RuntimeConfig) -> Result<WindowId> {
        let attrs = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(config.initial_size)
            .with_resizable(config.resizable);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let id = window.id();
        let gpu_init = self.gpu_init.clone();

        let entry = WindowEntryTryBuilder {
            input_state: InputState::default(),
            input_frame: InputFrame::default(),
            clock: FrameClock::default(),
            logical_size: config.logical_size,
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed for window")?;

        let lb = entry.letterbox();
        log::info!(
            "window {id:?} created: \"{}\", logical {}x{}",
            config.title,
            lb.logical().width,
            lb.logical().height
        );

        self.windows.insert(id, entry);
        Ok(id)
    }

    fn destroy_window_entry(&mut self, id: WindowId) {
        if self.windows.remove(&id).is_some() {
            log::info!("window {id:?} closed");
        }
    }

    /// Feeds `event` to the window's input state, then to the app.
    fn dispatch_event(&mut self, window_id: WindowId, event: &WindowEvent) -> AppControl {
        // Split borrows to avoid `self` capture inside `ouroboros` closures.
        let (app, windows) = (&mut self.app, &mut self.windows);
        let Some(entry) = windows.get_mut(&window_id) else {
            return AppControl::Continue;
        };

        entry.with_mut(|fields| {
            let letterbox = letterbox_for(fields.window, fields.gpu, *fields.logical_size);
            if let Some(ev) = translate_window_event(&letterbox, fields.input_state, event) {
                fields.input_state.apply_event(fields.input_frame, ev);
            }
        });

        app.on_window_event(window_id, event)
    }

    /// Reconfigures the surface. `None` re-reads the window's inner size.
    fn resize_window(&mut self, window_id: WindowId, size: Option<PhysicalSize<u32>>) {
        let Some(entry) = self.windows.get_mut(&window_id) else { return };
        let size = size.unwrap_or_else(|| entry.with_window(|w| w.inner_size()));
        log::debug!("window {window_id:?} resized to {}x{}", size.width, size.height);
        entry.with_gpu_mut(|gpu| gpu.resize(size));
        entry.with_window(|w| w.request_redraw());
    }

    /// Runs one frame of the app for `window_id` and returns the commands it
    /// queued.
    fn redraw(&mut self, window_id: WindowId) -> RuntimeCtx {
        let mut runtime_ctx = RuntimeCtx::default();
        let (app, windows) = (&mut self.app, &mut self.windows);
        let Some(entry) = windows.get_mut(&window_id) else {
            return runtime_ctx;
        };

        let control = entry.with_mut(|fields| {
            // Minimised: nothing to present.
            let size = fields.gpu.size();
            if size.width == 0 || size.height == 0 {
                skip_hidden_frame(fields.input_frame, fields.clock);
                return AppControl::Continue;
            }

            let time: FrameTime = fields.clock.tick();
            let letterbox = letterbox_for(fields.window, fields.gpu, *fields.logical_size);
            let mut ctx = FrameCtx {
                window: WindowCtx { id: window_id, window: fields.window },
                gpu: fields.gpu,
                input: fields.input_state,
                input_frame: fields.input_frame,
                time,
                runtime: &mut runtime_ctx,
                letterbox,
            };
            let control = app.on_frame(&mut ctx);

            // Per-frame transitions are consumed.
            fields.input_frame.clear();
            control
        });

        if control == AppControl::Exit {
            runtime_ctx.exit();
        }
        runtime_ctx
    }

    fn apply_commands(&mut self, event_loop: &ActiveEventLoop, mut ctx: RuntimeCtx) {
        for cmd in ctx.commands.drain(..) {
            match cmd {
                Command::CloseWindow(id) => self.destroy_window_entry(id),
                Command::Exit => self.request_exit(),
            }
        }

        if self.windows.is_empty() {
            self.request_exit();
        }

        if self.exit_requested {
            event_loop.exit();
        }
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if !self.windows.is_empty() || self.exit_requested {
            return;
        }

        if let Err(e) = self.create_window_entry(event_loop, self.initial.clone()) {
            self.fail(e.context("failed to create initial window"));
            event_loop.exit();
            return;
        }

        for entry in self.windows.values() {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw; the programs animate every frame.
        for entry in self.windows.values() {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        if self.dispatch_event(window_id, &event) == AppControl::Exit {
            self.request_exit();
        }

        match event {
            WindowEvent::CloseRequested if !self.exit_requested => self.destroy_window_entry(window_id),
            WindowEvent::Resized(size) => self.resize_window(window_id, Some(size)),
            WindowEvent::ScaleFactorChanged { .. } => self.resize_window(window_id, None),
            WindowEvent::RedrawRequested if !self.exit_requested => {
                let runtime_ctx = self.redraw(window_id);
                self.apply_commands(event_loop, runtime_ctx);
            }
            _ => {}
        }

        if self.windows.is_empty() {
            self.request_exit();
        }
        if self.exit_requested {
            event_loop.exit();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{InputEvent, Modifiers, MouseButton, MouseButtonState, PointerButtonEvent};

    #[test]
    fn hidden_frame_drops_recorded_clicks() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(
            &mut frame,
            InputEvent::PointerButton(PointerButtonEvent {
                button: MouseButton::Left,
                state: MouseButtonState::Pressed,
                x: 5.0,
                y: 6.0,
                modifiers: Modifiers::default(),
            }),
        );
        assert_eq!(frame.clicks().count(), 1);

        let mut clock = FrameClock::default();
        skip_hidden_frame(&mut frame, &mut clock);
        assert_eq!(frame.clicks().count(), 0);
        assert!(frame.buttons_pressed.is_empty());

        // The first frame after restore starts from the reset baseline.
        assert!(clock.tick().dt < FrameClock::DEFAULT_DT_MAX.as_secs_f32());
    }
}
