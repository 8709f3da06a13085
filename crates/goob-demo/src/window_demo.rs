//! Opens a window, clears it every frame and echoes input to stdout.

use anyhow::Result;
use goob_engine::core::{App, AppControl, FrameCtx};
use goob_engine::paint::Color;
use goob_engine::window::Runtime;
use winit::event::WindowEvent;
use winit::window::WindowId;

use crate::cli::WindowArgs;

struct EchoApp;

impl App for EchoApp {
    fn on_window_event(&mut self, _window_id: WindowId, event: &WindowEvent) -> AppControl {
        if let WindowEvent::CloseRequested = event {
            println!("Quit event received, closing window");
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        for (key, code) in ctx.input_frame.key_downs() {
            println!("Key down: {code} ({key})");
        }
        for (button, pos) in ctx.input_frame.clicks() {
            println!("Mouse clicked at ({}, {}), button {}", pos.x.round(), pos.y.round(), button.number());
        }

        ctx.render(Color::BLACK, |_, _| {})
    }
}

pub fn run(window: &WindowArgs) -> Result<()> {
    Runtime::run(window.runtime_config("Goobernatorial"), window.gpu_init(), EchoApp)?;
    println!("Window closed");
    Ok(())
}
