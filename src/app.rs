use std::path::PathBuf;

use log::{debug, error, info};
use winit::{
    dpi::PhysicalSize,
    event::{ElementState, Event, KeyboardInput, WindowEvent},
    event_loop::EventLoop,
    window::{Window, WindowBuilder},
};

use crate::{
    config::Settings,
    display::Display,
    error::Error,
    input::{Command, Keymap},
    session::Session,
};

struct App {
    session: Session,
    // Declared before `window` so the surface is dropped first.
    display: Display,
    window: Window,
    keymap: Keymap,
    export_path: PathBuf,
}

impl App {
    fn dispatch(&mut self, command: Command) {
        if command == Command::Export {
            if let Err(err) = self.session.export(&self.export_path) {
                error!("{}", err);
            }
            return;
        }

        if self.session.apply(command) {
            self.session.render();
            self.window.request_redraw();
        }
    }

    fn redraw(&mut self) -> Result<(), Error> {
        self.window.set_title(&self.session.overlay());
        let presentation = self.display.present(self.session.frame())?;
        if presentation.should_retry() {
            debug!("frame not presented, retrying");
            self.window.request_redraw();
        }
        Ok(())
    }
}

/// Open the window and explore until it is closed. Only returns on a startup failure.
pub fn run(settings: Settings) -> Result<(), Error> {
    info!("Supported number of threads: {}", num_cpus::get());
    info!("rendering with {} bands", settings.bands);
    if settings.size.is_empty() {
        return Err(Error::EmptyFrame(settings.size.width, settings.size.height));
    }

    let event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title("Mandelbrot")
        .with_inner_size(PhysicalSize::new(
            settings.size.width,
            settings.size.height,
        ))
        .build(&event_loop)?;

    let display = Display::new(&window, settings.size)?;
    let mut session = Session::new(&settings)?;
    session.render();
    window.request_redraw();

    let mut app = App {
        session,
        display,
        window,
        keymap: Keymap::default(),
        export_path: settings.export_path,
    };

    event_loop.run(move |event, _, control_flow| {
        control_flow.set_wait();

        match event {
            Event::WindowEvent { window_id, event } if window_id == app.window.id() => match event {
                WindowEvent::CloseRequested => {
                    control_flow.set_exit();
                }
                WindowEvent::Resized(size) => {
                    app.display.resize(size.into());
                    app.window.request_redraw();
                }
                WindowEvent::MouseInput {
                    state: ElementState::Pressed,
                    ..
                } => app.dispatch(Command::Redraw),
                WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            state: ElementState::Pressed,
                            virtual_keycode: Some(key),
                            ..
                        },
                    ..
                } => match app.keymap.command(key) {
                    Some(command) => app.dispatch(command),
                    None => debug!("unbound key {:?}", key),
                },
                _ => {}
            },
            Event::RedrawRequested(window_id) if window_id == app.window.id() => {
                if let Err(err) = app.redraw() {
                    error!("{}", err);
                    control_flow.set_exit_with_code(1);
                }
            }
            Event::LoopDestroyed => info!("exiting"),
            _ => {}
        }
    })
}
