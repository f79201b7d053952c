pub mod input;
pub mod lifecycle;
pub mod time;

use crate::{
    input::{Input, KeyCode},
    lifecycle::{Lifecycle, LifecycleState},
    time::FrameTimer,
};
use std::{error::Error as StdError, sync::Arc};
use thiserror::Error;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    error::{EventLoopError, OsError},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::WindowId,
};
pub use winit::{event::WindowEvent, window::Window};

/// Errors raised by app hooks while bringing the window up
pub type BoxError = Box<dyn StdError + Send + Sync>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("event loop failed: {0}")]
    EventLoop(#[from] EventLoopError),
    #[error("failed to create window: {0}")]
    WindowCreation(#[from] OsError),
    #[error("{0}")]
    Init(BoxError),
}

pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
    /// Key that requests the loop to stop
    pub close_key: KeyCode,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Hello world".to_string(),
            width: 800,
            height: 600,
            resizable: true,
            close_key: KeyCode::Escape,
        }
    }
}

/// Trait defining application behavior
///
/// `R` is the graphics context created once the window exists. Hooks are
/// called in lifecycle order: context, resources, then every frame until close
#[allow(async_fn_in_trait)]
pub trait AppHandler<R> {
    /// Called once the window exists; creates & returns the graphics context
    async fn with_resource(&mut self, window: Arc<Window>) -> Result<R, BoxError>;
    /// Called once the context is ready; uploads everything frames will draw
    fn load(&mut self, _resource: &mut R) -> Result<(), BoxError> {
        Ok(())
    }
    /// Called every frame while running
    fn frame(&mut self, _resource: &mut R, _input: &Input, _timer: &FrameTimer) {}
    /// Called on window resize, before the next frame
    fn resize(&mut self, _w: u32, _h: u32, _resource: &mut R) {}
    /// Called when the window is requested to close
    fn on_quit(&mut self) {}
}

/// Drives the window through [`LifecycleState`] & delegates hooks to an [`AppHandler`]
///
/// Use `AppRunner::new()` to construct it, then call `.run()` to start the loop
pub struct AppRunner<R, H: AppHandler<R>> {
    handler: H,
    resource: Option<R>,
    window: Option<Arc<Window>>,
    input: Input,
    timer: FrameTimer,
    config: AppConfig,
    lifecycle: Lifecycle,
    error: Option<AppError>,
}

/// Installs `env_logger` with an `info` default, keeping any logger already in place
fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info");
    if env_logger::try_init_from_env(env).is_err() {
        log::debug!("logger already installed; keeping it");
    }
}

#[doc(hidden)]
impl<R, H: AppHandler<R>> ApplicationHandler for AppRunner<R, H> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.lifecycle.state() != LifecycleState::Uninitialized {
            return;
        }

        if let Err(err) = self.start(event_loop) {
            log::error!("{err}");
            self.error = Some(err);
            self.lifecycle.request_close();
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.close(event_loop),
            WindowEvent::RedrawRequested => {
                if self.lifecycle.state() == LifecycleState::ResourcesLoaded {
                    self.lifecycle.advance(LifecycleState::Running);
                }
                if self.lifecycle.state() != LifecycleState::Running {
                    return;
                }
                if self
                    .lifecycle
                    .poll_input(&self.input, self.config.close_key)
                {
                    self.close(event_loop);
                    return;
                }

                if let Some(r) = self.resource.as_mut() {
                    self.handler.frame(r, &self.input, &self.timer);
                    self.timer.update();
                    self.input.end_frame();
                }
                if let Some(w) = self.window.as_ref() {
                    w.request_redraw();
                }
            }
            WindowEvent::Resized(size) => {
                if let Some(r) = self.resource.as_mut() {
                    self.handler.resize(size.width, size.height, r);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => self.input.keyboard(event),
            _ => {}
        }
    }
}

impl<R, H: AppHandler<R>> AppRunner<R, H> {
    /// Creates a new runner with the given handler & configuration
    pub fn new(handler: H, config: AppConfig) -> Self {
        Self {
            handler,
            resource: None,
            window: None,
            input: Input::default(),
            timer: FrameTimer::default(),
            config,
            lifecycle: Lifecycle::default(),
            error: None,
        }
    }

    /// Starts the app & runs the event loop until the window closes
    ///
    /// Returns the first error raised while bringing the window up
    pub fn run(mut self) -> Result<(), AppError> {
        init_logging();

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self)?;

        match self.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Window, context & resources; the window stays hidden until all three exist
    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_resizable(self.config.resizable)
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height))
            .with_visible(false);
        let window = Arc::new(event_loop.create_window(attrs)?);
        self.window = Some(window.clone());

        let mut resource = pollster::block_on(self.handler.with_resource(window.clone()))
            .map_err(AppError::Init)?;
        self.lifecycle.advance(LifecycleState::ContextReady);

        self.handler.load(&mut resource).map_err(AppError::Init)?;
        self.resource = Some(resource);
        self.lifecycle.advance(LifecycleState::ResourcesLoaded);

        log::info!("window ready");
        window.set_visible(true);
        window.request_redraw();
        Ok(())
    }

    fn close(&mut self, event_loop: &ActiveEventLoop) {
        self.lifecycle.request_close();
        self.handler.on_quit();
        event_loop.exit();
    }
}
