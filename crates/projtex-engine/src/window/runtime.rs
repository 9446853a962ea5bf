use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App as CoreApp, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::platform::translate_key_event;
use crate::time::SimClock;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    /// Target redraw rate of the render timer, in Hz.
    pub render_rate_hz: f64,
    /// Step of the simulation clock.
    pub sim_tick: Duration,
}

impl RuntimeConfig {
    /// Interval between render timer firings.
    pub fn render_interval(&self) -> Duration {
        let hz = if self.render_rate_hz.is_finite() {
            self.render_rate_hz.clamp(1.0, 1000.0)
        } else {
            60.0
        };
        Duration::from_secs_f64(1.0 / hz)
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "projtex".to_string(),
            initial_size: LogicalSize::new(800.0, 600.0),
            render_rate_hz: 60.0,
            sim_tick: Duration::from_millis(1),
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window and drives `app` until the window closes.
    ///
    /// Returns the first fatal error raised during initialization or by the app.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    occluded: bool,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

/// Fixed-rate deadline generator for the render timer.
#[derive(Debug, Clone)]
pub(crate) struct RenderTimer {
    interval: Duration,
    next: Instant,
}

impl RenderTimer {
    pub(crate) fn new(interval: Duration, start: Instant) -> Self {
        Self {
            interval,
            next: start + interval,
        }
    }

    pub(crate) fn deadline(&self) -> Instant {
        self.next
    }

    /// Returns true when the deadline has passed and schedules the next one.
    ///
    /// Missed firings are coalesced: after a stall the timer fires once and
    /// resumes one interval from `now`.
    pub(crate) fn poll(&mut self, now: Instant) -> bool {
        if now < self.next {
            return false;
        }
        self.next += self.interval;
        if self.next <= now {
            self.next = now + self.interval;
        }
        true
    }
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    window: Option<WindowEntry>,
    sim: SimClock,
    timer: RenderTimer,

    fatal: Option<anyhow::Error>,
    exit_requested: bool,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        let now = Instant::now();
        Self {
            sim: SimClock::starting_at(config.sim_tick, now),
            timer: RenderTimer::new(config.render_interval(), now),
            config,
            gpu_init,
            app,
            window: None,
            fatal: None,
            exit_requested: false,
        }
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_requested = true;
        event_loop.exit();
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        if self.fatal.is_none() {
            self.fatal = Some(err);
        }
        self.window = None;
        self.request_exit(event_loop);
    }

    fn create_window_entry(&self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();

        WindowEntryTryBuilder {
            occluded: false,
            window,
            gpu_builder: |w| {
                pollster::block_on(Gpu::new(w, gpu_init)).context("GPU initialization failed")
            },
        }
        .try_build()
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        let Some(entry) = self.window.as_mut() else {
            return;
        };
        entry.with_gpu_mut(|gpu| gpu.resize(size));
        self.app.on_resize(size);
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId) {
        let sim_time = self.sim.seconds();
        let (app, window) = (&mut self.app, &mut self.window);
        let Some(entry) = window.as_mut() else {
            return;
        };

        let result = entry.with_mut(|fields| {
            let size = fields.window.inner_size();
            if *fields.occluded || size.width == 0 || size.height == 0 {
                return Ok(AppControl::Continue);
            }

            let mut ctx = FrameCtx {
                window: WindowCtx {
                    id: window_id,
                    window: fields.window,
                },
                gpu: fields.gpu,
                sim_time,
            };

            app.on_frame(&mut ctx)
        });

        match result {
            Ok(AppControl::Continue) => {}
            Ok(AppControl::Exit) => self.request_exit(event_loop),
            Err(err) => self.fail(event_loop, err),
        }
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.exit_requested {
            return;
        }

        match self.create_window_entry(event_loop) {
            Ok(entry) => {
                entry.with_window(|w| w.request_redraw());
                self.window = Some(entry);
            }
            Err(err) => self.fail(event_loop, err.context("failed to create initial window")),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let now = Instant::now();
        self.sim.pump(now);

        if self.timer.poll(now) {
            if let Some(entry) = self.window.as_ref() {
                entry.with_window(|w| w.request_redraw());
            }
        }

        event_loop.set_control_flow(ControlFlow::WaitUntil(self.timer.deadline()));
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        self.sim.pump_now();

        match event {
            WindowEvent::CloseRequested => {
                self.window = None;
                self.request_exit(event_loop);
            }

            WindowEvent::Resized(new_size) => self.resize(new_size),

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(entry) = self.window.as_mut() {
                    let new_size = entry.with_window(|w| w.inner_size());
                    entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                }
            }

            WindowEvent::Occluded(occluded) => {
                if let Some(entry) = self.window.as_mut() {
                    entry.with_occluded_mut(|o| *o = occluded);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                let key = translate_key_event(&event);
                log::debug!("key {} {:?}", key.key, key.state);
                if self.app.on_key(&key) == AppControl::Exit {
                    self.request_exit(event_loop);
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop, window_id),

            _ => {}
        }
    }
}
