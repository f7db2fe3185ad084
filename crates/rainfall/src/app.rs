#![forbid(unsafe_code)]

//! The terminal front end: one [`RainLoop`] drawing onto a [`CellSurface`]
//! sized to the terminal, presented frame by frame.
//!
//! Everything runs on one thread. The event loop polls terminal input with
//! a timeout equal to the time left before the next tick, so input and ticks
//! never overlap.

use std::io::{self, Write};
use std::time::Duration;

use rainfall_core::clock::{Clock, MonotonicClock};
use rainfall_core::event::Event;
use rainfall_core::geometry::PixelSize;
use rainfall_core::terminal_session::{SessionOptions, TerminalSession};
use rainfall_render::buffer::Buffer;
use rainfall_render::diff::BufferDiff;
use rainfall_render::presenter::Presenter;
use rainfall_render::surface::CellSurface;
use rainfall_runtime::{ConfigError, RainConfig, RainLoop};
use tracing::{debug, info};

use crate::cli::Opts;

/// Poll timeout used when no tick is scheduled.
const IDLE_POLL: Duration = Duration::from_millis(250);

/// Whether the event loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep polling.
    Continue,
    /// Leave the loop and restore the terminal.
    Quit,
}

/// Render loop plus presentation state for one terminal.
pub struct App<W: Write> {
    rain: RainLoop<CellSurface>,
    presenter: Presenter<W>,
    prev: Buffer,
}

impl<W: Write> App<W> {
    /// Mount the render loop on a `cols x rows` terminal writing to `writer`.
    pub fn new(
        config: RainConfig,
        cols: u16,
        rows: u16,
        writer: W,
        now: Duration,
    ) -> Result<Self, ConfigError> {
        let cell_px = config.font_size;
        let backdrop = config.backdrop;
        let surface = CellSurface::for_terminal(cols, rows, cell_px);
        let viewport = PixelSize::from_cells(cols, rows, cell_px);
        let rain = RainLoop::mount(config, viewport, Some(surface), now)?;
        Ok(Self {
            rain,
            presenter: Presenter::new(writer, backdrop).with_sync_output(true),
            prev: Buffer::new(cols, rows),
        })
    }

    /// Paint the backdrop over the whole screen.
    pub fn start(&mut self) -> io::Result<()> {
        self.presenter.clear_screen()
    }

    /// React to one event at monotonic time `now`.
    pub fn handle_event(&mut self, event: Event, now: Duration) -> io::Result<Flow> {
        if event.is_quit() {
            info!("quit requested");
            return Ok(Flow::Quit);
        }

        match event {
            Event::Tick => {
                if self.rain.advance(now) {
                    self.present()?;
                }
            }
            Event::Resize { width, height } => {
                debug!(width, height, "terminal resized");
                let cell_px = self.rain.config().font_size;
                self.rain
                    .on_resize(PixelSize::from_cells(width, height, cell_px));
                self.prev = Buffer::new(width, height);
                self.presenter.reset();
                self.presenter.clear_screen()?;
            }
            Event::Key(_) | Event::Focus(_) => {}
        }
        Ok(Flow::Continue)
    }

    /// Time left before the next tick, or `None` once stopped.
    pub fn time_until_next_tick(&self, now: Duration) -> Option<Duration> {
        self.rain.time_until_next_tick(now)
    }

    /// The mounted render loop.
    pub fn rain(&self) -> &RainLoop<CellSurface> {
        &self.rain
    }

    /// Shut the render loop down and hand back the writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.rain.shutdown();
        self.presenter.into_inner()
    }

    fn present(&mut self) -> io::Result<()> {
        let Some(surface) = self.rain.surface() else {
            return Ok(());
        };
        let next = surface.buffer();
        let diff = BufferDiff::compute(&self.prev, next);
        self.presenter.present(next, &diff)?;
        self.prev.clone_from(next);
        Ok(())
    }
}

/// Frame output for the real terminal.
///
/// Stdout stays unlocked between writes: the signal guard's cleanup thread
/// needs it to restore the terminal.
fn terminal_writer() -> io::Stdout {
    io::stdout()
}

/// Run the backdrop full-screen until a quit key or the exit deadline.
pub fn run(opts: &Opts) -> io::Result<()> {
    let session = TerminalSession::new(SessionOptions {
        alternate_screen: true,
        hide_cursor: true,
        ..Default::default()
    })?;
    let (cols, rows) = session.size()?;
    let clock = MonotonicClock::new();

    let mut app = App::new(
        opts.rain_config(),
        cols,
        rows,
        terminal_writer(),
        clock.now_mono(),
    )
    .map_err(io::Error::other)?;
    app.start()?;

    let deadline = opts.exit_after().map(|d| clock.now_mono() + d);
    loop {
        let now = clock.now_mono();
        if deadline.is_some_and(|d| now >= d) {
            info!("exit-after deadline reached");
            break;
        }

        let mut timeout = app.time_until_next_tick(now).unwrap_or(IDLE_POLL);
        if let Some(d) = deadline {
            timeout = timeout.min(d.saturating_sub(now));
        }

        if session.poll_event(timeout)?
            && let Some(event) = session.read_event()?
            && app.handle_event(event, clock.now_mono())? == Flow::Quit
        {
            break;
        }

        if app.handle_event(Event::Tick, clock.now_mono())? == Flow::Quit {
            break;
        }
    }

    app.finish()?.flush()?;
    drop(session);
    Ok(())
}
