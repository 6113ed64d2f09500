use std::{
    cell::RefCell,
    sync::{Arc, Mutex},
    thread::ThreadId,
};

use tiny_skia::Pixmap;
use winit::{
    application::ApplicationHandler,
    event,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    platform::run_on_demand::EventLoopExtRunOnDemand,
    window::WindowId,
};

#[cfg(target_os = "windows")]
use winit::platform::windows::EventLoopBuilderExtWindows;

#[cfg(all(not(feature = "x11"), target_os = "linux"))]
use winit::platform::wayland::EventLoopBuilderExtWayland;

#[cfg(all(feature = "x11", target_os = "linux"))]
use winit::platform::x11::EventLoopBuilderExtX11;

#[cfg(feature = "font")]
use crate::font::FontManager;

use crate::{
    context::Context,
    math::Point2,
    software::PixelBuffer,
    window::{QuickDraw, Window},
};

mod runner_enums;
pub use runner_enums::*;

// winit refuses to build a second event loop in the same process, so the
// first one is kept and reused by every later call. This also ties the
// loop to the thread that created it.
lazy_static::lazy_static! {
    static ref CURRENT_LOOP_THREAD_ID: Mutex<Option<ThreadId>> = Mutex::new(None);
}

thread_local! {
    static CURRENT_LOOP: RefCell<Option<EventLoop<()>>> = const { RefCell::new(None) };
}

/// Opens the window described by `config` and blocks until it is closed.
pub(crate) fn run<F, R>(config: QuickDraw, draw: F) -> Result<(), QuickDrawError>
where
    F: FnMut(&Window, &mut Context<'_>) -> R,
    R: DrawOutcome,
{
    claim_thread()?;

    CURRENT_LOOP.with(|current_loop| {
        let mut current_loop = current_loop
            .try_borrow_mut()
            .map_err(|_| RunnerError::AlreadyRunning)?;

        if current_loop.is_none() {
            *current_loop = Some(create_event_loop()?);
        }

        let Some(event_loop) = current_loop.as_mut() else {
            return Err(RunnerError::WinitEventLoopPanic.into());
        };

        let mut app = QuickDrawApp::new(config, draw);
        event_loop
            .run_app_on_demand(&mut app)
            .map_err(|e| RunnerError::WinitEventLoopFailed(e.to_string()))?;

        app.finish()
    })
}

fn claim_thread() -> Result<(), RunnerError> {
    let thread_id = std::thread::current().id();
    let mut owner = CURRENT_LOOP_THREAD_ID
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    match *owner {
        None => {
            *owner = Some(thread_id);
            Ok(())
        }
        Some(id) if id == thread_id => Ok(()),
        Some(_) => Err(RunnerError::ThreadMismatch),
    }
}

fn release_thread() {
    let mut owner = CURRENT_LOOP_THREAD_ID
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    *owner = None;
}

fn create_event_loop() -> Result<EventLoop<()>, RunnerError> {
    let event_loop_result = std::panic::catch_unwind(|| {
        let mut event_loop_builder = EventLoop::builder();

        #[cfg(any(target_os = "windows", target_os = "linux"))]
        {
            event_loop_builder.with_any_thread(true);
        }

        #[cfg(all(feature = "x11", target_os = "linux"))]
        {
            event_loop_builder.with_x11();
        }

        event_loop_builder.build()
    });

    // Winit panics if an event loop was already created on another thread.
    let event_loop_result = match event_loop_result {
        Ok(result) => result,
        Err(_) => {
            release_thread();
            return Err(RunnerError::WinitEventLoopPanic);
        }
    };

    event_loop_result.map_err(|e| {
        release_thread();
        RunnerError::WinitEventLoopFailed(e.to_string())
    })
}

/// The window together with the surface it presents.
struct ActiveWindow {
    window: Window,
    pixel_buffer: PixelBuffer,
    pixmap: Option<Pixmap>,
}

impl ActiveWindow {
    fn resize(&mut self, size: Point2) {
        // Minimized windows report a zero size, keep the old surface.
        if size.is_empty() {
            crate::dbg_log!("Ignoring resize to {}x{}", size.x, size.y);
            return;
        }

        match self.pixel_buffer.resize(size) {
            Ok(()) => {
                crate::dbg_log!("Surface resized to {}x{}", size.x, size.y);
            }
            Err(e) => {
                crate::warn_log!("{}", e);
            }
        }
    }
}

/// Returns a pixmap of `size`, reallocating `pixmap` when the surface changed.
fn surface_pixmap(pixmap: &mut Option<Pixmap>, size: Point2) -> Option<&mut Pixmap> {
    if size.is_empty() {
        return None;
    }

    let stale = pixmap
        .as_ref()
        .is_none_or(|p| Point2::new(p.width(), p.height()) != size);

    if stale {
        *pixmap = Pixmap::new(size.x as u32, size.y as u32);
    }

    pixmap.as_mut()
}

struct QuickDrawApp<F> {
    config: QuickDraw,
    draw: F,
    active: Option<ActiveWindow>,
    opened: bool,
    error: Option<QuickDrawError>,

    #[cfg(feature = "font")]
    fonts: FontManager,
}

impl<F, R> QuickDrawApp<F>
where
    F: FnMut(&Window, &mut Context<'_>) -> R,
    R: DrawOutcome,
{
    fn new(config: QuickDraw, draw: F) -> Self {
        Self {
            config,
            draw,
            active: None,
            opened: false,
            error: None,

            #[cfg(feature = "font")]
            fonts: FontManager::new(),
        }
    }

    fn finish(self) -> Result<(), QuickDrawError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn open(&mut self, event_loop: &ActiveEventLoop) -> Result<(), QuickDrawError> {
        let handle = event_loop
            .create_window(self.config.window_attributes())
            .map_err(|e| RunnerError::FailedToCreateWindow(e.to_string()))?;
        let handle = Arc::new(handle);

        let pixel_buffer = PixelBuffer::new(handle.clone())?;
        let mut active = ActiveWindow {
            window: Window::new(handle),
            pixel_buffer,
            pixmap: None,
        };

        active.resize(active.window.size());
        active.window.request_redraw();

        crate::log!("Window '{}' opened", self.config.title());

        self.active = Some(active);

        Ok(())
    }

    fn redraw(&mut self) -> Result<(), QuickDrawError> {
        let Some(active) = self.active.as_mut() else {
            return Ok(());
        };

        let background = self.config.background();
        let Some(pixmap) = surface_pixmap(&mut active.pixmap, active.pixel_buffer.size()) else {
            return Ok(());
        };

        pixmap.fill(background.into());

        let outcome = {
            #[cfg(feature = "font")]
            let mut ctx = Context::new(pixmap.as_mut(), &mut self.fonts);
            #[cfg(not(feature = "font"))]
            let mut ctx = Context::new(pixmap.as_mut());

            let outcome = (self.draw)(&active.window, &mut ctx).into_result();

            if let Err(e) = ctx.status() {
                crate::warn_log!("Drawing context error: {}", e);
            }

            outcome
        };

        if let Some(pixmap) = active.pixmap.as_ref() {
            active.pixel_buffer.present(pixmap)?;
        }

        outcome.map_err(QuickDrawError::Draw)
    }

    fn close(&mut self, event_loop: &ActiveEventLoop) {
        if self.active.take().is_some() {
            crate::log!("Window '{}' closed", self.config.title());
        }

        event_loop.exit();
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: QuickDrawError) {
        crate::error_log!("{}", error);

        if self.error.is_none() {
            self.error = Some(error);
        }

        self.close(event_loop);
    }
}

impl<F, R> ApplicationHandler for QuickDrawApp<F>
where
    F: FnMut(&Window, &mut Context<'_>) -> R,
    R: DrawOutcome,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.opened {
            return;
        }

        self.opened = true;
        event_loop.set_control_flow(ControlFlow::Wait);

        if let Err(e) = self.open(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: event::WindowEvent,
    ) {
        let Some(active) = self.active.as_mut() else {
            return;
        };

        if active.window.id() != window_id {
            return;
        }

        match event {
            event::WindowEvent::CloseRequested => {
                self.close(event_loop);
            }
            event::WindowEvent::Resized(size) => {
                active.resize(Point2::from(size));
                active.window.request_redraw();
            }
            event::WindowEvent::RedrawRequested => {
                if let Err(e) = self.redraw() {
                    self.fail(event_loop, e);
                    return;
                }

                let close_requested = self
                    .active
                    .as_ref()
                    .is_some_and(|active| active.window.is_close_requested());

                if close_requested {
                    self.close(event_loop);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixmap_follows_surface_size() {
        let mut pixmap = None;

        let first = surface_pixmap(&mut pixmap, Point2::new(4, 3)).unwrap();
        assert_eq!((first.width(), first.height()), (4, 3));
        first.fill(tiny_skia::Color::BLACK);

        // Same size keeps the existing pixels.
        let same = surface_pixmap(&mut pixmap, Point2::new(4, 3)).unwrap();
        assert_eq!(same.pixel(0, 0).unwrap().alpha(), 255);

        let resized = surface_pixmap(&mut pixmap, Point2::new(8, 2)).unwrap();
        assert_eq!((resized.width(), resized.height()), (8, 2));
        assert_eq!(resized.pixel(0, 0).unwrap().alpha(), 0);
    }

    #[test]
    fn empty_surface_has_no_pixmap() {
        let mut pixmap = None;
        assert!(surface_pixmap(&mut pixmap, Point2::ZERO).is_none());
        assert!(pixmap.is_none());
    }

    // One test owns the guard, parallel tests would race on it.
    #[test]
    fn loop_thread_is_exclusive() {
        assert!(claim_thread().is_ok());
        assert!(claim_thread().is_ok());

        let other = std::thread::spawn(claim_thread).join().unwrap();
        assert!(matches!(other, Err(RunnerError::ThreadMismatch)));

        release_thread();

        let other = std::thread::spawn(|| {
            let claimed = claim_thread();
            release_thread();
            claimed
        })
        .join()
        .unwrap();
        assert!(other.is_ok());
    }
}
