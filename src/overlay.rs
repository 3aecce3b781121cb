use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::warn;

use crate::error::Result;

/// Rendering surface behind [`OverlayGuard`].
///
/// Implemented over whatever widget actually blocks the screen: a GUI
/// modal, a terminal spinner, or a no-op logger in headless runs. Every
/// method is fallible; the guard treats failures during teardown as
/// best-effort and never lets them wedge its own state.
pub trait OverlaySurface: Send + Sync {
    /// Present the overlay with the given message.
    fn display(&self, message: &str) -> Result<()>;

    /// Refresh the message on an already-presented overlay.
    fn update_message(&self, message: &str) -> Result<()> {
        self.display(message)
    }

    /// Take the overlay down.
    fn conceal(&self) -> Result<()>;

    /// Remove leftover artifacts from an earlier session (stray
    /// backdrops, page-level blocking styles).
    fn clear_residue(&self) -> Result<()>;
}

struct OverlayState {
    visible: bool,
    safety_timer: Option<JoinHandle<()>>,
}

/// Guards a single busy overlay around long-running operations.
///
/// Prevents overlapping shows (a second `show` only refreshes the
/// message) and guarantees eventual release: every presentation arms a
/// safety timer that force-hides the overlay even if the normal
/// completion path never runs. Worst-case stuck-overlay duration is
/// bounded by the safety timeout.
///
/// Must be used from within a tokio runtime; the safety timer is a
/// spawned task.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use veogen_rs::{OverlayGuard, OverlaySurface};
///
/// # fn example(surface: Arc<dyn OverlaySurface>) -> veogen_rs::Result<()> {
/// let overlay = OverlayGuard::new(surface);
/// overlay.show("Uploading prompts...")?;
/// // ... perform the operation ...
/// overlay.hide();
/// # Ok(())
/// # }
/// ```
pub struct OverlayGuard {
    surface: Arc<dyn OverlaySurface>,
    state: Arc<Mutex<OverlayState>>,
    safety_timeout: Duration,
}

impl OverlayGuard {
    /// Create a guard with the default 5 second safety timeout.
    pub fn new(surface: Arc<dyn OverlaySurface>) -> Self {
        Self {
            surface,
            state: Arc::new(Mutex::new(OverlayState {
                visible: false,
                safety_timer: None,
            })),
            safety_timeout: Duration::from_millis(5000),
        }
    }

    /// Override the safety timeout.
    pub fn with_safety_timeout(mut self, timeout: Duration) -> Self {
        self.safety_timeout = timeout;
        self
    }

    /// Whether the overlay is currently considered visible.
    pub fn is_visible(&self) -> bool {
        lock_state(&self.state).visible
    }

    /// Present the overlay.
    ///
    /// If it is already visible, only the message is refreshed and the
    /// original safety timer keeps running, so repeated calls cannot
    /// accumulate timers. Otherwise any stray remnants from a previous
    /// inconsistent state are cleared first, the overlay is displayed,
    /// and the safety timer is armed.
    pub fn show(&self, message: &str) -> Result<()> {
        let mut st = lock_state(&self.state);

        if st.visible {
            if let Err(e) = self.surface.update_message(message) {
                warn!(error = %e, "failed to refresh overlay message");
            }
            return Ok(());
        }

        Self::reset(&self.surface, &mut st);

        self.surface.display(message)?;
        st.visible = true;
        st.safety_timer = Some(self.arm_safety_timer());
        Ok(())
    }

    /// Take the overlay down if it is visible; no-op otherwise.
    /// Cancels the pending safety timer.
    pub fn hide(&self) {
        let mut st = lock_state(&self.state);
        if !st.visible {
            return;
        }
        Self::reset(&self.surface, &mut st);
    }

    /// Idempotent hard reset regardless of prior state.
    ///
    /// Conceals the widget, clears residue, cancels any pending safety
    /// timer, and leaves `visible == false`. Surface failures are logged
    /// and swallowed; the state flag always converges.
    pub fn force_hide(&self) {
        let mut st = lock_state(&self.state);
        Self::reset(&self.surface, &mut st);
    }

    fn arm_safety_timer(&self) -> JoinHandle<()> {
        let surface = Arc::clone(&self.surface);
        let state = Arc::clone(&self.state);
        let timeout = self.safety_timeout;
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            warn!("overlay safety timeout elapsed, forcing hide");
            let mut st = lock_state(&state);
            Self::reset(&surface, &mut st);
        })
    }

    /// Shared teardown for `hide`, `force_hide`, and the safety timer.
    /// Flips `visible` before touching the surface so the flag converges
    /// even when cleanup fails.
    fn reset(surface: &Arc<dyn OverlaySurface>, st: &mut OverlayState) {
        if let Some(timer) = st.safety_timer.take() {
            timer.abort();
        }
        st.visible = false;

        if let Err(e) = surface.conceal() {
            warn!(error = %e, "overlay conceal failed");
        }
        if let Err(e) = surface.clear_residue() {
            warn!(error = %e, "overlay residue cleanup failed");
        }
    }
}

fn lock_state(state: &Mutex<OverlayState>) -> MutexGuard<'_, OverlayState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
