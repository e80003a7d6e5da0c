//! Phase and progress reporting seam.
//!
//! Purely observational: implementations must not influence the
//! computation. The builder binary plugs in [`LogProgress`]; tests use
//! [`NullProgress`].

pub trait Progress {
    /// Coarse milestone label.
    fn phase(&mut self, label: &str);

    /// Fractional completion of the current phase, in `[0, 1]`.
    fn fraction(&mut self, value: f32);
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl Progress for NullProgress {
    fn phase(&mut self, _label: &str) {}
    fn fraction(&mut self, _value: f32) {}
}

/// Reports through `tracing`, de-duplicated to whole-percent steps so
/// tight loops do not flood the log.
#[derive(Debug)]
pub struct LogProgress {
    last_percent: u32,
}

impl LogProgress {
    pub fn new() -> Self {
        LogProgress { last_percent: u32::MAX }
    }
}

impl Default for LogProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress for LogProgress {
    fn phase(&mut self, label: &str) {
        self.last_percent = u32::MAX;
        tracing::info!(phase = label, "phase");
    }

    fn fraction(&mut self, value: f32) {
        let percent = (value.clamp(0.0, 1.0) * 100.0) as u32;
        if percent != self.last_percent {
            self.last_percent = percent;
            tracing::debug!(percent, "progress");
        }
    }
}

/// Remaps fractions into a sub-range of an outer reporter, so a
/// per-waypoint pass can report fine progress inside its slice of the
/// whole run.
pub struct SubRange<'a, P: Progress + ?Sized> {
    inner: &'a mut P,
    base: f32,
    span: f32,
}

impl<'a, P: Progress + ?Sized> SubRange<'a, P> {
    pub fn new(inner: &'a mut P, base: f32, span: f32) -> Self {
        SubRange { inner, base, span }
    }
}

impl<P: Progress + ?Sized> Progress for SubRange<'_, P> {
    fn phase(&mut self, label: &str) {
        self.inner.phase(label);
    }

    fn fraction(&mut self, value: f32) {
        self.inner.fraction(self.base + value * self.span);
    }
}
