use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn icon(self) -> &'static str {
        match self {
            Severity::Success => "✅",
            Severity::Error => "❌",
            Severity::Warning => "⚠",
            Severity::Info => "ℹ",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub severity: Severity,
    pub message: String,
    shown_at: Instant,
}

#[derive(Debug, Clone)]
pub struct Toasts {
    items: Vec<Toast>,
    visible: Duration,
    fade: Duration,
}

impl Default for Toasts {
    fn default() -> Self {
        Self::new(Duration::from_millis(3000), Duration::from_millis(300))
    }
}

impl Toasts {
    pub fn new(visible: Duration, fade: Duration) -> Self {
        Self {
            items: Vec::new(),
            visible,
            fade,
        }
    }

    pub fn push(&mut self, severity: Severity, message: impl Into<String>, now: Instant) {
        self.items.push(Toast {
            severity,
            message: message.into(),
            shown_at: now,
        });
    }

    pub fn prune(&mut self, now: Instant) {
        let lifetime = self.visible + self.fade;
        self.items
            .retain(|toast| now.saturating_duration_since(toast.shown_at) < lifetime);
    }

    /// 1.0 while visible, ramping to 0.0 across the fade.
    pub fn opacity(&self, toast: &Toast, now: Instant) -> f32 {
        let age = now.saturating_duration_since(toast.shown_at);
        if age < self.visible {
            return 1.0;
        }
        if self.fade.is_zero() {
            return 0.0;
        }
        let into_fade = (age - self.visible).as_secs_f32() / self.fade.as_secs_f32();
        (1.0 - into_fade).clamp(0.0, 1.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.items.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Time until the next toast starts fading or disappears, for scheduling repaints.
    pub fn next_change(&self, now: Instant) -> Option<Duration> {
        self.items
            .iter()
            .map(|toast| {
                let age = now.saturating_duration_since(toast.shown_at);
                if age < self.visible {
                    self.visible - age
                } else {
                    // Repaint every frame-ish while fading.
                    Duration::from_millis(16)
                }
            })
            .min()
    }
}
