//! Toast notification queue.
//!
//! # Design
//! - At most `limit` toasts are visible; the rest wait in FIFO order and are
//!   promoted as visible ones are dismissed.
//! - A toast's auto-close countdown starts when it becomes visible, so the
//!   host only schedules timers for the visible set.
//! - The configuration is fixed for the lifetime of a queue.

use std::collections::{HashSet, VecDeque};
use std::fmt::{self, Display, Formatter};
use std::time::Duration;

/// Auto-close delay used by the application.
pub const APP_TOAST_AUTO_CLOSE: Duration = Duration::from_millis(3000);
/// Maximum simultaneously visible toasts used by the application.
pub const APP_TOAST_LIMIT: usize = 2;
/// Toast configuration registered by the application at startup.
pub const APP_TOAST_CONFIG: ToastConfig = ToastConfig {
    auto_close: AutoClose::After(APP_TOAST_AUTO_CLOSE),
    limit: APP_TOAST_LIMIT,
};

/// When a visible toast removes itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AutoClose {
    /// Dismiss after the given delay.
    After(Duration),
    /// Stay until dismissed by the user.
    Never,
}

impl AutoClose {
    /// Delay in whole milliseconds, saturated to `u32` for browser timers.
    #[must_use]
    pub fn millis(self) -> Option<u32> {
        match self {
            Self::After(delay) => Some(u32::try_from(delay.as_millis()).unwrap_or(u32::MAX)),
            Self::Never => None,
        }
    }
}

/// Toast plugin configuration: auto-close delay plus visible limit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToastConfig {
    auto_close: AutoClose,
    limit: usize,
}

/// Rejected toast configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastConfigError {
    /// `limit` was zero, which would hide every toast.
    ZeroLimit,
}

impl Display for ToastConfigError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroLimit => formatter.write_str("toast limit must be at least one"),
        }
    }
}

impl std::error::Error for ToastConfigError {}

impl ToastConfig {
    /// Build a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ToastConfigError::ZeroLimit`] when `limit` is zero.
    pub const fn new(auto_close: AutoClose, limit: usize) -> Result<Self, ToastConfigError> {
        if limit == 0 {
            return Err(ToastConfigError::ZeroLimit);
        }
        Ok(Self { auto_close, limit })
    }

    /// Default auto-close applied to toasts without an override.
    #[must_use]
    pub const fn auto_close(&self) -> AutoClose {
        self.auto_close
    }

    /// Maximum simultaneously visible toasts.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }
}

/// Severity of a toast.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    /// Informational.
    Info,
    /// Operation succeeded.
    Success,
    /// Something needs attention.
    Warning,
    /// Operation failed.
    Error,
}

impl ToastKind {
    /// CSS modifier class for the toast element.
    #[must_use]
    pub const fn class(self) -> &'static str {
        match self {
            Self::Info => "toast--info",
            Self::Success => "toast--success",
            Self::Warning => "toast--warning",
            Self::Error => "toast--error",
        }
    }

    /// Icon-font class shown next to the message.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Info => "fa fa-info-circle",
            Self::Success => "fa fa-check-circle",
            Self::Warning => "fa fa-exclamation-triangle",
            Self::Error => "fa fa-times-circle",
        }
    }
}

/// Monotonic toast identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToastId(pub u64);

/// Per-toast overrides.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ToastOptions {
    /// Replaces the configured auto-close for this toast only.
    pub auto_close: Option<AutoClose>,
}

/// A queued or visible toast.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    /// Identifier assigned on push.
    pub id: ToastId,
    /// Display message.
    pub message: String,
    /// Severity.
    pub kind: ToastKind,
    /// Effective auto-close for this toast.
    pub auto_close: AutoClose,
}

/// Bounded toast queue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToastQueue {
    config: ToastConfig,
    next_id: u64,
    visible: Vec<Toast>,
    pending: VecDeque<Toast>,
}

impl ToastQueue {
    /// Empty queue governed by `config`.
    #[must_use]
    pub const fn new(config: ToastConfig) -> Self {
        Self {
            config,
            next_id: 0,
            visible: Vec::new(),
            pending: VecDeque::new(),
        }
    }

    /// Configuration this queue was created with.
    #[must_use]
    pub const fn config(&self) -> ToastConfig {
        self.config
    }

    /// Add a toast; it is shown immediately when a slot is free, queued otherwise.
    pub fn push(
        &mut self,
        message: impl Into<String>,
        kind: ToastKind,
        options: ToastOptions,
    ) -> ToastId {
        self.next_id += 1;
        let id = ToastId(self.next_id);
        let toast = Toast {
            id,
            message: message.into(),
            kind,
            auto_close: options.auto_close.unwrap_or(self.config.auto_close),
        };
        if self.visible.len() < self.config.limit {
            self.visible.push(toast);
        } else {
            self.pending.push_back(toast);
        }
        id
    }

    /// Remove a visible or pending toast. Returns `false` for unknown ids.
    pub fn dismiss(&mut self, id: ToastId) -> bool {
        if let Some(index) = self.visible.iter().position(|toast| toast.id == id) {
            self.visible.remove(index);
            self.promote();
            return true;
        }
        if let Some(index) = self.pending.iter().position(|toast| toast.id == id) {
            self.pending.remove(index);
            return true;
        }
        false
    }

    /// Remove every toast.
    pub fn clear(&mut self) {
        self.visible.clear();
        self.pending.clear();
    }

    /// Visible toasts, oldest first.
    #[must_use]
    pub fn visible(&self) -> &[Toast] {
        &self.visible
    }

    /// Toasts waiting for a free slot, oldest first.
    pub fn pending(&self) -> impl Iterator<Item = &Toast> {
        self.pending.iter()
    }

    /// Number of waiting toasts.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    fn promote(&mut self) {
        while self.visible.len() < self.config.limit {
            match self.pending.pop_front() {
                Some(toast) => self.visible.push(toast),
                None => break,
            }
        }
    }
}

/// Timer changes needed to match the visible set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TimerPlan {
    /// Newly visible toasts and their delay in milliseconds.
    pub start: Vec<(ToastId, u32)>,
    /// Scheduled timers whose toast is no longer visible.
    pub cancel: Vec<ToastId>,
}

/// Diff the visible toasts against the ids that already have a running timer.
///
/// Timers for toasts that stay visible are left alone so their countdown is
/// not restarted when an unrelated toast appears or leaves.
#[must_use]
pub fn plan_timers(visible: &[Toast], scheduled: &HashSet<ToastId>) -> TimerPlan {
    let visible_ids: HashSet<ToastId> = visible.iter().map(|toast| toast.id).collect();
    let start = visible
        .iter()
        .filter(|toast| !scheduled.contains(&toast.id))
        .filter_map(|toast| toast.auto_close.millis().map(|ms| (toast.id, ms)))
        .collect();
    let mut cancel: Vec<ToastId> = scheduled
        .iter()
        .filter(|id| !visible_ids.contains(id))
        .copied()
        .collect();
    cancel.sort_unstable();
    TimerPlan { start, cancel }
}
