//! Best-effort results
//!
//! Loaders that can fall back to a usable value return [`Loaded`] so the
//! caller sees the fallback and its cause instead of a silent substitution.

#[derive(Debug, Clone, PartialEq)]
pub enum Loaded<T> {
    Clean(T),
    Degraded { value: T, reason: String },
}

impl<T> Loaded<T> {
    pub fn degraded(value: T, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        log::warn!("degraded: {}", reason);
        Loaded::Degraded { value, reason }
    }

    pub fn value(&self) -> &T {
        match self {
            Loaded::Clean(v) => v,
            Loaded::Degraded { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Loaded::Clean(v) => v,
            Loaded::Degraded { value, .. } => value,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Loaded::Degraded { .. })
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Loaded::Clean(_) => None,
            Loaded::Degraded { reason, .. } => Some(reason),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Loaded<U> {
        match self {
            Loaded::Clean(v) => Loaded::Clean(f(v)),
            Loaded::Degraded { value, reason } => Loaded::Degraded {
                value: f(value),
                reason,
            },
        }
    }
}
