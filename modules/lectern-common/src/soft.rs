/// Outcome of an operation whose failure contract is "degrade, never throw".
///
/// Both variants carry a usable value. `Degraded` marks that the value is a
/// fallback produced after the underlying call failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Soft<T> {
    Ok(T),
    Degraded { value: T, reason: String },
}

impl<T> Soft<T> {
    pub fn degraded(value: T, reason: impl Into<String>) -> Self {
        Soft::Degraded {
            value,
            reason: reason.into(),
        }
    }

    pub fn value(&self) -> &T {
        match self {
            Soft::Ok(value) | Soft::Degraded { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Soft::Ok(value) | Soft::Degraded { value, .. } => value,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Soft::Degraded { .. })
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Soft::Ok(_) => None,
            Soft::Degraded { reason, .. } => Some(reason),
        }
    }
}

impl Soft<String> {
    pub fn as_str(&self) -> &str {
        self.value()
    }
}
