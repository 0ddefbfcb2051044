//! Selection criteria for a collection call.

use std::fmt;
use std::str::FromStr;

/// Which providers a `collect` call should run.
///
/// Empty means "every enabled provider". A non-empty list is run exactly,
/// in the given order, regardless of enabled flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Selection {
    keys: Vec<String>,
}

impl Selection {
    /// Every enabled provider.
    pub fn all() -> Self {
        Self::default()
    }

    /// Exactly these providers, in this order.
    pub fn only<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    #[inline]
    pub fn is_all(&self) -> bool {
        self.keys.is_empty()
    }

    /// Requested keys as given (empty for "all").
    #[inline]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }
}

impl From<Vec<String>> for Selection {
    fn from(keys: Vec<String>) -> Self {
        Self { keys }
    }
}

impl From<&[&str]> for Selection {
    fn from(keys: &[&str]) -> Self {
        Self::only(keys.iter().copied())
    }
}

impl FromIterator<String> for Selection {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self::only(iter)
    }
}

/// Keys selected by [`DiagnosticsLevel::Basic`].
pub const BASIC_PROVIDERS: &[&str] = &["runtime", "environment"];

/// Predefined selections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticsLevel {
    /// Runtime and environment only.
    Basic,
    /// Every registered provider, including disabled ones.
    Full,
}

impl DiagnosticsLevel {
    /// Turn the level into an explicit selection against the registered keys.
    pub fn resolve(&self, available: &[String]) -> Selection {
        match self {
            DiagnosticsLevel::Basic => Selection::only(BASIC_PROVIDERS.iter().copied()),
            DiagnosticsLevel::Full => Selection::only(available.iter().cloned()),
        }
    }
}

impl fmt::Display for DiagnosticsLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic => write!(f, "basic"),
            Self::Full => write!(f, "full"),
        }
    }
}

impl FromStr for DiagnosticsLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "full" => Ok(Self::Full),
            other => Err(format!(
                "invalid diagnostics level '{}', expected: basic, full",
                other
            )),
        }
    }
}
