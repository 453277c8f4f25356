use std::{fmt::Display, hash::Hash};

#[derive(Clone, Debug)]
enum CurrImpl {
    Static(&'static str),
    Dyn(String),
}

/// A currency or asset symbol (eg. "cad", "btc"). Symbols are always held
/// in lowercase, so "BTC" and "btc" are the same currency.
#[derive(Clone, Debug)]
pub struct Currency(CurrImpl);

impl Currency {
    pub fn new(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "cad" => Currency::cad(),
            "usd" => Currency::usd(),
            "btc" => Currency::btc(),
            other => Currency(CurrImpl::Dyn(other.to_string())),
        }
    }

    pub fn cad() -> Self {
        Currency(CurrImpl::Static("cad"))
    }

    pub fn usd() -> Self {
        Currency(CurrImpl::Static("usd"))
    }

    pub fn btc() -> Self {
        Currency(CurrImpl::Static("btc"))
    }

    /// The default base (reporting) currency.
    pub fn default_base() -> Self {
        Currency::cad()
    }

    pub fn as_str(&self) -> &str {
        match &self.0 {
            CurrImpl::Static(s) => s,
            CurrImpl::Dyn(s) => s.as_str(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }
}

impl PartialEq for Currency {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Currency {}

impl Hash for Currency {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.as_str().hash(state)
    }
}

impl PartialOrd for Currency {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Currency {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_str().cmp(other.as_str())
    }
}

// Auto-implements to_string()
impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
