use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// What the ledger does when an order asks for more units than are in stock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockPolicy {
    /// Decrement regardless; stock may go negative.
    #[default]
    Permissive,
    /// Abort the order when `stock < quantity`.
    Reject,
}

impl FromStr for StockPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "permissive" => Ok(StockPolicy::Permissive),
            "reject" => Ok(StockPolicy::Reject),
            other => Err(format!(
                "stock policy must be 'permissive' or 'reject', got '{other}'"
            )),
        }
    }
}

impl fmt::Display for StockPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockPolicy::Permissive => f.write_str("permissive"),
            StockPolicy::Reject => f.write_str("reject"),
        }
    }
}
