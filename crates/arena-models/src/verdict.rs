use serde::{Deserialize, Serialize};

use crate::analysis::Side;

/// The CIO's synthesis of the two pitches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CioVerdict {
    /// Free text; contains "Long" or "Short", or neither when undecided.
    pub winner: String,
    /// Positive favors the long, negative the short. Magnitude is conviction.
    pub net_risk_units: f64,
    pub executive_summary: String,
    pub deciding_factor: String,
    /// What would kill the winning thesis. Not every verdict carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_mortem: Option<String>,
}

impl CioVerdict {
    /// Reads the winning side out of the free-text winner. `None` means undecided.
    pub fn winning_side(&self) -> Option<Side> {
        if self.winner.contains("Long") {
            Some(Side::Long)
        } else if self.winner.contains("Short") {
            Some(Side::Short)
        } else {
            None
        }
    }
}
