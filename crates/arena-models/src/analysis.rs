use std::fmt;

use serde::{Deserialize, Serialize};

/// Which side of the debate an agent argues.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Long,
    Short,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Long, Side::Short];

    /// The role an analysis produced for this side must carry.
    pub fn role(self) -> PmRole {
        match self {
            Side::Long => PmRole::LongPm,
            Side::Short => PmRole::ShortPm,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Side::Long => "Long",
            Side::Short => "Short",
        }
    }

    pub fn opposite(self) -> Side {
        match self {
            Side::Long => Side::Short,
            Side::Short => Side::Long,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PmRole {
    #[serde(rename = "Long PM")]
    LongPm,
    #[serde(rename = "Short PM")]
    ShortPm,
}

impl PmRole {
    pub fn side(self) -> Side {
        match self {
            PmRole::LongPm => Side::Long,
            PmRole::ShortPm => Side::Short,
        }
    }
}

impl fmt::Display for PmRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PmRole::LongPm => f.write_str("Long PM"),
            PmRole::ShortPm => f.write_str("Short PM"),
        }
    }
}

/// How a position is meant to sit in the book.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BookRole {
    Core,
    Tactical,
    Hedge,
    #[serde(rename = "Pair Leg")]
    PairLeg,
}

impl fmt::Display for BookRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookRole::Core => f.write_str("Core"),
            BookRole::Tactical => f.write_str("Tactical"),
            BookRole::Hedge => f.write_str("Hedge"),
            BookRole::PairLeg => f.write_str("Pair Leg"),
        }
    }
}

/// A named factor that moves the thesis, with how sensitive the thesis is to it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConvictionLever {
    /// e.g. "Margins", "FDA Approval".
    pub lever_name: String,
    pub impact_description: String,
    /// 1 to 5.
    pub sensitivity_score: u8,
}

/// Proposed position size for one side of the debate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskSizing {
    /// Abstract conviction scale, nominally 1 to 10. Not a currency amount.
    pub risk_units: f64,
    pub role_in_book: BookRole,
    /// Drawdown at which the position gets cut.
    pub max_drawdown_tolerance: String,
}

/// Structured output of one debate participant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PmAnalysis {
    pub role: PmRole,
    /// Step-by-step reasoning trace from baseline view to final conviction.
    pub analytical_process: String,
    pub thesis_summary: String,
    pub key_drivers: Vec<String>,
    pub risk_sizing: RiskSizing,
    pub conviction_levers: Vec<ConvictionLever>,
    /// Milestones to watch over the next 6-18 months.
    pub event_path: Vec<String>,
    /// 1 to 100.
    pub confidence_score: u32,
}

impl PmAnalysis {
    pub fn side(&self) -> Side {
        self.role.side()
    }
}
