use std::sync::LazyLock;

use arena_models::{ResolvedTarget, TargetSource, TradeTarget, DEFAULT_TICKER};
use regex::Regex;

// "Report (crwv).pdf"
static PAREN_TICKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([A-Za-z]{2,5})\)").expect("valid regex"));
// "CRWV_Report.pdf", "CRWV.pdf"
static LEADING_TICKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z]{2,5})[\W_]").expect("valid regex"));

/// A ticker recovered from a source file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameGuess {
    pub ticker: String,
    pub source_name: String,
}

/// Guess a ticker from source file names.
///
/// Names are tried in order; within a name a parenthesized token wins over
/// a leading one. Returns the first hit.
pub fn guess_ticker_from_names<S: AsRef<str>>(names: &[S]) -> Option<FilenameGuess> {
    names.iter().find_map(|name| {
        let name = name.as_ref();
        PAREN_TICKER
            .captures(name)
            .or_else(|| LEADING_TICKER.captures(name))
            .map(|caps| FilenameGuess {
                ticker: caps[1].to_ascii_uppercase(),
                source_name: name.to_string(),
            })
    })
}

/// Choose the debate ticker.
///
/// Precedence: explicit override, then a selection that is not the market
/// default, then the file-name guess, then the market default.
pub fn resolve_target(
    selection: Option<&TradeTarget>,
    filename: Option<&FilenameGuess>,
    ticker_override: Option<&str>,
) -> ResolvedTarget {
    // Without a selection, assume a single-name report.
    let is_sector_report = selection.is_some_and(|s| s.is_sector_report);

    if let Some(ticker) = ticker_override.map(str::trim).filter(|t| !t.is_empty()) {
        return ResolvedTarget {
            ticker: ticker.to_ascii_uppercase(),
            source: TargetSource::Override,
            is_sector_report,
            reasoning: "Ticker supplied explicitly.".to_string(),
        };
    }

    if let Some(sel) = selection.filter(|s| !s.is_default()) {
        return ResolvedTarget {
            ticker: sel.primary_ticker.clone(),
            source: TargetSource::Selector,
            is_sector_report,
            reasoning: sel.reasoning.clone(),
        };
    }

    if let Some(guess) = filename {
        return ResolvedTarget {
            ticker: guess.ticker.clone(),
            source: TargetSource::Filename,
            is_sector_report,
            reasoning: format!(
                "Auto-detected from filename: '{}' indicates {} is the primary target.",
                guess.source_name, guess.ticker
            ),
        };
    }

    ResolvedTarget {
        ticker: DEFAULT_TICKER.to_string(),
        source: TargetSource::Default,
        is_sector_report,
        reasoning: format!(
            "Could not detect specific ticker. Defaulting to Market ({DEFAULT_TICKER})."
        ),
    }
}
