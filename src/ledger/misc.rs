use itertools::Itertools;

use super::{Currency, LedgerError, Trade};

/// Picks the asset to tabulate. With no explicit choice, the trades must
/// all be for a single (major) asset. None if there is nothing to pick from.
pub fn select_target_asset(
    trades: &[Trade],
    asset: Option<&Currency>,
) -> Result<Option<Currency>, LedgerError> {
    if let Some(asset) = asset {
        return Ok(Some(asset.clone()));
    }
    let majors: Vec<Currency> = trades.iter().map(|t| t.major.clone()).sorted().dedup().collect();
    match majors.len() {
        0 => Ok(None),
        1 => Ok(majors.into_iter().next()),
        _ => Err(LedgerError::MixedAssets(majors)),
    }
}

/// Keeps only the trades of `asset`. Trades of `asset` against another
/// crypto asset (where it is the minor) cannot be tabulated, and are an error.
pub fn filter_trades_for_asset(
    trades: Vec<Trade>,
    asset: &Currency,
) -> Result<Vec<Trade>, LedgerError> {
    let mut kept = Vec::with_capacity(trades.len());
    for trade in trades {
        if trade.major == *asset {
            kept.push(trade);
        } else if trade.minor == *asset {
            return Err(LedgerError::MalformedTrade {
                context: format!("{} {}/{} trade at {}",
                    trade.kind, trade.major, trade.minor, trade.timestamp),
                reason: format!("{} was traded as the minor asset, which is not supported", asset),
            });
        }
    }
    Ok(kept)
}
