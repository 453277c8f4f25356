use rust_decimal::Decimal;

use crate::{
    ledger::{BaseTrade, LedgerError, LedgerEvent, Tabulation, TradeKind},
    util::decimal::{GreaterEqualZeroDecimal, PosDecimal},
};

fn event_for(trade: &BaseTrade, post: &Tabulation, capital_gain: Option<Decimal>) -> LedgerEvent {
    LedgerEvent {
        action: trade.kind(),
        major: trade.trade.major.clone(),
        minor: trade.trade.minor.clone(),
        amount: trade.amount(),
        rate: trade.unit_rate,
        timestamp: *trade.timestamp(),
        acb: post.acb,
        units_held: post.units_held,
        capital_gain,
        capital_gains: post.capital_gains,
        exchange_rate: trade.exchange_rate,
    }
}

fn too_large(trade: &BaseTrade, what: &str) -> LedgerError {
    LedgerError::MalformedTrade {
        context: trade.trade.describe(),
        reason: format!("{} is too large to calculate", what),
    }
}

fn process_buy(state: &Tabulation, trade: &BaseTrade) -> Result<Tabulation, LedgerError> {
    // The exchange keeps its commission in units of the asset bought.
    let commission_units = GreaterEqualZeroDecimal::from(trade.amount())
        .checked_sub(trade.net_total)
        .ok_or_else(|| LedgerError::MalformedTrade {
            context: trade.trade.describe(),
            reason: format!(
                "total ({}) is more than the amount bought ({})",
                trade.net_total, trade.amount()
            ),
        })?;
    let unit_rate = GreaterEqualZeroDecimal::from(trade.unit_rate);
    let commission_cost = commission_units.checked_mul(unit_rate)
        .ok_or_else(|| too_large(trade, "commission cost"))?;
    let new_units_cost = trade.net_total.checked_mul(unit_rate)
        .ok_or_else(|| too_large(trade, "cost"))?;
    let cost = new_units_cost.checked_add(commission_cost)
        .ok_or_else(|| too_large(trade, "cost"))?;

    tracing::debug!(
        "process_buy: commission_units = {}, commission_cost = {}, new_units_cost = {}",
        commission_units,
        commission_cost,
        new_units_cost
    );

    Ok(Tabulation {
        acb: state.acb.checked_add(cost).ok_or_else(|| too_large(trade, "ACB"))?,
        units_held: state.units_held.checked_add(trade.net_total)
            .ok_or_else(|| too_large(trade, "units held"))?,
        outlays: state.outlays.checked_add(cost)
            .ok_or_else(|| too_large(trade, "total outlays"))?,
        ..state.clone()
    })
}

fn process_sell(
    state: &Tabulation,
    trade: &BaseTrade,
) -> Result<(Tabulation, Decimal), LedgerError> {
    let sold = trade.amount();
    let (remaining, held) = match (
        state.units_held.checked_sub(sold.into()),
        PosDecimal::try_from(*state.units_held),
    ) {
        (Some(remaining), Ok(held)) => (remaining, held),
        _ => {
            return Err(LedgerError::InsufficientUnits {
                timestamp: *trade.timestamp(),
                asset: trade.trade.major.clone(),
                sold_units: sold,
                units_held: state.units_held,
            })
        }
    };

    // net_total <= gross_value, so this cannot fail.
    let commission = *trade.gross_value - *trade.net_total;
    let avg_unit_cost = state.acb.checked_div(held)
        .ok_or_else(|| too_large(trade, "average unit cost"))?;
    let disposed_acb = avg_unit_cost.checked_mul(sold.into())
        .ok_or_else(|| too_large(trade, "ACB of the units sold"))?;
    let capital_gain = (*trade.unit_rate).checked_mul(*sold)
        .and_then(|proceeds| proceeds.checked_sub(commission))
        .and_then(|gain| gain.checked_sub(*disposed_acb))
        .ok_or_else(|| too_large(trade, "capital gain"))?;
    // Selling everything must leave an ACB of exactly zero.
    let new_acb = remaining.checked_div(held)
        .and_then(|remaining_share| state.acb.checked_mul(remaining_share))
        .ok_or_else(|| too_large(trade, "ACB"))?;

    tracing::debug!(
        "process_sell: avg_unit_cost = {}, commission = {}, capital_gain = {}, new_acb = {}",
        avg_unit_cost,
        commission,
        capital_gain,
        new_acb
    );

    let new_state = Tabulation {
        acb: new_acb,
        units_held: remaining,
        capital_gains: state.capital_gains.checked_add(capital_gain)
            .ok_or_else(|| too_large(trade, "total capital gains"))?,
        proceeds: state.proceeds.checked_add(trade.gross_value)
            .ok_or_else(|| too_large(trade, "total proceeds"))?,
        sum_acb_dispositions: state.sum_acb_dispositions.checked_add(disposed_acb)
            .ok_or_else(|| too_large(trade, "total ACB of dispositions"))?,
        ..state.clone()
    };
    Ok((new_state, capital_gain))
}

/// The ledger transition for a single trade. `state` is left untouched.
pub fn apply_trade(
    state: &Tabulation,
    trade: &BaseTrade,
) -> Result<(Tabulation, LedgerEvent), LedgerError> {
    let (post, capital_gain) = match trade.kind() {
        TradeKind::Buy => (process_buy(state, trade)?, None),
        TradeKind::Sell => {
            let (post, gain) = process_sell(state, trade)?;
            (post, Some(gain))
        }
    };
    let event = event_for(trade, &post, capital_gain);
    Ok((post, event))
}

/// Folds `trades` (which must already be in order) over `initial`.
/// Stops at the first trade which cannot be applied.
pub fn trades_to_ledger(
    initial: Tabulation,
    trades: &[BaseTrade],
) -> Result<(Vec<LedgerEvent>, Tabulation), LedgerError> {
    let mut events = Vec::<LedgerEvent>::with_capacity(trades.len());
    let mut state = initial;

    for trade in trades {
        let (post, event) = apply_trade(&state, trade)?;
        tracing::trace!("trades_to_ledger: adding event: {:#?}", event);
        events.push(event);
        state = post;
    }

    Ok((events, state))
}

// MARK: tests
