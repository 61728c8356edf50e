//! Per-position liquidity-provider return computation.
//!
//! A position's history is a sparse sequence of balance snapshots. The
//! value change between consecutive snapshots is decomposed into fee
//! accrual vs. price movement vs. principal change by comparing the
//! actual end-of-window amounts against the constant-product no-fee
//! counterfactual: without fees, `sqrt(k)` captured at the window start
//! redistributes across the end-of-window price ratio.

use crate::models::{
    LiquidityPositionSnapshot, Position, PositionReturns, Principal, Transactions,
};
use crate::utils::safe_div;

/// One bound of a position window: balance plus pool state at a moment.
struct PositionView {
    liquidity_token_balance: f64,
    total_supply: f64,
    reserve0: f64,
    reserve1: f64,
    reserve_usd: f64,
    token0_price_usd: f64,
    token1_price_usd: f64,
}

/// Value decomposition across one snapshot window.
struct WindowMetrics {
    hodl_return: f64,
    net_return: f64,
    pool_return: f64,
    fees: f64,
}

impl PositionView {
    fn from_snapshot(snapshot: &LiquidityPositionSnapshot) -> Self {
        Self {
            liquidity_token_balance: snapshot.liquidity_token_balance,
            total_supply: snapshot.liquidity_token_total_supply,
            reserve0: snapshot.reserve0,
            reserve1: snapshot.reserve1,
            reserve_usd: snapshot.reserve_usd,
            token0_price_usd: snapshot.token0_price_usd,
            token1_price_usd: snapshot.token1_price_usd,
        }
    }

    /// Close the final window with live pool state, keeping the LP token
    /// balance of the last recorded snapshot.
    fn current(position: &Position, last_balance: f64, native_price_usd: f64) -> Self {
        let pair = &position.pair;
        Self {
            liquidity_token_balance: last_balance,
            total_supply: pair.total_supply,
            reserve0: pair.reserve0,
            reserve1: pair.reserve1,
            reserve_usd: pair.reserve_usd,
            token0_price_usd: pair.token0.derived_native * native_price_usd,
            token1_price_usd: pair.token1.derived_native * native_price_usd,
        }
    }
}

/// Compute return metrics for one user + one pool.
///
/// `snapshots` is the account's full history; it is filtered to the
/// position's pool and sorted here. The caller is responsible for the
/// deferral contract: pool aggregate state, snapshot history, and the
/// native price must all be present and non-empty before calling.
pub fn position_returns(
    position: &Position,
    native_price_usd: f64,
    snapshots: &[LiquidityPositionSnapshot],
) -> PositionReturns {
    let mut history: Vec<&LiquidityPositionSnapshot> = snapshots
        .iter()
        .filter(|snapshot| snapshot.pair.id == position.pair.id)
        .collect();
    history.sort_by_key(|snapshot| snapshot.timestamp);

    let mut hodl_return = 0.0;
    let mut net_return = 0.0;
    let mut pool_return = 0.0;
    let mut fees = 0.0;

    if let Some(last) = history.last() {
        let last_balance = last.liquidity_token_balance;

        for (index, snapshot) in history.iter().enumerate() {
            let t0 = PositionView::from_snapshot(snapshot);
            let t1 = match history.get(index + 1) {
                Some(next) => PositionView::from_snapshot(next),
                None => PositionView::current(position, last_balance, native_price_usd),
            };

            let window = window_metrics(&t0, &t1);
            hodl_return += window.hodl_return;
            net_return += window.net_return;
            pool_return += window.pool_return;
            fees += window.fees;
        }
    }

    PositionReturns {
        position: position.clone(),
        principal: Principal::default(),
        hodl_return_usd: hodl_return,
        net_return_usd: net_return,
        pool_return_usd: pool_return,
        fees_usd: fees,
    }
}

/// Decompose the value change across one window.
///
/// Ownership at the window end uses the starting LP token balance
/// against the ending total supply: balance changes themselves open the
/// next window, so inside a window only pool state moves.
fn window_metrics(t0: &PositionView, t1: &PositionView) -> WindowMetrics {
    let t0_ownership = safe_div(t0.liquidity_token_balance, t0.total_supply);
    let t1_ownership = safe_div(t0.liquidity_token_balance, t1.total_supply);

    // amounts the LP effectively held at both bounds
    let token0_amount_t0 = t0_ownership * t0.reserve0;
    let token1_amount_t0 = t0_ownership * t0.reserve1;
    let token0_amount_t1 = t1_ownership * t1.reserve0;
    let token1_amount_t1 = t1_ownership * t1.reserve1;

    // no-fee counterfactual: sqrt(k) at t0 spread across the t1 price ratio
    let sqrt_k_t0 = (token0_amount_t0 * token1_amount_t0).sqrt();
    let price_ratio_t1 = safe_div(t1.token1_price_usd, t1.token0_price_usd);

    let (token0_no_fees, token1_no_fees) = if price_ratio_t1 > 0.0 {
        (
            sqrt_k_t0 * price_ratio_t1.sqrt(),
            sqrt_k_t0 / price_ratio_t1.sqrt(),
        )
    } else {
        (0.0, 0.0)
    };
    let no_fees_usd =
        token0_no_fees * t1.token0_price_usd + token1_no_fees * t1.token1_price_usd;

    // whatever the actual amounts hold beyond the counterfactual is fees
    let fees_usd = (token0_amount_t1 - token0_no_fees) * t1.token0_price_usd
        + (token1_amount_t1 - token1_no_fees) * t1.token1_price_usd;

    let asset_value_t0 =
        token0_amount_t0 * t0.token0_price_usd + token1_amount_t0 * t0.token1_price_usd;
    // value of the t0 amounts had they been held outside the pool
    let hodl_value_t1 =
        token0_amount_t0 * t1.token0_price_usd + token1_amount_t0 * t1.token1_price_usd;

    let impermanent_loss_usd = no_fees_usd - hodl_value_t1;

    let net_value_t0 = t0_ownership * t0.reserve_usd;
    let net_value_t1 = t1_ownership * t1.reserve_usd;

    // identity: net - hodl = fees + impermanent loss
    WindowMetrics {
        hodl_return: hodl_value_t1 - asset_value_t0,
        net_return: net_value_t1 - net_value_t0,
        pool_return: fees_usd + impermanent_loss_usd,
        fees: fees_usd,
    }
}

/// Net capital the account has put into one pool, from its mint and
/// burn history.
pub fn principal_for_pair(transactions: &Transactions, pair_id: &str) -> Principal {
    let mut principal = Principal::default();

    for mint in transactions
        .mints
        .iter()
        .filter(|mint| mint.pair.id == pair_id)
    {
        principal.usd += mint.amount_usd;
        principal.amount0 += mint.amount0;
        principal.amount1 += mint.amount1;
    }

    for burn in transactions
        .burns
        .iter()
        .filter(|burn| burn.pair.id == pair_id)
    {
        principal.usd -= burn.amount_usd;
        principal.amount0 -= burn.amount0;
        principal.amount1 -= burn.amount1;
    }

    principal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MintTransaction, PairData, TokenData, TransactionRef};

    fn view(
        balance: f64,
        supply: f64,
        reserve0: f64,
        reserve1: f64,
        price0: f64,
        price1: f64,
    ) -> PositionView {
        PositionView {
            liquidity_token_balance: balance,
            total_supply: supply,
            reserve0,
            reserve1,
            reserve_usd: reserve0 * price0 + reserve1 * price1,
            token0_price_usd: price0,
            token1_price_usd: price1,
        }
    }

    #[test]
    fn test_static_window_has_no_returns() {
        let t0 = view(10.0, 100.0, 100.0, 200_000.0, 2000.0, 1.0);
        let t1 = view(10.0, 100.0, 100.0, 200_000.0, 2000.0, 1.0);
        let metrics = window_metrics(&t0, &t1);

        assert!(metrics.hodl_return.abs() < 1e-6);
        assert!(metrics.net_return.abs() < 1e-6);
        assert!(metrics.fees.abs() < 1e-6);
        assert!(metrics.pool_return.abs() < 1e-6);
    }

    #[test]
    fn test_reserve_growth_at_constant_prices_is_fees() {
        let t0 = view(10.0, 100.0, 100.0, 200_000.0, 2000.0, 1.0);
        // both reserves grew 1% with prices and supply unchanged:
        // pure fee accrual, no impermanent loss
        let t1 = view(10.0, 100.0, 101.0, 202_000.0, 2000.0, 1.0);
        let metrics = window_metrics(&t0, &t1);

        assert!(metrics.fees > 0.0);
        // owned reserves (10 token0, 20k token1 -> $40k) grew 1%: $400
        assert!((metrics.net_return - 400.0).abs() < 1e-6);
        // prices did not move, so all of it is fee accrual
        assert!(metrics.hodl_return.abs() < 1e-6);
        assert!((metrics.fees - metrics.pool_return).abs() < 1e-6);
    }

    #[test]
    fn test_price_move_without_fees_is_impermanent_loss() {
        let t0 = view(10.0, 100.0, 100.0, 200_000.0, 2000.0, 1.0);
        // price doubled and reserves rebalanced along x*y=k (no fee growth):
        // reserve0 / sqrt(2), reserve1 * sqrt(2)
        let factor = 2.0_f64.sqrt();
        let t1 = view(
            10.0,
            100.0,
            100.0 / factor,
            200_000.0 * factor,
            4000.0,
            1.0,
        );
        let metrics = window_metrics(&t0, &t1);

        // no fees accrued
        assert!(metrics.fees.abs() < 1e-6);
        // the pool underperformed holding: pool return is the (negative)
        // impermanent loss
        assert!(metrics.pool_return < 0.0);
        assert!(metrics.hodl_return > 0.0);
    }

    #[test]
    fn test_zero_supply_guarded() {
        let t0 = view(10.0, 0.0, 100.0, 200_000.0, 2000.0, 1.0);
        let t1 = view(10.0, 0.0, 100.0, 200_000.0, 2000.0, 1.0);
        let metrics = window_metrics(&t0, &t1);
        assert_eq!(metrics.net_return, 0.0);
        assert_eq!(metrics.fees, 0.0);
    }

    fn pair(id: &str) -> PairData {
        PairData {
            id: id.to_string(),
            token0: TokenData::default(),
            token1: TokenData::default(),
            ..PairData::default()
        }
    }

    #[test]
    fn test_principal_nets_mints_against_burns() {
        let mut transactions = Transactions::default();
        transactions.mints.push(MintTransaction {
            transaction: TransactionRef {
                id: "0xabc".to_string(),
                timestamp: 100,
            },
            pair: pair("0xpool"),
            to: "0xuser".to_string(),
            liquidity: 10.0,
            amount0: 1.0,
            amount1: 2000.0,
            amount_usd: 4000.0,
        });
        transactions.mints.push(MintTransaction {
            transaction: TransactionRef {
                id: "0xdef".to_string(),
                timestamp: 200,
            },
            pair: pair("0xother"),
            to: "0xuser".to_string(),
            liquidity: 5.0,
            amount0: 1.0,
            amount1: 1.0,
            amount_usd: 99.0,
        });

        let principal = principal_for_pair(&transactions, "0xpool");
        assert_eq!(principal.usd, 4000.0);
        assert_eq!(principal.amount0, 1.0);
        assert_eq!(principal.amount1, 2000.0);
    }
}
