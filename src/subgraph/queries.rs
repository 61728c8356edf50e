//! GraphQL documents for the exchange and blocks subgraphs.
//!
//! Static documents are plain consts; the snapshot document interpolates
//! its page size once at first use; block and share-value documents are
//! built per request because every entry is a distinct alias.

use once_cell::sync::Lazy;

use crate::models::BlockEntry;

/// Backend page size for position snapshot history. Fixed by the
/// indexer's per-request record cap; end-of-data is a short page.
pub const SNAPSHOT_PAGE_SIZE: usize = 1000;

/// Half-open width of the block lookup window `[t, t+600)`.
pub const BLOCK_WINDOW_SECONDS: u64 = 600;

/// All mints, burns, and swaps attributed to one account.
pub const USER_TRANSACTIONS: &str = r#"
query transactions($user: Bytes!) {
  mints(first: 500, orderBy: timestamp, orderDirection: desc, where: { to: $user }) {
    transaction { id timestamp }
    pair { id token0 { id symbol } token1 { id symbol } }
    to
    liquidity
    amount0
    amount1
    amountUSD
  }
  burns(first: 500, orderBy: timestamp, orderDirection: desc, where: { sender: $user }) {
    transaction { id timestamp }
    pair { id token0 { id symbol } token1 { id symbol } }
    sender
    liquidity
    amount0
    amount1
    amountUSD
  }
  swaps(first: 500, orderBy: timestamp, orderDirection: desc, where: { to: $user }) {
    transaction { id timestamp }
    pair { id token0 { id symbol } token1 { id symbol } }
    to
    amount0In
    amount1In
    amount0Out
    amount1Out
    amountUSD
  }
}
"#;

/// One page of an account's liquidity-position snapshot history,
/// paginated by numeric offset.
pub static USER_SNAPSHOTS: Lazy<String> = Lazy::new(|| {
    format!(
        r#"
query snapshots($user: Bytes!, $skip: Int!) {{
  liquidityPositionSnapshots(first: {SNAPSHOT_PAGE_SIZE}, skip: $skip, where: {{ user: $user }}) {{
    timestamp
    reserveUSD
    liquidityTokenBalance
    liquidityTokenTotalSupply
    reserve0
    reserve1
    token0PriceUSD
    token1PriceUSD
    pair {{
      id
      reserve0
      reserve1
      reserveUSD
      token0 {{ id symbol }}
      token1 {{ id symbol }}
    }}
  }}
}}
"#
    )
});

/// An account's current liquidity positions with live pair state.
pub const USER_POSITIONS: &str = r#"
query positions($user: Bytes!) {
  liquidityPositions(where: { user: $user }) {
    pair {
      id
      reserve0
      reserve1
      reserveUSD
      totalSupply
      token0 { id symbol derivedETH }
      token1 { id symbol derivedETH }
    }
    liquidityTokenBalance
  }
}
"#;

/// Daily aggregate state for a list of pools since a minimum date.
pub const PAIR_DAY_DATAS_BULK: &str = r#"
query days($pairs: [Bytes]!, $startTimestamp: Int!) {
  pairDayDatas(first: 1000, orderBy: date, orderDirection: asc, where: { pairAddress_in: $pairs, date_gt: $startTimestamp }) {
    pairAddress
    date
    totalSupply
    reserveUSD
  }
}
"#;

/// Current native-asset USD price from the singleton bundle entity.
pub const NATIVE_PRICE: &str = r#"
query bundle {
  bundle(id: "1") {
    ethPrice
  }
}
"#;

/// Build the aliased block-lookup document for one timestamp window.
///
/// Every timestamp becomes one alias `t{ts}` selecting the first block
/// mined inside `[ts, ts + 600)`; the response echoes every alias, with
/// an empty list where no block landed in the window.
pub fn build_blocks_document(timestamps: &[u64]) -> String {
    let mut document = String::from("query blocks {\n");
    for &ts in timestamps {
        let upper = ts + BLOCK_WINDOW_SECONDS;
        document.push_str(&format!(
            "  t{ts}: blocks(first: 1, orderBy: timestamp, orderDirection: asc, \
             where: {{ timestamp_gt: {ts}, timestamp_lt: {upper} }}) {{ number }}\n"
        ));
    }
    document.push('}');
    document
}

/// Build the aliased historical pair-state document for one block window.
///
/// Each resolved block contributes a `t{ts}` alias with the pair state
/// at that height and a `b{ts}` alias with the native price bundle at
/// the same height, keyed by the block's timestamp label.
pub fn build_share_value_document(pair_address: &str, blocks: &[BlockEntry]) -> String {
    let mut document = String::from("query shareValues {\n");
    for block in blocks {
        let ts = block.timestamp;
        let number = block.number;
        document.push_str(&format!(
            "  t{ts}: pair(id: \"{pair_address}\", block: {{ number: {number} }}) {{ \
             reserve0 reserve1 reserveUSD totalSupply \
             token0 {{ derivedETH }} token1 {{ derivedETH }} }}\n"
        ));
        document.push_str(&format!(
            "  b{ts}: bundle(id: \"1\", block: {{ number: {number} }}) {{ ethPrice }}\n"
        ));
    }
    document.push('}');
    document
}
