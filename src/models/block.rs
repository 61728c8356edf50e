use serde::Serialize;

/// A timestamp resolved to the nearest on-chain block at or after it.
///
/// `timestamp` is the input label the caller asked about, not the
/// block's actual mined time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockEntry {
    pub timestamp: u64,
    pub number: u64,
}
