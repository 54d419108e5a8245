//! Pure grouping of an interleaved flat fragment sequence into records.
//!
//! The listing renders each catalog entry as three consecutive rows: the
//! result body, its marketplace stats, and its icon strip. Grouping is by
//! position only — no I/O, no shared state.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Rendered rows per record.
pub const FRAGMENTS_PER_RECORD: usize = 3;

/// One catalog listing's three rendered fragments, in the order they appeared.
///
/// Field declaration order is the serialized key order: `result`,
/// `marketplaceStats`, `icons`. Values are raw rendered-fragment strings,
/// deliberately unparsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub result: String,
    #[serde(rename = "marketplaceStats")]
    pub marketplace_stats: String,
    pub icons: String,
}

/// Group a page's fragments into records, three consecutive fragments each,
/// preserving original order. The i-th record corresponds to fragments
/// `[3i, 3i+1, 3i+2]`.
///
/// A length that is not a multiple of three is a data-integrity fault and
/// fails with [`Error::MalformedPage`] — never truncated or padded.
pub fn assemble(fragments: Vec<String>) -> Result<Vec<Record>> {
    if fragments.len() % FRAGMENTS_PER_RECORD != 0 {
        return Err(Error::MalformedPage {
            count: fragments.len(),
        });
    }

    let mut records = Vec::with_capacity(fragments.len() / FRAGMENTS_PER_RECORD);
    let mut fragments = fragments.into_iter();
    while let (Some(result), Some(marketplace_stats), Some(icons)) =
        (fragments.next(), fragments.next(), fragments.next())
    {
        records.push(Record {
            result,
            marketplace_stats,
            icons,
        });
    }
    Ok(records)
}
