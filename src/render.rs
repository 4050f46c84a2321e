//! Structured rendering of transaction records.
//!
//! The output is plain data; the toolkit layer decides how an entry is drawn.

use crate::money::format_money;
use crate::types::TransactionRecord;
use chrono::{Local, TimeZone};
use serde::{Deserialize, Serialize};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Where a rendered entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntrySource {
    /// Loaded from a historical batch.
    History,
    /// Pushed live by the host.
    Recent,
}

impl EntrySource {
    fn id_prefix(self) -> &'static str {
        match self {
            EntrySource::History => "history",
            EntrySource::Recent => "recent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryStyle {
    Muted,
    Highlighted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Glyph {
    Income,
    Outcome,
}

impl Glyph {
    pub fn verb(self) -> &'static str {
        match self {
            Glyph::Income => "Received",
            Glyph::Outcome => "Sent",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailLine {
    pub glyph: Glyph,
    pub amount: String,
}

/// Collapsible per-transaction breakdown, addressed by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailsBlock {
    pub id: String,
    pub tx_hash: String,
    pub blob_size: u64,
    pub lines: Vec<DetailLine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedEntry {
    pub source: EntrySource,
    pub style: EntryStyle,
    pub glyph: Glyph,
    pub action: String,
    pub time: String,
    pub amount: String,
    pub tx_hash: String,
    /// Full address, shown as a tooltip.
    pub recipient: String,
    pub short_recipient: String,
    pub details: DetailsBlock,
}

/// Identifier of the details block for `tx_hash` rendered from `source`.
///
/// The source prefix contains no underscore, so the first `_` always splits the id back
/// into its two parts.
pub fn details_id(source: EntrySource, tx_hash: &str) -> String {
    format!("{}_{}", source.id_prefix(), tx_hash)
}

/// `"@alias"` when an alias is known, otherwise a head/tail preview of the address.
pub fn short_recipient(address: &str, alias: &str, preview_chars: usize) -> String {
    if !alias.is_empty() {
        return format!("@{}", alias);
    }
    let chars: Vec<char> = address.chars().collect();
    let head: String = chars.iter().take(preview_chars).collect();
    let len = chars.len();
    // For addresses shorter than the preview, a negative start is counted from the end again.
    let tail_start = if len >= preview_chars {
        len - preview_chars
    } else {
        (2 * len).saturating_sub(preview_chars)
    };
    let tail: String = chars[tail_start..].iter().take(preview_chars).collect();
    format!("{}...{}", head, tail)
}

pub struct TransactionRenderer<Tz: TimeZone = Local> {
    tz: Tz,
    preview_chars: usize,
}

impl TransactionRenderer<Local> {
    pub fn new(preview_chars: usize) -> Self {
        Self::with_timezone(Local, preview_chars)
    }
}

impl Default for TransactionRenderer<Local> {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_ADDRESS_PREVIEW_CHARS)
    }
}

impl<Tz: TimeZone> TransactionRenderer<Tz>
where
    Tz::Offset: std::fmt::Display,
{
    pub fn with_timezone(tz: Tz, preview_chars: usize) -> Self {
        Self { tz, preview_chars }
    }

    pub fn format_time(&self, timestamp: u64) -> String {
        let local = i64::try_from(timestamp)
            .ok()
            .and_then(|secs| self.tz.timestamp_opt(secs, 0).single());
        match local {
            Some(dt) => dt.format(TIME_FORMAT).to_string(),
            None => {
                tracing::warn!("transfer timestamp {} out of range", timestamp);
                String::new()
            }
        }
    }

    pub fn render(&self, record: &TransactionRecord, source: EntrySource) -> RenderedEntry {
        let style = match source {
            EntrySource::History => EntryStyle::Muted,
            EntrySource::Recent => EntryStyle::Highlighted,
        };
        let glyph = if record.is_income {
            Glyph::Income
        } else {
            Glyph::Outcome
        };

        RenderedEntry {
            source,
            style,
            glyph,
            action: glyph.verb().to_string(),
            time: self.format_time(record.timestamp),
            amount: format_money(record.amount.atomic_units()),
            tx_hash: record.tx_hash.clone(),
            recipient: record.recipient.clone(),
            short_recipient: short_recipient(
                &record.recipient,
                &record.recipient_alias,
                self.preview_chars,
            ),
            details: self.details_block(record, source),
        }
    }

    fn details_block(&self, record: &TransactionRecord, source: EntrySource) -> DetailsBlock {
        let mut lines = Vec::new();
        if let Some(td) = &record.td {
            let received = td.rcv.iter().flatten().map(|a| (Glyph::Income, a));
            let spent = td.spn.iter().flatten().map(|a| (Glyph::Outcome, a));
            for (glyph, amount) in received.chain(spent) {
                lines.push(DetailLine {
                    glyph,
                    amount: format_money(amount.atomic_units()),
                });
            }
        }

        DetailsBlock {
            id: details_id(source, &record.tx_hash),
            tx_hash: record.tx_hash.clone(),
            blob_size: record.tx_blob_size,
            lines,
        }
    }
}
