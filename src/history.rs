//! Recent-transfers list: one growing surface shared by historical loads and live pushes.

use crate::money::MoneyAmount;
use crate::render::{EntrySource, RenderedEntry, TransactionRenderer};
use crate::types::{TransactionRecord, TransferEvent};
use chrono::{Local, TimeZone};
use serde::Serialize;
use std::collections::VecDeque;

/// Newest-first list of rendered transfers. Entries are never deduplicated by hash.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransferHistory {
    entries: VecDeque<RenderedEntry>,
}

impl TransferHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RenderedEntry> {
        self.entries.iter()
    }

    pub fn get(&self, index: usize) -> Option<&RenderedEntry> {
        self.entries.get(index)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn prepend(&mut self, entry: RenderedEntry) {
        self.entries.push_front(entry);
    }

    pub fn append(&mut self, batch: Vec<RenderedEntry>) {
        self.entries.extend(batch);
    }

    /// First entry whose details block carries `id`.
    pub fn find_details(&self, id: &str) -> Option<&RenderedEntry> {
        self.entries.iter().find(|e| e.details.id == id)
    }
}

/// A live transfer row together with the wallet totals reported alongside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveTransfer {
    pub entry: RenderedEntry,
    pub balance: MoneyAmount,
    pub unlocked_balance: MoneyAmount,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryUpdate {
    /// Historical batch, appended in source order.
    Append(Vec<RenderedEntry>),
    /// Live push, prepended; totals applied in the same step.
    Live(LiveTransfer),
}

pub struct TransferHistoryMerger<Tz: TimeZone = Local> {
    renderer: TransactionRenderer<Tz>,
}

impl<Tz: TimeZone> TransferHistoryMerger<Tz>
where
    Tz::Offset: std::fmt::Display,
{
    pub fn new(renderer: TransactionRenderer<Tz>) -> Self {
        Self { renderer }
    }

    pub fn renderer(&self) -> &TransactionRenderer<Tz> {
        &self.renderer
    }

    pub fn load_history(&self, batch: &[TransactionRecord]) -> HistoryUpdate {
        let rendered = batch
            .iter()
            .map(|record| self.renderer.render(record, EntrySource::History))
            .collect();
        HistoryUpdate::Append(rendered)
    }

    pub fn apply_live_transfer(&self, event: &TransferEvent) -> HistoryUpdate {
        HistoryUpdate::Live(LiveTransfer {
            entry: self.renderer.render(&event.ti, EntrySource::Recent),
            balance: event.balance,
            unlocked_balance: event.unlocked_balance,
        })
    }
}
