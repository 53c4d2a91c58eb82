//! Recurring weekly busy/free grid and ad-hoc commitments.

use std::collections::HashMap;

use chrono::{NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

/// What occupies a one-hour cell of the weekly grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    Free,
    Class,
    Commitment,
    Sleep,
}

impl BlockType {
    /// Every non-free cell costs one hour of capacity.
    pub fn is_occupied(self) -> bool {
        self != BlockType::Free
    }
}

/// Grid cell address: weekday and hour of day (0-23).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotKey {
    pub weekday: Weekday,
    pub hour: u8,
}

impl SlotKey {
    pub fn new(weekday: Weekday, hour: u8) -> Self {
        Self { weekday, hour }
    }

    fn sort_key(&self) -> (u32, u8) {
        (self.weekday.num_days_from_monday(), self.hour)
    }
}

/// Serialized form of one grid cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarBlock {
    pub weekday: Weekday,
    pub hour: u8,
    pub block_type: BlockType,
}

/// A 7x24 grid of one-hour cells. Cells that were never set are free.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<CalendarBlock>", into = "Vec<CalendarBlock>")]
pub struct WeeklyCalendar {
    blocks: HashMap<SlotKey, BlockType>,
}

impl WeeklyCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, weekday: Weekday, hour: u8, block_type: BlockType) {
        self.blocks.insert(SlotKey::new(weekday, hour), block_type);
    }

    pub fn with_block(mut self, weekday: Weekday, hour: u8, block_type: BlockType) -> Self {
        self.set(weekday, hour, block_type);
        self
    }

    pub fn get(&self, weekday: Weekday, hour: u8) -> BlockType {
        self.blocks
            .get(&SlotKey::new(weekday, hour))
            .copied()
            .unwrap_or(BlockType::Free)
    }

    /// Number of non-free cells on `weekday`.
    pub fn occupied_hours(&self, weekday: Weekday) -> usize {
        self.blocks
            .iter()
            .filter(|(key, block)| key.weekday == weekday && block.is_occupied())
            .count()
    }

    /// All explicitly set cells, Monday first, then by hour.
    pub fn blocks(&self) -> Vec<CalendarBlock> {
        let mut keys: Vec<&SlotKey> = self.blocks.keys().collect();
        keys.sort_by_key(|k| k.sort_key());
        keys.into_iter()
            .map(|k| CalendarBlock {
                weekday: k.weekday,
                hour: k.hour,
                block_type: self.blocks[k],
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl From<Vec<CalendarBlock>> for WeeklyCalendar {
    fn from(blocks: Vec<CalendarBlock>) -> Self {
        let mut calendar = WeeklyCalendar::new();
        for block in blocks {
            calendar.set(block.weekday, block.hour, block.block_type);
        }
        calendar
    }
}

impl From<WeeklyCalendar> for Vec<CalendarBlock> {
    fn from(calendar: WeeklyCalendar) -> Self {
        calendar.blocks()
    }
}

/// A recurring same-day activity outside the weekly grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commitment {
    pub name: String,
    pub days: Vec<Weekday>,
    #[serde(with = "clock")]
    pub start: NaiveTime,
    #[serde(with = "clock")]
    pub end: NaiveTime,
}

impl Commitment {
    pub fn new(
        name: impl Into<String>,
        days: Vec<Weekday>,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Self {
        Self {
            name: name.into(),
            days,
            start,
            end,
        }
    }

    pub fn occurs_on(&self, weekday: Weekday) -> bool {
        self.days.contains(&weekday)
    }

    /// `(end_hour - start_hour) + (end_minute - start_minute) / 60`.
    pub fn duration_hours(&self) -> f64 {
        let hours = self.end.hour() as f64 - self.start.hour() as f64;
        let minutes = self.end.minute() as f64 - self.start.minute() as f64;
        hours + minutes / 60.0
    }
}

/// `"HH:MM"` clock times.
mod clock {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map_err(serde::de::Error::custom)
    }
}
