// Time-of-day histogram.
//
// Buckets every user message into a fixed-width slot of the day (10 minutes
// by default) and sums the words it contains, per chat name. Chats that share
// a name are merged; quiet chats below a word threshold are dropped so the
// CSV only carries conversations worth plotting.

use std::collections::HashMap;
use std::fmt::Write as _;

use anyhow::Result;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Offset, Timelike, Utc};
use tracing::{debug, info};

use crate::export::models::Chat;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Knobs for building a histogram.
#[derive(Debug, Clone)]
pub struct ActivityOptions {
    /// Width of one time-of-day slot, in minutes. Must divide 1440.
    pub slot_minutes: u32,
    /// Only messages sent strictly after this instant are counted.
    pub since: DateTime<FixedOffset>,
    /// Chat names with fewer words than this in total are dropped.
    pub min_total_words: u64,
    /// Offset used to turn timestamps into a local time of day.
    pub offset: FixedOffset,
}

impl Default for ActivityOptions {
    fn default() -> Self {
        let offset = Utc.fix();
        Self {
            slot_minutes: 10,
            since: midnight(NaiveDate::from_ymd_opt(2022, 1, 1).unwrap_or_default(), offset),
            min_total_words: 10_000,
            offset,
        }
    }
}

/// Midnight of `date` in `offset`.
pub fn midnight(date: NaiveDate, offset: FixedOffset) -> DateTime<FixedOffset> {
    DateTime::from_naive_utc_and_offset(date.and_time(NaiveTime::MIN) - offset, offset)
}

/// Word counts per slot per chat name.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityHistogram {
    slot_minutes: u32,
    /// Chat names in first-seen order
    names: Vec<String>,
    /// `slots[slot][name_index]`
    slots: Vec<Vec<u64>>,
}

impl ActivityHistogram {
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Words written in `name` during slot `slot`.
    pub fn count(&self, slot: usize, name: &str) -> Option<u64> {
        let col = self.names.iter().position(|n| n == name)?;
        self.slots.get(slot).map(|row| row[col])
    }

    /// Total words per name across all slots.
    pub fn totals(&self) -> Vec<(&str, u64)> {
        self.names
            .iter()
            .enumerate()
            .map(|(col, name)| {
                let total = self.slots.iter().map(|row| row[col]).sum();
                (name.as_str(), total)
            })
            .collect()
    }

    /// Start time of a slot.
    pub fn slot_start(&self, slot: usize) -> NaiveTime {
        let minutes = slot as u32 * self.slot_minutes;
        NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0).unwrap_or(NaiveTime::MIN)
    }

    /// Render as CSV: `time,<name>,...` then one row per slot.
    pub fn to_csv(&self) -> String {
        let mut csv = String::from("time");
        for name in &self.names {
            csv.push(',');
            csv.push_str(&csv_field(name));
        }
        for (slot, row) in self.slots.iter().enumerate() {
            let _ = write!(csv, "\n{}", self.slot_start(slot).format("%H:%M:%S"));
            for count in row {
                let _ = write!(csv, ",{count}");
            }
        }
        csv
    }
}

/// Build the histogram for every named chat in the archive.
pub fn build_histogram(chats: &[Chat], options: &ActivityOptions) -> Result<ActivityHistogram> {
    let slot_minutes = options.slot_minutes;
    if slot_minutes == 0 || MINUTES_PER_DAY % slot_minutes != 0 {
        anyhow::bail!("Slot size must be a positive divisor of 1440 minutes, got {slot_minutes}");
    }
    let slot_count = (MINUTES_PER_DAY / slot_minutes) as usize;

    let mut names: Vec<String> = Vec::new();
    let mut columns: HashMap<&str, usize> = HashMap::new();
    for chat in chats.iter().filter(|c| !c.name.is_empty()) {
        if !columns.contains_key(chat.name.as_str()) {
            columns.insert(&chat.name, names.len());
            names.push(chat.name.clone());
        }
    }

    let mut slots = vec![vec![0u64; names.len()]; slot_count];
    let mut counted = 0usize;

    for chat in chats {
        let Some(&col) = columns.get(chat.name.as_str()) else {
            continue;
        };
        for message in chat.messages.iter().filter(|m| m.is_message()) {
            let Some(sent) = message
                .date_unixtime
                .and_then(|ts| DateTime::from_timestamp(ts, 0))
                .map(|dt| dt.with_timezone(&options.offset))
            else {
                continue;
            };
            if sent <= options.since {
                continue;
            }

            let minute_of_day = sent.hour() * 60 + sent.minute();
            let slot = (minute_of_day / slot_minutes) as usize;
            let words = message.plain_entity_text().split_whitespace().count() as u64;
            slots[slot][col] += words;
            counted += 1;
        }
    }

    debug!(messages = counted, names = names.len(), "Bucketed messages by time of day");

    let histogram = ActivityHistogram {
        slot_minutes,
        names,
        slots,
    };
    let histogram = drop_quiet_names(histogram, options.min_total_words);

    info!(
        names = histogram.names.len(),
        slots = histogram.slots.len(),
        "Built time-of-day histogram"
    );
    Ok(histogram)
}

fn drop_quiet_names(histogram: ActivityHistogram, min_total_words: u64) -> ActivityHistogram {
    let keep: Vec<usize> = histogram
        .totals()
        .iter()
        .enumerate()
        .filter(|(_, (_, total))| *total >= min_total_words)
        .map(|(col, _)| col)
        .collect();

    let names = keep.iter().map(|&col| histogram.names[col].clone()).collect();
    let slots = histogram
        .slots
        .iter()
        .map(|row| keep.iter().map(|&col| row[col]).collect())
        .collect();

    ActivityHistogram {
        slot_minutes: histogram.slot_minutes,
        names,
        slots,
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::models::Message;

    // 2023-03-01 12:34:56 UTC
    const NOON_ISH: i64 = 1_677_674_096;

    fn options(min_total_words: u64) -> ActivityOptions {
        ActivityOptions {
            min_total_words,
            ..ActivityOptions::default()
        }
    }

    #[test]
    fn test_buckets_into_ten_minute_slots() {
        let chats = vec![Chat::new(
            "Alice",
            vec![Message::plain("one two three").at(NOON_ISH)],
        )];
        let h = build_histogram(&chats, &options(0)).unwrap();
        assert_eq!(h.slot_count(), 144);
        // 12:34 falls into the 12:30 slot
        assert_eq!(h.count(12 * 6 + 3, "Alice"), Some(3));
        assert_eq!(h.slot_start(12 * 6 + 3).format("%H:%M").to_string(), "12:30");
    }

    #[test]
    fn test_old_and_service_messages_ignored() {
        let mut service = Message::service().at(NOON_ISH);
        service.text_entities = Message::plain("joined the group").text_entities;
        let chats = vec![Chat::new(
            "Alice",
            vec![
                Message::plain("too old").at(1_600_000_000),
                Message::plain("no timestamp"),
                service,
            ],
        )];
        let h = build_histogram(&chats, &options(0)).unwrap();
        assert_eq!(h.totals(), vec![("Alice", 0)]);
    }

    #[test]
    fn test_same_name_merges_and_empty_name_skipped() {
        let chats = vec![
            Chat::new("Bob", vec![Message::plain("a b").at(NOON_ISH)]),
            Chat::new("", vec![Message::plain("x y z").at(NOON_ISH)]),
            Chat::new("Bob", vec![Message::plain("c").at(NOON_ISH)]),
        ];
        let h = build_histogram(&chats, &options(0)).unwrap();
        assert_eq!(h.names(), &["Bob".to_string()]);
        assert_eq!(h.totals(), vec![("Bob", 3)]);
    }

    #[test]
    fn test_quiet_names_dropped() {
        let chats = vec![
            Chat::new("Loud", vec![Message::plain("a b c d e").at(NOON_ISH)]),
            Chat::new("Quiet", vec![Message::plain("a").at(NOON_ISH)]),
        ];
        let h = build_histogram(&chats, &options(5)).unwrap();
        assert_eq!(h.names(), &["Loud".to_string()]);
    }

    #[test]
    fn test_offset_shifts_slot() {
        let chats = vec![Chat::new("A", vec![Message::plain("w").at(NOON_ISH)])];
        let mut opts = options(0);
        opts.offset = FixedOffset::east_opt(3 * 3600).unwrap();
        let h = build_histogram(&chats, &opts).unwrap();
        assert_eq!(h.count(15 * 6 + 3, "A"), Some(1));
    }

    #[test]
    fn test_invalid_slot_size() {
        let mut opts = options(0);
        opts.slot_minutes = 7;
        assert!(build_histogram(&[], &opts).is_err());
        opts.slot_minutes = 0;
        assert!(build_histogram(&[], &opts).is_err());
    }

    #[test]
    fn test_csv_layout() {
        let chats = vec![Chat::new("A, B", vec![Message::plain("w w").at(NOON_ISH)])];
        let mut opts = options(0);
        opts.slot_minutes = 720;
        let csv = build_histogram(&chats, &opts).unwrap().to_csv();
        assert_eq!(csv, "time,\"A, B\"\n00:00:00,0\n12:00:00,2");
    }

    // 2022-01-01 00:00:00 UTC
    const NEW_YEAR_2022: i64 = 1_640_995_200;

    #[test]
    fn test_message_at_cutoff_is_excluded() {
        let chats = vec![Chat::new(
            "A",
            vec![
                Message::plain("on the dot").at(NEW_YEAR_2022),
                Message::plain("just after").at(NEW_YEAR_2022 + 1),
            ],
        )];
        let h = build_histogram(&chats, &options(0)).unwrap();
        assert_eq!(h.totals(), vec![("A", 2)]);
        assert_eq!(h.count(0, "A"), Some(2));
    }

    #[test]
    fn test_midnight_in_offset() {
        let date = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
        let moscow = FixedOffset::east_opt(3 * 3600).unwrap();
        let since = midnight(date, moscow);
        assert_eq!(since.timestamp(), NEW_YEAR_2022 - 3 * 3600);
        assert_eq!(since.to_rfc3339(), "2022-01-01T00:00:00+03:00");

        let west = FixedOffset::west_opt(5 * 3600).unwrap();
        assert_eq!(midnight(date, west).timestamp(), NEW_YEAR_2022 + 5 * 3600);
    }

    #[test]
    fn test_cutoff_follows_offset() {
        let moscow = FixedOffset::east_opt(3 * 3600).unwrap();
        let cutoff = NEW_YEAR_2022 - 3 * 3600;
        let chats = vec![Chat::new(
            "A",
            vec![
                Message::plain("before").at(cutoff - 60),
                Message::plain("at").at(cutoff),
                Message::plain("after words").at(cutoff + 60),
            ],
        )];
        let opts = ActivityOptions {
            since: midnight(NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(), moscow),
            offset: moscow,
            ..options(0)
        };
        let h = build_histogram(&chats, &opts).unwrap();
        // 00:01 local time lands in the first slot
        assert_eq!(h.totals(), vec![("A", 2)]);
        assert_eq!(h.count(0, "A"), Some(2));
    }
}
