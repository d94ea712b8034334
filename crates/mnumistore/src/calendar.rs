//! Calendar payloads.
//!
//! On disk a calendar is a JSON object from date key to the events of that
//! day:
//!
//! ```json
//! {"03-14": ["Alice"], "2024-11-11": ["Bob"]}
//! {"05-03": [{"name": "Constitution Day", "type": "holiday"}]}
//! ```
//!
//! A `MM-DD` key is a cyclic (yearly) event, a `YYYY-MM-DD` key a one-off.
//! Name-day calendars store bare names, national-day calendars store
//! `{name, type}` objects. Cyclic events lose their year on write and get
//! the current year back on read.

use crate::error::{Result, StoreError};
use crate::payload;
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const FULL_DATE_LEN: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CalendarType {
    NameDay,
    NationalDay,
}

impl CalendarType {
    pub fn as_str(self) -> &'static str {
        match self {
            CalendarType::NameDay => "name-day",
            CalendarType::NationalDay => "national-day",
        }
    }
}

impl fmt::Display for CalendarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CalendarType {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "name-day" => Ok(CalendarType::NameDay),
            "national-day" => Ok(CalendarType::NationalDay),
            other => Err(StoreError::InvalidArgument(format!(
                "unknown calendar type: {}",
                other
            ))),
        }
    }
}

/// One stored event. Either shape is accepted on read regardless of the
/// calendar type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredEvent {
    Name(String),
    Typed {
        name: String,
        #[serde(rename = "type", default)]
        event_type: String,
    },
}

impl StoredEvent {
    fn name(&self) -> &str {
        match self {
            StoredEvent::Name(name) => name,
            StoredEvent::Typed { name, .. } => name,
        }
    }

    fn event_type(&self) -> &str {
        match self {
            StoredEvent::Name(_) => "",
            StoredEvent::Typed { event_type, .. } => event_type,
        }
    }
}

pub type CalendarPayload = IndexMap<String, Vec<StoredEvent>>;

/// An event as clients send it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventInput {
    pub date: String,
    pub name: String,
    #[serde(default)]
    pub cyclic: bool,
    #[serde(rename = "type", default)]
    pub event_type: Option<String>,
}

impl EventInput {
    pub fn new(date: impl Into<String>, name: impl Into<String>, cyclic: bool) -> Self {
        Self {
            date: date.into(),
            name: name.into(),
            cyclic,
            event_type: None,
        }
    }

    pub fn with_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = Some(event_type.into());
        self
    }
}

/// An event as clients receive it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub date: String,
    pub cyclic: bool,
    pub name: String,
    #[serde(rename = "type")]
    pub event_type: String,
}

fn is_national_day(calendar_type: &str) -> bool {
    calendar_type == CalendarType::NationalDay.as_str()
}

fn storage_date_key(event: &EventInput) -> Result<String> {
    let invalid = || {
        StoreError::InvalidArgument(format!(
            "event date must be YYYY-MM-DD or MM-DD: {}",
            event.date
        ))
    };
    let date = event.date.as_str();
    let month_day = if date.len() == FULL_DATE_LEN {
        NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| invalid())?;
        if !event.cyclic {
            return Ok(date.to_string());
        }
        &date[5..]
    } else {
        date
    };
    // 2000 is a leap year, so 02-29 is accepted as a cyclic day
    if month_day.len() != 5 {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(&format!("2000-{}", month_day), "%Y-%m-%d")
        .map_err(|_| invalid())?;
    Ok(month_day.to_string())
}

/// Builds the on-disk payload for a calendar of `calendar_type`.
///
/// A `MM-DD` date is always cyclic; a full date is stored as-is unless the
/// event is marked cyclic.
pub fn encode_events(calendar_type: &str, events: &[EventInput]) -> Result<CalendarPayload> {
    let national = is_national_day(calendar_type);
    let mut payload = CalendarPayload::new();
    for event in events {
        let key = storage_date_key(event)?;
        let stored = if national {
            StoredEvent::Typed {
                name: event.name.clone(),
                event_type: event.event_type.clone().unwrap_or_default(),
            }
        } else {
            StoredEvent::Name(event.name.clone())
        };
        payload.entry(key).or_default().push(stored);
    }
    Ok(payload)
}

/// Expands a stored payload into the flat event list, placing cyclic
/// events in `year`.
pub fn decode_events(calendar_type: &str, payload: &CalendarPayload, year: i32) -> Vec<CalendarEvent> {
    let national = is_national_day(calendar_type);
    let mut events = Vec::new();
    for (key, day) in payload {
        let cyclic = key.len() != FULL_DATE_LEN;
        let date = if cyclic {
            format!("{}-{}", year, key)
        } else {
            key.clone()
        };
        for stored in day {
            events.push(CalendarEvent {
                date: date.clone(),
                cyclic,
                name: stored.name().to_string(),
                event_type: if national {
                    stored.event_type().to_string()
                } else {
                    String::new()
                },
            });
        }
    }
    events
}

pub fn parse_payload(bytes: &[u8]) -> Result<CalendarPayload> {
    payload::decode_object(bytes)
}

pub fn to_bytes(payload: &CalendarPayload) -> Result<Vec<u8>> {
    payload::encode_object(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_day_cyclic_event_drops_year() {
        let payload = encode_events(
            "name-day",
            &[EventInput::new("2024-03-14", "Alice", true)],
        )
        .unwrap();
        assert_eq!(
            String::from_utf8(to_bytes(&payload).unwrap()).unwrap(),
            r#"{"03-14":["Alice"]}"#
        );
    }

    #[test]
    fn national_day_keeps_type_and_full_date() {
        let payload = encode_events(
            "national-day",
            &[
                EventInput::new("2024-11-11", "Independence Day", false).with_type("holiday"),
                EventInput::new("05-03", "Constitution Day", true),
            ],
        )
        .unwrap();
        assert_eq!(
            String::from_utf8(to_bytes(&payload).unwrap()).unwrap(),
            r#"{"2024-11-11":[{"name":"Independence Day","type":"holiday"}],"05-03":[{"name":"Constitution Day","type":""}]}"#
        );
    }

    #[test]
    fn events_on_the_same_day_are_grouped() {
        let payload = encode_events(
            "name-day",
            &[
                EventInput::new("03-14", "Alice", true),
                EventInput::new("2025-03-14", "Alicja", true),
            ],
        )
        .unwrap();
        assert_eq!(payload.len(), 1);
        assert_eq!(payload["03-14"].len(), 2);
    }

    #[test]
    fn invalid_dates_are_rejected() {
        for date in ["2024-13-01", "14-03-2024", "3-14", "02-30", "yesterday"] {
            let err = encode_events("name-day", &[EventInput::new(date, "x", true)]).unwrap_err();
            assert!(matches!(err, StoreError::InvalidArgument(_)), "{}", date);
        }
    }

    #[test]
    fn leap_day_is_a_valid_cyclic_day() {
        assert!(encode_events("name-day", &[EventInput::new("02-29", "Leap", true)]).is_ok());
    }

    #[test]
    fn decode_restores_year_for_cyclic_events() {
        let payload = parse_payload(br#"{"03-14":["Alice"],"2023-01-02":["Bob"]}"#).unwrap();
        let events = decode_events("name-day", &payload, 2026);
        assert_eq!(
            events,
            vec![
                CalendarEvent {
                    date: "2026-03-14".into(),
                    cyclic: true,
                    name: "Alice".into(),
                    event_type: String::new(),
                },
                CalendarEvent {
                    date: "2023-01-02".into(),
                    cyclic: false,
                    name: "Bob".into(),
                    event_type: String::new(),
                },
            ]
        );
    }

    #[test]
    fn decode_national_day_reads_type() {
        let payload = parse_payload(br#"{"05-03":[{"name":"Constitution Day","type":"holiday"}]}"#)
            .unwrap();
        let events = decode_events("national-day", &payload, 2026);
        assert_eq!(events[0].event_type, "holiday");
        assert_eq!(events[0].name, "Constitution Day");
    }

    #[test]
    fn cyclic_round_trip_is_stable() {
        let input = EventInput::new("2026-12-24", "Adam", true).with_type("holiday");
        let payload = encode_events("national-day", std::slice::from_ref(&input)).unwrap();
        let events = decode_events("national-day", &payload, 2026);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].date, "2026-12-24");
        assert!(events[0].cyclic);
        assert_eq!(events[0].name, "Adam");
        assert_eq!(events[0].event_type, "holiday");
    }

    #[test]
    fn calendar_type_parses() {
        assert_eq!(
            "national-day".parse::<CalendarType>().unwrap(),
            CalendarType::NationalDay
        );
        assert!("birthday".parse::<CalendarType>().is_err());
    }
}
