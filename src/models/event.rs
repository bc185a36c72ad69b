use chrono::NaiveDate;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Signal name dispatched to the simulation engine when a timed or state
/// event fires. Serialized exactly as the engine expects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSignal {
    ApplyNpk,
    Mowing,
}

impl EventSignal {
    pub fn table_name(&self) -> &'static str {
        match self {
            EventSignal::ApplyNpk => "Timed N/P/K application table",
            EventSignal::Mowing => "Schedule mowing events",
        }
    }

    pub fn table_comment(&self) -> &'static str {
        match self {
            EventSignal::ApplyNpk => "All fertilizer amounts in kg/ha",
            EventSignal::Mowing => "Remaining biomass in kg/ha",
        }
    }
}

/// Payload attached to one event row. Field names are part of the engine's
/// fixed schema and must not change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventPayload {
    Npk {
        #[serde(rename = "N_amount")]
        n_amount: f64,
        #[serde(rename = "P_amount")]
        p_amount: f64,
        #[serde(rename = "K_amount")]
        k_amount: f64,
    },
    Mowing { biomass_remaining: f64 },
}

/// One dated row of an events table, serialized as a single-entry mapping
/// from the date to the payload (`- 2024-02-20: {N_amount: 60, ...}`).
#[derive(Debug, Clone, PartialEq)]
pub struct TimedEvent {
    pub date: NaiveDate,
    pub payload: EventPayload,
}

impl Serialize for TimedEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.date, &self.payload)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for TimedEvent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TimedEventVisitor;

        impl<'de> Visitor<'de> for TimedEventVisitor {
            type Value = TimedEvent;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a single-entry map of event date to payload")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let (date, payload): (NaiveDate, EventPayload) = map
                    .next_entry()?
                    .ok_or_else(|| serde::de::Error::custom("empty event row"))?;
                if map.next_entry::<NaiveDate, EventPayload>()?.is_some() {
                    return Err(serde::de::Error::custom(
                        "event row must contain exactly one date key",
                    ));
                }
                Ok(TimedEvent { date, payload })
            }
        }

        deserializer.deserialize_map(TimedEventVisitor)
    }
}

/// A complete timed-event table as it appears under `TimedEvents` in the
/// agromanagement document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedEventTable {
    pub event_signal: EventSignal,
    pub name: String,
    pub comment: String,
    pub events_table: Vec<TimedEvent>,
}

impl TimedEventTable {
    pub fn new(signal: EventSignal, events: Vec<TimedEvent>) -> Self {
        Self {
            event_signal: signal,
            name: signal.table_name().to_string(),
            comment: signal.table_comment().to_string(),
            events_table: events,
        }
    }
}

/// One row of a state-event table, keyed by the model state value (e.g. a
/// development stage) rather than a date.
#[derive(Debug, Clone, PartialEq)]
pub struct StateEvent {
    pub state: f64,
    pub payload: EventPayload,
}

impl Serialize for StateEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.state, &self.payload)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for StateEvent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct StateEventVisitor;

        impl<'de> Visitor<'de> for StateEventVisitor {
            type Value = StateEvent;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a single-entry map of state value to payload")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let (state, payload): (f64, EventPayload) = map
                    .next_entry()?
                    .ok_or_else(|| serde::de::Error::custom("empty state event row"))?;
                if map.next_entry::<f64, EventPayload>()?.is_some() {
                    return Err(serde::de::Error::custom(
                        "state event row must contain exactly one state key",
                    ));
                }
                Ok(StateEvent { state, payload })
            }
        }

        deserializer.deserialize_map(StateEventVisitor)
    }
}

/// State-event table under `StateEvents`. The calendar builder never emits
/// these (it writes `StateEvents: null`), but foreign agromanagement files
/// may carry them and must survive a round-trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateEventTable {
    pub event_signal: EventSignal,
    pub event_state: String,
    pub zero_condition: String,
    pub name: String,
    pub comment: String,
    pub events_table: Vec<StateEvent>,
}

/// Declarative specification of one timed event, before its calendar date
/// has been resolved: either an explicit `date`, or a `(month, day)` pair
/// whose year is derived from the crop's season and start date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
    #[serde(rename = "N_amount", skip_serializing_if = "Option::is_none")]
    pub n_amount: Option<f64>,
    #[serde(rename = "P_amount", skip_serializing_if = "Option::is_none")]
    pub p_amount: Option<f64>,
    #[serde(rename = "K_amount", skip_serializing_if = "Option::is_none")]
    pub k_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub biomass_remaining: Option<f64>,
}

impl EventSpec {
    /// Payload for a fertilization event; unspecified amounts default to zero.
    pub fn npk_payload(&self) -> EventPayload {
        EventPayload::Npk {
            n_amount: self.n_amount.unwrap_or(0.0),
            p_amount: self.p_amount.unwrap_or(0.0),
            k_amount: self.k_amount.unwrap_or(0.0),
        }
    }

    /// Payload for a mowing event; an unspecified target defaults to zero.
    pub fn mowing_payload(&self) -> EventPayload {
        EventPayload::Mowing {
            biomass_remaining: self.biomass_remaining.unwrap_or(0.0),
        }
    }
}
