//! Optional inputs of the canonical report operations.
//!
//! Each struct's `Default` holds the defaults applied when a caller uses the
//! short form of an operation: empty details, an unknown (`-1`) duration,
//! an empty source system identifier and `force = false`.

use flowprov_core::EventDuration;

macro_rules! details_setter {
    () => {
        /// Free-text annotation stored on the event.
        pub fn details(mut self, details: impl Into<String>) -> Self {
            self.details = details.into();
            self
        }
    };
}

macro_rules! duration_setters {
    () => {
        pub fn duration_millis(mut self, millis: u64) -> Self {
            self.duration = EventDuration::from_millis(millis);
            self
        }

        /// Accepts an `EventDuration` or a `std::time::Duration`.
        pub fn duration(mut self, duration: impl Into<EventDuration>) -> Self {
            self.duration = duration.into();
            self
        }
    };
}

/// Options for operations that only take details (modify attributes, create).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailOptions {
    pub details: String,
}

impl DetailOptions {
    pub fn new() -> Self {
        Self::default()
    }

    details_setter!();
}

/// Options for operations that take details and a duration
/// (fetch, fork, join, modify content, route).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimedOptions {
    pub details: String,
    pub duration: EventDuration,
}

impl TimedOptions {
    pub fn new() -> Self {
        Self::default()
    }

    details_setter!();
    duration_setters!();
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReceiveOptions {
    /// Identifier the origin system uses for the record; empty when unknown.
    pub source_system_flow_file_identifier: String,
    pub details: String,
    pub duration: EventDuration,
}

impl ReceiveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source_system_flow_file_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.source_system_flow_file_identifier = identifier.into();
        self
    }

    details_setter!();
    duration_setters!();
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendOptions {
    pub details: String,
    pub duration: EventDuration,
    /// Ask the sink to record the event even where it would otherwise drop it.
    pub force: bool,
}

impl SendOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    details_setter!();
    duration_setters!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn defaults_are_empty_details_and_unknown_duration() {
        let send = SendOptions::default();
        assert_eq!(send.details, "");
        assert_eq!(send.duration.as_millis(), -1);
        assert!(!send.force);

        let receive = ReceiveOptions::default();
        assert_eq!(receive.source_system_flow_file_identifier, "");
        assert!(receive.duration.is_unknown());
    }

    #[test]
    fn setters_fill_individual_fields() {
        let options =
            TimedOptions::new().details("split by line").duration(Duration::from_millis(7));
        assert_eq!(options, TimedOptions {
            details: "split by line".to_string(),
            duration: EventDuration::from_millis(7),
        });
        assert_eq!(SendOptions::new().force(true).duration_millis(3).duration.as_millis(), 3);
    }
}
