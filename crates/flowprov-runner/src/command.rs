//! Report script commands.
//!
//! A script is JSON lines; each line names an `op` and carries that
//! operation's arguments, e.g.
//! `{"op":"route","record":{"id":"ff-1"},"relationship":"success"}`.
//! Commands without options use the short form of the operation. Fields an
//! operation does not take are rejected, and `durationMillis` accepts the
//! `-1` "not measured" value.

use flowprov_core::{EventDuration, RecordRef, Relationship};
use flowprov_reporter::{
    Capability, DetailOptions, ProvenanceError, ProvenanceReporter, ReceiveOptions, SendOptions,
    TimedOptions,
};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(
    tag = "op",
    rename_all = "camelCase",
    rename_all_fields = "camelCase",
    deny_unknown_fields
)]
pub enum ReportCommand {
    Receive {
        record: RecordRef,
        transit_uri: String,
        source_system_flow_file_identifier: Option<String>,
        details: Option<String>,
        duration_millis: Option<EventDuration>,
    },
    Fetch {
        record: RecordRef,
        transit_uri: String,
        details: Option<String>,
        duration_millis: Option<EventDuration>,
    },
    Send {
        record: RecordRef,
        transit_uri: String,
        details: Option<String>,
        duration_millis: Option<EventDuration>,
        force: Option<bool>,
    },
    Fork {
        parent: RecordRef,
        children: Vec<RecordRef>,
        details: Option<String>,
        duration_millis: Option<EventDuration>,
    },
    Join {
        parents: Vec<RecordRef>,
        child: RecordRef,
        details: Option<String>,
        duration_millis: Option<EventDuration>,
    },
    Clone {
        parent: RecordRef,
        child: RecordRef,
    },
    ModifyContent {
        record: RecordRef,
        details: Option<String>,
        duration_millis: Option<EventDuration>,
    },
    ModifyAttributes {
        record: RecordRef,
        details: Option<String>,
    },
    Route {
        record: RecordRef,
        relationship: Relationship,
        details: Option<String>,
        duration_millis: Option<EventDuration>,
    },
    Create {
        record: RecordRef,
        details: Option<String>,
    },
    InvokeRemoteProcess {
        record: RecordRef,
        transit_uri: String,
        details: Option<String>,
    },
    Associate {
        record: RecordRef,
        alternate_identifier_namespace: String,
        alternate_identifier: String,
    },
}

impl ReportCommand {
    pub fn parse(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line)
    }

    pub fn capability(&self) -> Capability {
        match self {
            ReportCommand::Receive { .. } => Capability::Receive,
            ReportCommand::Fetch { .. } => Capability::Fetch,
            ReportCommand::Send { .. } => Capability::Send,
            ReportCommand::Fork { .. } => Capability::Fork,
            ReportCommand::Join { .. } => Capability::Join,
            ReportCommand::Clone { .. } => Capability::Clone,
            ReportCommand::ModifyContent { .. } => Capability::ModifyContent,
            ReportCommand::ModifyAttributes { .. } => Capability::ModifyAttributes,
            ReportCommand::Route { .. } => Capability::Route,
            ReportCommand::Create { .. } => Capability::Create,
            ReportCommand::InvokeRemoteProcess { .. } => Capability::InvokeRemoteProcess,
            ReportCommand::Associate { .. } => Capability::Associate,
        }
    }

    pub async fn apply(&self, reporter: &ProvenanceReporter) -> Result<(), ProvenanceError> {
        match self {
            ReportCommand::Receive {
                record,
                transit_uri,
                source_system_flow_file_identifier,
                details,
                duration_millis,
            } => {
                if source_system_flow_file_identifier.is_none()
                    && details.is_none()
                    && duration_millis.is_none()
                {
                    return reporter.receive(record, transit_uri).await;
                }
                let mut options = ReceiveOptions::new();
                if let Some(identifier) = source_system_flow_file_identifier {
                    options = options.source_system_flow_file_identifier(identifier.clone());
                }
                if let Some(details) = details {
                    options = options.details(details.clone());
                }
                if let Some(duration) = duration_millis {
                    options = options.duration(*duration);
                }
                reporter.receive_with(record, transit_uri, options).await
            }
            ReportCommand::Fetch { record, transit_uri, details, duration_millis } => {
                match timed(details, duration_millis) {
                    Some(options) => reporter.fetch_with(record, transit_uri, options).await,
                    None => reporter.fetch(record, transit_uri).await,
                }
            }
            ReportCommand::Send { record, transit_uri, details, duration_millis, force } => {
                if details.is_none() && duration_millis.is_none() && force.is_none() {
                    return reporter.send(record, transit_uri).await;
                }
                let mut options = SendOptions::new().force(force.unwrap_or(false));
                if let Some(details) = details {
                    options = options.details(details.clone());
                }
                if let Some(duration) = duration_millis {
                    options = options.duration(*duration);
                }
                reporter.send_with(record, transit_uri, options).await
            }
            ReportCommand::Fork { parent, children, details, duration_millis } => {
                match timed(details, duration_millis) {
                    Some(options) => reporter.fork_with(parent, children, options).await,
                    None => reporter.fork(parent, children).await,
                }
            }
            ReportCommand::Join { parents, child, details, duration_millis } => {
                match timed(details, duration_millis) {
                    Some(options) => reporter.join_with(parents, child, options).await,
                    None => reporter.join(parents, child).await,
                }
            }
            ReportCommand::Clone { parent, child } => reporter.clone_record(parent, child).await,
            ReportCommand::ModifyContent { record, details, duration_millis } => {
                match timed(details, duration_millis) {
                    Some(options) => reporter.modify_content_with(record, options).await,
                    None => reporter.modify_content(record).await,
                }
            }
            ReportCommand::ModifyAttributes { record, details } => match details {
                Some(details) => {
                    let options = DetailOptions::new().details(details.clone());
                    reporter.modify_attributes_with(record, options).await
                }
                None => reporter.modify_attributes(record).await,
            },
            ReportCommand::Route { record, relationship, details, duration_millis } => {
                match timed(details, duration_millis) {
                    Some(options) => reporter.route_with(record, relationship, options).await,
                    None => reporter.route(record, relationship).await,
                }
            }
            ReportCommand::Create { record, details } => match details {
                Some(details) => {
                    let options = DetailOptions::new().details(details.clone());
                    reporter.create_with(record, options).await
                }
                None => reporter.create(record).await,
            },
            ReportCommand::InvokeRemoteProcess { record, transit_uri, details } => Ok(reporter
                .invoke_remote_process(record, transit_uri, details.as_deref())?),
            ReportCommand::Associate {
                record,
                alternate_identifier_namespace,
                alternate_identifier,
            } => Ok(reporter.associate(
                record,
                alternate_identifier_namespace,
                alternate_identifier,
            )?),
        }
    }
}

/// `None` when neither option was given, so the short form is used.
fn timed(
    details: &Option<String>,
    duration_millis: &Option<EventDuration>,
) -> Option<TimedOptions> {
    if details.is_none() && duration_millis.is_none() {
        return None;
    }
    let mut options = TimedOptions::new();
    if let Some(details) = details {
        options = options.details(details.clone());
    }
    if let Some(duration) = duration_millis {
        options = options.duration(*duration);
    }
    Some(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowprov_core::{ComponentId, ExternalId};
    use flowprov_reporter::{EventKind, InMemoryEventSink};
    use std::sync::Arc;

    fn reporter(sink: Arc<InMemoryEventSink>) -> ProvenanceReporter {
        let component = ComponentId::from_external(ExternalId::new("runner"));
        ProvenanceReporter::new(sink, component, "Replay")
    }

    #[test]
    fn parses_send_with_force() {
        let command = ReportCommand::parse(
            r#"{"op":"send","record":{"id":"ff-1"},"transitUri":"sftp://host/x","force":true}"#,
        )
        .expect("parse");
        assert_eq!(command.capability(), Capability::Send);
        match command {
            ReportCommand::Send { force, transit_uri, .. } => {
                assert_eq!(force, Some(true));
                assert_eq!(transit_uri, "sftp://host/x");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_op_and_missing_arguments() {
        assert!(ReportCommand::parse(r#"{"op":"teleport","record":{"id":"a"}}"#).is_err());
        assert!(ReportCommand::parse(r#"{"op":"send","record":{"id":"a"}}"#).is_err());
    }

    #[test]
    fn rejects_options_the_operation_does_not_take() {
        let lines = [
            r#"{"op":"clone","parent":{"id":"a"},"child":{"id":"b"},"details":"x","durationMillis":5}"#,
            r#"{"op":"create","record":{"id":"a"},"durationMillis":5}"#,
            r#"{"op":"modifyAttributes","record":{"id":"a"},"durationMillis":5}"#,
            r#"{"op":"route","record":{"id":"a"},"relationship":"success","detail":"typo"}"#,
        ];
        for line in lines {
            let err = ReportCommand::parse(line).unwrap_err();
            assert!(err.to_string().contains("unknown field"), "{line}: {err}");
        }
    }

    #[test]
    fn duration_accepts_unknown_sentinel_only() {
        let command = ReportCommand::parse(
            r#"{"op":"modifyContent","record":{"id":"a"},"durationMillis":-1}"#,
        )
        .expect("parse");
        match command {
            ReportCommand::ModifyContent { duration_millis, .. } => {
                assert_eq!(duration_millis, Some(EventDuration::UNKNOWN));
            }
            other => panic!("unexpected command {other:?}"),
        }
        let below = r#"{"op":"modifyContent","record":{"id":"a"},"durationMillis":-2}"#;
        assert!(ReportCommand::parse(below).is_err());
    }

    #[tokio::test]
    async fn applies_commands_through_reporter() {
        let sink = Arc::new(InMemoryEventSink::new());
        let reporter = reporter(sink.clone());
        let script = [
            r#"{"op":"receive","record":{"id":"ff-1"},"transitUri":"http://in","sourceSystemFlowFileIdentifier":"up-7"}"#,
            r#"{"op":"fork","parent":{"id":"ff-1"},"children":[{"id":"ff-2"},{"id":"ff-3"}],"durationMillis":4}"#,
            r#"{"op":"route","record":{"id":"ff-2"},"relationship":"success"}"#,
            r#"{"op":"modifyAttributes","record":{"id":"ff-3"},"details":"renamed"}"#,
        ];
        for line in script {
            ReportCommand::parse(line).expect("parse").apply(&reporter).await.expect("apply");
        }

        let events = sink.events().await;
        let kinds: Vec<EventKind> = events.iter().map(|event| event.kind()).collect();
        assert_eq!(
            kinds,
            vec![EventKind::Receive, EventKind::Fork, EventKind::Route, EventKind::ModifyAttributes]
        );
        assert_eq!(events[0].source_system_flow_file_identifier(), Some("up-7"));
        assert_eq!(events[1].duration().as_millis(), 4);
        assert_eq!(events[3].details(), "renamed");
    }

    #[tokio::test]
    async fn unsupported_commands_fail_without_events() {
        let sink = Arc::new(InMemoryEventSink::new());
        let reporter = reporter(sink.clone());
        let command = ReportCommand::parse(
            r#"{"op":"associate","record":{"id":"a"},"alternateIdentifierNamespace":"ns","alternateIdentifier":"x"}"#,
        )
        .expect("parse");

        let err = command.apply(&reporter).await.unwrap_err();
        assert!(matches!(err, ProvenanceError::UnsupportedOperation(_)));
        assert!(sink.is_empty().await);
    }
}
