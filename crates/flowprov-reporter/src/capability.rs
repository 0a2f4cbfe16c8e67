//! The full operation surface of a reporter.

use crate::events::EventKind;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Receive,
    Fetch,
    Send,
    Fork,
    Join,
    Clone,
    ModifyContent,
    ModifyAttributes,
    Route,
    Create,
    InvokeRemoteProcess,
    Associate,
}

impl Capability {
    pub const ALL: [Capability; 12] = [
        Capability::Receive,
        Capability::Fetch,
        Capability::Send,
        Capability::Fork,
        Capability::Join,
        Capability::Clone,
        Capability::ModifyContent,
        Capability::ModifyAttributes,
        Capability::Route,
        Capability::Create,
        Capability::InvokeRemoteProcess,
        Capability::Associate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Receive => "receive",
            Capability::Fetch => "fetch",
            Capability::Send => "send",
            Capability::Fork => "fork",
            Capability::Join => "join",
            Capability::Clone => "clone",
            Capability::ModifyContent => "modifyContent",
            Capability::ModifyAttributes => "modifyAttributes",
            Capability::Route => "route",
            Capability::Create => "create",
            Capability::InvokeRemoteProcess => "invokeRemoteProcess",
            Capability::Associate => "associate",
        }
    }

    /// Event kind produced by this capability, `None` for the unsupported ones.
    pub fn event_kind(&self) -> Option<EventKind> {
        match self {
            Capability::Receive => Some(EventKind::Receive),
            Capability::Fetch => Some(EventKind::Fetch),
            Capability::Send => Some(EventKind::Send),
            Capability::Fork => Some(EventKind::Fork),
            Capability::Join => Some(EventKind::Join),
            Capability::Clone => Some(EventKind::Clone),
            Capability::ModifyContent => Some(EventKind::ModifyContent),
            Capability::ModifyAttributes => Some(EventKind::ModifyAttributes),
            Capability::Route => Some(EventKind::Route),
            Capability::Create => Some(EventKind::Create),
            Capability::InvokeRemoteProcess | Capability::Associate => None,
        }
    }

    pub fn is_supported(&self) -> bool {
        self.event_kind().is_some()
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_event_kind_has_exactly_one_capability() {
        for kind in EventKind::ALL {
            let owners: Vec<_> =
                Capability::ALL.iter().filter(|cap| cap.event_kind() == Some(kind)).collect();
            assert_eq!(owners.len(), 1, "{kind}");
        }
    }

    #[test]
    fn only_remote_invocation_and_association_are_unsupported() {
        let unsupported: Vec<_> =
            Capability::ALL.into_iter().filter(|cap| !cap.is_supported()).collect();
        assert_eq!(unsupported, vec![Capability::InvokeRemoteProcess, Capability::Associate]);
    }
}
