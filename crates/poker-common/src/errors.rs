#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("malformed frame: {0}")]
    Malformed(String),

    #[error("unknown message type: {0}")]
    UnknownType(String),

    #[error("unknown success code: {0}")]
    UnknownSuccess(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("not connected")]
    NotConnected,

    #[error("display name already taken in room")]
    DuplicateName,

    #[error("handshake failed: {0}")]
    Handshake(String),

    #[error("storage error: {0}")]
    Storage(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConsensusError {
    #[error("unknown voting scale: {0}")]
    UnknownScale(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PokerError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Consensus(#[from] ConsensusError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_error_display() {
        let err = ProtocolError::Malformed("expected object".into());
        assert_eq!(err.to_string(), "malformed frame: expected object");

        let err = ProtocolError::UnknownType("telemetry".into());
        assert_eq!(err.to_string(), "unknown message type: telemetry");

        let err = ProtocolError::UnknownSuccess("Room Renamed".into());
        assert_eq!(err.to_string(), "unknown success code: Room Renamed");
    }

    #[test]
    fn session_error_display() {
        assert_eq!(SessionError::NotConnected.to_string(), "not connected");
        assert_eq!(
            SessionError::DuplicateName.to_string(),
            "display name already taken in room"
        );

        let err = SessionError::Handshake("connection refused".into());
        assert_eq!(err.to_string(), "handshake failed: connection refused");
    }

    #[test]
    fn consensus_error_display() {
        let err = ConsensusError::UnknownScale("Planets".into());
        assert_eq!(err.to_string(), "unknown voting scale: Planets");
    }

    #[test]
    fn poker_error_from_protocol() {
        let inner = ProtocolError::Malformed("bad json".into());
        let err: PokerError = inner.into();
        assert!(matches!(err, PokerError::Protocol(_)));
        assert!(err.to_string().contains("bad json"));
    }

    #[test]
    fn poker_error_from_session() {
        let err: PokerError = SessionError::NotConnected.into();
        assert!(matches!(err, PokerError::Session(_)));
        assert_eq!(err.to_string(), "not connected");
    }

    #[test]
    fn poker_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: PokerError = io_err.into();
        assert!(matches!(err, PokerError::Io(_)));
        assert!(err.to_string().contains("file missing"));
    }
}
