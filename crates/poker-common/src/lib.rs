pub mod errors;

pub use errors::{ConsensusError, PokerError, ProtocolError, SessionError};

pub type Result<T> = std::result::Result<T, PokerError>;
