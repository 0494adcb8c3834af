mod session;

pub use session::{Phase, ReviewSession, RevealOutcome, SessionError};
