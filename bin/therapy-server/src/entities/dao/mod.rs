pub mod message;
pub mod session;

pub use message::{MessageRecord, NewMessage, Sender};
pub use session::{NewSession, SessionStatus, TherapySession};
