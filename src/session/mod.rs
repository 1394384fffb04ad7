//! Session id acquisition and the pending-bets lookup it unlocks.

mod handshake;
mod pending;
mod port;

pub use handshake::{HandshakeState, SessionHandshake};
pub use pending::{PendingBets, PendingSnapshot};
pub use port::{InboundMessage, MessagePort, SessionPayload, SessionRequest, WsPort};
