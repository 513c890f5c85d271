use crate::participant::LiveParticipant;
use derive_more::Display;
use roster_simulator_config::UserId;

#[derive(Debug, Clone, Display)]
pub enum RosterMessage {
    #[display("Connect({})", _0.identity)]
    Connect(LiveParticipant),
    #[display("Disconnect({})", _0.identity)]
    Disconnect(LiveParticipant),
    #[display("ManualConnect({_0})")]
    ManualConnect(UserId),
    #[display("ManualDisconnect({_0})")]
    ManualDisconnect(UserId),
    FeedFinished,
}
