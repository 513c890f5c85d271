#[macro_use]
extern crate tracing;

mod feed;
mod participant;
mod pending;
mod reconciler;
mod scheduler;
pub mod session;
mod view;

pub use feed::LiveFeed;
pub use participant::{
    DisplayEntry,
    LiveParticipant,
    OfflineParticipant,
    VideoParticipant,
};
pub use pending::{
    PendingRemoval,
    PendingRemovals,
    Timestamp,
};
pub use reconciler::Reconciler;
pub use roster_simulator_config::{
    CallStatus,
    RosterParticipant,
    UserId,
};
pub use scheduler::{
    schedule,
    Alarm,
    RemovalScheduler,
};
pub use session::{
    RosterMessage,
    RosterSession,
};
pub use view::RosterView;
