#[allow(clippy::module_inception)]
mod component;
pub mod header;
pub mod logs;
pub mod participants;
pub mod summary;

pub(crate) use component::Component;
