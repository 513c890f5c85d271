mod action;
mod app;
mod components;
mod layout;
mod theme;
#[allow(clippy::module_inception)]
mod tui;
mod widgets;

pub(crate) use action::Action;
use action::ActivateAction;
pub use app::App;
use components::Component;
use theme::Theme;
use tui::Event;
pub(crate) use tui::restore_terminal;
pub use tui::Tui;
