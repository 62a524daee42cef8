//! Order action dispatch for the prediction panel.

pub mod action;
pub mod panel;

pub use action::OrderAction;
pub use panel::{OrderPanel, PanelState};
