//! Table service: the local mirror of one remote table

mod fan_out;
mod notify;
mod reconcile;
mod table;

pub use fan_out::FanOut;
pub use notify::LogNotifier;
pub use notify::Notifier;
pub use reconcile::ShiftPlan;
pub use table::LoadState;
pub use table::Outcome;
pub use table::TableService;
