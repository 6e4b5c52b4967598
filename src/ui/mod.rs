pub mod busy;
pub mod icons;
pub mod notifications;

pub use busy::BusyIndicator;
pub use notifications::NotificationPrinter;
