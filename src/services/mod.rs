pub mod actor;
pub mod availability;
pub mod clock;
pub mod drivers;
pub mod fleet;
pub mod notifier;
pub mod payroll;
pub mod shift_lifecycle;

pub use actor::Actor;
pub use availability::AvailabilityResolver;
pub use clock::{Clock, FixedClock, SystemClock};
pub use drivers::DriverService;
pub use fleet::FleetService;
pub use notifier::Notifier;
pub use payroll::PayrollService;
pub use shift_lifecycle::ShiftLifecycle;
