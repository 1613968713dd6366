pub mod admin_shifts;
pub mod bikes;
pub mod drivers;
pub mod garages;
pub mod payroll;
pub mod shared;
pub mod shifts;
pub mod system;
