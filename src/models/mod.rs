pub mod driver;
pub mod session;

pub use driver::{Driver, DriverId, DriverRecord, EmergencyContact};
pub use session::Session;
