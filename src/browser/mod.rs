pub mod chromium;
mod driver;
pub mod mock;
mod session;

pub use chromium::{ChromiumDriver, ChromiumOptions};
pub use driver::Driver;
pub use mock::{MockDriver, MockFailure};
pub use session::SearchSession;
