pub mod consts;
#[cfg(any(test, feature = "testing-utils"))]
pub mod simple_bus;
pub mod system_bus;
