pub mod gateway;
pub mod parameters;
pub mod request;
pub mod response;

pub use crate::domain::ports::{ConfigProvider, Transport};
pub use crate::utils::error::Result;
