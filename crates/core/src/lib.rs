#![forbid(unsafe_code)]

pub mod error;
pub mod i18n;
pub mod model;
pub mod scoring;
pub mod time;

pub use error::Error;
pub use i18n::Language;
pub use time::Clock;
