//! Application settings stored as named, independently typed slots.
//!
//! Every slot holds one [`Serial`](vc_serial::Serial) value. The whole store
//! is saved as a single document whose root members are the slot names, and
//! loaded back from JSON or XML by looking at the first character of the
//! text.
//!
//! # Examples
//!
//! ```
//! use vc_settings::{Format, Settings};
//!
//! let mut settings = Settings::new();
//! let volume = settings.register("volume", 80_u8).unwrap();
//! let name = settings.register("player", String::from("anon")).unwrap();
//!
//! let report = settings.load_str(r#"{ "volume": 35, "extra": true }"#).unwrap();
//! assert_eq!(report.format, Format::Json);
//! assert_eq!(report.applied, ["volume"]);
//! assert_eq!(report.missing, ["player"]);
//! assert_eq!(report.unknown, ["extra"]);
//!
//! assert_eq!(settings.get(volume), Some(&35));
//! assert_eq!(settings.get(name).map(String::as_str), Some("anon"));
//! ```

// -----------------------------------------------------------------------------
// Modules

mod error;
mod format;
mod slot;
mod store;

// -----------------------------------------------------------------------------
// Exports

pub use error::{Result, SettingsError};
pub use format::Format;
pub use slot::SlotKey;
pub use store::{LoadReport, Settings};
