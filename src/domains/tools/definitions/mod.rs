//! Tool definitions module.
//!
//! This module exports all available tool definitions.
//! Each tool is defined in its own file.

pub mod add_event;
pub mod calendar_data;
pub mod common;

pub use add_event::{AddCalendarEventParams, AddCalendarEventTool};
pub use calendar_data::{GetCalendarDataParams, GetCalendarDataTool};
