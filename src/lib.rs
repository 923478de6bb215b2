// Shift Calendar Library
// Drag-and-drop scheduling core for staff shift calendars

pub mod calendar;
pub mod models;
pub mod services;
pub mod utils;
