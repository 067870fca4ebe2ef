//! Date helpers: archive parsing and the display strings in post responses.

pub mod dates;
