pub mod colors;
pub mod geo;
pub mod path;
pub mod table;
pub mod time;
