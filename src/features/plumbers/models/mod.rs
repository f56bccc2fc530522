mod plumber;

pub use plumber::{is_known_specialty, is_known_working_area, CreatePlumber, Plumber};
