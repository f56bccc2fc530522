pub mod plumber_handler;

pub use plumber_handler::{
    __path_get_plumber, __path_get_plumber_options, __path_list_plumbers, get_plumber,
    get_plumber_options, list_plumbers,
};
