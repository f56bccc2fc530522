pub mod map_handler;

pub use map_handler::{
    __path_get_map_config, __path_list_markers, __path_validate_point, get_map_config,
    list_markers, validate_point,
};
