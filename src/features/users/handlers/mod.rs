pub mod profile_handler;

pub use profile_handler::{
    __path_get_profile, __path_update_basic_profile, __path_update_extended_profile,
    __path_upload_avatar, get_profile, update_basic_profile, update_extended_profile,
    upload_avatar,
};
