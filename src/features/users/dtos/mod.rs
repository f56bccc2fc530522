mod profile_dto;

pub use profile_dto::{
    AvatarResponseDto, ExtendedProfileDto, UpdateBasicProfileDto, UpdateExtendedProfileDto,
    UserDto, UserProfileResponseDto,
};
