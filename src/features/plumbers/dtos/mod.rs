mod plumber_dto;

pub use plumber_dto::{PlumberOptionsDto, PlumberRegistrationDto, PlumberResponseDto};
