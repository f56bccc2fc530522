mod plumber_service;

pub use plumber_service::PlumberService;
