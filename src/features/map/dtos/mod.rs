mod map_dto;

pub use map_dto::{LegendEntryDto, MapCenterDto, MapConfigDto, MarkerDto, PointCheckDto};
