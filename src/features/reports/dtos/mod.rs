mod report_dto;

pub use report_dto::{ReportDetailResponseDto, ReportResponseDto, SubmitReportFormDto};
