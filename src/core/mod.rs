pub mod line_service;

pub use crate::domain::dto::{
    LineRequest, LineResponse, LineSummary, LineUpdateRequest, SectionRequest, StopResponse,
};
pub use crate::domain::model::{Line, LineId, Section, Station, StationId};
pub use crate::domain::ports::{LineRepository, StationDirectory};
pub use crate::domain::sections::{Sections, REMOVABLE_MINIMUM_SIZE};
pub use crate::utils::error::Result;
