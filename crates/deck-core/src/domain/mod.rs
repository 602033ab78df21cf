//! Domain model (IDs, projects, sub-resources, status, errors, notices).

pub mod errors;
pub mod events;
pub mod ids;
pub mod project;
pub mod resources;
pub mod status;

pub use self::errors::{DeckError, ErrorKind, GatewayError};
pub use self::events::{Notice, NoticeLevel};
pub use self::ids::{JobId, ProjectId};
pub use self::project::{
    ComputeMode, Node, Project, ProjectDescriptor, UpdateProjectRequest, format_timestamp,
};
pub use self::resources::{ApiStatus, JobSummary, Page, PageRequest, PipelineSummary};
pub use self::status::{BadgeStatus, map_status};
