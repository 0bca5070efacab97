// Analysis engine: transcript reconciliation, outstanding courses and the
// filtered views behind the results table.
pub mod filters;
pub mod not_learned;
pub mod reconcile;

pub use filters::{build_view, major_options, paginate, StatusFilter, TrackFilter, ViewPage, ViewRow, RowStatus, PAGE_SIZE};
pub use not_learned::{not_yet_learned, physical_education_status, PhysicalEducationStatus, PE_COMPLETION_CREDITS};
pub use reconcile::{reconcile, try_reconcile, weighted_average};
