pub mod attendance;
pub mod exclusion_entry;

pub use attendance::{AttendanceRecord, AttendanceStatus, EventAttendanceMetadata};
pub use exclusion_entry::ExclusionEntry;
