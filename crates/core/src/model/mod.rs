pub mod profile;
pub mod recorded;

pub use profile::ProfileSeries;
pub use recorded::RecordedSeries;
