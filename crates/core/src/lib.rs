pub mod lifecycle;
pub mod model;
pub mod recipe;
pub mod session;
pub mod sync;
pub mod viewport;

pub use lifecycle::{ProcessLifecycle, ProcessState};
pub use model::{ProfileSeries, RecordedSeries};
pub use recipe::RecipeError;
pub use session::{PidInputs, Session};
pub use sync::{Readouts, StatusSync, SyncOutcome, SyncTargets};
pub use viewport::Bounds;
