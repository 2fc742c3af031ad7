pub mod draw;
pub mod fallback;
pub mod merge;
pub mod period;
pub mod snapshot;
pub mod stats;

pub use draw::{classify, DrawError, DrawResult, DrawType, RawDraw};
pub use fallback::degraded_record;
pub use merge::{merge, DEFAULT_WINDOW};
pub use snapshot::{LatestView, Snapshot};
pub use stats::{analyse, predict, DigitStats};
