//! Domain types for the scheduling engine
//!
//! All internal stages work with the closed types defined here. The only
//! place loosely-typed input is accepted is the registry builder, which
//! normalizes it before anything else runs.

pub mod id;
pub mod layout;
pub mod registry;
pub mod result;
pub mod task;

pub use id::generate_task_id;
pub use layout::{LayoutPreference, LayoutType, PatternKey, UNTIMED};
pub use registry::TaskRegistry;
pub use result::{Placement, ScheduleResult};
pub use task::{CATEGORY_NAMES, Category, Task, TaskKind};
