//! 追踪图模块
//!
//! 在通用有向图之上加入帧索引和标注标记，供追踪指标计算使用

mod config;
mod flags;
mod graph;
mod index;

pub use config::TrackingGraphConfig;
pub use flags::{EdgeFlag, Flag, FlagSet, NodeFlag};
pub use graph::{AnnotationStatus, TrackingGraph};
pub use index::{FlagIndex, FrameIndex};
