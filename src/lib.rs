//! TrackGraph - 细胞追踪标注图
//!
//! 保存追踪结果（或真值）的时间有向图，并承载指标计算写入的标注：
//! - 按帧索引节点，查询帧范围、位置、标签
//! - 节点与边上的封闭标记集合（真阳性、假阳性、分裂错误等）
//! - 子图、谱系（弱连通分量）、轨迹片段的提取，索引随之收窄
//!
//! 匹配算法和指标本身不在本库中，它们作为调用方读写标记。

pub mod algorithm;
pub mod error;
pub mod graph;
pub mod tracking;
pub mod types;

// 重导出常用类型
pub use error::{Error, ErrorKind, Result};
pub use graph::{DiGraph, Edge, EdgeKey, NodeKey, Vertex};
pub use tracking::{
    AnnotationStatus, EdgeFlag, Flag, FlagSet, NodeFlag, TrackingGraph, TrackingGraphConfig,
};
pub use types::{Frame, Location, Properties, PropertyValue};

/// 库版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
