//! 图算法模块
//!
//! 提供谱系和轨迹片段提取所需的连通性算法

mod components;

pub use components::{weakly_connected_components, weakly_connected_components_by};
