//! 图核心模块
//!
//! 定义顶点、边和有向图的核心数据结构

mod edge;
mod graph;
mod index;
mod vertex;

pub use edge::{Edge, EdgeKey};
pub use graph::DiGraph;
pub use vertex::{NodeKey, Vertex};
