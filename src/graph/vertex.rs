//! 顶点定义
//!
//! 追踪图中的顶点即一次检测：某一帧中的一个目标实例

use crate::types::{Properties, PropertyValue};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

/// 顶点 ID 约束
///
/// 任何可哈希、可比较、可克隆的类型都可以作为顶点 ID，例如 `u64`、`String`
/// 或 `(Frame, u32)`。
pub trait NodeKey: Clone + Eq + Hash + fmt::Debug {}

impl<T> NodeKey for T where T: Clone + Eq + Hash + fmt::Debug {}

/// 顶点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex<N> {
    /// 顶点 ID
    id: N,
    /// 属性
    properties: Properties,
}

impl<N: NodeKey> Vertex<N> {
    /// 创建新顶点
    pub fn new(id: N, properties: Properties) -> Self {
        Self { id, properties }
    }

    /// 获取顶点 ID
    pub fn id(&self) -> &N {
        &self.id
    }

    /// 获取属性
    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// 设置属性
    pub fn set_property(&mut self, key: String, value: PropertyValue) {
        self.properties.insert(key, value);
    }

    /// 移除属性
    pub fn remove_property(&mut self, key: &str) -> Option<PropertyValue> {
        self.properties.remove(key)
    }

    /// 获取所有属性
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// 合并属性，同名属性被覆盖
    pub fn extend_properties(&mut self, properties: Properties) {
        self.properties.extend(properties);
    }
}
