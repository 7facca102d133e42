//! 边定义
//!
//! 追踪图中的边把相邻帧的检测连成轨迹，方向沿时间向前

use crate::types::{Properties, PropertyValue};
use serde::{Deserialize, Serialize};

use super::vertex::NodeKey;

/// 边 ID：(源顶点, 目标顶点)，每个有序顶点对至多一条边
pub type EdgeKey<N> = (N, N);

/// 边
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge<N> {
    /// 源顶点 ID
    src: N,
    /// 目标顶点 ID
    dst: N,
    /// 属性
    properties: Properties,
}

impl<N: NodeKey> Edge<N> {
    /// 创建新边
    pub fn new(src: N, dst: N, properties: Properties) -> Self {
        Self {
            src,
            dst,
            properties,
        }
    }

    /// 获取源顶点 ID
    pub fn src(&self) -> &N {
        &self.src
    }

    /// 获取目标顶点 ID
    pub fn dst(&self) -> &N {
        &self.dst
    }

    /// 获取边 ID
    pub fn key(&self) -> EdgeKey<N> {
        (self.src.clone(), self.dst.clone())
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_endpoints() {
        let mut e = Edge::new("a", "b", Properties::new());
        assert_eq!(e.src(), &"a");
        assert_eq!(e.dst(), &"b");
        assert_eq!(e.key(), ("a", "b"));

        e.set_property("weight".to_string(), PropertyValue::Float(0.5));
        assert_eq!(e.property("weight"), Some(&PropertyValue::Float(0.5)));
        assert_eq!(e.remove_property("weight"), Some(PropertyValue::Float(0.5)));
        assert!(e.properties().is_empty());
    }
}
