//! 图数据结构
//!
//! 内存中的有向属性图，顶点和边都按插入顺序保存

use super::edge::{Edge, EdgeKey};
use super::index::AdjacencyIndex;
use super::vertex::{NodeKey, Vertex};
use crate::error::{Error, Result};
use crate::types::Properties;
use indexmap::IndexMap;
use std::collections::HashSet;

/// 有向属性图
#[derive(Debug, Clone)]
pub struct DiGraph<N: NodeKey> {
    /// 顶点表
    vertices: IndexMap<N, Vertex<N>>,
    /// 边表
    edges: IndexMap<EdgeKey<N>, Edge<N>>,
    /// 邻接索引
    adjacency: AdjacencyIndex<N>,
}

impl<N: NodeKey> DiGraph<N> {
    /// 创建空图
    pub fn new() -> Self {
        Self {
            vertices: IndexMap::new(),
            edges: IndexMap::new(),
            adjacency: AdjacencyIndex::new(),
        }
    }

    /// 按顶点数和边数预分配
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            vertices: IndexMap::with_capacity(nodes),
            edges: IndexMap::with_capacity(edges),
            adjacency: AdjacencyIndex::with_capacity(nodes),
        }
    }

    // ==================== 顶点操作 ====================

    /// 添加顶点；顶点已存在时合并属性
    pub fn add_node(&mut self, id: N, properties: Properties) {
        match self.vertices.get_mut(&id) {
            Some(vertex) => vertex.extend_properties(properties),
            None => {
                let vertex = Vertex::new(id.clone(), properties);
                self.vertices.insert(id, vertex);
            }
        }
    }

    /// 是否包含顶点
    pub fn contains_node(&self, id: &N) -> bool {
        self.vertices.contains_key(id)
    }

    /// 获取顶点
    pub fn node(&self, id: &N) -> Option<&Vertex<N>> {
        self.vertices.get(id)
    }

    /// 获取可变顶点
    pub fn node_mut(&mut self, id: &N) -> Option<&mut Vertex<N>> {
        self.vertices.get_mut(id)
    }

    /// 顶点在插入顺序中的位置
    pub fn node_index(&self, id: &N) -> Option<usize> {
        self.vertices.get_index_of(id)
    }

    /// 按插入顺序遍历顶点
    pub fn nodes(&self) -> impl Iterator<Item = &Vertex<N>> {
        self.vertices.values()
    }

    /// 按插入顺序遍历顶点 ID
    pub fn node_ids(&self) -> impl Iterator<Item = &N> {
        self.vertices.keys()
    }

    pub(crate) fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Vertex<N>> {
        self.vertices.values_mut()
    }

    /// 获取顶点数量
    pub fn node_count(&self) -> usize {
        self.vertices.len()
    }

    /// 图中是否没有顶点
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    // ==================== 边操作 ====================

    /// 添加边；两个端点必须已存在，边已存在时合并属性
    pub fn add_edge(&mut self, src: N, dst: N, properties: Properties) -> Result<()> {
        if !self.vertices.contains_key(&src) {
            return Err(Error::NodeNotFound(format!("源顶点 {:?}", src)));
        }
        if !self.vertices.contains_key(&dst) {
            return Err(Error::NodeNotFound(format!("目标顶点 {:?}", dst)));
        }

        let key = (src, dst);
        if let Some(edge) = self.edges.get_mut(&key) {
            edge.extend_properties(properties);
            return Ok(());
        }

        self.adjacency.add_edge(&key.0, &key.1);
        let edge = Edge::new(key.0.clone(), key.1.clone(), properties);
        self.edges.insert(key, edge);
        Ok(())
    }

    /// 是否包含边
    pub fn contains_edge(&self, src: &N, dst: &N) -> bool {
        self.adjacency.contains(src, dst)
    }

    /// 获取边
    pub fn edge(&self, key: &EdgeKey<N>) -> Option<&Edge<N>> {
        self.edges.get(key)
    }

    /// 获取可变边
    pub fn edge_mut(&mut self, key: &EdgeKey<N>) -> Option<&mut Edge<N>> {
        self.edges.get_mut(key)
    }

    /// 按插入顺序遍历边
    pub fn edges(&self) -> impl Iterator<Item = &Edge<N>> {
        self.edges.values()
    }

    /// 按插入顺序遍历边 ID
    pub fn edge_keys(&self) -> impl Iterator<Item = &EdgeKey<N>> {
        self.edges.keys()
    }

    pub(crate) fn edges_mut(&mut self) -> impl Iterator<Item = &mut Edge<N>> {
        self.edges.values_mut()
    }

    /// 获取边数量
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    // ==================== 邻居查询 ====================

    /// 获取顶点的出度；顶点不存在时为 0
    pub fn out_degree(&self, id: &N) -> usize {
        self.adjacency.out_degree(id)
    }

    /// 获取顶点的入度；顶点不存在时为 0
    pub fn in_degree(&self, id: &N) -> usize {
        self.adjacency.in_degree(id)
    }

    /// 获取后继（出边指向的顶点）
    pub fn successors<'a>(&'a self, id: &N) -> impl Iterator<Item = &'a N> + 'a {
        self.adjacency.successors(id)
    }

    /// 获取前驱（入边来源的顶点）
    pub fn predecessors<'a>(&'a self, id: &N) -> impl Iterator<Item = &'a N> + 'a {
        self.adjacency.predecessors(id)
    }

    // ==================== 子图 ====================

    /// 由给定顶点集合导出的子图
    ///
    /// 只保留两个端点都在集合中的边。属性被深拷贝，顶点和边保持原图中的
    /// 插入顺序。集合中不属于本图的顶点被忽略。
    pub fn subgraph(&self, keep: &HashSet<N>) -> DiGraph<N> {
        let mut sub = DiGraph::with_capacity(keep.len(), 0);
        for (id, vertex) in &self.vertices {
            if keep.contains(id) {
                sub.vertices.insert(id.clone(), vertex.clone());
            }
        }
        for (key, edge) in &self.edges {
            if keep.contains(&key.0) && keep.contains(&key.1) {
                sub.adjacency.add_edge(&key.0, &key.1);
                sub.edges.insert(key.clone(), edge.clone());
            }
        }
        sub
    }
}

impl<N: NodeKey> Default for DiGraph<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PropertyValue;

    fn props(t: i64) -> Properties {
        let mut p = Properties::new();
        p.insert("t".to_string(), PropertyValue::Int(t));
        p
    }

    #[test]
    fn test_graph_basic() {
        let mut graph = DiGraph::new();
        graph.add_node(1u64, props(0));
        graph.add_node(2u64, props(1));
        graph.add_node(3u64, props(1));

        assert_eq!(graph.node_count(), 3);

        graph.add_edge(1, 2, Properties::new()).unwrap();
        graph.add_edge(1, 3, Properties::new()).unwrap();
        assert_eq!(graph.edge_count(), 2);

        assert!(graph.contains_edge(&1, &2));
        assert!(!graph.contains_edge(&2, &1));
        assert_eq!(graph.successors(&1).copied().collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(graph.predecessors(&3).copied().collect::<Vec<_>>(), vec![1]);
        assert_eq!(graph.node_index(&3), Some(2));
    }

    #[test]
    fn test_graph_degrees() {
        let mut graph = DiGraph::new();
        for id in 1..=3u64 {
            graph.add_node(id, Properties::new());
        }
        graph.add_edge(1, 2, Properties::new()).unwrap();
        graph.add_edge(1, 3, Properties::new()).unwrap();
        graph.add_edge(2, 3, Properties::new()).unwrap();

        assert_eq!(graph.out_degree(&1), 2);
        assert_eq!(graph.in_degree(&3), 2);
        assert_eq!(graph.in_degree(&42), 0);
    }

    #[test]
    fn test_add_edge_requires_endpoints() {
        let mut graph = DiGraph::new();
        graph.add_node("a", Properties::new());

        let err = graph.add_edge("a", "b", Properties::new()).unwrap_err();
        assert!(matches!(err, Error::NodeNotFound(_)));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_readd_merges_properties() {
        let mut graph = DiGraph::new();
        graph.add_node(1u64, props(0));
        graph.add_node(1u64, props(5));
        assert_eq!(graph.node_count(), 1);
        assert_eq!(
            graph.node(&1).unwrap().property("t"),
            Some(&PropertyValue::Int(5))
        );

        graph.add_node(2u64, props(1));
        graph.add_edge(1, 2, Properties::new()).unwrap();
        graph.add_edge(1, 2, props(9)).unwrap();
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.out_degree(&1), 1);
        assert_eq!(
            graph.edge(&(1, 2)).unwrap().property("t"),
            Some(&PropertyValue::Int(9))
        );
    }

    #[test]
    fn test_subgraph() {
        let mut graph = DiGraph::new();
        for id in 1..=4u64 {
            graph.add_node(id, props(id as i64));
        }
        graph.add_edge(1, 2, Properties::new()).unwrap();
        graph.add_edge(2, 3, Properties::new()).unwrap();
        graph.add_edge(3, 4, Properties::new()).unwrap();

        let keep: HashSet<u64> = [4, 2, 3, 99].into_iter().collect();
        let sub = graph.subgraph(&keep);

        assert_eq!(sub.node_ids().copied().collect::<Vec<_>>(), vec![2, 3, 4]);
        assert_eq!(
            sub.edge_keys().copied().collect::<Vec<_>>(),
            vec![(2, 3), (3, 4)]
        );
        assert_eq!(sub.in_degree(&2), 0);
        assert_eq!(graph.in_degree(&2), 1);
    }
}
