//! 图索引
//!
//! 顶点邻接关系的内存索引，支持快速的度数和邻居查询

use indexmap::IndexSet;
use std::collections::HashMap;

use super::vertex::NodeKey;

/// 邻接索引
#[derive(Debug, Clone)]
pub struct AdjacencyIndex<N: NodeKey> {
    /// 源顶点到后继顶点的映射
    outgoing: HashMap<N, IndexSet<N>>,
    /// 目标顶点到前驱顶点的映射
    incoming: HashMap<N, IndexSet<N>>,
}

impl<N: NodeKey> AdjacencyIndex<N> {
    /// 创建新索引
    pub fn new() -> Self {
        Self {
            outgoing: HashMap::new(),
            incoming: HashMap::new(),
        }
    }

    /// 按顶点数预分配
    pub fn with_capacity(nodes: usize) -> Self {
        Self {
            outgoing: HashMap::with_capacity(nodes),
            incoming: HashMap::with_capacity(nodes),
        }
    }

    /// 添加边，返回该边此前是否不存在
    pub fn add_edge(&mut self, src: &N, dst: &N) -> bool {
        let inserted = self
            .outgoing
            .entry(src.clone())
            .or_default()
            .insert(dst.clone());
        self.incoming
            .entry(dst.clone())
            .or_default()
            .insert(src.clone());
        inserted
    }

    /// 是否存在 src -> dst 的边
    pub fn contains(&self, src: &N, dst: &N) -> bool {
        self.outgoing
            .get(src)
            .map(|s| s.contains(dst))
            .unwrap_or(false)
    }

    /// 获取顶点的出度
    pub fn out_degree(&self, id: &N) -> usize {
        self.outgoing.get(id).map(|s| s.len()).unwrap_or(0)
    }

    /// 获取顶点的入度
    pub fn in_degree(&self, id: &N) -> usize {
        self.incoming.get(id).map(|s| s.len()).unwrap_or(0)
    }

    /// 获取后继（出边指向的顶点），按边的插入顺序
    pub fn successors<'a>(&'a self, id: &N) -> impl Iterator<Item = &'a N> + 'a {
        self.outgoing.get(id).into_iter().flat_map(|s| s.iter())
    }

    /// 获取前驱（入边来源的顶点），按边的插入顺序
    pub fn predecessors<'a>(&'a self, id: &N) -> impl Iterator<Item = &'a N> + 'a {
        self.incoming.get(id).into_iter().flat_map(|s| s.iter())
    }
}

impl<N: NodeKey> Default for AdjacencyIndex<N> {
    fn default() -> Self {
        Self::new()
    }
}
