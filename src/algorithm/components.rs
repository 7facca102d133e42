//! 弱连通分量
//!
//! 忽略边的方向判断连通性。追踪图中一个弱连通分量即一条完整谱系。

use crate::graph::{DiGraph, NodeKey};
use std::cmp::Ordering;
use std::collections::HashMap;

fn uf_find(parent: &mut [usize], i: usize) -> usize {
    let mut root = i;
    while parent[root] != root {
        root = parent[root];
    }
    // 路径压缩
    let mut cur = i;
    while parent[cur] != root {
        let next = parent[cur];
        parent[cur] = root;
        cur = next;
    }
    root
}

fn uf_union(parent: &mut [usize], rank: &mut [usize], x: usize, y: usize) {
    let px = uf_find(parent, x);
    let py = uf_find(parent, y);
    if px == py {
        return;
    }
    match rank[px].cmp(&rank[py]) {
        Ordering::Less => parent[px] = py,
        Ordering::Greater => parent[py] = px,
        Ordering::Equal => {
            parent[py] = px;
            rank[px] += 1;
        }
    }
}

/// 计算弱连通分量
///
/// 分量按其第一个顶点在插入顺序中的位置排列，分量内的顶点同样保持插入顺序。
/// 空图返回空列表。
pub fn weakly_connected_components<N: NodeKey>(graph: &DiGraph<N>) -> Vec<Vec<N>> {
    weakly_connected_components_by(graph, |_, _| true)
}

/// 计算弱连通分量，只考虑 `keep_edge` 返回 true 的边
///
/// 相当于先从图的副本中删去被过滤的边再求分量，但不需要复制图。
pub fn weakly_connected_components_by<N, F>(graph: &DiGraph<N>, mut keep_edge: F) -> Vec<Vec<N>>
where
    N: NodeKey,
    F: FnMut(&N, &N) -> bool,
{
    let n = graph.node_count();
    if n == 0 {
        return Vec::new();
    }

    let mut parent: Vec<usize> = (0..n).collect();
    let mut rank: Vec<usize> = vec![0; n];

    for (src, dst) in graph.edge_keys() {
        if !keep_edge(src, dst) {
            continue;
        }
        if let (Some(s), Some(d)) = (graph.node_index(src), graph.node_index(dst)) {
            uf_union(&mut parent, &mut rank, s, d);
        }
    }

    // 按根分组，分量编号取首次出现的顺序
    let mut slot_of_root: HashMap<usize, usize> = HashMap::new();
    let mut components: Vec<Vec<N>> = Vec::new();
    for (idx, id) in graph.node_ids().enumerate() {
        let root = uf_find(&mut parent, idx);
        let slot = *slot_of_root.entry(root).or_insert_with(|| {
            components.push(Vec::new());
            components.len() - 1
        });
        components[slot].push(id.clone());
    }

    components
}
