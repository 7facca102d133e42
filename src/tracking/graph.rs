//! 追踪图
//!
//! 细胞追踪结果的有向图表示：节点是某一帧中的一次检测，边沿时间向前把检测
//! 连成谱系。在底层有向图之上维护三个索引：
//! - 帧 -> 节点
//! - 节点标记 -> 节点
//! - 边标记 -> 边
//!
//! 构建之后图的结构以及节点的帧和坐标不再改变，只有标记和非保留属性可以
//! 修改。子图、连通分量、轨迹片段的提取都返回新的实例，原图不受影响。

use super::config::TrackingGraphConfig;
use super::flags::{EdgeFlag, Flag, FlagSet, NodeFlag};
use super::index::{FlagIndex, FrameIndex};
use crate::algorithm::{weakly_connected_components, weakly_connected_components_by};
use crate::error::{Error, Result};
use crate::graph::{DiGraph, Edge, EdgeKey, NodeKey, Vertex};
use crate::types::{Frame, Location, PropertyValue};
use indexmap::IndexSet;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::ops::Range;
use std::sync::Arc;
use tracing::{debug, warn};

/// 已完成的标注计算
///
/// 由指标计算方在完成相应计算后设置，构建时全部为 false。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnnotationStatus {
    /// 分裂事件已标注
    pub division_annotations: bool,
    /// 节点错误已标注
    pub node_errors: bool,
    /// 边错误已标注
    pub edge_errors: bool,
}

/// 带标注的追踪图
///
/// `N` 是节点 ID 类型，`S` 是可选的分割数组类型。分割数组只被持有，不被
/// 解读；节点的标签属性按约定对应其中的像素值。
pub struct TrackingGraph<N: NodeKey, S = ()> {
    /// 底层有向图
    graph: DiGraph<N>,
    /// 分割数组，子图之间共享
    segmentation: Option<Arc<S>>,
    /// 属性名配置，子图之间共享
    config: Arc<TrackingGraphConfig>,
    /// 帧索引
    nodes_by_frame: FrameIndex<N>,
    /// 节点标记
    node_flags: FlagIndex<N, NodeFlag>,
    /// 边标记
    edge_flags: FlagIndex<EdgeKey<N>, EdgeFlag>,
    /// [起始帧, 结束帧)
    frame_range: Option<Range<Frame>>,
    /// 已完成的标注计算
    annotations: AnnotationStatus,
}

impl<N: NodeKey> TrackingGraph<N> {
    /// 使用默认配置创建追踪图：帧键 "t"，标签键 "segmentation_id"，坐标键 ("x", "y")
    pub fn new(graph: DiGraph<N>) -> Result<Self> {
        Self::with_config(graph, None, TrackingGraphConfig::default())
    }
}

impl<N: NodeKey, S> TrackingGraph<N, S> {
    /// 创建追踪图
    ///
    /// 先检查配置的属性名都不是保留的标记名，再检查每个节点都带有帧属性
    /// （整数）和全部坐标属性（数值）。图中已有的、以标记名命名的布尔属性
    /// 被移入标记索引。
    pub fn with_config(
        mut graph: DiGraph<N>,
        segmentation: Option<S>,
        config: TrackingGraphConfig,
    ) -> Result<Self> {
        config.validate()?;

        let mut nodes_by_frame = FrameIndex::new();
        let mut node_flags = FlagIndex::new();
        for vertex in graph.nodes_mut() {
            let frame = frame_of(vertex, &config.frame_key)?;
            for key in &config.location_keys {
                coordinate_of(vertex, key)?;
            }
            nodes_by_frame.insert(frame, vertex.id().clone());

            let flags: FlagSet<NodeFlag> = take_flags(|key| vertex.remove_property(key));
            for flag in flags.iter() {
                node_flags.set(vertex.id(), flag, true);
            }
        }

        let mut edge_flags = FlagIndex::new();
        for edge in graph.edges_mut() {
            let flags: FlagSet<EdgeFlag> = take_flags(|key| edge.remove_property(key));
            if !flags.is_empty() {
                let key = edge.key();
                for flag in flags.iter() {
                    edge_flags.set(&key, flag, true);
                }
            }
        }

        warn_backward_edges(&graph, &config.frame_key);

        let frame_range = nodes_by_frame.frame_range();
        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            frames = ?frame_range,
            "追踪图已构建"
        );

        Ok(Self {
            graph,
            segmentation: segmentation.map(Arc::new),
            config: Arc::new(config),
            nodes_by_frame,
            node_flags,
            edge_flags,
            frame_range,
            annotations: AnnotationStatus::default(),
        })
    }

    // ==================== 基本信息 ====================

    /// 底层有向图（只读）
    pub fn graph(&self) -> &DiGraph<N> {
        &self.graph
    }

    /// 按插入顺序遍历节点及其属性
    pub fn nodes(&self) -> impl Iterator<Item = &Vertex<N>> {
        self.graph.nodes()
    }

    /// 按插入顺序遍历边及其属性
    pub fn edges(&self) -> impl Iterator<Item = &Edge<N>> {
        self.graph.edges()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    pub fn config(&self) -> &TrackingGraphConfig {
        &self.config
    }

    pub fn frame_key(&self) -> &str {
        &self.config.frame_key
    }

    pub fn label_key(&self) -> Option<&str> {
        self.config.label_key.as_deref()
    }

    pub fn location_keys(&self) -> &[String] {
        &self.config.location_keys
    }

    /// 分割数组
    pub fn segmentation(&self) -> Option<&S> {
        self.segmentation.as_deref()
    }

    /// 帧索引
    pub fn nodes_by_frame(&self) -> &FrameIndex<N> {
        &self.nodes_by_frame
    }

    /// 帧范围 [起始帧, 结束帧)；空图为 None
    pub fn frame_range(&self) -> Option<Range<Frame>> {
        self.frame_range.clone()
    }

    /// 第一个有节点的帧
    pub fn start_frame(&self) -> Result<Frame> {
        self.frame_range
            .as_ref()
            .map(|r| r.start)
            .ok_or(Error::EmptyGraph)
    }

    /// 最后一个有节点的帧之后的一帧
    pub fn end_frame(&self) -> Result<Frame> {
        self.frame_range
            .as_ref()
            .map(|r| r.end)
            .ok_or(Error::EmptyGraph)
    }

    pub fn annotations(&self) -> &AnnotationStatus {
        &self.annotations
    }

    pub fn annotations_mut(&mut self) -> &mut AnnotationStatus {
        &mut self.annotations
    }

    // ==================== 节点查询 ====================

    fn vertex(&self, id: &N) -> Result<&Vertex<N>> {
        self.graph
            .node(id)
            .ok_or_else(|| Error::NodeNotFound(format!("{:?}", id)))
    }

    fn ensure_edge(&self, edge: &EdgeKey<N>) -> Result<()> {
        if self.graph.contains_edge(&edge.0, &edge.1) {
            Ok(())
        } else {
            Err(Error::EdgeNotFound(format!("{:?} -> {:?}", edge.0, edge.1)))
        }
    }

    /// 获取帧中的全部节点；帧中没有节点时返回空列表
    pub fn get_nodes_in_frame(&self, frame: Frame) -> Vec<N> {
        self.nodes_by_frame
            .get(frame)
            .map(|ids| ids.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// 获取节点所在的帧
    pub fn get_frame(&self, id: &N) -> Result<Frame> {
        frame_of(self.vertex(id)?, &self.config.frame_key)
    }

    /// 获取节点的空间位置，顺序与坐标键一致
    pub fn get_location(&self, id: &N) -> Result<Location> {
        let vertex = self.vertex(id)?;
        self.config
            .location_keys
            .iter()
            .map(|key| coordinate_of(vertex, key))
            .collect()
    }

    /// 获取节点的分割标签；没有配置标签键或节点没有整数标签时为 None
    pub fn get_label(&self, id: &N) -> Result<Option<i64>> {
        let vertex = self.vertex(id)?;
        Ok(self
            .config
            .label_key
            .as_deref()
            .and_then(|key| vertex.property(key))
            .and_then(PropertyValue::as_int))
    }

    /// 获取出度至少为 2 的节点（分裂）
    pub fn get_divisions(&self) -> Vec<N> {
        self.graph
            .node_ids()
            .filter(|id| self.graph.out_degree(id) >= 2)
            .cloned()
            .collect()
    }

    /// 获取入度至少为 2 的节点（合并）
    pub fn get_merges(&self) -> Vec<N> {
        self.graph
            .node_ids()
            .filter(|id| self.graph.in_degree(id) >= 2)
            .cloned()
            .collect()
    }

    /// 获取节点的全部前驱
    pub fn get_preds(&self, id: &N) -> Result<Vec<N>> {
        self.vertex(id)?;
        Ok(self.graph.predecessors(id).cloned().collect())
    }

    /// 获取节点的全部后继
    pub fn get_succs(&self, id: &N) -> Result<Vec<N>> {
        self.vertex(id)?;
        Ok(self.graph.successors(id).cloned().collect())
    }

    // ==================== 标记 ====================

    /// 获取带有给定标记的节点
    pub fn get_nodes_with_flag(&self, flag: NodeFlag) -> Vec<N> {
        self.node_flags.members(flag).cloned().collect()
    }

    /// 获取带有给定标记的边
    pub fn get_edges_with_flag(&self, flag: EdgeFlag) -> Vec<EdgeKey<N>> {
        self.edge_flags.members(flag).cloned().collect()
    }

    /// 获取节点标记的值；从未设置过的标记为 false
    pub fn get_node_attribute(&self, id: &N, flag: NodeFlag) -> Result<bool> {
        self.vertex(id)?;
        Ok(self.node_flags.get(id, flag))
    }

    /// 获取边标记的值；从未设置过的标记为 false
    pub fn get_edge_attribute(&self, edge: &EdgeKey<N>, flag: EdgeFlag) -> Result<bool> {
        self.ensure_edge(edge)?;
        Ok(self.edge_flags.get(edge, flag))
    }

    /// 获取节点上的全部标记
    pub fn get_node_flags(&self, id: &N) -> Result<FlagSet<NodeFlag>> {
        self.vertex(id)?;
        Ok(self.node_flags.flags_of(id))
    }

    /// 设置单个节点的标记，覆盖原值
    pub fn set_flag_on_node(&mut self, id: &N, flag: NodeFlag, value: bool) -> Result<()> {
        self.vertex(id)?;
        self.node_flags.set(id, flag, value);
        Ok(())
    }

    /// 对所有节点设置同一个标记，覆盖之前逐个节点设置的值
    pub fn set_flag_on_all_nodes(&mut self, flag: NodeFlag, value: bool) {
        self.node_flags.set_all(self.graph.node_ids(), flag, value);
    }

    /// 设置单条边的标记，覆盖原值
    pub fn set_flag_on_edge(&mut self, edge: &EdgeKey<N>, flag: EdgeFlag, value: bool) -> Result<()> {
        self.ensure_edge(edge)?;
        self.edge_flags.set(edge, flag, value);
        Ok(())
    }

    /// 对所有边设置同一个标记，覆盖之前逐条边设置的值
    pub fn set_flag_on_all_edges(&mut self, flag: EdgeFlag, value: bool) {
        self.edge_flags.set_all(self.graph.edge_keys(), flag, value);
    }

    // ==================== 其他属性 ====================

    /// 获取节点属性
    pub fn node_property(&self, id: &N, key: &str) -> Result<Option<&PropertyValue>> {
        Ok(self.vertex(id)?.property(key))
    }

    /// 获取边属性
    pub fn edge_property(&self, edge: &EdgeKey<N>, key: &str) -> Result<Option<&PropertyValue>> {
        self.ensure_edge(edge)?;
        Ok(self.graph.edge(edge).and_then(|e| e.property(key)))
    }

    /// 设置节点的非保留属性
    ///
    /// 帧、标签、坐标属性以及任何标记名都不能通过这里修改。
    pub fn set_node_property(
        &mut self,
        id: &N,
        key: impl Into<String>,
        value: PropertyValue,
    ) -> Result<()> {
        let key = key.into();
        if self.config.is_configured_key(&key) || is_flag_name(&key) {
            return Err(Error::ReservedProperty(key));
        }
        let vertex = self
            .graph
            .node_mut(id)
            .ok_or_else(|| Error::NodeNotFound(format!("{:?}", id)))?;
        vertex.set_property(key, value);
        Ok(())
    }

    /// 设置边的非保留属性；标记名不能通过这里修改
    pub fn set_edge_property(
        &mut self,
        edge: &EdgeKey<N>,
        key: impl Into<String>,
        value: PropertyValue,
    ) -> Result<()> {
        let key = key.into();
        if is_flag_name(&key) {
            return Err(Error::ReservedProperty(key));
        }
        let target = self
            .graph
            .edge_mut(edge)
            .ok_or_else(|| Error::EdgeNotFound(format!("{:?} -> {:?}", edge.0, edge.1)))?;
        target.set_property(key, value);
        Ok(())
    }

    // ==================== 分解 ====================

    /// 由给定节点导出的子图
    ///
    /// 不属于本图的节点被忽略。帧索引和节点标记取与节点集合的交集，边标记
    /// 取与导出子图边集的交集。分割数组和配置与原图共享。
    pub fn get_subgraph<'a, I>(&self, nodes: I) -> Self
    where
        I: IntoIterator<Item = &'a N>,
        N: 'a,
    {
        let keep: HashSet<N> = nodes
            .into_iter()
            .filter(|id| self.graph.contains_node(id))
            .cloned()
            .collect();

        let graph = self.graph.subgraph(&keep);
        let nodes_by_frame = self.nodes_by_frame.restrict(|id| keep.contains(id));
        let node_flags = self.node_flags.restrict(|id| keep.contains(id));
        let edge_flags = self
            .edge_flags
            .restrict(|(src, dst)| graph.contains_edge(src, dst));
        let frame_range = nodes_by_frame.frame_range();

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            frames = ?frame_range,
            "提取子图"
        );

        Self {
            graph,
            segmentation: self.segmentation.clone(),
            config: Arc::clone(&self.config),
            nodes_by_frame,
            node_flags,
            edge_flags,
            frame_range,
            annotations: self.annotations,
        }
    }

    /// 按弱连通分量拆分，每个分量即一条谱系
    pub fn get_connected_components(&self) -> Vec<Self> {
        if self.graph.is_empty() {
            return Vec::new();
        }

        let components = weakly_connected_components(&self.graph);
        debug!(components = components.len(), "提取连通分量");
        components
            .iter()
            .map(|members| self.get_subgraph(members))
            .collect()
    }

    /// 按分裂拆分为轨迹片段
    ///
    /// 忽略所有分裂节点的出边后求弱连通分量，每个分量是一个轨迹片段。
    /// `include_division_edges` 为 true 时，把被忽略的边的父节点加入其子节点
    /// 所在的片段，分裂边因此同时出现在子节点的片段中。
    pub fn get_tracklets(&self, include_division_edges: bool) -> Vec<Self> {
        let graph = &self.graph;
        let is_division = |id: &N| graph.out_degree(id) >= 2;

        // 子节点 -> 分裂父节点
        let mut division_parents: HashMap<&N, Vec<&N>> = HashMap::new();
        for parent in graph.node_ids().filter(|id| is_division(*id)) {
            for child in graph.successors(parent) {
                division_parents.entry(child).or_default().push(parent);
            }
        }

        let components = weakly_connected_components_by(graph, |src, _| !is_division(src));
        debug!(
            tracklets = components.len(),
            division_edges = division_parents.values().map(Vec::len).sum::<usize>(),
            "提取轨迹片段"
        );

        components
            .into_iter()
            .map(|members| {
                let mut members: IndexSet<N> = members.into_iter().collect();
                if include_division_edges {
                    let parents: Vec<N> = members
                        .iter()
                        .filter_map(|id| division_parents.get(id))
                        .flatten()
                        .map(|parent| (*parent).clone())
                        .collect();
                    members.extend(parents);
                }
                self.get_subgraph(&members)
            })
            .collect()
    }
}

impl<N: NodeKey, S> fmt::Debug for TrackingGraph<N, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackingGraph")
            .field("nodes", &self.graph.node_count())
            .field("edges", &self.graph.edge_count())
            .field("frame_range", &self.frame_range)
            .field("has_segmentation", &self.segmentation.is_some())
            .field("config", &self.config)
            .field("annotations", &self.annotations)
            .finish()
    }
}

fn frame_of<N: NodeKey>(vertex: &Vertex<N>, key: &str) -> Result<Frame> {
    let value = vertex.property(key).ok_or_else(|| Error::MissingAttribute {
        node: format!("{:?}", vertex.id()),
        key: key.to_string(),
    })?;
    // 结束帧为最大帧 + 1，Frame::MAX 没有后继
    match value.as_int() {
        Some(frame) if frame < Frame::MAX => Ok(frame),
        _ => Err(invalid(vertex, key, "小于 i64::MAX 的整数帧号", value)),
    }
}

fn coordinate_of<N: NodeKey>(vertex: &Vertex<N>, key: &str) -> Result<f64> {
    let value = vertex.property(key).ok_or_else(|| Error::MissingAttribute {
        node: format!("{:?}", vertex.id()),
        key: key.to_string(),
    })?;
    value
        .as_float()
        .ok_or_else(|| invalid(vertex, key, "数值坐标", value))
}

fn invalid<N: NodeKey>(
    vertex: &Vertex<N>,
    key: &str,
    expected: &'static str,
    value: &PropertyValue,
) -> Error {
    Error::InvalidAttribute {
        node: format!("{:?}", vertex.id()),
        key: key.to_string(),
        expected,
        found: format!("{} {}", value.type_name(), value),
    }
}

fn is_flag_name(key: &str) -> bool {
    NodeFlag::has_value(key) || EdgeFlag::has_value(key)
}

/// 从属性中取出以标记名命名的属性
fn take_flags<F, R>(mut remove: R) -> FlagSet<F>
where
    F: Flag,
    R: FnMut(&str) -> Option<PropertyValue>,
{
    let mut flags = FlagSet::empty();
    for &flag in F::ALL {
        let Some(value) = remove(flag.as_str()) else {
            continue;
        };
        match value.as_bool() {
            Some(set) => flags.set(flag, set),
            None => warn!(
                flag = flag.as_str(),
                kind = value.type_name(),
                "忽略非布尔类型的标记属性"
            ),
        }
    }
    flags
}

fn warn_backward_edges<N: NodeKey>(graph: &DiGraph<N>, frame_key: &str) {
    let frame = |id: &N| {
        graph
            .node(id)
            .and_then(|v| v.property(frame_key))
            .and_then(PropertyValue::as_int)
    };
    for (src, dst) in graph.edge_keys() {
        if let (Some(from), Some(to)) = (frame(src), frame(dst)) {
            if from >= to {
                warn!(src = ?src, dst = ?dst, from, to, "边没有沿时间向前");
            }
        }
    }
}
