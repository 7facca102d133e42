//! 追踪图索引
//!
//! 帧到节点的索引，以及标记到节点/边的索引

use super::flags::{Flag, FlagSet};
use crate::types::Frame;
use indexmap::IndexSet;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::Hash;
use std::ops::Range;

/// 帧索引：帧 -> 该帧中的节点
#[derive(Debug, Clone)]
pub struct FrameIndex<N> {
    frames: BTreeMap<Frame, IndexSet<N>>,
}

impl<N: Clone + Eq + Hash> FrameIndex<N> {
    pub fn new() -> Self {
        Self {
            frames: BTreeMap::new(),
        }
    }

    /// 登记节点所在的帧
    pub fn insert(&mut self, frame: Frame, id: N) {
        self.frames.entry(frame).or_default().insert(id);
    }

    /// 获取帧中的节点；帧不存在时返回 None
    pub fn get(&self, frame: Frame) -> Option<&IndexSet<N>> {
        self.frames.get(&frame)
    }

    /// 帧范围 [最小帧, 最大帧 + 1)
    ///
    /// 没有节点，或最大帧为 `Frame::MAX` 使结束帧无法表示时为 None。
    pub fn frame_range(&self) -> Option<Range<Frame>> {
        let first = *self.frames.keys().next()?;
        let last = *self.frames.keys().next_back()?;
        Some(first..last.checked_add(1)?)
    }

    /// 只保留满足条件的节点，丢弃变空的帧
    pub fn restrict<P>(&self, mut keep: P) -> Self
    where
        P: FnMut(&N) -> bool,
    {
        let frames = self
            .frames
            .iter()
            .filter_map(|(frame, ids)| {
                let kept: IndexSet<N> = ids.iter().filter(|id| keep(*id)).cloned().collect();
                (!kept.is_empty()).then_some((*frame, kept))
            })
            .collect();
        Self { frames }
    }
}

impl<N: Clone + Eq + Hash> Default for FrameIndex<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// 标记索引
///
/// 同时维护两个方向：每个 ID 的标记位集合，以及每个标记当前为 true 的 ID
/// 集合。所有修改都经过 [`FlagIndex::set`] 或 [`FlagIndex::set_all`]，两个
/// 方向在同一次调用中更新。
#[derive(Clone)]
pub struct FlagIndex<K, F> {
    /// ID -> 已设置的标记
    values: HashMap<K, FlagSet<F>>,
    /// 标记 -> 该标记为 true 的 ID
    members: HashMap<F, IndexSet<K>>,
}

impl<K, F> FlagIndex<K, F>
where
    K: Clone + Eq + Hash,
    F: Flag,
{
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
            members: F::ALL.iter().map(|&f| (f, IndexSet::new())).collect(),
        }
    }

    /// 设置单个 ID 的标记
    pub fn set(&mut self, id: &K, flag: F, value: bool) {
        if value {
            self.values.entry(id.clone()).or_default().set(flag, true);
            self.members.entry(flag).or_default().insert(id.clone());
        } else {
            if let Some(flags) = self.values.get_mut(id) {
                flags.set(flag, false);
                if flags.is_empty() {
                    self.values.remove(id);
                }
            }
            if let Some(ids) = self.members.get_mut(&flag) {
                ids.swap_remove(id);
            }
        }
    }

    /// 对给定的全部 ID 统一设置标记，覆盖之前的逐个设置
    ///
    /// `value` 为 true 时该标记的成员变为 `ids`，否则变为空。
    pub fn set_all<'a, I>(&mut self, ids: I, flag: F, value: bool)
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
    {
        self.values.retain(|_, flags| {
            flags.set(flag, false);
            !flags.is_empty()
        });
        let mut all = IndexSet::new();
        if value {
            for id in ids {
                self.values.entry(id.clone()).or_default().set(flag, true);
                all.insert(id.clone());
            }
        }
        self.members.insert(flag, all);
    }

    /// ID 是否带有标记；从未设置的标记视为 false
    pub fn get(&self, id: &K, flag: F) -> bool {
        self.values
            .get(id)
            .map(|flags| flags.contains(flag))
            .unwrap_or(false)
    }

    /// ID 上的全部标记
    pub fn flags_of(&self, id: &K) -> FlagSet<F> {
        self.values.get(id).copied().unwrap_or_default()
    }

    /// 标记当前为 true 的 ID
    pub fn members(&self, flag: F) -> impl Iterator<Item = &K> {
        self.members.get(&flag).into_iter().flat_map(|ids| ids.iter())
    }

    /// 只保留满足条件的 ID
    pub fn restrict<P>(&self, mut keep: P) -> Self
    where
        P: FnMut(&K) -> bool,
    {
        let values = self
            .values
            .iter()
            .filter(|(id, _)| keep(*id))
            .map(|(id, flags)| (id.clone(), *flags))
            .collect::<HashMap<_, _>>();
        let members = self
            .members
            .iter()
            .map(|(flag, ids)| {
                let kept = ids.iter().filter(|id| values.contains_key(*id)).cloned().collect();
                (*flag, kept)
            })
            .collect();
        Self { values, members }
    }
}

impl<K, F> fmt::Debug for FlagIndex<K, F>
where
    K: fmt::Debug,
    F: Flag,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for &flag in F::ALL {
            if let Some(ids) = self.members.get(&flag).filter(|ids| !ids.is_empty()) {
                map.entry(&flag.as_str(), ids);
            }
        }
        map.finish()
    }
}

impl<K, F> Default for FlagIndex<K, F>
where
    K: Clone + Eq + Hash,
    F: Flag,
{
    fn default() -> Self {
        Self::new()
    }
}
