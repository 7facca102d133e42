//! 标注标记
//!
//! 指标计算写在节点和边上的布尔标记。标记集合是封闭的：新的指标需要新的
//! 标注时在这里添加变体，字符串值因此不会重复，也不会与用户配置的帧、
//! 坐标、标签属性名冲突。

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::str::FromStr;

/// 封闭的标记枚举
pub trait Flag: Copy + Eq + Hash + fmt::Debug + 'static {
    /// 全部变体，按声明顺序
    const ALL: &'static [Self];

    /// 标记在图属性中使用的名字
    fn as_str(&self) -> &'static str;

    /// 变体序号，用于位集合
    fn ordinal(&self) -> usize;

    /// 字符串是否为某个变体的值
    fn has_value(value: &str) -> bool {
        Self::ALL.iter().any(|f| f.as_str() == value)
    }
}

/// 节点标记
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeFlag {
    /// 真阳性节点，适用于真值图和预测图
    #[serde(rename = "is_tp")]
    TruePos,
    /// 假阳性节点，适用于预测图
    #[serde(rename = "is_fp")]
    FalsePos,
    /// 假阴性节点，适用于真值图
    #[serde(rename = "is_fn")]
    FalseNeg,
    /// CTC 定义的未分裂节点：多个预测节点匹配到同一个真值节点
    #[serde(rename = "is_ns")]
    NonSplit,
    /// 真阳性分裂
    #[serde(rename = "is_tp_division")]
    TpDivision,
    /// 假阳性分裂，适用于预测图
    #[serde(rename = "is_fp_division")]
    FpDivision,
    /// 假阴性分裂，适用于真值图
    #[serde(rename = "is_fn_division")]
    FnDivision,
}

impl Flag for NodeFlag {
    const ALL: &'static [Self] = &[
        NodeFlag::TruePos,
        NodeFlag::FalsePos,
        NodeFlag::FalseNeg,
        NodeFlag::NonSplit,
        NodeFlag::TpDivision,
        NodeFlag::FpDivision,
        NodeFlag::FnDivision,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            NodeFlag::TruePos => "is_tp",
            NodeFlag::FalsePos => "is_fp",
            NodeFlag::FalseNeg => "is_fn",
            NodeFlag::NonSplit => "is_ns",
            NodeFlag::TpDivision => "is_tp_division",
            NodeFlag::FpDivision => "is_fp_division",
            NodeFlag::FnDivision => "is_fn_division",
        }
    }

    fn ordinal(&self) -> usize {
        *self as usize
    }
}

/// 边标记
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeFlag {
    /// 真阳性边
    #[serde(rename = "is_tp")]
    TruePos,
    /// 假阳性边，适用于预测图
    #[serde(rename = "is_fp")]
    FalsePos,
    /// 假阴性边，适用于真值图
    #[serde(rename = "is_fn")]
    FalseNeg,
    /// CTC 定义的轨迹间边（分裂处父节点到子节点）
    #[serde(rename = "is_intertrack_edge")]
    IntertrackEdge,
    /// CTC 定义的语义错误边，适用于预测图
    #[serde(rename = "is_wrong_semantic")]
    WrongSemantic,
}

impl Flag for EdgeFlag {
    const ALL: &'static [Self] = &[
        EdgeFlag::TruePos,
        EdgeFlag::FalsePos,
        EdgeFlag::FalseNeg,
        EdgeFlag::IntertrackEdge,
        EdgeFlag::WrongSemantic,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            EdgeFlag::TruePos => "is_tp",
            EdgeFlag::FalsePos => "is_fp",
            EdgeFlag::FalseNeg => "is_fn",
            EdgeFlag::IntertrackEdge => "is_intertrack_edge",
            EdgeFlag::WrongSemantic => "is_wrong_semantic",
        }
    }

    fn ordinal(&self) -> usize {
        *self as usize
    }
}

fn parse_flag<F: Flag>(s: &str) -> Result<F, Error> {
    F::ALL
        .iter()
        .copied()
        .find(|f| f.as_str() == s)
        .ok_or_else(|| Error::UnknownFlag(s.to_string()))
}

impl FromStr for NodeFlag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_flag(s)
    }
}

impl FromStr for EdgeFlag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_flag(s)
    }
}

impl fmt::Display for NodeFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for EdgeFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 标记位集合
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlagSet<F> {
    bits: u32,
    _marker: PhantomData<F>,
}

impl<F: Flag> FlagSet<F> {
    pub fn empty() -> Self {
        Self {
            bits: 0,
            _marker: PhantomData,
        }
    }

    pub fn contains(&self, flag: F) -> bool {
        self.bits & (1u32 << flag.ordinal()) != 0
    }

    /// 设置或清除一个标记
    pub fn set(&mut self, flag: F, value: bool) {
        if value {
            self.bits |= 1u32 << flag.ordinal();
        } else {
            self.bits &= !(1u32 << flag.ordinal());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// 按声明顺序遍历已设置的标记
    pub fn iter(&self) -> impl Iterator<Item = F> + '_ {
        F::ALL.iter().copied().filter(move |f| self.contains(*f))
    }
}

impl<F: Flag> Default for FlagSet<F> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<F: Flag> fmt::Debug for FlagSet<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<F: Flag> FromIterator<F> for FlagSet<F> {
    fn from_iter<I: IntoIterator<Item = F>>(iter: I) -> Self {
        let mut set = Self::empty();
        for flag in iter {
            set.set(flag, true);
        }
        set
    }
}
