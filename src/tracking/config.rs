//! 追踪图配置
//!
//! 指定节点上保存帧、分割标签和空间坐标的属性名

use super::flags::{Flag, NodeFlag};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const DEFAULT_FRAME_KEY: &str = "t";
const DEFAULT_LABEL_KEY: &str = "segmentation_id";
const DEFAULT_LOCATION_KEYS: [&str; 2] = ["x", "y"];

/// 追踪图属性名配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingGraphConfig {
    /// 帧属性名，每个节点都必须有
    pub frame_key: String,
    /// 分割标签属性名（节点在分割图中的像素值）；None 表示图中没有标签
    pub label_key: Option<String>,
    /// 空间坐标属性名，每个节点都必须有全部坐标
    pub location_keys: Vec<String>,
}

impl Default for TrackingGraphConfig {
    fn default() -> Self {
        Self {
            frame_key: DEFAULT_FRAME_KEY.to_string(),
            label_key: Some(DEFAULT_LABEL_KEY.to_string()),
            location_keys: DEFAULT_LOCATION_KEYS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl TrackingGraphConfig {
    pub fn with_frame_key(mut self, key: impl Into<String>) -> Self {
        self.frame_key = key.into();
        self
    }

    pub fn with_label_key(mut self, key: impl Into<String>) -> Self {
        self.label_key = Some(key.into());
        self
    }

    pub fn without_label_key(mut self) -> Self {
        self.label_key = None;
        self
    }

    pub fn with_location_keys<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.location_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// 从 JSON 字符串加载，缺省字段取默认值
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        Ok(config)
    }

    /// 从 JSON 文件加载
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read(path.as_ref())?;
        let config: Self = serde_json::from_slice(&data)?;
        Ok(config)
    }

    /// 检查属性名不与节点标记冲突
    ///
    /// 依次检查帧键、标签键、各坐标键，遇到第一个冲突即返回。
    pub fn validate(&self) -> Result<()> {
        if NodeFlag::has_value(&self.frame_key) {
            return Err(Error::ReservedKey {
                role: "帧",
                key: self.frame_key.clone(),
            });
        }
        if let Some(label_key) = &self.label_key {
            if NodeFlag::has_value(label_key) {
                return Err(Error::ReservedKey {
                    role: "标签",
                    key: label_key.clone(),
                });
            }
        }
        for key in &self.location_keys {
            if NodeFlag::has_value(key) {
                return Err(Error::ReservedKey {
                    role: "坐标",
                    key: key.clone(),
                });
            }
        }
        Ok(())
    }

    /// 属性名是否由本配置占用（帧、标签或坐标）
    pub fn is_configured_key(&self, key: &str) -> bool {
        self.frame_key == key
            || self.label_key.as_deref() == Some(key)
            || self.location_keys.iter().any(|k| k == key)
    }
}
