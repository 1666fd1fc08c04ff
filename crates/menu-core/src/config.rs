//! 菜單引擎配置

use serde::{Deserialize, Serialize};

use crate::{MenuError, Result};

/// 多日展開時單日寫入失敗的處理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyFailurePolicy {
    /// 記錄失敗的日期，繼續處理其餘日期
    #[default]
    BestEffort,
    /// 遇到第一個失敗立即中止
    FailFast,
}

/// 食材單位與產品單位量綱不同時的處理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitPolicy {
    /// 直接以原始數量比較並記錄警告
    #[default]
    Lenient,
    /// 返回錯誤
    Strict,
}

/// 菜單引擎配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// 單日寫入失敗的處理策略
    pub failure_policy: ApplyFailurePolicy,

    /// 單位不一致的處理策略
    pub unit_policy: UnitPolicy,

    /// 天數達到此值時以 rayon 並行彙總需求
    pub parallel_threshold_days: u32,

    /// 單次計算或展開的最大天數
    pub max_horizon_days: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            failure_policy: ApplyFailurePolicy::BestEffort,
            unit_policy: UnitPolicy::Lenient,
            parallel_threshold_days: 28,
            max_horizon_days: 366,
        }
    }
}

impl EngineConfig {
    /// 創建預設配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 從 JSON 載入配置（缺少的欄位使用預設值）
    ///
    /// ```
    /// use menu_core::{ApplyFailurePolicy, EngineConfig};
    ///
    /// let config = EngineConfig::from_json(r#"{ "failure_policy": "fail_fast" }"#).unwrap();
    /// assert_eq!(config.failure_policy, ApplyFailurePolicy::FailFast);
    /// assert_eq!(config.max_horizon_days, 366);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| MenuError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 建構器模式：設置失敗處理策略
    pub fn with_failure_policy(mut self, policy: ApplyFailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// 建構器模式：設置單位處理策略
    pub fn with_unit_policy(mut self, policy: UnitPolicy) -> Self {
        self.unit_policy = policy;
        self
    }

    /// 建構器模式：設置並行門檻
    pub fn with_parallel_threshold_days(mut self, days: u32) -> Self {
        self.parallel_threshold_days = days;
        self
    }

    /// 建構器模式：設置最大天數
    pub fn with_max_horizon_days(mut self, days: u32) -> Self {
        self.max_horizon_days = days;
        self
    }

    /// 檢查配置是否有效
    pub fn validate(&self) -> Result<()> {
        if self.max_horizon_days == 0 {
            return Err(MenuError::InvalidConfig(
                "max_horizon_days 必須大於 0".to_string(),
            ));
        }
        if self.parallel_threshold_days == 0 {
            return Err(MenuError::InvalidConfig(
                "parallel_threshold_days 必須大於 0".to_string(),
            ));
        }
        Ok(())
    }

    /// 檢查天數是否在允許範圍內
    pub fn check_horizon(&self, days: u32) -> Result<()> {
        if days == 0 {
            return Err(MenuError::Validation("天數必須為正整數".to_string()));
        }
        if days > self.max_horizon_days {
            return Err(MenuError::Validation(format!(
                "天數 {} 超過上限 {}",
                days, self.max_horizon_days
            )));
        }
        Ok(())
    }
}
