//! # Menu Calculation Engine
//!
//! 週菜單範本展開、產品需求量彙總與庫存充足度計算

pub mod aggregation;
pub mod calculator;
pub mod editor;
pub mod expansion;
pub mod sufficiency;

use chrono::NaiveDate;
use menu_core::{DailyMenu, RequiredProduct};
use serde::{Deserialize, Serialize};

// Re-export 主要類型
pub use aggregation::{DemandAggregator, DemandKey, DemandMap, ResolvedWeek};
pub use calculator::RequirementCalculator;
pub use editor::TemplateEditor;
pub use expansion::ExpansionEngine;
pub use sufficiency::SufficiencyCalculator;

/// 產品需求量計算結果
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequirementReport {
    /// 各產品需求（不足者在前）
    pub products: Vec<RequiredProduct>,

    /// 警告信息
    pub warnings: Vec<MenuWarning>,

    /// 計算耗時（毫秒）
    pub calculation_time_ms: Option<u128>,
}

impl RequirementReport {
    /// 庫存不足的產品
    pub fn shortages(&self) -> Vec<RequiredProduct> {
        self.products.iter().filter(|p| !p.sufficient).cloned().collect()
    }

    pub fn has_shortage(&self) -> bool {
        self.products.iter().any(|p| !p.sufficient)
    }
}

/// 菜單計算警告
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuWarning {
    /// 相關對象（產品ID或菜色ID）
    pub subject: String,
    pub message: String,
    pub severity: WarningSeverity,
}

impl MenuWarning {
    pub fn new(subject: String, message: String, severity: WarningSeverity) -> Self {
        Self {
            subject,
            message,
            severity,
        }
    }

    pub fn info(subject: String, message: String) -> Self {
        Self::new(subject, message, WarningSeverity::Info)
    }

    pub fn warning(subject: String, message: String) -> Self {
        Self::new(subject, message, WarningSeverity::Warning)
    }

    pub fn error(subject: String, message: String) -> Self {
        Self::new(subject, message, WarningSeverity::Error)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningSeverity {
    Info,
    Warning,
    Error,
}

/// 寫入失敗的日期
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedDay {
    pub date: NaiveDate,
    pub reason: String,
}

/// 範本套用結果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyResult {
    /// 已寫入的每日菜單（依日期排序）
    pub created_menus: Vec<DailyMenu>,

    /// 新建數量
    pub created_count: usize,

    /// 覆蓋既有菜單數量
    pub updated_count: usize,

    /// 寫入失敗的日期
    pub failed_days: Vec<FailedDay>,

    /// 庫存不足的產品
    pub shortages: Vec<RequiredProduct>,

    pub warnings: Vec<MenuWarning>,

    /// 結果摘要
    pub message: String,
}

impl ApplyResult {
    /// 是否全部日期都寫入成功
    pub fn is_complete(&self) -> bool {
        self.failed_days.is_empty()
    }
}
