//! # Menu Core
//!
//! 核心資料模型與類型定義（產品、菜色、週菜單範本、每日菜單）

pub mod calendar;
pub mod config;
pub mod daily_menu;
pub mod dish;
pub mod product;
pub mod requirement;
pub mod template;
pub mod unit;

use chrono::NaiveDate;
use uuid::Uuid;

// Re-export 主要類型
pub use calendar::PlanningHorizon;
pub use config::{ApplyFailurePolicy, EngineConfig, UnitPolicy};
pub use daily_menu::{ConsumptionLog, DailyMenu, Meal};
pub use dish::{Dish, DishSnapshot, Ingredient, MealType};
pub use product::{Product, ProductStatus};
pub use requirement::RequiredProduct;
pub use template::{DayMeals, TemplateUpdate, WeeklyMenuTemplate};
pub use unit::{Dimension, Unit};

/// 產品ID
pub type ProductId = Uuid;
/// 菜色ID
pub type DishId = Uuid;
/// 範本ID
pub type TemplateId = Uuid;
/// 每日菜單ID
pub type MenuId = Uuid;

/// 菜單引擎錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum MenuError {
    #[error("驗證失敗: {0}")]
    Validation(String),

    #[error("找不到週菜單範本: {0}")]
    TemplateNotFound(TemplateId),

    #[error("找不到菜色: {0}")]
    DishNotFound(DishId),

    #[error("找不到產品: {0}")]
    ProductNotFound(ProductId),

    #[error("找不到每日菜單: {0}")]
    DailyMenuNotFound(NaiveDate),

    #[error("日期 {0} 已存在每日菜單")]
    DuplicateDate(NaiveDate),

    #[error("單位不一致: 產品 {product_id} 使用 {expected}，食材使用 {found}")]
    UnitMismatch {
        product_id: ProductId,
        expected: Unit,
        found: Unit,
    },

    #[error("無效的日期: {0}")]
    InvalidDate(String),

    #[error("儲存層錯誤: {0}")]
    Storage(String),

    #[error("套用範本於 {date} 中止（已寫入 {written} 天）: {reason}")]
    ApplyAborted {
        date: NaiveDate,
        written: usize,
        reason: String,
    },

    #[error("無效的配置: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, MenuError>;
