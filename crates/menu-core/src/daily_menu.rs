//! 每日菜單模型

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{DishSnapshot, MealType, MenuId, ProductId, Unit};

/// 一餐
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    /// 菜色快照（有序）
    pub dishes: Vec<DishSnapshot>,

    /// 用餐幼兒人數
    pub child_count: u32,

    /// 供餐時間
    pub served_at: Option<DateTime<Utc>>,
}

impl Meal {
    /// 創建新的一餐
    pub fn new(dishes: Vec<DishSnapshot>, child_count: u32) -> Self {
        Self {
            dishes,
            child_count,
            served_at: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.dishes.is_empty()
    }

    pub fn is_served(&self) -> bool {
        self.served_at.is_some()
    }
}

/// 消耗紀錄（由供餐子系統於供餐時附加）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionLog {
    pub product_id: ProductId,
    pub quantity: Decimal,
    pub unit: Unit,
    pub meal_type: MealType,
    pub logged_at: DateTime<Utc>,
}

/// 每日菜單
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyMenu {
    /// 菜單ID
    pub id: MenuId,

    /// 日期（每日唯一）
    pub date: NaiveDate,

    /// 四餐（依 MealType 順序：早餐、午餐、點心、晚餐）
    pub meals: [Meal; 4],

    /// 當日幼兒總人數
    pub total_child_count: u32,

    /// 消耗紀錄（只增不改）
    #[serde(default)]
    pub consumption_logs: Vec<ConsumptionLog>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DailyMenu {
    /// 創建空白的每日菜單
    pub fn new(date: NaiveDate, total_child_count: u32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            date,
            meals: Default::default(),
            total_child_count,
            consumption_logs: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// 建構器模式：設置某一餐
    pub fn with_meal(mut self, meal_type: MealType, meal: Meal) -> Self {
        self.meals[meal_type.index()] = meal;
        self
    }

    /// 取得某一餐
    pub fn meal(&self, meal_type: MealType) -> &Meal {
        &self.meals[meal_type.index()]
    }

    /// 取得某一餐（可變）
    pub fn meal_mut(&mut self, meal_type: MealType) -> &mut Meal {
        &mut self.meals[meal_type.index()]
    }

    /// 以新內容覆蓋既有菜單（保留ID、建立時間與消耗紀錄）
    pub fn merge_into(self, existing: &DailyMenu) -> DailyMenu {
        DailyMenu {
            id: existing.id,
            created_at: existing.created_at,
            consumption_logs: existing.consumption_logs.clone(),
            updated_at: Utc::now(),
            ..self
        }
    }

    /// 當日菜色總數
    pub fn dish_count(&self) -> usize {
        self.meals.iter().map(|m| m.dishes.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Dish;

    #[test]
    fn test_create_daily_menu() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let porridge = Dish::new("燕麥粥", MealType::Breakfast);
        let menu = DailyMenu::new(date, 30)
            .with_meal(MealType::Breakfast, Meal::new(vec![porridge.snapshot()], 30));

        assert_eq!(menu.date, date);
        assert_eq!(menu.meal(MealType::Breakfast).dishes[0].name, "燕麥粥");
        assert_eq!(menu.meal(MealType::Breakfast).child_count, 30);
        assert!(menu.meal(MealType::Lunch).is_empty());
        assert_eq!(menu.dish_count(), 1);
    }

    #[test]
    fn test_merge_keeps_identity_and_logs() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let mut existing = DailyMenu::new(date, 20);
        existing.consumption_logs.push(ConsumptionLog {
            product_id: Uuid::new_v4(),
            quantity: Decimal::from(500),
            unit: Unit::Gram,
            meal_type: MealType::Breakfast,
            logged_at: Utc::now(),
        });

        let replacement = DailyMenu::new(date, 30);
        let merged = replacement.merge_into(&existing);

        assert_eq!(merged.id, existing.id);
        assert_eq!(merged.created_at, existing.created_at);
        assert_eq!(merged.consumption_logs.len(), 1);
        assert_eq!(merged.total_child_count, 30);
    }
}
