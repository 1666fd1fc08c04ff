//! 週菜單範本模型（7 天 × 4 餐的菜色網格）

use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calendar::{weekday_index, WEEK};
use crate::{DishId, MealType, MenuError, Result, TemplateId};

/// 一天四餐的菜色清單
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayMeals {
    pub breakfast: Vec<DishId>,
    pub lunch: Vec<DishId>,
    pub snack: Vec<DishId>,
    pub dinner: Vec<DishId>,
}

impl DayMeals {
    /// 取得某一餐的菜色
    pub fn cell(&self, meal_type: MealType) -> &[DishId] {
        match meal_type {
            MealType::Breakfast => &self.breakfast,
            MealType::Lunch => &self.lunch,
            MealType::Snack => &self.snack,
            MealType::Dinner => &self.dinner,
        }
    }

    fn cell_mut(&mut self, meal_type: MealType) -> &mut Vec<DishId> {
        match meal_type {
            MealType::Breakfast => &mut self.breakfast,
            MealType::Lunch => &mut self.lunch,
            MealType::Snack => &mut self.snack,
            MealType::Dinner => &mut self.dinner,
        }
    }

    /// 依餐別順序走訪
    pub fn iter(&self) -> impl Iterator<Item = (MealType, &[DishId])> + '_ {
        MealType::ALL
            .into_iter()
            .map(move |meal| (meal, self.cell(meal)))
    }

    /// 菜色總數
    pub fn dish_count(&self) -> usize {
        self.iter().map(|(_, dishes)| dishes.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.dish_count() == 0
    }
}

/// 範本部分更新
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateUpdate {
    pub name: Option<String>,
    pub default_child_count: Option<u32>,
    pub is_active: Option<bool>,
}

impl TemplateUpdate {
    /// 建構器模式：設置名稱
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// 建構器模式：設置預設幼兒人數
    pub fn with_default_child_count(mut self, count: u32) -> Self {
        self.default_child_count = Some(count);
        self
    }

    /// 建構器模式：設置啟用狀態
    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }
}

/// 週菜單範本
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyMenuTemplate {
    /// 範本ID
    pub id: TemplateId,

    /// 名稱
    pub name: String,

    /// 預設幼兒人數
    pub default_child_count: u32,

    /// 是否啟用
    pub is_active: bool,

    /// 七天的菜色（索引 0 = 週一, ..., 6 = 週日）
    pub days: [DayMeals; 7],

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WeeklyMenuTemplate {
    /// 創建空白範本（28 格皆為空）
    pub fn new(name: impl Into<String>, default_child_count: u32) -> Result<Self> {
        let now = Utc::now();
        let template = Self {
            id: Uuid::new_v4(),
            name: name.into().trim().to_string(),
            default_child_count,
            is_active: true,
            days: Default::default(),
            created_at: now,
            updated_at: now,
        };
        template.validate()?;
        Ok(template)
    }

    /// 檢查資料是否有效
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(MenuError::Validation("範本名稱不可為空".to_string()));
        }
        if self.default_child_count == 0 {
            return Err(MenuError::Validation(
                "預設幼兒人數必須為正整數".to_string(),
            ));
        }
        Ok(())
    }

    /// 取得某一天的菜色
    pub fn day(&self, weekday: Weekday) -> &DayMeals {
        &self.days[weekday_index(weekday)]
    }

    /// 取得某一格的菜色
    pub fn cell(&self, weekday: Weekday, meal_type: MealType) -> &[DishId] {
        self.day(weekday).cell(meal_type)
    }

    /// 加入菜色（已存在則不重複加入），返回是否有變更
    pub fn add_dish(&mut self, weekday: Weekday, meal_type: MealType, dish_id: DishId) -> bool {
        let cell = self.days[weekday_index(weekday)].cell_mut(meal_type);
        if cell.contains(&dish_id) {
            return false;
        }
        cell.push(dish_id);
        self.touch();
        true
    }

    /// 移除菜色（不存在時不做任何事），返回是否有變更
    pub fn remove_dish(&mut self, weekday: Weekday, meal_type: MealType, dish_id: DishId) -> bool {
        let cell = self.days[weekday_index(weekday)].cell_mut(meal_type);
        let before = cell.len();
        cell.retain(|id| *id != dish_id);
        let changed = cell.len() != before;
        if changed {
            self.touch();
        }
        changed
    }

    /// 清空某一天
    pub fn clear_day(&mut self, weekday: Weekday) {
        self.days[weekday_index(weekday)] = DayMeals::default();
        self.touch();
    }

    /// 以來源日的四餐覆蓋目標日
    pub fn copy_day(&mut self, from: Weekday, to: Weekday) {
        if from == to {
            return;
        }
        self.days[weekday_index(to)] = self.days[weekday_index(from)].clone();
        self.touch();
    }

    /// 套用部分更新
    pub fn apply_update(&mut self, update: TemplateUpdate) -> Result<()> {
        let mut next = self.clone();
        if let Some(name) = update.name {
            next.name = name.trim().to_string();
        }
        if let Some(count) = update.default_child_count {
            next.default_child_count = count;
        }
        if let Some(is_active) = update.is_active {
            next.is_active = is_active;
        }
        next.validate()?;
        next.touch();
        *self = next;
        Ok(())
    }

    /// 範本引用的所有菜色ID（去重，依首次出現順序）
    pub fn dish_ids(&self) -> Vec<DishId> {
        let mut ids = Vec::new();
        for weekday in WEEK {
            for (_, dishes) in self.day(weekday).iter() {
                for id in dishes {
                    if !ids.contains(id) {
                        ids.push(*id);
                    }
                }
            }
        }
        ids
    }

    /// 是否所有格子皆為空
    pub fn is_empty(&self) -> bool {
        self.days.iter().all(DayMeals::is_empty)
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
