//! 菜色模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::{DishId, MenuError, ProductId, Result, Unit};

/// 餐別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Snack,
    Dinner,
}

impl MealType {
    /// 所有餐別（依一天內的順序）
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Snack,
        MealType::Dinner,
    ];

    /// 餐別在陣列中的索引
    pub fn index(&self) -> usize {
        match self {
            MealType::Breakfast => 0,
            MealType::Lunch => 1,
            MealType::Snack => 2,
            MealType::Dinner => 3,
        }
    }

    /// 鍵名
    pub fn key(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Snack => "snack",
            MealType::Dinner => "dinner",
        }
    }

    /// 顯示名稱
    pub fn display_name(&self) -> &'static str {
        match self {
            MealType::Breakfast => "早餐",
            MealType::Lunch => "午餐",
            MealType::Snack => "點心",
            MealType::Dinner => "晚餐",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for MealType {
    type Err = MenuError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase();
        MealType::ALL
            .into_iter()
            .find(|meal| meal.key() == normalized)
            .ok_or_else(|| MenuError::Validation(format!("無法識別的餐別: {}", s)))
    }
}

/// 食材（每位幼兒一份的用量）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    /// 產品ID
    pub product_id: ProductId,

    /// 用量
    pub quantity: Decimal,

    /// 單位
    pub unit: Unit,
}

impl Ingredient {
    /// 創建新的食材
    pub fn new(product_id: ProductId, quantity: Decimal, unit: Unit) -> Self {
        Self {
            product_id,
            quantity,
            unit,
        }
    }
}

/// 菜色
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dish {
    /// 菜色ID
    pub id: DishId,

    /// 名稱
    pub name: String,

    /// 餐別
    pub category: MealType,

    /// 食材清單（有序）
    pub ingredients: Vec<Ingredient>,

    /// 一份配方可供應的幼兒份數（正規化除數）
    pub servings_count: u32,

    /// 是否啟用
    pub is_active: bool,
}

impl Dish {
    /// 創建新的菜色
    pub fn new(name: impl Into<String>, category: MealType) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            category,
            ingredients: Vec::new(),
            servings_count: 1,
            is_active: true,
        }
    }

    /// 建構器模式：設置菜色ID
    pub fn with_id(mut self, id: DishId) -> Self {
        self.id = id;
        self
    }

    /// 建構器模式：添加食材
    pub fn with_ingredient(mut self, product_id: ProductId, quantity: Decimal, unit: Unit) -> Self {
        self.ingredients
            .push(Ingredient::new(product_id, quantity, unit));
        self
    }

    /// 建構器模式：設置份數
    pub fn with_servings_count(mut self, servings_count: u32) -> Self {
        self.servings_count = servings_count;
        self
    }

    /// 建構器模式：設置啟用狀態
    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    /// 檢查資料是否有效
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(MenuError::Validation("菜色名稱不可為空".to_string()));
        }
        if self.servings_count == 0 {
            return Err(MenuError::Validation(format!(
                "菜色 {} 的份數必須大於 0",
                self.name
            )));
        }
        if let Some(bad) = self
            .ingredients
            .iter()
            .find(|i| i.quantity <= Decimal::ZERO)
        {
            return Err(MenuError::Validation(format!(
                "菜色 {} 的食材 {} 用量必須大於 0",
                self.name, bad.product_id
            )));
        }
        Ok(())
    }

    /// 每位幼兒的食材用量（用量 / 份數）
    pub fn per_child_quantity(&self, ingredient: &Ingredient) -> Decimal {
        ingredient.quantity / Decimal::from(self.servings_count.max(1))
    }

    /// 建立快照
    pub fn snapshot(&self) -> DishSnapshot {
        DishSnapshot::from(self)
    }
}

/// 菜色快照（展開時複製，不受之後的菜色修改影響）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DishSnapshot {
    /// 菜色ID
    pub dish_id: DishId,

    /// 名稱
    pub name: String,

    /// 餐別
    pub category: MealType,

    /// 展開當下的食材清單
    pub ingredients: Vec<Ingredient>,

    /// 展開當下的份數
    pub servings_count: u32,
}

impl From<&Dish> for DishSnapshot {
    fn from(dish: &Dish) -> Self {
        Self {
            dish_id: dish.id,
            name: dish.name.clone(),
            category: dish.category,
            ingredients: dish.ingredients.clone(),
            servings_count: dish.servings_count,
        }
    }
}
