//! 產品需求量主計算器

use menu_core::{
    Dish, DishId, EngineConfig, MenuError, PlanningHorizon, ProductId, Unit, WeeklyMenuTemplate,
};
use menu_store::{DishCatalog, ProductInventory};
use std::collections::{HashMap, HashSet};

use crate::aggregation::{DemandAggregator, ResolvedWeek};
use crate::sufficiency::SufficiencyCalculator;
use crate::{MenuWarning, RequirementReport};

/// 產品需求量計算器
pub struct RequirementCalculator<'a> {
    /// 菜色目錄
    catalog: &'a dyn DishCatalog,

    /// 產品庫存
    inventory: &'a dyn ProductInventory,

    config: &'a EngineConfig,
}

impl<'a> RequirementCalculator<'a> {
    /// 創建新的計算器
    pub fn new(
        catalog: &'a dyn DishCatalog,
        inventory: &'a dyn ProductInventory,
        config: &'a EngineConfig,
    ) -> Self {
        Self {
            catalog,
            inventory,
            config,
        }
    }

    /// 主計算入口：範本 × 天數 × 幼兒人數 → 產品需求與短缺
    pub fn calculate(
        &self,
        template: &WeeklyMenuTemplate,
        horizon: PlanningHorizon,
        child_count: u32,
    ) -> menu_core::Result<RequirementReport> {
        self.validate(&horizon, child_count)?;

        let (week, mut warnings) = self.resolve(template)?;
        let mut report = self.calculate_resolved(&week, horizon, child_count)?;

        warnings.append(&mut report.warnings);
        report.warnings = warnings;
        Ok(report)
    }

    /// 以已解析的菜色計算（展開引擎重用同一份解析結果）
    pub fn calculate_resolved(
        &self,
        week: &ResolvedWeek,
        horizon: PlanningHorizon,
        child_count: u32,
    ) -> menu_core::Result<RequirementReport> {
        self.validate(&horizon, child_count)?;

        tracing::info!(
            "開始計算產品需求：起始 {}，{} 天，幼兒 {} 人",
            horizon.start_date,
            horizon.days,
            child_count
        );
        let start_time = std::time::Instant::now();

        // Step 1: 收集菜色引用的產品並讀取庫存
        let product_ids = Self::referenced_products(week);
        tracing::debug!("引用產品數量: {}", product_ids.len());
        let products = self.inventory.get_products(&product_ids)?;
        let product_units: HashMap<ProductId, Unit> =
            products.iter().map(|(id, p)| (*id, p.unit)).collect();

        // Step 2: 彙總需求
        let parallel = horizon.days >= self.config.parallel_threshold_days;
        let aggregated = DemandAggregator::new(week, &product_units, self.config.unit_policy)
            .aggregate(&horizon, child_count, parallel)?;
        tracing::debug!("需求項目數量: {}", aggregated.totals.len());

        // Step 3: 與庫存比對
        let products = SufficiencyCalculator::reconcile(&aggregated.totals, &products);
        let insufficient = products.iter().filter(|p| !p.sufficient).count();

        tracing::info!(
            "產品需求計算完成，耗時 {:?}，{} 項中 {} 項不足",
            start_time.elapsed(),
            products.len(),
            insufficient
        );

        Ok(RequirementReport {
            products,
            warnings: aggregated.warnings,
            calculation_time_ms: Some(start_time.elapsed().as_millis()),
        })
    }

    /// 解析範本中的菜色
    ///
    /// 找不到的菜色返回 DishNotFound；停用的菜色照常計算但產生警告。
    pub fn resolve(
        &self,
        template: &WeeklyMenuTemplate,
    ) -> menu_core::Result<(ResolvedWeek, Vec<MenuWarning>)> {
        let ids = template.dish_ids();
        let dishes: HashMap<DishId, Dish> = self.catalog.get_dishes(&ids)?;

        if let Some(missing) = ids.iter().find(|id| !dishes.contains_key(id)) {
            return Err(MenuError::DishNotFound(*missing));
        }

        let mut warnings = Vec::new();
        for id in &ids {
            if let Some(dish) = dishes.get(id).filter(|d| !d.is_active) {
                tracing::warn!("範本 {} 引用了停用的菜色 {}", template.name, dish.name);
                warnings.push(MenuWarning::info(
                    dish.id.to_string(),
                    format!("菜色 {} 已停用", dish.name),
                ));
            }
        }

        let week = ResolvedWeek::resolve(template, &dishes)?;
        Ok((week, warnings))
    }

    /// 檢查幼兒人數與天數，在任何儲存讀取之前呼叫
    pub fn validate(&self, horizon: &PlanningHorizon, child_count: u32) -> menu_core::Result<()> {
        if child_count == 0 {
            return Err(MenuError::Validation("幼兒人數必須為正整數".to_string()));
        }
        self.config.check_horizon(horizon.days)
    }

    /// 菜色引用的所有產品ID（去重，依首次出現順序）
    fn referenced_products(week: &ResolvedWeek) -> Vec<ProductId> {
        let mut seen = HashSet::new();
        week.dishes()
            .flat_map(|dish| dish.ingredients.iter().map(|i| i.product_id))
            .filter(|id| seen.insert(*id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Weekday};
    use menu_core::{MealType, Product, UnitPolicy};
    use menu_store::InMemoryStore;
    use rust_decimal::Decimal;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
    }

    /// 燕麥粥（燕麥片 50 g/人）排在週一早餐，庫存 1000 g
    fn standard_week(store: &InMemoryStore) -> (WeeklyMenuTemplate, ProductId) {
        let oatmeal = Product::new("燕麥片", Unit::Gram, Decimal::from(1000));
        let oatmeal_id = oatmeal.id;
        store.put_product(oatmeal).unwrap();

        let porridge = Dish::new("燕麥粥", MealType::Breakfast).with_ingredient(
            oatmeal_id,
            Decimal::from(50),
            Unit::Gram,
        );
        let mut template = WeeklyMenuTemplate::new("標準週", 30).unwrap();
        template.add_dish(Weekday::Mon, MealType::Breakfast, porridge.id);
        store.put_dish(porridge).unwrap();

        (template, oatmeal_id)
    }

    #[test]
    fn test_standard_week_shortage() {
        let store = InMemoryStore::new();
        let (template, oatmeal_id) = standard_week(&store);
        let config = EngineConfig::default();
        let calculator = RequirementCalculator::new(&store, &store, &config);

        let report = calculator
            .calculate(&template, PlanningHorizon::week(monday()), 30)
            .unwrap();

        assert_eq!(report.products.len(), 1);
        let oatmeal = &report.products[0];
        assert_eq!(oatmeal.product_id, oatmeal_id);
        assert_eq!(oatmeal.required, Decimal::from(1500));
        assert_eq!(oatmeal.shortage, Decimal::from(500));
        assert!(!oatmeal.sufficient);
        assert!(report.calculation_time_ms.is_some());
    }

    #[test]
    fn test_month_counts_every_monday() {
        let store = InMemoryStore::new();
        let (template, _) = standard_week(&store);
        let config = EngineConfig::default();
        let calculator = RequirementCalculator::new(&store, &store, &config);

        // 2024-07-01 起 31 天：7/1、7/8、7/15、7/22、7/29 共 5 個週一
        let start = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        let report = calculator
            .calculate(&template, PlanningHorizon::month(start).unwrap(), 10)
            .unwrap();

        assert_eq!(report.products[0].required, Decimal::from(2500));
        assert!(!report.products[0].sufficient);
    }

    #[test]
    fn test_input_validation() {
        let store = InMemoryStore::new();
        let (template, _) = standard_week(&store);
        let config = EngineConfig::default().with_max_horizon_days(31);
        let calculator = RequirementCalculator::new(&store, &store, &config);

        assert!(matches!(
            calculator.calculate(&template, PlanningHorizon::week(monday()), 0),
            Err(MenuError::Validation(_))
        ));

        let too_long = PlanningHorizon::new(monday(), 60).unwrap();
        assert!(matches!(
            calculator.calculate(&template, too_long, 10),
            Err(MenuError::Validation(_))
        ));
    }

    #[test]
    fn test_missing_dish_fails() {
        let store = InMemoryStore::new();
        let (mut template, _) = standard_week(&store);
        template.add_dish(Weekday::Tue, MealType::Lunch, uuid::Uuid::new_v4());
        let config = EngineConfig::default();
        let calculator = RequirementCalculator::new(&store, &store, &config);

        assert!(matches!(
            calculator.calculate(&template, PlanningHorizon::week(monday()), 10),
            Err(MenuError::DishNotFound(_))
        ));
    }

    #[test]
    fn test_inactive_dish_warns_but_counts() {
        let store = InMemoryStore::new();
        let (template, oatmeal_id) = standard_week(&store);
        let dish_id = template.cell(Weekday::Mon, MealType::Breakfast)[0];
        let dish = store.get_dish(dish_id).unwrap().unwrap().with_active(false);
        store.put_dish(dish).unwrap();
        let config = EngineConfig::default();
        let calculator = RequirementCalculator::new(&store, &store, &config);

        let report = calculator
            .calculate(&template, PlanningHorizon::week(monday()), 10)
            .unwrap();

        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.products[0].product_id, oatmeal_id);
        assert_eq!(report.products[0].required, Decimal::from(500));
    }

    #[test]
    fn test_strict_unit_policy() {
        let store = InMemoryStore::new();
        let milk = Product::new("牛奶", Unit::Liter, Decimal::from(10));
        let milk_id = milk.id;
        store.put_product(milk).unwrap();
        let cocoa = Dish::new("可可", MealType::Snack).with_ingredient(
            milk_id,
            Decimal::from(200),
            Unit::Gram,
        );
        let mut template = WeeklyMenuTemplate::new("點心週", 10).unwrap();
        template.add_dish(Weekday::Wed, MealType::Snack, cocoa.id);
        store.put_dish(cocoa).unwrap();

        let config = EngineConfig::default().with_unit_policy(UnitPolicy::Strict);
        let calculator = RequirementCalculator::new(&store, &store, &config);

        assert!(matches!(
            calculator.calculate(&template, PlanningHorizon::week(monday()), 10),
            Err(MenuError::UnitMismatch { .. })
        ));
    }
}
