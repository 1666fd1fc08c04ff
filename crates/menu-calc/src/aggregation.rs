//! 需求彙總：依星期循環展開範本，累加每位幼兒的食材用量

use chrono::Weekday;
use menu_core::calendar::{weekday_index, WEEK};
use menu_core::{
    Dish, DishId, MealType, MenuError, PlanningHorizon, ProductId, Unit, UnitPolicy,
    WeeklyMenuTemplate,
};
use rayon::prelude::*;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

use crate::MenuWarning;

/// 需求鍵：產品 + 單位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DemandKey {
    pub product_id: ProductId,
    pub unit: Unit,
}

/// 需求量對照表
pub type DemandMap = BTreeMap<DemandKey, Decimal>;

/// 已解析的一週菜色（範本中的菜色ID已替換為菜色資料）
#[derive(Debug, Clone, Default)]
pub struct ResolvedWeek {
    /// [星期][餐別] -> 菜色
    cells: [[Vec<Dish>; 4]; 7],
}

impl ResolvedWeek {
    /// 以菜色目錄資料解析範本（找不到的菜色返回 DishNotFound）
    pub fn resolve(
        template: &WeeklyMenuTemplate,
        dishes: &HashMap<DishId, Dish>,
    ) -> menu_core::Result<Self> {
        let mut week = Self::default();

        for weekday in WEEK {
            for (meal_type, dish_ids) in template.day(weekday).iter() {
                let cell = &mut week.cells[weekday_index(weekday)][meal_type.index()];
                for id in dish_ids {
                    let dish = dishes.get(id).ok_or(MenuError::DishNotFound(*id))?;
                    cell.push(dish.clone());
                }
            }
        }

        Ok(week)
    }

    /// 取得某一格的菜色
    pub fn cell(&self, weekday: Weekday, meal_type: MealType) -> &[Dish] {
        &self.cells[weekday_index(weekday)][meal_type.index()]
    }

    /// 所有菜色（可能重複）
    pub fn dishes(&self) -> impl Iterator<Item = &Dish> + '_ {
        self.cells.iter().flatten().flatten()
    }
}

/// 彙總結果
#[derive(Debug, Clone, Default)]
pub struct AggregatedDemand {
    /// 區間內總需求量
    pub totals: DemandMap,

    /// 彙總過程中的警告
    pub warnings: Vec<MenuWarning>,
}

/// 需求彙總器
pub struct DemandAggregator<'a> {
    week: &'a ResolvedWeek,

    /// 已知產品的庫存單位
    product_units: &'a HashMap<ProductId, Unit>,

    unit_policy: UnitPolicy,
}

impl<'a> DemandAggregator<'a> {
    /// 創建新的彙總器
    pub fn new(
        week: &'a ResolvedWeek,
        product_units: &'a HashMap<ProductId, Unit>,
        unit_policy: UnitPolicy,
    ) -> Self {
        Self {
            week,
            product_units,
            unit_policy,
        }
    }

    /// 彙總展開區間內的總需求量
    ///
    /// 每天依 (起始星期 + 偏移) mod 7 取出當天的菜色，
    /// 累加 用量 / 份數，最後乘以幼兒人數。
    /// `parallel` 時七個星期的需求表在 rayon 執行緒池上各自建立。
    pub fn aggregate(
        &self,
        horizon: &PlanningHorizon,
        child_count: u32,
        parallel: bool,
    ) -> menu_core::Result<AggregatedDemand> {
        let (per_weekday, warnings) = self.per_weekday_demand(parallel)?;
        let occurrences = horizon.weekday_occurrences();

        let mut per_child = DemandMap::new();
        for weekday in WEEK {
            let times = occurrences[weekday_index(weekday)];
            if times == 0 {
                continue;
            }
            for (key, qty) in &per_weekday[weekday_index(weekday)] {
                *per_child.entry(*key).or_insert(Decimal::ZERO) += *qty * Decimal::from(times);
            }
        }

        let children = Decimal::from(child_count);
        let totals = per_child
            .into_iter()
            .map(|(key, qty)| (key, qty * children))
            .filter(|(_, qty)| *qty > Decimal::ZERO)
            .collect();

        Ok(AggregatedDemand { totals, warnings })
    }

    /// 每個星期一天份、每位幼兒的需求量（索引 0 = 週一）
    pub fn per_weekday_demand(
        &self,
        parallel: bool,
    ) -> menu_core::Result<([DemandMap; 7], Vec<MenuWarning>)> {
        let days: Vec<(DemandMap, Vec<MenuWarning>)> = if parallel {
            tracing::debug!("並行建立各星期需求表");
            WEEK.par_iter()
                .map(|&weekday| self.day_demand(weekday))
                .collect::<menu_core::Result<_>>()?
        } else {
            WEEK.iter()
                .map(|&weekday| self.day_demand(weekday))
                .collect::<menu_core::Result<_>>()?
        };

        let mut per_weekday: [DemandMap; 7] = Default::default();
        let mut warnings: Vec<MenuWarning> = Vec::new();
        for (index, (demand, day_warnings)) in days.into_iter().enumerate() {
            per_weekday[index] = demand;
            for warning in day_warnings {
                if !warnings.contains(&warning) {
                    warnings.push(warning);
                }
            }
        }

        Ok((per_weekday, warnings))
    }

    /// 某個星期一天份、每位幼兒的需求量
    fn day_demand(&self, weekday: Weekday) -> menu_core::Result<(DemandMap, Vec<MenuWarning>)> {
        let mut day = DemandMap::new();
        let mut warnings = Vec::new();

        for meal_type in MealType::ALL {
            for dish in self.week.cell(weekday, meal_type) {
                for ingredient in &dish.ingredients {
                    let (key, quantity) = self.normalize(dish, ingredient, &mut warnings)?;
                    let per_child = quantity / Decimal::from(dish.servings_count.max(1));
                    *day.entry(key).or_insert(Decimal::ZERO) += per_child;
                }
            }
        }

        Ok((day, warnings))
    }

    /// 將食材用量換算為產品的庫存單位
    fn normalize(
        &self,
        dish: &Dish,
        ingredient: &menu_core::Ingredient,
        warnings: &mut Vec<MenuWarning>,
    ) -> menu_core::Result<(DemandKey, Decimal)> {
        let raw_key = DemandKey {
            product_id: ingredient.product_id,
            unit: ingredient.unit,
        };

        let Some(&product_unit) = self.product_units.get(&ingredient.product_id) else {
            return Ok((raw_key, ingredient.quantity));
        };

        match ingredient.unit.convert(ingredient.quantity, product_unit) {
            Some(converted) => Ok((
                DemandKey {
                    product_id: ingredient.product_id,
                    unit: product_unit,
                },
                converted,
            )),
            None => match self.unit_policy {
                UnitPolicy::Strict => Err(MenuError::UnitMismatch {
                    product_id: ingredient.product_id,
                    expected: product_unit,
                    found: ingredient.unit,
                }),
                UnitPolicy::Lenient => {
                    let message = format!(
                        "菜色 {} 的食材單位 {} 與產品單位 {} 不一致，以原始數量比較",
                        dish.name, ingredient.unit, product_unit
                    );
                    tracing::warn!("{}", message);
                    let subject = ingredient.product_id.to_string();
                    if !warnings
                        .iter()
                        .any(|w| w.subject == subject && w.message == message)
                    {
                        warnings.push(MenuWarning::warning(subject, message));
                    }
                    Ok((raw_key, ingredient.quantity))
                }
            },
        }
    }
}
