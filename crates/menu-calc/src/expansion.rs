//! 範本展開：週菜單範本 → 每日菜單

use chrono::{Datelike, NaiveDate};
use menu_core::calendar::weekday_at;
use menu_core::{
    ApplyFailurePolicy, DailyMenu, EngineConfig, Meal, MealType, MenuError, PlanningHorizon,
    TemplateId, WeeklyMenuTemplate,
};
use menu_store::{
    DailyMenuRepository, DishCatalog, ProductInventory, TemplateRepository, UpsertOutcome,
};

use crate::aggregation::ResolvedWeek;
use crate::calculator::RequirementCalculator;
use crate::{ApplyResult, FailedDay};

/// 範本展開引擎
pub struct ExpansionEngine<'a> {
    templates: &'a dyn TemplateRepository,
    menus: &'a dyn DailyMenuRepository,
    calculator: RequirementCalculator<'a>,
    config: &'a EngineConfig,
}

impl<'a> ExpansionEngine<'a> {
    pub fn new(
        templates: &'a dyn TemplateRepository,
        menus: &'a dyn DailyMenuRepository,
        catalog: &'a dyn DishCatalog,
        inventory: &'a dyn ProductInventory,
        config: &'a EngineConfig,
    ) -> Self {
        Self {
            templates,
            menus,
            calculator: RequirementCalculator::new(catalog, inventory, config),
            config,
        }
    }

    /// 套用範本到一週（7 天）
    pub fn apply_template_to_week(
        &self,
        template_id: TemplateId,
        start_date: NaiveDate,
        child_count: u32,
    ) -> menu_core::Result<ApplyResult> {
        self.apply(template_id, PlanningHorizon::week(start_date), child_count)
    }

    /// 套用範本到一個月（起始日期所在月份的天數）
    pub fn apply_template_to_month(
        &self,
        template_id: TemplateId,
        start_date: NaiveDate,
        child_count: u32,
    ) -> menu_core::Result<ApplyResult> {
        self.apply(template_id, PlanningHorizon::month(start_date)?, child_count)
    }

    /// 套用範本到任意區間
    ///
    /// 每一天依星期取出範本格子，建立菜色快照後依日期寫入。
    /// 寫入失敗時依 `ApplyFailurePolicy` 決定記錄後繼續或立即中止。
    ///
    /// 人數與天數在讀取範本之前檢查。短缺量在第一筆寫入之前、
    /// 以同一份菜色解析結果與當下的庫存計算；寫入每日菜單不會改變庫存，
    /// 所以結果與寫入完成後再計算相同。
    pub fn apply(
        &self,
        template_id: TemplateId,
        horizon: PlanningHorizon,
        child_count: u32,
    ) -> menu_core::Result<ApplyResult> {
        self.calculator.validate(&horizon, child_count)?;

        let template = self
            .templates
            .get_template(template_id)?
            .ok_or(MenuError::TemplateNotFound(template_id))?;

        tracing::info!(
            "開始套用範本 {}：起始 {}，{} 天，幼兒 {} 人",
            template.name,
            horizon.start_date,
            horizon.days,
            child_count
        );
        let start_time = std::time::Instant::now();

        // 菜色解析與需求計算在任何寫入之前完成
        let (week, mut warnings) = self.calculator.resolve(&template)?;
        let mut report = self.calculator.calculate_resolved(&week, horizon, child_count)?;
        warnings.append(&mut report.warnings);

        let mut created_menus = Vec::with_capacity(horizon.days as usize);
        let mut created_count = 0;
        let mut updated_count = 0;
        let mut failed_days = Vec::new();

        for (offset, date) in horizon.dates()?.into_iter().enumerate() {
            let menu =
                Self::build_menu(&week, horizon.start_date, offset as u32, date, child_count);

            match self.menus.upsert_menu_by_date(menu) {
                Ok((saved, outcome)) => {
                    tracing::debug!("{} 寫入完成 ({:?})", date, outcome);
                    match outcome {
                        UpsertOutcome::Created => created_count += 1,
                        UpsertOutcome::Updated => updated_count += 1,
                    }
                    created_menus.push(saved);
                }
                Err(e) => {
                    tracing::warn!("{} 的每日菜單寫入失敗: {}", date, e);
                    match self.config.failure_policy {
                        ApplyFailurePolicy::FailFast => {
                            return Err(MenuError::ApplyAborted {
                                date,
                                written: created_menus.len(),
                                reason: e.to_string(),
                            });
                        }
                        ApplyFailurePolicy::BestEffort => failed_days.push(FailedDay {
                            date,
                            reason: e.to_string(),
                        }),
                    }
                }
            }
        }

        let shortages = report.shortages();
        let message = Self::summarize(
            &template,
            created_count,
            updated_count,
            &failed_days,
            shortages.len(),
        );

        tracing::info!("範本套用完成，耗時 {:?}：{}", start_time.elapsed(), message);

        Ok(ApplyResult {
            created_menus,
            created_count,
            updated_count,
            failed_days,
            shortages,
            warnings,
            message,
        })
    }

    /// 依星期建立某一天的菜單，空格子對應空的一餐
    fn build_menu(
        week: &ResolvedWeek,
        start_date: NaiveDate,
        offset: u32,
        date: NaiveDate,
        child_count: u32,
    ) -> DailyMenu {
        let weekday = weekday_at(start_date, offset);
        debug_assert_eq!(weekday, date.weekday());

        MealType::ALL
            .iter()
            .fold(DailyMenu::new(date, child_count), |menu, &meal_type| {
                let dishes = week
                    .cell(weekday, meal_type)
                    .iter()
                    .map(|d| d.snapshot())
                    .collect();
                menu.with_meal(meal_type, Meal::new(dishes, child_count))
            })
    }

    fn summarize(
        template: &WeeklyMenuTemplate,
        created: usize,
        updated: usize,
        failed_days: &[FailedDay],
        shortage_count: usize,
    ) -> String {
        let mut message = format!(
            "範本「{}」已套用：新增 {} 天，更新 {} 天",
            template.name, created, updated
        );
        if !failed_days.is_empty() {
            message.push_str(&format!("，失敗 {} 天", failed_days.len()));
        }
        if shortage_count > 0 {
            message.push_str(&format!("；{} 項產品庫存不足", shortage_count));
        } else {
            message.push_str("；庫存充足");
        }
        message
    }
}
