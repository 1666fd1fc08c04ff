//! # Kinder Menu
//!
//! 幼兒園週菜單範本展開與產品需求計算
//!
//! `MenuPlanner` 將範本編輯、範本套用、需求計算與每日菜單維護
//! 整合成一組直接呼叫的操作，儲存層透過 `menu-store` 的介面注入。

use chrono::{Local, NaiveDate, Weekday};
use std::sync::Arc;

pub use menu_calc::{
    ApplyResult, FailedDay, MenuWarning, RequirementReport, TemplateEditor, WarningSeverity,
};
pub use menu_core::{
    ApplyFailurePolicy, ConsumptionLog, DailyMenu, Dish, DishId, DishSnapshot, EngineConfig,
    Ingredient, Meal, MealType, MenuError, MenuId, PlanningHorizon, Product, ProductId,
    ProductStatus, RequiredProduct, Result, TemplateId, TemplateUpdate, Unit, UnitPolicy,
    WeeklyMenuTemplate,
};
pub use menu_store::{
    DailyMenuRepository, DishCatalog, InMemoryStore, ProductInventory, TemplateRepository,
};

use menu_calc::{ExpansionEngine, RequirementCalculator};

/// 菜單規劃入口
pub struct MenuPlanner {
    catalog: Arc<dyn DishCatalog>,
    inventory: Arc<dyn ProductInventory>,
    templates: Arc<dyn TemplateRepository>,
    menus: Arc<dyn DailyMenuRepository>,
    config: EngineConfig,
}

impl MenuPlanner {
    pub fn new(
        catalog: Arc<dyn DishCatalog>,
        inventory: Arc<dyn ProductInventory>,
        templates: Arc<dyn TemplateRepository>,
        menus: Arc<dyn DailyMenuRepository>,
        config: EngineConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            catalog,
            inventory,
            templates,
            menus,
            config,
        })
    }

    /// 四種儲存都由同一個記憶體儲存提供
    pub fn in_memory(store: Arc<InMemoryStore>, config: EngineConfig) -> Result<Self> {
        let catalog: Arc<dyn DishCatalog> = store.clone();
        let inventory: Arc<dyn ProductInventory> = store.clone();
        let templates: Arc<dyn TemplateRepository> = store.clone();
        let menus: Arc<dyn DailyMenuRepository> = store;
        Self::new(catalog, inventory, templates, menus, config)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ===== 菜色與產品 =====

    pub fn list_active_dishes(&self, category: Option<MealType>) -> Result<Vec<Dish>> {
        self.catalog.list_active_dishes(category)
    }

    pub fn get_dish(&self, dish_id: DishId) -> Result<Dish> {
        self.catalog
            .get_dish(dish_id)?
            .ok_or(MenuError::DishNotFound(dish_id))
    }

    pub fn list_products(&self, status: Option<ProductStatus>) -> Result<Vec<Product>> {
        self.inventory.list_products(status)
    }

    // ===== 範本 =====

    pub fn create_weekly_menu_template(
        &self,
        name: &str,
        default_child_count: u32,
    ) -> Result<WeeklyMenuTemplate> {
        self.editor().create_template(name, default_child_count)
    }

    pub fn get_template(&self, template_id: TemplateId) -> Result<WeeklyMenuTemplate> {
        self.editor().get_template(template_id)
    }

    pub fn list_templates(&self, is_active: Option<bool>) -> Result<Vec<WeeklyMenuTemplate>> {
        self.editor().list_templates(is_active)
    }

    pub fn update_template(
        &self,
        template_id: TemplateId,
        update: TemplateUpdate,
    ) -> Result<WeeklyMenuTemplate> {
        self.editor().update_template(template_id, update)
    }

    pub fn delete_weekly_menu_template(&self, template_id: TemplateId) -> Result<()> {
        self.editor().delete_template(template_id)
    }

    pub fn add_dish_to_template_day(
        &self,
        template_id: TemplateId,
        weekday: Weekday,
        meal_type: MealType,
        dish_id: DishId,
    ) -> Result<WeeklyMenuTemplate> {
        self.editor()
            .add_dish(template_id, weekday, meal_type, dish_id)
    }

    pub fn remove_dish_from_template_day(
        &self,
        template_id: TemplateId,
        weekday: Weekday,
        meal_type: MealType,
        dish_id: DishId,
    ) -> Result<WeeklyMenuTemplate> {
        self.editor()
            .remove_dish(template_id, weekday, meal_type, dish_id)
    }

    pub fn clear_template_day(
        &self,
        template_id: TemplateId,
        weekday: Weekday,
    ) -> Result<WeeklyMenuTemplate> {
        self.editor().clear_day(template_id, weekday)
    }

    pub fn copy_template_day(
        &self,
        template_id: TemplateId,
        from: Weekday,
        to: Weekday,
    ) -> Result<WeeklyMenuTemplate> {
        self.editor().copy_day(template_id, from, to)
    }

    // ===== 套用與計算 =====

    pub fn apply_template_to_week(
        &self,
        template_id: TemplateId,
        start_date: NaiveDate,
        child_count: u32,
    ) -> Result<ApplyResult> {
        self.expansion()
            .apply_template_to_week(template_id, start_date, child_count)
    }

    pub fn apply_template_to_month(
        &self,
        template_id: TemplateId,
        start_date: NaiveDate,
        child_count: u32,
    ) -> Result<ApplyResult> {
        self.expansion()
            .apply_template_to_month(template_id, start_date, child_count)
    }

    /// 計算產品需求量
    ///
    /// 未指定起始日期時以本地時間的今天起算。
    pub fn calculate_required_products(
        &self,
        template_id: TemplateId,
        days: u32,
        child_count: u32,
        start_date: Option<NaiveDate>,
    ) -> Result<Vec<RequiredProduct>> {
        self.calculate_requirement_report(template_id, days, child_count, start_date)
            .map(|report| report.products)
    }

    /// 同上，另外附帶警告與耗時
    pub fn calculate_requirement_report(
        &self,
        template_id: TemplateId,
        days: u32,
        child_count: u32,
        start_date: Option<NaiveDate>,
    ) -> Result<RequirementReport> {
        let start_date = start_date.unwrap_or_else(|| Local::now().date_naive());
        let horizon = PlanningHorizon::new(start_date, days)?;
        let calculator =
            RequirementCalculator::new(self.catalog.as_ref(), self.inventory.as_ref(), &self.config);
        calculator.validate(&horizon, child_count)?;

        let template = self.get_template(template_id)?;
        calculator.calculate(&template, horizon, child_count)
    }

    // ===== 每日菜單 =====

    /// 建立空白的每日菜單（該日已有菜單時返回 DuplicateDate）
    pub fn create_daily_menu(&self, date: NaiveDate, total_child_count: u32) -> Result<DailyMenu> {
        check_child_count(total_child_count)?;
        self.menus
            .insert_menu(DailyMenu::new(date, total_child_count))
    }

    pub fn get_daily_menu(&self, date: NaiveDate) -> Result<DailyMenu> {
        self.menus
            .get_menu_by_date(date)?
            .ok_or(MenuError::DailyMenuNotFound(date))
    }

    pub fn list_daily_menus(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<DailyMenu>> {
        if from > to {
            return Err(MenuError::Validation(format!(
                "起始日期 {} 晚於結束日期 {}",
                from, to
            )));
        }
        self.menus.list_menus(from, to)
    }

    /// 依ID覆蓋既有菜單
    pub fn update_daily_menu(&self, menu: DailyMenu) -> Result<DailyMenu> {
        check_child_count(menu.total_child_count)?;
        self.menus.save_menu(menu)
    }

    pub fn delete_daily_menu(&self, date: NaiveDate) -> Result<()> {
        if !self.menus.delete_menu_by_date(date)? {
            return Err(MenuError::DailyMenuNotFound(date));
        }
        tracing::info!("刪除 {} 的每日菜單", date);
        Ok(())
    }

    fn editor(&self) -> TemplateEditor<'_> {
        TemplateEditor::new(self.templates.as_ref(), self.catalog.as_ref())
    }

    fn expansion(&self) -> ExpansionEngine<'_> {
        ExpansionEngine::new(
            self.templates.as_ref(),
            self.menus.as_ref(),
            self.catalog.as_ref(),
            self.inventory.as_ref(),
            &self.config,
        )
    }
}

fn check_child_count(total_child_count: u32) -> Result<()> {
    if total_child_count == 0 {
        return Err(MenuError::Validation("幼兒人數必須為正整數".to_string()));
    }
    Ok(())
}

/// 餐別顯示名稱
pub fn meal_type_display_name(meal_type: MealType) -> &'static str {
    meal_type.display_name()
}

/// 需求量單行摘要，例如「燕麥片：需求 1500 g，庫存 1000 g，短缺 500 g」
pub fn format_requirement(product: &RequiredProduct) -> String {
    let symbol = product.unit.symbol();
    let mut line = format!(
        "{}：需求 {} {}，庫存 {} {}",
        product.name, product.required, symbol, product.available, symbol
    );
    if !product.sufficient {
        line.push_str(&format!("，短缺 {} {}", product.shortage, symbol));
    }
    line
}
