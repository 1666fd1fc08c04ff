//! 週菜單範本編輯

use chrono::Weekday;
use menu_core::{DishId, MealType, MenuError, TemplateId, TemplateUpdate, WeeklyMenuTemplate};
use menu_store::{DishCatalog, TemplateRepository};

/// 範本編輯器
///
/// 每個操作都是「讀取、修改、寫回」，範本ID由呼叫端逐次傳入。
pub struct TemplateEditor<'a> {
    templates: &'a dyn TemplateRepository,
    catalog: &'a dyn DishCatalog,
}

impl<'a> TemplateEditor<'a> {
    pub fn new(templates: &'a dyn TemplateRepository, catalog: &'a dyn DishCatalog) -> Self {
        Self { templates, catalog }
    }

    /// 建立空白範本
    pub fn create_template(
        &self,
        name: &str,
        default_child_count: u32,
    ) -> menu_core::Result<WeeklyMenuTemplate> {
        let template = WeeklyMenuTemplate::new(name, default_child_count)?;
        let saved = self.templates.insert_template(template)?;
        tracing::info!("建立範本 {} ({})", saved.name, saved.id);
        Ok(saved)
    }

    /// 刪除範本（不連動刪除已產生的每日菜單）
    pub fn delete_template(&self, template_id: TemplateId) -> menu_core::Result<()> {
        if !self.templates.delete_template(template_id)? {
            return Err(MenuError::TemplateNotFound(template_id));
        }
        tracing::info!("刪除範本 {}", template_id);
        Ok(())
    }

    pub fn get_template(&self, template_id: TemplateId) -> menu_core::Result<WeeklyMenuTemplate> {
        self.templates
            .get_template(template_id)?
            .ok_or(MenuError::TemplateNotFound(template_id))
    }

    pub fn list_templates(
        &self,
        is_active: Option<bool>,
    ) -> menu_core::Result<Vec<WeeklyMenuTemplate>> {
        self.templates.list_templates(is_active)
    }

    /// 更新名稱、預設人數或啟用狀態
    pub fn update_template(
        &self,
        template_id: TemplateId,
        update: TemplateUpdate,
    ) -> menu_core::Result<WeeklyMenuTemplate> {
        self.modify(template_id, |template| template.apply_update(update))
    }

    /// 將菜色加入某天某餐（已存在則不重複）
    pub fn add_dish(
        &self,
        template_id: TemplateId,
        weekday: Weekday,
        meal_type: MealType,
        dish_id: DishId,
    ) -> menu_core::Result<WeeklyMenuTemplate> {
        if self.catalog.get_dish(dish_id)?.is_none() {
            return Err(MenuError::DishNotFound(dish_id));
        }

        self.modify(template_id, |template| {
            if !template.add_dish(weekday, meal_type, dish_id) {
                tracing::debug!("菜色 {} 已在 {:?} {} 中", dish_id, weekday, meal_type);
            }
            Ok(())
        })
    }

    /// 從某天某餐移除菜色（不存在時不做任何事）
    pub fn remove_dish(
        &self,
        template_id: TemplateId,
        weekday: Weekday,
        meal_type: MealType,
        dish_id: DishId,
    ) -> menu_core::Result<WeeklyMenuTemplate> {
        let template = self.get_template(template_id)?;
        if !template.cell(weekday, meal_type).contains(&dish_id) {
            return Ok(template);
        }

        self.modify(template_id, |template| {
            template.remove_dish(weekday, meal_type, dish_id);
            Ok(())
        })
    }

    /// 清空某一天的四餐
    pub fn clear_day(
        &self,
        template_id: TemplateId,
        weekday: Weekday,
    ) -> menu_core::Result<WeeklyMenuTemplate> {
        self.modify(template_id, |template| {
            template.clear_day(weekday);
            Ok(())
        })
    }

    /// 以來源日覆蓋目標日
    pub fn copy_day(
        &self,
        template_id: TemplateId,
        from: Weekday,
        to: Weekday,
    ) -> menu_core::Result<WeeklyMenuTemplate> {
        self.modify(template_id, |template| {
            template.copy_day(from, to);
            Ok(())
        })
    }

    fn modify<F>(&self, template_id: TemplateId, edit: F) -> menu_core::Result<WeeklyMenuTemplate>
    where
        F: FnOnce(&mut WeeklyMenuTemplate) -> menu_core::Result<()>,
    {
        let mut template = self.get_template(template_id)?;
        edit(&mut template)?;
        self.templates.save_template(template)
    }
}
