//! 記憶體儲存（參考實作與測試用）

use chrono::NaiveDate;
use menu_core::{
    DailyMenu, Dish, DishId, MealType, MenuError, MenuId, Product, ProductId, ProductStatus,
    Result, TemplateId, WeeklyMenuTemplate,
};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{DailyMenuRepository, DishCatalog, ProductInventory, TemplateRepository, UpsertOutcome};

/// 記憶體儲存
///
/// 每日菜單以日期為鍵，在同一把寫鎖內完成查找與寫入，保證每個日期最多一份菜單。
#[derive(Debug, Default)]
pub struct InMemoryStore {
    dishes: RwLock<HashMap<DishId, Dish>>,
    products: RwLock<HashMap<ProductId, Product>>,
    templates: RwLock<HashMap<TemplateId, WeeklyMenuTemplate>>,
    menus: RwLock<BTreeMap<NaiveDate, DailyMenu>>,
    /// 模擬寫入失敗的日期
    failing_dates: RwLock<HashSet<NaiveDate>>,
}

fn read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>> {
    lock.read()
        .map_err(|_| MenuError::Storage("讀取鎖已中毒".to_string()))
}

fn write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>> {
    lock.write()
        .map_err(|_| MenuError::Storage("寫入鎖已中毒".to_string()))
}

impl InMemoryStore {
    /// 創建空的儲存
    pub fn new() -> Self {
        Self::default()
    }

    /// 新增或覆蓋菜色
    pub fn put_dish(&self, dish: Dish) -> Result<()> {
        dish.validate()?;
        write(&self.dishes)?.insert(dish.id, dish);
        Ok(())
    }

    /// 移除菜色
    pub fn remove_dish(&self, id: DishId) -> Result<bool> {
        Ok(write(&self.dishes)?.remove(&id).is_some())
    }

    /// 新增或覆蓋產品
    pub fn put_product(&self, product: Product) -> Result<()> {
        product.validate()?;
        write(&self.products)?.insert(product.id, product);
        Ok(())
    }

    /// 調整產品庫存（模擬外部供餐或進貨）
    pub fn set_stock(&self, id: ProductId, stock_quantity: Decimal) -> Result<()> {
        let mut products = write(&self.products)?;
        let product = products
            .get_mut(&id)
            .ok_or(MenuError::ProductNotFound(id))?;
        product.stock_quantity = stock_quantity;
        Ok(())
    }

    /// 使某日的每日菜單寫入失敗
    pub fn fail_writes_on(&self, date: NaiveDate) -> Result<()> {
        write(&self.failing_dates)?.insert(date);
        Ok(())
    }

    /// 清除所有模擬失敗
    pub fn clear_write_failures(&self) -> Result<()> {
        write(&self.failing_dates)?.clear();
        Ok(())
    }

    /// 每日菜單數量
    pub fn menu_count(&self) -> Result<usize> {
        Ok(read(&self.menus)?.len())
    }

    fn check_writable(&self, date: NaiveDate) -> Result<()> {
        if read(&self.failing_dates)?.contains(&date) {
            tracing::debug!("模擬寫入失敗: {}", date);
            return Err(MenuError::Storage(format!("無法寫入 {} 的每日菜單", date)));
        }
        Ok(())
    }
}

impl DishCatalog for InMemoryStore {
    fn list_active_dishes(&self, category: Option<MealType>) -> Result<Vec<Dish>> {
        let mut dishes: Vec<Dish> = read(&self.dishes)?
            .values()
            .filter(|d| d.is_active)
            .filter(|d| category.map_or(true, |c| d.category == c))
            .cloned()
            .collect();
        dishes.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(dishes)
    }

    fn get_dish(&self, id: DishId) -> Result<Option<Dish>> {
        Ok(read(&self.dishes)?.get(&id).cloned())
    }
}

impl ProductInventory for InMemoryStore {
    fn list_products(&self, status: Option<ProductStatus>) -> Result<Vec<Product>> {
        let mut products: Vec<Product> = read(&self.products)?
            .values()
            .filter(|p| status.map_or(true, |s| p.status() == s))
            .cloned()
            .collect();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }

    fn get_product(&self, id: ProductId) -> Result<Option<Product>> {
        Ok(read(&self.products)?.get(&id).cloned())
    }
}

impl TemplateRepository for InMemoryStore {
    fn get_template(&self, id: TemplateId) -> Result<Option<WeeklyMenuTemplate>> {
        Ok(read(&self.templates)?.get(&id).cloned())
    }

    fn list_templates(&self, is_active: Option<bool>) -> Result<Vec<WeeklyMenuTemplate>> {
        let mut templates: Vec<WeeklyMenuTemplate> = read(&self.templates)?
            .values()
            .filter(|t| is_active.map_or(true, |active| t.is_active == active))
            .cloned()
            .collect();
        templates.sort_by(|a, b| a.name.cmp(&b.name).then(a.created_at.cmp(&b.created_at)));
        Ok(templates)
    }

    fn insert_template(&self, template: WeeklyMenuTemplate) -> Result<WeeklyMenuTemplate> {
        let mut templates = write(&self.templates)?;
        if templates.contains_key(&template.id) {
            return Err(MenuError::Storage(format!("範本 {} 已存在", template.id)));
        }
        templates.insert(template.id, template.clone());
        Ok(template)
    }

    fn save_template(&self, template: WeeklyMenuTemplate) -> Result<WeeklyMenuTemplate> {
        let mut templates = write(&self.templates)?;
        let slot = templates
            .get_mut(&template.id)
            .ok_or(MenuError::TemplateNotFound(template.id))?;
        *slot = template.clone();
        Ok(template)
    }

    fn delete_template(&self, id: TemplateId) -> Result<bool> {
        Ok(write(&self.templates)?.remove(&id).is_some())
    }
}

impl DailyMenuRepository for InMemoryStore {
    fn get_menu_by_date(&self, date: NaiveDate) -> Result<Option<DailyMenu>> {
        Ok(read(&self.menus)?.get(&date).cloned())
    }

    fn get_menu(&self, id: MenuId) -> Result<Option<DailyMenu>> {
        Ok(read(&self.menus)?.values().find(|m| m.id == id).cloned())
    }

    fn list_menus(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<DailyMenu>> {
        if from > to {
            return Ok(Vec::new());
        }
        Ok(read(&self.menus)?
            .range(from..=to)
            .map(|(_, menu)| menu.clone())
            .collect())
    }

    fn insert_menu(&self, menu: DailyMenu) -> Result<DailyMenu> {
        self.check_writable(menu.date)?;
        let mut menus = write(&self.menus)?;
        if menus.contains_key(&menu.date) {
            return Err(MenuError::DuplicateDate(menu.date));
        }
        menus.insert(menu.date, menu.clone());
        Ok(menu)
    }

    fn upsert_menu_by_date(&self, menu: DailyMenu) -> Result<(DailyMenu, UpsertOutcome)> {
        self.check_writable(menu.date)?;
        let mut menus = write(&self.menus)?;
        let (stored, outcome) = match menus.get(&menu.date) {
            Some(existing) => (menu.merge_into(existing), UpsertOutcome::Updated),
            None => (menu, UpsertOutcome::Created),
        };
        menus.insert(stored.date, stored.clone());
        Ok((stored, outcome))
    }

    fn save_menu(&self, menu: DailyMenu) -> Result<DailyMenu> {
        self.check_writable(menu.date)?;
        let mut menus = write(&self.menus)?;

        let old_date = menus
            .values()
            .find(|m| m.id == menu.id)
            .map(|m| m.date)
            .ok_or(MenuError::DailyMenuNotFound(menu.date))?;

        if old_date != menu.date && menus.contains_key(&menu.date) {
            return Err(MenuError::DuplicateDate(menu.date));
        }

        menus.remove(&old_date);
        menus.insert(menu.date, menu.clone());
        Ok(menu)
    }

    fn delete_menu_by_date(&self, date: NaiveDate) -> Result<bool> {
        Ok(write(&self.menus)?.remove(&date).is_some())
    }
}
