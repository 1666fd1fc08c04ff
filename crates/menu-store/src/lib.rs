//! # Menu Store
//!
//! 外部協作者介面（菜色目錄、產品庫存、範本與每日菜單儲存）與記憶體實作

pub mod memory;

use chrono::NaiveDate;
use menu_core::{
    DailyMenu, Dish, DishId, MealType, MenuId, Product, ProductId, ProductStatus, Result,
    TemplateId, WeeklyMenuTemplate,
};
use std::collections::HashMap;

// Re-export 主要類型
pub use memory::InMemoryStore;

/// 每日菜單寫入結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// 新建
    Created,
    /// 覆蓋既有菜單
    Updated,
}

/// 菜色目錄（只讀）
pub trait DishCatalog: Send + Sync {
    /// 列出啟用中的菜色（可依餐別篩選）
    fn list_active_dishes(&self, category: Option<MealType>) -> Result<Vec<Dish>>;

    /// 依ID取得菜色
    fn get_dish(&self, id: DishId) -> Result<Option<Dish>>;

    /// 批次取得菜色（找不到的ID不會出現在結果中）
    fn get_dishes(&self, ids: &[DishId]) -> Result<HashMap<DishId, Dish>> {
        let mut dishes = HashMap::with_capacity(ids.len());
        for &id in ids {
            if let Some(dish) = self.get_dish(id)? {
                dishes.insert(id, dish);
            }
        }
        Ok(dishes)
    }
}

/// 產品庫存（只讀）
pub trait ProductInventory: Send + Sync {
    /// 列出產品（可依庫存狀態篩選）
    fn list_products(&self, status: Option<ProductStatus>) -> Result<Vec<Product>>;

    /// 依ID取得產品
    fn get_product(&self, id: ProductId) -> Result<Option<Product>>;

    /// 批次取得產品（找不到的ID不會出現在結果中）
    fn get_products(&self, ids: &[ProductId]) -> Result<HashMap<ProductId, Product>> {
        let mut products = HashMap::with_capacity(ids.len());
        for &id in ids {
            if let Some(product) = self.get_product(id)? {
                products.insert(id, product);
            }
        }
        Ok(products)
    }
}

/// 週菜單範本儲存
pub trait TemplateRepository: Send + Sync {
    fn get_template(&self, id: TemplateId) -> Result<Option<WeeklyMenuTemplate>>;

    /// 列出範本（可依啟用狀態篩選）
    fn list_templates(&self, is_active: Option<bool>) -> Result<Vec<WeeklyMenuTemplate>>;

    fn insert_template(&self, template: WeeklyMenuTemplate) -> Result<WeeklyMenuTemplate>;

    /// 覆蓋既有範本（範本不存在時返回 TemplateNotFound）
    fn save_template(&self, template: WeeklyMenuTemplate) -> Result<WeeklyMenuTemplate>;

    /// 刪除範本，返回是否確實刪除
    fn delete_template(&self, id: TemplateId) -> Result<bool>;
}

/// 每日菜單儲存
pub trait DailyMenuRepository: Send + Sync {
    fn get_menu_by_date(&self, date: NaiveDate) -> Result<Option<DailyMenu>>;

    fn get_menu(&self, id: MenuId) -> Result<Option<DailyMenu>>;

    /// 列出日期區間內的菜單（含首尾，依日期排序）
    fn list_menus(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<DailyMenu>>;

    /// 新增菜單（日期已存在時返回 DuplicateDate）
    fn insert_menu(&self, menu: DailyMenu) -> Result<DailyMenu>;

    /// 依日期原子寫入：不存在則新增，存在則覆蓋內容並保留ID與消耗紀錄
    fn upsert_menu_by_date(&self, menu: DailyMenu) -> Result<(DailyMenu, UpsertOutcome)>;

    /// 依ID覆蓋既有菜單
    fn save_menu(&self, menu: DailyMenu) -> Result<DailyMenu>;

    /// 刪除某日菜單，返回是否確實刪除
    fn delete_menu_by_date(&self, date: NaiveDate) -> Result<bool>;
}
