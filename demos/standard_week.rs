//! 標準週示例：建立範本、套用一週並列出產品需求

use chrono::{NaiveDate, Weekday};
use kinder_menu::{
    format_requirement, meal_type_display_name, Dish, EngineConfig, InMemoryStore, MealType,
    MenuPlanner, Product, Unit,
};
use rust_decimal::Decimal;
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("=== 標準週示例 ===\n");

    // 產品與庫存
    let store = Arc::new(InMemoryStore::new());
    let oatmeal = Product::new("燕麥片", Unit::Gram, Decimal::from(1000));
    let milk = Product::new("牛奶", Unit::Liter, Decimal::from(20))
        .with_minimum_stock(Decimal::from(5));
    let rice = Product::new("白米", Unit::Kilogram, Decimal::from(3));

    // 菜色
    let porridge = Dish::new("燕麥粥", MealType::Breakfast)
        .with_ingredient(oatmeal.id, Decimal::from(50), Unit::Gram)
        .with_ingredient(milk.id, Decimal::from(150), Unit::Milliliter);
    let fried_rice = Dish::new("蛋炒飯", MealType::Lunch)
        .with_ingredient(rice.id, Decimal::from(400), Unit::Gram)
        .with_servings_count(4);

    let (porridge_id, fried_rice_id) = (porridge.id, fried_rice.id);
    for product in [oatmeal, milk, rice] {
        store.put_product(product)?;
    }
    store.put_dish(porridge)?;
    store.put_dish(fried_rice)?;

    let planner = MenuPlanner::in_memory(store, EngineConfig::default())?;

    // 範本
    let template = planner.create_weekly_menu_template("標準週", 30)?;
    planner.add_dish_to_template_day(
        template.id,
        Weekday::Mon,
        MealType::Breakfast,
        porridge_id,
    )?;
    for day in [Weekday::Tue, Weekday::Thu] {
        planner.add_dish_to_template_day(template.id, day, MealType::Lunch, fried_rice_id)?;
    }

    // 套用到 2024-06-03 起的一週
    let start = NaiveDate::from_ymd_opt(2024, 6, 3)
        .ok_or_else(|| anyhow::anyhow!("無效的起始日期"))?;
    let result = planner.apply_template_to_week(template.id, start, 30)?;
    println!("{}\n", result.message);

    for menu in &result.created_menus {
        let meals: Vec<String> = MealType::ALL
            .iter()
            .filter(|&&meal| !menu.meal(meal).is_empty())
            .map(|&meal| {
                let names: Vec<&str> = menu
                    .meal(meal)
                    .dishes
                    .iter()
                    .map(|d| d.name.as_str())
                    .collect();
                format!("{} {}", meal_type_display_name(meal), names.join("、"))
            })
            .collect();
        println!("  {}: {}", menu.date, meals.join("；"));
    }

    println!("\n產品需求:");
    let products = planner.calculate_required_products(template.id, 7, 30, Some(start))?;
    for product in &products {
        println!("  - {}", format_requirement(product));
    }

    Ok(())
}
