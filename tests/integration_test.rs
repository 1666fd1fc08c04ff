//! 集成測試

use chrono::{Datelike, NaiveDate, Weekday};
use kinder_menu::*;
use rstest::rstest;
use rust_decimal::Decimal;
use std::sync::Arc;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

struct Kitchen {
    store: Arc<InMemoryStore>,
    planner: MenuPlanner,
    oatmeal_id: ProductId,
    porridge_id: DishId,
}

/// 燕麥片庫存 1000 g；燕麥粥每人 50 g
fn kitchen(config: EngineConfig) -> Kitchen {
    let store = Arc::new(InMemoryStore::new());

    let oatmeal = Product::new("燕麥片", Unit::Gram, Decimal::from(1000));
    let porridge = Dish::new("燕麥粥", MealType::Breakfast).with_ingredient(
        oatmeal.id,
        Decimal::from(50),
        Unit::Gram,
    );
    let (oatmeal_id, porridge_id) = (oatmeal.id, porridge.id);
    store.put_product(oatmeal).unwrap();
    store.put_dish(porridge).unwrap();

    let planner = MenuPlanner::in_memory(store.clone(), config).unwrap();
    Kitchen {
        store,
        planner,
        oatmeal_id,
        porridge_id,
    }
}

#[test]
fn test_standard_week_scenario() {
    // 場景：標準週，週一早餐燕麥粥，30 名幼兒
    let k = kitchen(EngineConfig::default());

    // 1. 建立範本並排入菜色
    let template = k
        .planner
        .create_weekly_menu_template("Standard Week", 30)
        .unwrap();
    k.planner
        .add_dish_to_template_day(template.id, Weekday::Mon, MealType::Breakfast, k.porridge_id)
        .unwrap();

    // 2. 套用到 2024-06-03 起的一週
    let result = k
        .planner
        .apply_template_to_week(template.id, date(2024, 6, 3), 30)
        .unwrap();
    assert_eq!(result.created_count, 7);

    let monday = k.planner.get_daily_menu(date(2024, 6, 3)).unwrap();
    let breakfast = monday.meal(MealType::Breakfast);
    assert_eq!(breakfast.dishes.len(), 1);
    assert_eq!(breakfast.dishes[0].dish_id, k.porridge_id);
    assert_eq!(breakfast.child_count, 30);

    // 3. 需求計算：50 g × 30 人 × 1 個週一 = 1500 g
    let products = k
        .planner
        .calculate_required_products(template.id, 7, 30, Some(date(2024, 6, 3)))
        .unwrap();
    assert_eq!(products.len(), 1);
    let oatmeal = &products[0];
    assert_eq!(oatmeal.product_id, k.oatmeal_id);
    assert_eq!(oatmeal.required, Decimal::from(1500));
    assert_eq!(oatmeal.available, Decimal::from(1000));
    assert_eq!(oatmeal.shortage, Decimal::from(500));
    assert!(!oatmeal.sufficient);

    // 套用結果帶出相同的短缺
    assert_eq!(result.shortages, products);
}

#[test]
fn test_overlapping_applies_keep_one_menu_per_date() {
    let k = kitchen(EngineConfig::default());
    let template = k.planner.create_weekly_menu_template("標準週", 30).unwrap();
    k.planner
        .add_dish_to_template_day(template.id, Weekday::Mon, MealType::Breakfast, k.porridge_id)
        .unwrap();

    k.planner
        .apply_template_to_week(template.id, date(2024, 6, 3), 30)
        .unwrap();
    k.planner
        .apply_template_to_week(template.id, date(2024, 6, 5), 28)
        .unwrap();
    k.planner
        .apply_template_to_month(template.id, date(2024, 6, 1), 25)
        .unwrap();

    let menus = k
        .planner
        .list_daily_menus(date(2024, 6, 1), date(2024, 6, 30))
        .unwrap();
    assert_eq!(menus.len(), 30);
    assert!(menus.windows(2).all(|w| w[0].date < w[1].date));
    assert!(menus.iter().all(|m| m.total_child_count == 25));
}

#[test]
fn test_reapply_keeps_consumption_logs() {
    let k = kitchen(EngineConfig::default());
    let template = k.planner.create_weekly_menu_template("標準週", 30).unwrap();

    let first = k
        .planner
        .apply_template_to_week(template.id, date(2024, 6, 3), 30)
        .unwrap();

    // 供餐子系統附加一筆消耗紀錄
    let mut served = first.created_menus[0].clone();
    served.consumption_logs.push(ConsumptionLog {
        product_id: k.oatmeal_id,
        quantity: Decimal::from(1500),
        unit: Unit::Gram,
        meal_type: MealType::Breakfast,
        logged_at: chrono::Utc::now(),
    });
    k.planner.update_daily_menu(served.clone()).unwrap();

    let second = k
        .planner
        .apply_template_to_week(template.id, date(2024, 6, 3), 20)
        .unwrap();
    assert_eq!(second.updated_count, 7);

    let menu = k.planner.get_daily_menu(date(2024, 6, 3)).unwrap();
    assert_eq!(menu.id, served.id);
    assert_eq!(menu.created_at, served.created_at);
    assert_eq!(menu.consumption_logs.len(), 1);
    assert_eq!(menu.total_child_count, 20);
}

#[rstest]
#[case(ApplyFailurePolicy::BestEffort)]
#[case(ApplyFailurePolicy::FailFast)]
fn test_partial_write_failure(#[case] policy: ApplyFailurePolicy) {
    let k = kitchen(EngineConfig::default().with_failure_policy(policy));
    let template = k.planner.create_weekly_menu_template("標準週", 30).unwrap();
    k.store.fail_writes_on(date(2024, 6, 6)).unwrap();

    let result = k
        .planner
        .apply_template_to_week(template.id, date(2024, 6, 3), 30);

    match policy {
        ApplyFailurePolicy::BestEffort => {
            let result = result.unwrap();
            assert_eq!(result.created_count, 6);
            assert_eq!(
                result.failed_days,
                vec![FailedDay {
                    date: date(2024, 6, 6),
                    reason: result.failed_days[0].reason.clone(),
                }]
            );
            assert!(!result.is_complete());
        }
        ApplyFailurePolicy::FailFast => {
            assert!(matches!(
                result,
                Err(MenuError::ApplyAborted { written: 3, .. })
            ));
            assert_eq!(k.store.menu_count().unwrap(), 3);
        }
    }
}

#[rstest]
#[case(date(2024, 2, 1), 29)]
#[case(date(2023, 2, 10), 28)]
#[case(date(2024, 4, 30), 30)]
#[case(date(2024, 12, 20), 31)]
fn test_month_length_follows_start_month(#[case] start: NaiveDate, #[case] days: usize) {
    let k = kitchen(EngineConfig::default());
    let template = k.planner.create_weekly_menu_template("標準週", 30).unwrap();
    k.planner
        .add_dish_to_template_day(template.id, Weekday::Mon, MealType::Breakfast, k.porridge_id)
        .unwrap();

    let result = k
        .planner
        .apply_template_to_month(template.id, start, 10)
        .unwrap();

    assert_eq!(result.created_menus.len(), days);
    for menu in &result.created_menus {
        let expect_porridge = menu.date.weekday() == Weekday::Mon;
        assert_eq!(!menu.meal(MealType::Breakfast).is_empty(), expect_porridge);
    }
}

#[rstest]
#[case(0, 10)]
#[case(7, 0)]
#[case(400, 10)]
fn test_invalid_request_rejected_before_template_lookup(
    #[case] days: u32,
    #[case] child_count: u32,
) {
    let k = kitchen(EngineConfig::default());
    let unknown = uuid::Uuid::new_v4();

    assert!(matches!(
        k.planner
            .calculate_required_products(unknown, days, child_count, Some(date(2024, 6, 3))),
        Err(MenuError::Validation(_))
    ));
}

#[test]
fn test_apply_with_zero_children_is_validation_error() {
    let k = kitchen(EngineConfig::default());
    let unknown = uuid::Uuid::new_v4();

    assert!(matches!(
        k.planner.apply_template_to_week(unknown, date(2024, 6, 3), 0),
        Err(MenuError::Validation(_))
    ));
    assert!(matches!(
        k.planner.apply_template_to_month(unknown, date(2024, 6, 1), 0),
        Err(MenuError::Validation(_))
    ));
    assert_eq!(k.store.menu_count().unwrap(), 0);
}

#[test]
fn test_daily_menu_crud() {
    let k = kitchen(EngineConfig::default());
    let day = date(2024, 9, 2);

    let menu = k.planner.create_daily_menu(day, 18).unwrap();
    assert!(matches!(
        k.planner.create_daily_menu(day, 18),
        Err(MenuError::DuplicateDate(_))
    ));

    let mut edited = menu.clone();
    edited.total_child_count = 22;
    k.planner.update_daily_menu(edited).unwrap();
    assert_eq!(k.planner.get_daily_menu(day).unwrap().total_child_count, 22);

    k.planner.delete_daily_menu(day).unwrap();
    assert!(matches!(
        k.planner.get_daily_menu(day),
        Err(MenuError::DailyMenuNotFound(_))
    ));
    assert!(k.planner.delete_daily_menu(day).is_err());
}

#[test]
fn test_catalog_and_inventory_listing() {
    let k = kitchen(EngineConfig::default());
    k.store
        .put_dish(Dish::new("番茄湯", MealType::Dinner).with_active(false))
        .unwrap();

    assert_eq!(k.planner.list_active_dishes(None).unwrap().len(), 1);
    assert_eq!(
        k.planner
            .list_active_dishes(Some(MealType::Breakfast))
            .unwrap()[0]
            .name,
        "燕麥粥"
    );
    assert_eq!(k.planner.get_dish(k.porridge_id).unwrap().name, "燕麥粥");
    assert_eq!(
        k.planner.list_products(Some(ProductStatus::InStock)).unwrap().len(),
        1
    );
}

#[test]
fn test_template_lifecycle() {
    let k = kitchen(EngineConfig::default());
    let template = k.planner.create_weekly_menu_template("標準週", 30).unwrap();

    k.planner
        .add_dish_to_template_day(template.id, Weekday::Tue, MealType::Snack, k.porridge_id)
        .unwrap();
    let copied = k
        .planner
        .copy_template_day(template.id, Weekday::Tue, Weekday::Fri)
        .unwrap();
    assert_eq!(copied.cell(Weekday::Fri, MealType::Snack), &[k.porridge_id]);

    let cleared = k.planner.clear_template_day(template.id, Weekday::Tue).unwrap();
    assert!(cleared.day(Weekday::Tue).is_empty());

    k.planner
        .update_template(template.id, TemplateUpdate::default().with_active(false))
        .unwrap();
    assert!(k.planner.list_templates(Some(true)).unwrap().is_empty());

    // 刪除範本不影響已產生的每日菜單
    k.planner
        .apply_template_to_week(template.id, date(2024, 6, 3), 30)
        .unwrap();
    k.planner.delete_weekly_menu_template(template.id).unwrap();
    assert!(matches!(
        k.planner.get_template(template.id),
        Err(MenuError::TemplateNotFound(_))
    ));
    assert_eq!(k.store.menu_count().unwrap(), 7);
}

#[test]
fn test_apply_result_serializes_to_json() {
    let k = kitchen(EngineConfig::default());
    let template = k.planner.create_weekly_menu_template("標準週", 30).unwrap();
    k.planner
        .add_dish_to_template_day(template.id, Weekday::Mon, MealType::Breakfast, k.porridge_id)
        .unwrap();

    let result = k
        .planner
        .apply_template_to_week(template.id, date(2024, 6, 3), 30)
        .unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["created_count"], 7);
    assert_eq!(json["created_menus"][0]["date"], "2024-06-03");
    assert_eq!(json["shortages"][0]["unit"], "gram");
}

#[test]
fn test_config_from_json() {
    let config = EngineConfig::from_json(
        r#"{ "failure_policy": "fail_fast", "unit_policy": "strict", "max_horizon_days": 62 }"#,
    )
    .unwrap();

    assert_eq!(config.failure_policy, ApplyFailurePolicy::FailFast);
    assert_eq!(config.unit_policy, UnitPolicy::Strict);
    assert_eq!(config.max_horizon_days, 62);
    assert_eq!(config.parallel_threshold_days, 28);
}
