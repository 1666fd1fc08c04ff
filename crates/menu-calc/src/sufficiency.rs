//! 庫存充足度比對

use menu_core::requirement::sort_insufficient_first;
use menu_core::{Product, ProductId, RequiredProduct};
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::aggregation::DemandMap;

/// 庫存充足度計算器
pub struct SufficiencyCalculator;

impl SufficiencyCalculator {
    /// 將總需求量與目前庫存比對
    ///
    /// 每個需求鍵產生一筆記錄，需求量為 0 的不輸出。
    /// 找不到的產品視為庫存 0，名稱以產品ID代替。
    /// 結果依「不足優先、名稱」排序。
    pub fn reconcile(
        totals: &DemandMap,
        products: &HashMap<ProductId, Product>,
    ) -> Vec<RequiredProduct> {
        let mut results: Vec<RequiredProduct> = totals
            .iter()
            .filter(|(_, required)| **required > Decimal::ZERO)
            .map(|(key, required)| match products.get(&key.product_id) {
                Some(product) => RequiredProduct::new(
                    key.product_id,
                    product.name.clone(),
                    *required,
                    product.stock_quantity,
                    key.unit,
                ),
                None => {
                    tracing::debug!("找不到產品 {}，庫存以 0 計算", key.product_id);
                    RequiredProduct::new(
                        key.product_id,
                        key.product_id.to_string(),
                        *required,
                        Decimal::ZERO,
                        key.unit,
                    )
                }
            })
            .collect();

        sort_insufficient_first(&mut results);
        results
    }
}
