//! 產品需求量計算結果

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{ProductId, Unit};

/// 產品需求量（計算結果，不持久化）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequiredProduct {
    pub product_id: ProductId,

    pub name: String,

    /// 區間內總需求量
    pub required: Decimal,

    /// 目前庫存
    pub available: Decimal,

    /// 短缺量 = max(0, 需求 - 庫存)
    pub shortage: Decimal,

    pub unit: Unit,

    /// 庫存是否足夠（庫存 >= 需求）
    pub sufficient: bool,
}

impl RequiredProduct {
    /// 依需求量與庫存創建記錄，短缺量與是否足夠由此推導
    pub fn new(
        product_id: ProductId,
        name: impl Into<String>,
        required: Decimal,
        available: Decimal,
        unit: Unit,
    ) -> Self {
        let sufficient = available >= required;
        let shortage = if sufficient {
            Decimal::ZERO
        } else {
            required - available
        };

        Self {
            product_id,
            name: name.into(),
            required,
            available,
            shortage,
            unit,
            sufficient,
        }
    }
}

/// 排序：不足的排前面，其次依名稱
pub fn sort_insufficient_first(products: &mut [RequiredProduct]) {
    products.sort_by(|a, b| {
        a.sufficient
            .cmp(&b.sufficient)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.unit.cmp(&b.unit))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use uuid::Uuid;

    #[rstest]
    #[case(1500, 1000, false, 500)]
    #[case(1500, 1500, true, 0)]
    #[case(1500, 2000, true, 0)]
    #[case(0, 0, true, 0)]
    fn test_sufficiency_boundary(
        #[case] required: i64,
        #[case] available: i64,
        #[case] sufficient: bool,
        #[case] shortage: i64,
    ) {
        let item = RequiredProduct::new(
            Uuid::new_v4(),
            "燕麥片",
            Decimal::from(required),
            Decimal::from(available),
            Unit::Gram,
        );

        assert_eq!(item.sufficient, sufficient);
        assert_eq!(item.shortage, Decimal::from(shortage));
    }

    #[test]
    fn test_sort_insufficient_first() {
        let mut items = vec![
            RequiredProduct::new(Uuid::new_v4(), "牛奶", Decimal::ONE, Decimal::TEN, Unit::Liter),
            RequiredProduct::new(Uuid::new_v4(), "雞蛋", Decimal::TEN, Decimal::ONE, Unit::Piece),
            RequiredProduct::new(Uuid::new_v4(), "米", Decimal::TEN, Decimal::ZERO, Unit::Kilogram),
        ];

        sort_insufficient_first(&mut items);

        assert!(!items[0].sufficient);
        assert!(!items[1].sufficient);
        assert!(items[2].sufficient);
        assert_eq!(items[2].name, "牛奶");
    }
}
