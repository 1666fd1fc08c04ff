//! 產品庫存模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{MenuError, ProductId, Result, Unit};

/// 庫存狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    /// 庫存充足
    InStock,
    /// 低於最低庫存
    LowStock,
    /// 無庫存
    OutOfStock,
}

/// 產品（庫存由外部子系統維護，本核心只讀）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// 產品ID
    pub id: ProductId,

    /// 名稱
    pub name: String,

    /// 庫存單位
    pub unit: Unit,

    /// 現有庫存
    pub stock_quantity: Decimal,

    /// 最低庫存（補貨警戒線）
    #[serde(default)]
    pub minimum_stock: Decimal,
}

impl Product {
    /// 創建新的產品
    pub fn new(name: impl Into<String>, unit: Unit, stock_quantity: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            unit,
            stock_quantity,
            minimum_stock: Decimal::ZERO,
        }
    }

    /// 建構器模式：設置產品ID
    pub fn with_id(mut self, id: ProductId) -> Self {
        self.id = id;
        self
    }

    /// 建構器模式：設置最低庫存
    pub fn with_minimum_stock(mut self, minimum_stock: Decimal) -> Self {
        self.minimum_stock = minimum_stock;
        self
    }

    /// 檢查資料是否有效
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(MenuError::Validation("產品名稱不可為空".to_string()));
        }
        if self.stock_quantity < Decimal::ZERO {
            return Err(MenuError::Validation(format!(
                "產品 {} 的庫存不可為負數: {}",
                self.name, self.stock_quantity
            )));
        }
        Ok(())
    }

    /// 庫存狀態
    pub fn status(&self) -> ProductStatus {
        if self.stock_quantity <= Decimal::ZERO {
            ProductStatus::OutOfStock
        } else if self.is_below_minimum() {
            ProductStatus::LowStock
        } else {
            ProductStatus::InStock
        }
    }

    /// 檢查庫存是否低於最低庫存
    pub fn is_below_minimum(&self) -> bool {
        self.stock_quantity < self.minimum_stock
    }

    /// 獲取需要補充的數量
    pub fn replenishment_needed(&self) -> Decimal {
        if self.is_below_minimum() {
            self.minimum_stock - self.stock_quantity
        } else {
            Decimal::ZERO
        }
    }
}
