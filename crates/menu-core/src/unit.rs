//! 計量單位與換算

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::MenuError;

/// 單位的量綱
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    /// 質量
    Mass,
    /// 體積
    Volume,
    /// 計數
    Count,
}

/// 計量單位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Gram,
    Kilogram,
    Milliliter,
    Liter,
    Piece,
}

impl Unit {
    /// 單位量綱
    pub fn dimension(&self) -> Dimension {
        match self {
            Unit::Gram | Unit::Kilogram => Dimension::Mass,
            Unit::Milliliter | Unit::Liter => Dimension::Volume,
            Unit::Piece => Dimension::Count,
        }
    }

    /// 換算為同量綱基本單位（g、ml、pcs）的倍數
    fn base_factor(&self) -> Decimal {
        match self {
            Unit::Gram | Unit::Milliliter | Unit::Piece => Decimal::ONE,
            Unit::Kilogram | Unit::Liter => Decimal::from(1000),
        }
    }

    /// 檢查兩個單位是否可互相換算
    pub fn is_compatible(&self, other: Unit) -> bool {
        self.dimension() == other.dimension()
    }

    /// 將數量從本單位換算到目標單位（量綱不同時返回 None）
    pub fn convert(&self, quantity: Decimal, to: Unit) -> Option<Decimal> {
        if *self == to {
            return Some(quantity);
        }
        if !self.is_compatible(to) {
            return None;
        }
        Some(quantity * self.base_factor() / to.base_factor())
    }

    /// 單位符號
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Gram => "g",
            Unit::Kilogram => "kg",
            Unit::Milliliter => "ml",
            Unit::Liter => "l",
            Unit::Piece => "pcs",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Unit {
    type Err = MenuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "g" | "gram" | "grams" => Ok(Unit::Gram),
            "kg" | "kilogram" | "kilograms" => Ok(Unit::Kilogram),
            "ml" | "milliliter" | "milliliters" => Ok(Unit::Milliliter),
            "l" | "liter" | "liters" => Ok(Unit::Liter),
            "pcs" | "pc" | "piece" | "pieces" => Ok(Unit::Piece),
            other => Err(MenuError::Validation(format!("無法識別的單位: {}", other))),
        }
    }
}
