//! 菜單日曆：星期循環與展開區間

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::{MenuError, Result};

/// 一週七天（索引 0 = 週一, 1 = 週二, ..., 6 = 週日）
pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// 星期在範本陣列中的索引
pub fn weekday_index(weekday: Weekday) -> usize {
    weekday.num_days_from_monday() as usize
}

/// 從起始日期往後第 `offset` 天的星期
///
/// 第 N 天的星期 = (起始星期索引 + N) mod 7
pub fn weekday_at(start_date: NaiveDate, offset: u32) -> Weekday {
    let start_index = weekday_index(start_date.weekday()) as u32;
    WEEK[((start_index + offset % 7) % 7) as usize]
}

/// 解析星期名稱（"monday"、"Mon"，不分大小寫）
pub fn parse_weekday(name: &str) -> Result<Weekday> {
    name.trim()
        .parse::<Weekday>()
        .map_err(|_| MenuError::Validation(format!("無法識別的星期: {}", name)))
}

/// 星期的鍵名（序列化與顯示用）
pub fn weekday_key(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

/// 計算日期所在月份的天數（28-31）
pub fn days_in_month(date: NaiveDate) -> Result<u32> {
    let first = NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
        .ok_or_else(|| MenuError::InvalidDate(format!("{} 的月初", date)))?;

    let (next_year, next_month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    let next_first = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .ok_or_else(|| MenuError::InvalidDate(format!("{} 的下個月初", date)))?;

    Ok((next_first - first).num_days() as u32)
}

/// 展開區間：起始日期 + 連續天數
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanningHorizon {
    /// 起始日期
    pub start_date: NaiveDate,

    /// 天數
    pub days: u32,
}

impl PlanningHorizon {
    /// 創建新的展開區間
    pub fn new(start_date: NaiveDate, days: u32) -> Result<Self> {
        if days == 0 {
            return Err(MenuError::Validation("天數必須為正整數".to_string()));
        }
        Ok(Self { start_date, days })
    }

    /// 一週（7 天）
    pub fn week(start_date: NaiveDate) -> Self {
        Self {
            start_date,
            days: 7,
        }
    }

    /// 一個月（起始日期所在月份的天數，不一定從 1 號開始）
    pub fn month(start_date: NaiveDate) -> Result<Self> {
        Ok(Self {
            start_date,
            days: days_in_month(start_date)?,
        })
    }

    /// 起始日期的星期索引
    pub fn start_weekday_index(&self) -> usize {
        weekday_index(self.start_date.weekday())
    }

    /// 依序列出區間內每一天的日期
    pub fn dates(&self) -> Result<Vec<NaiveDate>> {
        let mut dates = Vec::with_capacity(self.days as usize);
        let mut current = self.start_date;

        for i in 0..self.days {
            if i > 0 {
                current = current
                    .succ_opt()
                    .ok_or_else(|| MenuError::InvalidDate(format!("{} 之後日期溢出", current)))?;
            }
            dates.push(current);
        }

        Ok(dates)
    }

    /// 區間最後一天
    pub fn end_date(&self) -> Result<NaiveDate> {
        self.start_date
            .checked_add_signed(chrono::Duration::days(i64::from(self.days) - 1))
            .ok_or_else(|| MenuError::InvalidDate(format!("{} 之後日期溢出", self.start_date)))
    }

    /// 區間內各星期出現的次數（索引 0 = 週一）
    pub fn weekday_occurrences(&self) -> [u32; 7] {
        let mut counts = [self.days / 7; 7];
        let start = self.start_weekday_index();
        for offset in 0..(self.days % 7) as usize {
            counts[(start + offset) % 7] += 1;
        }
        counts
    }
}
