// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Duration, NaiveDate, Utc};

/// 目标日期及其 UTC 半开区间 `[start, end)`
///
/// `end` 固定为目标日期次日 00:00 UTC。`start` 只能向前（更早）扩展，
/// 每次一天，用于当天投稿稀少时的回看。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetWindow {
    target_date: NaiveDate,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    extensions: u32,
}

impl TargetWindow {
    pub fn new(target_date: NaiveDate) -> Self {
        let start = target_date.and_time(chrono::NaiveTime::MIN).and_utc();
        Self {
            target_date,
            start,
            end: start + Duration::days(1),
            extensions: 0,
        }
    }

    /// `now` 所在 UTC 日期的前一天
    pub fn for_yesterday(now: DateTime<Utc>) -> Self {
        Self::new(now.date_naive() - Duration::days(1))
    }

    pub fn target_date(&self) -> NaiveDate {
        self.target_date
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// 已向前扩展的天数
    pub fn extensions(&self) -> u32 {
        self.extensions
    }

    /// `start <= instant < end`
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }

    pub fn is_after(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.end
    }

    /// 将 `start` 向前移动一天，`end` 不变
    pub fn extend_back_one_day(&mut self) {
        self.start -= Duration::days(1);
        self.extensions += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_window_is_half_open_at_midnight() {
        let window = TargetWindow::new(date(2025, 1, 15));

        let start = Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 1, 16, 0, 0, 0).unwrap();

        assert_eq!(window.start(), start);
        assert_eq!(window.end(), end);
        assert!(window.contains(start));
        assert!(!window.contains(end));
        assert!(window.is_after(end));
        assert!(window.contains(end - Duration::nanoseconds(1)));
        assert!(!window.contains(start - Duration::seconds(1)));
        assert!(!window.is_after(start - Duration::seconds(1)));
    }

    #[test]
    fn test_for_yesterday_uses_utc_date() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 0, 30, 0).unwrap();
        let window = TargetWindow::for_yesterday(now);
        assert_eq!(window.target_date(), date(2025, 2, 28));
    }

    #[test]
    fn test_extension_moves_start_only() {
        let mut window = TargetWindow::new(date(2025, 1, 15));
        let end = window.end();

        window.extend_back_one_day();
        window.extend_back_one_day();

        assert_eq!(window.extensions(), 2);
        assert_eq!(
            window.start(),
            Utc.with_ymd_and_hms(2025, 1, 13, 0, 0, 0).unwrap()
        );
        assert_eq!(window.end(), end);
        assert_eq!(window.target_date(), date(2025, 1, 15));
    }
}
