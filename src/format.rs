// =========================================================
// 展示格式化 (Display Formatting)
// =========================================================

use std::f64::consts::PI;

use chrono::{DateTime, Datelike, Utc};
use emd_hunter_shared::KillScore;

/// 仪表盘圆环半径（SVG viewBox 200x200）
pub const GAUGE_RADIUS: f64 = 90.0;

/// Kill Score 档位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KillScoreTier {
    High,
    Medium,
    Low,
}

impl KillScoreTier {
    pub fn of(score: KillScore) -> Self {
        let value = score.value();
        if value >= 70.0 {
            KillScoreTier::High
        } else if value >= 40.0 {
            KillScoreTier::Medium
        } else {
            KillScoreTier::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            KillScoreTier::High => "Excellent Opportunity",
            KillScoreTier::Medium => "Good Potential",
            KillScoreTier::Low => "Challenging",
        }
    }

    pub fn text_class(&self) -> &'static str {
        match self {
            KillScoreTier::High => "kill-score-high",
            KillScoreTier::Medium => "kill-score-medium",
            KillScoreTier::Low => "kill-score-low",
        }
    }

    pub fn card_class(&self) -> &'static str {
        match self {
            KillScoreTier::High => "bg-green-500/10 border-green-500/30",
            KillScoreTier::Medium => "bg-yellow-500/10 border-yellow-500/30",
            KillScoreTier::Low => "bg-red-500/10 border-red-500/30",
        }
    }

    pub fn stroke_color(&self) -> &'static str {
        match self {
            KillScoreTier::High => "#00FF94",
            KillScoreTier::Medium => "#FFD600",
            KillScoreTier::Low => "#FF0055",
        }
    }
}

/// 圆环周长
pub fn gauge_circumference() -> f64 {
    2.0 * PI * GAUGE_RADIUS
}

/// 圆环描边偏移；超出 0..=100 的分值被夹住，但显示的数字保持原值
pub fn gauge_offset(score: KillScore) -> f64 {
    let c = gauge_circumference();
    let ratio = score.value().clamp(0.0, 100.0) / 100.0;
    c - ratio * c
}

/// 竞争度档位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompetitionLevel {
    High,
    Medium,
    Low,
}

impl CompetitionLevel {
    pub fn of(competition: f64) -> Self {
        if competition >= 0.7 {
            CompetitionLevel::High
        } else if competition >= 0.4 {
            CompetitionLevel::Medium
        } else {
            CompetitionLevel::Low
        }
    }

    pub fn text_class(&self) -> &'static str {
        match self {
            CompetitionLevel::High => "text-red-400",
            CompetitionLevel::Medium => "text-yellow-400",
            CompetitionLevel::Low => "text-green-400",
        }
    }
}

/// CPC 档位（客户价值的粗略分级）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpcTier {
    HighTicket,
    Contractor,
    Service,
    LowTicket,
}

impl CpcTier {
    pub fn of(cpc: f64) -> Self {
        if cpc >= 50.0 {
            CpcTier::HighTicket
        } else if cpc >= 30.0 {
            CpcTier::Contractor
        } else if cpc >= 10.0 {
            CpcTier::Service
        } else {
            CpcTier::LowTicket
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CpcTier::HighTicket => "High-Ticket",
            CpcTier::Contractor => "Contractor",
            CpcTier::Service => "Service",
            CpcTier::LowTicket => "Low-Ticket",
        }
    }

    pub fn badge_class(&self) -> &'static str {
        match self {
            CpcTier::HighTicket => "bg-purple-500/20 text-purple-400",
            CpcTier::Contractor => "bg-blue-500/20 text-blue-400",
            CpcTier::Service => "bg-green-500/20 text-green-400",
            CpcTier::LowTicket => "bg-gray-500/20 text-gray-400",
        }
    }
}

/// 千分位：`12345` → `"12,345"`
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn format_currency(amount: f64) -> String {
    format!("${:.2}", amount)
}

/// `0.41` → `"41%"`
pub fn format_percent(ratio: f64) -> String {
    format!("{}%", (ratio * 100.0).round() as i64)
}

/// 保存日期：`M/D/YYYY`
pub fn format_saved_date(at: &DateTime<Utc>) -> String {
    format!("{}/{}/{}", at.month(), at.day(), at.year())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn kill_score_tiers() {
        assert_eq!(KillScoreTier::of(KillScore::new(70.0)), KillScoreTier::High);
        assert_eq!(KillScoreTier::of(KillScore::new(69.9)), KillScoreTier::Medium);
        assert_eq!(KillScoreTier::of(KillScore::new(40.0)).label(), "Good Potential");
        assert_eq!(KillScoreTier::of(KillScore::new(12.0)).text_class(), "kill-score-low");
    }

    #[test]
    fn gauge_geometry() {
        let c = gauge_circumference();
        assert!((c - 565.486_677_6).abs() < 1e-6);
        assert!((gauge_offset(KillScore::new(0.0)) - c).abs() < 1e-9);
        assert!(gauge_offset(KillScore::new(100.0)).abs() < 1e-9);
        assert!((gauge_offset(KillScore::new(72.0)) - c * 0.28).abs() < 1e-9);
        assert!(gauge_offset(KillScore::new(140.0)).abs() < 1e-9);
    }

    #[test]
    fn market_tiers() {
        assert_eq!(CompetitionLevel::of(0.7), CompetitionLevel::High);
        assert_eq!(CompetitionLevel::of(0.41), CompetitionLevel::Medium);
        assert_eq!(CompetitionLevel::of(0.1).text_class(), "text-green-400");
        assert_eq!(CpcTier::of(50.0).label(), "High-Ticket");
        assert_eq!(CpcTier::of(32.5), CpcTier::Contractor);
        assert_eq!(CpcTier::of(10.0), CpcTier::Service);
        assert_eq!(CpcTier::of(9.99).label(), "Low-Ticket");
    }

    #[test]
    fn numbers_and_dates() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(880), "880");
        assert_eq!(format_count(1200), "1,200");
        assert_eq!(format_count(1234567), "1,234,567");
        assert_eq!(format_currency(32.5), "$32.50");
        assert_eq!(format_percent(0.416), "42%");
        assert_eq!(format_percent(0.0), "0%");

        let at = Utc.with_ymd_and_hms(2025, 3, 4, 5, 6, 7).unwrap();
        assert_eq!(format_saved_date(&at), "3/4/2025");
    }
}
