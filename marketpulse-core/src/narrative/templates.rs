//! Locale-specific phrase tables.
//!
//! All narrative wording lives here, keyed by the classifier's output fields
//! (status, slope, extension, risk bucket). The templates never re-derive
//! thresholds from numeric values — the one template-only constant is the
//! "hugging the line" phrasing distance, which is wording, not a decision.
//! Adding a locale means adding an arm to each lookup, nothing more.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::analysis::{RiskBucket, Slope, Status};

/// Distance (percent) under which the explanation adds the "iron floor"
/// phrasing. Purely presentational.
pub(super) const TIGHT_DISTANCE_PCT: f64 = 2.0;

/// Narrative locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Hebrew — the original briefing language.
    #[default]
    He,
    /// English.
    En,
}

impl Locale {
    /// Right-to-left marker prefix for Hebrew lines.
    pub(super) fn rlm(self) -> &'static str {
        match self {
            Locale::He => "\u{200f}",
            Locale::En => "",
        }
    }

    pub(super) fn weekday_name(self, weekday: Weekday) -> &'static str {
        match self {
            Locale::He => match weekday {
                Weekday::Sun => "יום ראשון",
                Weekday::Mon => "יום שני",
                Weekday::Tue => "יום שלישי",
                Weekday::Wed => "יום רביעי",
                Weekday::Thu => "יום חמישי",
                Weekday::Fri => "יום שישי",
                Weekday::Sat => "יום שבת",
            },
            Locale::En => match weekday {
                Weekday::Sun => "Sunday",
                Weekday::Mon => "Monday",
                Weekday::Tue => "Tuesday",
                Weekday::Wed => "Wednesday",
                Weekday::Thu => "Thursday",
                Weekday::Fri => "Friday",
                Weekday::Sat => "Saturday",
            },
        }
    }

    pub(super) fn status_name(self, status: Status) -> &'static str {
        match self {
            Locale::He => match status {
                Status::Breakout => "פריצה",
                Status::Stretched => "מתוחה",
                Status::Breakdown => "שבירה",
                Status::Stagnation => "דשדוש",
                Status::Accumulation => "איסוף",
            },
            Locale::En => match status {
                Status::Breakout => "breakout",
                Status::Stretched => "stretched",
                Status::Breakdown => "breakdown",
                Status::Stagnation => "stagnation",
                Status::Accumulation => "accumulation",
            },
        }
    }

    pub(super) fn status_emoji(self, status: Status) -> &'static str {
        match status {
            Status::Breakout | Status::Stretched => "🚀",
            Status::Breakdown => "💥",
            Status::Stagnation => "⚠️",
            Status::Accumulation => "📊",
        }
    }

    pub(super) fn status_label(self) -> &'static str {
        match self {
            Locale::He => "סטטוס נוכחי",
            Locale::En => "Current status",
        }
    }

    pub(super) fn slope_phrase(self, slope: Slope) -> &'static str {
        match self {
            Locale::He => match slope {
                Slope::Rising => "בשיפוע עולה",
                Slope::Flat => "בשיפוע שטוח",
                Slope::Declining => "בשיפוע יורד",
                Slope::Unknown => "בשיפוע לא ידוע",
            },
            Locale::En => match slope {
                Slope::Rising => "with a rising slope",
                Slope::Flat => "with a flat slope",
                Slope::Declining => "with a declining slope",
                Slope::Unknown => "with an unknown slope",
            },
        }
    }

    pub(super) fn date_line(self, date_str: &str, weekday: &str) -> String {
        format!("{}📅 {date_str} {weekday}", self.rlm())
    }

    pub(super) fn earnings_line(self, days: i64, date_info: &str) -> String {
        match self {
            Locale::He => format!("{}⏳ ימים לדווח תוצאות: {days}{date_info}", self.rlm()),
            Locale::En => format!("⏳ Days to earnings report: {days}{date_info}"),
        }
    }

    pub(super) fn entry_retest(self, resistance: &str) -> String {
        match self {
            Locale::He => format!(
                "{}**🎯 אזור כניסה טכני: נפרצה התנגדות ב-{resistance}$. רמה זו משמשת כעת כתמיכה חדשה (Retest).**",
                self.rlm()
            ),
            Locale::En => format!(
                "**🎯 Technical entry zone: resistance broken at {resistance}$. That level now acts as new support (retest).**"
            ),
        }
    }

    pub(super) fn entry_zone(self, support: &str, resistance: &str, distance_pct: f64) -> String {
        match self {
            Locale::He => format!(
                "{}**🎯 אזור כניסה טכני: {support}$ - {resistance}$ (הטווח שבין הממוצע לפריצה, ב-{distance_pct:.1}% מעל הממוצע)**",
                self.rlm()
            ),
            Locale::En => format!(
                "**🎯 Technical entry zone: {support}$ - {resistance}$ (the range between the trend average and the breakout level, {distance_pct:.1}% above the average)**"
            ),
        }
    }

    pub(super) fn entry_no_resistance(self, support: &str, distance_pct: f64) -> String {
        match self {
            Locale::He => format!(
                "{}**🎯 אזור כניסה טכני: {support}$ - לא זוהתה התנגדות (ב-{distance_pct:.1}% מעל הממוצע)**",
                self.rlm()
            ),
            Locale::En => format!(
                "**🎯 Technical entry zone: {support}$ - no resistance detected ({distance_pct:.1}% above the average)**"
            ),
        }
    }

    pub(super) fn no_entry(self, trend: &str, distance_pct: f64) -> String {
        match self {
            Locale::He => format!(
                "{}**⛔ אין כניסה: המניה נסחרת מתחת לממוצע הארוך ({trend}$, ב-{distance_pct:.1}% מתחת לקו).**",
                self.rlm()
            ),
            Locale::En => format!(
                "**⛔ No entry: trading below the long trend average ({trend}$, {distance_pct:.1}% below the line).**"
            ),
        }
    }

    /// One explanatory sentence keyed by (trend side, slope, extension,
    /// tight distance).
    pub(super) fn explanation(
        self,
        is_positive: bool,
        slope: Slope,
        is_extended: bool,
        distance_pct: f64,
    ) -> String {
        let slope_desc = self.slope_phrase(slope);
        let abs = distance_pct.abs();
        match self {
            Locale::He => {
                if !is_positive {
                    format!(
                        "{}המחיר נמצא מתחת לממוצע הארוך, הממוצע {slope_desc}, המחיר במרחק {abs:.1}% מתחת לקו - סכין נופלת.",
                        self.rlm()
                    )
                } else if is_extended {
                    format!(
                        "{}המחיר נמצא מעל הממוצע הארוך, הממוצע {slope_desc}, אך המחיר רחוק {distance_pct:.1}% מהקו - טיסה לירח, סכנת גבהים.",
                        self.rlm()
                    )
                } else {
                    let base = format!(
                        "{}המחיר נמצא מעל הממוצע הארוך, הממוצע {slope_desc}, המחיר במרחק {distance_pct:.1}% מהקו.",
                        self.rlm()
                    );
                    if abs < TIGHT_DISTANCE_PCT {
                        format!("{base} הממוצע משמש כרצפת ברזל.")
                    } else {
                        base
                    }
                }
            }
            Locale::En => {
                if !is_positive {
                    format!(
                        "Price is below the long trend average, the average {slope_desc}, {abs:.1}% under the line - a falling knife."
                    )
                } else if is_extended {
                    format!(
                        "Price is above the long trend average, the average {slope_desc}, but price sits {distance_pct:.1}% away from the line - moonshot, altitude risk."
                    )
                } else {
                    let base = format!(
                        "Price is above the long trend average, the average {slope_desc}, {distance_pct:.1}% from the line."
                    );
                    if abs < TIGHT_DISTANCE_PCT {
                        format!("{base} The average acts as an iron floor.")
                    } else {
                        base
                    }
                }
            }
        }
    }

    pub(super) fn score_line(self, score: f64, max_score: f64) -> String {
        match self {
            Locale::He => format!("{}ציון טכני: {score:.2}/{max_score}", self.rlm()),
            Locale::En => format!("Technical score: {score:.2}/{max_score}"),
        }
    }

    /// Volatility risk line, always emitted; wording keyed by the bucket.
    pub(super) fn risk_line(self, bucket: Option<RiskBucket>, atr_pct: Option<f64>) -> String {
        match (self, bucket, atr_pct) {
            (Locale::He, Some(RiskBucket::Severe), Some(pct)) => format!(
                "{}⚠️ אזהרת סיכון: תנודתיות גבוהה מאוד ({pct:.1}%) - רכבת הרים, קזינו.",
                self.rlm()
            ),
            (Locale::He, Some(RiskBucket::Elevated), Some(pct)) => format!(
                "{}⚠️ אזהרת סיכון: תנודתיות גבוהה ({pct:.1}%) - להדק סטופים.",
                self.rlm()
            ),
            (Locale::He, Some(RiskBucket::Normal), Some(pct)) => format!(
                "{}✅ רמת סיכון: תנודתיות תקינה ({pct:.1}%).",
                self.rlm()
            ),
            (Locale::He, _, _) => format!(
                "{}רמת סיכון: מדד התנודתיות אינו זמין.",
                self.rlm()
            ),
            (Locale::En, Some(RiskBucket::Severe), Some(pct)) => format!(
                "⚠️ Risk warning: very high volatility ({pct:.1}%) - roller coaster, casino."
            ),
            (Locale::En, Some(RiskBucket::Elevated), Some(pct)) => format!(
                "⚠️ Risk warning: high volatility ({pct:.1}%) - tighten stops."
            ),
            (Locale::En, Some(RiskBucket::Normal), Some(pct)) => {
                format!("✅ Risk level: normal volatility ({pct:.1}%).")
            }
            (Locale::En, _, _) => "Risk level: volatility reading unavailable.".to_string(),
        }
    }

    /// Action instruction, fixed one-to-one with status (extension splits
    /// breakout between chase-avoidance and accumulation).
    pub(super) fn instruction(self, status: Status, is_extended: bool) -> String {
        let (he, en) = match status {
            Status::Breakdown => ("📉 הוראה: להתרחק", "📉 Instruction: stand aside"),
            Status::Stretched => ("📈 הוראה: לא לרדוף", "📈 Instruction: do not chase"),
            Status::Stagnation => ("📈 הוראה: להמתין לתיקון", "📈 Instruction: wait for a pullback"),
            Status::Accumulation => ("📈 הוראה: איסוף", "📈 Instruction: accumulate"),
            Status::Breakout => {
                if is_extended {
                    ("📈 הוראה: לא לרדוף", "📈 Instruction: do not chase")
                } else {
                    ("📈 הוראה: איסוף", "📈 Instruction: accumulate")
                }
            }
        };
        match self {
            Locale::He => format!("{}{he}", self.rlm()),
            Locale::En => en.to_string(),
        }
    }

    /// Closing summary sentence keyed by status.
    pub(super) fn summary(self, status: Status) -> String {
        let (he, en) = match status {
            Status::Breakdown => (
                "המניה מתחת למים (תקרת בטון), אין כניסה עד חזרה מעל הממוצע עם שיפוע חיובי.",
                "The stock is underwater (concrete ceiling); no entry until it reclaims the average with a positive slope.",
            ),
            Status::Stretched => (
                "המניה מתוחה מדי מהממוצע (טיסה לירח), מומלץ להמתין לתיקון או נשיקה לממוצע לפני כניסה.",
                "The stock is stretched too far from the average (moonshot); wait for a pullback or a kiss of the average before entering.",
            ),
            Status::Stagnation => (
                "המניה מעל הממוצע אך המגמה חלשה (חשד/זהירות), מומלץ להמתין לשיפוע חיובי או נשיקה לממוצע.",
                "The stock is above the average but the trend is weak (caution); wait for a positive slope or a kiss of the average.",
            ),
            Status::Accumulation => (
                "המניה נמצאת באזור איסוף מעל הממוצע (רצפת ברזל), שיפוע חיובי - אפשרות לכניסה באזור התמיכה.",
                "The stock sits in an accumulation zone above the average (iron floor), positive slope - entries near support are possible.",
            ),
            Status::Breakout => (
                "המניה בפריצה מעל הממוצע עם שיפוע חיובי - מגמה עולה, להדק סטופים בממוצע.",
                "The stock is breaking out above the average with a positive slope - rising trend, tighten stops at the average.",
            ),
        };
        match self {
            Locale::He => format!("{}{he}", self.rlm()),
            Locale::En => en.to_string(),
        }
    }
}

/// Format a price with thousands separators and two decimals (1234567.8 ->
/// "1,234,567.80").
pub(super) fn fmt_money(value: f64) -> String {
    let raw = format!("{value:.2}");
    let (int_part, frac_part) = raw.split_once('.').unwrap_or((raw.as_str(), "00"));
    let (sign, digits) = int_part
        .strip_prefix('-')
        .map_or(("", int_part), |rest| ("-", rest));

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}{grouped}.{frac_part}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_formatting_groups_thousands() {
        assert_eq!(fmt_money(0.5), "0.50");
        assert_eq!(fmt_money(1234.5), "1,234.50");
        assert_eq!(fmt_money(1_234_567.891), "1,234,567.89");
        assert_eq!(fmt_money(-9876.0), "-9,876.00");
    }

    #[test]
    fn instruction_mapping_is_fixed() {
        let en = Locale::En;
        assert!(en.instruction(Status::Breakdown, false).contains("stand aside"));
        assert!(en.instruction(Status::Stretched, true).contains("do not chase"));
        assert!(en.instruction(Status::Stagnation, false).contains("pullback"));
        assert!(en.instruction(Status::Accumulation, false).contains("accumulate"));
        assert!(en.instruction(Status::Breakout, true).contains("do not chase"));
        assert!(en.instruction(Status::Breakout, false).contains("accumulate"));
    }

    #[test]
    fn hebrew_lines_carry_rtl_marker() {
        let he = Locale::He;
        assert!(he.summary(Status::Breakout).starts_with('\u{200f}'));
        assert!(he.instruction(Status::Breakdown, false).starts_with('\u{200f}'));
        assert!(he
            .risk_line(Some(RiskBucket::Normal), Some(2.0))
            .starts_with('\u{200f}'));
    }
}
