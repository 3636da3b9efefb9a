//! Output formatter — narrative lines grouped into presentation-agnostic sections.
//!
//! Sectioning is content-addressed by each line's explicit tag, not by its
//! position, so upstream reordering of tagged lines still lands them in the
//! right section. Untagged (`Body`) lines attach to the most recently opened
//! section; the final line is always the summary. Rendering a `Report` into
//! any concrete markup is a collaborator's concern.

use serde::{Deserialize, Serialize};

use crate::narrative::{LineKind, NarrativeRecord};

/// Section of a delivery-ready report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Header,
    Events,
    Signal,
    Status,
    Risk,
    Strategy,
    Summary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub kind: SectionKind,
    pub lines: Vec<String>,
}

/// Section-keyed record of one briefing, in encounter order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    sections: Vec<Section>,
}

impl Report {
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// First section of the given kind, if present.
    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    fn push_line(&mut self, kind: SectionKind, text: String) {
        match self.sections.last_mut() {
            Some(last) if last.kind == kind => last.lines.push(text),
            _ => self.sections.push(Section {
                kind,
                lines: vec![text],
            }),
        }
    }
}

fn section_for(kind: LineKind) -> Option<SectionKind> {
    match kind {
        LineKind::Header => Some(SectionKind::Header),
        LineKind::Date | LineKind::Earnings => Some(SectionKind::Events),
        LineKind::Signal => Some(SectionKind::Signal),
        LineKind::Status => Some(SectionKind::Status),
        LineKind::Risk => Some(SectionKind::Risk),
        LineKind::Instruction => Some(SectionKind::Strategy),
        LineKind::Summary => Some(SectionKind::Summary),
        LineKind::Body => None,
    }
}

/// Group a narrative record into sections.
pub fn format_report(record: &NarrativeRecord) -> Report {
    let mut report = Report::default();
    let lines = record.lines();
    let Some((last, rest)) = lines.split_last() else {
        return report;
    };

    for line in rest {
        let kind = section_for(line.kind)
            // Body lines ride along with whatever section is open.
            .or_else(|| report.sections.last().map(|s| s.kind))
            .unwrap_or(SectionKind::Header);
        report.push_line(kind, line.text.clone());
    }

    // The closing line is the summary no matter how it is tagged.
    report.push_line(SectionKind::Summary, last.text.clone());
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Classification, EntryZone, RiskBucket, Slope, Status};
    use crate::narrative::{narrate, Locale, NarrativeContext};
    use chrono::NaiveDate;

    fn sample_record() -> NarrativeRecord {
        let classification = Classification {
            symbol: "MSFT".into(),
            status: Status::Breakout,
            is_positive: true,
            slope: Slope::Rising,
            distance_pct: 7.1,
            is_extended: false,
            price: 150.0,
            trend: 140.0,
            entry_zone: Some(EntryZone {
                support: 140.0,
                resistance: 155.0,
            }),
            retest: false,
            atr_pct: Some(2.5),
            risk: Some(RiskBucket::Normal),
        };
        let ctx = NarrativeContext::new(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap())
            .with_earnings(20, NaiveDate::from_ymd_opt(2025, 6, 22));
        narrate(&classification, None, &ctx, Locale::En)
    }

    #[test]
    fn sections_group_as_documented() {
        let report = format_report(&sample_record());
        let kinds: Vec<SectionKind> = report.sections().iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SectionKind::Header,
                SectionKind::Events,
                SectionKind::Signal,
                SectionKind::Status,
                SectionKind::Risk,
                SectionKind::Strategy,
                SectionKind::Summary,
            ]
        );

        // Date and earnings collapse into one Events section.
        assert_eq!(report.section(SectionKind::Events).unwrap().lines.len(), 2);
        // The explanation (Body) rides with the Status section.
        assert_eq!(report.section(SectionKind::Status).unwrap().lines.len(), 2);
        assert_eq!(report.section(SectionKind::Summary).unwrap().lines.len(), 1);
    }

    #[test]
    fn final_line_is_always_summary() {
        let report = format_report(&sample_record());
        let last = report.sections().last().unwrap();
        assert_eq!(last.kind, SectionKind::Summary);
    }

    #[test]
    fn empty_record_formats_to_empty_report() {
        let record: NarrativeRecord = serde_json::from_str(r#"{"lines":[]}"#).unwrap();
        let report = format_report(&record);
        assert!(report.sections().is_empty());
    }

    #[test]
    fn sectioning_keys_off_tags_not_positions() {
        // Reorder the tagged lines (risk before signal); each still lands in
        // its own section because the tag, not the position, decides.
        let record = sample_record();
        let mut lines = record.lines().to_vec();
        let risk_idx = lines
            .iter()
            .position(|l| l.kind == crate::narrative::LineKind::Risk)
            .unwrap();
        let risk = lines.remove(risk_idx);
        let signal_idx = lines
            .iter()
            .position(|l| l.kind == crate::narrative::LineKind::Signal)
            .unwrap();
        lines.insert(signal_idx, risk);
        let reordered: NarrativeRecord =
            serde_json::from_value(serde_json::json!({ "lines": lines })).unwrap();

        let report = format_report(&reordered);
        assert_eq!(report.section(SectionKind::Risk).unwrap().lines.len(), 1);
        assert_eq!(report.section(SectionKind::Signal).unwrap().lines.len(), 1);
    }
}
