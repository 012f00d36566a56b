//! Visualization Kind Module
//! A handful of datasets render with a bespoke layout instead of the
//! standard time-series line chart. The kind is resolved once from the
//! dataset's tag when it is selected, so no render path needs to re-match
//! substrings.

use serde::{Deserialize, Serialize};

/// How a selected dataset should be visualized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VizKind {
    /// Per-variety price panels, one small chart per product variety.
    PriceSmallMultiples,
    /// Horizontal occupation-frequency bars.
    DropoutOccupations,
    /// Student flow rates by grade or level.
    StudentFlow,
    /// Province choropleth with an indicator selector.
    ChoroplethProfile,
    /// Default single line chart over years.
    TimeSeries,
}

impl VizKind {
    /// Resolve the kind from a dataset tag or series name.
    pub fn resolve(tag: &str) -> VizKind {
        let tag = tag.to_lowercase();
        if tag.contains("paddy rice price") {
            VizKind::PriceSmallMultiples
        } else if tag.contains("occupations of school dropouts") {
            VizKind::DropoutOccupations
        } else if tag.contains("student flow rates") || tag.contains("successful student") {
            VizKind::StudentFlow
        } else if tag.contains("crop profile") {
            VizKind::ChoroplethProfile
        } else {
            VizKind::TimeSeries
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_tags_resolve_to_their_layouts() {
        assert_eq!(
            VizKind::resolve("Paddy Rice Price (Fragrant Rice)"),
            VizKind::PriceSmallMultiples
        );
        assert_eq!(
            VizKind::resolve("Occupations of School Dropouts in 2023"),
            VizKind::DropoutOccupations
        );
        assert_eq!(
            VizKind::resolve("Student Flow Rates: Dropout by Grade in Cambodia"),
            VizKind::StudentFlow
        );
        assert_eq!(
            VizKind::resolve("Successful Student in Cambodia"),
            VizKind::StudentFlow
        );
        assert_eq!(
            VizKind::resolve("Cashew Nut Crop Profile"),
            VizKind::ChoroplethProfile
        );
    }

    #[test]
    fn anything_else_is_a_time_series() {
        assert_eq!(
            VizKind::resolve("Rice Export Value to Vietnam"),
            VizKind::TimeSeries
        );
    }
}
