use crate::core::segment::DaySegment;

/// Vertical rule at the first rendered day of a month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthMark {
    pub year: i32,
    pub month: u32,
    pub x: f64,
    /// January marks double as year boundaries and render heavier.
    pub year_start: bool,
}

/// Day-of-month numeral centered under its segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayMark {
    pub day_of_month: u32,
    pub x_center: f64,
}

/// Derives month rules from the segment list: one mark at the x of the
/// first segment belonging to each (year, month).
#[must_use]
pub fn month_marks(segments: &[DaySegment]) -> Vec<MonthMark> {
    let mut marks: Vec<MonthMark> = Vec::new();
    for segment in segments {
        let seen = marks
            .iter()
            .any(|mark| mark.year == segment.year() && mark.month == segment.month());
        if !seen {
            marks.push(MonthMark {
                year: segment.year(),
                month: segment.month(),
                x: segment.x_start,
                year_start: segment.month() == 1,
            });
        }
    }
    marks
}

#[must_use]
pub fn day_marks(segments: &[DaySegment]) -> Vec<DayMark> {
    segments
        .iter()
        .map(|segment| DayMark {
            day_of_month: segment.day_of_month(),
            x_center: segment.x_start + segment.width / 2.0,
        })
        .collect()
}
