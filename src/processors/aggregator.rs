//! Segmented averaging over a chronologically ordered measurement window.
//!
//! Records of one element are materialised once, then partitioned into
//! maximal contiguous runs sharing a key (year, month, or a month-range
//! window). Each run is reduced to `sum(raw) * scaling / count`; scaling is
//! applied before the division.

use crate::models::{Element, Measurement};
use std::collections::BTreeMap;
use std::ops::Range;

pub struct SegmentedAggregator<'a> {
    records: Vec<&'a Measurement>,
    scaling: f64,
}

impl<'a> SegmentedAggregator<'a> {
    /// Restrict `interval` to `element`. Unknown elements select nothing.
    pub fn new(interval: &'a [Measurement], element: Element) -> Self {
        match element.scaling() {
            Some(scaling) => Self {
                records: interval.iter().filter(|m| m.element == element).collect(),
                scaling,
            },
            None => Self {
                records: Vec::new(),
                scaling: 0.0,
            },
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Average per calendar year.
    pub fn yearly_averages(&self) -> BTreeMap<i32, f64> {
        let mut averages = BTreeMap::new();
        let mut it = 0;

        while it < self.records.len() {
            let year = self.records[it].year();
            let last = self.find_from(it, |m| m.year() != year);
            averages.insert(year, self.average(it..last));
            it = last;
        }

        averages
    }

    /// Average over `start_month..=end_month` for every year that has the
    /// whole window.
    ///
    /// A range with `start_month > end_month` wraps past December and is
    /// keyed by the year holding its January..`end_month` part; this needs the
    /// directly following year to be present, otherwise the window is skipped.
    /// A window is also skipped when the data stops before its end month.
    pub fn month_range_averages(&self, start_month: u32, end_month: u32) -> BTreeMap<i32, f64> {
        let mut averages = BTreeMap::new();
        if !is_month(start_month) || !is_month(end_month) {
            return averages;
        }

        let records = &self.records;
        let n = records.len();
        let wraps = start_month > end_month;
        let mut it = 0;

        while it < n {
            let start_year = records[it].year();
            let year_end = self.find_from(it, |m| m.year() != start_year);

            let first = match (it..year_end).find(|&i| records[i].month() == start_month) {
                Some(index) => index,
                None => {
                    it = year_end;
                    continue;
                }
            };

            let mut group_year = start_year;
            let mut tail = first;
            if wraps {
                if year_end == n || records[year_end].year() != start_year + 1 {
                    it = year_end;
                    continue;
                }
                group_year = start_year + 1;
                tail = year_end;
            }

            let last = self.find_from(tail, |m| m.year() != group_year || m.month() > end_month);

            // No record past the window: accept only if the series ends inside the end month.
            let last_record = records[n - 1];
            let ends_in_end_month =
                last_record.year() == group_year && last_record.month() == end_month;
            if last == n && !ends_in_end_month {
                it = year_end;
                continue;
            }

            if last > first {
                averages.insert(group_year, self.average(first..last));
            }

            it = self.find_from(last, |m| m.year() != start_year);
        }

        averages
    }

    /// Average per month of `year`, covering only months present.
    pub fn monthly_averages(&self, year: i32) -> BTreeMap<u32, f64> {
        let mut averages = BTreeMap::new();
        let Some(start) = self.records.iter().position(|m| m.year() == year) else {
            return averages;
        };
        let year_end = self.find_from(start, |m| m.year() != year);

        let mut it = start;
        while it < year_end {
            let month = self.records[it].month();
            let last = self.find_from(it, |m| m.year() != year || m.month() != month);
            averages.insert(month, self.average(it..last));
            it = last;
        }

        averages
    }

    /// Scaled value per day of `year`-`month`, no averaging.
    pub fn daily_values(&self, year: i32, month: u32) -> BTreeMap<u32, f64> {
        self.records
            .iter()
            .skip_while(|m| m.year() != year || m.month() != month)
            .take_while(|m| m.year() == year && m.month() == month)
            .map(|m| (m.day(), m.value as f64 * self.scaling))
            .collect()
    }

    /// Index of the first record at or after `from` matching `pred`, or `len()`.
    fn find_from<P>(&self, from: usize, pred: P) -> usize
    where
        P: Fn(&Measurement) -> bool,
    {
        self.records[from..]
            .iter()
            .position(|&m| pred(m))
            .map_or(self.records.len(), |offset| from + offset)
    }

    fn average(&self, run: Range<usize>) -> f64 {
        let count = run.len();
        let sum: i64 = self.records[run].iter().map(|m| m.value as i64).sum();
        sum as f64 * self.scaling / count as f64
    }
}

fn is_month(month: u32) -> bool {
    (1..=12).contains(&month)
}
