//! Derived bare anode columns
//!
//! This module synthesizes the fixed set of bare anode aggregate columns from
//! individual sensor channels. `Bare Anode B7 (REC.1)` mirrors `B7`; the others
//! are row-wise sums of the source channels that exist in the combined series.
//! When none of a column's sources exist the column is filled with zeros.

use strum::{AsRefStr, EnumIter, IntoEnumIterator};

use crate::state::{Column, Series};

/// The derived aggregate columns, in synthesis order
#[derive(AsRefStr, Clone, Copy, Debug, EnumIter, PartialEq, Eq, Hash)]
pub enum DerivedColumn {
    #[strum(serialize = "Bare Anode B7 (REC.1)")]
    BareAnodeRec1,
    #[strum(serialize = "Total Left Bare Anode (L6+B4)")]
    LeftBareAnode,
    #[strum(serialize = "Total Right Bare Anode (R6+R8)")]
    RightBareAnode,
    #[strum(serialize = "Total Bottom Bare Anode (B2+B3+L8+L10+L12)")]
    BottomBareAnode,
    #[strum(serialize = "Overall Bare Anode")]
    OverallBareAnode,
}

impl DerivedColumn {
    /// Column name as it appears in the series
    pub fn name(&self) -> &'static str {
        match self {
            DerivedColumn::BareAnodeRec1 => "Bare Anode B7 (REC.1)",
            DerivedColumn::LeftBareAnode => "Total Left Bare Anode (L6+B4)",
            DerivedColumn::RightBareAnode => "Total Right Bare Anode (R6+R8)",
            DerivedColumn::BottomBareAnode => "Total Bottom Bare Anode (B2+B3+L8+L10+L12)",
            DerivedColumn::OverallBareAnode => "Overall Bare Anode",
        }
    }

    /// Sensor channels summed into this column
    pub fn sources(&self) -> &'static [&'static str] {
        match self {
            DerivedColumn::BareAnodeRec1 => &["B7"],
            DerivedColumn::LeftBareAnode => &["L6", "B4"],
            DerivedColumn::RightBareAnode => &["R6", "R8"],
            DerivedColumn::BottomBareAnode => &["B2", "B3", "L8", "L10", "L12"],
            DerivedColumn::OverallBareAnode => {
                &["B7", "L6", "B4", "R6", "R8", "B2", "B3", "L8", "L10", "L12"]
            }
        }
    }

    pub fn all() -> impl Iterator<Item = DerivedColumn> {
        DerivedColumn::iter()
    }

    /// Values of this column for every row of the series.
    ///
    /// A single-source column copies its source, absent readings included.
    /// Multi-source columns sum the present readings; a row with none gives 0.
    /// A column whose sources are all missing from the series is all zeros.
    pub fn compute(&self, series: &Series) -> Vec<Option<f64>> {
        let available: Vec<&Column> = self
            .sources()
            .iter()
            .filter_map(|name| series.column(name))
            .collect();

        match available.as_slice() {
            [] => {
                tracing::debug!("{}: no source channels present, using zeros", self.name());
                vec![Some(0.0); series.len()]
            }
            [only] if self.sources().len() == 1 => only.values.clone(),
            _ => (0..series.len())
                .map(|row| {
                    Some(
                        available
                            .iter()
                            .filter_map(|c| c.values[row])
                            .fold(0.0, |sum, v| sum + v),
                    )
                })
                .collect(),
        }
    }
}

/// Add every derived column to the series, in fixed order
pub fn synthesize(series: &mut Series) {
    for derived in DerivedColumn::all() {
        let values = derived.compute(series);
        series.set_column(Column::new(derived.name(), values));
    }
}
