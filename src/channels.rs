//! Column classification for the combined series.
//!
//! Known column names are classified through an explicit table. The legacy
//! "contains `Total`" rule only applies to names the table does not know,
//! so free-form totals from other logger configurations still land in the
//! fixed set.

use regex::Regex;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::computed::DerivedColumn;
use crate::state::Series;

/// How a column takes part in summaries and charts
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnClass {
    /// One of the synthesized bare anode columns
    Derived(DerivedColumn),
    /// A rectifier or zone total written by the logger
    KnownTotal,
    /// Unrecognized name that contains "Total"
    LegacyTotal,
    /// A sensor channel the user may pick
    Selectable,
    /// Timestamp parts and alarm flags
    Excluded,
}

impl ColumnClass {
    /// Fixed columns are always summarized and charted
    pub fn is_fixed(&self) -> bool {
        matches!(
            self,
            ColumnClass::Derived(_) | ColumnClass::KnownTotal | ColumnClass::LegacyTotal
        )
    }
}

/// Totals written by the logger. "Rigth" is how the logger spells it.
pub const KNOWN_TOTALS: &[&str] = &[
    "Total",
    "Total REC.1",
    "Total REC.2",
    "Total Left",
    "Total Right",
    "Total Bottom",
    "Total Left 1",
    "Total Bottom 1",
    "Total Rigth 1",
    "Total Left 2",
    "Total Bottom 2",
    "Total Rigth 2",
];

/// Columns never offered for summaries or selection
pub const EXCLUDED_COLUMNS: &[&str] = &["DATE", "TIME", "Enable Alarm Rec.1", "Enable Alarm Rec.2"];

const LEGACY_TOTAL_MARKER: &str = "Total";
const BARE_ANODE_MARKER: &str = "Bare Anode";
const RECTIFIER_MARKER: &str = "REC";

static CLASSIFICATION: LazyLock<HashMap<&'static str, ColumnClass>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    for derived in DerivedColumn::all() {
        map.insert(derived.name(), ColumnClass::Derived(derived));
    }
    for name in KNOWN_TOTALS {
        map.insert(*name, ColumnClass::KnownTotal);
    }
    for name in EXCLUDED_COLUMNS {
        map.insert(*name, ColumnClass::Excluded);
    }
    map
});

/// Short sensor code: letters followed by a number, e.g. `L6`, `B12`
static SENSOR_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?<prefix>[A-Za-z]{1,3})(?<number>\d+)$").expect("valid regex"));

/// Classify a column name
pub fn classify(name: &str) -> ColumnClass {
    if let Some(class) = CLASSIFICATION.get(name) {
        return *class;
    }
    if name.contains(LEGACY_TOTAL_MARKER) && !name.contains(BARE_ANODE_MARKER) {
        return ColumnClass::LegacyTotal;
    }
    ColumnClass::Selectable
}

/// Split a sensor code into its letter prefix and number
fn sensor_code_parts(name: &str) -> Option<(String, u32)> {
    let caps = SENSOR_CODE.captures(name)?;
    let number = caps["number"].parse().ok()?;
    Some((caps["prefix"].to_uppercase(), number))
}

/// Order channel names: sensor codes first in natural order (`L2` before
/// `L10`), then everything else alphabetically
pub fn sort_channels(names: &mut [String]) {
    names.sort_by(|a, b| match (sensor_code_parts(a), sensor_code_parts(b)) {
        (Some(pa), Some(pb)) => pa.cmp(&pb),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.to_lowercase().cmp(&b.to_lowercase()),
    });
}

/// Numeric columns partitioned for the presentation layer
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ColumnSets {
    /// Always summarized: logger totals in series order, then derived columns
    pub fixed: Vec<String>,
    /// Offered for user selection
    pub selectable: Vec<String>,
}

impl ColumnSets {
    pub fn is_selectable(&self, name: &str) -> bool {
        self.selectable.iter().any(|c| c == name)
    }
}

/// Partition the columns of a series into fixed and selectable sets
pub fn partition(series: &Series) -> ColumnSets {
    let mut totals = Vec::new();
    let mut derived = Vec::new();
    let mut selectable = Vec::new();

    for column in series.columns() {
        match classify(&column.name) {
            ColumnClass::Derived(d) => derived.push(d),
            ColumnClass::KnownTotal | ColumnClass::LegacyTotal => totals.push(column.name.clone()),
            ColumnClass::Selectable => selectable.push(column.name.clone()),
            ColumnClass::Excluded => {}
        }
    }

    // Derived columns follow their synthesis order regardless of series order
    let mut fixed = totals;
    fixed.extend(
        DerivedColumn::all()
            .filter(|d| derived.contains(d))
            .map(|d| d.name().to_string()),
    );

    sort_channels(&mut selectable);

    ColumnSets { fixed, selectable }
}

/// Order fixed columns for the summary table: rectifier columns, then bare
/// anode columns, then the remaining totals
pub fn summary_order(fixed: &[String]) -> Vec<String> {
    fn is_rectifier(name: &str) -> bool {
        name.contains(RECTIFIER_MARKER) || name == "Total"
    }
    fn is_bare_anode(name: &str) -> bool {
        name.contains(BARE_ANODE_MARKER)
    }

    let rectifier = fixed.iter().filter(|c| is_rectifier(c.as_str()));
    let bare_anode = fixed
        .iter()
        .filter(|c| !is_rectifier(c.as_str()) && is_bare_anode(c.as_str()));
    let other = fixed
        .iter()
        .filter(|c| !is_rectifier(c.as_str()) && !is_bare_anode(c.as_str()));

    rectifier.chain(bare_anode).chain(other).cloned().collect()
}

/// A titled set of fixed columns drawn on one chart
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartGroup {
    pub title: &'static str,
    pub columns: Vec<String>,
}

const CHART_GROUPS: &[(&str, &[&str])] = &[
    (
        "Overall Bath (By Rectifier Zone)",
        &["Total", "Total REC.1", "Total REC.2"],
    ),
    (
        "Overall Bath (By Side)",
        &["Total Left", "Total Right", "Total Bottom"],
    ),
    (
        "REC1 Zone",
        &["Total Left 1", "Total Bottom 1", "Total Rigth 1"],
    ),
    (
        "REC2 Zone",
        &["Total Left 2", "Total Bottom 2", "Total Rigth 2"],
    ),
];

const BARE_ANODE_GROUP: &str = "Bare Anode Totals";

/// Group fixed columns for charting. Groups with no present column are omitted.
pub fn chart_groups(fixed: &[String]) -> Vec<ChartGroup> {
    let present = |name: &str| fixed.iter().any(|c| c == name);

    let mut groups: Vec<ChartGroup> = CHART_GROUPS
        .iter()
        .map(|&(title, members)| ChartGroup {
            title,
            columns: members
                .iter()
                .copied()
                .filter(|m| present(*m))
                .map(str::to_string)
                .collect(),
        })
        .collect();

    groups.push(ChartGroup {
        title: BARE_ANODE_GROUP,
        columns: DerivedColumn::all()
            .map(|d| d.name())
            .filter(|n| present(*n))
            .map(str::to_string)
            .collect(),
    });

    groups.retain(|g| !g.columns.is_empty());
    groups
}
