//! Chart descriptors and the fixed five-chart dashboard.
//!
//! ```text
//!  arable land ──┬─► 1. lines 1990/2015
//!                └─► 2. grouped bars 1990 vs 2015
//!  rural %     ────► 3. lines 1990/2015
//!  rural total ─┬──► 4. log-log scatter (paired with forest area, 1990..=2015)
//!  forest area ─┘
//!  rural total ────► 5. bars 2015
//! ```

use indexmap::IndexMap;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::config::DashboardConfig;
use crate::data::filter::CountryAllowList;
use crate::data::loader::DatasetLoader;
use crate::data::model::{FilteredTable, COUNTRY_NAME_COLUMN};
use crate::data::pair::pair;
use crate::data::reshape::{melt, to_country_series, year_range};
use crate::error::Result;

/// Number of charts [`FigureAssembler::assemble`] always produces.
pub const FIGURE_COUNT: usize = 5;

/// The two snapshot years most charts compare.
pub const SNAPSHOT_YEARS: [&str; 2] = ["1990", "2015"];

const SCATTER_FIRST_YEAR: i32 = 1990;
const SCATTER_LAST_YEAR: i32 = 2015;
const LATEST_YEAR: &str = "2015";

// ---------------------------------------------------------------------------
// Descriptor types
// ---------------------------------------------------------------------------

/// One plotted series.
#[derive(Debug, Clone, PartialEq)]
pub enum TraceSpec {
    /// A country's values over the years, drawn as a line.
    Line {
        name: String,
        x: Vec<i32>,
        y: Vec<Option<f64>>,
    },
    /// One bar per country; traces sharing a chart are grouped side by side.
    Bar {
        name: String,
        x: Vec<String>,
        y: Vec<Option<f64>>,
    },
    /// Metric A against metric B for one country, drawn as markers.
    Markers {
        name: String,
        x: Vec<Option<f64>>,
        y: Vec<Option<f64>>,
    },
}

impl TraceSpec {
    /// Legend label.
    pub fn name(&self) -> &str {
        match self {
            TraceSpec::Line { name, .. }
            | TraceSpec::Bar { name, .. }
            | TraceSpec::Markers { name, .. } => name,
        }
    }

    /// Number of points, including missing ones.
    pub fn len(&self) -> usize {
        match self {
            TraceSpec::Line { y, .. } | TraceSpec::Bar { y, .. } | TraceSpec::Markers { y, .. } => {
                y.len()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// Plotly trace JSON: lines and markers are both "scatter" traces.
impl Serialize for TraceSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        match self {
            TraceSpec::Line { name, x, y } => {
                map.serialize_entry("type", "scatter")?;
                map.serialize_entry("mode", "lines")?;
                map.serialize_entry("name", name)?;
                map.serialize_entry("x", x)?;
                map.serialize_entry("y", y)?;
            }
            TraceSpec::Bar { name, x, y } => {
                map.serialize_entry("type", "bar")?;
                map.serialize_entry("name", name)?;
                map.serialize_entry("x", x)?;
                map.serialize_entry("y", y)?;
            }
            TraceSpec::Markers { name, x, y } => {
                map.serialize_entry("type", "scatter")?;
                map.serialize_entry("mode", "markers")?;
                map.serialize_entry("name", name)?;
                map.serialize_entry("x", x)?;
                map.serialize_entry("y", y)?;
            }
        }
        map.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BarMode {
    Group,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TickMode {
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisScale {
    Linear,
    Log,
}

/// Axis options; unset fields are left to the renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickmode: Option<TickMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tick0: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dtick: Option<f64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub scale: Option<AxisScale>,
}

impl Axis {
    pub fn titled(title: &str) -> Self {
        Axis {
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    /// Whether values on this axis are plotted on a log scale.
    pub fn is_log(&self) -> bool {
        self.scale == Some(AxisScale::Log)
    }
}

/// Chart-level layout options. `title` may contain `<br>` line breaks.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Layout {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barmode: Option<BarMode>,
    #[serde(rename = "xaxis")]
    pub x_axis: Axis,
    #[serde(rename = "yaxis")]
    pub y_axis: Axis,
}

/// A complete chart: traces in drawing order plus layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDescriptor {
    #[serde(rename = "data")]
    pub traces: Vec<TraceSpec>,
    pub layout: Layout,
}

impl ChartDescriptor {
    pub fn title(&self) -> &str {
        &self.layout.title
    }
}

/// Serialize charts as a JSON array of plotly figures.
pub fn to_json(charts: &[ChartDescriptor]) -> Result<String> {
    Ok(serde_json::to_string_pretty(charts)?)
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Builds the dashboard's chart list from the four indicator files.
pub struct FigureAssembler {
    config: DashboardConfig,
    loader: DatasetLoader,
}

impl FigureAssembler {
    /// Assembler restricted to the default ten countries.
    pub fn new(config: DashboardConfig) -> Self {
        let loader = DatasetLoader::new(CountryAllowList::default()).with_skip_rows(config.skip_rows);
        FigureAssembler { config, loader }
    }

    /// Assembler with a custom loader (different allow-list or preamble).
    pub fn with_loader(config: DashboardConfig, loader: DatasetLoader) -> Self {
        FigureAssembler { config, loader }
    }

    /// Produce the five charts in their fixed order. Any failure abandons
    /// the whole list.
    pub fn assemble(&self) -> Result<Vec<ChartDescriptor>> {
        let files = &self.config.datasets;
        let mut charts = Vec::with_capacity(FIGURE_COUNT);

        let arable = self.load(&files.arable_land, &SNAPSHOT_YEARS)?;
        charts.push(snapshot_lines(
            &arable,
            "Change in Hectares Arable Land <br> per Person 1990 to 2015",
        )?);
        charts.push(arable_bars(&arable)?);

        let rural_percent = self.load(&files.rural_percent, &SNAPSHOT_YEARS)?;
        charts.push(snapshot_lines(
            &rural_percent,
            "Change in Rural Population <br> (Percent of Total Population)",
        )?);

        charts.push(self.rural_vs_forest()?);

        let rural_total = self.load(&files.rural_total, &SNAPSHOT_YEARS)?;
        charts.push(latest_rural_bars(&rural_total)?);

        log::info!(
            "Assembled {} charts from {}",
            charts.len(),
            self.config.data_dir.display()
        );
        Ok(charts)
    }

    fn load<S: AsRef<str>>(&self, file_name: &str, years: &[S]) -> Result<FilteredTable> {
        let mut keep: Vec<&str> = vec![COUNTRY_NAME_COLUMN];
        for year in years {
            keep.push(year.as_ref());
        }
        self.loader.load(&self.config.dataset_path(file_name), &keep)
    }

    fn rural_vs_forest(&self) -> Result<ChartDescriptor> {
        let years = year_range(SCATTER_FIRST_YEAR, SCATTER_LAST_YEAR);
        let rural = self.load(&self.config.datasets.rural_total, &years)?;
        let forest = self.load(&self.config.datasets.forest_area, &years)?;

        let rural_series = to_country_series(&rural, &years)?;
        let forest_series = to_country_series(&forest, &years)?;
        let pairs = pair(&rural_series, &forest_series);

        let traces = rural_series
            .iter()
            .filter_map(|s| {
                let p = pairs.get(&s.country)?;
                Some(TraceSpec::Markers {
                    name: s.country.clone(),
                    x: p.first.clone(),
                    y: p.second.clone(),
                })
            })
            .collect();

        Ok(ChartDescriptor {
            traces,
            layout: Layout {
                title: "Rural Population vs Forested Area".into(),
                barmode: None,
                x_axis: Axis {
                    tickmode: Some(TickMode::Linear),
                    scale: Some(AxisScale::Log),
                    ..Axis::titled("Rural Population")
                },
                y_axis: Axis {
                    scale: Some(AxisScale::Log),
                    ..Axis::titled("Forested Area")
                },
            },
        })
    }
}

/// Per-country lines over the two snapshot years.
fn snapshot_lines(table: &FilteredTable, title: &str) -> Result<ChartDescriptor> {
    let traces = to_country_series(table, &SNAPSHOT_YEARS)?
        .into_iter()
        .map(|s| TraceSpec::Line {
            name: s.country,
            x: s.years,
            y: s.values,
        })
        .collect();

    Ok(ChartDescriptor {
        traces,
        layout: Layout {
            title: title.into(),
            barmode: None,
            x_axis: Axis {
                tickmode: Some(TickMode::Linear),
                tick0: Some(1990.0),
                dtick: Some(25.0),
                ..Axis::titled("Year")
            },
            y_axis: Axis::titled("Percent"),
        },
    })
}

fn arable_bars(table: &FilteredTable) -> Result<ChartDescriptor> {
    Ok(ChartDescriptor {
        traces: bar_traces(table, &SNAPSHOT_YEARS)?,
        layout: Layout {
            title: "Hectares Arable Land per Person".into(),
            barmode: Some(BarMode::Group),
            x_axis: Axis::default(),
            y_axis: Axis::titled("Hectares per person"),
        },
    })
}

fn latest_rural_bars(table: &FilteredTable) -> Result<ChartDescriptor> {
    Ok(ChartDescriptor {
        traces: bar_traces(table, &[LATEST_YEAR])?,
        layout: Layout {
            title: "Total Rural Population by Country".into(),
            barmode: None,
            x_axis: Axis::default(),
            y_axis: Axis::titled("Rural Population"),
        },
    })
}

/// One bar trace per year label, countries on the x axis in table order.
fn bar_traces(table: &FilteredTable, labels: &[&str]) -> Result<Vec<TraceSpec>> {
    let mut groups: IndexMap<&str, (Vec<String>, Vec<Option<f64>>)> = labels
        .iter()
        .map(|label| (*label, (Vec::new(), Vec::new())))
        .collect();

    for record in melt(table, labels)? {
        if let Some((x, y)) = groups.get_mut(record.variable.as_str()) {
            x.push(record.country);
            y.push(record.value);
        }
    }

    Ok(groups
        .into_iter()
        .map(|(label, (x, y))| TraceSpec::Bar {
            name: label.to_string(),
            x,
            y,
        })
        .collect())
}
