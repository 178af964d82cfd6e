//! Composition of the per-metric series into chart groups.

use tracing::debug;

use crate::pipeline::diff::to_incremental;
use crate::pipeline::dose::cumulative_doses;
use crate::pipeline::series::{
    build_series, drop_missing, first_count, first_discharged, first_inpatients,
};
use crate::pipeline::sma::{WEEK, sma};
use crate::pipeline::types::{AxisId, MetricGroup, Point, Series, SeriesStyle};
use crate::records::DoseStatus;
use crate::regions::Region;
use crate::store::RecordStore;

const fn style(
    label: &'static str,
    color: &'static str,
    border_color: &'static str,
    point_radius: u8,
) -> SeriesStyle {
    SeriesStyle {
        label,
        color,
        border_color,
        point_radius,
    }
}

/// Presentation of one smoothed metric: its axis, the raw line and the 7-day line.
struct SmoothedMetric {
    axis: AxisId,
    title: &'static str,
    raw: SeriesStyle,
    smoothed: SeriesStyle,
}

const NEW_CASES: SmoothedMetric = SmoothedMetric {
    axis: AxisId::NewCases,
    title: "新規陽性者数",
    raw: style("新規陽性者数", "green", "rgba(0,128,0,0.3)", 2),
    smoothed: style("新規陽性者数(7日間移動平均)", "lime", "rgba(0,255,0,0.8)", 0),
};

const SEVERE: SmoothedMetric = SmoothedMetric {
    axis: AxisId::Severe,
    title: "重症者数",
    raw: style("重症者数", "purple", "rgba(128,0,128,0.3)", 2),
    smoothed: style("重症者数(7日間移動平均)", "magenta", "rgba(255,0,255,0.8)", 0),
};

const DEATHS: SmoothedMetric = SmoothedMetric {
    axis: AxisId::Deaths,
    title: "死者数",
    raw: style("死者数", "orangered", "rgba(255,69,0,0.3)", 2),
    smoothed: style("死者数(7日間移動平均)", "red", "rgba(255,0,0,0.8)", 0),
};

const INPATIENTS: SmoothedMetric = SmoothedMetric {
    axis: AxisId::Inpatient,
    title: "入院治療等を要する者等",
    raw: style(
        "入院治療等を要する者等",
        "rgb(230, 230, 0)",
        "rgba(180,180,0,0.3)",
        2,
    ),
    smoothed: style(
        "入院治療等を要する者等(7日間移動平均)",
        "yellow",
        "rgba(255,255,0,0.8)",
        0,
    ),
};

const DISCHARGED: SmoothedMetric = SmoothedMetric {
    axis: AxisId::Discharged,
    title: "退院及び療養解除者数",
    raw: style("退院及び療養解除者数", "darkblue", "rgba(0,0,128,0.3)", 2),
    smoothed: style(
        "退院及び療養解除者数(7日間移動平均)",
        "blue",
        "rgba(0,0,255,0.8)",
        0,
    ),
};

const DOSES_TITLE: &str = "ワクチン接種回数";
const FIRST_DOSES: SeriesStyle = style(
    "ワクチン接種回数(1回目)",
    "darkgray",
    "rgba(128,128,128,0.3)",
    2,
);
const SECOND_DOSES: SeriesStyle = style(
    "ワクチン接種回数(2回目)",
    "darkgray",
    "rgba(128,128,128,0.3)",
    2,
);

impl SmoothedMetric {
    fn group(&self, raw: Vec<Point>) -> MetricGroup {
        let smoothed = sma(&raw, WEEK);
        MetricGroup {
            axis_id: self.axis,
            title: self.title,
            series: vec![Series::new(self.raw, raw), Series::new(self.smoothed, smoothed)],
        }
    }
}

/// Builds every chart group for `region`, in axis order.
///
/// Each counter is paired with its 7-day moving average. Deaths and
/// discharges are published as running totals and are differenced first.
/// Raw counter series omit days whose cell is missing, so those days are
/// absent from the raw line and from its average. Doses are shown as running
/// totals per dose status. A region without data yields groups whose series
/// are empty.
#[tracing::instrument(skip_all, fields(region = region.case_key()))]
pub fn assemble(store: &RecordStore, region: Region) -> Vec<MetricGroup> {
    let key = region.case_key();

    let new_cases = drop_missing(build_series(&store.new_cases, key, first_count));
    let severe = drop_missing(build_series(&store.severe_cases, key, first_count));
    let deaths = to_incremental(&build_series(&store.deaths, key, first_count));
    let inpatients = drop_missing(build_series(&store.inpatients, key, first_inpatients));
    let discharged = to_incremental(&build_series(&store.inpatients, key, first_discharged));

    let code = region.dose_code();
    let doses = MetricGroup {
        axis_id: AxisId::Doses,
        title: DOSES_TITLE,
        series: vec![
            Series::new(
                FIRST_DOSES,
                cumulative_doses(&store.doses, code, DoseStatus::First),
            ),
            Series::new(
                SECOND_DOSES,
                cumulative_doses(&store.doses, code, DoseStatus::Second),
            ),
        ],
    };

    let groups = vec![
        NEW_CASES.group(new_cases),
        SEVERE.group(severe),
        DEATHS.group(deaths),
        INPATIENTS.group(inpatients),
        DISCHARGED.group(discharged),
        doses,
    ];

    debug!(
        points = groups
            .iter()
            .flat_map(|g| &g.series)
            .map(|s| s.points.len())
            .sum::<usize>(),
        "Assembled chart groups"
    );
    groups
}
