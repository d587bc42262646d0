use crate::compilation::CompiledGraph;
use chrono::NaiveDate;
use polars::prelude::PlSmallStr;
use polars::prelude::*;

fn date_to_i32(date: NaiveDate) -> i32 {
    date.signed_duration_since(NaiveDate::default()).num_days() as i32
}

fn id_list_column(name: &'static str, rows: Vec<Vec<i32>>) -> Series {
    let lists: ListChunked = rows
        .into_iter()
        .map(|ids| Series::new(PlSmallStr::from_static(""), ids))
        .collect();
    lists.into_series().with_name(PlSmallStr::from_static(name))
}

fn date_column(name: &'static str, dates: Vec<Option<NaiveDate>>) -> PolarsResult<Series> {
    let days: Vec<Option<i32>> = dates.into_iter().map(|d| d.map(date_to_i32)).collect();
    Series::new(PlSmallStr::from_static(name), days).cast(&DataType::Date)
}

/// One row per compiled activity in id order: offsets, floats, criticality
/// and the calendar dates they map to.
///
/// Fails on an invalid graph, which has no schedule to report.
pub fn schedule_dataframe(compiled: &CompiledGraph) -> PolarsResult<DataFrame> {
    if let Some(err) = compiled.error() {
        return Err(PolarsError::ComputeError(
            format!("cannot report an invalid network: {err}").into(),
        ));
    }

    let activities = compiled.activities();
    let height = activities.len();
    let mut ids: Vec<i32> = Vec::with_capacity(height);
    let mut names: Vec<&str> = Vec::with_capacity(height);
    let mut durations: Vec<i64> = Vec::with_capacity(height);
    let mut dummies: Vec<bool> = Vec::with_capacity(height);
    let mut predecessors: Vec<Vec<i32>> = Vec::with_capacity(height);
    let mut successors: Vec<Vec<i32>> = Vec::with_capacity(height);
    let mut es: Vec<Option<i64>> = Vec::with_capacity(height);
    let mut ef: Vec<Option<i64>> = Vec::with_capacity(height);
    let mut ls: Vec<Option<i64>> = Vec::with_capacity(height);
    let mut lf: Vec<Option<i64>> = Vec::with_capacity(height);
    let mut free_float: Vec<Option<i64>> = Vec::with_capacity(height);
    let mut total_float: Vec<Option<i64>> = Vec::with_capacity(height);
    let mut critical: Vec<bool> = Vec::with_capacity(height);
    let mut start_dates: Vec<Option<NaiveDate>> = Vec::with_capacity(height);
    let mut finish_dates: Vec<Option<NaiveDate>> = Vec::with_capacity(height);

    for dependent in activities {
        let id = dependent.id();
        let timing = dependent.timing;
        ids.push(id);
        names.push(dependent.activity.name.as_str());
        durations.push(dependent.duration());
        dummies.push(dependent.is_dummy());
        predecessors.push(dependent.predecessors.clone());
        successors.push(dependent.successors.clone());
        es.push(timing.map(|t| t.earliest_start));
        ef.push(timing.map(|t| t.earliest_finish));
        ls.push(timing.map(|t| t.latest_start));
        lf.push(timing.map(|t| t.latest_finish));
        free_float.push(timing.map(|t| t.free_float));
        total_float.push(timing.map(|t| t.total_float));
        critical.push(dependent.is_critical());
        start_dates.push(compiled.earliest_start_date(id));
        finish_dates.push(compiled.earliest_finish_date(id));
    }

    let columns: Vec<Column> = vec![
        Series::new(PlSmallStr::from_static("id"), ids).into_column(),
        Series::new(PlSmallStr::from_static("name"), names).into_column(),
        Series::new(PlSmallStr::from_static("duration"), durations).into_column(),
        Series::new(PlSmallStr::from_static("is_dummy"), dummies).into_column(),
        id_list_column("predecessors", predecessors).into_column(),
        id_list_column("successors", successors).into_column(),
        Series::new(PlSmallStr::from_static("earliest_start"), es).into_column(),
        Series::new(PlSmallStr::from_static("earliest_finish"), ef).into_column(),
        Series::new(PlSmallStr::from_static("latest_start"), ls).into_column(),
        Series::new(PlSmallStr::from_static("latest_finish"), lf).into_column(),
        Series::new(PlSmallStr::from_static("free_float"), free_float).into_column(),
        Series::new(PlSmallStr::from_static("total_float"), total_float).into_column(),
        Series::new(PlSmallStr::from_static("is_critical"), critical).into_column(),
        date_column("earliest_start_date", start_dates)?.into_column(),
        date_column("earliest_finish_date", finish_dates)?.into_column(),
    ];

    DataFrame::new(columns)
}
