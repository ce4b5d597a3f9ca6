use crate::types::{ChartSpec, RawTableHeaders, RawTableRow, Theme, TickFormat, Viewport};
use crate::util::{format_crore, format_int, short_month_label};
use serde::Serialize;
use std::path::Path;
use tabled::{builder::Builder, settings::Style, Table, Tabled};

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

/// Raw table rows have one column per month, so the header is built from the
/// dataset's month labels and captions rather than derived.
pub fn write_raw_csv(
    path: &Path,
    months: &[String],
    headers: &RawTableHeaders,
    rows: &[RawTableRow],
) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    let mut header = vec!["Team".to_string()];
    header.extend(raw_header(months, headers));
    wtr.write_record(header)?;
    for r in rows {
        let mut record = vec![r.team.clone(), r.serial.to_string(), r.authority.clone()];
        // Cells are pre-formatted for display; strip separators for CSV.
        record.extend(r.monthly.iter().map(|v| v.replace(',', "")));
        record.push(r.cumulative_current.replace(',', ""));
        record.push(r.cumulative_prior.replace(',', ""));
        record.push(r.growth.clone());
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

fn raw_header(months: &[String], headers: &RawTableHeaders) -> Vec<String> {
    let mut header = vec![headers.serial.clone(), headers.authority.clone()];
    header.extend(months.iter().cloned());
    header.push(headers.cumulative_current.clone());
    header.push(headers.cumulative_prior.clone());
    header.push(headers.growth.clone());
    header
}

fn styled(mut table: Table, theme: Theme) -> String {
    match theme {
        Theme::Light => table.with(Style::markdown()).to_string(),
        Theme::Dark => table.with(Style::rounded()).to_string(),
    }
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize, theme: Theme)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    println!("{}\n", styled(Table::new(slice), theme));
}

/// Print one team's block of the raw table.
pub fn preview_raw_table(
    team: &str,
    months: &[String],
    headers: &RawTableHeaders,
    rows: &[RawTableRow],
    viewport: Viewport,
    theme: Theme,
) {
    println!("{}", team);
    let months: Vec<String> = if viewport.is_mobile() {
        months.iter().map(|m| short_month_label(m)).collect()
    } else {
        months.to_vec()
    };
    let mut builder = Builder::default();
    builder.push_record(raw_header(&months, headers));
    for r in rows.iter().filter(|r| r.team == team) {
        let mut record = vec![r.serial.to_string(), r.authority.clone()];
        record.extend(r.monthly.iter().cloned());
        record.push(r.cumulative_current.clone());
        record.push(r.cumulative_prior.clone());
        record.push(r.growth.clone());
        builder.push_record(record);
    }
    println!("{}\n", styled(builder.build(), theme));
}

/// Text rendering of a chart: one row per label, one column per fiscal year.
pub fn preview_chart(chart: &ChartSpec, theme: Theme) {
    println!("{} [{:?}]", chart.title, chart.kind);
    let mut builder = Builder::default();
    let mut header = vec![chart.x_axis.title.clone()];
    header.extend(chart.datasets.iter().map(|s| s.label.clone()));
    builder.push_record(header);
    for (i, label) in chart.labels.iter().enumerate() {
        let mut record = vec![label.clone()];
        for series in &chart.datasets {
            let cell = series
                .data
                .get(i)
                .map(|v| match chart.y_axis.tick_format {
                    TickFormat::Crore => format_crore(*v),
                    TickFormat::Plain => format_int(*v),
                })
                .unwrap_or_default();
            record.push(cell);
        }
        builder.push_record(record);
    }
    println!("{}", styled(builder.build(), theme));
    println!("Growth: {}%\n", chart.growth);
}
