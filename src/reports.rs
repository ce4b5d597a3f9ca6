use crate::metrics::{growth_display, pie_shares, project, projected_total};
use crate::types::{
    AxisSpec, ChartKind, ChartSpec, Dataset, FiscalYear, GrowthSummaryRow, MonthlySeries,
    PieShareRow, PieSpec, RawTableRow, RenderContext, SeriesSpec, TickFormat, ViewMode, Viewport,
    YearPair,
};
use crate::util::{format_int, short_month_label, short_year_label};

pub const CURRENT_YEAR_COLOR: &str = "#3b82f6";
pub const PRIOR_YEAR_COLOR: &str = "#ef4444";
pub const PIE_COLORS: [&str; 5] = ["#3b82f6", "#ef4444", "#10b981", "#f59e0b", "#8b5cf6"];

/// X-axis labels for a chart in the given mode.
///
/// Cumulative-to-pivot charts stop at the pivot month, raw-mode charts span
/// the whole year, and the pivot-only chart has a single label.
pub fn chart_labels(dataset: &Dataset, mode: ViewMode, viewport: Viewport) -> Vec<String> {
    let pivot = dataset.pivot_index();
    let months: &[String] = match mode {
        ViewMode::PivotOnly => return vec![dataset.pivot_month.clone()],
        ViewMode::CumulativeToPivot => &dataset.months[..=pivot],
        ViewMode::Raw => &dataset.months,
    };
    months
        .iter()
        .map(|m| {
            if viewport.is_mobile() {
                short_month_label(m)
            } else {
                m.clone()
            }
        })
        .collect()
}

fn series_spec(label: &str, data: Vec<u64>, color: &str, mode: ViewMode) -> SeriesSpec {
    let bar = mode == ViewMode::PivotOnly;
    SeriesSpec {
        label: label.to_string(),
        data,
        border_color: color.to_string(),
        background_color: bar.then(|| color.to_string()),
        fill: false,
        point_radius: if bar { 0 } else { 5 },
        point_hover_radius: if bar { 0 } else { 7 },
    }
}

fn build_chart(
    title: String,
    series: &YearPair<MonthlySeries>,
    dataset: &Dataset,
    ctx: &RenderContext,
) -> ChartSpec {
    let pivot = dataset.pivot_index();
    let kind = if ctx.mode == ViewMode::PivotOnly {
        ChartKind::Bar
    } else {
        ChartKind::Line
    };
    let datasets = vec![
        series_spec(
            dataset.year_label(FiscalYear::Current),
            project(&series.current, ctx.mode, pivot),
            CURRENT_YEAR_COLOR,
            ctx.mode,
        ),
        series_spec(
            dataset.year_label(FiscalYear::Prior),
            project(&series.prior, ctx.mode, pivot),
            PRIOR_YEAR_COLOR,
            ctx.mode,
        ),
    ];
    let growth = growth_display(&series.current, &series.prior, ctx.mode, pivot);
    log::debug!("{}: {:?} chart, growth {}", title, kind, growth);
    ChartSpec {
        title,
        kind,
        labels: chart_labels(dataset, ctx.mode, ctx.viewport),
        datasets,
        growth,
        x_axis: AxisSpec {
            title: match kind {
                ChartKind::Line => "Months".to_string(),
                ChartKind::Bar => "Month".to_string(),
            },
            tick_format: TickFormat::Plain,
        },
        y_axis: AxisSpec {
            title: "Collection (CR)".to_string(),
            tick_format: if ctx.viewport.is_mobile() {
                TickFormat::Crore
            } else {
                TickFormat::Plain
            },
        },
        palette: ctx.theme.palette(),
    }
}

pub fn generate_all_teams_chart(dataset: &Dataset, ctx: &RenderContext) -> ChartSpec {
    build_chart(
        "All Teams Collection (CR)".to_string(),
        &dataset.all_teams,
        dataset,
        ctx,
    )
}

pub fn generate_team_charts(dataset: &Dataset, ctx: &RenderContext) -> Vec<ChartSpec> {
    dataset
        .teams
        .iter()
        .map(|team| build_chart(format!("{} Collection (CR)", team.name), &team.series, dataset, ctx))
        .collect()
}

/// Per-team values a pie slice is sized by: the pivot-month collection in
/// pivot-only mode, otherwise the precomputed contribution for the year.
pub fn team_contributions(dataset: &Dataset, year: FiscalYear, mode: ViewMode) -> Vec<(String, u64)> {
    let pivot = dataset.pivot_index();
    dataset
        .teams
        .iter()
        .map(|team| {
            let value = match mode {
                ViewMode::PivotOnly => team.series.get(year).value_at(pivot),
                ViewMode::Raw | ViewMode::CumulativeToPivot => *team.contribution.get(year),
            };
            (team.name.clone(), value)
        })
        .collect()
}

pub fn generate_pie_chart(dataset: &Dataset, year: FiscalYear, ctx: &RenderContext) -> PieSpec {
    let values = team_contributions(dataset, year, ctx.mode);
    let shares = pie_shares(&values);
    let slice_labels = shares
        .iter()
        .map(|(team, share)| format!("{}\n{:.1}%", team, share))
        .collect();
    PieSpec {
        title: format!(
            "Team Contribution {} (%)",
            short_year_label(dataset.year_label(year))
        ),
        labels: shares.iter().map(|(team, _)| team.clone()).collect(),
        data: values.iter().map(|(_, v)| *v).collect(),
        shares: shares.iter().map(|(_, s)| *s).collect(),
        slice_labels,
        background_color: (0..values.len())
            .map(|i| PIE_COLORS[i % PIE_COLORS.len()].to_string())
            .collect(),
        show_slice_labels: !ctx.viewport.is_mobile(),
        label_color: ctx.theme.palette().text.to_string(),
    }
}

pub fn pie_rows(pie: &PieSpec) -> Vec<PieShareRow> {
    pie.labels
        .iter()
        .zip(&pie.data)
        .zip(&pie.shares)
        .map(|((team, value), share)| PieShareRow {
            team: team.clone(),
            collection: format_int(*value),
            share: format!("{:.1}", share),
        })
        .collect()
}

/// Authority rows of the raw data table, team by team. The cumulative and
/// growth cells are the dataset's precomputed values, shown verbatim.
pub fn generate_raw_table(dataset: &Dataset) -> Vec<RawTableRow> {
    let mut rows = Vec::new();
    for team in &dataset.teams {
        for (i, auth) in team.authorities.iter().enumerate() {
            rows.push(RawTableRow {
                team: team.name.clone(),
                serial: i + 1,
                authority: auth.name.clone(),
                monthly: auth
                    .series
                    .current
                    .as_slice()
                    .iter()
                    .map(|v| format_int(*v))
                    .collect(),
                cumulative_current: format_int(auth.cumulative_current),
                cumulative_prior: format_int(auth.cumulative_prior),
                growth: auth.growth.clone(),
            });
        }
    }
    rows
}

/// Comparison totals and growth for all teams and then each team.
pub fn generate_summary(dataset: &Dataset, mode: ViewMode) -> Vec<GrowthSummaryRow> {
    let pivot = dataset.pivot_index();
    let row = |name: &str, series: &YearPair<MonthlySeries>| GrowthSummaryRow {
        team: name.to_string(),
        current_total: format_int(projected_total(&series.current, mode, pivot)),
        prior_total: format_int(projected_total(&series.prior, mode, pivot)),
        growth: growth_display(&series.current, &series.prior, mode, pivot),
    };
    std::iter::once(row("All Teams", &dataset.all_teams))
        .chain(dataset.teams.iter().map(|t| row(&t.name, &t.series)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_embedded;
    use crate::types::Theme;

    fn dataset() -> Dataset {
        load_embedded().unwrap().0
    }

    fn ctx(mode: ViewMode, viewport: Viewport) -> RenderContext {
        RenderContext {
            mode,
            viewport,
            theme: Theme::Light,
        }
    }

    #[test]
    fn upto_chart_runs_april_to_january() {
        let d = dataset();
        let chart = generate_all_teams_chart(&d, &ctx(ViewMode::CumulativeToPivot, Viewport::Desktop));
        assert_eq!(chart.kind, ChartKind::Line);
        assert_eq!(chart.labels.len(), 10);
        assert_eq!(chart.labels.first().map(String::as_str), Some("April"));
        assert_eq!(chart.labels.last().map(String::as_str), Some("January"));
        assert!(chart.datasets.iter().all(|s| s.data.len() == 10));
        assert_eq!(chart.datasets[0].label, "2024-2025");
        assert_eq!(chart.datasets[1].label, "2023-2024");
        assert_eq!(chart.growth, "19.18");
        assert_eq!(chart.y_axis.tick_format, TickFormat::Plain);
    }

    #[test]
    fn month_chart_is_a_single_bar() {
        let d = dataset();
        let chart = generate_all_teams_chart(&d, &ctx(ViewMode::PivotOnly, Viewport::Desktop));
        assert_eq!(chart.kind, ChartKind::Bar);
        assert_eq!(chart.labels, vec!["January".to_string()]);
        assert_eq!(chart.datasets[0].data, vec![d.all_teams.current.value_at(9)]);
        assert_eq!(chart.datasets[0].background_color.as_deref(), Some(CURRENT_YEAR_COLOR));
        assert_eq!(chart.datasets[1].point_radius, 0);
        assert_eq!(chart.x_axis.title, "Month");
        assert_eq!(chart.growth, "14.26");
    }

    #[test]
    fn raw_mode_chart_covers_whole_year() {
        let d = dataset();
        let chart = generate_all_teams_chart(&d, &ctx(ViewMode::Raw, Viewport::Desktop));
        assert_eq!(chart.labels.len(), 12);
        assert!(chart.datasets.iter().all(|s| s.data.len() == 12));
        assert_eq!(chart.growth, "0.49");
    }

    #[test]
    fn mobile_uses_short_labels_and_crore_ticks() {
        let d = dataset();
        let chart = generate_all_teams_chart(&d, &ctx(ViewMode::CumulativeToPivot, Viewport::Mobile));
        assert_eq!(chart.labels[0], "Apr");
        assert_eq!(chart.labels[9], "Jan");
        assert_eq!(chart.y_axis.tick_format, TickFormat::Crore);

        let pie = generate_pie_chart(&d, FiscalYear::Current, &ctx(ViewMode::CumulativeToPivot, Viewport::Mobile));
        assert!(!pie.show_slice_labels);
    }

    #[test]
    fn one_chart_per_team() {
        let d = dataset();
        let charts = generate_team_charts(&d, &ctx(ViewMode::CumulativeToPivot, Viewport::Desktop));
        assert_eq!(charts.len(), d.teams.len());
        assert_eq!(charts[0].title, "Team 1 Collection (CR)");
        assert_eq!(charts[0].growth, "23.62");
    }

    #[test]
    fn pie_uses_contributions_or_pivot_month() {
        let d = dataset();
        let upto = generate_pie_chart(&d, FiscalYear::Current, &ctx(ViewMode::CumulativeToPivot, Viewport::Desktop));
        assert_eq!(upto.title, "Team Contribution 2024-25 (%)");
        assert_eq!(upto.shares, vec![35.0, 18.3, 12.9, 19.8, 14.1]);
        assert_eq!(upto.slice_labels[0], "Team 1\n35.0%");
        let rows = pie_rows(&upto);
        assert_eq!(rows[0].share, "35.0");
        assert_eq!(rows[1].share, "18.3");
        assert_eq!(upto.background_color.len(), 5);

        let month = generate_pie_chart(&d, FiscalYear::Prior, &ctx(ViewMode::PivotOnly, Viewport::Desktop));
        assert_eq!(month.title, "Team Contribution 2023-24 (%)");
        assert_eq!(month.data[0], d.teams[0].series.prior.value_at(9));
        assert_eq!(month.shares, vec![38.0, 14.1, 10.3, 25.3, 12.3]);
    }

    #[test]
    fn pie_shares_sum_to_about_one_hundred() {
        let d = dataset();
        for mode in [ViewMode::CumulativeToPivot, ViewMode::PivotOnly] {
            for year in FiscalYear::ALL {
                let pie = generate_pie_chart(&d, year, &ctx(mode, Viewport::Desktop));
                let total: f64 = pie.shares.iter().sum();
                assert!((total - 100.0).abs() < 0.5, "{}", total);
            }
        }
    }

    #[test]
    fn theme_sets_label_colour() {
        let d = dataset();
        let mut c = ctx(ViewMode::CumulativeToPivot, Viewport::Desktop);
        c.theme = Theme::Dark;
        let pie = generate_pie_chart(&d, FiscalYear::Current, &c);
        assert_eq!(pie.label_color, "#ffffff");
    }

    #[test]
    fn raw_table_lists_every_authority() {
        let d = dataset();
        let rows = generate_raw_table(&d);
        assert_eq!(rows.len(), 17);
        assert_eq!(rows[0].serial, 1);
        assert_eq!(rows[0].team, "Team 1");
        assert_eq!(rows[0].authority, "Bangladesh Bank");
        assert!(rows.iter().all(|r| r.monthly.len() == 12));
        assert!(rows.iter().any(|r| r.growth == "N/A"));
        let team2_first = rows.iter().position(|r| r.team == "Team 2").unwrap();
        assert_eq!(rows[team2_first].serial, 1);
    }

    #[test]
    fn summary_starts_with_all_teams() {
        let d = dataset();
        let summary = generate_summary(&d, ViewMode::CumulativeToPivot);
        assert_eq!(summary.len(), 6);
        assert_eq!(summary[0].team, "All Teams");
        assert_eq!(summary[0].growth, "19.18");
        assert_eq!(summary[4].growth, "8.62");
    }
}
