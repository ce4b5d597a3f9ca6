// Entry point and high-level CLI flow.
//
// With `--view` the report is rendered once and the program exits.
// Otherwise an interactive menu mirrors the dashboard's navbar:
// - [1]..[3] switch between the raw table, cumulative and single-month views,
// - [4] toggles and persists the colour theme.
mod config;
mod loader;
mod metrics;
mod output;
mod reports;
mod types;
mod util;

use clap::Parser;
use config::{Cli, Preferences};
use once_cell::sync::Lazy;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};
use types::{Dataset, FiscalYear, RenderContext, Theme, ViewMode, Viewport};

// View state lives here, not in the report builders, which receive it as
// explicit arguments.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| Mutex::new(AppState::default()));

#[derive(Default)]
struct AppState {
    dataset: Option<Dataset>,
    mode: ViewMode,
    theme: Theme,
    viewport: Option<Viewport>,
    prefs_path: PathBuf,
    out_dir: Option<PathBuf>,
}

fn app_state() -> MutexGuard<'static, AppState> {
    APP_STATE.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    View(ViewMode),
    ToggleTheme,
    Exit,
    Invalid,
}

fn parse_menu_choice(input: &str) -> MenuChoice {
    match input {
        "1" => MenuChoice::View(ViewMode::Raw),
        "2" => MenuChoice::View(ViewMode::CumulativeToPivot),
        "3" => MenuChoice::View(ViewMode::PivotOnly),
        "4" => MenuChoice::ToggleTheme,
        "0" => MenuChoice::Exit,
        _ => MenuChoice::Invalid,
    }
}

/// Print `prompt` and read one trimmed line. `None` once input is closed or
/// unreadable.
fn prompt_line<R: BufRead>(input: &mut R, prompt: &str) -> Option<String> {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    match input.read_line(&mut buf) {
        Ok(0) => None,
        Ok(_) => Some(buf.trim().to_string()),
        Err(e) => {
            log::warn!("Failed to read input: {}", e);
            None
        }
    }
}

/// Read a menu selection; end of input counts as exit.
fn read_choice<R: BufRead>(input: &mut R) -> MenuChoice {
    prompt_line(input, "Enter choice: ").map_or(MenuChoice::Exit, |line| parse_menu_choice(&line))
}

/// Ask whether to return to the view selection menu after rendering.
/// End of input answers no.
fn prompt_back_to_menu<R: BufRead>(input: &mut R) -> bool {
    loop {
        let Some(resp) = prompt_line(input, "Back to View Selection (Y/N): ") else {
            return false;
        };
        match resp.to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

fn handle_load(cli: &Cli) -> anyhow::Result<()> {
    let (dataset, report) = match &cli.data {
        Some(path) => loader::load_from_path(path)?,
        None => loader::load_embedded()?,
    };
    println!(
        "Loaded dataset... ({} teams, {} authorities, {} to {})",
        util::format_int(report.teams),
        util::format_int(report.authorities),
        dataset.months.first().map(String::as_str).unwrap_or_default(),
        report.pivot_month,
    );
    println!();
    app_state().dataset = Some(dataset);
    Ok(())
}

fn handle_toggle_theme() {
    let (theme, path) = {
        let mut state = app_state();
        state.theme = state.theme.toggled();
        (state.theme, state.prefs_path.clone())
    };
    let mut prefs = Preferences::default();
    prefs.set_theme(theme);
    if let Err(e) = prefs.save(&path) {
        eprintln!("Could not save preferences: {}", e);
    }
    println!("Theme set to {}.\n", theme.name());
}

/// Render the current view to stdout and, if an output directory was given,
/// export it. Export failures are reported and the remaining exports still run.
fn handle_render() {
    let (dataset, ctx, out_dir) = {
        let state = app_state();
        let ctx = RenderContext {
            mode: state.mode,
            viewport: state.viewport.unwrap_or(Viewport::Desktop),
            theme: state.theme,
        };
        (state.dataset.clone(), ctx, state.out_dir.clone())
    };
    let Some(dataset) = dataset else {
        println!("Error: No dataset loaded.\n");
        return;
    };

    println!("Revenue Report {}", util::short_year_label(dataset.year_label(FiscalYear::Current)));
    println!("View: {}\n", ctx.mode.caption(&dataset.pivot_month));

    match ctx.mode {
        ViewMode::Raw => render_raw(&dataset, &ctx, out_dir),
        ViewMode::CumulativeToPivot | ViewMode::PivotOnly => render_charts(&dataset, &ctx, out_dir),
    }
}

fn render_raw(dataset: &Dataset, ctx: &RenderContext, out_dir: Option<PathBuf>) {
    let rows = reports::generate_raw_table(dataset);
    let headers = &dataset.table_headers;
    println!("{}\n", dataset.title);
    for team in &dataset.teams {
        output::preview_raw_table(&team.name, &dataset.months, headers, &rows, ctx.viewport, ctx.theme);
    }
    if let Some(dir) = out_dir {
        let file = dir.join("raw_data.csv");
        match output::write_raw_csv(&file, &dataset.months, headers, &rows) {
            Ok(()) => println!("(Raw table exported to {})\n", file.display()),
            Err(e) => eprintln!("Write error: {}", e),
        }
    }
}

fn render_charts(dataset: &Dataset, ctx: &RenderContext, out_dir: Option<PathBuf>) {
    let all_teams = reports::generate_all_teams_chart(dataset, ctx);
    output::preview_chart(&all_teams, ctx.theme);

    let pies: Vec<_> = FiscalYear::ALL
        .iter()
        .map(|year| reports::generate_pie_chart(dataset, *year, ctx))
        .collect();
    for pie in &pies {
        println!("{}", pie.title);
        output::preview_table_rows(&reports::pie_rows(pie), pie.labels.len(), ctx.theme);
    }

    let team_charts = reports::generate_team_charts(dataset, ctx);
    for chart in &team_charts {
        output::preview_chart(chart, ctx.theme);
    }

    let summary = reports::generate_summary(dataset, ctx.mode);
    println!("Growth Summary ({})", ctx.mode.caption(&dataset.pivot_month));
    output::preview_table_rows(&summary, summary.len(), ctx.theme);

    let Some(dir) = out_dir else {
        return;
    };
    let charts = serde_json::json!({
        "all_teams": all_teams,
        "pies": pies,
        "teams": team_charts,
    });
    let file = dir.join("charts.json");
    if let Err(e) = output::write_json(&file, &charts) {
        eprintln!("Write error: {}", e);
    }
    let file = dir.join("summary.json");
    if let Err(e) = output::write_json(&file, &summary) {
        eprintln!("Write error: {}", e);
    }
    let file = dir.join("summary.csv");
    if let Err(e) = output::write_csv(&file, &summary) {
        eprintln!("Write error: {}", e);
    }
    println!("(Charts and summary exported to {})\n", dir.display());
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let mut prefs = Preferences::load(&cli.prefs);
    if let Some(theme) = cli.theme {
        prefs.set_theme(theme);
        prefs.save(&cli.prefs)?;
    }
    if let Some(dir) = &cli.out_dir {
        std::fs::create_dir_all(dir)?;
    }
    {
        let mut state = app_state();
        state.theme = prefs.theme();
        state.viewport = Some(Viewport::from_width(cli.width));
        state.prefs_path = cli.prefs.clone();
        state.out_dir = cli.out_dir.clone();
    }
    handle_load(&cli)?;

    if let Some(mode) = cli.view {
        app_state().mode = mode;
        handle_render();
        return Ok(());
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();
    loop {
        let (theme, pivot_month) = {
            let state = app_state();
            let pivot = state
                .dataset
                .as_ref()
                .map(|d| d.pivot_month.clone())
                .unwrap_or_default();
            (state.theme, pivot)
        };
        println!("Select View:");
        println!("[1] {}", ViewMode::Raw.caption(&pivot_month));
        println!("[2] {}", ViewMode::CumulativeToPivot.caption(&pivot_month));
        println!("[3] {}", ViewMode::PivotOnly.caption(&pivot_month));
        println!("[4] Toggle theme (current: {})", theme.name());
        println!("[0] Exit\n");
        let mode = match read_choice(&mut input) {
            MenuChoice::View(mode) => mode,
            MenuChoice::ToggleTheme => {
                handle_toggle_theme();
                continue;
            }
            MenuChoice::Exit => {
                println!("Exiting the program.");
                break;
            }
            MenuChoice::Invalid => {
                println!("Invalid choice. Please enter 0 to 4.\n");
                continue;
            }
        };
        println!();
        app_state().mode = mode;
        handle_render();
        if !prompt_back_to_menu(&mut input) {
            println!("Exiting the program.");
            break;
        }
    }
    Ok(())
}
