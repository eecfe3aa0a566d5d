#![warn(clippy::all, rust_2018_idioms)]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use doc_templater::{EditorConfig, TemplateEditorApp, Workspace};

/// Interactive template editor for one PDF
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// PDF in the input directory; the extension may be omitted
    pdf: String,

    /// Configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let workspace = Workspace::new(EditorConfig::load_or_default(args.config.as_deref()));
    if let Err(err) = workspace.ensure_dirs() {
        log::error!("Failed to create working directories: {err}");
        return ExitCode::FAILURE;
    }
    let pdf = workspace.pdf_path(&args.pdf);
    if !pdf.exists() {
        log::error!("{} does not exist", pdf.display());
        return ExitCode::FAILURE;
    }

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };
    let result = eframe::run_native(
        "Template Editor",
        native_options,
        Box::new(move |cc| {
            let app = TemplateEditorApp::new(cc, workspace, &pdf).map_err(|err| err.to_string())?;
            Ok(Box::new(app))
        }),
    );
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
