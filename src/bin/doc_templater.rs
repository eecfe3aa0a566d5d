#![warn(clippy::all, rust_2018_idioms)]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use doc_templater::render::{PdftoppmRasterizer, render_all};
use doc_templater::workspace::stem_of;
use doc_templater::{EditorConfig, Workspace};
use log::{error, info, warn};

/// Batch renderer and template maintenance
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render every data record of every template into output PDFs
    Render {
        /// Only render this PDF
        #[arg(long)]
        pdf: Option<String>,
    },
    /// Create empty templates for PDFs that have none
    Init,
    /// Rescale page sizes still stored in PDF points
    Migrate,
    /// Report pages whose stored size will not match the rendered page
    Verify,
}

/// PDFs in the input directory that already have a template
fn templated_pdfs(workspace: &Workspace) -> Option<Vec<PathBuf>> {
    match workspace.scan_pdfs() {
        Ok(pdfs) => Some(
            pdfs.into_iter()
                .filter(|pdf| workspace.template_path(&stem_of(pdf)).exists())
                .collect(),
        ),
        Err(err) => {
            error!("cannot list {}: {err}", workspace.config().input_dir.display());
            None
        }
    }
}

fn render(workspace: &Workspace, pdf: Option<&str>) -> bool {
    let config = workspace.config();
    let rasterizer = PdftoppmRasterizer::new(config.temp_img_dir.clone(), config.target_height);
    let summary = render_all(workspace, pdf, &rasterizer);
    info!("wrote {} PDF(s), {} failure(s)", summary.written.len(), summary.failed);
    summary.is_success()
}

fn init(workspace: &Workspace) -> bool {
    let Ok(pdfs) = workspace.scan_pdfs() else {
        error!("cannot list {}", workspace.config().input_dir.display());
        return false;
    };
    let mut ok = true;
    for pdf in pdfs {
        if workspace.template_path(&stem_of(&pdf)).exists() {
            continue;
        }
        if let Err(err) = workspace.open_or_init(&pdf) {
            error!("cannot create a template for {}: {err}", pdf.display());
            ok = false;
        }
    }
    ok
}

fn migrate(workspace: &Workspace) -> bool {
    let Some(pdfs) = templated_pdfs(workspace) else {
        return false;
    };
    let mut ok = true;
    for pdf in pdfs {
        match workspace.migrate_template(&pdf) {
            Ok(0) => info!("{} needs no migration", pdf.display()),
            Ok(_) => {}
            Err(err) => {
                error!("cannot migrate {}: {err}", pdf.display());
                ok = false;
            }
        }
    }
    ok
}

fn verify(workspace: &Workspace) -> bool {
    let Some(pdfs) = templated_pdfs(workspace) else {
        return false;
    };
    let mut ok = true;
    for pdf in pdfs {
        match workspace.verify_template(&pdf) {
            Ok(mismatches) if mismatches.is_empty() => info!("{}: all pages match", pdf.display()),
            Ok(mismatches) => {
                ok = false;
                for mismatch in mismatches {
                    warn!(
                        "{} page {}: stored {}x{}, expected {}x{}",
                        pdf.display(),
                        mismatch.page_index + 1,
                        mismatch.stored.0,
                        mismatch.stored.1,
                        mismatch.expected.0,
                        mismatch.expected.1
                    );
                }
            }
            Err(err) => {
                error!("cannot verify {}: {err}", pdf.display());
                ok = false;
            }
        }
    }
    ok
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let workspace = Workspace::new(EditorConfig::load_or_default(cli.config.as_deref()));
    if let Err(err) = workspace.ensure_dirs() {
        error!("Failed to create working directories: {err}");
        return ExitCode::FAILURE;
    }

    let ok = match &cli.command {
        Command::Render { pdf } => render(&workspace, pdf.as_deref()),
        Command::Init => init(&workspace),
        Command::Migrate => migrate(&workspace),
        Command::Verify => verify(&workspace),
    };
    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}
