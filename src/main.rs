use std::{collections::BTreeMap, path::PathBuf, process::ExitCode};

use clap::{CommandFactory, Parser};
use iconfont_renderer::{
    BatchOptions, BatchReport, ConverterProfile, MetadataKind, RenderRequest, Result, convert,
    parse_binding,
};

const SUCCESS: u8 = 0;
const FAILURE: u8 = 1;

#[derive(Parser)]
#[command(name = "iconfont-renderer", version)]
#[command(about = "Render icon font glyphs to one image file per icon")]
#[command(after_help = "Argument shapes:\n  \
    <icons> <styles> <size> <color> <padding>\n  \
    <icons> <styles> <size> transparent <padding> <bgcolor>\n  \
    <icons> <styles> <size> <color> <padding> <sicon> <ssize> <scolor>\n\n\
    Icons and styles are comma-separated lists or 'all'. Colors are hex RGB.\n\
    Padding is a fraction such as 1/8.\n\n\
Examples:\n  \
    iconfont-renderer plus-circle,minus-circle all 128 ff0000 1/8\n  \
    iconfont-renderer all solid 64 transparent 0 ffffff\n  \
    iconfont-renderer twitter all 24 ffffff 0 square 48 1da1f2")]
struct Cli {
    /// Converter profile (JSON)
    #[arg(long, value_name = "FILE")]
    profile: Option<PathBuf>,
    /// Icon metadata file (stylesheet or JSON catalog)
    #[arg(long, value_name = "FILE")]
    metadata: Option<PathBuf>,
    /// Metadata format (default: inferred from the file extension)
    #[arg(long, value_enum)]
    metadata_kind: Option<MetadataKind>,
    /// Stylesheet selector prefix per style, e.g. 'solid=fas' (repeatable)
    #[arg(long = "prefix", value_name = "STYLE=PREFIX")]
    prefixes: Vec<String>,
    /// Font file per style, e.g. 'solid=fonts/fa-solid-900.ttf' (repeatable)
    #[arg(long = "font", value_name = "STYLE=PATH")]
    fonts: Vec<String>,
    /// Output directory
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,
    /// Image format, e.g. 'png' or 'gif'
    #[arg(short, long)]
    format: Option<String>,
    /// Render images in parallel
    #[arg(long)]
    parallel: bool,
    /// Continue after a failed image and report failures at the end
    #[arg(long)]
    keep_going: bool,
    /// Positional arguments in one of the shapes below
    #[arg(value_name = "ARGS")]
    args: Vec<String>,
}

impl Cli {
    /// Runs the conversion and returns the process exit status.
    fn run(&self) -> u8 {
        self.execute().unwrap_or_else(|e| {
            eprintln!("error: {e}");
            FAILURE
        })
    }

    fn execute(&self) -> Result<u8> {
        let Some(request) = RenderRequest::from_args(self.args.as_slice())? else {
            println!("{}", Cli::command().render_help());
            return Ok(SUCCESS);
        };

        let options = BatchOptions {
            parallel: self.parallel,
            keep_going: self.keep_going,
        };
        let report = convert(&self.build_profile()?, &request, options)?;
        Ok(report_status(&report))
    }

    /// The profile file (or the defaults) with command-line overrides applied.
    fn build_profile(&self) -> Result<ConverterProfile> {
        let mut profile = match &self.profile {
            Some(path) => ConverterProfile::load(path)?,
            None => ConverterProfile::default(),
        };

        if let Some(metadata) = &self.metadata {
            profile = profile.with_metadata(metadata);
        }
        if let Some(kind) = self.metadata_kind {
            profile = profile.with_metadata_kind(kind);
        }
        if !self.prefixes.is_empty() {
            let prefixes = self
                .prefixes
                .iter()
                .map(|p| parse_binding(p))
                .collect::<Result<BTreeMap<_, _>>>()?;
            profile = profile.with_prefixes(prefixes);
        }
        for font in &self.fonts {
            let (style, path) = parse_binding(font)?;
            profile = profile.with_font(style, path);
        }
        if let Some(output) = &self.output {
            profile = profile.with_output_dir(output);
        }
        if let Some(format) = &self.format {
            profile = profile.with_format(format);
        }
        Ok(profile)
    }
}

fn report_status(report: &BatchReport) -> u8 {
    if report.all_succeeded() {
        return SUCCESS;
    }
    for failure in &report.failed {
        eprintln!("error: {} ({}): {}", failure.icon, failure.style, failure.error);
    }
    eprintln!(
        "error: {} of {} images failed",
        report.failed.len(),
        report.total()
    );
    FAILURE
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    ExitCode::from(Cli::parse().run())
}
