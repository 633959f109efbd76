use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Parser};
use log::{debug, info, LevelFilter};
use serde::Serialize;
use walkdir::WalkDir;
use quill::inheritance::{ClassInfo, ClassInfos};
use dukemixin::cleaner::{clean_unit, CleanOutput, CleanerEdit};
use dukemixin::declaration::SourceUnit;
use dukemixin::diagnostic::Diagnostic;
use dukemixin::engine::{MixinRemapper, RemapOutput};
use dukemixin::planner::RewriteInstruction;

/// Remaps the string references inside mixin classes from one namespace to another.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
	/// The mappings to use, in the tiny v2 format.
	#[arg(short = 'm', long = "mappings", value_name = "FILE")]
	mappings: PathBuf,

	/// The namespace the mixin classes are written against.
	#[arg(long = "from", default_value = "official")]
	from: String,

	/// The namespace to remap to.
	#[arg(long = "to", default_value = "named")]
	to: String,

	/// A json list of classes, for resolving inherited members.
	#[arg(long = "classes", value_name = "FILE")]
	classes: Option<PathBuf>,

	/// How many times to run over all source files.
	///
	/// Mixins referencing the members of other mixins need more than one pass.
	#[arg(long = "passes", default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
	passes: u32,

	/// Also find `@Final` and `@Mutable` annotations that need adding or removing.
	#[arg(long = "clean")]
	clean: bool,

	/// Where to write the json report to. Defaults to stdout.
	#[arg(short = 'o', long = "output", value_name = "FILE")]
	output: Option<PathBuf>,

	/// Writes the mappings, including the ones for the mixin classes, to this file.
	#[arg(long = "write-mappings", value_name = "FILE")]
	write_mappings: Option<PathBuf>,

	#[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
	verbose: u8,

	#[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
	quiet: bool,

	/// A source file as json, or a directory to search for such files.
	input: PathBuf,
}

impl Cli {
	fn level(&self) -> LevelFilter {
		if self.quiet {
			return LevelFilter::Error;
		}
		match self.verbose {
			0 => LevelFilter::Warn,
			1 => LevelFilter::Info,
			2 => LevelFilter::Debug,
			_ => LevelFilter::Trace,
		}
	}
}

#[derive(Debug, Serialize)]
struct Report {
	units: Vec<UnitReport>,
}

#[derive(Debug, Serialize)]
struct UnitReport {
	/// The json file the unit was read from.
	file: PathBuf,
	/// The path of the source file itself.
	path: PathBuf,
	instructions: Vec<RewriteInstruction>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	edits: Vec<CleanerEdit>,
	diagnostics: Vec<Diagnostic>,
}

fn setup_logging(level: LevelFilter) -> Result<()> {
	fern::Dispatch::new()
		.format(|out, message, record| {
			out.finish(format_args!("[{} {}] {}", record.level(), record.target(), message))
		})
		.level(level)
		.chain(std::io::stderr())
		.apply()
		.context("failed to set up logging")
}

fn find_units(input: &Path) -> Result<Vec<PathBuf>> {
	if input.is_file() {
		return Ok(vec![input.to_owned()]);
	}

	let mut files = Vec::new();
	for entry in WalkDir::new(input).sort_by_file_name() {
		let entry = entry.with_context(|| anyhow!("failed to search {input:?} for source files"))?;
		if entry.file_type().is_file() && entry.path().extension().is_some_and(|x| x == "json") {
			files.push(entry.into_path());
		}
	}
	Ok(files)
}

fn read_unit(path: &Path) -> Result<SourceUnit> {
	let file = File::open(path)
		.with_context(|| anyhow!("failed to open source file {path:?}"))?;
	serde_json::from_reader(BufReader::new(file))
		.with_context(|| anyhow!("failed to read source file {path:?}"))
}

fn read_classes(path: &Path) -> Result<ClassInfos> {
	let file = File::open(path)
		.with_context(|| anyhow!("failed to open classes file {path:?}"))?;
	let classes: Vec<ClassInfo> = serde_json::from_reader(BufReader::new(file))
		.with_context(|| anyhow!("failed to read classes file {path:?}"))?;
	Ok(classes.into_iter().collect())
}

fn main() -> Result<()> {
	let cli = Cli::parse();
	setup_logging(cli.level())?;

	let mut mappings = quill::tiny_v2::read_file(&cli.mappings)?;
	mappings.namespaces.check_that([cli.from.as_str(), cli.to.as_str()])?;

	let classes = match &cli.classes {
		Some(path) => read_classes(path)?,
		None => ClassInfos::new(),
	};

	let files = find_units(&cli.input)?;
	let units = files.iter()
		.map(|path| read_unit(path))
		.collect::<Result<Vec<_>>>()?;
	info!("read {} source files and {} classes", units.len(), classes.len());

	let mut outputs: Vec<RemapOutput> = Vec::new();
	for pass in 1..=cli.passes {
		let mut remapper = MixinRemapper::new(&mut mappings, &classes);
		outputs = units.iter().map(|unit| remapper.remap_unit(unit)).collect();

		let rewrites: usize = outputs.iter().map(|x| x.instructions.len()).sum();
		debug!("pass {pass} of {}: {rewrites} rewrites", cli.passes);
	}

	let mut report = Report { units: Vec::new() };
	for ((file, unit), output) in files.into_iter().zip(&units).zip(outputs) {
		let cleaned = if cli.clean {
			clean_unit(unit, &classes)
		} else {
			CleanOutput::default()
		};

		let mut diagnostics = output.diagnostics;
		diagnostics.extend(cleaned.diagnostics);

		report.units.push(UnitReport {
			file,
			path: unit.path.clone(),
			instructions: output.instructions,
			edits: cleaned.edits,
			diagnostics,
		});
	}

	let rewrites: usize = report.units.iter().map(|x| x.instructions.len()).sum();
	let diagnostics: usize = report.units.iter().map(|x| x.diagnostics.len()).sum();
	info!("{rewrites} rewrites and {diagnostics} diagnostics in {} source files", report.units.len());

	match &cli.output {
		Some(path) => {
			let file = File::create(path)
				.with_context(|| anyhow!("failed to create report file {path:?}"))?;
			let mut w = BufWriter::new(file);
			serde_json::to_writer_pretty(&mut w, &report)?;
			w.flush()?;
		},
		None => {
			let mut w = std::io::stdout().lock();
			serde_json::to_writer_pretty(&mut w, &report)?;
			writeln!(w)?;
		},
	}

	if let Some(path) = &cli.write_mappings {
		let mut file = File::create(path)
			.with_context(|| anyhow!("failed to create mappings file {path:?}"))?;
		quill::tiny_v2::write(&mappings, &mut file)
			.with_context(|| anyhow!("failed to write mappings to {path:?}"))?;
		info!("wrote mappings to {path:?}");
	}

	Ok(())
}
