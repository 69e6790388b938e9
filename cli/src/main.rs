//! docpdf CLI - document to branded PDF converter

mod fetch;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use docpdf::archive;
use docpdf::{
    list_font_files, load_logo, ClassifierConfig, CodedDocument, ConvertOptions, Converter,
    DocumentInfo, InputKind, JsonFormat, LayoutConfig, PageAssets, StyleConfig, UploadedFile,
};

use fetch::HttpFetcher;

#[derive(Parser)]
#[command(name = "docpdf")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Convert DOCX, RTF, HTML and text files into branded PDFs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Options shared by every command that produces a PDF.
#[derive(clap::Args)]
struct PdfArgs {
    /// Typography settings (JSON)
    #[arg(long, value_name = "FILE", env = "DOCPDF_STYLE")]
    style: Option<PathBuf>,

    /// Page geometry settings (JSON)
    #[arg(long, value_name = "FILE", env = "DOCPDF_LAYOUT")]
    layout: Option<PathBuf>,

    /// Logo image, local path or http(s) URL
    #[arg(long, value_name = "PATH|URL", env = "DOCPDF_LOGO")]
    logo: Option<String>,

    /// Footer line (repeatable); replaces the house footer
    #[arg(long = "footer", value_name = "LINE")]
    footer: Vec<String>,

    /// First-page notice; lines separated by "\n"
    #[arg(long, value_name = "TEXT")]
    notice: Option<String>,

    /// Omit the house footer and notice
    #[arg(long)]
    plain: bool,

    /// Add a document information dictionary (producer, date)
    #[arg(long)]
    info: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert documents to PDF
    Convert {
        /// Input files
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Output file name (single input only)
        #[arg(long, value_name = "NAME")]
        name: Option<String>,

        /// House-style rules (JSON list)
        #[arg(long, value_name = "FILE")]
        rules: Option<PathBuf>,

        /// Disable house-style rules
        #[arg(long, conflicts_with = "rules")]
        generic: bool,

        #[command(flatten)]
        pdf: PdfArgs,
    },

    /// Show classified blocks as JSON
    Preview {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// House-style rules (JSON list)
        #[arg(long, value_name = "FILE")]
        rules: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Render a block JSON file to PDF
    Render {
        /// Block exchange JSON
        #[arg(value_name = "BLOCKS")]
        input: PathBuf,

        /// Output file (input name with .pdf if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        pdf: PdfArgs,
    },

    /// Print extracted plain text
    Text {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// List the entries of a DOCX container
    Entries {
        /// Input DOCX file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// List font files in a directory
    Fonts {
        /// Font directory
        #[arg(value_name = "DIR", default_value = "fonts", env = "DOCPDF_FONT_DIR")]
        dir: PathBuf,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Convert {
            inputs,
            output,
            name,
            rules,
            generic,
            pdf,
        }) => cmd_convert(
            &inputs,
            output.as_deref(),
            name,
            rules.as_deref(),
            generic,
            &pdf,
        ),
        Some(Commands::Preview {
            input,
            output,
            rules,
            compact,
        }) => cmd_preview(&input, output.as_deref(), rules.as_deref(), compact),
        Some(Commands::Render { input, output, pdf }) => {
            cmd_render(&input, output.as_deref(), &pdf)
        }
        Some(Commands::Text { input, output }) => cmd_text(&input, output.as_deref()),
        Some(Commands::Entries { input }) => cmd_entries(&input),
        Some(Commands::Fonts { dir, json }) => cmd_fonts(&dir, json),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!("{}", "Usage: docpdf convert <FILE>... [-o DIR]".yellow());
            println!("       docpdf --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        log::debug!("{:?}", e);
        eprintln!("{}: {}", "Error".red().bold(), error_message(&*e));
        std::process::exit(1);
    }
}

/// Message shown to the user; internal failures are reported without detail.
fn error_message(e: &(dyn std::error::Error + 'static)) -> String {
    match e.downcast_ref::<docpdf::Error>() {
        Some(err) => conversion_message(err),
        None => e.to_string(),
    }
}

fn conversion_message(e: &docpdf::Error) -> String {
    if e.is_user_error() {
        e.to_string()
    } else {
        "internal error".to_string()
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> CliResult<T> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("Cannot read {}: {}", path.display(), e))?;
    serde_json::from_str(&text)
        .map_err(|e| format!("Invalid JSON in {}: {}", path.display(), e).into())
}

fn load_rules(rules: Option<&Path>, generic: bool) -> CliResult<ClassifierConfig> {
    if generic {
        return Ok(ClassifierConfig::generic());
    }
    match rules {
        Some(path) => Ok(ClassifierConfig {
            rules: read_json(path)?,
        }),
        None => Ok(ClassifierConfig::default()),
    }
}

fn pdf_options(args: &PdfArgs) -> CliResult<ConvertOptions> {
    let style: StyleConfig = match &args.style {
        Some(path) => read_json(path)?,
        None => StyleConfig::default(),
    };
    let layout: LayoutConfig = match &args.layout {
        Some(path) => read_json(path)?,
        None => LayoutConfig::default(),
    };

    let mut assets = if args.plain {
        PageAssets::default()
    } else {
        PageAssets::house()
    };
    if !args.footer.is_empty() {
        assets = assets.with_footer_lines(args.footer.clone());
    }
    if let Some(notice) = &args.notice {
        assets = assets.with_notice(Some(notice.replace("\\n", "\n")));
    }
    if let Some(location) = &args.logo {
        let fetcher = HttpFetcher::new()?;
        let logo = load_logo(&fetcher, location);
        if logo.is_none() {
            eprintln!("{} logo {} not used", "Warning:".yellow(), location);
        }
        assets = assets.with_logo(logo);
    }
    if args.info {
        assets = assets.with_info(DocumentInfo::now(None));
    }

    Ok(ConvertOptions::new()
        .with_style(style)
        .with_layout(layout)
        .with_assets(assets))
}

fn cmd_convert(
    inputs: &[PathBuf],
    output: Option<&Path>,
    name: Option<String>,
    rules: Option<&Path>,
    generic: bool,
    pdf: &PdfArgs,
) -> CliResult {
    let mut options = pdf_options(pdf)?.with_classifier(load_rules(rules, generic)?);
    if let Some(name) = name {
        if inputs.len() > 1 {
            eprintln!("{} --name ignored for multiple inputs", "Warning:".yellow());
        }
        options = options.with_output_name(name);
    }

    let output_dir = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&output_dir)?;

    let pb = ProgressBar::new(inputs.len() as u64 + 1);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    pb.set_message("Reading files...");
    let mut files = Vec::with_capacity(inputs.len());
    for input in inputs {
        let data = fs::read(input).map_err(|e| format!("{}: {}", input.display(), e))?;
        let file_name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        files.push(UploadedFile::from_bytes(file_name, &data));
    }
    pb.inc(1);

    pb.set_message("Converting...");
    let converter = Converter::new(options);
    let results = converter.convert_batch(&files);

    let mut written = Vec::new();
    let mut failed = Vec::new();
    for (file, result) in files.iter().zip(results) {
        match result {
            Ok(converted) => {
                let path = output_dir.join(&converted.file_name);
                fs::write(&path, &converted.pdf)?;
                written.push((file.name.clone(), path, converted.document.is_none()));
            }
            Err(e) => failed.push((file.name.clone(), e)),
        }
        pb.inc(1);
    }
    pb.finish_with_message("Done!");

    if !written.is_empty() {
        println!("\n{}", "Output files:".green().bold());
        for (i, (source, path, passthrough)) in written.iter().enumerate() {
            let branch = if i + 1 == written.len() { "└─" } else { "├─" };
            let note = if *passthrough { " (unchanged)" } else { "" };
            println!(
                "  {} {} {} {}{}",
                branch.dimmed(),
                source,
                "->".dimmed(),
                path.display(),
                note.dimmed()
            );
        }
    }

    if !failed.is_empty() {
        println!("\n{}", "Failed:".red().bold());
        for (source, e) in &failed {
            println!("  {} {}: {}", "✗".red(), source, conversion_message(e));
            log::debug!("{} failed: {:?}", source, e);
        }
        return Err(format!("{} of {} files failed", failed.len(), files.len()).into());
    }

    Ok(())
}

fn cmd_preview(
    input: &Path,
    output: Option<&Path>,
    rules: Option<&Path>,
    compact: bool,
) -> CliResult {
    let options = ConvertOptions::new().with_classifier(load_rules(rules, false)?);
    let data = fs::read(input)?;
    let name = input.file_name().unwrap_or_default().to_string_lossy();
    let doc = Converter::new(options).preview(&name, &data)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let json = doc.to_json(format)?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_render(input: &Path, output: Option<&Path>, pdf: &PdfArgs) -> CliResult {
    let json = fs::read_to_string(input)?;
    let doc = CodedDocument::from_json(&json)?;
    let converter = Converter::new(pdf_options(pdf)?);
    let bytes = converter.render(&doc);

    let path = output.map(|p| p.to_path_buf()).unwrap_or_else(|| {
        let name = input.file_name().unwrap_or_default().to_string_lossy();
        PathBuf::from(docpdf::pipeline::output_file_name(&name))
    });
    fs::write(&path, &bytes)?;
    println!(
        "{} {} ({} blocks, {} bytes)",
        "Saved to".green(),
        path.display(),
        doc.len(),
        bytes.len()
    );

    Ok(())
}

fn cmd_text(input: &Path, output: Option<&Path>) -> CliResult {
    let data = fs::read(input)?;
    let name = input.file_name().unwrap_or_default().to_string_lossy();
    let text = docpdf::extract::extract_text(&data, &name)?;

    if let Some(path) = output {
        fs::write(path, &text)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", text);
    }

    Ok(())
}

fn cmd_entries(input: &Path) -> CliResult {
    let name = input.file_name().unwrap_or_default().to_string_lossy();
    let kind = InputKind::from_name(&name)?;
    if kind != InputKind::Docx {
        return Err(format!("{} input has no container to list", kind).into());
    }
    let data = fs::read(input)?;

    println!("{}", "Container Entries".cyan().bold());
    println!("{}", "─".repeat(60).dimmed());

    let mut count = 0;
    for record in archive::entries(&data)? {
        let entry = record?;
        let marker = if entry.name == archive::DOCX_DOCUMENT_PATH {
            "*".green().to_string()
        } else {
            " ".to_string()
        };
        println!(
            "{} {:<40} {:>10} {:>10}  {:?}",
            marker, entry.name, entry.compressed_size, entry.uncompressed_size, entry.method
        );
        count += 1;
    }

    println!("{}", "─".repeat(60).dimmed());
    println!("{}: {}", "Entries".bold(), count);
    Ok(())
}

fn cmd_fonts(dir: &Path, json: bool) -> CliResult {
    let fonts = list_font_files(dir)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&fonts)?);
        return Ok(());
    }

    if fonts.is_empty() {
        println!("{} {}", "No font files in".yellow(), dir.display());
        return Ok(());
    }
    println!("{} {}", "Fonts in".cyan().bold(), dir.display());
    for font in &fonts {
        println!("  {} {}", "•".dimmed(), font.name);
    }
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "docpdf".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Document to branded PDF converter (library {})", docpdf::VERSION);
    println!();
    println!("Repository: {}", "https://github.com/iyulab/docpdf".dimmed());
    println!("License: MIT");
}
