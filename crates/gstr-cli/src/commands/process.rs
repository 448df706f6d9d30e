//! Process command - turn a single invoice into a GSTR-1 row.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use gstr_core::filing::NOT_FOUND;
use gstr_core::models::config::OcrConfig;
use gstr_core::{load_invoice_image, Pipeline, ProcessedInvoice, PureOcrEngine, RawText};

use super::config::{default_config_path, load_or_default};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file: invoice image (JPG, PNG), OCR text (.txt) or OCR output (.json)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Directory to write the GSTR-1 CSV into, named GSTR-1_<gstin>_<date>.csv
    #[arg(long)]
    export_csv: Option<PathBuf>,

    /// Model directory (overrides ocr.model_dir)
    #[arg(short, long)]
    model_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Full processing result as JSON
    Json,
    /// GSTR-1 CSV row with header
    Csv,
    /// Plain text summary
    Text,
}

/// How the input file is turned into OCR text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputKind {
    Text,
    OcrJson,
    Image,
}

impl InputKind {
    fn from_path(path: &Path) -> anyhow::Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "txt" => Ok(Self::Text),
            "json" => Ok(Self::OcrJson),
            "png" | "jpg" | "jpeg" => Ok(Self::Image),
            _ => anyhow::bail!(
                "Unsupported file format: '{}'. Please upload JPG or PNG.",
                extension
            ),
        }
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config_path = config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);
    let mut config = load_or_default(&config_path)?;
    if let Some(model_dir) = &args.model_dir {
        config.ocr.model_dir = model_dir.clone();
    }

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let kind = InputKind::from_path(&args.input)?;
    info!("Processing file: {} ({:?})", args.input.display(), kind);

    let raw = match kind {
        InputKind::Text => RawText::from_text(fs::read_to_string(&args.input)?),
        InputKind::OcrJson => RawText::from_json(&fs::read_to_string(&args.input)?)?,
        InputKind::Image => recognize_image(&args.input, &config.ocr).await?,
    };

    if raw.is_blank() {
        anyhow::bail!("No text detected in {}", args.input.display());
    }

    let result = Pipeline::new(&config).process(&raw);

    for warning in &result.warnings {
        eprintln!("{} {}", style("⚠").yellow(), warning);
    }

    let output = format_result(&result, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output.trim_end());
    }

    if let Some(dir) = &args.export_csv {
        fs::create_dir_all(dir)?;
        let csv_path = dir.join(result.filing_record.file_name());
        fs::write(&csv_path, result.filing_record.to_csv()?)?;
        eprintln!(
            "{} GSTR-1 CSV written to {}",
            style("✓").green(),
            csv_path.display()
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Run the OCR engine on an invoice image off the async runtime.
async fn recognize_image(path: &Path, ocr: &OcrConfig) -> anyhow::Result<RawText> {
    let bytes = fs::read(path)?;
    let image = load_invoice_image(&bytes)?;

    if !ocr.models_present() {
        anyhow::bail!(
            "OCR models not found in {}.\n\n\
             Expected {} and {}, or pass OCR text as a .txt or .json file instead.",
            ocr.model_dir.display(),
            ocr.detection_model,
            ocr.recognition_model
        );
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Running OCR...");

    let ocr_config = ocr.clone();
    let task = tokio::task::spawn_blocking(move || {
        let engine = PureOcrEngine::from_config(&ocr_config)?;
        engine.recognize(&image)
    });

    let timeout = Duration::from_secs(ocr.timeout_secs);
    let raw = match tokio::time::timeout(timeout, task).await {
        Ok(joined) => joined??,
        Err(_) => {
            pb.finish_and_clear();
            anyhow::bail!("OCR did not finish within {}s", ocr.timeout_secs);
        }
    };

    pb.finish_and_clear();
    debug!("OCR produced {} fragments", raw.fragments.len());

    Ok(raw)
}

fn format_result(result: &ProcessedInvoice, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Csv => Ok(result.filing_record.to_csv()?),
        OutputFormat::Text => Ok(format_text(result)),
    }
}

fn format_text(result: &ProcessedInvoice) -> String {
    let record = &result.filing_record;
    let mut output = String::new();

    let gstin_note = if result.extracted.tax_id.is_some() && !result.validation.is_valid {
        " (invalid)"
    } else {
        ""
    };
    output.push_str(&format!("GSTIN:   {}{}\n", record.recipient_gstin, gstin_note));
    output.push_str(&format!("Date:    {}\n", record.invoice_date));
    output.push_str(&format!("Total:   {}\n", record.invoice_value));

    let place = match &result.state {
        Some(state) => format!("{} ({})", record.place_of_supply, state),
        None => record.place_of_supply.clone(),
    };
    output.push_str(&format!("Place:   {}\n", place));
    output.push('\n');

    match &result.breakdown {
        Some(b) => {
            output.push_str("Tax split:\n");
            output.push_str(&format!("  Taxable: {}\n", b.taxable_value));
            output.push_str(&format!("  CGST:    {}\n", b.cgst));
            output.push_str(&format!("  SGST:    {}\n", b.sgst));
            output.push_str(&format!("  IGST:    {}\n", b.igst));
            output.push_str(&format!("  Tax:     {}\n", b.total_tax));
        }
        None => {
            output.push_str(&format!("Tax split: {}\n", NOT_FOUND));
        }
    }

    output
}
