use anyhow::Context;
use clap::{Parser, Subcommand};
use smbus_rs::{
    init_logger, parse_trace, Annotation, PmBusDecoder, PmBusOutput, SmBusFramer,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "smbus-cli")]
#[command(about = "CLI tool for decoding SMBus/PMBus symbol traces")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a trace through both layers and print command-level output
    Decode {
        file: PathBuf,
        /// Transfers contain a trailing PEC byte
        #[arg(long)]
        pec: bool,
        /// Print structured events as JSON instead of annotations
        #[arg(long)]
        json: bool,
    },
    /// Frame a trace through Layer 1 only
    Frame {
        file: PathBuf,
        #[arg(long)]
        pec: bool,
        #[arg(long)]
        json: bool,
    },
    /// Print decode statistics for a trace
    Stats {
        file: PathBuf,
        #[arg(long)]
        pec: bool,
    },
}

fn print_annotation(annotation: &Annotation) {
    println!(
        "[{:>8}..{:>8}] {} ({})",
        annotation.range.start, annotation.range.end, annotation.long, annotation.short
    );
}

fn main() -> anyhow::Result<()> {
    init_logger();

    let cli = Cli::parse();
    match cli.command {
        Commands::Decode { file, pec, json } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("reading trace {}", file.display()))?;
            let outputs = smbus_rs::decode_trace(&text, pec)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&outputs)?);
            } else {
                for output in &outputs {
                    match output {
                        PmBusOutput::Symbol { annotation, .. }
                        | PmBusOutput::Value { annotation, .. } => print_annotation(annotation),
                    }
                }
            }
        }
        Commands::Frame { file, pec, json } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("reading trace {}", file.display()))?;
            let framed = smbus_rs::frame_trace(&text, pec)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&framed)?);
            } else {
                for symbol in &framed {
                    print_annotation(&symbol.annotation);
                }
            }
        }
        Commands::Stats { file, pec } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("reading trace {}", file.display()))?;
            let symbols = parse_trace(&text)?;
            let mut framer = SmBusFramer::new(pec);
            let mut decoder = PmBusDecoder::new(pec);
            for symbol in &symbols {
                for framed in framer.process(symbol) {
                    decoder.process(&framed.event);
                }
            }
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "framer": framer.stats(),
                    "pmbus": decoder.stats(),
                }))?
            );
        }
    }

    Ok(())
}
