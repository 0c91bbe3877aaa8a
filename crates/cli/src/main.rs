use anyhow::{Context, Result};
use clap::Parser;
use kassa_import::{Bank, MatchPolicy, ProcessStats};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod config;
mod input;

use config::{Config, Settings};

pub const OPERATIONS_FILE: &str = "operations.csv";
pub const TRANSFERS_FILE: &str = "transfers.csv";

#[derive(Parser, Debug)]
#[command(name = "kassa", version, about = "Build a card ledger from bank SMS notifications")]
struct Cli {
    /// Messages as a JSON array or JSON Lines of {"timestamp", "body"}
    input: PathBuf,

    /// Directory that receives operations.csv and transfers.csv
    #[arg(short = 'o', long = "out-dir", default_value = ".")]
    out_dir: PathBuf,

    /// sberbank, vestabank or vtb
    #[arg(short = 'b', long = "bank")]
    bank: Option<Bank>,

    /// Report messages no grammar recognizes
    #[arg(short = 'w', long = "warn")]
    warn: bool,

    /// last-in-window or nearest
    #[arg(long = "policy")]
    policy: Option<MatchPolicy>,

    /// Config file (default: kassa.toml in the platform config directory)
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    let settings = Settings::resolve(&config, cli.bank, cli.warn, cli.policy);

    let stats = run(&cli.input, &cli.out_dir, &settings)?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

fn run(input: &Path, out_dir: &Path, settings: &Settings) -> Result<ProcessStats> {
    let messages = input::read_messages(input)?;
    tracing::info!("Loaded {} messages from {}", messages.len(), input.display());

    let outcome = kassa_import::process(settings.bank, &messages, &settings.options);

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let path = out_dir.join(OPERATIONS_FILE);
    let file = File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
    kassa_import::write_operations(BufWriter::new(file), &outcome.ledger)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    let path = out_dir.join(TRANSFERS_FILE);
    let file = File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
    kassa_import::write_transfers(BufWriter::new(file), &outcome.ledger)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    tracing::info!("Wrote ledger to {}", out_dir.display());
    Ok(outcome.stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kassa_import::ProcessOptions;

    const DAY: &str = r#"[
  {"timestamp": "2017-03-05T14:00:10+03:00", "body": "VISA8413 05.03.17 14:00 покупка 500р MAGNIT Баланс: 12000.50р"},
  {"timestamp": "2017-03-05T14:01:00+03:00", "body": "VISA8413 05.03.17 14:01 зачисление 1000р Баланс: 13000.50р"},
  {"timestamp": "2017-03-05T14:02:30+03:00", "body": "Сбербанк Онлайн. ИВАН ИВАНОВИЧ И. перевел(а) Вам 1000.00 RUB. Сообщение: \"за обед\""},
  {"timestamp": "2017-03-05T14:03:00+03:00", "body": "Пароль для подтверждения: 55555"}
]"#;

    fn sberbank() -> Settings {
        Settings { bank: Bank::Sberbank, options: ProcessOptions::default() }
    }

    #[test]
    fn run_writes_both_sheets() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("sms.json");
        std::fs::write(&input, DAY).unwrap();
        let out = dir.path().join("out");

        let stats = run(&input, &out, &sberbank()).unwrap();
        assert_eq!(stats.total, 4);
        assert_eq!(stats.filtered, 1);
        assert_eq!(stats.operations, 2);
        assert_eq!(stats.transfers, 1);
        assert_eq!(stats.matched, 1);

        let ops = std::fs::read_to_string(out.join(OPERATIONS_FILE)).unwrap();
        assert_eq!(ops.lines().count(), 3);
        assert!(ops.lines().nth(2).unwrap().contains("ИВАН ИВАНОВИЧ И.,за обед,2017-03-05T14:02:30+03:00"));

        let transfers = std::fs::read_to_string(out.join(TRANSFERS_FILE)).unwrap();
        assert_eq!(transfers.lines().count(), 2);
    }

    #[test]
    fn run_fails_on_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        assert!(run(&dir.path().join("missing.json"), dir.path(), &sberbank()).is_err());
    }

    #[test]
    fn cli_parses_flags() {
        let cli = Cli::try_parse_from([
            "kassa", "sms.jsonl", "--bank", "VTB", "-w", "--policy", "nearest", "-o", "out",
        ])
        .unwrap();
        assert_eq!(cli.bank, Some(Bank::Vtb));
        assert!(cli.warn);
        assert_eq!(cli.policy, Some(MatchPolicy::Nearest));
        assert_eq!(cli.out_dir, PathBuf::from("out"));
    }

    #[test]
    fn cli_rejects_unknown_bank() {
        assert!(Cli::try_parse_from(["kassa", "sms.json", "--bank", "tinkoff"]).is_err());
    }
}
