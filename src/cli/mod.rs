// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap, hands work to Layer 2, prints the
// results. Nothing here touches tensors.
//
//   1. `generate`    — build a model and extend a prefix
//   2. `inspect`     — report shapes, parameter counts, row mass
//   3. `init-config` — write a settings JSON to start from

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{parse_ids, Commands, GenerateArgs, InitConfigArgs, InspectArgs};

use crate::domain::{traits::Vocabulary, vocabulary::CharVocabulary};

#[derive(Parser, Debug)]
#[command(
    name = "poetry-rnn",
    version,
    about = "Character-level embedding + LSTM poetry model: generate and inspect."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Generate(args)   => run_generate(args),
            Commands::Inspect(args)    => run_inspect(args),
            Commands::InitConfig(args) => run_init_config(args),
        }
    }
}

fn run_generate(args: GenerateArgs) -> Result<()> {
    use crate::application::generate_use_case::GenerateUseCase;

    let mut settings = args.model.resolve()?;
    let mut options  = args.options();

    match &args.alphabet {
        Some(alphabet) => {
            // The vocabulary fixes the model's vocab size and the end token
            let vocab = CharVocabulary::new(alphabet)?;
            settings.vocab_size = alphabet_vocab_size(args.model.vocab_size, &vocab);
            options.end_token   = options.end_token.or(Some(vocab.end_id()));

            let mut prefix = vec![vocab.begin_id()];
            prefix.extend(vocab.encode(args.text.as_deref().unwrap_or_default())?);

            let ids = GenerateUseCase::new(settings, options).execute(&prefix)?;
            println!("{}", vocab.decode(&ids));
        }
        None => {
            let prefix = parse_ids(&args.prefix)?;
            let ids = GenerateUseCase::new(settings, options).execute(&prefix)?;
            let rendered: Vec<String> = ids.iter().map(ToString::to_string).collect();
            println!("{}", rendered.join(","));
        }
    }
    Ok(())
}

/// The alphabet always decides the vocabulary size; a disagreeing
/// --vocab-size is reported and ignored.
fn alphabet_vocab_size(requested: Option<usize>, vocab: &CharVocabulary) -> usize {
    let size = vocab.vocab_size();
    if let Some(requested) = requested.filter(|&r| r != size) {
        tracing::warn!(
            "--vocab-size {} ignored: the alphabet defines {} symbols (markers included)",
            requested,
            size,
        );
    }
    size
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    use crate::application::inspect_use_case::InspectUseCase;

    let settings = args.model.resolve()?;
    let probe    = parse_ids(&args.probe)?;
    let report   = InspectUseCase::new(settings).execute(&probe)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let s = &report.summary;
    println!("device         : {}", s.device);
    println!("vocab_size     : {}", s.vocab_size);
    println!("embedding_dim  : {}", s.embedding_dim);
    println!("hidden_dim     : {}", s.hidden_dim);
    println!("lstm_layers    : {}", s.lstm_layers);
    println!("batch_size     : {} (stored only)", s.batch_size);
    println!("parameters     : {}", s.num_params);
    println!("probe          : {:?}", report.probe);
    println!("train output   : {:?}", report.train_shape);
    println!("test output    : {:?}", report.test_shape);
    for (i, mass) in report.row_mass.iter().enumerate() {
        println!("  row {:>3} mass : {:.6}", i, mass);
    }
    println!("modes agree    : {}", report.modes_agree);
    println!("argmax next id : {}", report.next_token);
    Ok(())
}

fn run_init_config(args: InitConfigArgs) -> Result<()> {
    use crate::infra::config_store::ConfigStore;

    let settings = args.model.resolve()?;
    let store    = ConfigStore::new(&args.out);
    store.save(&settings)?;
    println!("Settings written to {}", store.path().display());
    Ok(())
}
