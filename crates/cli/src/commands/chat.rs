//! `tika chat` — Interactive, single-question, or spoken-question mode.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tika_agent::{LlmQueryTranslator, TurnOrchestrator, VoicePipeline};
use tika_config::AppConfig;
use tika_core::{AudioClip, AudioFormat, History, KnowledgeRetriever, Language};
use tika_memory::{KnowledgeIndex, retriever_for_index};
use tika_providers::{OpenAiSpeechClient, ProviderRouter};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

pub struct ChatOptions {
    pub message: Option<String>,
    pub language: Option<String>,
    pub audio: Option<PathBuf>,
    pub output: PathBuf,
    pub json: bool,
}

pub async fn run(options: ChatOptions) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    // Check for credentials early, with a clear error
    if !has_credentials(&config) {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    HF_TOKEN=hf_...          (Hugging Face, default)");
        eprintln!("    OPENAI_API_KEY=sk-...    (OpenAI)");
        eprintln!("    TIKA_API_KEY=...         (generic)");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let router = tika_providers::build_from_config(&config);
    let provider = router.default().ok_or("No default provider configured")?;

    let mut orchestrator = TurnOrchestrator::from_config(provider.clone(), &config)?;
    if let Some(retriever) = load_retriever(&config, &router) {
        orchestrator = orchestrator.with_retriever(retriever);
        if config.knowledge.translate_queries {
            let translator = LlmQueryTranslator::new(provider, config.default_model.clone());
            orchestrator = orchestrator.with_translator(Arc::new(translator));
        }
    }

    let language = Language::new(
        options
            .language
            .as_deref()
            .unwrap_or(&config.conversation.default_language),
    );
    orchestrator.ensure_supported(&language)?;

    if let Some(audio) = options.audio {
        return run_voice(orchestrator, &config, &audio, &options.output, &language).await;
    }

    if let Some(message) = options.message {
        let mut history = History::new();
        eprint!("  Thinking...");
        let outcome = orchestrator.process_turn(&mut history, &message, &language).await;
        eprint!("\r              \r");
        let outcome = outcome?;

        if options.json {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        } else {
            println!("{}", outcome.answer);
        }
        return Ok(());
    }

    run_interactive(orchestrator, &config, language).await
}

/// Ollama runs locally and needs no key.
fn has_credentials(config: &AppConfig) -> bool {
    config.has_api_key()
        || config.default_provider == "ollama"
        || config
            .providers
            .get(&config.default_provider)
            .is_some_and(|p| p.api_key.is_some())
}

/// A missing or unreadable index means answers without reference material.
fn load_retriever(config: &AppConfig, router: &ProviderRouter) -> Option<Arc<dyn KnowledgeRetriever>> {
    if !config.knowledge.enabled {
        return None;
    }
    let path = config.index_path();
    if !path.exists() {
        warn!(path = %path.display(), "No knowledge index found; run `tika ingest` first");
        return None;
    }

    match KnowledgeIndex::load(&path) {
        Ok(index) => {
            let embedder = router.get(&config.knowledge.embedding_provider);
            Some(retriever_for_index(index, embedder, config.knowledge.min_score))
        }
        Err(e) => {
            warn!(error = %e, "Knowledge index could not be loaded");
            None
        }
    }
}

async fn run_voice(
    orchestrator: TurnOrchestrator,
    config: &AppConfig,
    audio_path: &Path,
    output: &Path,
    language: &Language,
) -> Result<(), Box<dyn std::error::Error>> {
    let speech = OpenAiSpeechClient::from_config(config)
        .ok_or("Speech is not configured. Set [speech] provider = \"openai\" in config.toml")?;
    let speech = Arc::new(speech);

    let format = audio_path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(AudioFormat::from_extension)
        .ok_or_else(|| format!("Unsupported audio file: {}", audio_path.display()))?;
    let clip = AudioClip::new(std::fs::read(audio_path)?, format);

    let pipeline = VoicePipeline::new(orchestrator, speech.clone()).with_tts(speech);
    let mut history = History::new();

    eprint!("  Listening...");
    let outcome = pipeline.process(&mut history, &clip, language).await;
    eprint!("\r              \r");
    let outcome = outcome?;

    println!("  You said  > {}", outcome.transcript);
    println!("  Tika      > {}", outcome.turn.answer);

    match outcome.audio {
        Some(audio) => {
            std::fs::write(output, &audio.bytes)?;
            println!("  🔊 Spoken answer saved to {}", output.display());
        }
        None => println!("  (No spoken answer; speech synthesis was unavailable)"),
    }

    Ok(())
}

/// One line typed in interactive mode.
#[derive(Debug, PartialEq, Eq)]
enum ChatInput<'a> {
    Empty,
    Exit,
    Reset,
    /// `/lang <name>`; `None` when the name is missing.
    Lang(Option<&'a str>),
    UnknownCommand(&'a str),
    Question(&'a str),
}

fn parse_input(line: &str) -> ChatInput<'_> {
    let input = line.trim();
    let mut words = input.split_whitespace();
    let Some(first) = words.next() else {
        return ChatInput::Empty;
    };

    match first {
        "exit" | "quit" | "/exit" | "/quit" | ":q" if words.next().is_none() => ChatInput::Exit,
        "/reset" => ChatInput::Reset,
        "/lang" => ChatInput::Lang(words.next()),
        command if command.starts_with('/') => ChatInput::UnknownCommand(command),
        _ => ChatInput::Question(input),
    }
}

async fn run_interactive(
    orchestrator: TurnOrchestrator,
    config: &AppConfig,
    mut language: Language,
) -> Result<(), Box<dyn std::error::Error>> {
    let lexicon = orchestrator.lexicon();
    let languages: Vec<&str> = lexicon.language_names().collect();

    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║        Tika — Vaccination Assistant          ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Provider:  {}", config.default_provider);
    println!("  Model:     {}", config.default_model);
    println!("  Language:  {}", lexicon.display_name(&language));
    println!("  Languages: {}", languages.join(", "));
    println!();
    println!("  Ask a question and press Enter.");
    println!("  /lang <name> switches language, /reset clears the conversation.");
    println!("  Type 'exit' or Ctrl+C to quit.");
    println!();

    let mut history = History::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print!("  You > ");
    std::io::stdout().flush()?;

    while let Some(line) = lines.next_line().await? {
        let input = line.trim();

        match parse_input(input) {
            ChatInput::Empty => {}
            ChatInput::Exit => break,
            ChatInput::Reset => {
                history = History::new();
                println!("  Conversation cleared.\n");
            }
            ChatInput::Lang(None) => eprintln!("  Usage: /lang <name>\n"),
            ChatInput::Lang(Some(name)) => {
                let requested = Language::new(name);
                match orchestrator.ensure_supported(&requested) {
                    Ok(()) => {
                        language = requested;
                        println!("  Language: {}\n", orchestrator.lexicon().display_name(&language));
                    }
                    Err(e) => eprintln!("  [Error] {e}\n"),
                }
            }
            ChatInput::UnknownCommand(command) => eprintln!("  Unknown command: {command}\n"),
            ChatInput::Question(question) => {
                eprint!("  ...");
                match orchestrator.process_turn(&mut history, question, &language).await {
                    Ok(outcome) => {
                        eprint!("\r     \r");
                        println!();
                        for line in outcome.answer.lines() {
                            println!("  Tika > {line}");
                        }
                        println!();
                    }
                    Err(e) => {
                        eprint!("\r     \r");
                        warn!(error = %e, "Turn failed");
                        eprintln!("  [Error] Sorry, something went wrong. Please try again.");
                        println!();
                    }
                }
            }
        }

        print!("  You > ");
        std::io::stdout().flush()?;
    }

    println!();
    println!("  Goodbye! 👋");
    println!();

    Ok(())
}
