//! `tika lexicon` — Inspect the topic lexicon and classify sample text.

use tika_agent::{KeywordClassifier, RejectionDetector};
use tika_config::AppConfig;
use tika_core::Language;

pub async fn run(
    language: Option<String>,
    check: Option<String>,
    export: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let lexicon = config.lexicon()?;

    if export {
        print!("{}", toml::to_string_pretty(&lexicon)?);
        return Ok(());
    }

    if let Some(text) = check {
        let classifier = KeywordClassifier::from_lexicon(&lexicon, config.conversation.match_mode)?;
        let detector =
            RejectionDetector::from_lexicon(&lexicon, config.conversation.detect_canned_replies);
        let verdict = |hit: bool| if hit { "yes" } else { "no" };

        println!();
        println!("  Text:       {text}");
        println!("  Trigger:    {}", verdict(classifier.is_topic_trigger(&text)));
        println!("  Follow-up:  {}", verdict(classifier.is_follow_up_term(&text)));
        println!("  Rejection:  {}", verdict(detector.is_rejection_reply(&text)));
        println!();
        return Ok(());
    }

    let selected = language.map(Language::new);
    if let Some(lang) = &selected {
        if !lexicon.supports(lang) {
            return Err(format!("Unsupported language: {lang}").into());
        }
    }

    println!();
    println!("  {:<12} {:<14} {:<5} {:>8} {:>10} {:>10}", "LANGUAGE", "NAME", "CODE", "TRIGGERS", "FOLLOW-UPS", "REJECTIONS");
    println!("  {}", "─".repeat(64));
    for (token, terms) in &lexicon.languages {
        if selected.as_ref().is_some_and(|l| l.as_str() != token) {
            continue;
        }
        println!(
            "  {:<12} {:<14} {:<5} {:>8} {:>10} {:>10}",
            token,
            terms.display_name,
            terms.code,
            terms.triggers.len(),
            terms.follow_ups.len(),
            terms.rejection_phrases.len()
        );
    }
    println!();
    println!("  Fallback language: {}", lexicon.default_language);
    match &config.topic.lexicon_path {
        Some(path) => println!("  Source: {path}"),
        None => println!("  Source: built-in"),
    }
    println!();

    Ok(())
}
