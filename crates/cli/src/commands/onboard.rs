//! `tika onboard` — First-time setup.

use tika_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");
    let knowledge_dir = config_dir.join("knowledge");

    println!("💉 Tika — First-Time Setup");
    println!("==========================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("✅ Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    if !knowledge_dir.exists() {
        std::fs::create_dir_all(&knowledge_dir)?;
        println!("✅ Created knowledge directory: {}", knowledge_dir.display());
    }

    if config_path.exists() {
        println!("\n⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run onboard.\n");
    } else {
        std::fs::write(&config_path, AppConfig::default_toml())?;
        println!("✅ Created config.toml at: {}", config_path.display());
        println!("\n📝 Next steps:");
        println!("   1. Export your Hugging Face token: HF_TOKEN=hf_...");
        println!("   2. Run: tika ingest <folder of vaccination documents>");
        println!("   3. Run: tika chat --language hindi\n");
    }

    println!("🎉 Setup complete! Run `tika chat` to start asking questions.\n");

    Ok(())
}
