//! Environment Configuration Generator for Rivet-MemGPT
//!
//! Writes a starter `.env` with every variable the client reads.

use clap::{Parser, ValueEnum};
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output file path
    #[arg(short, long, default_value = ".env")]
    output: PathBuf,

    /// Client mode
    #[arg(short, long, value_enum, default_value = "text")]
    mode: ClientMode,

    /// Force overwrite if file exists
    #[arg(short, long)]
    force: bool,

    /// Backend base URL
    #[arg(short, long, default_value = "http://localhost:8085")]
    backend_url: String,

    /// Open on the chat tab
    #[arg(long)]
    auto_launch: bool,

    /// GPT model preselected in the configuration form
    #[arg(long, default_value = "gpt-4-1106-preview")]
    gpt_model: String,

    /// Command used to play synthesized replies (voice mode)
    #[arg(long)]
    audio_player: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ClientMode {
    /// Text chat only
    Text,
    /// Speech-to-text input and spoken replies through OpenAI
    Voice,
}

fn generate_env_content(cli: &Cli) -> String {
    let voice = cli.mode == ClientMode::Voice;

    let openai_config = if voice {
        "# OpenAI Configuration (required in voice mode)\n\
         OPENAI_API_KEY="
            .to_string()
    } else {
        "# OpenAI Configuration (only needed in voice mode)\n\
         # OPENAI_API_KEY="
            .to_string()
    };

    let player = match &cli.audio_player {
        Some(command) => format!("RIVET_AUDIO_PLAYER={}", command),
        None => "# RIVET_AUDIO_PLAYER=mpv --no-video".to_string(),
    };

    format!(
        "# ========================================\n\
         # Rivet-MemGPT - Environment Configuration\n\
         # ========================================\n\
         # Generated: {}\n\
         # Mode: {:?}\n\
         \n\
         # Backend\n\
         RIVET_BACKEND_URL={}\n\
         RIVET_HTTP_TIMEOUT_SECS=60\n\
         \n\
         # Front-end\n\
         RIVET_AUTO_LAUNCH={}\n\
         RIVET_DEFAULT_GPT_MODEL={}\n\
         \n\
         # Voice\n\
         RIVET_VOICE_ENABLED={}\n\
         RIVET_AUDIO_OUTPUT=voice.mp3\n\
         {}\n\
         \n\
         {}\n\
         \n\
         # Logging Configuration\n\
         RIVET_LOG_LEVEL=info\n\
         # RUST_LOG=info,rivet_core=debug\n",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        cli.mode,
        cli.backend_url,
        cli.auto_launch,
        cli.gpt_model,
        voice,
        player,
        openai_config,
    )
}

fn main() {
    let cli = Cli::parse();

    // Check if file exists
    if cli.output.exists() && !cli.force {
        eprintln!("❌ Error: File {:?} already exists!", cli.output);
        eprintln!("   Use --force to overwrite");
        std::process::exit(1);
    }

    println!("🔧 Rivet-MemGPT Configuration Generator");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();

    println!("📄 Generating configuration for {:?} mode...", cli.mode);
    let content = generate_env_content(&cli);

    match fs::write(&cli.output, content) {
        Ok(_) => {
            println!("✓ Configuration written to: {:?}", cli.output);
        }
        Err(e) => {
            eprintln!("❌ Failed to write file: {}", e);
            std::process::exit(1);
        }
    }

    // The file may hold an API key (Unix only)
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = fs::Permissions::from_mode(0o600);
        if let Err(e) = fs::set_permissions(&cli.output, perms) {
            eprintln!("⚠️  Warning: Could not set file permissions: {}", e);
        } else {
            println!("✓ Set secure file permissions (600 - owner only)");
        }
    }

    println!();
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("✅ Configuration generated successfully!");
    println!();
    println!("📋 Next Steps:");
    println!("   1. Start the backend at {}", cli.backend_url);

    match cli.mode {
        ClientMode::Text => {
            println!("   2. Run: cargo run --bin run-rivet-ui");
        }
        ClientMode::Voice => {
            println!("   2. Edit {:?} and add OPENAI_API_KEY", cli.output);
            println!("   3. Set RIVET_AUDIO_PLAYER to hear replies (e.g. mpv --no-video)");
            println!("   4. Run: cargo run --bin run-rivet-ui");
        }
    }

    println!("   • Never commit .env to version control");
    println!();
}
