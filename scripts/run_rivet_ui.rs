use std::sync::Arc;

use clap::{Parser, Subcommand};
use rivet_adaptor_terminal::{render, TerminalApp, UiOptions};
use rivet_core::utils::logger::init_logging;
use rivet_core::{
    load_env, load_env_from_path, BackendApi, ChatSession, ClientConfig, ConfigurationForm,
    ConfigurationLister, HttpBackend, OptionField, OptionsFetcher, RivetError, SAVED_NOTICE,
};
use rivet_provider_voice::VoiceBridge;

#[derive(Parser, Debug)]
#[command(name = "run-rivet-ui", version, about = "Terminal client for a MemGPT-style agent backend")]
struct Cli {
    #[arg(long, env = "RIVET_LOG_LEVEL")]
    log_level: Option<String>,

    /// Backend base URL; overrides RIVET_BACKEND_URL
    #[arg(long)]
    backend_url: Option<String>,

    /// Load this file instead of ./.env
    #[arg(long)]
    env_file: Option<std::path::PathBuf>,

    /// Speak replies and accept /voice recordings
    #[arg(long)]
    voice: bool,

    /// Open on the chat tab
    #[arg(long)]
    auto_launch: bool,

    #[command(subcommand)]
    command: Option<Cmd>,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Print the option lists served by /options
    Options,
    /// Print saved configuration names
    Configs,
    /// Save a configuration; omitted fields take their defaults
    Save {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        human: Option<String>,
        #[arg(long)]
        persona: Option<String>,
        #[arg(long)]
        prompt: Option<String>,
        #[arg(long)]
        tool: Option<String>,
        #[arg(long)]
        gptmodel: Option<String>,
    },
    /// Start a conversation and send each message in turn
    Chat {
        #[arg(long, short)]
        config: String,
        messages: Vec<String>,
    },
}

fn main() -> rivet_core::Result<()> {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    rt.block_on(run())
}

async fn run() -> rivet_core::Result<()> {
    let cli = Cli::parse();
    let loaded = match &cli.env_file {
        Some(path) => load_env_from_path(path),
        None => load_env(),
    };
    // The level may come from the .env file just loaded
    let level = cli
        .log_level
        .clone()
        .or_else(|| std::env::var("RIVET_LOG_LEVEL").ok())
        .unwrap_or_else(|| "info".to_string());
    std::env::set_var("RIVET_LOG_LEVEL", &level);
    init_logging(&level);
    loaded?;

    let mut config = ClientConfig::from_env()?;
    if let Some(url) = &cli.backend_url {
        config = config.with_backend_url(url)?;
    }
    config.voice_enabled |= cli.voice;
    config.auto_launch |= cli.auto_launch;
    tracing::info!(
        "Backend {} (voice: {}, auto launch: {})",
        config.backend_url,
        config.voice_enabled,
        config.auto_launch
    );

    let backend: Arc<dyn BackendApi> = Arc::new(HttpBackend::new(&config)?);

    match cli.command {
        None => run_terminal(&config, backend).await,
        Some(Cmd::Options) => {
            let choices = OptionsFetcher::new(backend)
                .with_preferred_model(config.default_gpt_model.clone())
                .fetch()
                .await?;
            println!("{}", serde_json::to_string_pretty(choices.options())?);
            Ok(())
        }
        Some(Cmd::Configs) => {
            for name in ConfigurationLister::new(backend).refresh().await? {
                println!("{}", name);
            }
            Ok(())
        }
        Some(Cmd::Save {
            name,
            human,
            persona,
            prompt,
            tool,
            gptmodel,
        }) => {
            let choices = OptionsFetcher::new(backend.clone())
                .with_preferred_model(config.default_gpt_model.clone())
                .fetch()
                .await?;
            let mut form = ConfigurationForm::new(choices);
            form.set_name(name.unwrap_or_default());
            let picks = [
                (OptionField::Human, human),
                (OptionField::Persona, persona),
                (OptionField::Prompt, prompt),
                (OptionField::Tool, tool),
                (OptionField::GptModel, gptmodel),
            ];
            for (field, value) in picks {
                if let Some(value) = value {
                    form.select(field, &value)?;
                }
            }
            form.save(backend.as_ref()).await?;
            println!("{}", render::notice(SAVED_NOTICE));
            Ok(())
        }
        Some(Cmd::Chat { config: name, messages }) => {
            let mut session = ChatSession::new(backend);
            session.select_configuration(name)?;
            print!("{}", render::turn(session.begin().await?));
            for message in messages {
                print!("{}", render::turn(session.send(&message).await?));
            }
            Ok(())
        }
    }
}

async fn run_terminal(config: &ClientConfig, backend: Arc<dyn BackendApi>) -> rivet_core::Result<()> {
    let options = UiOptions {
        voice_enabled: config.voice_enabled,
        auto_launch: config.auto_launch,
    };
    let mut app = TerminalApp::stdio(options, backend)
        .with_preferred_model(config.default_gpt_model.clone());

    if config.voice_enabled {
        let bridge = VoiceBridge::from_config(config);
        if !bridge.is_ready().await {
            return Err(RivetError::config(
                "voice is enabled but OPENAI_API_KEY is not set",
            ));
        }
        app = app.with_voice(bridge);
    }

    app.run().await
}
