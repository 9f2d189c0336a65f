//! Terminal front-end for Rivet-MemGPT
//!
//! A line-oriented REPL with two tabs, *Create new configuration* and
//! *Start chatting*. One [`TerminalApp`] covers every flavour of the UI;
//! [`UiOptions`] switches voice and the starting tab.

#![warn(missing_docs)]

pub mod commands;
pub mod render;

use std::path::Path;
use std::sync::Arc;

use rivet_core::utils::Logger;
use rivet_core::{
    normalize_name, validate_name, BackendApi, ChatSession, ConfigurationForm,
    ConfigurationLister, ControlState, FormChoices, OptionField, OptionsFetcher, Result,
    RivetError, CONFIGS_INFO, NAME_INFO, SAVED_NOTICE,
};
use rivet_provider_voice::VoiceBridge;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines};

pub use commands::{Command, Tab, HELP};

/// Front-end switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiOptions {
    /// Accept `/voice` recordings and speak every reply
    pub voice_enabled: bool,
    /// Open on the chat tab instead of the configuration form
    pub auto_launch: bool,
}

/// The terminal application over any async line input and output
pub struct TerminalApp<R, W> {
    options: UiOptions,
    backend: Arc<dyn BackendApi>,
    preferred_model: Option<String>,
    voice: Option<VoiceBridge>,
    input: Lines<R>,
    output: W,
    tab: Tab,
    choices: Option<FormChoices>,
    configurations: Vec<String>,
    session: ChatSession,
    logger: Logger,
}

impl TerminalApp<BufReader<tokio::io::Stdin>, tokio::io::Stdout> {
    /// App on the process stdin/stdout
    pub fn stdio(options: UiOptions, backend: Arc<dyn BackendApi>) -> Self {
        Self::new(
            options,
            backend,
            BufReader::new(tokio::io::stdin()),
            tokio::io::stdout(),
        )
    }
}

impl<R, W> TerminalApp<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Create the app; nothing is fetched until [`run`](Self::run)
    pub fn new(options: UiOptions, backend: Arc<dyn BackendApi>, input: R, output: W) -> Self {
        Self {
            options,
            session: ChatSession::new(backend.clone()),
            backend,
            preferred_model: None,
            voice: None,
            input: input.lines(),
            output,
            tab: Tab::CreateConfiguration,
            choices: None,
            configurations: Vec::new(),
            logger: Logger::new("terminal"),
        }
    }

    /// Model to preselect when the backend offers it
    pub fn with_preferred_model(mut self, model: impl Into<String>) -> Self {
        self.preferred_model = Some(model.into());
        self
    }

    /// Attach the voice bridge; only used when voice is enabled
    pub fn with_voice(mut self, bridge: VoiceBridge) -> Self {
        self.voice = Some(bridge);
        self
    }

    /// Front-end switches
    pub fn options(&self) -> UiOptions {
        self.options
    }

    /// Active tab
    pub fn tab(&self) -> Tab {
        self.tab
    }

    /// Chat session
    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    /// Configuration names from the last refresh
    pub fn configurations(&self) -> &[String] {
        &self.configurations
    }

    /// Controls currently enabled
    pub fn controls(&self) -> ControlState {
        self.session
            .controls(!self.configurations.is_empty(), self.voice_active())
    }

    /// Everything written so far
    pub fn output(&self) -> &W {
        &self.output
    }

    /// Consume the app, returning its output
    pub fn into_output(self) -> W {
        self.output
    }

    fn voice_active(&self) -> bool {
        self.options.voice_enabled && self.voice.is_some()
    }

    /// Main loop: banner, initial tab, then one command per line until
    /// `/quit` or end of input
    pub async fn run(&mut self) -> Result<()> {
        self.write_line(&render::banner(self.options.voice_enabled))
            .await?;
        let initial = if self.options.auto_launch {
            Tab::StartChatting
        } else {
            Tab::CreateConfiguration
        };
        self.switch_tab(initial).await?;

        while let Some(line) = self.read_line("> ").await? {
            let Some(command) = commands::parse(&line) else {
                continue;
            };
            if !self.handle(command).await? {
                break;
            }
        }
        self.write_line("Bye.").await?;
        self.output.flush().await?;
        Ok(())
    }

    /// Execute one command. Returns `false` when the app should exit.
    /// Backend and validation failures are shown as warnings; only output
    /// errors are returned.
    pub async fn handle(&mut self, command: Command) -> Result<bool> {
        self.logger.debug(&format!("command {:?}", command));
        match command {
            Command::Help => self.write_line(HELP).await?,
            Command::Tab(tab) => self.switch_tab(tab).await?,
            Command::Options => self.show_options().await?,
            Command::Create => self.create_configuration().await?,
            Command::Configs => self.refresh_configurations().await?,
            Command::Start(name) => self.start_conversation(name).await?,
            Command::Voice(path) => self.send_recording(&path).await?,
            Command::History => self.show_history().await?,
            Command::Clear => self.clear().await?,
            Command::Reset => self.reset().await?,
            Command::Message(text) => self.send_message(&text).await?,
            Command::Invalid(hint) => self.warn(&hint).await?,
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }

    async fn switch_tab(&mut self, tab: Tab) -> Result<()> {
        self.tab = tab;
        match tab {
            Tab::CreateConfiguration => {
                self.write_line(&render::tab_header(tab, &self.controls()))
                    .await?;
                if self.load_choices().await? {
                    let overview = self
                        .choices
                        .as_ref()
                        .map(render::options_overview)
                        .unwrap_or_default();
                    self.write(&overview).await?;
                    self.write_line("Type /create to save a new configuration.")
                        .await?;
                }
            }
            Tab::StartChatting => {
                // Every activation goes back to the backend
                self.load_configurations().await?;
                self.write_line(&render::tab_header(tab, &self.controls()))
                    .await?;
                self.show_configurations().await?;
            }
        }
        Ok(())
    }

    /// Fetch `/options` once; on failure the form stays disabled
    async fn load_choices(&mut self) -> Result<bool> {
        if self.choices.is_some() {
            return Ok(true);
        }
        let mut fetcher = OptionsFetcher::new(self.backend.clone());
        if let Some(model) = &self.preferred_model {
            fetcher = fetcher.with_preferred_model(model.clone());
        }
        match fetcher.fetch().await {
            Ok(choices) => {
                self.choices = Some(choices);
                Ok(true)
            }
            Err(e) => {
                self.logger.error(&format!("options unavailable: {}", e));
                self.warn(&format!(
                    "Configuration options unavailable; the form is disabled: {}",
                    e
                ))
                .await?;
                Ok(false)
            }
        }
    }

    async fn show_options(&mut self) -> Result<()> {
        // A failed earlier fetch is retried here
        if self.load_choices().await? {
            let overview = self
                .choices
                .as_ref()
                .map(render::options_overview)
                .unwrap_or_default();
            self.write(&overview).await?;
        }
        Ok(())
    }

    async fn create_configuration(&mut self) -> Result<()> {
        if !self.load_choices().await? {
            return Ok(());
        }
        let Some(choices) = self.choices.clone() else {
            return Ok(());
        };
        let mut form = ConfigurationForm::new(choices);

        self.write_line(&format!("Name ({})", NAME_INFO)).await?;
        loop {
            let Some(raw) = self.read_line("name: ").await? else {
                return self.warn("Form cancelled").await;
            };
            let checked = match normalize_name(&raw) {
                Some(name) => validate_name(&name),
                None => Ok(()),
            };
            match checked {
                Ok(()) => {
                    form.set_name(raw);
                    break;
                }
                Err(e) => self.warn(&e.to_string()).await?,
            }
        }

        for field in OptionField::ALL {
            let list = render::choice_list(field, form.choices(), form.value(field));
            self.write(&list).await?;
            loop {
                let prompt = format!("{} [{}]: ", field.label(), form.value(field));
                let Some(raw) = self.read_line(&prompt).await? else {
                    return self.warn("Form cancelled").await;
                };
                let raw = raw.trim();
                let picked = if raw.is_empty() {
                    Ok(())
                } else if let Ok(n) = raw.parse::<usize>() {
                    match n.checked_sub(1) {
                        Some(index) => form.select_index(field, index),
                        None => Err(RivetError::validation(format!(
                            "{} has no choice number 0",
                            field.label()
                        ))),
                    }
                } else {
                    form.select(field, raw)
                };
                match picked {
                    Ok(()) => break,
                    Err(e) => self.warn(&e.to_string()).await?,
                }
            }
        }

        match form.save(self.backend.as_ref()).await {
            Ok(name) => {
                self.logger
                    .success(&format!("saved configuration {:?}", name));
                self.write_line(&render::notice(SAVED_NOTICE)).await
            }
            Err(e) => self.warn(&e.to_string()).await,
        }
    }

    async fn load_configurations(&mut self) -> Result<()> {
        match ConfigurationLister::new(self.backend.clone()).refresh().await {
            Ok(configs) => self.configurations = configs,
            Err(e) => {
                self.logger.error(&format!("listing failed: {}", e));
                self.configurations.clear();
                self.warn(&format!("Could not list configurations: {}", e))
                    .await?;
            }
        }
        Ok(())
    }

    async fn show_configurations(&mut self) -> Result<()> {
        if self.configurations.is_empty() {
            return self.write_line(CONFIGS_INFO).await;
        }
        let selected = self
            .session
            .configuration()
            .or_else(|| self.configurations.first().map(String::as_str));
        let list = render::configuration_list(&self.configurations, selected);
        self.write(&list).await
    }

    async fn refresh_configurations(&mut self) -> Result<()> {
        self.load_configurations().await?;
        self.show_configurations().await
    }

    async fn start_conversation(&mut self, name: Option<String>) -> Result<()> {
        if self.session.is_started() {
            return self
                .warn("The conversation already started; use /reset to pick another configuration")
                .await;
        }
        if self.configurations.is_empty() {
            self.load_configurations().await?;
        }
        if !self.controls().start {
            return self.write_line(CONFIGS_INFO).await;
        }

        let name = match name {
            Some(name) => match self.resolve_configuration(&name) {
                Some(found) => found,
                None => {
                    return self
                        .warn(&format!("Unknown configuration '{}'", name))
                        .await
                }
            },
            None => match self.configurations.first() {
                Some(first) => first.clone(),
                None => return self.write_line(CONFIGS_INFO).await,
            },
        };

        if let Err(e) = self.session.select_configuration(name.clone()) {
            return self.warn(&e.to_string()).await;
        }
        self.tab = Tab::StartChatting;
        self.write_line(&render::notice(&format!(
            "Starting the conversation with '{}'. Please wait",
            name
        )))
        .await?;

        let rendered = match self.session.begin().await {
            Ok(turn) => (render::turn(turn), turn.assistant_message.clone()),
            Err(e) => return self.warn(&e.to_string()).await,
        };
        self.write(&rendered.0).await?;
        self.speak(rendered.1).await
    }

    /// Name as listed (exact, then case-insensitive), else its 1-based
    /// position in the list. Names may be all digits, so names win.
    fn resolve_configuration(&self, name: &str) -> Option<String> {
        let wanted = name.trim();
        if let Some(found) = self
            .configurations
            .iter()
            .find(|c| c.as_str() == wanted)
            .or_else(|| {
                self.configurations
                    .iter()
                    .find(|c| c.eq_ignore_ascii_case(wanted))
            })
        {
            return Some(found.clone());
        }
        wanted
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| self.configurations.get(i))
            .cloned()
    }

    async fn send_message(&mut self, text: &str) -> Result<()> {
        if !self.controls().message_input {
            return self
                .warn("Start a conversation first (/tab chat, then /start)")
                .await;
        }
        let rendered = match self.session.send(text).await {
            Ok(turn) => (render::turn(turn), turn.assistant_message.clone()),
            Err(e) => return self.warn(&e.to_string()).await,
        };
        self.write(&rendered.0).await?;
        self.speak(rendered.1).await
    }

    async fn send_recording(&mut self, path: &Path) -> Result<()> {
        if !self.options.voice_enabled {
            return self.warn("Voice is disabled").await;
        }
        if !self.controls().voice_input {
            return self
                .warn("Start a conversation before sending recordings")
                .await;
        }
        let Some(bridge) = &self.voice else {
            return self.warn("Voice is disabled").await;
        };
        let transcribed = bridge.transcribe_file(path).await;
        match transcribed {
            Ok(text) => {
                self.write_line(&format!("🎤 {}", text)).await?;
                self.send_message(&text).await
            }
            Err(e) => {
                self.logger.warn(&format!("transcription failed: {}", e));
                self.warn(&e.to_string()).await
            }
        }
    }

    /// Speak a reply. Failures are warnings and never undo the turn.
    async fn speak(&mut self, text: Option<String>) -> Result<()> {
        if !self.options.voice_enabled {
            return Ok(());
        }
        let (Some(bridge), Some(text)) = (&self.voice, text) else {
            return Ok(());
        };
        let spoken = bridge.speak(&text).await;
        match spoken {
            Ok(path) => {
                self.logger
                    .debug(&format!("reply audio at {}", path.display()));
                Ok(())
            }
            Err(e) => {
                self.logger.warn(&format!("speech synthesis failed: {}", e));
                self.warn(&e.to_string()).await
            }
        }
    }

    async fn show_history(&mut self) -> Result<()> {
        if self.session.transcript().is_empty() {
            return self.write_line("(no messages)").await;
        }
        let rendered: String = self
            .session
            .transcript()
            .turns()
            .iter()
            .map(render::turn)
            .collect();
        self.write(&rendered).await
    }

    async fn clear(&mut self) -> Result<()> {
        if !self.controls().clear {
            return self.warn("Nothing to clear yet").await;
        }
        self.session.clear();
        self.write_line(&render::notice("Chat cleared")).await
    }

    async fn reset(&mut self) -> Result<()> {
        self.session.reset();
        self.write_line(&render::notice("Conversation reset")).await?;
        if self.tab == Tab::StartChatting {
            self.refresh_configurations().await?;
        }
        Ok(())
    }

    async fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        self.write(prompt).await?;
        self.output.flush().await?;
        Ok(self.input.next_line().await?)
    }

    async fn warn(&mut self, message: &str) -> Result<()> {
        self.write_line(&render::warning(message)).await
    }

    async fn write_line(&mut self, text: &str) -> Result<()> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.write_all(b"\n").await?;
        Ok(())
    }

    async fn write(&mut self, text: &str) -> Result<()> {
        self.output.write_all(text.as_bytes()).await?;
        Ok(())
    }
}
