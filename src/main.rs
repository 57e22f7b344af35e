use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::Read;

use writewell::config::Settings;
use writewell::service::{self, GuideKind, Request, Response};
use writewell::suggest::OllamaClient;

#[derive(Parser, Debug)]
#[command(
    name = "writewell",
    about = "A local-first writing assistant backed by Ollama",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze text and print categorized correction suggestions
    Analyze {
        /// Text to analyze (reads stdin when omitted)
        text: Option<String>,

        /// One holistic rewrite instead of itemized corrections
        #[arg(long)]
        simple: bool,

        /// Writing style to enforce (overrides the configured style)
        #[arg(long)]
        style: Option<String>,

        /// Tone to enforce (overrides the configured tone)
        #[arg(long)]
        tone: Option<String>,
    },

    /// Check that the Ollama server is reachable and the model installed
    Check,

    /// Show or update settings
    Settings {
        #[arg(long)]
        set_style: Option<String>,

        #[arg(long)]
        set_tone: Option<String>,

        #[arg(long)]
        set_model: Option<String>,

        #[arg(long)]
        set_address: Option<String>,

        /// Enable or disable simple mode
        #[arg(long)]
        simple: Option<bool>,
    },

    /// Generate a custom style or tone guide and save it to settings
    Guide {
        /// Guide kind: style or tone
        #[arg(value_enum)]
        kind: CliGuideKind,

        /// Name the guide will be saved under
        name: String,

        /// Natural-language description of the desired style or tone
        description: String,
    },
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum CliGuideKind {
    Style,
    Tone,
}

impl From<CliGuideKind> for GuideKind {
    fn from(kind: CliGuideKind) -> Self {
        match kind {
            CliGuideKind::Style => GuideKind::Style,
            CliGuideKind::Tone => GuideKind::Tone,
        }
    }
}

fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer.trim().to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let settings = Settings::load();
    let client = OllamaClient::new(&settings.ollama_address, &settings.ollama_model);

    match cli.command {
        Command::Analyze {
            text,
            simple,
            style,
            tone,
        } => {
            let text = match text {
                Some(text) => text,
                None => read_stdin()?,
            };
            if text.is_empty() {
                anyhow::bail!("no text to analyze");
            }

            let mut preferences = settings.preferences();
            preferences.simple_mode = preferences.simple_mode || simple;
            if let Some(style) = style {
                preferences.style = style;
            }
            if let Some(tone) = tone {
                preferences.tone = tone;
            }

            let request = Request::Analyze {
                text,
                preferences: Some(preferences),
            };
            match service::dispatch(&client, request).await? {
                Response::Suggestions(set) => {
                    println!("{}", serde_json::to_string_pretty(&set)?);
                }
                _ => unreachable!("analyze returns suggestions"),
            }
        }

        Command::Check => match service::dispatch(&client, Request::CheckConnection).await? {
            Response::Connection(status) => {
                if status.reachable && status.model_available {
                    println!(
                        "Connected to {} (model {} available)",
                        settings.ollama_address, settings.ollama_model
                    );
                } else {
                    let message = status
                        .error
                        .unwrap_or_else(|| "connection check failed".to_string());
                    anyhow::bail!("{}", message);
                }
            }
            _ => unreachable!("check returns connection status"),
        },

        Command::Settings {
            set_style,
            set_tone,
            set_model,
            set_address,
            simple,
        } => {
            let mut settings = settings;
            let changed = set_style.is_some()
                || set_tone.is_some()
                || set_model.is_some()
                || set_address.is_some()
                || simple.is_some();

            if let Some(style) = set_style {
                settings.style = style;
            }
            if let Some(tone) = set_tone {
                settings.tone = tone;
            }
            if let Some(model) = set_model {
                settings.ollama_model = model;
            }
            if let Some(address) = set_address {
                settings.ollama_address = address;
            }
            if let Some(simple) = simple {
                settings.simple_mode = simple;
            }

            if changed {
                service::dispatch(&client, Request::SaveSettings {
                    settings: settings.clone(),
                })
                .await?;
            }
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }

        Command::Guide {
            kind,
            name,
            description,
        } => {
            let request = Request::GenerateGuide {
                kind: kind.into(),
                name: name.clone(),
                description,
            };
            match service::dispatch(&client, request).await? {
                Response::Guide { guide } => {
                    let mut settings = settings;
                    match kind {
                        CliGuideKind::Style => {
                            settings.custom_guides.styles.insert(name.clone(), guide.clone());
                        }
                        CliGuideKind::Tone => {
                            settings.custom_guides.tones.insert(name.clone(), guide.clone());
                        }
                    }
                    settings.save()?;
                    println!("Saved {} guide \"{}\":\n{}", kind_label(kind), name, guide);
                }
                _ => unreachable!("guide returns guide text"),
            }
        }
    }

    Ok(())
}

fn kind_label(kind: CliGuideKind) -> &'static str {
    match kind {
        CliGuideKind::Style => "style",
        CliGuideKind::Tone => "tone",
    }
}
