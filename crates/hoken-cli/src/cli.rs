//! CLI definition using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use hoken_domain::{Gender, InsuranceCategory};
use hoken_types::{Language, OutputFormat, RubyStyle};

#[derive(Parser)]
#[command(name = "hoken")]
#[command(author = "yuuji")]
#[command(version)]
#[command(about = "Japanese insurance academy with an AI tutor and mock contracts")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Text model override
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Show only one language of trilingual text (zh, en, ja)
    #[arg(long, global = true)]
    pub lang: Option<Language>,

    /// How Kanji readings are rendered (bracket, html, plain)
    #[arg(long, global = true)]
    pub ruby: Option<RubyStyle>,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List catalog products
    Products {
        /// Filter by category (life, medical, cancer, car, fire, other)
        #[arg(long, short = 'c')]
        category: Option<InsuranceCategory>,
    },

    /// List suggested glossary topics
    Topics,

    /// Explain an insurance term
    Explain {
        /// Term or topic, e.g. "解約返戻金"
        topic: String,
    },

    /// Simulate an underwriting proposal and optionally sign it
    Simulate {
        #[arg(long, default_value_t = 30)]
        age: u32,

        #[arg(long, default_value = "male")]
        gender: Gender,

        #[arg(long, short = 'c', default_value = "medical")]
        category: InsuranceCategory,

        /// Specific needs. Uses the sample text if not specified.
        #[arg(long, short = 'n')]
        needs: Option<String>,

        /// Sign without asking
        #[arg(long, short = 'y', conflicts_with = "no_sign")]
        yes: bool,

        /// Show the proposal only
        #[arg(long)]
        no_sign: bool,
    },

    /// List signed policies
    Policies {
        /// Only active policies
        #[arg(long)]
        active: bool,
    },

    /// File a claim against a policy
    Claim {
        /// Policy id or policy number
        #[arg(long, short = 'p')]
        policy: String,

        /// What happened
        #[arg(long, short = 'i')]
        incident: String,
    },

    /// List filed claims (most recent first)
    Claims,

    /// Generate a lesson
    Lesson {
        topic: String,

        /// Catalog product id to anchor the lesson on
        #[arg(long)]
        product: Option<String>,

        /// Also generate the visual aid and save it here
        #[arg(long)]
        image: Option<PathBuf>,

        /// Also narrate the lesson into this WAV file
        #[arg(long)]
        audio: Option<PathBuf>,
    },

    /// Narrate text into a WAV file
    Speak {
        text: String,

        /// Output WAV path
        #[arg(long, short = 'o')]
        out: PathBuf,
    },

    /// Parse Kanji(kana) annotations and render them
    Annotate { text: String },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set text model
        #[arg(long)]
        set_model: Option<String>,

        #[arg(long)]
        set_speech_model: Option<String>,

        #[arg(long)]
        set_image_model: Option<String>,

        /// Set narration voice (e.g. Kore, Puck)
        #[arg(long)]
        set_voice: Option<String>,

        #[arg(long)]
        set_api_key: Option<String>,

        #[arg(long)]
        set_api_base_url: Option<String>,

        /// Request timeout in seconds
        #[arg(long)]
        set_timeout: Option<u64>,

        #[arg(long)]
        set_data_dir: Option<PathBuf>,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Set default display language
        #[arg(long)]
        set_language: Option<Language>,

        /// Set default ruby rendering
        #[arg(long)]
        set_ruby: Option<RubyStyle>,

        /// Contractor name on new policies
        #[arg(long)]
        set_contractor: Option<String>,

        /// Beneficiary name on new policies
        #[arg(long)]
        set_beneficiary: Option<String>,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,
    },

    /// Delete all stored policies and claims
    Reset {
        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}
