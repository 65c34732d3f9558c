//! Command implementations

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{Local, NaiveDate};
use hoken_ai::contracts::DEFAULT_NEEDS;
use hoken_ai::{Lesson, ProposalRequest};
use hoken_app::{Config, Session, View};
use hoken_domain::catalog::{catalog, topic_query};
use hoken_domain::InsuranceCategory;
use hoken_types::{Error, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use crate::cli::{Cli, Commands};
use crate::output::Printer;

pub async fn execute(cli: Cli) -> Result<()> {
    // Load config
    let mut config = Config::load()?;

    // Override from CLI args
    if let Some(ref model) = cli.model {
        config.model = model.clone();
    }

    let printer = Printer {
        format: cli.format.unwrap_or(config.output_format),
        language: cli.lang.or(config.language),
        ruby: cli.ruby.unwrap_or(config.ruby_style),
    };
    debug!(model = %config.model, format = ?printer.format, "config resolved");

    match cli.command {
        Commands::Products { category } => cmd_products(&printer, category),
        Commands::Topics => printer.topics(catalog().common_topics()),
        Commands::Explain { topic } => cmd_explain(config, &printer, &topic).await,
        Commands::Simulate {
            age,
            gender,
            category,
            needs,
            yes,
            no_sign,
        } => {
            let request = ProposalRequest {
                age,
                gender,
                category,
                needs: needs.unwrap_or_else(|| DEFAULT_NEEDS.to_string()),
            };
            cmd_simulate(config, &printer, request, yes, no_sign).await
        }
        Commands::Policies { active } => cmd_policies(config, &printer, active),
        Commands::Claim { policy, incident } => {
            cmd_claim(config, &printer, &policy, &incident).await
        }
        Commands::Claims => {
            let session = Session::offline(config)?;
            printer.claims(session.claims())
        }
        Commands::Lesson {
            topic,
            product,
            image,
            audio,
        } => cmd_lesson(config, &printer, &topic, product, image, audio).await,
        Commands::Speak { text, out } => cmd_speak(config, &printer, &text, &out).await,
        Commands::Annotate { text } => printer.annotation(&text),
        Commands::Config {
            show,
            set_model,
            set_speech_model,
            set_image_model,
            set_voice,
            set_api_key,
            set_api_base_url,
            set_timeout,
            set_data_dir,
            set_output,
            set_language,
            set_ruby,
            set_contractor,
            set_beneficiary,
            reset,
        } => {
            // Reload without CLI overrides
            let mut config = Config::load()?;
            if reset {
                config = Config::default();
                config.save()?;
                println!("Configuration reset to defaults.");
                return Ok(());
            }

            let mut changed = false;
            if let Some(model) = set_model {
                config.model = model;
                changed = true;
            }
            if let Some(model) = set_speech_model {
                config.speech_model = model;
                changed = true;
            }
            if let Some(model) = set_image_model {
                config.image_model = model;
                changed = true;
            }
            if let Some(voice) = set_voice {
                config.voice = voice;
                changed = true;
            }
            if let Some(key) = set_api_key {
                config.api_key = Some(key).filter(|k| !k.trim().is_empty());
                changed = true;
            }
            if let Some(url) = set_api_base_url {
                config.api_base_url = url;
                changed = true;
            }
            if let Some(secs) = set_timeout {
                config.request_timeout_secs = secs;
                changed = true;
            }
            if let Some(dir) = set_data_dir {
                config.data_dir = Some(dir);
                changed = true;
            }
            if let Some(format) = set_output {
                config.output_format = format;
                changed = true;
            }
            if let Some(lang) = set_language {
                config.language = Some(lang);
                changed = true;
            }
            if let Some(style) = set_ruby {
                config.ruby_style = style;
                changed = true;
            }
            if let Some(name) = set_contractor {
                config.contractor_name = name;
                changed = true;
            }
            if let Some(name) = set_beneficiary {
                config.beneficiary_name = name;
                changed = true;
            }

            if changed {
                config.save()?;
                println!("Configuration saved.");
            }
            if show || !changed {
                println!("{}", config);
            }
            Ok(())
        }
        Commands::Reset { yes } => cmd_reset(config, yes),
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Spinner on stderr while a request runs; hidden for JSON output
fn spinner(printer: &Printer, message: &str) -> ProgressBar {
    if printer.is_json() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn confirm(question: &str) -> Result<bool> {
    println!("\n{} [y/N]", question);
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(is_yes(&input))
}

fn is_yes(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}

fn cmd_products(printer: &Printer, category: Option<InsuranceCategory>) -> Result<()> {
    let products = match category {
        Some(category) => catalog().by_category(category),
        None => catalog().products().iter().collect(),
    };
    printer.products(&products)
}

/// A bare number picks one of the suggested topics
fn resolve_topic(topic: &str) -> &str {
    let topics = catalog().common_topics();
    match topic.trim().parse::<usize>() {
        Ok(n) if (1..=topics.len()).contains(&n) => topic_query(&topics[n - 1]),
        _ => topic,
    }
}

async fn cmd_explain(config: Config, printer: &Printer, topic: &str) -> Result<()> {
    let mut session = Session::from_config(config)?;
    session.navigate(View::Learn);

    let topic = resolve_topic(topic);
    let pb = spinner(printer, &format!("Explaining {}...", topic));
    let text = session.explain(topic).await?;
    pb.finish_and_clear();

    match text {
        Some(text) => printer.explanation(topic, &text),
        None => {
            println!("Nothing to explain.");
            Ok(())
        }
    }
}

async fn cmd_simulate(
    config: Config,
    printer: &Printer,
    request: ProposalRequest,
    yes: bool,
    no_sign: bool,
) -> Result<()> {
    let mut session = Session::from_config(config)?;
    session.navigate(View::Simulation);

    let pb = spinner(printer, "Underwriting...");
    let proposal = session.simulate(request).await?;
    pb.finish_and_clear();

    let Some(proposal) = proposal else {
        println!("Age and needs are required.");
        return Ok(());
    };
    printer.proposal(&proposal)?;

    if no_sign || (!yes && (printer.is_json() || !confirm("Sign this contract?")?)) {
        return Ok(());
    }
    let policy = session.sign_contract(today())?;
    if !printer.is_json() {
        println!("\nContract signed.");
    }
    printer.policy(&policy)
}

fn cmd_policies(config: Config, printer: &Printer, active: bool) -> Result<()> {
    let session = Session::offline(config)?;
    let policies = if active {
        session.active_policies()
    } else {
        session.policies().iter().collect()
    };
    printer.policies(&policies)
}

async fn cmd_claim(config: Config, printer: &Printer, policy: &str, incident: &str) -> Result<()> {
    let mut session = Session::from_config(config)?;
    session.navigate(View::ClaimsCenter);

    let pb = spinner(printer, "Assessing claim...");
    let claim = session.submit_claim(policy, incident, today()).await;
    pb.finish_and_clear();

    match claim? {
        Some(claim) => printer.claim(&claim),
        None => {
            println!("Policy and incident description are required.");
            Ok(())
        }
    }
}

async fn cmd_lesson(
    config: Config,
    printer: &Printer,
    topic: &str,
    product: Option<String>,
    image: Option<PathBuf>,
    audio: Option<PathBuf>,
) -> Result<()> {
    let product = match product {
        Some(id) => Some(
            catalog()
                .product(&id)
                .ok_or_else(|| Error::ProductNotFound(id.clone()))?,
        ),
        None => None,
    };

    let mut session = Session::from_config(config)?;
    session.navigate(View::Learn);

    let pb = spinner(printer, "Preparing lesson...");
    let lesson = session.lesson(topic, product).await;
    pb.finish_and_clear();
    let Some(lesson) = lesson? else {
        println!("Nothing to teach.");
        return Ok(());
    };
    printer.lesson(&lesson)?;

    if let Some(path) = image {
        let pb = spinner(printer, "Drawing visual aid...");
        let generated = session.illustrate(&lesson.image_prompt).await;
        pb.finish_and_clear();
        if let Some(generated) = generated? {
            let path = with_default_extension(path, generated.extension());
            generated.save(&path)?;
            eprintln!("Visual aid saved to {}", path.display());
        }
    }

    if let Some(path) = audio {
        let pb = spinner(printer, "Recording narration...");
        let speech = session.speak(&narration(&lesson)).await;
        pb.finish_and_clear();
        if let Some(speech) = speech? {
            speech.write_wav(&path)?;
            eprintln!(
                "Narration saved to {} ({:.1}s)",
                path.display(),
                speech.duration_secs()
            );
        }
    }
    Ok(())
}

fn narration(lesson: &Lesson) -> String {
    let mut text = lesson.title.clone();
    for chapter in &lesson.chapters {
        text.push_str("\n\n");
        text.push_str(&chapter.title);
        text.push('\n');
        text.push_str(&chapter.content);
    }
    text
}

fn with_default_extension(path: PathBuf, extension: &str) -> PathBuf {
    if path.extension().is_some() {
        path
    } else {
        path.with_extension(extension)
    }
}

async fn cmd_speak(config: Config, printer: &Printer, text: &str, out: &Path) -> Result<()> {
    let mut session = Session::from_config(config)?;

    let pb = spinner(printer, "Synthesizing speech...");
    let speech = session.speak(text).await;
    pb.finish_and_clear();

    match speech? {
        Some(speech) => {
            speech.write_wav(out)?;
            println!(
                "Saved {:.1}s of audio to {}",
                speech.duration_secs(),
                out.display()
            );
        }
        None => println!("Nothing to say."),
    }
    Ok(())
}

fn cmd_reset(config: Config, yes: bool) -> Result<()> {
    let mut session = Session::offline(config)?;
    let (policies, claims) = (session.policies().len(), session.claims().len());

    if !yes
        && !confirm(&format!(
            "Delete {} policy(ies) and {} claim(s)?",
            policies, claims
        ))?
    {
        println!("Cancelled.");
        return Ok(());
    }

    session.reset()?;
    println!("Local records cleared.");
    Ok(())
}
