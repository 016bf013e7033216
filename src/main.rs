//*** START FILE: src/main.rs ***//
use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

use glosswalk::config::{load_config_from_file, load_goals, Config, DEFAULT_CONFIG_FILE};
use glosswalk::lesson::generate_lesson;
use glosswalk::parsing::load_corpus;
use glosswalk::profile::{PracticeStore, PracticeTracker};
use glosswalk::profile_io::{load_practice_snapshot_or_default, save_practice_snapshot};
use glosswalk::simulation::resolver::resolver_for;
use glosswalk::simulation::session::{choose_goal, simulate_goal, CallbackOutcomes, SessionDriver, SessionReport};
use glosswalk::tasks::{BuiltTask, TaskPayload};
use glosswalk::{GlossIndex, NormalizedGloss, PracticeMode};

#[derive(Parser, Debug)]
#[command(name = "glosswalk", version, about = "Goal-driven vocabulary practice scheduler")]
struct Cli {
    /// Project configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: String,

    /// Seed for reproducible runs; overrides the config
    #[arg(long)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a goal with simulated outcomes and print every transition
    Simulate {
        #[arg(long, value_enum)]
        mode: Option<PracticeMode>,
        #[arg(long)]
        goal: Option<String>,
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Practice a goal interactively on the terminal
    Practice {
        #[arg(long, value_enum)]
        mode: Option<PracticeMode>,
        #[arg(long)]
        goal: Option<String>,
    },
    /// Generate a goal-free lesson from the whole corpus
    Lesson,
    /// Show mastery tiers for the given refs
    Stats {
        #[arg(required = true)]
        refs: Vec<String>,
    },
    /// Print the initial state map of a goal
    Inspect {
        reference: String,
        #[arg(long, value_enum, default_value_t = PracticeMode::Procedural)]
        mode: PracticeMode,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("glosswalk=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config_from_file(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config))?;
    let mut rng = match cli.seed.or(config.seed) {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    match cli.command {
        Command::Simulate { mode, goal, json } => {
            let index = load_index(&config).await?;
            let goals = load_goals(&config)?;
            let report = simulate_goal(
                &index,
                &config.task_context(),
                &goals,
                mode,
                goal.as_deref(),
                config.max_iterations,
                &mut rng,
            )?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }
        Command::Practice { mode, goal } => {
            let index = load_index(&config).await?;
            let goals = load_goals(&config)?;
            let (mode, goal_ref) = choose_goal(&goals, mode, goal.as_deref(), &mut rng)?;
            if !index.contains(&goal_ref) {
                bail!("Goal {} is not in the corpus", goal_ref);
            }

            let store_path = config.practice_store_path();
            let mut store = load_practice_snapshot_or_default(&store_path)?;
            let driver = SessionDriver::new(&index, config.task_context(), mode)
                .with_max_iterations(config.max_iterations);
            let mut prompt = CallbackOutcomes(prompt_outcome);
            let tracker: &mut dyn PracticeTracker = &mut store;
            let report = driver.run(&goal_ref, &mut prompt, Some(tracker), &mut rng);

            match &report.final_task {
                Some(task) => {
                    println!("\nFinal challenge:");
                    println!("{}", render_task(task));
                }
                None => println!("\nSession ended without a final challenge."),
            }
            save_practice_snapshot(&store, &store_path)?;
            println!("Practice saved to {}", store_path.display());
        }
        Command::Lesson => {
            let index = load_index(&config).await?;
            let lesson = generate_lesson(
                &index,
                Some(&config.task_context()),
                config.lesson_size,
                &mut rng,
            );
            let Some(challenge) = &lesson.final_challenge else {
                println!("No gloss in the corpus qualifies as a final challenge.");
                return Ok(());
            };
            println!("Final challenge: {}", describe(challenge));
            println!("Exercises ({}):", lesson.exercises.len());
            for gloss in &lesson.exercises {
                println!("  {}", describe(gloss));
            }
        }
        Command::Inspect { reference, mode } => {
            let index = load_index(&config).await?;
            let store = load_practice_snapshot_or_default(&config.practice_store_path())?;
            let tracker: &dyn PracticeTracker = &store;
            let state_map = resolver_for(mode).resolve_tree(&reference, &index, Some(tracker));
            println!("Initial states for {} ({} mode):", reference, mode);
            for (gloss_ref, state) in &state_map {
                println!("  {:<20} {}", state.as_str(), gloss_ref);
            }
        }
        Command::Stats { refs } => print_stats(&config, &refs)?,
    }

    Ok(())
}

async fn load_index(config: &Config) -> anyhow::Result<GlossIndex> {
    let glosses = load_corpus(&config.corpus)
        .await
        .with_context(|| format!("Failed to load corpus from {}", config.corpus))?;
    let index = GlossIndex::from_glosses(glosses);
    println!("Loaded {} glosses from {}", index.len(), config.corpus);
    Ok(index)
}

fn print_stats(config: &Config, refs: &[String]) -> anyhow::Result<()> {
    let store: PracticeStore = load_practice_snapshot_or_default(&config.practice_store_path())?;
    let stats = store.practice_stats(refs);
    for reference in refs {
        println!("  {:<30} {}", reference, store.practice_count(reference));
    }
    println!(
        "platinum: {}  gold: {}  green: {}  grey: {}",
        stats.platinum, stats.gold, stats.green, stats.grey
    );
    Ok(())
}

fn print_report(report: &SessionReport) {
    println!("Simulating {} ({} mode)", report.goal_ref, report.mode);
    for step in &report.steps {
        let task_label = step
            .task
            .as_ref()
            .map_or("<no admissible task>", |task| task.task_type.as_str());
        let outcome = match step.outcome {
            Some(true) => "yes",
            Some(false) => "no",
            None => "-",
        };
        println!(
            "{:>4}  {:<36} {:<24} {:<4} {} -> {}",
            step.iteration,
            task_label,
            step.gloss_ref,
            outcome,
            step.before.as_str(),
            step.after.as_str()
        );
    }

    if report.hit_iteration_cap {
        println!("Stopped at the iteration cap after {} steps.", report.steps.len());
    }
    match &report.final_task {
        Some(task) => println!("Final challenge: {} {}", task.task_type, task.gloss_ref),
        None => println!("No final challenge."),
    }
}

fn describe(gloss: &NormalizedGloss) -> String {
    format!("{} [{}]", gloss.content, gloss.language)
}

fn join(glosses: &[NormalizedGloss]) -> String {
    glosses.iter().map(|g| g.content.as_str()).collect::<Vec<_>>().join(" / ")
}

fn render_task(task: &BuiltTask) -> String {
    let mut lines = vec![format!("[{}] {}", task.presentation, describe(task.payload.subject()))];
    match &task.payload {
        TaskPayload::Translation(drill) => {
            lines.push(format!("  translations: {}", join(&drill.translations)));
        }
        TaskPayload::Sentence(drill) => {
            lines.push(format!("  translations: {}", join(&drill.translations)));
            for pair in &drill.examples {
                lines.push(format!("  {}  =>  {}", pair.example.content, pair.translation.content));
            }
        }
        TaskPayload::SentenceAroundGloss(task) => {
            lines.push(format!("  sentence: {}", task.example.content));
            lines.push(format!("  meaning: {}", join(&task.example_translations)));
            for part in &task.other_parts {
                lines.push(format!("  {}: {}", part.gloss.content, join(&part.translations)));
            }
            lines.push(format!("  {}: {}", task.focus_gloss.content, join(&task.focus_translations)));
        }
    }
    lines.join("\n")
}

fn read_answer() -> String {
    let _ = io::stdout().flush();
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(_) => line.trim().to_lowercase(),
        Err(_) => String::new(),
    }
}

fn prompt_outcome(task: &BuiltTask) -> Option<bool> {
    println!("\n{}", render_task(task));
    if !task.task_type.is_self_assessment() {
        print!("(Enter to continue) ");
        read_answer();
        return None;
    }
    print!("Did you remember it? [y/n, Enter to skip] ");
    match read_answer().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

//*** END FILE: src/main.rs ***//
