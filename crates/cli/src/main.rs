//! Block-world scene and state-space generator CLI

use std::path::PathBuf;

use anyhow::Context;
use blockworld_cli::{
    load_or_sample, numbered, save_json, EnumerationSetup, PropertiesParser, SampleFile,
    StateSpaceFile,
};
use blockworld_core::{BlockEquality, DuplicatePolicy, GenerationConfig, PropertyCatalog};
use blockworld_enumerate::{ExploreMode, StateSpace};
use blockworld_scene::{ActionKind, ActionModel, TransitionSampler};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Parser)]
#[command(name = "blockworld")]
#[command(about = "Block-world scene generator for visual reasoning datasets")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sample random transitions
    Sample {
        #[command(flatten)]
        generation: GenerationArgs,

        /// Number of transitions to sample
        #[arg(short = 'n', long, default_value = "10")]
        count: usize,

        /// Actions random sampling may choose from
        #[arg(long, value_enum, default_values_t = vec![ActionArg::Move])]
        actions: Vec<ActionArg>,

        /// Renders per state (wiggled when --wiggle is positive)
        #[arg(long, default_value = "1")]
        renders: usize,

        /// Index of the first transition; stored transitions are reloaded and re-rendered
        #[arg(long, default_value = "0")]
        start_index: usize,

        /// Output directory
        #[arg(short, long, default_value = "output")]
        output: PathBuf,
    },

    /// Sample an initial state and a goal reached by moves
    Problem {
        #[command(flatten)]
        generation: GenerationArgs,

        /// Output directory
        #[arg(short, long, default_value = "output")]
        output: PathBuf,
    },

    /// Enumerate every distinct state and transition of one object set
    Enumerate {
        #[command(flatten)]
        generation: GenerationArgs,

        /// Only count states and transitions
        #[arg(long)]
        dry_run: bool,

        /// Output file for states and transitions (JSON)
        #[arg(short, long, default_value = "output/state_space.json")]
        output: PathBuf,
    },

    /// Show the loaded property catalog
    Catalog {
        /// Properties JSON file (built-in CLEVR set if omitted)
        #[arg(short, long)]
        properties: Option<PathBuf>,
    },
}

#[derive(Args)]
struct GenerationArgs {
    /// Properties JSON file (built-in CLEVR set if omitted)
    #[arg(short, long)]
    properties: Option<PathBuf>,

    /// Number of objects per scene
    #[arg(long, default_value = "4")]
    num_objects: usize,

    /// Number of candidate slots on the table
    #[arg(long, default_value = "5")]
    table_size: usize,

    /// Slot jitter, in units of the largest object size
    #[arg(long, default_value = "0.0")]
    object_jitter: f64,

    /// Allow identical objects in one scene
    #[arg(long)]
    allow_duplicates: bool,

    /// Draw colors from the full list instead of the first num-objects entries
    #[arg(long)]
    randomize_colors: bool,

    /// Number of stacks for enumeration
    #[arg(long, default_value = "4")]
    max_stacks: usize,

    /// Minimum margin between stacks
    #[arg(long, default_value = "1.5")]
    min_margin: f64,

    /// Maximum margin between stacks
    #[arg(long, default_value = "2.0")]
    max_margin: f64,

    /// Actions between the two states of a transition or problem
    #[arg(long, default_value = "1")]
    num_steps: usize,

    /// Render-time wiggle, in units of the largest object size
    #[arg(long, default_value = "0.0")]
    wiggle: f64,

    /// Random seed (entropy if omitted)
    #[arg(long)]
    seed: Option<u64>,
}

impl GenerationArgs {
    /// Duplicates are rejected under `equality` unless allowed.
    fn config(&self, equality: BlockEquality) -> GenerationConfig {
        let duplicates = if self.allow_duplicates {
            DuplicatePolicy::Allow
        } else {
            DuplicatePolicy::Reject(equality)
        };
        GenerationConfig::new()
            .with_num_objects(self.num_objects)
            .with_table_size(self.table_size)
            .with_object_jitter(self.object_jitter)
            .with_duplicates(duplicates)
            .with_randomize_colors(self.randomize_colors)
            .with_stacks(self.max_stacks, self.min_margin, self.max_margin)
            .with_num_steps(self.num_steps)
            .with_wiggle(self.wiggle)
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ActionArg {
    /// Move a top block
    Move,
    /// Change the material of a top block
    ChangeMaterial,
}

impl From<ActionArg> for ActionKind {
    fn from(arg: ActionArg) -> Self {
        match arg {
            ActionArg::Move => ActionKind::Move,
            ActionArg::ChangeMaterial => ActionKind::ChangeMaterial,
        }
    }
}

fn load_catalog(path: Option<&PathBuf>) -> anyhow::Result<PropertyCatalog> {
    match path {
        Some(path) => PropertiesParser::new()
            .parse_file(path)
            .with_context(|| format!("loading {}", path.display())),
        None => Ok(PropertyCatalog::clevr()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Sample {
            generation,
            count,
            actions,
            renders,
            start_index,
            output,
        } => {
            let catalog = load_catalog(generation.properties.as_ref())?;
            let config = generation.config(BlockEquality::Similar);
            let actions = ActionModel::new(actions.into_iter().map(Into::into).collect())?;
            let sampler = TransitionSampler::new(catalog, config)?.with_actions(actions);
            let mut rng = generation.rng();

            println!("Sampling {} transitions from index {}", count, start_index);
            let mut reloaded = 0;
            for (n, i) in (start_index..start_index + count).enumerate() {
                let snapshot = numbered(&output, "snapshot", i);
                let (transition, stored) = load_or_sample(&sampler, &snapshot, &mut rng)
                    .with_context(|| format!("transition {}", i))?;
                if stored {
                    reloaded += 1;
                }
                let file = SampleFile {
                    action: transition.action_name(),
                    pre: sampler.renders(&transition.pre, renders.max(1), &mut rng),
                    suc: sampler.renders(&transition.suc, renders.max(1), &mut rng),
                };
                save_json(numbered(&output, "transition", i), &file)?;
                if (n + 1) % 100 == 0 {
                    println!("  {}/{}", n + 1, count);
                }
            }
            if reloaded > 0 {
                println!("Re-rendered {} stored transitions", reloaded);
            }
            println!("Transitions saved to: {}", output.display());
        }

        Commands::Problem { generation, output } => {
            let catalog = load_catalog(generation.properties.as_ref())?;
            let config = generation.config(BlockEquality::Similar);
            let sampler = TransitionSampler::new(catalog, config)?;
            let mut rng = generation.rng();

            let problem = sampler.sample_problem(&mut rng)?;
            let (init, goal) = problem.to_records();
            save_json(output.join("init.json"), &init)?;
            save_json(output.join("goal.json"), &goal)?;
            println!(
                "Problem with {} objects, {} steps saved to: {}",
                init.len(),
                generation.num_steps,
                output.display()
            );
        }

        Commands::Enumerate {
            generation,
            dry_run,
            output,
        } => {
            let config = generation.config(BlockEquality::Appearance);
            let catalog = load_catalog(generation.properties.as_ref())?;
            let mut rng = generation.rng();

            let EnumerationSetup {
                objects,
                layout,
                materials,
            } = EnumerationSetup::draw(&catalog, &config, &mut rng)?;
            let mode = if dry_run {
                ExploreMode::Dry
            } else {
                ExploreMode::Collect
            };

            println!(
                "Enumerating {} objects over {} stacks with {} materials",
                objects.len(),
                layout.len(),
                materials.len()
            );
            let space = StateSpace::explore(objects, &layout, &materials, mode)?;
            println!(
                "{} states ({} configurations), {} transitions",
                space.num_states(),
                space.raw_configurations(),
                space.num_transitions()
            );

            if !dry_run {
                save_json(&output, &StateSpaceFile::from(&space))?;
                println!("State space saved to: {}", output.display());
            }
        }

        Commands::Catalog { properties } => {
            let catalog = load_catalog(properties.as_ref())?;

            println!("Shapes:");
            for shape in catalog.shapes() {
                let flag = if shape.stackable { "stackable" } else { "not stackable" };
                println!("  - {} ({}, {})", shape.name, shape.model, flag);
            }
            println!("Sizes:");
            for size in catalog.sizes() {
                println!("  - {}: {}", size.name, size.value);
            }
            println!("Materials:");
            for material in catalog.materials() {
                println!("  - {}: {}", material.name, material.value);
            }
            println!("Colors:");
            for color in catalog.colors() {
                let [r, g, b, _] = color.value;
                println!("  - {}: ({:.3}, {:.3}, {:.3})", color.name, r, g, b);
            }
        }
    }

    Ok(())
}
