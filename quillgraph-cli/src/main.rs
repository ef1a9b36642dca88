//! quillgraph binary: parse the command line, run a pipeline, judge or A/B test, print the result.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use quillgraph_cli::{
    build_workbench, generate, init_tracing, judge, load_config, read_prompts, run_ab_test,
    write_results, AbTestPlan, Error, JudgeKind, RunOptions, WorkflowKind,
};

#[derive(Parser, Debug)]
#[command(name = "quillgraph")]
#[command(about = "AI-assisted blog pipelines: generate posts, judge them, compare pipelines")]
struct Args {
    /// Debug logs, including node enter/exit
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Step ceiling of every run (default: sized per pipeline)
    #[arg(long, global = true, value_name = "N")]
    max_steps: Option<usize>,

    /// Force a sampling temperature (0-2) on every LLM call
    #[arg(long, global = true, value_name = "T")]
    temperature: Option<f32>,

    /// Critic / refine cycles of the looping pipelines
    #[arg(long, global = true, value_name = "N")]
    max_iterations: Option<u32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a post (or modify an existing one) and print the MDX
    Generate {
        /// basic, chain-of-thoughts, writer-critic or deep-research
        #[arg(short, long, default_value = "basic")]
        workflow: WorkflowKind,

        /// Existing MDX post to modify with the prompt's instructions
        #[arg(long, value_name = "FILE")]
        raw_mdx_file: Option<PathBuf>,

        /// Topic or modification instructions
        #[arg(required = true, trailing_var_arg = true)]
        prompt: Vec<String>,
    },
    /// Evaluate a post and print the verdict as JSON
    Judge {
        /// relevance or fact
        #[arg(short, long)]
        judge: JudgeKind,

        /// Topic the post was written for
        #[arg(long)]
        topic: String,

        /// File holding the post
        #[arg(long, value_name = "FILE")]
        content_file: PathBuf,
    },
    /// Compare two pipelines over a JSON array of prompts
    AbTest {
        #[arg(long)]
        workflow1: WorkflowKind,

        #[arg(long)]
        workflow2: WorkflowKind,

        /// Comma-separated judges, e.g. fact,relevance
        #[arg(long, value_delimiter = ',', required = true)]
        judges: Vec<JudgeKind>,

        #[arg(long, value_name = "FILE")]
        test_file: PathBuf,

        #[arg(long, value_name = "FILE")]
        output_file: PathBuf,
    },
}

fn read_file(path: &Path) -> Result<String, Error> {
    std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e).into())
}

async fn run(args: Args) -> Result<(), Error> {
    let options = RunOptions {
        temperature: args.temperature,
        max_steps: args.max_steps,
        max_iterations: args.max_iterations,
        verbose: args.verbose,
    };
    let config = load_config(&options)?;
    let bench = build_workbench(&config)?;

    match args.command {
        Command::Generate {
            workflow,
            raw_mdx_file,
            prompt,
        } => {
            let raw_mdx = raw_mdx_file.as_deref().map(read_file).transpose()?;
            let prompt = prompt.join(" ").trim().to_string();
            let mdx = generate(&bench, workflow, &prompt, raw_mdx.as_deref()).await?;
            println!("{}", mdx);
        }
        Command::Judge {
            judge: kind,
            topic,
            content_file,
        } => {
            let content = read_file(&content_file)?;
            let verdict = judge(&bench, kind, &topic, &content).await?;
            println!("{}", serde_json::to_string_pretty(&verdict)?);
        }
        Command::AbTest {
            workflow1,
            workflow2,
            judges,
            test_file,
            output_file,
        } => {
            let prompts = read_prompts(&test_file)?;
            let plan = AbTestPlan {
                workflow_a: workflow1,
                workflow_b: workflow2,
                judges,
            };
            let records = run_ab_test(&bench, &plan, &prompts).await?;
            write_results(&output_file, &records)?;
            println!("A/B test results written to {}", output_file.display());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args).await {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
