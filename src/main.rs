//! Quill console entry point.

use std::io::{BufRead, Write};

use tracing::{error, info};

use quill::cli::Cli;
use quill::commands::register_builtins;
use quill::config::Config;
use quill::engine::{CommandRegistry, Engine, EngineContext, ExecutorState, StdoutSink};
use quill::error::{QuillError, Result};
use quill::llm::create_client;
use quill::logging;

#[tokio::main]
async fn main() {
    // .env must load before anything reads the environment
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    if cli.is_interactive() {
        logging::init_file_logging();
    } else {
        logging::init_stderr_logging();
    }

    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("{}: {}", e.category(), e);
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<i32> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let mut config = Config::load_from_file(&config_path)?;
    if let Some(provider) = cli.provider_override() {
        config.llm.provider = provider.to_string();
    }

    let llm = create_client(&config.llm)?;
    let mut ctx = EngineContext::new(llm, Box::new(StdoutSink));
    ctx.session.set_model(config.llm.model.clone());
    ctx.session.project_into(&mut ctx.vars);

    let mut registry = CommandRegistry::new();
    register_builtins(&mut registry)?;
    let mut engine = Engine::new(registry, ctx);

    if let Some(script) = &config.console.startup_script {
        info!("Running startup script: {}", script.display());
        engine
            .submit_line(&format!("\\script {}", script.display()))
            .await;
    }

    if let Some(script) = &cli.script {
        let state = engine
            .submit_line(&format!("\\script {}", script.display()))
            .await;
        return Ok(exit_code(state));
    }

    if !cli.execute.is_empty() {
        let mut state = ExecutorState::Idle;
        for line in &cli.execute {
            state = engine.submit_line(line).await;
            if engine.exit_requested() {
                break;
            }
        }
        return Ok(exit_code(state));
    }

    repl(&mut engine).await?;
    Ok(0)
}

/// The interactive read-eval loop.
async fn repl(engine: &mut Engine) -> Result<()> {
    println!(
        "Quill {} (\\help for commands, \\exit to leave)",
        env!("CARGO_PKG_VERSION")
    );

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        let _ = std::io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(QuillError::internal(format!("Failed to read input: {e}")));
            }
        }

        engine.submit_line(&line).await;
        if engine.exit_requested() {
            break;
        }
    }
    Ok(())
}

fn exit_code(state: ExecutorState) -> i32 {
    match state {
        ExecutorState::HaltedOnError => 1,
        _ => 0,
    }
}
