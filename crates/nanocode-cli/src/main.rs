//! nanocode
//!
//! Interactive coding assistant: reads prompts at a terminal, lets the
//! model call local file and shell tools, and prints what happens.
//!
//! ```text
//! MODEL=gpt-4o OPENAI_API_KEY=... nanocode
//! RUST_LOG=debug nanocode          # logs go to stderr
//! ```

mod input;
mod render;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use nanocode_core::{AgentBuilder, AgentConfig, Config, Session};
use nanocode_tools::default_registry;

use crate::input::ReplInput;
use crate::render::TerminalSink;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing; stdout belongs to the REPL
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env()?;
    let cwd = std::env::current_dir()?;

    let tools = default_registry(&config);
    tracing::info!(tools = ?tools.names(), "Registered tools");

    let agent = AgentBuilder::new()
        .backend(nanocode_runtime::connect(&config)?)
        .tools(tools)
        .config(AgentConfig::from_config(&config, &cwd))
        .build()?;

    render::banner(&config.model, &cwd);

    let mut session = Session::new(agent);
    let mut input = ReplInput::spawn()?;
    let mut sink = TerminalSink::new()?;

    // Ctrl-C outside the prompt drops the in-flight turn and exits
    tokio::select! {
        result = session.run(&mut input, &mut sink) => result?,
        _ = tokio::signal::ctrl_c() => {
            println!();
            tracing::info!("Interrupted");
        }
    }

    Ok(())
}
