use anyhow::Result;
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use conjecture_client::ApiClient;

mod app;
mod ui;

use app::App;

/// Terminal monitor for the conjecture research pipeline
#[derive(Parser, Debug)]
#[command(name = "conjecture-monitor", version, about)]
struct Args {
    /// Base URL of the pipeline server
    #[arg(
        long,
        env = "CONJECTURE_SERVER",
        default_value = "http://localhost:8000"
    )]
    server: String,

    /// arXiv paper id to pre-fill (e.g. 2301.12345)
    arxiv_id: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// One-shot query of a job's server-side status
    Status { job_id: String },
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    match args.command {
        Some(Command::Status { job_id }) => run_status(&args.server, &job_id),
        None => run_monitor(&args.server, args.arxiv_id),
    }
}

fn run_status(server: &str, job_id: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let runtime = tokio::runtime::Runtime::new()?;
    let api = ApiClient::new(server);
    let status = runtime.block_on(api.job_status(job_id))?;

    println!("job:       {}", status.job_id);
    println!("status:    {}", status.status.as_str());
    if let Some(step) = &status.current_step {
        println!("step:      {step}");
    }
    if let Some(phase) = status.phase {
        println!("phase:     {phase}");
    }
    if let Some(iteration) = status.iteration {
        println!("iteration: {iteration}");
    }
    if let Some(error) = &status.error {
        println!("error:     {error}");
    }
    Ok(())
}

fn run_monitor(server: &str, arxiv_id: Option<String>) -> Result<()> {
    // The TUI owns the terminal, so diagnostics go to a file instead.
    init_file_logging()?;

    let runtime = tokio::runtime::Runtime::new()?;
    let mut app = App::new(server, runtime.handle().clone(), arxiv_id);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run main loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    loop {
        app.tick();

        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key.code);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn init_file_logging() -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("conjecture-monitor.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
