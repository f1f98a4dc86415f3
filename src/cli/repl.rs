// Interactive shell over stdin

use anyhow::Result;
use crossterm::style::Stylize;
use std::io::{self, BufRead, IsTerminal, Write};

use crate::logging::TranscriptLogger;
use crate::orchestrator::{validate_prompt, Orchestrator, RequestOutcome, RequestResult};

use super::commands::{format_help, handle_config_command, Command};
use super::stats::SessionStats;

pub struct Repl {
    orchestrator: Orchestrator,
    transcript: Option<TranscriptLogger>,
    stats: SessionStats,
    is_interactive: bool,
}

impl Repl {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self {
            orchestrator,
            transcript: None,
            stats: SessionStats::new(),
            is_interactive: io::stdout().is_terminal(),
        }
    }

    /// Append successful exchanges to a JSONL transcript
    pub fn with_transcript(mut self, logger: TranscriptLogger) -> Self {
        self.transcript = Some(logger);
        self
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    /// Run the shell on the process's stdin until exit or EOF
    pub async fn run(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        self.run_with(&mut input).await
    }

    /// Run the shell on any line source
    pub async fn run_with<R: BufRead>(&mut self, input: &mut R) -> Result<()> {
        self.print_banner();

        loop {
            print!("{}", self.styled_prompt());
            io::stdout().flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                // EOF behaves like exit
                println!();
                break;
            }

            if !self.handle_line(&line).await? {
                break;
            }
        }

        self.print_stats();
        if let Some(transcript) = self.transcript.as_mut() {
            transcript.flush()?;
        }
        Ok(())
    }

    /// Process one shell line. Returns `false` when the session should end.
    pub async fn handle_line(&mut self, line: &str) -> Result<bool> {
        match Command::parse(line) {
            Some(Ok(Command::Quit)) => return Ok(false),
            Some(Ok(Command::Help)) => println!("{}", format_help()),
            Some(Ok(Command::Config(command))) => {
                match handle_config_command(command, self.orchestrator.sampling_mut()) {
                    Ok(output) => println!("\n{}\n", output),
                    Err(e) => eprintln!("\n{} {}", "Config Error:".red(), e),
                }
            }
            Some(Err(e)) => eprintln!("\n{} {}", "Config Error:".red(), e),
            None => self.handle_prompt(line).await?,
        }
        Ok(true)
    }

    async fn handle_prompt(&mut self, line: &str) -> Result<()> {
        // Blank lines are skipped quietly; other invalid prompts are reported
        // without contacting the provider.
        if line.trim().is_empty() {
            return Ok(());
        }
        if let Err(e) = validate_prompt(line) {
            eprintln!("\n{} {}", "Validation Error:".red(), e);
            return Ok(());
        }

        if self.is_interactive {
            println!("\n{}", "Generating response...".dark_grey());
        }

        match self.orchestrator.handle(line).await {
            RequestResult::Success(outcome) => {
                self.print_outcome(&outcome);
                self.stats.record(outcome.response_time_ms);
                if let Some(transcript) = self.transcript.as_mut() {
                    if let Err(e) = transcript.record(&outcome) {
                        tracing::warn!("Failed to record transcript entry: {:#}", e);
                    }
                }
            }
            RequestResult::Failure(failure) => {
                eprintln!("\n{} {}", "Error:".red(), failure.message);
            }
        }
        Ok(())
    }

    fn print_banner(&self) {
        if self.is_interactive {
            println!(
                "{}",
                "Adaptive Chat - type 'exit' to quit, /help for commands.".bold()
            );
            println!(
                "Provider: {} | Model: {}",
                self.orchestrator.provider_name(),
                self.orchestrator.sampling().current().model
            );
            println!("{}", "Adaptive sampling: parameters auto-adjust based on task type\n".dark_grey());
        } else {
            eprintln!("# Adaptive Chat - non-interactive mode");
        }
    }

    fn styled_prompt(&self) -> String {
        if self.is_interactive {
            format!("{}", "You: ".cyan().bold())
        } else {
            "You: ".to_string()
        }
    }

    fn print_outcome(&self, outcome: &RequestOutcome) {
        if outcome.structured() {
            println!("{}", "Assistant (Structured JSON):".green().bold());
        } else {
            println!("{}", "Assistant:".green().bold());
        }
        println!("{}\n", outcome.data);

        let sampling = &outcome.sampling_used;
        let details = format!(
            "Response Time: {:.2}ms\nTokens Used: {}\nSampling - Temp: {}, Top-P: {}{}\n",
            outcome.response_time_ms,
            outcome.tokens_display(),
            sampling.temperature,
            sampling.top_p,
            sampling
                .top_k
                .map(|k| format!(", Top-K: {}", k))
                .unwrap_or_default(),
        );
        println!("{}", details.dark_grey());
    }

    fn print_stats(&self) {
        if let Some(summary) = self.stats.summary() {
            println!("\n{}", summary);
        }
    }
}
