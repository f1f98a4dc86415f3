// Slash command handling

use crate::config::{SamplingConfig, SamplingParam, SamplingStore};
use crate::config::constants::{
    CREATIVE_TEMPERATURE_FLOOR, CREATIVE_TOP_K_FLOOR, CREATIVE_TOP_P_FLOOR,
    STRUCTURED_TEMPERATURE_CAP, STRUCTURED_TOP_K_CAP, STRUCTURED_TOP_P_CAP,
};
use crate::errors::ValidationError;

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigCommand {
    Show,
    Set { param: String, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Quit,
    Config(ConfigCommand),
}

impl Command {
    /// Parse a shell line.
    ///
    /// `None` means the line is an ordinary prompt. `/config` and `/set` are
    /// equivalent verbs; a malformed config command is `Some(Err(..))`.
    pub fn parse(input: &str) -> Option<Result<Self, ValidationError>> {
        let mut parts = input.split_whitespace();
        let head = parts.next()?.to_ascii_lowercase();
        let args: Vec<&str> = parts.collect();

        match head.as_str() {
            "exit" | "quit" | "/exit" | "/quit" if args.is_empty() => Some(Ok(Command::Quit)),
            "/help" => Some(Ok(Command::Help)),
            "/config" | "/set" => Some(parse_config_args(&args).map(Command::Config)),
            _ => None,
        }
    }
}

fn parse_config_args(args: &[&str]) -> Result<ConfigCommand, ValidationError> {
    match args {
        [action] if action.eq_ignore_ascii_case("show") || action.eq_ignore_ascii_case("status") => {
            Ok(ConfigCommand::Show)
        }
        // Stop lists may be written "a, b", so the value is everything after the name
        [param, rest @ ..] if !rest.is_empty() => Ok(ConfigCommand::Set {
            param: param.to_string(),
            value: rest.join(" "),
        }),
        _ => Err(ValidationError::InvalidCommand),
    }
}

/// Run a config command against the session baseline, returning the text to print
pub fn handle_config_command(
    command: ConfigCommand,
    store: &mut SamplingStore,
) -> Result<String, ValidationError> {
    match command {
        ConfigCommand::Show => Ok(format_config(store.current())),
        ConfigCommand::Set { param, value } => {
            let change = store.set(&param, &value)?;
            Ok(change.to_string())
        }
    }
}

pub fn format_help() -> String {
    r#"Available commands:
  /json <prompt>          - Get structured JSON output
  /config show            - Display current sampling parameters
  /config <param> <value> - Set a parameter (/set works too)
      temperature | temp   0-2
      top_p | topp         0-1
      top_k | topk         1-1000
      max_tokens | tokens  1-4096
      model                model name
      stop                 comma-separated list, or "none"
  /help                   - Show this help message
  exit, quit, /exit, /quit - End the session

Adaptive sampling: parameters auto-adjust based on task type."#
        .to_string()
}

pub fn format_config(config: &SamplingConfig) -> String {
    let mut output = String::from("Current Configuration:\n");
    for param in SamplingParam::ALL {
        output.push_str(&format!("  {}: {}\n", param, config.field_display(param)));
    }
    output.push_str(&format!(
        "\nAdaptive Sampling: Enabled (parameters adjust based on task type)\n\
         - Structured tasks: temperature ≤ {}, top_p ≤ {}, top_k ≤ {}\n\
         - Creative tasks: temperature ≥ {}, top_p ≥ {}, top_k ≥ {}",
        STRUCTURED_TEMPERATURE_CAP,
        STRUCTURED_TOP_P_CAP,
        STRUCTURED_TOP_K_CAP,
        CREATIVE_TEMPERATURE_FLOOR,
        CREATIVE_TOP_P_FLOOR,
        CREATIVE_TOP_K_FLOOR,
    ));
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(input: &str) -> Command {
        Command::parse(input).unwrap().unwrap()
    }

    #[test]
    fn test_plain_prompts_are_not_commands() {
        assert!(Command::parse("tell me a story").is_none());
        assert!(Command::parse("/json list three fruits").is_none());
        assert!(Command::parse("/configure the router").is_none());
        assert!(Command::parse("exit the building quietly").is_none());
        assert!(Command::parse("").is_none());
    }

    #[test]
    fn test_quit_variants() {
        for input in ["exit", "quit", "/exit", "/quit", "EXIT", "  quit  "] {
            assert_eq!(parse_ok(input), Command::Quit, "{input}");
        }
        assert_eq!(parse_ok("/help"), Command::Help);
    }

    #[test]
    fn test_config_and_set_are_equivalent() {
        assert_eq!(parse_ok("/config show"), Command::Config(ConfigCommand::Show));
        assert_eq!(parse_ok("/set status"), Command::Config(ConfigCommand::Show));
        assert_eq!(parse_ok("/config top_p 0.8"), parse_ok("/set top_p 0.8"));
        assert_eq!(
            parse_ok("/set stop END, ###"),
            Command::Config(ConfigCommand::Set {
                param: "stop".to_string(),
                value: "END, ###".to_string(),
            })
        );
    }

    #[test]
    fn test_malformed_config_commands() {
        for input in ["/config", "/set temperature", "/config frobnicate"] {
            assert_eq!(
                Command::parse(input).unwrap(),
                Err(ValidationError::InvalidCommand),
                "{input}"
            );
        }
    }

    #[test]
    fn test_set_updates_store() {
        let mut store = SamplingStore::default();
        let output = handle_config_command(
            ConfigCommand::Set {
                param: "temperature".to_string(),
                value: "1.2".to_string(),
            },
            &mut store,
        )
        .unwrap();

        assert_eq!(output, "Updated temperature: 0.9 → 1.2");
        assert_eq!(store.current().temperature, 1.2);
    }

    #[test]
    fn test_rejected_set_keeps_value() {
        let mut store = SamplingStore::default();
        let err = handle_config_command(
            ConfigCommand::Set {
                param: "top_p".to_string(),
                value: "1.5".to_string(),
            },
            &mut store,
        )
        .unwrap_err();

        assert!(err.to_string().contains("top_p"));
        assert_eq!(store.current().top_p, 0.9);
    }

    #[test]
    fn test_show_lists_every_field() {
        let mut store = SamplingStore::default();
        let output = handle_config_command(ConfigCommand::Show, &mut store).unwrap();
        for param in SamplingParam::ALL {
            assert!(output.contains(param.as_str()), "{}", param);
        }
        assert!(output.contains("Adaptive Sampling"));
    }
}
