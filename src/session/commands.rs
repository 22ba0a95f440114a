use std::path::PathBuf;

use crate::{
    inference::Frame,
    models::{AssistantMode, NetCategory, Persona},
    session::{CaptureOutcome, WorkbenchController},
};

/// One line of operator input.
#[derive(Debug, Clone, PartialEq)]
pub enum OperatorCommand {
    Mode(AssistantMode),
    Persona(Persona),
    Query(String),
    Capture(PathBuf),
    /// `None` toggles.
    Meter(Option<bool>),
    Reading(String),
    Commit,
    /// `None` toggles.
    Voice(Option<bool>),
    Nets(Option<NetCategory>),
    Reset,
    Status,
    Scene,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  mode <inspection|measurement|repair|validation|tutorial|thermal>
  persona <senior_eng|hardware_hacker|professor|soviet_tech>
  query <text>            contextual query for the next analysis (blank clears)
  capture <image>         analyze a still, or read the meter when armed
  meter [on|off]          route the next capture to the meter reader
  reading <value>         set the pending reading
  commit                  check the reading (an empty line does the same)
  voice [on|off]          narration toggle
  nets <category|off>     highlight one net category
  reset                   drop the analysis, keep the audit trail
  status | scene | help | quit";

/// Parses a console line. An empty line is the commit shortcut.
pub fn parse_command(line: &str) -> Result<OperatorCommand, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(OperatorCommand::Commit);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "mode" => OperatorCommand::Mode(rest.parse()?),
        "persona" => OperatorCommand::Persona(rest.parse()?),
        "query" => OperatorCommand::Query(rest.to_string()),
        "capture" if !rest.is_empty() => OperatorCommand::Capture(PathBuf::from(rest)),
        "capture" => return Err("capture needs an image path".into()),
        "meter" => OperatorCommand::Meter(parse_switch(rest)?),
        "reading" => OperatorCommand::Reading(rest.to_string()),
        "commit" => OperatorCommand::Commit,
        "voice" => OperatorCommand::Voice(parse_switch(rest)?),
        "nets" if rest.eq_ignore_ascii_case("off") || rest.is_empty() => OperatorCommand::Nets(None),
        "nets" => OperatorCommand::Nets(Some(rest.parse()?)),
        "reset" => OperatorCommand::Reset,
        "status" => OperatorCommand::Status,
        "scene" => OperatorCommand::Scene,
        "help" | "?" => OperatorCommand::Help,
        "quit" | "exit" => OperatorCommand::Quit,
        other => return Err(format!("unknown command '{other}' (try 'help')")),
    };
    Ok(command)
}

fn parse_switch(raw: &str) -> Result<Option<bool>, String> {
    match raw.to_ascii_lowercase().as_str() {
        "" => Ok(None),
        "on" | "true" | "1" => Ok(Some(true)),
        "off" | "false" | "0" => Ok(Some(false)),
        other => Err(format!("expected on/off, got '{other}'")),
    }
}

/// Runs a command and renders a one-shot reply for the console.
pub async fn execute(
    controller: &WorkbenchController,
    command: OperatorCommand,
) -> Result<String, String> {
    match command {
        OperatorCommand::Mode(mode) => {
            controller.set_mode(mode).await;
            Ok(format!("mode {}", mode.as_str()))
        }
        OperatorCommand::Persona(persona) => {
            controller.set_persona(persona).await;
            Ok(format!("persona {}", persona.label()))
        }
        OperatorCommand::Query(query) => {
            controller.set_query(&query).await;
            Ok(if query.trim().is_empty() {
                "query cleared".to_string()
            } else {
                format!("query set: {}", query.trim())
            })
        }
        OperatorCommand::Capture(path) => {
            let frame = Frame::load(&path).await.map_err(|e| format!("{e:#}"))?;
            match controller.capture(frame).await.map_err(|e| e.to_string())? {
                CaptureOutcome::Analyzed { components, steps } => Ok(format!(
                    "board analysed: {components} components, {steps} probing steps"
                )),
                CaptureOutcome::MeterRead { reading } => {
                    Ok(format!("meter reads {} {}", reading.value, reading.unit))
                }
            }
        }
        OperatorCommand::Meter(switch) => {
            let armed = match switch {
                Some(armed) => armed,
                None => !controller.get_state().await.awaiting_meter_capture,
            };
            controller
                .arm_meter_capture(armed)
                .await
                .map_err(|e| e.to_string())?;
            Ok(if armed {
                "next capture reads the meter".to_string()
            } else {
                "next capture analyses the board".to_string()
            })
        }
        OperatorCommand::Reading(reading) => {
            controller.set_reading(&reading).await;
            Ok(format!("reading {}", reading.trim()))
        }
        OperatorCommand::Commit => Ok(match controller.commit_reading().await {
            Some(entry) => match &entry.note {
                Some(note) => format!("{} {} ({note})", entry.status.as_str(), entry.value),
                None => format!("{} {}", entry.status.as_str(), entry.value),
            },
            None => "nothing to commit".to_string(),
        }),
        OperatorCommand::Voice(switch) => {
            let enabled = match switch {
                Some(enabled) => enabled,
                None => !controller.voice_enabled().await,
            };
            controller.set_voice_enabled(enabled).await;
            Ok(format!("voice {}", if enabled { "on" } else { "off" }))
        }
        OperatorCommand::Nets(filter) => {
            controller.set_net_filter(filter).await;
            Ok(match filter {
                Some(category) => format!("highlighting {} nets", category.as_str()),
                None => "net highlight off".to_string(),
            })
        }
        OperatorCommand::Reset => {
            let state = controller.reset().await;
            Ok(format!(
                "analysis cleared, {} audit entries kept",
                state.history.len()
            ))
        }
        OperatorCommand::Status => {
            let snapshot = controller.get_snapshot().await;
            serde_json::to_string_pretty(&snapshot.hud).map_err(|e| e.to_string())
        }
        OperatorCommand::Scene => {
            let snapshot = controller.get_snapshot().await;
            serde_json::to_string_pretty(&snapshot.scene).map_err(|e| e.to_string())
        }
        OperatorCommand::Help => Ok(HELP.to_string()),
        OperatorCommand::Quit => Ok("bye".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_line_commits() {
        assert_eq!(parse_command(""), Ok(OperatorCommand::Commit));
        assert_eq!(parse_command("   "), Ok(OperatorCommand::Commit));
    }

    #[test]
    fn parses_arguments() {
        assert_eq!(
            parse_command("mode Measurement"),
            Ok(OperatorCommand::Mode(AssistantMode::Measurement))
        );
        assert_eq!(
            parse_command("reading  4.98 "),
            Ok(OperatorCommand::Reading("4.98".into()))
        );
        assert_eq!(parse_command("meter"), Ok(OperatorCommand::Meter(None)));
        assert_eq!(parse_command("voice off"), Ok(OperatorCommand::Voice(Some(false))));
        assert_eq!(
            parse_command("nets 3v3"),
            Ok(OperatorCommand::Nets(Some(NetCategory::Rail3v3)))
        );
        assert_eq!(parse_command("nets off"), Ok(OperatorCommand::Nets(None)));
        assert_eq!(
            parse_command("capture frames/board 1.jpg"),
            Ok(OperatorCommand::Capture(PathBuf::from("frames/board 1.jpg")))
        );
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_command("capture").is_err());
        assert!(parse_command("mode xray").is_err());
        assert!(parse_command("voice maybe").is_err());
        assert!(parse_command("solder").is_err());
    }
}
