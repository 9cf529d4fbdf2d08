//! Headless session: line commands on stdin drive the virtual joystick.
//!
//! ```text
//! axis <logical> <value>     stick <left|right> <x> <y>
//! press <n>                  release <n>
//! stop                       resume
//! profile <id>               status
//! quit
//! ```

use super::CommandResult;
use anyhow::{anyhow, bail, Context};
use nimbus_joystick::device::{LogDevice, UinputDevice, VirtualDevice};
use nimbus_joystick::{ConfigStore, Controller, LogicalAxis, Stick};
use std::str::FromStr;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

const DEFAULT_UPDATE_RATE: u64 = 60;
const MAX_UPDATE_RATE: u64 = 1000;

/// One parsed stdin line
#[derive(Debug, Clone, PartialEq)]
enum LineCommand {
    Axis(LogicalAxis, f64),
    Stick(Stick, f64, f64),
    Press(u8),
    Release(u8),
    Stop,
    Resume,
    Profile(String),
    Status,
    Quit,
}

fn parse_number(token: Option<&str>, what: &str) -> anyhow::Result<f64> {
    let token = token.ok_or_else(|| anyhow!("missing {what}"))?;
    let value: f64 = token
        .parse()
        .with_context(|| format!("invalid {what}: {token:?}"))?;
    if !value.is_finite() {
        bail!("invalid {what}: {token:?}");
    }
    Ok(value)
}

fn parse_button(token: Option<&str>) -> anyhow::Result<u8> {
    let token = token.ok_or_else(|| anyhow!("missing button number"))?;
    token
        .parse()
        .with_context(|| format!("invalid button number: {token:?}"))
}

impl FromStr for LineCommand {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut tokens = line.split_whitespace();
        let Some(word) = tokens.next() else {
            bail!("empty command");
        };
        let command = match word.to_ascii_lowercase().as_str() {
            "axis" => {
                let axis = tokens.next().ok_or_else(|| anyhow!("missing axis name"))?;
                let axis: LogicalAxis = axis.parse().map_err(|e: String| anyhow!(e))?;
                LineCommand::Axis(axis, parse_number(tokens.next(), "axis value")?)
            }
            "stick" => {
                let stick = tokens.next().ok_or_else(|| anyhow!("missing stick"))?;
                let stick: Stick = stick.parse().map_err(|e: String| anyhow!(e))?;
                let x = parse_number(tokens.next(), "x value")?;
                let y = parse_number(tokens.next(), "y value")?;
                LineCommand::Stick(stick, x, y)
            }
            "press" => LineCommand::Press(parse_button(tokens.next())?),
            "release" => LineCommand::Release(parse_button(tokens.next())?),
            "stop" => LineCommand::Stop,
            "resume" => LineCommand::Resume,
            "profile" => {
                let id = tokens.next().ok_or_else(|| anyhow!("missing profile id"))?;
                LineCommand::Profile(id.to_string())
            }
            "status" => LineCommand::Status,
            "quit" | "exit" => LineCommand::Quit,
            other => bail!("unknown command: {other:?}"),
        };
        if let Some(extra) = tokens.next() {
            bail!("unexpected argument: {extra:?}");
        }
        Ok(command)
    }
}

/// What the session loop should do with one read from stdin
#[derive(Debug, PartialEq)]
enum StdinInput {
    Command(String, LineCommand),
    Skip,
    Finished,
}

fn classify(read: std::io::Result<Option<String>>) -> StdinInput {
    let line = match read {
        Ok(Some(line)) => line,
        Ok(None) => {
            debug!("stdin closed");
            return StdinInput::Finished;
        }
        Err(e) => {
            warn!("Could not read stdin: {}", e);
            return StdinInput::Finished;
        }
    };
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return StdinInput::Skip;
    }
    match line.parse::<LineCommand>() {
        Ok(LineCommand::Quit) => StdinInput::Finished,
        Ok(command) => StdinInput::Command(line.to_string(), command),
        Err(e) => {
            warn!("{}", e);
            StdinInput::Skip
        }
    }
}

pub async fn run(store: ConfigStore, dry_run: bool, device_name: &str) -> CommandResult {
    store.validate().context("Invalid configuration")?;

    let axis_range = store.get_u64("vjoy.axis_range", 32767).clamp(1, i32::MAX as u64) as i32;
    let device: Box<dyn VirtualDevice> = if dry_run {
        info!("Dry run: device writes are only logged");
        Box::new(LogDevice::new(device_name))
    } else {
        Box::new(UinputDevice::new(device_name, axis_range)?)
    };

    let rate = store
        .get_u64("vjoy.update_rate", DEFAULT_UPDATE_RATE)
        .clamp(1, MAX_UPDATE_RATE);
    let mut controller = Controller::new(store, device);
    info!(
        "Running profile {} at {} Hz. Type commands, 'quit' to exit.",
        controller.config().current_profile_id(),
        rate
    );

    let mut ticker = tokio::time::interval(Duration::from_secs_f64(1.0 / rate as f64));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            read = lines.next_line() => match classify(read) {
                StdinInput::Command(line, command) => {
                    if let Err(e) = execute(&mut controller, command) {
                        warn!("{}: {:#}", line, e);
                    }
                }
                StdinInput::Skip => {}
                StdinInput::Finished => break,
            },

            _ = ticker.tick() => {
                if let Err(e) = controller.tick(Instant::now()) {
                    warn!("Device update failed: {}", e);
                }
            }

            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }

    if let Err(e) = controller.center_all() {
        warn!("Failed to centre device on exit: {}", e);
    }
    Ok(())
}

fn execute<D: VirtualDevice>(controller: &mut Controller<D>, command: LineCommand) -> CommandResult {
    match command {
        LineCommand::Axis(axis, value) => {
            controller.axis_input(axis, value)?;
        }
        LineCommand::Stick(stick, x, y) => {
            controller.stick_input(stick, x, y)?;
        }
        LineCommand::Press(id) => controller.button_press(id)?,
        LineCommand::Release(id) => controller.button_release(id)?,
        LineCommand::Stop => controller.emergency_stop()?,
        LineCommand::Resume => controller.resume(),
        LineCommand::Profile(id) => {
            controller.switch_profile(&id)?;
            controller.config().save()?;
            info!("Profile {} active", id);
        }
        LineCommand::Status => {
            println!("{}", serde_json::to_string(&controller.status())?);
        }
        LineCommand::Quit => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            "axis rudder -0.5".parse::<LineCommand>().unwrap(),
            LineCommand::Axis(LogicalAxis::Rudder, -0.5)
        );
        assert_eq!(
            "STICK left 0.1 0.2".parse::<LineCommand>().unwrap(),
            LineCommand::Stick(Stick::Left, 0.1, 0.2)
        );
        assert_eq!("press 3".parse::<LineCommand>().unwrap(), LineCommand::Press(3));
        assert_eq!(
            "profile racing".parse::<LineCommand>().unwrap(),
            LineCommand::Profile("racing".to_string())
        );
        assert_eq!("quit".parse::<LineCommand>().unwrap(), LineCommand::Quit);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!("".parse::<LineCommand>().is_err());
        assert!("axis pedal 0.5".parse::<LineCommand>().is_err());
        assert!("axis left_x".parse::<LineCommand>().is_err());
        assert!("axis left_x NaN".parse::<LineCommand>().is_err());
        assert!("press 300".parse::<LineCommand>().is_err());
        assert!("stop now".parse::<LineCommand>().is_err());
        assert!("jump".parse::<LineCommand>().is_err());
    }

    #[test]
    fn test_classify_stdin_reads() {
        assert_eq!(
            classify(Ok(Some("  press 2 ".to_string()))),
            StdinInput::Command("press 2".to_string(), LineCommand::Press(2))
        );
        assert_eq!(classify(Ok(Some("# comment".to_string()))), StdinInput::Skip);
        assert_eq!(classify(Ok(Some("   ".to_string()))), StdinInput::Skip);
        assert_eq!(classify(Ok(Some("jump".to_string()))), StdinInput::Skip);
        assert_eq!(classify(Ok(Some("quit".to_string()))), StdinInput::Finished);
        assert_eq!(classify(Ok(None)), StdinInput::Finished);
    }

    #[test]
    fn test_read_error_ends_session() {
        let read = Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "stream did not contain valid UTF-8",
        ));
        assert_eq!(classify(read), StdinInput::Finished);
    }

    #[test]
    fn test_execute_against_log_device() {
        let store = ConfigStore::new("/nonexistent/c.json", "/nonexistent/p");
        let mut controller = Controller::new(store, LogDevice::new("test"));
        execute(&mut controller, "press 1".parse().unwrap()).unwrap();
        execute(&mut controller, "stop".parse().unwrap()).unwrap();
        assert!(controller.status().device.emergency_stop);
        execute(&mut controller, "resume".parse().unwrap()).unwrap();
        assert!(!controller.status().device.emergency_stop);
        assert!(execute(&mut controller, "press 99".parse().unwrap()).is_err());
    }
}
